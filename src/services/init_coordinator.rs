use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Instant,
};

use async_trait::async_trait;
use tokio::{runtime::Handle, sync::mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        catalog_handle::CatalogHandle,
        models::{CoordinatorState, InitEvent},
        traits::CatalogBuilder,
        value_objects::CacheLocation,
    },
    error::{AppError, InitError},
    infra::progress::ChannelProgressSink,
    services::{progress::ProgressState, ServiceResult},
};

/// Consumer-side callbacks for one initialization run.
///
/// Called from whichever task drives [`InitEvents::dispatch`], never from the construction
/// thread. Exactly one of the two terminal callbacks is invoked, last.
#[async_trait]
pub trait InitObserver: Send {
    async fn content_length_increased(&mut self, _added: u64, _progress: &ProgressState) {}

    async fn progress_advanced(&mut self, _delta: u64, _progress: &ProgressState) {}

    async fn initialization_failed(&mut self, error: InitError);

    async fn initialization_succeeded(&mut self, handle: CatalogHandle);
}

/// Drives a single catalog construction off the caller's thread.
///
/// `start` may be called once; the run then always ends in `Succeeded` or `Failed`.
/// A new run needs a new coordinator.
pub struct InitCoordinator {
    run_id: Uuid,
    builder: Arc<dyn CatalogBuilder>,
    location: String,
    force_refresh: bool,
    state: Arc<AtomicU8>,
}

impl InitCoordinator {
    pub fn new(
        builder: Arc<dyn CatalogBuilder>,
        location: impl Into<String>,
        force_refresh: bool,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            builder,
            location: location.into(),
            force_refresh,
            state: Arc::new(AtomicU8::new(CoordinatorState::Idle.as_u8())),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Schedules the construction and returns the consumer end of its event stream.
    ///
    /// Must be called from within a tokio runtime. Never blocks.
    pub fn start(&self) -> ServiceResult<InitEvents> {
        let runtime = Handle::try_current().map_err(|err| {
            AppError::Internal(format!("catalog initialization needs a tokio runtime: {err}"))
        })?;

        self.state
            .compare_exchange(
                CoordinatorState::Idle.as_u8(),
                CoordinatorState::Running.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| {
                let current = CoordinatorState::from_u8(current);
                error!(
                    run_id = %self.run_id,
                    state = %current,
                    "catalog initialization started twice"
                );
                AppError::Conflict(format!(
                    "catalog initialization {} already started (state: {current})",
                    self.run_id
                ))
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        let run = InitRun {
            run_id: self.run_id,
            builder: Arc::clone(&self.builder),
            location: self.location.clone(),
            force_refresh: self.force_refresh,
            state: Arc::clone(&self.state),
            events: tx,
        };

        info!(
            run_id = %self.run_id,
            location = %self.location,
            force_refresh = self.force_refresh,
            "starting catalog initialization"
        );
        runtime.spawn(run.execute());

        Ok(InitEvents::new(self.run_id, rx))
    }
}

struct InitRun {
    run_id: Uuid,
    builder: Arc<dyn CatalogBuilder>,
    location: String,
    force_refresh: bool,
    state: Arc<AtomicU8>,
    events: mpsc::UnboundedSender<InitEvent>,
}

impl InitRun {
    async fn execute(self) {
        let started = Instant::now();
        let sink = ChannelProgressSink::new(self.run_id, self.events.clone());
        let builder = Arc::clone(&self.builder);
        let location = self.location.clone();
        let force_refresh = self.force_refresh;

        // the sink moves into the blocking task and is dropped with it, so every progress
        // event is queued before the outcome below
        let constructed = tokio::task::spawn_blocking(move || -> Result<CatalogHandle, InitError> {
            let location = CacheLocation::parse(&location)?;
            builder.construct(&location, force_refresh, &sink)
        })
        .await;

        let outcome = constructed.unwrap_or_else(|err| {
            Err(InitError::Construction(format!(
                "catalog construction aborted: {err}"
            )))
        });
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let event = match outcome {
            Ok(handle) => {
                let (movies, series) = handle.entry_counts();
                self.state
                    .store(CoordinatorState::Succeeded.as_u8(), Ordering::Release);
                info!(
                    run_id = %self.run_id,
                    movies,
                    series,
                    elapsed_ms,
                    "catalog initialization succeeded"
                );
                InitEvent::Succeeded(handle)
            }
            Err(err) => {
                self.state
                    .store(CoordinatorState::Failed.as_u8(), Ordering::Release);
                warn!(
                    run_id = %self.run_id,
                    kind = %err.kind(),
                    error = %err,
                    elapsed_ms,
                    "catalog initialization failed"
                );
                InitEvent::Failed(err)
            }
        };

        if self.events.send(event).is_err() {
            debug!(run_id = %self.run_id, "no consumer left for the initialization outcome");
        }
    }
}

/// Consumer end of a run's event stream. Keeps the aggregated [`ProgressState`].
pub struct InitEvents {
    run_id: Uuid,
    events: mpsc::UnboundedReceiver<InitEvent>,
    progress: ProgressState,
    finished: bool,
}

impl InitEvents {
    fn new(run_id: Uuid, events: mpsc::UnboundedReceiver<InitEvent>) -> Self {
        Self {
            run_id,
            events,
            progress: ProgressState::new(),
            finished: false,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    /// True once the terminal event has been received.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Waits for the next event. Returns `None` after the terminal event, or if the run
    /// went away without producing one.
    pub async fn recv(&mut self) -> Option<InitEvent> {
        if self.finished {
            return None;
        }
        let event = self.events.recv().await?;
        self.observe(&event);
        Some(event)
    }

    /// Non-blocking variant of [`recv`](Self::recv) for consumers polling from their own loop.
    pub fn try_recv(&mut self) -> Option<InitEvent> {
        if self.finished {
            return None;
        }
        let event = self.events.try_recv().ok()?;
        self.observe(&event);
        Some(event)
    }

    /// Feeds every event to `observer` until the terminal one and returns the final progress.
    pub async fn dispatch<O>(mut self, observer: &mut O) -> ServiceResult<ProgressState>
    where
        O: InitObserver + ?Sized,
    {
        while let Some(event) = self.recv().await {
            match event {
                InitEvent::ContentLengthIncreased(added) => {
                    observer.content_length_increased(added, &self.progress).await
                }
                InitEvent::ProgressAdvanced(delta) => {
                    observer.progress_advanced(delta, &self.progress).await
                }
                InitEvent::Failed(err) => {
                    observer.initialization_failed(err).await;
                    return Ok(self.progress);
                }
                InitEvent::Succeeded(handle) => {
                    observer.initialization_succeeded(handle).await;
                    return Ok(self.progress);
                }
            }
        }
        Err(AppError::Internal(format!(
            "catalog initialization {} ended without an outcome",
            self.run_id
        )))
    }

    fn observe(&mut self, event: &InitEvent) {
        self.progress.apply(event);
        if event.is_terminal() {
            self.finished = true;
            self.events.close();
        }
    }
}
