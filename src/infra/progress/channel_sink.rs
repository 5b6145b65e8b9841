use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{models::InitEvent, traits::ProgressSink};

/// Forwards progress callbacks from the construction thread into the run's event channel.
///
/// The channel is the only path between the two contexts, so the consumer never shares
/// mutable state with the construction thread.
#[derive(Clone)]
pub struct ChannelProgressSink {
    run_id: Uuid,
    events: mpsc::UnboundedSender<InitEvent>,
}

impl ChannelProgressSink {
    pub fn new(run_id: Uuid, events: mpsc::UnboundedSender<InitEvent>) -> Self {
        Self { run_id, events }
    }

    fn send_event(&self, event: InitEvent) {
        // consumer went away; construction keeps going regardless
        let _ = self.events.send(event);
    }
}

impl ProgressSink for ChannelProgressSink {
    fn report(&self, content_length: Option<u64>, delta: u64) {
        if let Some(added) = content_length {
            tracing::trace!(run_id = %self.run_id, added, "content length increased");
            self.send_event(InitEvent::ContentLengthIncreased(added));
        }
        self.send_event(InitEvent::ProgressAdvanced(delta));
    }
}
