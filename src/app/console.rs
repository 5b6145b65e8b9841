use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    domain::catalog_handle::CatalogHandle,
    error::{AppError, InitError},
    services::{
        init_coordinator::InitObserver,
        progress::ProgressState,
        titles_table::{Cell, Column, TitlesTable},
    },
};

/// Headless stand-in for the window: logs progress, binds the tables on success and keeps
/// the catalog alive for as long as it lives.
pub struct ConsoleObserver {
    tables: Vec<Arc<TitlesTable>>,
    last_percent: Option<u8>,
    handle: Option<CatalogHandle>,
    failure: Option<InitError>,
}

impl ConsoleObserver {
    pub fn new<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Arc<TitlesTable>>,
    {
        Self {
            tables: tables.into_iter().collect(),
            last_percent: None,
            handle: None,
            failure: None,
        }
    }

    pub fn handle(&self) -> Option<&CatalogHandle> {
        self.handle.as_ref()
    }

    pub fn failure(&self) -> Option<&InitError> {
        self.failure.as_ref()
    }

    /// Status line shown once the catalog is ready.
    pub fn summary(&self) -> Option<String> {
        self.handle.as_ref().map(|handle| {
            let (movies, series) = handle.entry_counts();
            format!("Total of {movies} movies and {series} series")
        })
    }

    fn log_progress(&mut self, progress: &ProgressState) {
        let percent = progress.percent();
        if percent.is_some() && percent != self.last_percent {
            self.last_percent = percent;
            info!(
                percent = percent.unwrap_or_default(),
                current = progress.current(),
                maximum = progress.display_maximum(),
                "loading catalog"
            );
        }
    }
}

#[async_trait]
impl InitObserver for ConsoleObserver {
    async fn content_length_increased(&mut self, _added: u64, progress: &ProgressState) {
        self.log_progress(progress);
    }

    async fn progress_advanced(&mut self, _delta: u64, progress: &ProgressState) {
        self.log_progress(progress);
    }

    async fn initialization_failed(&mut self, error: InitError) {
        error!(kind = %error.kind(), error = %error, "error initializing catalog service");
        self.failure = Some(error);
    }

    async fn initialization_succeeded(&mut self, handle: CatalogHandle) {
        for table in &self.tables {
            table.bind(&handle);
        }
        self.handle = Some(handle);
        if let Some(summary) = self.summary() {
            info!("{summary}");
        }
    }
}

#[derive(Serialize)]
struct PreviewRow<'a> {
    partition: &'a str,
    row: usize,
    cells: IndexMap<&'static str, Cell>,
}

/// Writes the first `rows` rows of `table` as JSON lines.
pub fn write_preview<W: Write>(
    out: &mut W,
    table: &TitlesTable,
    rows: usize,
) -> Result<usize, AppError> {
    let partition = table.partition();
    let shown = rows.min(table.row_count());
    for row in 0..shown {
        let cells = Column::ALL
            .iter()
            .enumerate()
            .filter_map(|(index, column)| table.cell(row, index).map(|cell| (column.label(), cell)))
            .collect();
        let line = serde_json::to_string(&PreviewRow {
            partition: partition.as_str(),
            row,
            cells,
        })
        .map_err(|err| AppError::Internal(format!("preview encode failed: {err}")))?;
        writeln!(out, "{line}")?;
    }
    Ok(shown)
}
