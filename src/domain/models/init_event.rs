use crate::{domain::catalog_handle::CatalogHandle, error::InitError};

/// Notification produced by one initialization run, in emission order.
///
/// A run emits any number of progress events followed by exactly one of
/// `Failed` or `Succeeded`, after which it emits nothing.
#[derive(Debug)]
pub enum InitEvent {
    ContentLengthIncreased(u64),
    ProgressAdvanced(u64),
    Failed(InitError),
    Succeeded(CatalogHandle),
}

impl InitEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            InitEvent::ContentLengthIncreased(_) => "content_length_increased",
            InitEvent::ProgressAdvanced(_) => "progress_advanced",
            InitEvent::Failed(_) => "initialization_failed",
            InitEvent::Succeeded(_) => "initialization_succeeded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InitEvent::Failed(_) | InitEvent::Succeeded(_))
    }
}
