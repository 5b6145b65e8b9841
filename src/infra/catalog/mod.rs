pub mod memory;
pub mod progress_reader;
pub mod snapshot;
pub mod tsv;

pub use memory::{MemoryCatalog, MemoryCatalogBuilder, ProgressStep};
pub use tsv::TsvCatalogBuilder;
