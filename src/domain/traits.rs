use crate::{
    domain::{
        catalog_handle::CatalogHandle,
        models::{Partition, Severity, Title},
        value_objects::{CacheLocation, Rating},
    },
    error::InitError,
};

/// Receives progress from a catalog construction. Called from the construction thread.
///
/// `content_length` is an amount to add to the expected total, never an absolute value;
/// collaborators may report several as they discover sub-resources.
pub trait ProgressSink: Send + Sync {
    fn report(&self, content_length: Option<u64>, delta: u64);
}

/// A fully constructed catalog. Lookups must be cheap: views re-query per cell.
pub trait Catalog: Send + Sync {
    fn entry_counts(&self) -> (usize, usize);
    fn title(&self, partition: Partition, row: usize) -> Option<&Title>;

    fn len(&self, partition: Partition) -> usize {
        let (movies, series) = self.entry_counts();
        match partition {
            Partition::Movies => movies,
            Partition::Series => series,
        }
    }
}

/// Builds or loads a catalog. Blocking; runs on a dedicated thread.
pub trait CatalogBuilder: Send + Sync {
    fn construct(
        &self,
        location: &CacheLocation,
        force_refresh: bool,
        progress: &dyn ProgressSink,
    ) -> Result<CatalogHandle, InitError>;
}

pub trait SeverityPolicy: Send + Sync {
    fn classify(&self, rating: &Rating) -> Option<Severity>;
}
