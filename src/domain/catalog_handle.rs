use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::domain::traits::Catalog;

/// Owning handle to a constructed catalog.
///
/// Not `Clone`: there is exactly one owner at a time, and ownership moves with the success
/// event. Views only keep a [`Weak`] reference, so dropping the handle tears the catalog down
/// for everybody.
pub struct CatalogHandle {
    catalog: Arc<dyn Catalog>,
}

impl CatalogHandle {
    pub fn new<C>(catalog: C) -> Self
    where
        C: Catalog + 'static,
    {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn entry_counts(&self) -> (usize, usize) {
        self.catalog.entry_counts()
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub(crate) fn downgrade(&self) -> Weak<dyn Catalog> {
        Arc::downgrade(&self.catalog)
    }
}

impl fmt::Debug for CatalogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (movies, series) = self.entry_counts();
        f.debug_struct("CatalogHandle")
            .field("movies", &movies)
            .field("series", &series)
            .finish()
    }
}
