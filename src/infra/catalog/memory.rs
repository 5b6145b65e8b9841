use indexmap::IndexMap;

use crate::{
    domain::{
        catalog_handle::CatalogHandle,
        models::{Partition, Title},
        traits::{Catalog, CatalogBuilder, ProgressSink},
        value_objects::{CacheLocation, TitleId},
    },
    error::{AppError, InitError},
};

/// Catalog held entirely in memory, rows in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    movies: IndexMap<TitleId, Title>,
    series: IndexMap<TitleId, Title>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            movies: IndexMap::new(),
            series: IndexMap::new(),
        }
    }

    pub fn from_titles<I>(titles: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = Title>,
    {
        let mut catalog = Self::new();
        for title in titles {
            catalog.insert(title)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, title: Title) -> Result<Partition, AppError> {
        let partition = title.partition().ok_or_else(|| {
            AppError::Validation(format!(
                "title {} of type {} is neither a movie nor a series",
                title.id, title.title_type
            ))
        })?;
        let entries = self.entries_mut(partition);
        if entries.contains_key(&title.id) {
            return Err(AppError::Conflict(format!("duplicate title id {}", title.id)));
        }
        entries.insert(title.id.clone(), title);
        Ok(partition)
    }

    pub fn titles(&self, partition: Partition) -> impl Iterator<Item = &Title> {
        self.entries(partition).values()
    }

    fn entries(&self, partition: Partition) -> &IndexMap<TitleId, Title> {
        match partition {
            Partition::Movies => &self.movies,
            Partition::Series => &self.series,
        }
    }

    fn entries_mut(&mut self, partition: Partition) -> &mut IndexMap<TitleId, Title> {
        match partition {
            Partition::Movies => &mut self.movies,
            Partition::Series => &mut self.series,
        }
    }
}

impl Catalog for MemoryCatalog {
    fn entry_counts(&self) -> (usize, usize) {
        (self.movies.len(), self.series.len())
    }

    fn title(&self, partition: Partition, row: usize) -> Option<&Title> {
        self.entries(partition).get_index(row).map(|(_, title)| title)
    }
}

/// One progress callback invocation replayed by [`MemoryCatalogBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub content_length: Option<u64>,
    pub delta: u64,
}

impl ProgressStep {
    pub fn length(content_length: u64) -> Self {
        Self {
            content_length: Some(content_length),
            delta: 0,
        }
    }

    pub fn delta(delta: u64) -> Self {
        Self {
            content_length: None,
            delta,
        }
    }
}

/// Builder that replays a fixed progress script and then yields a fixed outcome.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogBuilder {
    titles: Vec<Title>,
    steps: Vec<ProgressStep>,
    failure: Option<InitError>,
}

impl MemoryCatalogBuilder {
    pub fn new<I>(titles: I) -> Self
    where
        I: IntoIterator<Item = Title>,
    {
        Self {
            titles: titles.into_iter().collect(),
            steps: Vec::new(),
            failure: None,
        }
    }

    pub fn with_steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = ProgressStep>,
    {
        self.steps.extend(steps);
        self
    }

    pub fn failing_with(mut self, error: InitError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl CatalogBuilder for MemoryCatalogBuilder {
    fn construct(
        &self,
        location: &CacheLocation,
        _force_refresh: bool,
        progress: &dyn ProgressSink,
    ) -> Result<CatalogHandle, InitError> {
        for step in &self.steps {
            progress.report(step.content_length, step.delta);
        }
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let catalog = MemoryCatalog::from_titles(self.titles.iter().cloned())
            .map_err(|err| InitError::Construction(format!("{location}: {err}")))?;
        Ok(CatalogHandle::new(catalog))
    }
}
