use std::{
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use serde::Serialize;

use crate::{
    domain::{
        catalog_handle::CatalogHandle,
        models::{Partition, Severity, Title},
        traits::{Catalog, SeverityPolicy},
    },
    services::severity::NoSeverity,
};

pub const COLUMN_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PrimaryTitle,
    OriginalTitle,
    Year,
    Rating,
    Votes,
    Runtime,
    Genres,
    Type,
    Id,
    Link,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::PrimaryTitle,
        Column::OriginalTitle,
        Column::Year,
        Column::Rating,
        Column::Votes,
        Column::Runtime,
        Column::Genres,
        Column::Type,
        Column::Id,
        Column::Link,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Column::PrimaryTitle => "Primary Title",
            Column::OriginalTitle => "Original Title",
            Column::Year => "Year",
            Column::Rating => "Rating",
            Column::Votes => "Votes",
            Column::Runtime => "Runtime",
            Column::Genres => "Genres",
            Column::Type => "Type",
            Column::Id => "IMDB ID",
            Column::Link => "IMDB Link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(u64),
    Decimal(f64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Decimal(value) => write!(f, "{value:.1}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Cell {
    fn plain(value: CellValue) -> Self {
        Self {
            value,
            severity: None,
        }
    }
}

/// Read-only grid over one partition of a catalog.
///
/// Holds only a weak reference to the bound catalog and re-reads it on every query; once the
/// owning [`CatalogHandle`] is dropped the table reads as empty again.
pub struct TitlesTable {
    partition: Partition,
    catalog: RwLock<Option<Weak<dyn Catalog>>>,
    severity: Arc<dyn SeverityPolicy>,
}

impl TitlesTable {
    pub fn new(partition: Partition) -> Self {
        Self::with_severity_policy(partition, Arc::new(NoSeverity))
    }

    pub fn with_severity_policy(partition: Partition, severity: Arc<dyn SeverityPolicy>) -> Self {
        Self {
            partition,
            catalog: RwLock::new(None),
            severity,
        }
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn bind(&self, handle: &CatalogHandle) {
        *self.catalog.write() = Some(handle.downgrade());
    }

    pub fn is_bound(&self) -> bool {
        self.upgrade().is_some()
    }

    pub fn row_count(&self) -> usize {
        self.upgrade()
            .map(|catalog| catalog.len(self.partition))
            .unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn header(&self, column: usize) -> Option<&'static str> {
        Column::from_index(column).map(|column| column.label())
    }

    /// Value at `(row, column)`; `None` when unbound or out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        let column = Column::from_index(column)?;
        let catalog = self.upgrade()?;
        let title = catalog.title(self.partition, row)?;
        Some(self.render(title, column))
    }

    fn upgrade(&self) -> Option<Arc<dyn Catalog>> {
        self.catalog.read().as_ref().and_then(Weak::upgrade)
    }

    fn render(&self, title: &Title, column: Column) -> Cell {
        match column {
            Column::PrimaryTitle => Cell::plain(CellValue::Text(title.primary_title.clone())),
            Column::OriginalTitle => Cell::plain(
                title
                    .original_title
                    .clone()
                    .map(CellValue::Text)
                    .unwrap_or(CellValue::Empty),
            ),
            Column::Year => Cell::plain(
                title
                    .start_year
                    .map(|year| CellValue::Integer(u64::from(year)))
                    .unwrap_or(CellValue::Empty),
            ),
            Column::Rating => match &title.rating {
                Some(rating) => Cell {
                    value: CellValue::Decimal(rating.value()),
                    severity: self.severity.classify(rating),
                },
                None => Cell::plain(CellValue::Empty),
            },
            Column::Votes => Cell::plain(
                title
                    .rating
                    .map(|rating| CellValue::Integer(u64::from(rating.votes())))
                    .unwrap_or(CellValue::Empty),
            ),
            Column::Runtime => Cell::plain(
                title
                    .runtime_minutes
                    .map(|minutes| CellValue::Integer(u64::from(minutes)))
                    .unwrap_or(CellValue::Empty),
            ),
            Column::Genres => Cell::plain(if title.genres.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(title.genres.join(", "))
            }),
            Column::Type => Cell::plain(CellValue::Text(title.title_type.label().to_string())),
            Column::Id => Cell::plain(CellValue::Text(title.id.to_string())),
            Column::Link => Cell::plain(CellValue::Text(title.id.link())),
        }
    }
}
