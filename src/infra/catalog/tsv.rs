use std::{
    collections::HashMap,
    fmt::Display,
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::Path,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        catalog_handle::CatalogHandle,
        models::{Title, TitleType},
        traits::{Catalog, CatalogBuilder, ProgressSink},
        value_objects::{CacheLocation, Rating, TitleId},
    },
    error::{AppError, InitError},
    infra::catalog::{
        memory::MemoryCatalog,
        progress_reader::ProgressReader,
        snapshot::{self, CatalogSnapshot},
    },
};

pub const BASICS_FILENAME: &str = "title.basics.tsv";
pub const RATINGS_FILENAME: &str = "title.ratings.tsv";
pub const SNAPSHOT_FILENAME: &str = "catalog.snapshot.json";
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

const NOT_AVAILABLE: &str = "\\N";
const HEADER_PREFIX: &str = "tconst";

/// Builds a catalog from the tab-separated dataset files found in the cache directory,
/// keeping a JSON snapshot next to them so later starts skip the import.
#[derive(Debug, Clone)]
pub struct TsvCatalogBuilder {
    max_age: Duration,
}

impl Default for TsvCatalogBuilder {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_MAX_AGE_DAYS))
    }
}

impl TsvCatalogBuilder {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    fn load_snapshot(&self, path: &Path, progress: &dyn ProgressSink) -> Option<MemoryCatalog> {
        match snapshot::is_fresh(path, self.max_age) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %path.display(), "catalog snapshot missing or stale");
                return None;
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot inspect catalog snapshot");
                return None;
            }
        }

        let tally = TallySink::new(progress);
        let loaded = CatalogSnapshot::read(path, &tally)
            .and_then(|snapshot| snapshot.map(CatalogSnapshot::into_catalog).transpose());
        match loaded {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unusable catalog snapshot");
                // the import adds its own hints; close out the part of the snapshot left unread
                let unread = tally.unread();
                if unread > 0 {
                    progress.report(None, unread);
                }
                None
            }
        }
    }
}

/// Passes reports through while counting hinted and consumed bytes.
struct TallySink<'a> {
    inner: &'a dyn ProgressSink,
    hinted: AtomicU64,
    consumed: AtomicU64,
}

impl<'a> TallySink<'a> {
    fn new(inner: &'a dyn ProgressSink) -> Self {
        Self {
            inner,
            hinted: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
        }
    }

    fn unread(&self) -> u64 {
        self.hinted
            .load(Ordering::Relaxed)
            .saturating_sub(self.consumed.load(Ordering::Relaxed))
    }
}

impl ProgressSink for TallySink<'_> {
    fn report(&self, content_length: Option<u64>, delta: u64) {
        if let Some(added) = content_length {
            self.hinted.fetch_add(added, Ordering::Relaxed);
        }
        self.consumed.fetch_add(delta, Ordering::Relaxed);
        self.inner.report(content_length, delta);
    }
}

impl CatalogBuilder for TsvCatalogBuilder {
    fn construct(
        &self,
        location: &CacheLocation,
        force_refresh: bool,
        progress: &dyn ProgressSink,
    ) -> Result<CatalogHandle, InitError> {
        let dir = location.as_path();
        match fs::metadata(dir) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(InitError::InvalidCacheLocation(format!(
                    "`{location}` is not a directory"
                )))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(InitError::InvalidCacheLocation(format!(
                    "`{location}` does not exist"
                )))
            }
            Err(err) => {
                return Err(InitError::Construction(format!(
                    "cannot inspect `{location}`: {err}"
                )))
            }
        }

        let snapshot_path = dir.join(SNAPSHOT_FILENAME);
        let started = Instant::now();

        if force_refresh {
            debug!("force refresh requested, rebuilding catalog from dataset files");
        } else if let Some(catalog) = self.load_snapshot(&snapshot_path, progress) {
            let (movies, series) = catalog.entry_counts();
            info!(
                movies,
                series,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "loaded catalog snapshot"
            );
            return Ok(CatalogHandle::new(catalog));
        }

        let catalog = import_datasets(dir, progress)?;
        let (movies, series) = catalog.entry_counts();
        info!(
            movies,
            series,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "imported catalog datasets"
        );

        if let Err(err) = CatalogSnapshot::capture(&catalog).write(&snapshot_path) {
            warn!(path = %snapshot_path.display(), error = %err, "cannot write catalog snapshot");
        }

        Ok(CatalogHandle::new(catalog))
    }
}

/// Imports the ratings file, then the basics file, from `dir`.
pub fn import_datasets(
    dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<MemoryCatalog, InitError> {
    let mut ratings = HashMap::new();
    for_each_row(&dir.join(RATINGS_FILENAME), progress, |line| {
        let (id, rating) = parse_rating_row(line)?;
        if ratings.insert(id.clone(), rating).is_some() {
            return Err(AppError::Conflict(format!("duplicate rating for {id}")));
        }
        Ok(())
    })?;

    let mut catalog = MemoryCatalog::new();
    for_each_row(&dir.join(BASICS_FILENAME), progress, |line| {
        if let Some(title) = parse_basics_row(line, &ratings)? {
            catalog.insert(title)?;
        }
        Ok(())
    })?;

    Ok(catalog)
}

fn for_each_row<F>(path: &Path, progress: &dyn ProgressSink, mut on_row: F) -> Result<(), InitError>
where
    F: FnMut(&str) -> Result<(), AppError>,
{
    let file = File::open(path).map_err(|err| {
        InitError::Construction(format!("cannot open {}: {err}", path.display()))
    })?;
    let len = file
        .metadata()
        .map_err(|err| InitError::Construction(format!("cannot stat {}: {err}", path.display())))?
        .len();
    progress.report(Some(len), 0);

    let reader = BufReader::new(ProgressReader::new(file, progress));
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            InitError::Construction(format!("{}:{}: {err}", path.display(), index + 1))
        })?;
        if line.is_empty() || (index == 0 && line.starts_with(HEADER_PREFIX)) {
            continue;
        }
        on_row(&line).map_err(|err| {
            InitError::Construction(format!("{}:{}: {err}", path.display(), index + 1))
        })?;
    }
    Ok(())
}

/// `tconst  averageRating  numVotes`
pub fn parse_rating_row(line: &str) -> Result<(TitleId, Rating), AppError> {
    let mut columns = line.split('\t');
    let id = TitleId::parse(next_column(&mut columns, "tconst")?)?;
    let average = next_column(&mut columns, "averageRating")?;
    let votes = next_column(&mut columns, "numVotes")?;
    Ok((id, Rating::parse(average, votes)?))
}

/// `tconst  titleType  primaryTitle  originalTitle  isAdult  startYear  endYear`
/// `runtimeMinutes  genres`
///
/// Returns `Ok(None)` for types that are neither movies nor series.
pub fn parse_basics_row(
    line: &str,
    ratings: &HashMap<TitleId, Rating>,
) -> Result<Option<Title>, AppError> {
    let mut columns = line.split('\t');
    let id = TitleId::parse(next_column(&mut columns, "tconst")?)?;
    let title_type: TitleType = next_column(&mut columns, "titleType")?.parse()?;
    if title_type.partition().is_none() {
        return Ok(None);
    }

    let primary_title = next_column(&mut columns, "primaryTitle")?;
    let original_title = next_column(&mut columns, "originalTitle")?;
    let is_adult = match next_column(&mut columns, "isAdult")? {
        "0" => false,
        "1" => true,
        other => {
            return Err(AppError::Validation(format!(
                "isAdult must be 0 or 1, got `{other}`"
            )))
        }
    };
    let start_year: Option<u16> = optional(next_column(&mut columns, "startYear")?, "startYear")?;
    let _end_year: Option<u16> = optional(next_column(&mut columns, "endYear")?, "endYear")?;
    let runtime: Option<u16> =
        optional(next_column(&mut columns, "runtimeMinutes")?, "runtimeMinutes")?;
    let genres = match next_column(&mut columns, "genres")? {
        NOT_AVAILABLE | "" => Vec::new(),
        genres => genres.split(',').map(str::to_string).collect(),
    };

    let mut title = Title::new(id, title_type, primary_title)
        .with_original_title(original_title)
        .with_genres(genres)
        .with_adult(is_adult);
    title.start_year = start_year;
    title.runtime_minutes = runtime;
    title.rating = ratings.get(&title.id).copied();
    Ok(Some(title))
}

fn next_column<'a>(
    columns: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<&'a str, AppError> {
    columns
        .next()
        .ok_or_else(|| AppError::Validation(format!("missing column {name}")))
}

fn optional<T>(value: &str, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    if value == NOT_AVAILABLE {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|err| AppError::Validation(format!("invalid {name} `{value}`: {err}")))
}
