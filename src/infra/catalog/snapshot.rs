use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        models::{Partition, Title},
        traits::ProgressSink,
    },
    error::AppError,
    infra::catalog::{memory::MemoryCatalog, progress_reader::ProgressReader},
};

/// Serialized form of a built catalog, stored next to the raw dataset files.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub created_at: DateTime<Utc>,
    pub movies: Vec<Title>,
    pub series: Vec<Title>,
}

impl CatalogSnapshot {
    pub fn capture(catalog: &MemoryCatalog) -> Self {
        Self {
            created_at: Utc::now(),
            movies: catalog.titles(Partition::Movies).cloned().collect(),
            series: catalog.titles(Partition::Series).cloned().collect(),
        }
    }

    pub fn into_catalog(self) -> Result<MemoryCatalog, AppError> {
        MemoryCatalog::from_titles(self.movies.into_iter().chain(self.series))
    }

    /// Writes through a sibling temp file so a crash never leaves a truncated snapshot.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        let tmp = path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, self)
                .map_err(|err| AppError::Internal(format!("snapshot encode failed: {err}")))?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Reads a snapshot, reporting its size as a length hint and the bytes consumed as deltas.
    /// Returns `Ok(None)` when there is no snapshot at `path`.
    pub fn read(path: &Path, progress: &dyn ProgressSink) -> Result<Option<Self>, AppError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        progress.report(Some(file.metadata()?.len()), 0);
        let reader = BufReader::new(ProgressReader::new(file, progress));
        let snapshot = serde_json::from_reader(reader).map_err(|err| {
            AppError::Validation(format!("corrupt snapshot {}: {err}", path.display()))
        })?;
        Ok(Some(snapshot))
    }
}

/// Whether the file at `path` exists and was modified less than `max_age` ago.
pub fn is_fresh(path: &Path, max_age: Duration) -> Result<bool, AppError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err.into()),
    };
    let modified: DateTime<Utc> = metadata.modified()?.into();
    // a timestamp from the future counts as stale
    let age = Utc::now().signed_duration_since(modified);
    Ok(age >= Duration::zero() && age < max_age)
}
