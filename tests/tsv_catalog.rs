use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::tempdir;
use tokio::time::timeout;

use catalog_shell::app::bootstrap::build_shell_with;
use catalog_shell::app::console::{write_preview, ConsoleObserver};
use catalog_shell::domain::{
    models::{Partition, TitleType},
    traits::{Catalog, CatalogBuilder, ProgressSink},
    value_objects::CacheLocation,
};
use catalog_shell::error::{InitError, InitErrorKind};
use catalog_shell::infra::catalog::tsv::{
    TsvCatalogBuilder, BASICS_FILENAME, RATINGS_FILENAME, SNAPSHOT_FILENAME,
};
use catalog_shell::infra::config::AppConfig;
use catalog_shell::services::{CellValue, Column};

const RATINGS: &str = "tconst\taverageRating\tnumVotes\n\
tt0000001\t8.5\t900000\n\
tt0000002\t7.9\t350000\n\
tt0000004\t4.1\t12\n";

const BASICS: &str = "tconst\ttitleType\tprimaryTitle\toriginalTitle\tisAdult\t\
startYear\tendYear\truntimeMinutes\tgenres\n\
tt0000001\tmovie\tAlien\tAlien\t0\t1979\t\\N\t117\tHorror,Sci-Fi\n\
tt0000002\ttvSeries\tDark\tDark\t0\t2017\t2020\t60\tCrime,Drama,Mystery\n\
tt0000003\ttvEpisode\tSecrets\tSecrets\t0\t2017\t\\N\t51\tDrama\n\
tt0000004\tmovie\tB-Movie\tB-Film\t0\t\\N\t\\N\t\\N\t\\N\n\
tt0000005\ttvShort\tAdult\tAdult\t1\t2001\t\\N\t8\t\\N\n";

#[derive(Default)]
struct Recorder(Mutex<Vec<(Option<u64>, u64)>>);

impl Recorder {
    fn totals(&self) -> (u64, u64) {
        let calls = self.0.lock();
        let hints = calls.iter().filter_map(|(hint, _)| *hint).sum();
        let deltas = calls.iter().map(|(_, delta)| delta).sum();
        (hints, deltas)
    }

    fn hint_count(&self) -> usize {
        self.0.lock().iter().filter(|(hint, _)| hint.is_some()).count()
    }
}

impl ProgressSink for Recorder {
    fn report(&self, content_length: Option<u64>, delta: u64) {
        self.0.lock().push((content_length, delta));
    }
}

fn write_datasets(dir: &Path) -> u64 {
    fs::write(dir.join(RATINGS_FILENAME), RATINGS).unwrap();
    fs::write(dir.join(BASICS_FILENAME), BASICS).unwrap();
    (RATINGS.len() + BASICS.len()) as u64
}

fn location(dir: &Path) -> CacheLocation {
    CacheLocation::parse(dir.to_str().unwrap()).unwrap()
}

#[test]
fn import_reports_one_hint_per_file_and_every_byte() {
    let dir = tempdir().unwrap();
    let total = write_datasets(dir.path());
    let recorder = Recorder::default();

    let handle = TsvCatalogBuilder::default()
        .construct(&location(dir.path()), false, &recorder)
        .unwrap();

    assert_eq!(handle.entry_counts(), (3, 1));
    assert_eq!(recorder.hint_count(), 2);
    assert_eq!(recorder.totals(), (total, total));
    assert!(dir.path().join(SNAPSHOT_FILENAME).exists());

    let catalog = handle.catalog();
    let b_movie = catalog.title(Partition::Movies, 1).unwrap();
    assert_eq!(b_movie.original_title.as_deref(), Some("B-Film"));
    assert_eq!(b_movie.rating.unwrap().tenths(), 41);
    assert_eq!(catalog.title(Partition::Series, 0).unwrap().primary_title, "Dark");

    let tv_short = catalog.title(Partition::Movies, 2).unwrap();
    assert_eq!(tv_short.title_type, TitleType::TvShort);
    assert!(tv_short.is_adult);
    assert!(!b_movie.is_adult);
}

#[test]
fn fresh_snapshot_is_reused_unless_forced() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path());
    let builder = TsvCatalogBuilder::default();
    builder
        .construct(&location(dir.path()), false, &Recorder::default())
        .unwrap();

    // the snapshot alone is enough now
    fs::remove_file(dir.path().join(BASICS_FILENAME)).unwrap();
    let recorder = Recorder::default();
    let handle = builder
        .construct(&location(dir.path()), false, &recorder)
        .unwrap();
    let snapshot_len = fs::metadata(dir.path().join(SNAPSHOT_FILENAME)).unwrap().len();
    assert_eq!(handle.entry_counts(), (3, 1));
    assert_eq!(recorder.hint_count(), 1);
    assert_eq!(recorder.totals(), (snapshot_len, snapshot_len));

    let forced = builder.construct(&location(dir.path()), true, &Recorder::default());
    assert!(matches!(forced, Err(InitError::Construction(_))));
}

#[test]
fn corrupt_snapshot_falls_back_to_import() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path());
    // long enough that parsing stops before the whole file is buffered
    let corrupt = format!("{{ not json{}", " ".repeat(64 * 1024));
    fs::write(dir.path().join(SNAPSHOT_FILENAME), corrupt).unwrap();

    let recorder = Recorder::default();
    let handle = TsvCatalogBuilder::default()
        .construct(&location(dir.path()), false, &recorder)
        .unwrap();
    assert_eq!(handle.entry_counts(), (3, 1));

    // snapshot, ratings and basics hints, all fully accounted for
    assert_eq!(recorder.hint_count(), 3);
    let (hints, deltas) = recorder.totals();
    assert_eq!(hints, deltas);
}

#[test]
fn unusable_locations_are_classified() {
    let dir = tempdir().unwrap();
    let builder = TsvCatalogBuilder::default();

    let missing = builder.construct(
        &location(&dir.path().join("nope")),
        false,
        &Recorder::default(),
    );
    assert_eq!(missing.unwrap_err().kind(), InitErrorKind::InvalidCacheLocation);

    let file = dir.path().join("plain-file");
    fs::write(&file, "x").unwrap();
    let not_dir = builder.construct(&location(&file), false, &Recorder::default());
    assert_eq!(not_dir.unwrap_err().kind(), InitErrorKind::InvalidCacheLocation);

    let empty_dir = builder.construct(&location(dir.path()), false, &Recorder::default());
    assert_eq!(empty_dir.unwrap_err().kind(), InitErrorKind::ConstructionError);
}

#[test]
fn malformed_rows_fail_construction() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path());
    fs::write(dir.path().join(RATINGS_FILENAME), "tt0000001\tlots\t3\n").unwrap();

    let err = TsvCatalogBuilder::default()
        .construct(&location(dir.path()), false, &Recorder::default())
        .unwrap_err();
    match err {
        InitError::Construction(message) => assert!(message.contains(":1:"), "{message}"),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn shell_loads_binds_and_previews() {
    let dir = tempdir().unwrap();
    write_datasets(dir.path());
    let config = AppConfig::from_lookup(|name| match name {
        "CATALOG_CACHE_DIR" => Some(dir.path().to_string_lossy().into_owned()),
        "RATING_GOOD_FROM" => Some("7.5".to_string()),
        "RATING_POOR_BELOW" => Some("5".to_string()),
        _ => None,
    })
    .unwrap();
    let shell = build_shell_with(config, Arc::new(TsvCatalogBuilder::default())).unwrap();

    let events = shell.coordinator.start().unwrap();
    let mut observer = ConsoleObserver::new([shell.movies.clone(), shell.series.clone()]);
    let progress = timeout(Duration::from_secs(5), events.dispatch(&mut observer))
        .await
        .unwrap()
        .unwrap();

    assert!(observer.failure().is_none());
    assert_eq!(progress.current(), progress.maximum());
    assert_eq!(
        observer.summary().as_deref(),
        Some("Total of 3 movies and 1 series")
    );
    assert_eq!(shell.movies.row_count(), 3);
    assert_eq!(shell.series.row_count(), 1);
    assert_eq!(
        shell.series.cell(0, Column::Genres as usize).unwrap().value,
        CellValue::Text("Crime, Drama, Mystery".into())
    );

    let mut out = Vec::new();
    assert_eq!(write_preview(&mut out, &shell.movies, 10).unwrap(), 3);
    let text = String::from_utf8(out).unwrap();
    let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(first["partition"], "movies");
    assert_eq!(first["cells"]["Primary Title"]["value"], "Alien");
    assert_eq!(first["cells"]["Rating"]["severity"], "good");
}

#[tokio::test]
async fn shell_reports_missing_cache_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent");
    let config = AppConfig::from_lookup(|name| {
        (name == "CATALOG_CACHE_DIR").then(|| missing.to_string_lossy().into_owned())
    })
    .unwrap();
    let shell = build_shell_with(config, Arc::new(TsvCatalogBuilder::default())).unwrap();

    let mut observer = ConsoleObserver::new([shell.movies.clone()]);
    shell
        .coordinator
        .start()
        .unwrap()
        .dispatch(&mut observer)
        .await
        .unwrap();

    assert_eq!(
        observer.failure().map(InitError::kind),
        Some(InitErrorKind::InvalidCacheLocation)
    );
    assert!(observer.handle().is_none());
    assert!(!shell.movies.is_bound());
}
