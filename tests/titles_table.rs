use std::sync::Arc;

use catalog_shell::domain::{
    models::{Partition, Severity, Title, TitleType},
    value_objects::{Rating, TitleId},
    CatalogHandle,
};
use catalog_shell::infra::catalog::MemoryCatalog;
use catalog_shell::services::{
    severity::ThresholdPolicy, CellValue, Column, TitlesTable,
};

fn title(id: &str, title_type: TitleType, name: &str) -> Title {
    Title::new(TitleId::parse(id).unwrap(), title_type, name)
}

fn movies_only(count: usize) -> CatalogHandle {
    let titles = (1..=count)
        .map(|n| title(&format!("tt{n:07}"), TitleType::Movie, &format!("Movie {n}")));
    CatalogHandle::new(MemoryCatalog::from_titles(titles).unwrap())
}

#[test]
fn movies_only_catalog_fills_one_partition() {
    let handle = movies_only(12);
    assert_eq!(handle.entry_counts(), (12, 0));

    let movies = TitlesTable::new(Partition::Movies);
    let series = TitlesTable::new(Partition::Series);
    movies.bind(&handle);
    series.bind(&handle);

    assert_eq!(movies.row_count(), 12);
    assert_eq!(series.row_count(), 0);
    assert!(series.is_bound());
    assert_eq!(series.cell(0, 0), None);
}

#[test]
fn every_column_answers_for_in_range_rows() {
    let handle = movies_only(3);
    let table = TitlesTable::new(Partition::Movies);
    table.bind(&handle);

    for row in 0..table.row_count() {
        for column in 0..table.column_count() {
            assert!(table.cell(row, column).is_some(), "row {row} column {column}");
        }
        assert_eq!(table.cell(row, table.column_count()), None);
    }
    assert_eq!(table.cell(table.row_count(), 0), None);
    assert_eq!(table.cell(usize::MAX, 0), None);
}

#[test]
fn cells_reflect_title_fields() {
    let full = title("tt0078748", TitleType::Movie, "Alien")
        .with_original_title("Alien: le huitième passager")
        .with_start_year(1979)
        .with_runtime_minutes(117)
        .with_genres(["Horror", "Sci-Fi"])
        .with_rating(Rating::new(85, 950_000).unwrap());
    let bare = title("tt0000002", TitleType::TvMovie, "Untitled");
    let handle = CatalogHandle::new(MemoryCatalog::from_titles([full, bare]).unwrap());

    let table = TitlesTable::new(Partition::Movies);
    table.bind(&handle);
    let value = |row, column: Column| table.cell(row, column as usize).unwrap().value;

    assert_eq!(value(0, Column::PrimaryTitle), CellValue::Text("Alien".into()));
    assert_eq!(
        value(0, Column::OriginalTitle),
        CellValue::Text("Alien: le huitième passager".into())
    );
    assert_eq!(value(0, Column::Year), CellValue::Integer(1979));
    assert_eq!(value(0, Column::Rating), CellValue::Decimal(8.5));
    assert_eq!(value(0, Column::Votes), CellValue::Integer(950_000));
    assert_eq!(value(0, Column::Runtime), CellValue::Integer(117));
    assert_eq!(value(0, Column::Genres), CellValue::Text("Horror, Sci-Fi".into()));
    assert_eq!(value(0, Column::Type), CellValue::Text("Movie".into()));
    assert_eq!(value(0, Column::Id), CellValue::Text("tt0078748".into()));
    assert_eq!(
        value(0, Column::Link),
        CellValue::Text("https://www.imdb.com/title/tt0078748/".into())
    );

    for column in [
        Column::OriginalTitle,
        Column::Year,
        Column::Rating,
        Column::Votes,
        Column::Runtime,
        Column::Genres,
    ] {
        assert_eq!(value(1, column), CellValue::Empty, "{column:?}");
    }
    assert_eq!(value(1, Column::Type), CellValue::Text("TV Movie".into()));
}

#[test]
fn rating_cells_carry_the_policy_grade() {
    let titles = [
        title("tt0000001", TitleType::Movie, "Good").with_rating(Rating::new(81, 10).unwrap()),
        title("tt0000002", TitleType::Movie, "Fine").with_rating(Rating::new(60, 10).unwrap()),
        title("tt0000003", TitleType::Movie, "Bad").with_rating(Rating::new(32, 10).unwrap()),
        title("tt0000004", TitleType::Movie, "Unrated"),
    ];
    let handle = CatalogHandle::new(MemoryCatalog::from_titles(titles).unwrap());
    let policy = Arc::new(ThresholdPolicy::new(7.0, 5.0).unwrap());
    let graded = TitlesTable::with_severity_policy(Partition::Movies, policy);
    let plain = TitlesTable::new(Partition::Movies);
    graded.bind(&handle);
    plain.bind(&handle);

    let rating = Column::Rating as usize;
    let severities: Vec<_> = (0..4).map(|row| graded.cell(row, rating).unwrap().severity).collect();
    assert_eq!(
        severities,
        [Some(Severity::Good), Some(Severity::Medium), Some(Severity::Poor), None]
    );
    assert_eq!(plain.cell(0, rating).unwrap().severity, None);
    assert_eq!(graded.cell(0, Column::Votes as usize).unwrap().severity, None);
}

#[test]
fn rebinding_switches_catalogs() {
    let small = movies_only(2);
    let large = movies_only(7);
    let table = TitlesTable::new(Partition::Movies);

    table.bind(&small);
    assert_eq!(table.row_count(), 2);
    table.bind(&large);
    assert_eq!(table.row_count(), 7);
    table.bind(&large);
    assert_eq!(table.row_count(), 7);
}

#[test]
fn dropping_the_handle_unbinds_the_table() {
    let table = TitlesTable::new(Partition::Movies);
    {
        let handle = movies_only(4);
        table.bind(&handle);
        assert_eq!(table.row_count(), 4);
    }
    assert!(!table.is_bound());
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.cell(0, 0), None);
    assert_eq!(table.header(0), Some("Primary Title"));
}
