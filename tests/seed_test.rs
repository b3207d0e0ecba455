//! Integration tests for seeding and the sample data files

use std::fs;

use cricbuzz_stats::{
    commands::{seed, SampleData, SeedSource},
    storage::{schema::TABLES, QueryCatalog},
    CricketDatabase, CricketError,
};

const THREE_PLAYERS: &str = r#"[
  { "id": "10", "name": "Virat Kohli", "role": "Batsman", "team": "India", "country": "India" },
  { "id": "11", "name": "Joe Root", "role": "Batsman", "team": "England", "country": "England" },
  { "id": "12", "name": "Jasprit Bumrah", "role": "Bowler", "team": "India", "country": "India",
    "formats": [ { "format": "Test", "matches": 41, "wickets": 181 } ] }
]"#;

const ONE_MATCH: &str = r#"[
  { "id": "M1", "teams": ["India", "England"], "status": "scheduled", "start_date": "2025-02-06" }
]"#;

fn row_counts(db: &CricketDatabase) -> Vec<u64> {
    TABLES.iter().map(|t| db.row_count(t).unwrap()).collect()
}

#[test]
fn test_seeding_twice_keeps_row_counts() {
    let mut db = CricketDatabase::new_in_memory().unwrap();

    let first = seed(&mut db, SeedSource::Bundled).unwrap();
    let counts = row_counts(&db);
    let second = seed(&mut db, SeedSource::Bundled).unwrap();

    assert_eq!(first, second);
    assert_eq!(row_counts(&db), counts);
    assert_eq!(db.row_count("players").unwrap(), first.players as u64);
    assert_eq!(db.row_count("matches").unwrap(), first.matches as u64);
}

#[test]
fn test_country_query_returns_only_that_country_by_name() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let sample = SampleData::from_json(THREE_PLAYERS, ONE_MATCH).unwrap();
    let report = seed(&mut db, SeedSource::Sample(sample)).unwrap();
    assert_eq!(report.players, 3);
    assert_eq!(report.format_stats, 1);
    assert_eq!(report.matches, 1);

    let rows = QueryCatalog::new(&db)
        .run(1, &["India".to_string()])
        .unwrap();
    let names: Vec<&str> = rows
        .column("name")
        .into_iter()
        .filter_map(|cell| cell.as_str())
        .collect();
    assert_eq!(names, vec!["Jasprit Bumrah", "Virat Kohli"]);
}

#[test]
fn test_load_sample_files_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("sample_players.json"), THREE_PLAYERS).unwrap();
    fs::write(dir.path().join("sample_matches.json"), ONE_MATCH).unwrap();

    let sample = SampleData::load(dir.path()).unwrap();
    assert_eq!(sample.players.len(), 3);
    assert_eq!(sample.matches.len(), 1);
    assert_eq!(sample.player_records()[1].name, "Joe Root");
}

#[test]
fn test_load_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SampleData::load(&dir.path().join("absent"));
    assert!(matches!(result, Err(CricketError::Io(_))));
}

#[test]
fn test_invalid_match_is_skipped_and_counted() {
    let bad_match = r#"[ { "id": "M2", "teams": ["India", "India"], "status": "scheduled" } ]"#;
    let sample = SampleData::from_json(THREE_PLAYERS, bad_match).unwrap();
    let mut db = CricketDatabase::new_in_memory().unwrap();

    let report = seed(&mut db, SeedSource::Sample(sample)).unwrap();
    assert_eq!(report.players, 3);
    assert_eq!(report.matches, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(db.row_count("players").unwrap(), 3);
    assert_eq!(db.row_count("matches").unwrap(), 0);
}
