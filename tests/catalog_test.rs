//! Integration tests for the analytical query catalog

use cricbuzz_stats::{
    commands::{seed, SeedSource},
    config::DatabaseUrl,
    storage::{catalog, QueryCatalog},
    CricketDatabase, CricketError,
};

#[test]
fn test_catalog_has_25_queries_in_order() {
    let ids: Vec<u8> = catalog().iter().map(|q| q.id).collect();
    assert_eq!(ids, (1..=25).collect::<Vec<u8>>());
}

#[test]
fn test_every_query_is_empty_on_empty_store() {
    let db = CricketDatabase::new_in_memory().unwrap();
    let queries = QueryCatalog::new(&db);
    for def in catalog() {
        let result = queries.run(def.id, &[]).unwrap();
        assert!(result.is_empty(), "query {} returned rows", def.id);
    }
}

#[test]
fn test_every_query_is_empty_without_schema() {
    let db = CricketDatabase::open_without_schema(&DatabaseUrl::Memory).unwrap();
    let queries = QueryCatalog::new(&db);
    for def in catalog() {
        let result = queries.run(def.id, &[]).unwrap();
        assert!(result.is_empty(), "query {} returned rows", def.id);
    }
}

#[test]
fn test_every_query_runs_on_seeded_store() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    seed(&mut db, SeedSource::Bundled).unwrap();
    let queries = QueryCatalog::new(&db);
    for def in catalog() {
        if let Err(e) = queries.run(def.id, &[]) {
            panic!("query {} failed: {e}", def.id);
        }
    }
}

#[test]
fn test_top_run_scorers_respects_limit() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    seed(&mut db, SeedSource::Bundled).unwrap();

    let rows = QueryCatalog::new(&db).run(4, &["3".to_string()]).unwrap();
    assert_eq!(rows.len(), 3);
    let runs: Vec<i64> = rows
        .column("runs")
        .into_iter()
        .filter_map(|cell| cell.as_i64())
        .collect();
    assert!(runs.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_unknown_query_id() {
    let db = CricketDatabase::new_in_memory().unwrap();
    assert!(matches!(
        QueryCatalog::new(&db).run(26, &[]),
        Err(CricketError::UnknownQuery { id: 26 })
    ));
}

#[test]
fn test_bad_arguments_are_rejected() {
    let db = CricketDatabase::new_in_memory().unwrap();
    let queries = QueryCatalog::new(&db);

    assert!(matches!(
        queries.run(4, &["ten".to_string()]),
        Err(CricketError::InvalidQueryArgument { .. })
    ));
    assert!(matches!(
        queries.run(3, &["extra".to_string()]),
        Err(CricketError::InvalidQueryArgument { .. })
    ));
}

#[test]
fn test_custom_sql_is_read_only() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    seed(&mut db, SeedSource::Bundled).unwrap();
    let before = db.row_count("players").unwrap();

    let queries = QueryCatalog::new(&db);
    assert!(matches!(
        queries.run_custom("DELETE FROM players"),
        Err(CricketError::ReadOnlyViolation)
    ));
    assert!(matches!(
        queries.run_custom("  "),
        Err(CricketError::InvalidQueryArgument { .. })
    ));
    let count = queries
        .run_custom("SELECT COUNT(*) AS n FROM players")
        .unwrap();
    assert_eq!(count.rows[0][0].as_i64(), Some(before as i64));
}
