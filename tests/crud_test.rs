//! Integration tests for player and match CRUD

use chrono::NaiveDate;
use cricbuzz_stats::{
    commands::CrudService,
    storage::{CareerStats, DeleteOutcome, MatchFilter, MatchUpdate, PlayerUpdate},
    CricketDatabase, CricketError, Match, MatchFormat, MatchId, MatchStatus, Player, PlayerId,
    PlayerRole,
};

fn kohli() -> Player {
    Player {
        id: PlayerId::new("1413"),
        name: "Virat Kohli".to_string(),
        role: PlayerRole::Batsman,
        team: "India".to_string(),
        country: "India".to_string(),
        batting_style: Some("Right-hand bat".to_string()),
        bowling_style: None,
        stats: CareerStats {
            matches: 295,
            runs: 13906,
            wickets: 5,
            average: 58.18,
            strike_rate: 93.54,
        },
    }
}

fn fixture_m100() -> Match {
    let mut m = Match::scheduled(MatchId::new("M100"), "India", "Australia");
    m.venue = Some("Wankhede Stadium".to_string());
    m.city = Some("Mumbai".to_string());
    m.start_date = NaiveDate::from_ymd_opt(2025, 1, 12);
    m.format = Some(MatchFormat::Odi);
    m
}

#[test]
fn test_player_create_then_read_returns_same_record() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);

    let id = crud.create_player(&kohli()).unwrap();
    assert_eq!(id, PlayerId::new("1413"));
    assert_eq!(crud.read_player(&id).unwrap(), kohli());
}

#[test]
fn test_player_create_rejects_duplicates_and_bad_fields() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    crud.create_player(&kohli()).unwrap();

    assert!(matches!(
        crud.create_player(&kohli()),
        Err(CricketError::Validation { .. })
    ));

    let mut nameless = kohli();
    nameless.id = PlayerId::new("2");
    nameless.name = "   ".to_string();
    assert!(matches!(
        crud.create_player(&nameless),
        Err(CricketError::Validation { .. })
    ));
    assert_eq!(crud.list_players(&Default::default()).unwrap().len(), 1);
}

#[test]
fn test_player_update_changes_only_given_fields() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    let id = crud.create_player(&kohli()).unwrap();

    let updated = crud
        .update_player(
            &id,
            PlayerUpdate {
                runs: Some(14000),
                ..Default::default()
            },
        )
        .unwrap();

    let mut expected = kohli();
    expected.stats.runs = 14000;
    assert_eq!(updated, expected);
    assert_eq!(crud.read_player(&id).unwrap(), expected);
}

#[test]
fn test_player_delete_then_read_is_not_found() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    let id = crud.create_player(&kohli()).unwrap();

    assert_eq!(crud.delete_player(&id).unwrap(), DeleteOutcome::Deleted);
    assert!(matches!(
        crud.read_player(&id),
        Err(CricketError::NotFound { .. })
    ));
    // Deleting again is a no-op, not an error
    assert_eq!(crud.delete_player(&id).unwrap(), DeleteOutcome::NoOp);
}

#[test]
fn test_update_missing_player_is_not_found() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    let result = crud.update_player(&PlayerId::new("404"), PlayerUpdate::default());
    assert!(matches!(result, Err(CricketError::NotFound { .. })));
}

#[test]
fn test_match_status_update_leaves_other_fields() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);

    let id = crud.create_match(&fixture_m100()).unwrap();
    assert_eq!(id.as_str(), "M100");

    let before = crud.read_match(&id).unwrap();
    assert_eq!(before, fixture_m100());
    assert_eq!(before.status, MatchStatus::Scheduled);

    let after = crud
        .update_match(&id, MatchUpdate::status(MatchStatus::Completed))
        .unwrap();
    assert_eq!(after.status, MatchStatus::Completed);

    let mut expected = fixture_m100();
    expected.status = MatchStatus::Completed;
    assert_eq!(crud.read_match(&id).unwrap(), expected);
}

#[test]
fn test_match_update_is_validated() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    let id = crud.create_match(&fixture_m100()).unwrap();

    let result = crud.update_match(
        &id,
        MatchUpdate {
            winner: Some("England".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(CricketError::Validation { .. })));
    assert_eq!(crud.read_match(&id).unwrap(), fixture_m100());
}

#[test]
fn test_match_create_rejects_same_team_twice() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    let m = Match::scheduled(MatchId::new("M1"), "India", "india");
    assert!(matches!(
        crud.create_match(&m),
        Err(CricketError::Validation { .. })
    ));
}

#[test]
fn test_match_delete_and_list() {
    let mut db = CricketDatabase::new_in_memory().unwrap();
    let mut crud = CrudService::new(&mut db);
    crud.create_match(&fixture_m100()).unwrap();
    crud.create_match(&Match::scheduled(MatchId::new("M101"), "England", "Pakistan"))
        .unwrap();

    let india = crud
        .list_matches(&MatchFilter {
            team: Some("India".to_string()),
            status: None,
        })
        .unwrap();
    assert_eq!(india.len(), 1);

    let id = MatchId::new("M100");
    assert_eq!(crud.delete_match(&id).unwrap(), DeleteOutcome::Deleted);
    assert!(matches!(
        crud.read_match(&id),
        Err(CricketError::NotFound { .. })
    ));
    assert_eq!(crud.delete_match(&id).unwrap(), DeleteOutcome::NoOp);
    assert_eq!(crud.list_matches(&MatchFilter::default()).unwrap().len(), 1);
}
