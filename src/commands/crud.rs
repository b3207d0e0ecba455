//! Create, read, update and delete for players and matches.
//!
//! Every write is validated before it reaches the store. Deletes are
//! idempotent and never cascade: removing a player leaves its
//! `player_stats` rows in place.

use tracing::{debug, info};

use super::output::{match_line, players_table};
use crate::{
    cli::{
        types::{MatchId, PlayerId},
        MatchCmd, PlayerCmd,
    },
    error::{CricketError, EntityKind},
    storage::{
        CricketDatabase, DeleteOutcome, Match, MatchFilter, MatchUpdate, Player, PlayerFilter,
        PlayerUpdate,
    },
    Result,
};

fn check_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CricketError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn check_id(blank: bool) -> Result<()> {
    if blank {
        return Err(CricketError::validation("id", "must not be empty"));
    }
    Ok(())
}

fn check_measure(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CricketError::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(CricketError::validation(field, "must not be negative"));
    }
    Ok(())
}

/// Required fields present and numeric fields within range
pub(crate) fn validate_player(player: &Player) -> Result<()> {
    check_id(player.id.is_blank())?;
    check_text("name", &player.name)?;
    check_measure("average", player.stats.average)?;
    check_measure("strike_rate", player.stats.strike_rate)?;
    Ok(())
}

/// Two distinct named sides, and a result that refers to one of them
pub(crate) fn validate_match(m: &Match) -> Result<()> {
    check_id(m.id.is_blank())?;
    check_text("team1", &m.teams[0])?;
    check_text("team2", &m.teams[1])?;
    if m.teams[0].trim().eq_ignore_ascii_case(m.teams[1].trim()) {
        return Err(CricketError::validation("teams", "a match needs two different teams"));
    }

    if let Some(winner) = &m.winner {
        if !m.teams.iter().any(|t| t == winner) {
            return Err(CricketError::validation(
                "winner",
                format!("'{winner}' is not one of the playing teams"),
            ));
        }
    }
    if let Some(toss) = &m.toss_winner {
        if !m.teams.iter().any(|t| t == toss) {
            return Err(CricketError::validation(
                "toss_winner",
                format!("'{toss}' is not one of the playing teams"),
            ));
        }
    }
    if m.victory_margin.is_some() != m.victory_type.is_some() {
        return Err(CricketError::validation(
            "victory_margin",
            "margin and victory type must be given together",
        ));
    }
    Ok(())
}

/// CRUD operations over an open store handle
pub struct CrudService<'a> {
    db: &'a mut CricketDatabase,
}

impl<'a> CrudService<'a> {
    pub fn new(db: &'a mut CricketDatabase) -> Self {
        Self { db }
    }

    /// Validate and insert a new player, returning its id
    pub fn create_player(&mut self, player: &Player) -> Result<PlayerId> {
        validate_player(player)?;
        if self.db.get_player(&player.id)?.is_some() {
            return Err(CricketError::validation(
                "id",
                format!("player {} already exists", player.id),
            ));
        }
        self.db.insert_player(player)?;
        info!(id = %player.id, name = %player.name, "player created");
        Ok(player.id.clone())
    }

    pub fn read_player(&self, id: &PlayerId) -> Result<Player> {
        self.db
            .get_player(id)?
            .ok_or_else(|| CricketError::NotFound {
                entity: EntityKind::Player,
                id: id.to_string(),
            })
    }

    /// Apply a partial update; untouched fields keep their stored values
    pub fn update_player(&mut self, id: &PlayerId, update: PlayerUpdate) -> Result<Player> {
        let mut player = self.read_player(id)?;
        update.apply_to(&mut player);
        validate_player(&player)?;

        if !self.db.replace_player(&player)? {
            // Row vanished between read and write
            return Err(CricketError::NotFound {
                entity: EntityKind::Player,
                id: id.to_string(),
            });
        }
        info!(%id, "player updated");
        Ok(player)
    }

    pub fn delete_player(&mut self, id: &PlayerId) -> Result<DeleteOutcome> {
        let outcome = if self.db.delete_player(id)? {
            info!(%id, "player deleted");
            DeleteOutcome::Deleted
        } else {
            debug!(%id, "delete of unknown player ignored");
            DeleteOutcome::NoOp
        };
        Ok(outcome)
    }

    pub fn list_players(&self, filter: &PlayerFilter) -> Result<Vec<Player>> {
        self.db.list_players(filter)
    }

    /// Validate and insert a new match, returning its id
    pub fn create_match(&mut self, m: &Match) -> Result<MatchId> {
        validate_match(m)?;
        if self.db.get_match(&m.id)?.is_some() {
            return Err(CricketError::validation(
                "id",
                format!("match {} already exists", m.id),
            ));
        }
        self.db.insert_match(m)?;
        info!(id = %m.id, team1 = %m.teams[0], team2 = %m.teams[1], "match created");
        Ok(m.id.clone())
    }

    pub fn read_match(&self, id: &MatchId) -> Result<Match> {
        self.db.get_match(id)?.ok_or_else(|| CricketError::NotFound {
            entity: EntityKind::Match,
            id: id.to_string(),
        })
    }

    pub fn update_match(&mut self, id: &MatchId, update: MatchUpdate) -> Result<Match> {
        let mut m = self.read_match(id)?;
        update.apply_to(&mut m);
        validate_match(&m)?;

        if !self.db.replace_match(&m)? {
            return Err(CricketError::NotFound {
                entity: EntityKind::Match,
                id: id.to_string(),
            });
        }
        info!(%id, status = %m.status, "match updated");
        Ok(m)
    }

    pub fn delete_match(&mut self, id: &MatchId) -> Result<DeleteOutcome> {
        let outcome = if self.db.delete_match(id)? {
            info!(%id, "match deleted");
            DeleteOutcome::Deleted
        } else {
            debug!(%id, "delete of unknown match ignored");
            DeleteOutcome::NoOp
        };
        Ok(outcome)
    }

    pub fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>> {
        self.db.list_matches(filter)
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?); // tarpaulin::skip
    Ok(())
}

fn print_deleted(what: &str, id: &str, outcome: DeleteOutcome, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&serde_json::json!({ "id": id, "outcome": outcome }));
    }
    match outcome {
        DeleteOutcome::Deleted => println!("✓ Deleted {what} {id}"), // tarpaulin::skip
        DeleteOutcome::NoOp => println!("No {what} {id}; nothing deleted"), // tarpaulin::skip
    }
    Ok(())
}

pub fn handle_player(db: &mut CricketDatabase, cmd: PlayerCmd, as_json: bool) -> Result<()> {
    let mut crud = CrudService::new(db);
    match cmd {
        PlayerCmd::Create { id, fields } => {
            let id = crud.create_player(&fields.into_player(id))?;
            let player = crud.read_player(&id)?;
            if as_json {
                return print_json(&player);
            }
            println!("✓ Created player {id}"); // tarpaulin::skip
            print!("{}", players_table(&[player])); // tarpaulin::skip
        }
        PlayerCmd::Get { id } => {
            let player = crud.read_player(&id)?;
            let formats = crud.db.get_format_stats(&id)?;
            if as_json {
                return print_json(&serde_json::json!({ "player": player, "formats": formats }));
            }
            print!("{}", players_table(&[player])); // tarpaulin::skip
            for line in formats {
                println!(
                    "  {:<5} {:>4} m {:>6} runs {:>4} wkts",
                    line.format, line.matches, line.runs, line.wickets
                ); // tarpaulin::skip
            }
        }
        PlayerCmd::Update { id, fields } => {
            let player = crud.update_player(&id, fields.into_update())?;
            if as_json {
                return print_json(&player);
            }
            println!("✓ Updated player {id}"); // tarpaulin::skip
            print!("{}", players_table(&[player])); // tarpaulin::skip
        }
        PlayerCmd::Delete { id } => {
            let outcome = crud.delete_player(&id)?;
            print_deleted("player", id.as_str(), outcome, as_json)?;
        }
        PlayerCmd::List {
            name,
            country,
            role,
        } => {
            let players = crud.list_players(&PlayerFilter {
                name,
                country,
                role,
            })?;
            if as_json {
                return print_json(&players);
            }
            print!("{}", players_table(&players)); // tarpaulin::skip
            println!("{} player(s)", players.len()); // tarpaulin::skip
        }
    }
    Ok(())
}

pub fn handle_match(db: &mut CricketDatabase, cmd: MatchCmd, as_json: bool) -> Result<()> {
    let mut crud = CrudService::new(db);
    match cmd {
        MatchCmd::Create {
            id,
            team1,
            team2,
            fields,
        } => {
            let id = crud.create_match(&fields.into_match(id, team1, team2))?;
            let m = crud.read_match(&id)?;
            if as_json {
                return print_json(&m);
            }
            println!("✓ Created {}", match_line(&m)); // tarpaulin::skip
        }
        MatchCmd::Get { id } => {
            let m = crud.read_match(&id)?;
            if as_json {
                return print_json(&m);
            }
            println!("{}", match_line(&m)); // tarpaulin::skip
        }
        MatchCmd::Update {
            id,
            team1,
            team2,
            fields,
        } => {
            let update = MatchUpdate {
                team1,
                team2,
                ..fields.into_update()
            };
            let m = crud.update_match(&id, update)?;
            if as_json {
                return print_json(&m);
            }
            println!("✓ Updated {}", match_line(&m)); // tarpaulin::skip
        }
        MatchCmd::Delete { id } => {
            let outcome = crud.delete_match(&id)?;
            print_deleted("match", id.as_str(), outcome, as_json)?;
        }
        MatchCmd::List { team, status } => {
            let matches = crud.list_matches(&MatchFilter { team, status })?;
            if as_json {
                return print_json(&matches);
            }
            for m in &matches {
                println!("{}", match_line(m)); // tarpaulin::skip
            }
            println!("{} match(es)", matches.len()); // tarpaulin::skip
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::{MatchStatus, PlayerRole, VictoryType};
    use crate::storage::CareerStats;

    fn create_test_db() -> CricketDatabase {
        CricketDatabase::new_in_memory().unwrap()
    }

    fn sample_player(id: &str, name: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            name: name.to_string(),
            role: PlayerRole::Batsman,
            team: "India".to_string(),
            country: "India".to_string(),
            batting_style: Some("Right-hand bat".to_string()),
            bowling_style: None,
            stats: CareerStats {
                matches: 10,
                runs: 500,
                wickets: 0,
                average: 50.0,
                strike_rate: 88.5,
            },
        }
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        let err = crud.create_player(&sample_player("p1", "  ")).unwrap_err();
        match err {
            CricketError::Validation { field, .. } => assert_eq!(field, "name"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_blank_ids_are_rejected() {
        match validate_player(&sample_player(" ", "Test Player")).unwrap_err() {
            CricketError::Validation { field, .. } => assert_eq!(field, "id"),
            _ => panic!("Expected Validation error on id"),
        }
        let m = Match::scheduled(MatchId::new(""), "India", "Australia");
        match validate_match(&m).unwrap_err() {
            CricketError::Validation { field, .. } => assert_eq!(field, "id"),
            _ => panic!("Expected Validation error on id"),
        }
    }

    #[test]
    fn test_create_rejects_negative_average() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        let mut player = sample_player("p1", "Test Player");
        player.stats.average = -1.0;
        match crud.create_player(&player).unwrap_err() {
            CricketError::Validation { field, .. } => assert_eq!(field, "average"),
            _ => panic!("Expected Validation error"),
        }

        player.stats.average = f64::NAN;
        assert!(matches!(
            crud.create_player(&player),
            Err(CricketError::Validation { .. })
        ));
    }

    #[test]
    fn test_duplicate_create_is_validation_error() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        crud.create_player(&sample_player("p1", "First")).unwrap();
        match crud.create_player(&sample_player("p1", "Second")).unwrap_err() {
            CricketError::Validation { field, .. } => assert_eq!(field, "id"),
            _ => panic!("Expected Validation error on id"),
        }
        assert_eq!(crud.read_player(&PlayerId::new("p1")).unwrap().name, "First");
    }

    #[test]
    fn test_update_missing_player_is_not_found() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        let err = crud
            .update_player(&PlayerId::new("ghost"), PlayerUpdate::default())
            .unwrap_err();
        match err {
            CricketError::NotFound { entity, id } => {
                assert_eq!(entity, EntityKind::Player);
                assert_eq!(id, "ghost");
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_update_validates_result() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        crud.create_player(&sample_player("p1", "Player")).unwrap();
        let update = PlayerUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            crud.update_player(&PlayerId::new("p1"), update),
            Err(CricketError::Validation { .. })
        ));
        // Stored row unchanged
        assert_eq!(crud.read_player(&PlayerId::new("p1")).unwrap().name, "Player");
    }

    #[test]
    fn test_match_teams_must_differ() {
        let m = Match::scheduled(MatchId::new("m1"), "India", "india");
        assert!(matches!(
            validate_match(&m),
            Err(CricketError::Validation { .. })
        ));
    }

    #[test]
    fn test_match_winner_must_be_playing() {
        let mut m = Match::scheduled(MatchId::new("m1"), "India", "Australia");
        m.status = MatchStatus::Completed;
        m.winner = Some("England".to_string());
        match validate_match(&m).unwrap_err() {
            CricketError::Validation { field, .. } => assert_eq!(field, "winner"),
            _ => panic!("Expected Validation error on winner"),
        }

        m.winner = Some("India".to_string());
        m.victory_margin = Some(20);
        assert!(validate_match(&m).is_err());
        m.victory_type = Some(VictoryType::Runs);
        assert!(validate_match(&m).is_ok());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut db = create_test_db();
        let mut crud = CrudService::new(&mut db);
        let id = crud
            .create_match(&Match::scheduled(MatchId::new("m1"), "India", "Australia"))
            .unwrap();
        assert_eq!(crud.delete_match(&id).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(crud.delete_match(&id).unwrap(), DeleteOutcome::NoOp);
        assert!(matches!(
            crud.read_match(&id),
            Err(CricketError::NotFound { .. })
        ));
    }
}
