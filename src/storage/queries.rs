//! Basic database query operations

use super::{models::*, schema::CricketDatabase};
use crate::cli::types::{MatchId, PlayerId};
use crate::error::{CricketError, Result};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, OptionalExtension, Row, ToSql};
use std::str::FromStr;

const PLAYER_COLUMNS: &str = "id, name, role, team, country, batting_style, bowling_style,
     matches, runs, wickets, average, strike_rate";

const MATCH_COLUMNS: &str = "id, team1, team2, venue, city, start_date, format, status,
     score_summary, winner, victory_margin, victory_type, toss_winner, toss_decision";

impl CricketDatabase {
    /// Insert or update a player's information, keyed by id
    pub fn upsert_player(&mut self, player: &Player) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO players (id, name, role, team, country, batting_style, bowling_style,
                                      matches, runs, wickets, average, strike_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    role = excluded.role,
                    team = excluded.team,
                    country = excluded.country,
                    batting_style = excluded.batting_style,
                    bowling_style = excluded.bowling_style,
                    matches = excluded.matches,
                    runs = excluded.runs,
                    wickets = excluded.wickets,
                    average = excluded.average,
                    strike_rate = excluded.strike_rate",
                params_from_iter(player_params(player).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// Insert or refresh a player known only from a ranking table.
    ///
    /// An existing row keeps its role, styles and career stats; only the name
    /// and a non-empty country are taken from `player`, and the team is filled
    /// in when it was blank.
    pub fn upsert_ranked_player(&mut self, player: &Player) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO players (id, name, role, team, country, batting_style, bowling_style,
                                      matches, runs, wickets, average, strike_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    country = CASE WHEN excluded.country <> '' THEN excluded.country
                                   ELSE players.country END,
                    team = CASE WHEN players.team = '' THEN excluded.team
                                ELSE players.team END",
                params_from_iter(player_params(player).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// Insert a new player; fails if the id is already taken
    pub fn insert_player(&mut self, player: &Player) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO players (id, name, role, team, country, batting_style, bowling_style,
                                      matches, runs, wickets, average, strike_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params_from_iter(player_params(player).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// Overwrite an existing player row; returns false if no row matched
    pub fn replace_player(&mut self, player: &Player) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE players SET name = ?2, role = ?3, team = ?4, country = ?5,
                        batting_style = ?6, bowling_style = ?7, matches = ?8, runs = ?9,
                        wickets = ?10, average = ?11, strike_rate = ?12
                 WHERE id = ?1",
                params_from_iter(player_params(player).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(rows_affected > 0)
    }

    /// Get a player by id
    pub fn get_player(&self, id: &PlayerId) -> Result<Option<Player>> {
        self.conn
            .query_row(
                &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"),
                params![id.as_str()],
                row_to_player,
            )
            .optional()
            .map_err(CricketError::read)
    }

    /// Delete a player; returns false if there was nothing to delete
    pub fn delete_player(&mut self, id: &PlayerId) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM players WHERE id = ?1", params![id.as_str()])
            .map_err(CricketError::write)?;
        Ok(rows_affected > 0)
    }

    /// List players matching the filter, ordered by name
    pub fn list_players(&self, filter: &PlayerFilter) -> Result<Vec<Player>> {
        let mut query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE 1 = 1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = filter.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push_str(" AND name LIKE ? COLLATE NOCASE");
            params.push(Box::new(format!("%{}%", name)));
        }
        if let Some(country) = filter
            .country
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query.push_str(" AND country LIKE ? COLLATE NOCASE");
            params.push(Box::new(format!("%{}%", country)));
        }
        if let Some(role) = filter.role {
            query.push_str(" AND role = ?");
            params.push(Box::new(role.as_str()));
        }
        query.push_str(" ORDER BY name, id");

        let mut stmt = self.conn.prepare(&query).map_err(CricketError::read)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(&param_refs[..], row_to_player)
            .map_err(CricketError::read)?;

        let mut players = Vec::new();
        for row in rows {
            players.push(row.map_err(CricketError::read)?);
        }
        Ok(players)
    }

    /// Insert or update a match, keyed by id
    pub fn upsert_match(&mut self, m: &Match) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO matches (id, team1, team2, venue, city, start_date, format, status,
                                      score_summary, winner, victory_margin, victory_type,
                                      toss_winner, toss_decision)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 ON CONFLICT(id) DO UPDATE SET
                    team1 = excluded.team1,
                    team2 = excluded.team2,
                    venue = excluded.venue,
                    city = excluded.city,
                    start_date = excluded.start_date,
                    format = excluded.format,
                    status = excluded.status,
                    score_summary = excluded.score_summary,
                    winner = excluded.winner,
                    victory_margin = excluded.victory_margin,
                    victory_type = excluded.victory_type,
                    toss_winner = excluded.toss_winner,
                    toss_decision = excluded.toss_decision",
                params_from_iter(match_params(m).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// Insert a new match; fails if the id is already taken
    pub fn insert_match(&mut self, m: &Match) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO matches (id, team1, team2, venue, city, start_date, format, status,
                                      score_summary, winner, victory_margin, victory_type,
                                      toss_winner, toss_decision)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params_from_iter(match_params(m).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// Overwrite an existing match row; returns false if no row matched
    pub fn replace_match(&mut self, m: &Match) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE matches SET team1 = ?2, team2 = ?3, venue = ?4, city = ?5,
                        start_date = ?6, format = ?7, status = ?8, score_summary = ?9,
                        winner = ?10, victory_margin = ?11, victory_type = ?12,
                        toss_winner = ?13, toss_decision = ?14
                 WHERE id = ?1",
                params_from_iter(match_params(m).iter()),
            )
            .map_err(CricketError::write)?;
        Ok(rows_affected > 0)
    }

    /// Get a match by id
    pub fn get_match(&self, id: &MatchId) -> Result<Option<Match>> {
        self.conn
            .query_row(
                &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
                params![id.as_str()],
                row_to_match,
            )
            .optional()
            .map_err(CricketError::read)
    }

    /// Delete a match; returns false if there was nothing to delete
    pub fn delete_match(&mut self, id: &MatchId) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM matches WHERE id = ?1", params![id.as_str()])
            .map_err(CricketError::write)?;
        Ok(rows_affected > 0)
    }

    /// List matches matching the filter, most recent first
    pub fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>> {
        let mut query = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE 1 = 1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(team) = filter.team.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push_str(" AND (team1 LIKE ? COLLATE NOCASE OR team2 LIKE ? COLLATE NOCASE)");
            let pattern = format!("%{}%", team);
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }
        if let Some(status) = filter.status {
            query.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }
        query.push_str(" ORDER BY start_date IS NULL, start_date DESC, id");

        let mut stmt = self.conn.prepare(&query).map_err(CricketError::read)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(&param_refs[..], row_to_match)
            .map_err(CricketError::read)?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row.map_err(CricketError::read)?);
        }
        Ok(matches)
    }

    /// Insert or update one player's career line for a format
    pub fn upsert_format_stats(&mut self, player_id: &PlayerId, stats: &FormatStats) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO player_stats (player_id, format, matches, runs, average, strike_rate,
                                           centuries, fifties, wickets, economy)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(player_id, format) DO UPDATE SET
                    matches = excluded.matches,
                    runs = excluded.runs,
                    average = excluded.average,
                    strike_rate = excluded.strike_rate,
                    centuries = excluded.centuries,
                    fifties = excluded.fifties,
                    wickets = excluded.wickets,
                    economy = excluded.economy",
                params![
                    player_id.as_str(),
                    stats.format.as_str(),
                    stats.matches,
                    stats.runs,
                    stats.average,
                    stats.strike_rate,
                    stats.centuries,
                    stats.fifties,
                    stats.wickets,
                    stats.economy,
                ],
            )
            .map_err(CricketError::write)?;
        Ok(())
    }

    /// All per-format career lines for a player
    pub fn get_format_stats(&self, player_id: &PlayerId) -> Result<Vec<FormatStats>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT format, matches, runs, average, strike_rate, centuries, fifties,
                        wickets, economy
                 FROM player_stats
                 WHERE player_id = ?1
                 ORDER BY format",
            )
            .map_err(CricketError::read)?;

        let rows = stmt
            .query_map(params![player_id.as_str()], |row| {
                Ok(FormatStats {
                    format: parse_column(row, 0)?,
                    matches: row.get(1)?,
                    runs: row.get(2)?,
                    average: row.get(3)?,
                    strike_rate: row.get(4)?,
                    centuries: row.get(5)?,
                    fifties: row.get(6)?,
                    wickets: row.get(7)?,
                    economy: row.get(8)?,
                })
            })
            .map_err(CricketError::read)?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row.map_err(CricketError::read)?);
        }
        Ok(stats)
    }
}

fn player_params(player: &Player) -> Vec<Box<dyn ToSql + '_>> {
    vec![
        Box::new(player.id.as_str()),
        Box::new(player.name.as_str()),
        Box::new(player.role.as_str()),
        Box::new(player.team.as_str()),
        Box::new(player.country.as_str()),
        Box::new(player.batting_style.as_deref()),
        Box::new(player.bowling_style.as_deref()),
        Box::new(player.stats.matches),
        Box::new(player.stats.runs),
        Box::new(player.stats.wickets),
        Box::new(player.stats.average),
        Box::new(player.stats.strike_rate),
    ]
}

fn match_params(m: &Match) -> Vec<Box<dyn ToSql + '_>> {
    vec![
        Box::new(m.id.as_str()),
        Box::new(m.teams[0].as_str()),
        Box::new(m.teams[1].as_str()),
        Box::new(m.venue.as_deref()),
        Box::new(m.city.as_deref()),
        Box::new(m.start_date.map(|d| d.to_string())),
        Box::new(m.format.map(|f| f.as_str())),
        Box::new(m.status.as_str()),
        Box::new(m.score_summary.as_deref()),
        Box::new(m.winner.as_deref()),
        Box::new(m.victory_margin),
        Box::new(m.victory_type.map(|v| v.as_str())),
        Box::new(m.toss_winner.as_deref()),
        Box::new(m.toss_decision.as_deref()),
    ]
}

fn row_to_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: PlayerId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        role: parse_column(row, 2)?,
        team: row.get(3)?,
        country: row.get(4)?,
        batting_style: row.get(5)?,
        bowling_style: row.get(6)?,
        stats: CareerStats {
            matches: row.get(7)?,
            runs: row.get(8)?,
            wickets: row.get(9)?,
            average: row.get(10)?,
            strike_rate: row.get(11)?,
        },
    })
}

fn row_to_match(row: &Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: MatchId::new(row.get::<_, String>(0)?),
        teams: [row.get(1)?, row.get(2)?],
        venue: row.get(3)?,
        city: row.get(4)?,
        start_date: parse_optional_column(row, 5)?,
        format: parse_optional_column(row, 6)?,
        status: parse_column(row, 7)?,
        score_summary: row.get(8)?,
        winner: row.get(9)?,
        victory_margin: row.get(10)?,
        victory_type: parse_optional_column(row, 11)?,
        toss_winner: row.get(12)?,
        toss_decision: row.get(13)?,
    })
}

/// Read a text column and parse it into a domain type
fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_column<T>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse::<T>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}
