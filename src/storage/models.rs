//! Data models for the storage layer

use crate::cli::types::{MatchFormat, MatchId, MatchStatus, PlayerId, PlayerRole, VictoryType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Career aggregates stored alongside each player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub strike_rate: f64,
}

/// Player information stored in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: PlayerRole,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub batting_style: Option<String>,
    #[serde(default)]
    pub bowling_style: Option<String>,
    #[serde(default)]
    pub stats: CareerStats,
}

/// Career line for one player in one format (`player_stats` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatStats {
    pub format: MatchFormat,
    #[serde(default)]
    pub matches: u32,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default)]
    pub centuries: u32,
    #[serde(default)]
    pub fifties: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub economy: Option<f64>,
}

/// A fixture or result between two sides.
///
/// Team names are plain text; nothing enforces that they match any player's
/// `team` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub teams: [String; 2],
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub format: Option<MatchFormat>,
    pub status: MatchStatus,
    #[serde(default)]
    pub score_summary: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub victory_margin: Option<u32>,
    #[serde(default)]
    pub victory_type: Option<VictoryType>,
    #[serde(default)]
    pub toss_winner: Option<String>,
    #[serde(default)]
    pub toss_decision: Option<String>,
}

impl Match {
    /// A bare fixture with only the required fields set
    pub fn scheduled(id: MatchId, team1: impl Into<String>, team2: impl Into<String>) -> Self {
        Self {
            id,
            teams: [team1.into(), team2.into()],
            venue: None,
            city: None,
            start_date: None,
            format: None,
            status: MatchStatus::Scheduled,
            score_summary: None,
            winner: None,
            victory_margin: None,
            victory_type: None,
            toss_winner: None,
            toss_decision: None,
        }
    }
}

/// Partial update for a player; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub role: Option<PlayerRole>,
    pub team: Option<String>,
    pub country: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub matches: Option<u32>,
    pub runs: Option<u32>,
    pub wickets: Option<u32>,
    pub average: Option<f64>,
    pub strike_rate: Option<f64>,
}

impl PlayerUpdate {
    pub fn apply_to(self, player: &mut Player) {
        if let Some(name) = self.name {
            player.name = name;
        }
        if let Some(role) = self.role {
            player.role = role;
        }
        if let Some(team) = self.team {
            player.team = team;
        }
        if let Some(country) = self.country {
            player.country = country;
        }
        if let Some(style) = self.batting_style {
            player.batting_style = Some(style);
        }
        if let Some(style) = self.bowling_style {
            player.bowling_style = Some(style);
        }
        if let Some(matches) = self.matches {
            player.stats.matches = matches;
        }
        if let Some(runs) = self.runs {
            player.stats.runs = runs;
        }
        if let Some(wickets) = self.wickets {
            player.stats.wickets = wickets;
        }
        if let Some(average) = self.average {
            player.stats.average = average;
        }
        if let Some(strike_rate) = self.strike_rate {
            player.stats.strike_rate = strike_rate;
        }
    }
}

/// Partial update for a match; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub format: Option<MatchFormat>,
    pub status: Option<MatchStatus>,
    pub score_summary: Option<String>,
    pub winner: Option<String>,
    pub victory_margin: Option<u32>,
    pub victory_type: Option<VictoryType>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,
}

impl MatchUpdate {
    pub fn status(status: MatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(self, m: &mut Match) {
        if let Some(team1) = self.team1 {
            m.teams[0] = team1;
        }
        if let Some(team2) = self.team2 {
            m.teams[1] = team2;
        }
        if self.venue.is_some() {
            m.venue = self.venue;
        }
        if self.city.is_some() {
            m.city = self.city;
        }
        if self.start_date.is_some() {
            m.start_date = self.start_date;
        }
        if self.format.is_some() {
            m.format = self.format;
        }
        if let Some(status) = self.status {
            m.status = status;
        }
        if self.score_summary.is_some() {
            m.score_summary = self.score_summary;
        }
        if self.winner.is_some() {
            m.winner = self.winner;
        }
        if self.victory_margin.is_some() {
            m.victory_margin = self.victory_margin;
        }
        if self.victory_type.is_some() {
            m.victory_type = self.victory_type;
        }
        if self.toss_winner.is_some() {
            m.toss_winner = self.toss_winner;
        }
        if self.toss_decision.is_some() {
            m.toss_decision = self.toss_decision;
        }
    }
}

/// Listing filter for players (case-insensitive substring matches)
#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub country: Option<String>,
    pub role: Option<PlayerRole>,
}

/// Listing filter for matches
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub team: Option<String>,
    pub status: Option<MatchStatus>,
}

/// Outcome of a delete; deleting a missing row is not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    Deleted,
    NoOp,
}
