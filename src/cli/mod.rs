//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use types::{MatchFormat, MatchId, MatchStatus, PlayerId, PlayerRole, VictoryType};

use crate::cricbuzz::RankingCategory;
use crate::storage::{CareerStats, Match, MatchUpdate, Player, PlayerUpdate};

#[derive(Debug, Parser)]
#[clap(
    name = "cricbuzz-stats",
    about = "Cricket scores, rankings and analytics backed by a local store",
    version
)]
pub struct Cli {
    /// Output results as JSON instead of text lines.
    #[clap(long, global = true)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// API reachability and row counts for every table
    Overview,

    /// Live matches, or upcoming/recent ones.
    ///
    /// Falls back to stored matches, then to the bundled sample, when the API
    /// cannot be reached.
    Live {
        /// Show upcoming fixtures instead of live matches
        #[clap(long, conflicts_with = "recent")]
        upcoming: bool,

        /// Show recently completed matches
        #[clap(long)]
        recent: bool,
    },

    /// Top players from the ICC ranking tables
    Players {
        /// Ranking table to read
        #[clap(long, value_enum, default_value_t = RankingCategory::Batsmen)]
        category: RankingCategory,

        /// Format of the ranking table (test, odi, t20i)
        #[clap(long, default_value_t = MatchFormat::Odi)]
        format: MatchFormat,
    },

    /// Run analytics queries against the store
    Query {
        #[clap(subcommand)]
        cmd: QueryCmd,
    },

    /// Create, read, update, delete and list players
    Player {
        #[clap(subcommand)]
        cmd: PlayerCmd,
    },

    /// Create, read, update, delete and list matches
    Match {
        #[clap(subcommand)]
        cmd: MatchCmd,
    },

    /// Load players and matches into the store.
    ///
    /// Uses the bundled sample unless `--live` or `--from` is given. Safe to
    /// run repeatedly; records are upserted by id.
    Seed {
        /// Seed from the live API (matches plus ranking tables)
        #[clap(long, conflicts_with = "from")]
        live: bool,

        /// Directory containing sample_players.json and sample_matches.json
        #[clap(long)]
        from: Option<PathBuf>,

        /// Ranking format used with `--live`
        #[clap(long, default_value_t = MatchFormat::Odi)]
        format: MatchFormat,

        /// Remove all stored rows first
        #[clap(long)]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum QueryCmd {
    /// List every catalog query with its parameters
    List,

    /// Run a catalog query by number; missing arguments take their defaults
    Run {
        id: u8,

        /// Positional query arguments, in the order `query list` shows
        args: Vec<String>,
    },

    /// Run an ad-hoc read-only SQL statement
    Sql { sql: String },
}

/// Player fields settable from the command line
#[derive(Debug, Args, Default)]
pub struct PlayerFields {
    #[clap(long)]
    pub name: Option<String>,
    /// Batsman, Bowler, All-rounder or Wicket-keeper
    #[clap(long)]
    pub role: Option<PlayerRole>,
    #[clap(long)]
    pub team: Option<String>,
    #[clap(long)]
    pub country: Option<String>,
    #[clap(long)]
    pub batting_style: Option<String>,
    #[clap(long)]
    pub bowling_style: Option<String>,
    #[clap(long)]
    pub matches: Option<u32>,
    #[clap(long)]
    pub runs: Option<u32>,
    #[clap(long)]
    pub wickets: Option<u32>,
    #[clap(long)]
    pub average: Option<f64>,
    #[clap(long)]
    pub strike_rate: Option<f64>,
}

impl PlayerFields {
    pub fn into_update(self) -> PlayerUpdate {
        PlayerUpdate {
            name: self.name,
            role: self.role,
            team: self.team,
            country: self.country,
            batting_style: self.batting_style,
            bowling_style: self.bowling_style,
            matches: self.matches,
            runs: self.runs,
            wickets: self.wickets,
            average: self.average,
            strike_rate: self.strike_rate,
        }
    }

    /// A new player record; unset fields are blank or zero
    pub fn into_player(self, id: PlayerId) -> Player {
        let mut player = Player {
            id,
            name: String::new(),
            role: PlayerRole::Batsman,
            team: String::new(),
            country: String::new(),
            batting_style: None,
            bowling_style: None,
            stats: CareerStats::default(),
        };
        self.into_update().apply_to(&mut player);
        player
    }
}

#[derive(Debug, Subcommand)]
pub enum PlayerCmd {
    /// Add a player; fails if the id is taken
    Create {
        id: PlayerId,
        #[clap(flatten)]
        fields: PlayerFields,
    },
    Get {
        id: PlayerId,
    },
    /// Change only the given fields
    Update {
        id: PlayerId,
        #[clap(flatten)]
        fields: PlayerFields,
    },
    /// Remove a player; removing an unknown id is a no-op
    Delete {
        id: PlayerId,
    },
    List {
        /// Name contains (case-insensitive)
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        country: Option<String>,
        #[clap(long)]
        role: Option<PlayerRole>,
    },
}

/// Match fields settable from the command line
#[derive(Debug, Args, Default)]
pub struct MatchFields {
    #[clap(long)]
    pub venue: Option<String>,
    #[clap(long)]
    pub city: Option<String>,
    /// Start date as YYYY-MM-DD
    #[clap(long)]
    pub date: Option<NaiveDate>,
    #[clap(long)]
    pub format: Option<MatchFormat>,
    /// scheduled, live or completed
    #[clap(long)]
    pub status: Option<MatchStatus>,
    #[clap(long)]
    pub score: Option<String>,
    #[clap(long)]
    pub winner: Option<String>,
    #[clap(long)]
    pub margin: Option<u32>,
    /// runs or wickets
    #[clap(long)]
    pub victory_type: Option<VictoryType>,
    #[clap(long)]
    pub toss_winner: Option<String>,
    /// bat or bowl
    #[clap(long)]
    pub toss_decision: Option<String>,
}

impl MatchFields {
    pub fn into_update(self) -> MatchUpdate {
        MatchUpdate {
            team1: None,
            team2: None,
            venue: self.venue,
            city: self.city,
            start_date: self.date,
            format: self.format,
            status: self.status,
            score_summary: self.score,
            winner: self.winner,
            victory_margin: self.margin,
            victory_type: self.victory_type,
            toss_winner: self.toss_winner,
            toss_decision: self.toss_decision,
        }
    }

    pub fn into_match(self, id: MatchId, team1: String, team2: String) -> Match {
        let mut m = Match::scheduled(id, team1, team2);
        self.into_update().apply_to(&mut m);
        m
    }
}

#[derive(Debug, Subcommand)]
pub enum MatchCmd {
    /// Add a match between two teams; status defaults to scheduled
    Create {
        id: MatchId,
        team1: String,
        team2: String,
        #[clap(flatten)]
        fields: MatchFields,
    },
    Get {
        id: MatchId,
    },
    /// Change only the given fields
    Update {
        id: MatchId,
        #[clap(long)]
        team1: Option<String>,
        #[clap(long)]
        team2: Option<String>,
        #[clap(flatten)]
        fields: MatchFields,
    },
    /// Remove a match; removing an unknown id is a no-op
    Delete {
        id: MatchId,
    },
    List {
        /// Either side's name contains (case-insensitive)
        #[clap(long)]
        team: Option<String>,
        #[clap(long)]
        status: Option<MatchStatus>,
    },
}
