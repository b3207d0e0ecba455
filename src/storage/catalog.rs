//! Fixed library of read-only analytical queries.
//!
//! Each entry names the tables it reads and the typed parameters it accepts.
//! Before running, the catalog checks that every required table exists and
//! has rows; if not, the query yields an empty [`ResultSet`] instead of an
//! error. Statements are prepared through
//! [`CricketDatabase::query_read_only`], so nothing here can modify the store.

use super::gateway::ResultSet;
use super::schema::CricketDatabase;
use crate::error::{CricketError, Result};
use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryCategory {
    Player,
    Match,
    Format,
    Advanced,
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryCategory::Player => "Player analytics",
            QueryCategory::Match => "Match analytics",
            QueryCategory::Format => "Format analytics",
            QueryCategory::Advanced => "Advanced analytics",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    Text,
    Integer,
    Real,
}

/// A named, typed query parameter with a default used when no value is given
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: &'static str,
}

const fn text(name: &'static str, default: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Text,
        default,
    }
}

const fn integer(name: &'static str, default: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Integer,
        default,
    }
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl ToSql for QueryArg {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            QueryArg::Text(s) => s.to_sql(),
            QueryArg::Integer(v) => v.to_sql(),
            QueryArg::Real(v) => v.to_sql(),
        }
    }
}

impl ParamSpec {
    /// Parse a raw string into this parameter's type
    pub fn parse(&self, raw: &str) -> Result<QueryArg> {
        let raw = raw.trim();
        let invalid = |reason: &str| CricketError::InvalidQueryArgument {
            name: self.name.to_string(),
            reason: format!("{reason}, got '{raw}'"),
        };
        match self.kind {
            ParamKind::Text => {
                if raw.is_empty() {
                    Err(invalid("expected non-empty text"))
                } else {
                    Ok(QueryArg::Text(raw.to_string()))
                }
            }
            ParamKind::Integer => raw
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 0)
                .map(QueryArg::Integer)
                .ok_or_else(|| invalid("expected a non-negative integer")),
            ParamKind::Real => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(QueryArg::Real)
                .ok_or_else(|| invalid("expected a number")),
        }
    }
}

/// One catalog entry
#[derive(Debug, Serialize)]
pub struct QueryDef {
    pub id: u8,
    pub title: &'static str,
    pub category: QueryCategory,
    pub tables: &'static [&'static str],
    pub params: &'static [ParamSpec],
    pub sql: &'static str,
}

impl QueryDef {
    /// Bind positional string arguments, filling gaps with defaults
    pub fn bind(&self, args: &[String]) -> Result<Vec<QueryArg>> {
        if args.len() > self.params.len() {
            return Err(CricketError::InvalidQueryArgument {
                name: format!("#{}", self.params.len() + 1),
                reason: format!(
                    "query {} takes at most {} argument(s)",
                    self.id,
                    self.params.len()
                ),
            });
        }
        self.params
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                let raw = args.get(idx).map(String::as_str).unwrap_or(spec.default);
                spec.parse(raw)
            })
            .collect()
    }
}

const PLAYERS: &[&str] = &["players"];
const MATCHES: &[&str] = &["matches"];
const PLAYERS_AND_STATS: &[&str] = &["players", "player_stats"];
const PLAYERS_AND_MATCHES: &[&str] = &["players", "matches"];

static CATALOG: [QueryDef; 25] = [
    QueryDef {
        id: 1,
        title: "Players from a country",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[text("country", "India")],
        sql: "SELECT id, name, role, team, batting_style, bowling_style
              FROM players
              WHERE country = ?1 COLLATE NOCASE
              ORDER BY name",
    },
    QueryDef {
        id: 2,
        title: "Players with a given role",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[text("role", "Bowler")],
        sql: "SELECT id, name, team, country, matches, wickets
              FROM players
              WHERE role = ?1 COLLATE NOCASE
              ORDER BY name",
    },
    QueryDef {
        id: 3,
        title: "Player count by role",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[],
        sql: "SELECT role, COUNT(*) AS players
              FROM players
              GROUP BY role
              ORDER BY players DESC, role",
    },
    QueryDef {
        id: 4,
        title: "Top run scorers",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[integer("limit", "10")],
        sql: "SELECT name, team, runs, average, strike_rate
              FROM players
              ORDER BY runs DESC, name
              LIMIT ?1",
    },
    QueryDef {
        id: 5,
        title: "Top wicket takers",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[integer("limit", "10")],
        sql: "SELECT name, team, role, wickets, matches
              FROM players
              WHERE wickets > 0
              ORDER BY wickets DESC, name
              LIMIT ?1",
    },
    QueryDef {
        id: 6,
        title: "Average runs per team",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[],
        sql: "SELECT team, COUNT(*) AS players, SUM(runs) AS total_runs,
                     ROUND(AVG(runs), 2) AS avg_runs
              FROM players
              WHERE team <> ''
              GROUP BY team
              ORDER BY avg_runs DESC, team",
    },
    QueryDef {
        id: 7,
        title: "Players and output per country",
        category: QueryCategory::Player,
        tables: PLAYERS,
        params: &[],
        sql: "SELECT country, COUNT(*) AS players, SUM(runs) AS runs, SUM(wickets) AS wickets
              FROM players
              WHERE country <> ''
              GROUP BY country
              ORDER BY players DESC, country",
    },
    QueryDef {
        id: 8,
        title: "Batting average against team average",
        category: QueryCategory::Advanced,
        tables: PLAYERS,
        params: &[],
        sql: "SELECT name, team, average,
                     ROUND(AVG(average) OVER (PARTITION BY team), 2) AS team_average,
                     ROUND(average - AVG(average) OVER (PARTITION BY team), 2) AS difference
              FROM players
              WHERE team <> ''
              ORDER BY difference DESC, name",
    },
    QueryDef {
        id: 9,
        title: "Matches in the last N days",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[integer("days", "30")],
        sql: "SELECT id, team1, team2, venue, city, start_date, status
              FROM matches
              WHERE start_date >= date('now', '-' || ?1 || ' days')
              ORDER BY start_date DESC, id",
    },
    QueryDef {
        id: 10,
        title: "Matches by status",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[],
        sql: "SELECT status, COUNT(*) AS matches
              FROM matches
              GROUP BY status
              ORDER BY matches DESC, status",
    },
    QueryDef {
        id: 11,
        title: "Matches per venue",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[],
        sql: "SELECT venue, city, COUNT(*) AS matches
              FROM matches
              WHERE venue IS NOT NULL
              GROUP BY venue, city
              ORDER BY matches DESC, venue",
    },
    QueryDef {
        id: 12,
        title: "Wins per team",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[],
        sql: "SELECT winner AS team, COUNT(*) AS wins
              FROM matches
              WHERE status = 'completed' AND winner IS NOT NULL
              GROUP BY winner
              ORDER BY wins DESC, team",
    },
    QueryDef {
        id: 13,
        title: "Most recent completed matches",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[integer("limit", "20")],
        sql: "SELECT id, team1, team2, winner, victory_margin, victory_type, venue, start_date
              FROM matches
              WHERE status = 'completed'
              ORDER BY start_date DESC, id
              LIMIT ?1",
    },
    QueryDef {
        id: 14,
        title: "Head-to-head record",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[text("team_a", "India"), text("team_b", "Australia")],
        sql: "SELECT COUNT(*) AS played,
                     COALESCE(SUM(winner = ?1), 0) AS team_a_wins,
                     COALESCE(SUM(winner = ?2), 0) AS team_b_wins,
                     COALESCE(SUM(status = 'completed' AND winner IS NULL), 0) AS no_result
              FROM matches
              WHERE (team1 = ?1 AND team2 = ?2) OR (team1 = ?2 AND team2 = ?1)",
    },
    QueryDef {
        id: 15,
        title: "Toss advantage by decision",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[],
        sql: "SELECT toss_decision, COUNT(*) AS matches,
                     SUM(toss_winner = winner) AS toss_winner_won,
                     ROUND(100.0 * SUM(toss_winner = winner) / COUNT(*), 1) AS win_pct
              FROM matches
              WHERE status = 'completed' AND toss_winner IS NOT NULL AND winner IS NOT NULL
              GROUP BY toss_decision
              ORDER BY toss_decision",
    },
    QueryDef {
        id: 16,
        title: "Largest margins of victory",
        category: QueryCategory::Advanced,
        tables: MATCHES,
        params: &[],
        sql: "SELECT id, team1, team2, winner, victory_margin, victory_type,
                     RANK() OVER (PARTITION BY victory_type ORDER BY victory_margin DESC) AS margin_rank
              FROM matches
              WHERE status = 'completed' AND victory_margin IS NOT NULL AND victory_type IS NOT NULL
              ORDER BY victory_type, margin_rank, id",
    },
    QueryDef {
        id: 17,
        title: "Matches by format",
        category: QueryCategory::Match,
        tables: MATCHES,
        params: &[],
        sql: "SELECT COALESCE(format, 'Unknown') AS format, COUNT(*) AS matches,
                     SUM(status = 'completed') AS completed
              FROM matches
              GROUP BY COALESCE(format, 'Unknown')
              ORDER BY matches DESC, format",
    },
    QueryDef {
        id: 18,
        title: "Top run scorers in a format",
        category: QueryCategory::Format,
        tables: PLAYERS_AND_STATS,
        params: &[text("format", "ODI"), integer("limit", "10")],
        sql: "SELECT p.name, p.country, ps.runs, ps.average
              FROM player_stats ps
              JOIN players p ON p.id = ps.player_id
              WHERE ps.format = ?1 COLLATE NOCASE
              ORDER BY ps.runs DESC, p.name
              LIMIT ?2",
    },
    QueryDef {
        id: 19,
        title: "All-rounders above run and wicket thresholds",
        category: QueryCategory::Format,
        tables: PLAYERS_AND_STATS,
        params: &[integer("min_runs", "1000"), integer("min_wickets", "50")],
        sql: "SELECT p.name, ps.format, ps.runs, ps.wickets
              FROM player_stats ps
              JOIN players p ON p.id = ps.player_id
              WHERE ps.runs > ?1 AND ps.wickets > ?2
              ORDER BY p.name, ps.format",
    },
    QueryDef {
        id: 20,
        title: "Leading run scorer per format",
        category: QueryCategory::Advanced,
        tables: PLAYERS_AND_STATS,
        params: &[],
        sql: "SELECT ranked.format, p.name, ranked.runs
              FROM (SELECT player_id, format, runs,
                           RANK() OVER (PARTITION BY format ORDER BY runs DESC) AS run_rank
                    FROM player_stats) ranked
              JOIN players p ON p.id = ranked.player_id
              WHERE ranked.run_rank = 1
              ORDER BY ranked.format, p.name",
    },
    QueryDef {
        id: 21,
        title: "Runs across formats (two or more formats played)",
        category: QueryCategory::Format,
        tables: PLAYERS_AND_STATS,
        params: &[],
        sql: "SELECT p.name,
                     SUM(CASE WHEN ps.format = 'Test' THEN ps.runs ELSE 0 END) AS test_runs,
                     SUM(CASE WHEN ps.format = 'ODI' THEN ps.runs ELSE 0 END) AS odi_runs,
                     SUM(CASE WHEN ps.format IN ('T20I', 'T20') THEN ps.runs ELSE 0 END) AS t20_runs,
                     ROUND(AVG(ps.average), 2) AS overall_average
              FROM players p
              JOIN player_stats ps ON p.id = ps.player_id
              GROUP BY p.id, p.name
              HAVING COUNT(DISTINCT ps.format) >= 2
              ORDER BY p.name",
    },
    QueryDef {
        id: 22,
        title: "Most economical limited-overs bowlers",
        category: QueryCategory::Format,
        tables: PLAYERS_AND_STATS,
        params: &[integer("min_matches", "10"), integer("limit", "20")],
        sql: "SELECT p.name, ps.format, ps.economy, ps.wickets
              FROM player_stats ps
              JOIN players p ON p.id = ps.player_id
              WHERE ps.format IN ('ODI', 'T20I', 'T20')
                AND ps.matches >= ?1
                AND ps.economy IS NOT NULL
              ORDER BY ps.economy ASC, ps.wickets DESC, p.name
              LIMIT ?2",
    },
    QueryDef {
        id: 23,
        title: "Matches and batting average by format",
        category: QueryCategory::Format,
        tables: PLAYERS_AND_STATS,
        params: &[integer("min_matches", "20")],
        sql: "WITH totals AS (
                  SELECT player_id, SUM(matches) AS total_matches
                  FROM player_stats
                  GROUP BY player_id
              )
              SELECT p.name, t.total_matches,
                     SUM(CASE WHEN ps.format = 'Test' THEN ps.matches ELSE 0 END) AS test_matches,
                     SUM(CASE WHEN ps.format = 'ODI' THEN ps.matches ELSE 0 END) AS odi_matches,
                     SUM(CASE WHEN ps.format IN ('T20I', 'T20') THEN ps.matches ELSE 0 END) AS t20_matches,
                     ROUND(AVG(ps.average), 2) AS avg_batting
              FROM players p
              JOIN player_stats ps ON p.id = ps.player_id
              JOIN totals t ON t.player_id = p.id
              WHERE t.total_matches >= ?1
              GROUP BY p.id, p.name, t.total_matches
              ORDER BY t.total_matches DESC, p.name",
    },
    QueryDef {
        id: 24,
        title: "Weighted performance score",
        category: QueryCategory::Advanced,
        tables: PLAYERS_AND_STATS,
        params: &[integer("limit", "50")],
        sql: "SELECT p.name, ps.format,
                     ROUND((ps.runs * 0.01) + (COALESCE(ps.average, 0) * 0.5)
                           + (COALESCE(ps.strike_rate, 0) * 0.3) + (ps.wickets * 2)
                           + ((6 - COALESCE(ps.economy, 6)) * 2), 2) AS score
              FROM player_stats ps
              JOIN players p ON p.id = ps.player_id
              ORDER BY score DESC, p.name
              LIMIT ?1",
    },
    QueryDef {
        id: 25,
        title: "Top run scorers across completed matches",
        category: QueryCategory::Advanced,
        tables: PLAYERS_AND_MATCHES,
        params: &[integer("limit", "10")],
        sql: "SELECT p.name, p.team, p.runs, COUNT(DISTINCT m.id) AS completed_matches
              FROM players p
              JOIN matches m
                ON m.status = 'completed' AND (m.team1 = p.team OR m.team2 = p.team)
              GROUP BY p.id, p.name, p.team, p.runs
              ORDER BY p.runs DESC, p.name
              LIMIT ?1",
    },
];

/// Every catalog entry, ordered by id
pub fn catalog() -> &'static [QueryDef] {
    &CATALOG
}

/// Look up a catalog entry by id
pub fn find_query(id: u8) -> Result<&'static QueryDef> {
    CATALOG
        .iter()
        .find(|q| q.id == id)
        .ok_or(CricketError::UnknownQuery { id })
}

/// Runs catalog entries against a borrowed store handle
pub struct QueryCatalog<'a> {
    db: &'a CricketDatabase,
}

impl<'a> QueryCatalog<'a> {
    pub fn new(db: &'a CricketDatabase) -> Self {
        Self { db }
    }

    /// Run catalog query `id` with positional string arguments
    pub fn run(&self, id: u8, args: &[String]) -> Result<ResultSet> {
        let def = find_query(id)?;
        let bound = def.bind(args)?;

        for table in def.tables {
            if self.db.table_is_empty(table)? {
                debug!(query = id, table = *table, "Required table missing or empty");
                return Ok(ResultSet::empty());
            }
        }

        let params: Vec<&dyn ToSql> = bound.iter().map(|a| a as &dyn ToSql).collect();
        let result = self.db.query_read_only(def.sql, &params)?;
        debug!(query = id, rows = result.len(), "Catalog query complete");
        Ok(result)
    }

    /// Run a caller-supplied statement, refusing anything that could write
    pub fn run_custom(&self, sql: &str) -> Result<ResultSet> {
        if sql.trim().is_empty() {
            return Err(CricketError::InvalidQueryArgument {
                name: "sql".to_string(),
                reason: "statement is empty".to_string(),
            });
        }
        self.db.query_read_only(sql, &[])
    }
}
