//! Database schema and connection management

use crate::config::DatabaseUrl;
use crate::error::{CricketError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

/// Tables the store creates on first open
pub const TABLES: [&str; 3] = ["players", "matches", "player_stats"];

/// Connection manager for the cricket store.
///
/// One handle owns one SQLite connection for its lifetime; components borrow
/// it explicitly rather than reaching for a process-wide global.
pub struct CricketDatabase {
    pub(crate) conn: Connection,
}

impl CricketDatabase {
    /// Open the database named by `url` and ensure tables exist
    pub fn open(url: &DatabaseUrl) -> Result<Self> {
        let conn = match url {
            DatabaseUrl::Memory => Connection::open_in_memory().map_err(CricketError::write)?,
            DatabaseUrl::File(path) => {
                // Ensure the parent directory exists
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Connection::open(path).map_err(CricketError::write)?
            }
        };
        info!(database = %url, "Opened cricket store");

        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create an in-memory database, mainly for tests
    pub fn new_in_memory() -> Result<Self> {
        Self::open(&DatabaseUrl::Memory)
    }

    /// Open a connection without creating any tables.
    ///
    /// Useful for pointing the query catalog at an externally managed file.
    pub fn open_without_schema(url: &DatabaseUrl) -> Result<Self> {
        let conn = match url {
            DatabaseUrl::Memory => Connection::open_in_memory(),
            DatabaseUrl::File(path) => Connection::open(path),
        }
        .map_err(CricketError::read)?;
        Ok(Self { conn })
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS players (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    role TEXT NOT NULL,
                    team TEXT NOT NULL DEFAULT '',
                    country TEXT NOT NULL DEFAULT '',
                    batting_style TEXT,
                    bowling_style TEXT,
                    matches INTEGER NOT NULL DEFAULT 0,
                    runs INTEGER NOT NULL DEFAULT 0,
                    wickets INTEGER NOT NULL DEFAULT 0,
                    average REAL NOT NULL DEFAULT 0,
                    strike_rate REAL NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS matches (
                    id TEXT PRIMARY KEY,
                    team1 TEXT NOT NULL,
                    team2 TEXT NOT NULL,
                    venue TEXT,
                    city TEXT,
                    start_date TEXT,
                    format TEXT,
                    status TEXT NOT NULL,
                    score_summary TEXT,
                    winner TEXT,
                    victory_margin INTEGER,
                    victory_type TEXT,
                    toss_winner TEXT,
                    toss_decision TEXT
                );

                CREATE TABLE IF NOT EXISTS player_stats (
                    player_id TEXT NOT NULL,
                    format TEXT NOT NULL,
                    matches INTEGER NOT NULL DEFAULT 0,
                    runs INTEGER NOT NULL DEFAULT 0,
                    average REAL,
                    strike_rate REAL,
                    centuries INTEGER NOT NULL DEFAULT 0,
                    fifties INTEGER NOT NULL DEFAULT 0,
                    wickets INTEGER NOT NULL DEFAULT 0,
                    economy REAL,
                    PRIMARY KEY (player_id, format)
                );

                CREATE INDEX IF NOT EXISTS idx_players_country ON players(country);
                CREATE INDEX IF NOT EXISTS idx_matches_status ON matches(status, start_date);",
            )
            .map_err(CricketError::write)?;

        debug!("Schema ready");
        Ok(())
    }

    /// Whether `table` exists in the connected database
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()
            .map_err(CricketError::read)?;
        Ok(found.is_some())
    }

    /// Whether `table` is missing or has no rows.
    ///
    /// Only names from [`TABLES`] are accepted; table names cannot be bound as
    /// parameters, so anything else is treated as absent.
    pub fn table_is_empty(&self, table: &str) -> Result<bool> {
        let Some(known) = TABLES.iter().find(|t| **t == table) else {
            return Ok(true);
        };
        if !self.table_exists(known)? {
            return Ok(true);
        }
        let has_rows: bool = self
            .conn
            .query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {known})"),
                [],
                |row| row.get(0),
            )
            .map_err(CricketError::read)?;
        Ok(!has_rows)
    }

    /// Number of rows in one of the store's tables (0 when absent)
    pub fn row_count(&self, table: &str) -> Result<u64> {
        let Some(known) = TABLES.iter().find(|t| **t == table) else {
            return Ok(0);
        };
        if !self.table_exists(known)? {
            return Ok(0);
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {known}"), [], |row| {
                row.get(0)
            })
            .map_err(CricketError::read)?;
        Ok(count.max(0) as u64)
    }

    /// Cheap round trip to confirm the connection is usable
    pub fn ping(&self) -> Result<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(CricketError::read)?;
        Ok(())
    }

    /// Run `f` inside one transaction; an error from `f` rolls back everything it wrote
    pub fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(CricketError::write)?;

        let outcome = f(self).and_then(|value| {
            self.conn
                .execute_batch("COMMIT")
                .map_err(CricketError::write)?;
            Ok(value)
        });
        if outcome.is_err() && !self.conn.is_autocommit() {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!(error = %e, "Rollback failed");
            }
        }
        outcome
    }

    /// Remove all rows from every table
    pub fn clear_all_data(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                "DELETE FROM player_stats;
                 DELETE FROM matches;
                 DELETE FROM players;",
            )
            .map_err(CricketError::write)?;
        Ok(())
    }
}
