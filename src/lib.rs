//! Cricbuzz Stats Library
//!
//! Fetches cricket data from the Cricbuzz API on RapidAPI, keeps it in a
//! local SQLite store, and exposes analytics and CRUD over that store.
//!
//! ## Features
//!
//! - **Live data**: live, upcoming and recent matches plus ICC ranking tables
//! - **Graceful fallback**: stored or bundled sample data when the API is unavailable
//! - **Seeding**: idempotent loading from bundled samples, sample files or the live API
//! - **Analytics**: a catalog of 25 read-only SQL queries with typed parameters
//! - **CRUD**: validated create, read, update and delete for players and matches
//!
//! ## Quick Start
//!
//! ```rust
//! use cricbuzz_stats::{
//!     commands::{seed, SeedSource},
//!     storage::{CricketDatabase, QueryCatalog},
//! };
//!
//! # fn example() -> cricbuzz_stats::Result<()> {
//! let mut db = CricketDatabase::new_in_memory()?;
//! seed(&mut db, SeedSource::Bundled)?;
//!
//! // Players from India, ordered by name
//! let rows = QueryCatalog::new(&db).run(1, &["India".to_string()])?;
//! assert!(!rows.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Environment Configuration
//!
//! Set your RapidAPI key to enable live data:
//! ```bash
//! export RAPIDAPI_KEY=your-key
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod cricbuzz;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{MatchFormat, MatchId, MatchStatus, PlayerId, PlayerRole, VictoryType};
pub use config::{ApiConfig, Config, DatabaseUrl};
pub use cricbuzz::CricbuzzClient;
pub use error::{CricketError, Result};
pub use storage::{CricketDatabase, Match, Player};
