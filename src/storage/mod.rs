//! Storage layer for the cricket stats library
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `gateway`: Parameterized statement execution returning typed rows
//! - `queries`: Entity reads and writes
//! - `catalog`: Read-only analytical query library

pub mod catalog;
pub mod gateway;
pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and database struct for easy access
pub use catalog::{catalog, find_query, QueryCatalog, QueryCategory, QueryDef};
pub use gateway::{Cell, ResultSet};
pub use models::*;
pub use schema::CricketDatabase;
