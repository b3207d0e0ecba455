//! Command implementations for the cricket stats CLI

pub mod analytics;
pub mod crud;
pub mod feed;
pub mod output;
pub mod overview;
pub mod seed;

pub use crud::CrudService;
pub use feed::{match_feed, player_feed, Feed, MatchFeedKind, Origin};
pub use overview::{overview, Overview};
pub use seed::{seed, LiveSnapshot, SampleData, SamplePlayer, SeedReport, SeedSource};
