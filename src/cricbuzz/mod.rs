//! Access to the Cricbuzz cricket data API

pub mod http;
pub mod types;

pub use http::CricbuzzClient;
pub use types::{PlayerProfile, PlayerSummary, RankedPlayer, RankingCategory};
