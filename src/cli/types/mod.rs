//! Type-safe wrappers and enums for cricket data.

pub mod ids;
pub mod match_kind;
pub mod role;

pub use ids::{MatchId, PlayerId};
pub use match_kind::{MatchFormat, MatchStatus, VictoryType};
pub use role::PlayerRole;
