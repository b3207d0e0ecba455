//! Player role types and utilities.

use crate::error::CricketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-field role of a cricketer.
///
/// Stored in the `players.role` column using the display form, so queries
/// can filter with plain text (`WHERE role = 'Bowler'`).
///
/// # Examples
///
/// ```rust
/// use cricbuzz_stats::PlayerRole;
///
/// let role: PlayerRole = "wk".parse().unwrap();
/// assert_eq!(role, PlayerRole::WicketKeeper);
/// assert_eq!(PlayerRole::AllRounder.to_string(), "All-rounder");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(alias = "Batter", alias = "batsman")]
    Batsman,
    #[serde(alias = "bowler")]
    Bowler,
    #[serde(rename = "All-rounder", alias = "Allrounder", alias = "all-rounder")]
    AllRounder,
    #[serde(rename = "Wicket-keeper", alias = "WK-Batsman", alias = "wicket-keeper")]
    WicketKeeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::Batsman,
        PlayerRole::Bowler,
        PlayerRole::AllRounder,
        PlayerRole::WicketKeeper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-rounder",
            PlayerRole::WicketKeeper => "Wicket-keeper",
        }
    }

    /// Map a free-form role string from the API onto a role.
    ///
    /// Cricbuzz uses labels like "Batting Allrounder" or "WK-Batsman"; anything
    /// unrecognised is treated as a batsman.
    pub fn from_api_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("allrounder") || lower.contains("all-rounder") {
            PlayerRole::AllRounder
        } else if lower.contains("wk") || lower.contains("keeper") {
            PlayerRole::WicketKeeper
        } else if lower.contains("bowl") {
            PlayerRole::Bowler
        } else {
            PlayerRole::Batsman
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayerRole {
    type Err = CricketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "batsman" | "batter" | "bat" => Ok(PlayerRole::Batsman),
            "bowler" | "bowl" => Ok(PlayerRole::Bowler),
            "all-rounder" | "allrounder" | "ar" => Ok(PlayerRole::AllRounder),
            "wicket-keeper" | "wicketkeeper" | "keeper" | "wk" | "wk-batsman" => {
                Ok(PlayerRole::WicketKeeper)
            }
            _ => Err(CricketError::validation(
                "role",
                format!("unknown role '{}'", s.trim()),
            )),
        }
    }
}
