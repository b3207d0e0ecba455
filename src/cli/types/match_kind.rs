//! Match format, status and result types.

use crate::error::CricketError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing format of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    Test,
    #[serde(rename = "ODI")]
    Odi,
    #[serde(rename = "T20I")]
    T20i,
    T20,
    /// Anything the API reports that is not one of the formats above
    Other,
}

impl MatchFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchFormat::Test => "Test",
            MatchFormat::Odi => "ODI",
            MatchFormat::T20i => "T20I",
            MatchFormat::T20 => "T20",
            MatchFormat::Other => "Other",
        }
    }

    /// Lenient mapping for API values; unknown labels become `Other`
    pub fn from_api_label(label: &str) -> Self {
        label.parse().unwrap_or(MatchFormat::Other)
    }

    /// Query parameter value the rankings endpoints expect
    pub fn ranking_param(&self) -> &'static str {
        match self {
            MatchFormat::Test => "test",
            MatchFormat::Odi => "odi",
            MatchFormat::T20i | MatchFormat::T20 | MatchFormat::Other => "t20",
        }
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchFormat {
    type Err = CricketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TEST" => Ok(MatchFormat::Test),
            "ODI" => Ok(MatchFormat::Odi),
            "T20I" => Ok(MatchFormat::T20i),
            "T20" => Ok(MatchFormat::T20),
            "OTHER" => Ok(MatchFormat::Other),
            _ => Err(CricketError::validation(
                "format",
                format!("unknown match format '{}'", s.trim()),
            )),
        }
    }
}

/// Lifecycle state of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    /// Map the Cricbuzz `state` field onto a status.
    ///
    /// The API reports many in-play states ("In Progress", "Stumps",
    /// "Innings Break", "Tea"...); all of them count as live.
    pub fn from_api_state(state: &str) -> Self {
        match state.trim().to_lowercase().as_str() {
            "preview" | "upcoming" | "toss" | "" => MatchStatus::Scheduled,
            "complete" | "completed" | "result" | "abandon" | "abandoned" | "no result" => {
                MatchStatus::Completed
            }
            _ => MatchStatus::Live,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = CricketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "upcoming" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "completed" | "complete" => Ok(MatchStatus::Completed),
            _ => Err(CricketError::validation(
                "status",
                format!("unknown match status '{}'", s.trim()),
            )),
        }
    }
}

/// How a completed match was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VictoryType {
    Runs,
    Wickets,
}

impl VictoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VictoryType::Runs => "runs",
            VictoryType::Wickets => "wickets",
        }
    }
}

impl fmt::Display for VictoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VictoryType {
    type Err = CricketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "runs" | "run" => Ok(VictoryType::Runs),
            "wickets" | "wicket" | "wkts" | "wkt" => Ok(VictoryType::Wickets),
            _ => Err(CricketError::validation(
                "victory_type",
                format!("expected 'runs' or 'wickets', got '{}'", s.trim()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing_is_case_insensitive() {
        assert_eq!("odi".parse::<MatchFormat>().unwrap(), MatchFormat::Odi);
        assert_eq!("T20i".parse::<MatchFormat>().unwrap(), MatchFormat::T20i);
        assert!("hundred".parse::<MatchFormat>().is_err());
        assert_eq!(MatchFormat::from_api_label("HUNDRED"), MatchFormat::Other);
    }

    #[test]
    fn test_status_from_api_state() {
        assert_eq!(MatchStatus::from_api_state("Preview"), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::from_api_state("In Progress"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_api_state("Stumps"), MatchStatus::Live);
        assert_eq!(MatchStatus::from_api_state("Complete"), MatchStatus::Completed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MatchStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!("Scheduled".parse::<MatchStatus>().unwrap(), MatchStatus::Scheduled);
    }

    #[test]
    fn test_victory_type_aliases() {
        assert_eq!("wkts".parse::<VictoryType>().unwrap(), VictoryType::Wickets);
        assert_eq!("Runs".parse::<VictoryType>().unwrap(), VictoryType::Runs);
        assert!("innings".parse::<VictoryType>().is_err());
    }
}
