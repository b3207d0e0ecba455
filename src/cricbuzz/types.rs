//! Response shapes for the Cricbuzz API and their mapping onto stored records.
//!
//! Payloads are deserialized into explicit structs at the client boundary; a
//! response missing a required field is rejected as malformed rather than
//! passed on as a loose JSON map.

use crate::cli::types::{MatchFormat, MatchId, MatchStatus, PlayerId, PlayerRole, VictoryType};
use crate::storage::{CareerStats, Match, Player};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;


/// Cricbuzz sends ids and counters as either JSON strings or numbers
fn de_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Str(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Raw::Str(_) => Err(de::Error::custom("empty identifier")),
        Raw::Int(v) => Ok(v.to_string()),
        Raw::Float(v) => Ok(v.to_string()),
    }
}

fn de_opt_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Str(s)) => s.trim().parse::<i64>().map(Some).map_err(de::Error::custom),
    }
}

/// Top-level envelope for `matches/v1/{live,upcoming,recent}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesEnvelope {
    #[serde(default)]
    pub type_matches: Vec<TypeMatches>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMatches {
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub series_matches: Vec<SeriesMatches>,
}

/// Either a wrapped list of matches or an ad slot, which carries no wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMatches {
    #[serde(default)]
    pub series_ad_wrapper: Option<SeriesAdWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesAdWrapper {
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

/// One match as listed by the matches endpoints and the match centre
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    pub match_info: MatchInfo,
    #[serde(default)]
    pub match_score: Option<MatchScore>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(deserialize_with = "de_string_or_number")]
    pub match_id: String,
    #[serde(default)]
    pub match_desc: Option<String>,
    #[serde(default)]
    pub match_format: Option<String>,
    #[serde(default, deserialize_with = "de_opt_millis")]
    pub start_date: Option<i64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub team1: TeamInfo,
    pub team2: TeamInfo,
    #[serde(default)]
    pub venue_info: Option<VenueInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    #[serde(rename = "teamName", alias = "name")]
    pub team_name: String,
    #[serde(rename = "teamSName", alias = "shortName", default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueInfo {
    #[serde(default)]
    pub ground: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    #[serde(default)]
    pub team1_score: Option<TeamScore>,
    #[serde(default)]
    pub team2_score: Option<TeamScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamScore {
    #[serde(default)]
    pub inngs1: Option<InningsScore>,
    #[serde(default)]
    pub inngs2: Option<InningsScore>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InningsScore {
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub wickets: Option<u32>,
    #[serde(default)]
    pub overs: Option<f64>,
}

impl fmt::Display for InningsScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.runs.unwrap_or(0))?;
        match self.wickets {
            Some(w) if w < 10 => write!(f, "/{w}")?,
            _ => {}
        }
        if let Some(overs) = self.overs {
            write!(f, " ({overs})")?;
        }
        Ok(())
    }
}

impl TeamScore {
    fn summary(&self) -> Option<String> {
        match (&self.inngs1, &self.inngs2) {
            (Some(first), Some(second)) => Some(format!("{first} & {second}")),
            (Some(first), None) => Some(first.to_string()),
            _ => None,
        }
    }
}

impl MatchesEnvelope {
    /// Flatten `typeMatches → seriesMatches → seriesAdWrapper → matches`, skipping ad slots
    pub fn into_entries(self) -> Vec<MatchEntry> {
        self.type_matches
            .into_iter()
            .flat_map(|t| t.series_matches)
            .filter_map(|s| s.series_ad_wrapper)
            .flat_map(|w| w.matches)
            .collect()
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.into_entries()
            .into_iter()
            .map(MatchEntry::into_match)
            .collect()
    }
}

/// Winner, margin and margin type parsed from a status line like
/// "India won by 6 wkts"
pub fn parse_result(status: &str) -> Option<(String, u32, VictoryType)> {
    let (winner, rest) = status.split_once(" won by ")?;
    let mut words = rest.split_whitespace();

    // "won by an innings and 12 runs": record the runs margin
    let first = words.next()?;
    let (margin, unit) = if first.eq_ignore_ascii_case("an") {
        let mut after = words.skip_while(|w| w.parse::<u32>().is_err());
        (after.next()?.parse::<u32>().ok()?, after.next()?)
    } else {
        (first.parse::<u32>().ok()?, words.next()?)
    };

    let unit = unit.trim_end_matches(|c: char| !c.is_alphanumeric());
    let victory_type = unit.parse::<VictoryType>().ok()?;
    Some((winner.trim().to_string(), margin, victory_type))
}

/// Toss winner and decision from a status line like "India opt to bat"
pub fn parse_toss(status: &str) -> Option<(String, String)> {
    let (team, rest) = status
        .split_once(" opt to ")
        .or_else(|| status.split_once(" elected to "))?;
    let decision = rest.split_whitespace().next()?.to_lowercase();
    if decision == "bat" || decision == "bowl" || decision == "field" {
        let decision = if decision == "field" { "bowl".to_string() } else { decision };
        Some((team.trim().to_string(), decision))
    } else {
        None
    }
}

/// Map a name from a status line onto the full name of one of the two sides
fn resolve_team(name: &str, team1: &TeamInfo, team2: &TeamInfo) -> Option<String> {
    [team1, team2]
        .into_iter()
        .find(|team| {
            team.team_name.eq_ignore_ascii_case(name)
                || team
                    .short_name
                    .as_deref()
                    .is_some_and(|short| short.eq_ignore_ascii_case(name))
        })
        .map(|team| team.team_name.clone())
}

impl MatchEntry {
    pub fn into_match(self) -> Match {
        let info = self.match_info;
        let status = MatchStatus::from_api_state(info.state.as_deref().unwrap_or(""));
        let status_text = info.status.clone().unwrap_or_default();

        let score_summary = self.match_score.as_ref().and_then(|score| {
            let first = score.team1_score.as_ref().and_then(TeamScore::summary);
            let second = score.team2_score.as_ref().and_then(TeamScore::summary);
            let short1 = info.team1.short_name.as_deref().unwrap_or(&info.team1.team_name);
            let short2 = info.team2.short_name.as_deref().unwrap_or(&info.team2.team_name);
            match (first, second) {
                (Some(a), Some(b)) => Some(format!("{short1} {a} vs {short2} {b}")),
                (Some(a), None) => Some(format!("{short1} {a}")),
                (None, Some(b)) => Some(format!("{short2} {b}")),
                (None, None) => None,
            }
        });

        let (winner, victory_margin, victory_type) = match parse_result(&status_text) {
            Some((winner, margin, kind)) if status == MatchStatus::Completed => {
                match resolve_team(&winner, &info.team1, &info.team2) {
                    Some(team) => (Some(team), Some(margin), Some(kind)),
                    None => (None, None, None),
                }
            }
            _ => (None, None, None),
        };
        let (toss_winner, toss_decision) = match parse_toss(&status_text) {
            Some((team, decision)) => match resolve_team(&team, &info.team1, &info.team2) {
                Some(team) => (Some(team), Some(decision)),
                None => (None, None),
            },
            None => (None, None),
        };

        let start_date = info
            .start_date
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive());

        let venue = info.venue_info.as_ref();
        Match {
            id: MatchId::new(info.match_id),
            teams: [info.team1.team_name, info.team2.team_name],
            venue: venue.and_then(|v| v.ground.clone()),
            city: venue.and_then(|v| v.city.clone()),
            start_date,
            format: info.match_format.as_deref().map(MatchFormat::from_api_label),
            status,
            score_summary: score_summary.or(info.status),
            winner,
            victory_margin,
            victory_type,
            toss_winner,
            toss_decision,
        }
    }
}

/// Which ICC ranking table to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RankingCategory {
    Batsmen,
    Bowlers,
    Allrounders,
}

impl RankingCategory {
    pub fn path_segment(&self) -> &'static str {
        match self {
            RankingCategory::Batsmen => "batsmen",
            RankingCategory::Bowlers => "bowlers",
            RankingCategory::Allrounders => "allrounders",
        }
    }

    pub fn role(&self) -> PlayerRole {
        match self {
            RankingCategory::Batsmen => PlayerRole::Batsman,
            RankingCategory::Bowlers => PlayerRole::Bowler,
            RankingCategory::Allrounders => PlayerRole::AllRounder,
        }
    }
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Envelope for `stats/v1/rankings/{category}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingsEnvelope {
    #[serde(default)]
    pub rank: Vec<RankedPlayer>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankedPlayer {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "de_string_or_number")]
    pub rank: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

impl RankedPlayer {
    /// Store a ranked player with the role implied by the ranking table
    pub fn into_player(self, category: RankingCategory) -> Player {
        let country = self.country.unwrap_or_default();
        Player {
            id: PlayerId::new(self.id),
            name: self.name,
            role: category.role(),
            team: country.clone(),
            country,
            batting_style: None,
            bowling_style: None,
            stats: CareerStats::default(),
        }
    }
}

/// Envelope shared by `stats/v1/player/trending` and `stats/v1/player/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerListEnvelope {
    #[serde(default)]
    pub player: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team_name: Option<String>,
}

/// Payload of `stats/v1/player/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(deserialize_with = "de_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bat: Option<String>,
    #[serde(default)]
    pub bowl: Option<String>,
    #[serde(default)]
    pub intl_team: Option<String>,
}

impl PlayerProfile {
    pub fn into_player(self) -> Player {
        let country = self.intl_team.unwrap_or_default();
        Player {
            id: PlayerId::new(self.id),
            name: self.name,
            role: PlayerRole::from_api_label(self.role.as_deref().unwrap_or("")),
            team: country.clone(),
            country,
            batting_style: self.bat.filter(|s| !s.is_empty()),
            bowling_style: self.bowl.filter(|s| !s.is_empty()),
            stats: CareerStats::default(),
        }
    }
}
