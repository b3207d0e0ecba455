//! API-first listings that fall back to stored or sample data.
//!
//! A failed fetch (including a missing API key) never reaches the caller as
//! an `Err`; it rides along in [`Feed::error`] so the caller can report it
//! inline and still show something.

use serde::Serialize;
use tracing::warn;

use super::output::{match_line, rankings_table};
use super::seed::SampleData;
use crate::{
    cli::types::{MatchFormat, MatchStatus, PlayerRole},
    config::ApiConfig,
    cricbuzz::{CricbuzzClient, RankedPlayer, RankingCategory},
    error::CricketError,
    storage::{CricketDatabase, Match, MatchFilter, Player, PlayerFilter},
};

/// Where the items of a feed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    Store,
    Sample,
}

#[derive(Debug)]
pub struct Feed<T> {
    pub items: Vec<T>,
    pub origin: Origin,
    /// The fetch failure that forced a fallback, if any
    pub error: Option<CricketError>,
}

impl<T> Feed<T> {
    fn live(items: Vec<T>) -> Self {
        Self {
            items,
            origin: Origin::Live,
            error: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin != Origin::Live
    }
}

/// Which match listing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchFeedKind {
    #[default]
    Live,
    Upcoming,
    Recent,
}

impl MatchFeedKind {
    /// Stored status that corresponds to this listing
    pub fn status(&self) -> MatchStatus {
        match self {
            MatchFeedKind::Live => MatchStatus::Live,
            MatchFeedKind::Upcoming => MatchStatus::Scheduled,
            MatchFeedKind::Recent => MatchStatus::Completed,
        }
    }
}

async fn fetch_matches(api: &ApiConfig, kind: MatchFeedKind) -> crate::Result<Vec<Match>> {
    let client = CricbuzzClient::new(api)?;
    match kind {
        MatchFeedKind::Live => client.live_matches().await,
        MatchFeedKind::Upcoming => client.upcoming_matches().await,
        MatchFeedKind::Recent => client.recent_matches().await,
    }
}

/// Matches from the API, else from the store, else from the bundled sample
pub async fn match_feed(api: &ApiConfig, db: &CricketDatabase, kind: MatchFeedKind) -> Feed<Match> {
    let error = match fetch_matches(api, kind).await {
        Ok(matches) => return Feed::live(matches),
        Err(e) => e,
    };
    warn!(error = %error, "match listing unavailable, falling back");

    let filter = MatchFilter {
        status: Some(kind.status()),
        ..Default::default()
    };
    match db.list_matches(&filter) {
        Ok(stored) if !stored.is_empty() => {
            return Feed {
                items: stored,
                origin: Origin::Store,
                error: Some(error),
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "stored matches unavailable"),
    }

    let items = match SampleData::bundled() {
        Ok(sample) => sample
            .matches
            .into_iter()
            .filter(|m| m.status == kind.status())
            .collect(),
        Err(e) => {
            warn!(error = %e, "bundled sample unreadable");
            Vec::new()
        }
    };
    Feed {
        items,
        origin: Origin::Sample,
        error: Some(error),
    }
}

/// Rank stored players the way the ranking table for `category` would
pub fn rank_players(mut players: Vec<Player>, category: RankingCategory) -> Vec<RankedPlayer> {
    players.retain(|p| match category {
        RankingCategory::Batsmen => {
            matches!(p.role, PlayerRole::Batsman | PlayerRole::WicketKeeper)
        }
        RankingCategory::Bowlers => p.role == PlayerRole::Bowler,
        RankingCategory::Allrounders => p.role == PlayerRole::AllRounder,
    });
    players.sort_by(|a, b| {
        let key = |p: &Player| match category {
            RankingCategory::Batsmen => (p.stats.runs, p.stats.wickets),
            RankingCategory::Bowlers => (p.stats.wickets, p.stats.runs),
            RankingCategory::Allrounders => (p.stats.runs + 20 * p.stats.wickets, p.stats.runs),
        };
        key(b).cmp(&key(a)).then_with(|| a.name.cmp(&b.name))
    });

    players
        .into_iter()
        .enumerate()
        .map(|(idx, p)| RankedPlayer {
            id: p.id.to_string(),
            rank: (idx + 1).to_string(),
            name: p.name,
            country: Some(p.country).filter(|c| !c.is_empty()),
            rating: None,
        })
        .collect()
}

async fn fetch_rankings(
    api: &ApiConfig,
    category: RankingCategory,
    format: MatchFormat,
) -> crate::Result<Vec<RankedPlayer>> {
    CricbuzzClient::new(api)?.rankings(category, format).await
}

/// Top players from the ranking tables, else ranked from stored or sample careers
pub async fn player_feed(
    api: &ApiConfig,
    db: &CricketDatabase,
    category: RankingCategory,
    format: MatchFormat,
) -> Feed<RankedPlayer> {
    let error = match fetch_rankings(api, category, format).await {
        Ok(ranked) => return Feed::live(ranked),
        Err(e) => e,
    };
    warn!(error = %error, %category, "rankings unavailable, falling back");

    match db.list_players(&PlayerFilter::default()) {
        Ok(stored) if !stored.is_empty() => {
            return Feed {
                items: rank_players(stored, category),
                origin: Origin::Store,
                error: Some(error),
            }
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "stored players unavailable"),
    }

    let items = match SampleData::bundled() {
        Ok(sample) => rank_players(sample.player_records(), category),
        Err(e) => {
            warn!(error = %e, "bundled sample unreadable");
            Vec::new()
        }
    };
    Feed {
        items,
        origin: Origin::Sample,
        error: Some(error),
    }
}

fn report_fallback<T>(feed: &Feed<T>) {
    if let Some(err) = &feed.error {
        let source = match feed.origin {
            Origin::Store => "stored data",
            _ => "bundled sample data",
        };
        eprintln!("⚠ API unavailable ({err}); showing {source}"); // tarpaulin::skip
    }
}

pub async fn handle_live(
    api: &ApiConfig,
    db: &CricketDatabase,
    kind: MatchFeedKind,
    as_json: bool,
) -> crate::Result<()> {
    let feed = match_feed(api, db, kind).await;
    report_fallback(&feed);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&feed.items)?); // tarpaulin::skip
    } else if feed.items.is_empty() {
        println!("No matches to show"); // tarpaulin::skip
    } else {
        for m in &feed.items {
            println!("{}", match_line(m)); // tarpaulin::skip
        }
    }
    Ok(())
}

pub async fn handle_players(
    api: &ApiConfig,
    db: &CricketDatabase,
    category: RankingCategory,
    format: MatchFormat,
    as_json: bool,
) -> crate::Result<()> {
    let feed = player_feed(api, db, category, format).await;
    report_fallback(&feed);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&feed.items)?); // tarpaulin::skip
    } else {
        println!("Top {category} ({format})"); // tarpaulin::skip
        print!("{}", rankings_table(&feed.items)); // tarpaulin::skip
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seed::{seed, SeedSource};
    use std::time::Duration;

    fn offline_config() -> ApiConfig {
        ApiConfig {
            api_key: None,
            api_host: "cricbuzz-cricket.p.rapidapi.com".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_sample() {
        let db = CricketDatabase::new_in_memory().unwrap();
        let feed = match_feed(&offline_config(), &db, MatchFeedKind::Recent).await;

        assert_eq!(feed.origin, Origin::Sample);
        assert!(feed.is_fallback());
        assert!(matches!(feed.error, Some(CricketError::MissingApiKey { .. })));
        assert!(!feed.items.is_empty());
        assert!(feed.items.iter().all(|m| m.status == MatchStatus::Completed));
    }

    #[tokio::test]
    async fn test_stored_data_preferred_over_sample() {
        let mut db = CricketDatabase::new_in_memory().unwrap();
        seed(&mut db, SeedSource::Bundled).unwrap();

        let feed = player_feed(
            &offline_config(),
            &db,
            RankingCategory::Bowlers,
            MatchFormat::Odi,
        )
        .await;
        assert_eq!(feed.origin, Origin::Store);
        assert!(feed.error.is_some());
        assert_eq!(feed.items[0].rank, "1");
    }

    #[test]
    fn test_rank_players_orders_by_category() {
        let sample = SampleData::bundled().unwrap();
        let batsmen = rank_players(sample.player_records(), RankingCategory::Batsmen);
        assert_eq!(batsmen[0].name, "Virat Kohli");
        assert!(batsmen.iter().all(|p| p.name != "Jasprit Bumrah"));

        let bowlers = rank_players(sample.player_records(), RankingCategory::Bowlers);
        assert_eq!(bowlers[0].name, "Jasprit Bumrah");
        assert_eq!(bowlers[1].rank, "2");
    }
}
