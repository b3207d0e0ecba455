//! Populate the store from bundled samples, sample files or a live fetch.
//!
//! Seeding is a sequence of upserts keyed by entity id, so running it twice
//! with the same input leaves row counts unchanged. Records that fail
//! validation are skipped and counted; only a failed store write stops a
//! seed. There is no enclosing transaction: rows written before that failure
//! stay written, and the error reports how many there were. `seed --clear`
//! is the exception and runs clear and seed as one transaction.

use std::{collections::HashSet, fmt, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::crud::{validate_match, validate_player};
use crate::{
    cli::types::MatchFormat,
    config::ApiConfig,
    cricbuzz::{CricbuzzClient, RankingCategory},
    error::{CricketError, EntityKind},
    storage::{CricketDatabase, FormatStats, Match, Player},
    Result,
};

pub const SAMPLE_PLAYERS_FILE: &str = "sample_players.json";
pub const SAMPLE_MATCHES_FILE: &str = "sample_matches.json";

const BUNDLED_PLAYERS: &str = include_str!("../../data/sample_players.json");
const BUNDLED_MATCHES: &str = include_str!("../../data/sample_matches.json");

/// A sample player record: the stored player plus optional per-format lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePlayer {
    #[serde(flatten)]
    pub player: Player,
    #[serde(default)]
    pub formats: Vec<FormatStats>,
}

/// Static player and match documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    pub players: Vec<SamplePlayer>,
    pub matches: Vec<Match>,
}

impl SampleData {
    /// The sample documents compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_PLAYERS, BUNDLED_MATCHES)
    }

    pub fn from_json(players: &str, matches: &str) -> Result<Self> {
        Ok(Self {
            players: serde_json::from_str(players)?,
            matches: serde_json::from_str(matches)?,
        })
    }

    /// Read `sample_players.json` and `sample_matches.json` from `dir`
    pub fn load(dir: &Path) -> Result<Self> {
        let players = std::fs::read_to_string(dir.join(SAMPLE_PLAYERS_FILE))?;
        let matches = std::fs::read_to_string(dir.join(SAMPLE_MATCHES_FILE))?;
        Self::from_json(&players, &matches)
    }

    /// Plain player records, without their format lines
    pub fn player_records(&self) -> Vec<Player> {
        self.players.iter().map(|p| p.player.clone()).collect()
    }
}


/// Everything a live seed pulls from the API in one go
#[derive(Debug, Default)]
pub struct LiveSnapshot {
    pub matches: Vec<Match>,
    pub players: Vec<Player>,
    /// Calls that failed; whatever the other calls returned is still kept
    pub errors: Vec<CricketError>,
}

impl LiveSnapshot {
    /// Fetch live, upcoming and recent matches plus the ranking tables for `format`.
    ///
    /// A match or player listed by more than one endpoint is kept once, with
    /// the first occurrence winning.
    pub async fn fetch(client: &CricbuzzClient, format: MatchFormat) -> Self {
        let mut snapshot = Self::default();

        let listings = [
            client.live_matches().await,
            client.upcoming_matches().await,
            client.recent_matches().await,
        ];
        for listing in listings {
            match listing {
                Ok(matches) => snapshot.matches.extend(matches),
                Err(e) => snapshot.record_failure(e),
            }
        }

        for category in [
            RankingCategory::Batsmen,
            RankingCategory::Bowlers,
            RankingCategory::Allrounders,
        ] {
            match client.rankings(category, format).await {
                Ok(ranked) => snapshot
                    .players
                    .extend(ranked.into_iter().map(|r| r.into_player(category))),
                Err(e) => snapshot.record_failure(e),
            }
        }

        let mut seen = HashSet::new();
        snapshot.matches.retain(|m| seen.insert(m.id.clone()));
        let mut seen = HashSet::new();
        snapshot.players.retain(|p| seen.insert(p.id.clone()));

        info!(
            matches = snapshot.matches.len(),
            players = snapshot.players.len(),
            failed_calls = snapshot.errors.len(),
            "live snapshot fetched"
        );
        snapshot
    }

    fn record_failure(&mut self, error: CricketError) {
        warn!(error = %error, "live fetch incomplete");
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.players.is_empty()
    }
}

/// Where seed data comes from
#[derive(Debug)]
pub enum SeedSource {
    Bundled,
    Sample(SampleData),
    Live(LiveSnapshot),
}

/// Rows written by one seed run, plus records skipped as invalid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub players: usize,
    pub matches: usize,
    pub format_stats: usize,
    pub skipped: usize,
}

impl SeedReport {
    /// Rows written
    pub fn total(&self) -> usize {
        self.players + self.matches + self.format_stats
    }
}

fn write_failed(
    report: &SeedReport,
    entity: EntityKind,
    id: &dyn fmt::Display,
    source: CricketError,
) -> CricketError {
    warn!(%entity, %id, written = report.total(), "seeding stopped");
    CricketError::Seed {
        entity,
        id: id.to_string(),
        written: report.total(),
        source: Box::new(source),
    }
}

/// Upsert every valid record of `source` into the store.
///
/// Players that came from ranking tables only refresh name and country on
/// rows that already exist, so stored careers survive a live seed.
pub fn seed(db: &mut CricketDatabase, source: SeedSource) -> Result<SeedReport> {
    let (players, matches, ranked) = match source {
        SeedSource::Bundled => {
            let sample = SampleData::bundled()?;
            (sample.players, sample.matches, false)
        }
        SeedSource::Sample(sample) => (sample.players, sample.matches, false),
        SeedSource::Live(snapshot) => (
            snapshot
                .players
                .into_iter()
                .map(|player| SamplePlayer {
                    player,
                    formats: Vec::new(),
                })
                .collect(),
            snapshot.matches,
            true,
        ),
    };

    let mut report = SeedReport::default();

    for sample in &players {
        let player = &sample.player;
        if let Err(e) = validate_player(player) {
            warn!(id = %player.id, error = %e, "skipping invalid player");
            report.skipped += 1;
            continue;
        }

        let written = if ranked {
            db.upsert_ranked_player(player)
        } else {
            db.upsert_player(player)
        };
        written.map_err(|e| write_failed(&report, EntityKind::Player, &player.id, e))?;
        report.players += 1;

        for line in &sample.formats {
            db.upsert_format_stats(&player.id, line)
                .map_err(|e| write_failed(&report, EntityKind::PlayerStats, &player.id, e))?;
            report.format_stats += 1;
        }
    }

    for m in &matches {
        if let Err(e) = validate_match(m) {
            warn!(id = %m.id, error = %e, "skipping invalid match");
            report.skipped += 1;
            continue;
        }
        db.upsert_match(m)
            .map_err(|e| write_failed(&report, EntityKind::Match, &m.id, e))?;
        report.matches += 1;
    }

    info!(
        players = report.players,
        matches = report.matches,
        format_stats = report.format_stats,
        skipped = report.skipped,
        "seed complete"
    );
    Ok(report)
}

/// Fetch a live snapshot, falling back to the bundled sample when nothing
/// could be fetched
pub async fn live_source(api: &ApiConfig, format: MatchFormat) -> Result<SeedSource> {
    let client = match CricbuzzClient::new(api) {
        Ok(client) => client,
        Err(e) if e.is_fetch_failure() => {
            warn!(error = %e, "live seed unavailable, using bundled sample");
            eprintln!("⚠ Live fetch failed ({e}); seeding bundled sample data instead"); // tarpaulin::skip
            return Ok(SeedSource::Bundled);
        }
        Err(e) => return Err(e),
    };

    let snapshot = LiveSnapshot::fetch(&client, format).await;
    if snapshot.is_empty() {
        if let Some(e) = snapshot.errors.first() {
            warn!(error = %e, "live seed unavailable, using bundled sample");
            eprintln!("⚠ Live fetch failed ({e}); seeding bundled sample data instead"); // tarpaulin::skip
            return Ok(SeedSource::Bundled);
        }
    }
    for e in &snapshot.errors {
        eprintln!("⚠ Partial live fetch: {e}"); // tarpaulin::skip
    }
    Ok(SeedSource::Live(snapshot))
}

/// Resolve the requested source, seed, and print what was written.
///
/// With `clear`, emptying the store and seeding commit together or not at all.
pub async fn handle_seed(
    db: &mut CricketDatabase,
    api: &ApiConfig,
    live: bool,
    from: Option<&Path>,
    format: MatchFormat,
    clear: bool,
    as_json: bool,
) -> Result<()> {
    let source = if live {
        live_source(api, format).await?
    } else if let Some(dir) = from {
        SeedSource::Sample(SampleData::load(dir)?)
    } else {
        SeedSource::Bundled
    };

    let report = if clear {
        db.in_transaction(|db| {
            db.clear_all_data()?;
            info!("store cleared before seeding");
            seed(db, source)
        })?
    } else {
        seed(db, source)?
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?); // tarpaulin::skip
    } else {
        println!(
            "✓ Seeded {} players, {} matches, {} format lines ({} skipped)",
            report.players, report.matches, report.format_stats, report.skipped
        ); // tarpaulin::skip
    }
    Ok(())
}
