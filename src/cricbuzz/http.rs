//! Thin client for the Cricbuzz API on RapidAPI.
//!
//! Every call is a single attempt: a timeout, a non-2xx status (429 included)
//! or an undecodable body comes back as `CricketError::DataFetch` and the
//! caller decides whether to fall back to stored data.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{
    MatchEntry, MatchesEnvelope, PlayerListEnvelope, PlayerProfile, PlayerSummary,
    RankedPlayer, RankingCategory, RankingsEnvelope,
};
use crate::cli::types::{MatchFormat, MatchId, PlayerId};
use crate::config::{ApiConfig, API_KEY_ENV_VAR};
use crate::error::{CricketError, FetchFailure, Result};
use crate::storage::Match;

#[cfg(test)]
mod tests;

const USER_AGENT: &str = concat!("cricbuzz-stats/", env!("CARGO_PKG_VERSION"));

/// Endpoints of the match listing family
const LIVE_MATCHES: &str = "matches/v1/live";
const UPCOMING_MATCHES: &str = "matches/v1/upcoming";
const RECENT_MATCHES: &str = "matches/v1/recent";

/// Build the RapidAPI headers for `config`.
///
/// Fails with `MissingApiKey` when no key is configured.
pub fn rapidapi_headers(config: &ApiConfig) -> Result<HeaderMap> {
    let key = config
        .api_key
        .as_deref()
        .ok_or_else(|| CricketError::MissingApiKey {
            env_var: API_KEY_ENV_VAR.to_string(),
        })?;

    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let mut key = HeaderValue::from_str(key)?;
    key.set_sensitive(true);
    h.insert("x-rapidapi-key", key);
    h.insert("x-rapidapi-host", HeaderValue::from_str(&config.api_host)?);
    Ok(h)
}

#[derive(Debug, Clone)]
pub struct CricbuzzClient {
    http: Client,
    base_url: String,
}

impl CricbuzzClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let headers = rapidapi_headers(config)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CricketError::InvalidConfig {
                message: format!("could not build HTTP client: {e}"),
            })?;

        debug!(
            base_url = %config.base_url,
            api_key = config.masked_key().as_deref().unwrap_or("-"),
            "Cricbuzz client ready"
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                let cause = FetchFailure::from_reqwest(e);
                warn!(endpoint, %cause, "request failed");
                CricketError::fetch(endpoint, cause)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CricketError::fetch(endpoint, FetchFailure::from_reqwest(e)))?;

        if !status.is_success() {
            let cause = FetchFailure::from_status(status.as_u16(), &body);
            warn!(endpoint, status = status.as_u16(), "API returned an error status");
            return Err(CricketError::fetch(endpoint, cause));
        }

        // Some endpoints answer 2xx with an empty body when there is nothing to list
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            warn!(endpoint, error = %e, "malformed payload");
            CricketError::fetch(endpoint, FetchFailure::Malformed(e))
        })
    }

    async fn match_list(&self, endpoint: &str) -> Result<Vec<Match>> {
        let envelope: MatchesEnvelope = self.get_json(endpoint, &[]).await?;
        let matches = envelope.into_matches();
        debug!(endpoint, count = matches.len(), "matches fetched");
        Ok(matches)
    }

    /// Matches currently in play
    pub async fn live_matches(&self) -> Result<Vec<Match>> {
        self.match_list(LIVE_MATCHES).await
    }

    pub async fn upcoming_matches(&self) -> Result<Vec<Match>> {
        self.match_list(UPCOMING_MATCHES).await
    }

    pub async fn recent_matches(&self) -> Result<Vec<Match>> {
        self.match_list(RECENT_MATCHES).await
    }

    /// Full match-centre record for a single match
    pub async fn match_detail(&self, id: &MatchId) -> Result<Match> {
        let endpoint = format!("mcenter/v1/{id}");
        let entry: MatchEntry = self.get_json(&endpoint, &[]).await?;
        Ok(entry.into_match())
    }

    /// ICC ranking table for a category and format
    pub async fn rankings(
        &self,
        category: RankingCategory,
        format: MatchFormat,
    ) -> Result<Vec<RankedPlayer>> {
        let endpoint = format!("stats/v1/rankings/{}", category.path_segment());
        let envelope: RankingsEnvelope = self
            .get_json(&endpoint, &[("formatType", format.ranking_param())])
            .await?;
        Ok(envelope.rank)
    }

    pub async fn trending_players(&self) -> Result<Vec<PlayerSummary>> {
        let envelope: PlayerListEnvelope =
            self.get_json("stats/v1/player/trending", &[]).await?;
        Ok(envelope.player)
    }

    pub async fn search_players(&self, name: &str) -> Result<Vec<PlayerSummary>> {
        let envelope: PlayerListEnvelope = self
            .get_json("stats/v1/player/search", &[("plrN", name)])
            .await?;
        Ok(envelope.player)
    }

    pub async fn player_profile(&self, id: &PlayerId) -> Result<PlayerProfile> {
        let endpoint = format!("stats/v1/player/{id}");
        self.get_json(&endpoint, &[]).await
    }

    /// Cheap round trip used by `overview` to report API reachability
    pub async fn verify_connection(&self) -> Result<()> {
        let _: serde_json::Value = self.get_json(LIVE_MATCHES, &[]).await?;
        Ok(())
    }
}
