//! Runtime configuration read once at startup.
//!
//! Values come from the process environment (optionally primed from a `.env`
//! file by the binary):
//!
//! | Variable                | Default                                   |
//! |-------------------------|-------------------------------------------|
//! | `RAPIDAPI_KEY`          | unset (API calls fail with `MissingApiKey`) |
//! | `RAPIDAPI_HOST`         | `cricbuzz-cricket.p.rapidapi.com`         |
//! | `CRICBUZZ_BASE_URL`     | `https://<RAPIDAPI_HOST>`                 |
//! | `CRICBUZZ_TIMEOUT_SECS` | `12`                                      |
//! | `DATABASE_URL`          | `sqlite:///<cache dir>/cricbuzz-stats/cricket.db` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CricketError, Result};

pub const API_KEY_ENV_VAR: &str = "RAPIDAPI_KEY";
pub const API_HOST_ENV_VAR: &str = "RAPIDAPI_HOST";
pub const BASE_URL_ENV_VAR: &str = "CRICBUZZ_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "CRICBUZZ_TIMEOUT_SECS";
pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";

pub const DEFAULT_API_HOST: &str = "cricbuzz-cricket.p.rapidapi.com";

/// Default request timeout; long enough for RapidAPI's slower mirrors
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

const APP_NAME: &str = "cricbuzz-stats";
const DATABASE_FILE: &str = "cricket.db";

/// Where the relational store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Memory,
    File(PathBuf),
}

impl DatabaseUrl {
    /// Default file under the user's cache directory
    pub fn default_file() -> Self {
        let base = dirs::cache_dir().unwrap_or_else(|| {
            let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.push(".cache");
            home
        });
        DatabaseUrl::File(base.join(APP_NAME).join(DATABASE_FILE))
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseUrl::Memory => write!(f, "sqlite::memory:"),
            DatabaseUrl::File(path) => write!(f, "sqlite:///{}", path.display()),
        }
    }
}

impl FromStr for DatabaseUrl {
    type Err = CricketError;

    /// Accepts `sqlite::memory:`, `sqlite:///path`, `sqlite://path` or a bare path
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CricketError::InvalidConfig {
                message: format!("{DATABASE_URL_ENV_VAR} is empty"),
            });
        }
        if s == "sqlite::memory:" || s == ":memory:" || s == "sqlite://:memory:" {
            return Ok(DatabaseUrl::Memory);
        }
        if let Some(path) = s.strip_prefix("sqlite:///") {
            return Ok(DatabaseUrl::File(PathBuf::from(path)));
        }
        if let Some(path) = s.strip_prefix("sqlite://") {
            return Ok(DatabaseUrl::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = s.split_once("://") {
            return Err(CricketError::InvalidConfig {
                message: format!("unsupported database scheme '{scheme}'; only sqlite is available"),
            });
        }
        Ok(DatabaseUrl::File(PathBuf::from(s)))
    }
}

/// Settings for the external cricket data API
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub api_host: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Key with everything but the ends hidden, for log lines
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() > 9 {
                let head: String = chars[..5].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{head}...{tail}")
            } else {
                "***".to_string()
            }
        })
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.masked_key())
            .field("api_host", &self.api_host)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database_url: DatabaseUrl,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_host = get(API_HOST_ENV_VAR).unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        let base_url = get(BASE_URL_ENV_VAR)
            .unwrap_or_else(|| format!("https://{api_host}"))
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get(TIMEOUT_ENV_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| CricketError::InvalidConfig {
                    message: format!("{TIMEOUT_ENV_VAR} must be a positive number of seconds, got '{raw}'"),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let database_url = match get(DATABASE_URL_ENV_VAR) {
            Some(raw) => raw.parse()?,
            None => DatabaseUrl::default_file(),
        };

        Ok(Self {
            api: ApiConfig {
                api_key: get(API_KEY_ENV_VAR),
                api_host,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            database_url,
        })
    }
}
