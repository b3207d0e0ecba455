//! Error types for the Cricbuzz stats library

use std::fmt;
use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, CricketError>;

/// Maximum length for error response bodies kept inside an error
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Whether a failed statement was reading from or writing to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Read => write!(f, "read"),
            StatementKind::Write => write!(f, "write"),
        }
    }
}

/// The stored entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Match,
    PlayerStats,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Player => write!(f, "player"),
            EntityKind::Match => write!(f, "match"),
            EntityKind::PlayerStats => write!(f, "player stats"),
        }
    }
}

/// Why a single call to the cricket data API failed.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl FetchFailure {
    /// Build a status failure, truncating the body to keep errors readable
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        };
        FetchFailure::Status { status, body }
    }

    /// Classify a transport-level reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchFailure::Timeout
        } else {
            FetchFailure::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum CricketError {
    #[error("Failed to fetch {endpoint}: {cause}")]
    DataFetch {
        endpoint: String,
        #[source]
        cause: FetchFailure,
    },

    #[error("API key not configured: set the {env_var} environment variable")]
    MissingApiKey { env_var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Seeding stopped at {entity} {id} after {written} rows were written: {source}")]
    Seed {
        entity: EntityKind,
        id: String,
        written: usize,
        #[source]
        source: Box<CricketError>,
    },

    #[error("Store {operation} failed: {source}")]
    Store {
        operation: StatementKind,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("Unknown query: {id}")]
    UnknownQuery { id: u8 },

    #[error("Invalid value for query parameter {name}: {reason}")]
    InvalidQueryArgument { name: String, reason: String },

    #[error("Only read-only statements may be run as analytics queries")]
    ReadOnlyViolation,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl CricketError {
    pub(crate) fn fetch(endpoint: impl Into<String>, cause: FetchFailure) -> Self {
        CricketError::DataFetch {
            endpoint: endpoint.into(),
            cause,
        }
    }

    pub(crate) fn read(source: rusqlite::Error) -> Self {
        CricketError::Store {
            operation: StatementKind::Read,
            source,
        }
    }

    pub(crate) fn write(source: rusqlite::Error) -> Self {
        CricketError::Store {
            operation: StatementKind::Write,
            source,
        }
    }

    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        CricketError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures talking to the external API, including a missing key.
    ///
    /// Callers use this to decide whether to fall back to stored or sample data.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            CricketError::DataFetch { .. } | CricketError::MissingApiKey { .. }
        )
    }
}
