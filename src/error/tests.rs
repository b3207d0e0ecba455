//! Unit tests for error handling

use super::*;
use std::io;

#[cfg(test)]
mod cricket_error_tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_error_classification() {
        // Nothing listens on port 9 locally, so the connection is refused
        let client = reqwest::Client::new();
        let reqwest_error = client.get("http://127.0.0.1:9/").send().await.unwrap_err();
        let failure = FetchFailure::from_reqwest(reqwest_error);

        match failure {
            FetchFailure::Transport(_) => (),
            _ => panic!("Expected Transport failure"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = CricketError::from(json_error);

        match error {
            CricketError::Json(_) => (),
            _ => panic!("Expected Json error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = CricketError::from(io_error);

        match error {
            CricketError::Io(_) => (),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_invalid_header_error_conversion() {
        let header_error = reqwest::header::HeaderValue::from_str("bad\nvalue").unwrap_err();
        let error = CricketError::from(header_error);

        match error {
            CricketError::InvalidHeader(_) => (),
            _ => panic!("Expected InvalidHeader error variant"),
        }
    }

    #[test]
    fn test_status_body_truncated() {
        let body = "x".repeat(500);
        match FetchFailure::from_status(503, &body) {
            FetchFailure::Status { status, body } => {
                assert_eq!(status, 503);
                assert!(body.starts_with(&"x".repeat(200)));
                assert!(body.contains("truncated, 500 total bytes"));
            }
            _ => panic!("Expected Status failure"),
        }
    }

    #[test]
    fn test_status_truncation_respects_char_boundaries() {
        // 'é' is two bytes, so byte 200 falls inside a character
        let body = format!("a{}", "é".repeat(150));
        match FetchFailure::from_status(500, &body) {
            FetchFailure::Status { body, .. } => assert!(body.contains("truncated")),
            _ => panic!("Expected Status failure"),
        }
    }

    #[test]
    fn test_data_fetch_display() {
        let error = CricketError::fetch(
            "matches/v1/live",
            FetchFailure::from_status(429, "Too many requests"),
        );
        assert_eq!(
            error.to_string(),
            "Failed to fetch matches/v1/live: HTTP 429: Too many requests"
        );
        assert!(error.is_fetch_failure());
    }

    #[test]
    fn test_missing_api_key_error() {
        let error = CricketError::MissingApiKey {
            env_var: "RAPIDAPI_KEY".to_string(),
        };
        assert!(error.is_fetch_failure());
        assert_eq!(
            error.to_string(),
            "API key not configured: set the RAPIDAPI_KEY environment variable"
        );
    }

    #[test]
    fn test_store_error_carries_statement_kind() {
        let error = CricketError::write(rusqlite::Error::QueryReturnedNoRows);
        match &error {
            CricketError::Store { operation, .. } => assert_eq!(*operation, StatementKind::Write),
            _ => panic!("Expected Store error"),
        }
        assert!(error.to_string().starts_with("Store write failed"));
        assert!(!error.is_fetch_failure());
    }

    #[test]
    fn test_not_found_display() {
        let error = CricketError::NotFound {
            entity: EntityKind::Match,
            id: "M100".to_string(),
        };
        assert_eq!(error.to_string(), "match not found: M100");
    }

    #[test]
    fn test_seed_error_exposes_source() {
        use std::error::Error;

        let error = CricketError::Seed {
            entity: EntityKind::Player,
            id: "p1".to_string(),
            written: 4,
            source: Box::new(CricketError::validation("name", "must not be empty")),
        };
        assert!(error.to_string().contains("after 4 rows"));
        let source = error.source().unwrap();
        assert_eq!(source.to_string(), "Invalid name: must not be empty");
    }
}
