//! Unit tests for HTTP client functionality

use super::*;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header, header_exists, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::cli::types::MatchStatus;

    fn test_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            api_key: Some("test-key-1234567890".to_string()),
            api_host: "cricbuzz-cricket.p.rapidapi.com".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    fn test_client(server: &MockServer) -> CricbuzzClient {
        CricbuzzClient::new(&test_config(&server.uri())).unwrap()
    }

    fn live_payload() -> serde_json::Value {
        json!({
            "typeMatches": [{
                "matchType": "International",
                "seriesMatches": [{
                    "seriesAdWrapper": {
                        "seriesName": "Test series",
                        "matches": [{
                            "matchInfo": {
                                "matchId": 1001,
                                "matchFormat": "TEST",
                                "state": "In Progress",
                                "status": "Day 2: Session 1",
                                "team1": {"teamName": "India", "teamSName": "IND"},
                                "team2": {"teamName": "England", "teamSName": "ENG"},
                                "venueInfo": {"ground": "Lord's", "city": "London"}
                            }
                        }]
                    }
                }]
            }]
        })
    }

    #[tokio::test]
    async fn test_live_matches_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/live"))
            .and(header("x-rapidapi-key", "test-key-1234567890"))
            .and(header("x-rapidapi-host", "cricbuzz-cricket.p.rapidapi.com"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(live_payload()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let matches = test_client(&mock_server).live_matches().await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id.as_str(), "1001");
        assert_eq!(matches[0].status, MatchStatus::Live);
        assert_eq!(matches[0].venue.as_deref(), Some("Lord's"));
    }

    #[tokio::test]
    async fn test_upcoming_and_recent_paths() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/upcoming"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"typeMatches": []})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/matches/v1/recent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(live_payload()))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert!(client.upcoming_matches().await.unwrap().is_empty());
        assert_eq!(client.recent_matches().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_data_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/live"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let err = test_client(&mock_server).live_matches().await.unwrap_err();
        match err {
            CricketError::DataFetch {
                endpoint,
                cause: FetchFailure::Status { status, body },
            } => {
                assert_eq!(endpoint, "matches/v1/live");
                assert_eq!(status, 500);
                assert_eq!(body, "Internal Server Error");
            }
            other => panic!("Expected DataFetch status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/v1/player/trending"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too many requests"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = test_client(&mock_server).trending_players().await.unwrap_err();
        assert!(err.is_fetch_failure());
        match err {
            CricketError::DataFetch {
                cause: FetchFailure::Status { status: 429, .. },
                ..
            } => (),
            other => panic!("Expected 429 DataFetch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_data_fetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/live"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(live_payload())
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&mock_server)
            .await;

        let mut config = test_config(&mock_server.uri());
        config.timeout = Duration::from_millis(100);
        let client = CricbuzzClient::new(&config).unwrap();

        match client.live_matches().await.unwrap_err() {
            CricketError::DataFetch {
                cause: FetchFailure::Timeout,
                ..
            } => (),
            other => panic!("Expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/v1/player/9311"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": 42})))
            .mount(&mock_server)
            .await;

        let err = test_client(&mock_server)
            .player_profile(&PlayerId::new("9311"))
            .await
            .unwrap_err();
        match err {
            CricketError::DataFetch {
                cause: FetchFailure::Malformed(_),
                ..
            } => (),
            other => panic!("Expected malformed payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_listing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/recent"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let matches = test_client(&mock_server).recent_matches().await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_rankings_query_param() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/v1/rankings/bowlers"))
            .and(query_param("formatType", "odi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rank": [{"id": "10738", "rank": "1", "name": "Rashid Khan", "country": "Afghanistan"}]
            })))
            .mount(&mock_server)
            .await;

        let ranked = test_client(&mock_server)
            .rankings(RankingCategory::Bowlers, MatchFormat::Odi)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Rashid Khan");
    }

    #[tokio::test]
    async fn test_search_players() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats/v1/player/search"))
            .and(query_param("plrN", "Kohli"))
            .and(header_exists("x-rapidapi-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "player": [{"id": 1413, "name": "Virat Kohli", "teamName": "India"}]
            })))
            .mount(&mock_server)
            .await;

        let found = test_client(&mock_server).search_players("Kohli").await.unwrap();
        assert_eq!(found[0].id, "1413");
    }

    #[tokio::test]
    async fn test_match_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mcenter/v1/41881"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matchInfo": {
                    "matchId": 41881,
                    "matchFormat": "T20",
                    "state": "Complete",
                    "status": "Chennai won by 5 wkts",
                    "team1": {"name": "Gujarat"},
                    "team2": {"name": "Chennai"}
                }
            })))
            .mount(&mock_server)
            .await;

        let m = test_client(&mock_server)
            .match_detail(&MatchId::new("41881"))
            .await
            .unwrap();
        assert_eq!(m.teams[0], "Gujarat");
        assert_eq!(m.winner.as_deref(), Some("Chennai"));
    }

    #[tokio::test]
    async fn test_verify_connection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/matches/v1/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        assert!(test_client(&mock_server).verify_connection().await.is_ok());
    }

    #[test]
    fn test_missing_key_is_distinct_error() {
        let mut config = test_config("http://127.0.0.1:1");
        config.api_key = None;
        match CricbuzzClient::new(&config).unwrap_err() {
            CricketError::MissingApiKey { env_var } => assert_eq!(env_var, "RAPIDAPI_KEY"),
            other => panic!("Expected MissingApiKey, got {other:?}"),
        }
    }

    #[test]
    fn test_key_header_is_sensitive() {
        let headers = rapidapi_headers(&test_config("http://localhost")).unwrap();
        assert!(headers.get("x-rapidapi-key").unwrap().is_sensitive());
        assert!(headers.contains_key(ACCEPT));
    }
}
