//! Integration tests for the Google Maps client (wiremock-based)

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_maps::{GoogleMapsClient, MapsClient, MapsConfig, MapsEndpoint, MapsError};

fn config_for_mock(base_url: &str) -> MapsConfig {
    MapsConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        timeout_secs: 1,
    }
}

fn distance_matrix_json() -> serde_json::Value {
    json!({
        "status": "OK",
        "origin_addresses": ["O'Connell St, Dublin"],
        "destination_addresses": ["College Green, Dublin"],
        "rows": [{
            "elements": [{
                "status": "OK",
                "distance": { "text": "1.5 km", "value": 1500 },
                "duration": { "text": "2 mins", "value": 90 }
            }]
        }]
    })
}

#[tokio::test]
async fn test_distance_matrix_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .and(query_param("origins", "53.3498,-6.2603"))
        .and(query_param("destinations", "53.3438,-6.2546"))
        .and(query_param("mode", "walking"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(distance_matrix_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let body = client
        .query(
            MapsEndpoint::DistanceMatrix,
            &[
                ("origins", "53.3498,-6.2603".to_string()),
                ("destinations", "53.3438,-6.2546".to_string()),
                ("mode", "walking".to_string()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(body["rows"][0]["elements"][0]["distance"]["value"], 1500);
}

#[tokio::test]
async fn test_directions_path_and_alternatives() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("alternatives", "true"))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "OK", "routes": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let body = client
        .query(
            MapsEndpoint::Directions,
            &[
                ("origin", "1,2".to_string()),
                ("destination", "3,4".to_string()),
                ("mode", "bicycling".to_string()),
                ("alternatives", "true".to_string()),
            ],
        )
        .await
        .unwrap();

    assert!(body["routes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client
        .query(MapsEndpoint::NearbySearch, &[("radius", "100".to_string())])
        .await;

    assert!(matches!(result, Err(MapsError::HttpStatus(503))));
}

#[tokio::test]
async fn test_provider_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .query(MapsEndpoint::PlaceDetails, &[("place_id", "abc".to_string())])
        .await
        .unwrap_err();

    match err {
        MapsError::ProviderStatus {
            status,
            error_message,
        } => {
            assert_eq!(status, "REQUEST_DENIED");
            assert_eq!(
                error_message.as_deref(),
                Some("The provided API key is invalid.")
            );
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_results_is_no_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/nearbysearch/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client
        .query(MapsEndpoint::NearbySearch, &[("radius", "100".to_string())])
        .await
        .unwrap_err();

    assert!(err.is_no_result());
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.query(MapsEndpoint::DistanceMatrix, &[]).await;

    assert!(matches!(result, Err(MapsError::ParseError(_))));
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "OK", "routes": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.query(MapsEndpoint::Directions, &[]).await;

    assert!(matches!(result, Err(MapsError::Timeout { timeout_secs: 1 })));
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(distance_matrix_json()))
        .expect(0)
        .mount(&server)
        .await;

    let config = MapsConfig {
        api_key: None,
        ..config_for_mock(&server.uri())
    };
    let client = GoogleMapsClient::new(&config).unwrap();

    assert!(!client.is_configured());
    let result = client.query(MapsEndpoint::DistanceMatrix, &[]).await;
    assert!(matches!(result, Err(MapsError::MissingApiKey)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_refused_maps_to_connection_failed() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = GoogleMapsClient::new(&config_for_mock(&uri)).unwrap();
    let err = client
        .query(MapsEndpoint::DistanceMatrix, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, MapsError::ConnectionFailed(_)), "got {err:?}");
}

/// Records the level of every event emitted by this crate
#[derive(Clone, Default)]
struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with("integration_maps") {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }
}

#[tokio::test]
async fn test_failures_are_logged_at_debug_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/distancematrix/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ZERO_RESULTS", "routes": [] })),
        )
        .mount(&server)
        .await;

    let recorder = LevelRecorder::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder.clone()));

    let client = GoogleMapsClient::new(&config_for_mock(&server.uri())).unwrap();
    assert!(client.query(MapsEndpoint::DistanceMatrix, &[]).await.is_err());
    assert!(client.query(MapsEndpoint::Directions, &[]).await.is_err());

    let levels = recorder.0.lock().unwrap().clone();
    assert!(!levels.is_empty());
    assert!(levels.iter().all(|level| *level == Level::DEBUG), "got {levels:?}");
}
