//! Integration tests for common Pushwire workflows.
//!
//! These tests drive the facade crate end to end against a mock FCM server.

use pushwire::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_fcm() -> MockServer {
    let server = MockServer::start().await;

    // Lookup: "stale" is unknown, everything else is fine
    Mock::given(method("GET"))
        .and(path("/iid/info"))
        .and(query_param("token", "stale"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "NotFound"})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iid/info"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"application": "com.example.app"})),
        )
        .mount(&server)
        .await;

    server
}

fn client_for(server: &MockServer) -> FcmClient {
    let config = FcmConfig::builder("workflow-key")
        .send_url(format!("{}/fcm/send", server.uri()))
        .lookup_url(format!("{}/iid/info", server.uri()))
        .build();
    FcmClient::from_config(config).unwrap()
}

// =============================================================================
// Clean-then-send Workflow
// =============================================================================

#[tokio::test]
async fn test_clean_then_send() {
    let server = mock_fcm().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "multicast_id": 7,
            "success": 1,
            "failure": 1,
            "canonical_ids": 0,
            "results": [
                {"message_id": "0:1"},
                {"error": "NotRegistered"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.push_multiple(["fresh", "stale", "expired"], json!({"message": "hi"}));

    let removed = client.clean_registration_ids().await;
    assert_eq!(removed, vec!["stale"]);
    assert_eq!(client.message().registration_ids, vec!["fresh", "expired"]);

    let response = client.send().await.unwrap();
    assert_eq!(response.multicast_id, 7);

    let invalid = response.invalid_tokens();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid["expired"], "NotRegistered");
}

// =============================================================================
// Topic Workflow
// =============================================================================

#[tokio::test]
async fn test_condition_send() {
    let server = mock_fcm().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message_id": 6_200_000})))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_data(json!({"score": "5x1"}));
    {
        let message = client.message_mut();
        message.condition = "'TopicA' in topics && 'TopicB' in topics".to_string();
        message.notification = Some(NotificationPayload::new("Goal", "5x1").sound("default"));
        message.priority = "normal".to_string();
    }

    let response = client.send().await.unwrap();
    assert_eq!(response.message_id, Some(6_200_000));
    assert!(response.results.is_empty());
    assert!(response.invalid_tokens().is_empty());
    assert_eq!(client.message().priority, "normal");
}
