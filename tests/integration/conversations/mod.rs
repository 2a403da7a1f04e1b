//! Conversation lifecycle integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{authed_request, request, TestApp};

async fn post_message(app: &TestApp, id: &str, body: Value) -> (StatusCode, Value) {
    app.send(request(
        Method::POST,
        &format!("/api/conversations/{}/messages", id),
        Some(body),
    ))
    .await
}

async fn get_detail(app: &TestApp, id: &str) -> Value {
    let (status, envelope) = app
        .send(request(
            Method::GET,
            &format!("/api/conversations/{}", id),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    envelope["data"].clone()
}

#[tokio::test]
async fn test_create_conversation_returns_201_with_defaults() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;

    assert_eq!(conversation["state"], "open");
    assert_eq!(conversation["severity"], "P2");
    assert_eq!(conversation["sentiment"], "neutral");
    assert_eq!(conversation["intent"], "general_inquiry");
    assert_eq!(conversation["messageCount"], 0);
    assert_eq!(conversation["currentChannel"], "web_chat");
    assert!(conversation["lastMessageAt"].is_null());
    assert!(conversation["resolvedAt"].is_null());
    assert!(conversation["resolutionId"].is_null());
    assert!(conversation["sla"]["firstResponseDueAt"].is_string());
    assert_eq!(conversation["sla"]["breached"], false);
}

#[tokio::test]
async fn test_create_conversation_with_initial_message() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({
            "customerName": "Alice",
            "channel": "web_chat",
            "initialMessage": "Help",
        }))
        .await;

    assert_eq!(conversation["state"], "open");
    assert_eq!(conversation["messageCount"], 1);
    assert!(conversation["lastMessageAt"].is_string());

    let detail = get_detail(&app, conversation["id"].as_str().unwrap()).await;
    assert_eq!(detail["messages"].as_array().unwrap().len(), 1);
    assert_eq!(detail["messages"][0]["content"], "Help");
    assert_eq!(detail["messages"][0]["direction"], "inbound");
    assert_eq!(detail["messages"][0]["senderType"], "customer");
}

#[tokio::test]
async fn test_create_conversation_with_unknown_customer_id_is_404() {
    let app = TestApp::new();
    let (status, envelope) = app
        .send(request(
            Method::POST,
            "/api/conversations",
            Some(json!({"customerId": "7d9f3a00-0000-0000-0000-000000000000"})),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_conversation_accepts_classifier_annotations() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({
            "severity": "P0",
            "sentiment": "angry",
            "intent": "outage_report",
        }))
        .await;

    assert_eq!(conversation["severity"], "P0");
    assert_eq!(conversation["sentiment"], "angry");
    assert_eq!(conversation["intent"], "outage_report");
}

#[tokio::test]
async fn test_get_missing_conversation_is_404_naming_the_id() {
    let app = TestApp::new();
    let (status, envelope) = app
        .send(request(
            Method::GET,
            "/api/conversations/does-not-exist",
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"]["code"], "NOT_FOUND");
    assert!(envelope["error"]["message"]
        .as_str()
        .unwrap()
        .contains("does-not-exist"));
}

#[tokio::test]
async fn test_message_count_tracks_stored_messages() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({"initialMessage": "first"}))
        .await;
    let id = conversation["id"].as_str().unwrap();

    for content in ["second", "third", "fourth"] {
        let (status, _) = post_message(&app, id, json!({"content": content})).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let detail = get_detail(&app, id).await;
    assert_eq!(detail["messageCount"], 4);
    assert_eq!(detail["messages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_agent_and_customer_messages_drive_state() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let (_, envelope) = post_message(
        &app,
        id,
        json!({"direction": "outbound", "senderType": "agent", "content": "On it"}),
    )
    .await;
    assert_eq!(envelope["data"]["direction"], "outbound");
    assert_eq!(get_detail(&app, id).await["state"], "awaiting_customer");

    post_message(&app, id, json!({"content": "thanks"})).await;
    assert_eq!(get_detail(&app, id).await["state"], "awaiting_agent");

    // An internal note leaves the state alone.
    post_message(
        &app,
        id,
        json!({"direction": "internal", "senderType": "system", "content": "note"}),
    )
    .await;
    assert_eq!(get_detail(&app, id).await["state"], "awaiting_agent");
}

#[tokio::test]
async fn test_message_to_missing_conversation_is_404() {
    let app = TestApp::new();
    let (status, _) = post_message(
        &app,
        "00000000-0000-0000-0000-000000000000",
        json!({"content": "hello?"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_requires_content() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let (status, envelope) = post_message(&app, id, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_message_on_new_channel_is_tracked() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({"channel": "web_chat", "initialMessage": "hi"}))
        .await;
    let id = conversation["id"].as_str().unwrap();

    post_message(&app, id, json!({"channel": "email", "content": "follow-up"})).await;

    let detail = get_detail(&app, id).await;
    assert_eq!(detail["currentChannel"], "email");
    assert_eq!(
        detail["channelsUsed"],
        json!(["web_chat", "email"])
    );
}

#[tokio::test]
async fn test_assign_sets_agent_and_state() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let (status, envelope) = app
        .send(request(
            Method::POST,
            &format!("/api/conversations/{}/assign", id),
            Some(json!({"agentId": "agent-7", "teamId": "team-infra"})),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["data"]["state"], "awaiting_agent");
    assert_eq!(envelope["data"]["assignedAgentId"], "agent-7");
    assert_eq!(envelope["data"]["assignedTeamId"], "team-infra");
}

#[tokio::test]
async fn test_assign_requires_agent_id() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let (status, envelope) = app
        .send(request(
            Method::POST,
            &format!("/api/conversations/{}/assign", id),
            Some(json!({})),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(envelope["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_resolve_appends_exactly_one_system_message() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({"initialMessage": "broken"}))
        .await;
    let id = conversation["id"].as_str().unwrap();

    let (status, envelope) = app
        .send(request(
            Method::POST,
            &format!("/api/conversations/{}/resolve", id),
            Some(json!({"resolutionNotes": "fixed in 2.3.1"})),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["data"]["state"], "resolved");
    assert!(envelope["data"]["resolvedAt"].is_string());

    let detail = get_detail(&app, id).await;
    let messages = detail["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["senderType"], "system");
    assert_eq!(messages[1]["direction"], "internal");
    assert!(messages[1]["content"]
        .as_str()
        .unwrap()
        .contains("fixed in 2.3.1"));
    assert_eq!(detail["messageCount"], 2);
}

// Resolved is terminal: there is no reopen transition, so lifecycle
// operations against a resolved conversation are conflicts. Message posts
// still do bookkeeping without changing state.
#[tokio::test]
async fn test_resolved_is_terminal() {
    let app = TestApp::new();
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let resolve_uri = format!("/api/conversations/{}/resolve", id);
    let (status, _) = app
        .send(request(Method::POST, &resolve_uri, Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, envelope) = app
        .send(request(Method::POST, &resolve_uri, Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(envelope["error"]["code"], "CONFLICT");

    let (status, _) = app
        .send(request(
            Method::POST,
            &format!("/api/conversations/{}/escalate", id),
            Some(json!({})),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_message(&app, id, json!({"content": "still broken"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let detail = get_detail(&app, id).await;
    assert_eq!(detail["state"], "resolved");
    assert_eq!(detail["messageCount"], 2);
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let app = TestApp::new();
    let conversation = app
        .create_conversation(json!({
            "customerName": "Alice",
            "channel": "web_chat",
            "initialMessage": "Help",
        }))
        .await;
    let id = conversation["id"].as_str().unwrap();
    assert_eq!(conversation["state"], "open");
    assert_eq!(conversation["messageCount"], 1);

    post_message(
        &app,
        id,
        json!({"direction": "outbound", "senderType": "agent", "content": "Hello Alice"}),
    )
    .await;
    assert_eq!(get_detail(&app, id).await["state"], "awaiting_customer");

    post_message(&app, id, json!({"content": "It is still broken"})).await;
    assert_eq!(get_detail(&app, id).await["state"], "awaiting_agent");

    let (status, envelope) = app
        .send(request(
            Method::POST,
            &format!("/api/conversations/{}/resolve", id),
            Some(json!({})),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["data"]["state"], "resolved");
    assert!(envelope["data"]["resolvedAt"].is_string());
}

#[tokio::test]
async fn test_list_filters_by_severity_and_sorts() {
    let app = TestApp::new();
    for severity in ["P3", "P1", "P2", "P0", "P1"] {
        app.create_conversation(json!({"severity": severity})).await;
    }

    let (status, envelope) = app
        .send(request(
            Method::GET,
            "/api/conversations?severity=P0,P1",
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let items = envelope["data"].as_array().unwrap();
    let severities: Vec<&str> = items
        .iter()
        .map(|c| c["severity"].as_str().unwrap())
        .collect();
    assert_eq!(severities, vec!["P0", "P1", "P1"]);
    assert_eq!(envelope["pagination"]["totalItems"], 3);
}

#[tokio::test]
async fn test_list_filters_combine_across_fields() {
    let app = TestApp::new();

    let escalated = app.create_conversation(json!({"severity": "P1"})).await;
    app.create_conversation(json!({"severity": "P1"})).await;
    app.create_conversation(json!({"severity": "P3"})).await;

    let id = escalated["id"].as_str().unwrap();
    app.send(request(
        Method::POST,
        &format!("/api/conversations/{}/escalate", id),
        Some(json!({})),
    ))
    .await;

    // state AND severity must both match.
    let (_, envelope) = app
        .send(request(
            Method::GET,
            "/api/conversations?state=escalated&severity=P1,P3",
            None,
        ))
        .await;
    let items = envelope["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], escalated["id"]);

    // OR within a field.
    let (_, envelope) = app
        .send(request(
            Method::GET,
            "/api/conversations?state=open,escalated",
            None,
        ))
        .await;
    assert_eq!(envelope["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_pagination_envelope() {
    let app = TestApp::new();
    for _ in 0..5 {
        app.create_conversation(json!({})).await;
    }

    let (status, envelope) = app
        .send(request(
            Method::GET,
            "/api/conversations?page=2&pageSize=2",
            None,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["data"].as_array().unwrap().len(), 2);
    assert_eq!(envelope["pagination"]["page"], 2);
    assert_eq!(envelope["pagination"]["pageSize"], 2);
    assert_eq!(envelope["pagination"]["totalItems"], 5);
}

#[tokio::test]
async fn test_authenticated_agent_message_is_attributed_to_actor() {
    let app = TestApp::new();
    let token = app.login().await;
    let conversation = app.create_conversation(json!({})).await;
    let id = conversation["id"].as_str().unwrap();

    let (status, envelope) = app
        .send(authed_request(
            Method::POST,
            &format!("/api/conversations/{}/messages", id),
            &token,
            Some(json!({"direction": "outbound", "senderType": "agent", "content": "hi"})),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(envelope["data"]["senderId"].is_string());
}
