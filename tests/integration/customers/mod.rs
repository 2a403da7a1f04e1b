//! Customer endpoint integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{request, TestApp};

#[tokio::test]
async fn test_create_and_fetch_customer() {
    let app = TestApp::new();

    let (status, envelope) = app
        .send(request(
            Method::POST,
            "/api/customers",
            Some(json!({
                "name": "Acme Corp",
                "email": "ops@acme.example",
                "company": "Acme",
            })),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let customer = envelope["data"].clone();
    assert_eq!(customer["name"], "Acme Corp");
    assert_eq!(customer["tier"], "standard");

    let id = customer["id"].as_str().unwrap();
    let (status, envelope) = app
        .send(request(Method::GET, &format!("/api/customers/{}", id), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(envelope["data"], customer);
}

#[tokio::test]
async fn test_conversation_for_existing_customer() {
    let app = TestApp::new();

    let (_, envelope) = app
        .send(request(
            Method::POST,
            "/api/customers",
            Some(json!({"name": "Bob"})),
        ))
        .await;
    let customer_id = envelope["data"]["id"].as_str().unwrap().to_string();

    let conversation = app
        .create_conversation(json!({"customerId": customer_id}))
        .await;
    assert_eq!(conversation["customerId"], customer_id.as_str());

    // The inline path creates a customer on the fly instead.
    let conversation = app
        .create_conversation(json!({"customerName": "Carol"}))
        .await;
    assert_ne!(conversation["customerId"], customer_id.as_str());

    let (_, envelope) = app.send(request(Method::GET, "/api/customers", None)).await;
    assert_eq!(envelope["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn test_missing_customer_is_404() {
    let app = TestApp::new();
    let (status, envelope) = app
        .send(request(Method::GET, "/api/customers/unknown", None))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(envelope["error"]["code"], "NOT_FOUND");
}
