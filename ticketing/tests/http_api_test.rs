//! HTTP API integration tests.
//!
//! Drives the full router with `axum-test` over in-memory stores, checking
//! routing, status codes and the JSON contract of every endpoint.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Integration tests can use expect for setup

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use ticketing::api::events::EventResponse;
use ticketing::api::tickets::TicketResponse;
use ticketing::server::{AppState, build_router};
use ticketing::server::health::HealthResponse;
use ticketing_core::{Event, TicketStatus};
use ticketing_runtime::{PurchaseCoordinator, PurchaseEnvironment, PurchaseSettings, RetryPolicy};
use ticketing_testing::{
    InMemoryBuyerDirectory, InMemoryCatalogStore, InMemoryTicketStore, MockNotifier,
    NotifierBehavior, SequentialCodeGenerator, fixtures, test_clock,
};

struct TestApp {
    server: TestServer,
    catalog: InMemoryCatalogStore,
    notifier: MockNotifier,
}

fn test_app() -> TestApp {
    let catalog = InMemoryCatalogStore::new();
    let notifier = MockNotifier::new(NotifierBehavior::Succeed);

    let coordinator = PurchaseCoordinator::new(
        PurchaseEnvironment {
            catalog: Arc::new(catalog.clone()),
            buyers: Arc::new(InMemoryBuyerDirectory::new()),
            tickets: Arc::new(InMemoryTicketStore::new()),
            notifier: Arc::new(notifier.clone()),
            codes: Arc::new(SequentialCodeGenerator::new()),
            clock: Arc::new(test_clock()),
        },
        PurchaseSettings {
            retry: RetryPolicy::builder()
                .initial_delay(Duration::from_millis(1))
                .max_delay(Duration::from_millis(5))
                .build(),
            ..PurchaseSettings::default()
        },
    );

    let server = TestServer::new(build_router(AppState::new(coordinator)))
        .expect("Failed to start test server");

    TestApp {
        server,
        catalog,
        notifier,
    }
}

fn seed_event(app: &TestApp, total: u32, price_minor_units: u64) -> Event {
    let event = fixtures::event(total, price_minor_units);
    app.catalog.insert_event(event.clone());
    event
}

fn purchase_body(event: &Event, email: &str, quantity: u32) -> Value {
    json!({
        "event_id": event.id.to_string(),
        "buyer_name": "Amina Wanjiru",
        "buyer_email": email,
        "buyer_phone": "+254700000000",
        "quantity": quantity,
    })
}

#[tokio::test]
async fn test_health() {
    let app = test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_list_and_get_events() {
    let app = test_app();
    let event = seed_event(&app, 10, 10_000);

    let listed: Vec<EventResponse> = app.server.get("/api/events").await.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, *event.id.as_uuid());

    let response = app.server.get(&format!("/api/events/{}", event.id)).await;
    response.assert_status_ok();
    let body: EventResponse = response.json();
    assert_eq!(body.name, event.name);
    assert_eq!(body.price, "100.00");
    assert_eq!(body.available_tickets, 10);
    assert_eq!(body.total_tickets, 10);
}

#[tokio::test]
async fn test_get_unknown_event() {
    let app = test_app();

    let response = app
        .server
        .get("/api/events/00000000-0000-0000-0000-000000000001")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

/// Test: the purchase → lookup → cancel flow over HTTP.
#[tokio::test]
async fn test_purchase_lookup_and_cancel() {
    println!("🧪 HTTP Test: purchase, lookup, cancel");
    let app = test_app();
    let event = seed_event(&app, 10, 100);

    let response = app
        .server
        .post("/api/tickets/purchase")
        .json(&purchase_body(&event, "Amina@Example.com", 3))
        .await;
    response.assert_status(StatusCode::CREATED);
    let ticket: TicketResponse = response.json();
    assert_eq!(ticket.code, "TKT-000001");
    assert_eq!(ticket.quantity, 3);
    assert_eq!(ticket.total_price, "3.00");
    assert_eq!(ticket.total_price_minor_units, 300);
    assert_eq!(ticket.status, TicketStatus::Active);
    assert_eq!(app.catalog.snapshot(event.id).unwrap().available_tickets, 7);

    let fetched: TicketResponse = app.server.get("/api/tickets/TKT-000001").await.json();
    assert_eq!(fetched.buyer_id, ticket.buyer_id);

    let response = app.server.post("/api/tickets/TKT-000001/cancel").await;
    response.assert_status_ok();
    let cancelled: TicketResponse = response.json();
    assert_eq!(cancelled.status, TicketStatus::Cancelled);
    assert_eq!(app.catalog.snapshot(event.id).unwrap().available_tickets, 10);

    let response = app.server.post("/api/tickets/TKT-000001/cancel").await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_STATE");

    assert!(app.notifier.wait_for_calls(1, Duration::from_secs(1)).await);
}

#[tokio::test]
async fn test_purchase_more_than_available() {
    let app = test_app();
    let event = seed_event(&app, 5, 100);

    let response = app
        .server
        .post("/api/tickets/purchase")
        .json(&purchase_body(&event, "kofi@example.com", 6))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "INSUFFICIENT_INVENTORY");
    assert_eq!(app.catalog.snapshot(event.id).unwrap().available_tickets, 5);
}

#[tokio::test]
async fn test_purchase_validation_errors() {
    let app = test_app();
    let event = seed_event(&app, 5, 100);

    for body in [
        purchase_body(&event, "kofi@example.com", 0),
        purchase_body(&event, "not-an-email", 1),
        purchase_body(&event, "kofi@example.com", 11),
    ] {
        let response = app.server.post("/api/tickets/purchase").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = response.json();
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }

    assert_eq!(app.catalog.snapshot(event.id).unwrap().available_tickets, 5);
}

#[tokio::test]
async fn test_purchase_unknown_event() {
    let app = test_app();
    let event = fixtures::event(5, 100);

    let response = app
        .server
        .post("/api/tickets/purchase")
        .json(&purchase_body(&event, "kofi@example.com", 1))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_use_ticket() {
    let app = test_app();
    let event = seed_event(&app, 5, 100);
    app.server
        .post("/api/tickets/purchase")
        .json(&purchase_body(&event, "kofi@example.com", 1))
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.server.post("/api/tickets/TKT-000001/use").await;
    response.assert_status_ok();
    let used: TicketResponse = response.json();
    assert_eq!(used.status, TicketStatus::Used);

    app.server
        .post("/api/tickets/TKT-000001/cancel")
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(app.catalog.snapshot(event.id).unwrap().available_tickets, 4);
}

#[tokio::test]
async fn test_unknown_ticket() {
    let app = test_app();

    app.server
        .get("/api/tickets/TKT-NOPE")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/api/tickets/TKT-NOPE/cancel")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_buyer_tickets() {
    let app = test_app();
    let event = seed_event(&app, 20, 100);
    for quantity in [1, 2] {
        app.server
            .post("/api/tickets/purchase")
            .json(&purchase_body(&event, "wanjiru@example.com", quantity))
            .await
            .assert_status(StatusCode::CREATED);
    }
    app.server
        .post("/api/tickets/purchase")
        .json(&purchase_body(&event, "someone.else@example.com", 1))
        .await
        .assert_status(StatusCode::CREATED);

    let tickets: Vec<TicketResponse> = app
        .server
        .get("/api/buyers/WANJIRU@example.com/tickets")
        .await
        .json();
    assert_eq!(tickets.len(), 2);

    let none: Vec<TicketResponse> = app
        .server
        .get("/api/buyers/nobody@example.com/tickets")
        .await
        .json();
    assert!(none.is_empty());

    app.server
        .get("/api/buyers/not-an-email/tickets")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
