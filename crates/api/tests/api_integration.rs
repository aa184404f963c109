//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use reservation::{InventoryConfig, Section};
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    setup_with_inventory(&InventoryConfig::default())
}

fn setup_with_inventory(inventory: &InventoryConfig) -> axum::Router {
    let state = api::create_default_state(inventory);
    api::create_app(state, get_metrics_handle())
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn passenger(first: &str, section: Option<&str>, seat: Option<u32>) -> Value {
    json!({
        "first_name": first,
        "last_name": "Traveller",
        "email": format!("{}@example.com", first.to_lowercase()),
        "address": "1 Station Road",
        "section": section,
        "seat": seat,
    })
}

async fn reserve(app: &axum::Router, passengers: Vec<Value>) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/tickets",
        Some(json!({
            "from_code": "LON",
            "to_code": "PAR",
            "price_paid": 20,
            "passengers": passengers,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
    json
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_reserve_ticket() {
    let app = setup();

    let json = reserve(
        &app,
        vec![
            passenger("Ada", Some("A"), Some(1)),
            passenger("Grace", None, None),
        ],
    )
    .await;

    assert_eq!(json["ticket_no"], 1);
    assert_eq!(json["status"], "Confirmed");
    assert_eq!(json["message"], "Booked Successfully");
    assert_eq!(json["passenger_count"], 2);
    assert_eq!(json["passengers"][0]["section"], "A");
    assert_eq!(json["passengers"][0]["seat"], 1);
    assert_eq!(json["passengers"][1]["section"], "A");
    assert_eq!(json["passengers"][1]["seat"], 2);
}

#[tokio::test]
async fn test_reserve_without_passengers_is_bad_request() {
    let app = setup();

    let (status, json) = send(
        &app,
        "POST",
        "/tickets",
        Some(json!({ "from_code": "LON", "to_code": "PAR", "passengers": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("passenger"));
}

#[tokio::test]
async fn test_reserve_with_bad_section_is_bad_request() {
    let app = setup();

    let (status, _) = send(
        &app,
        "POST",
        "/tickets",
        Some(json!({
            "from_code": "LON",
            "to_code": "PAR",
            "passengers": [passenger("Ada", Some("Z"), Some(1))],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/tickets",
        Some(json!({
            "from_code": "LON",
            "to_code": "PAR",
            "passengers": [passenger("Ada", Some("AB"), Some(1))],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reserve_with_malformed_body_is_rejected() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tickets")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_reserve_beyond_capacity_is_conflict() {
    let inventory = InventoryConfig::new([Section::A], 1).unwrap();
    let app = setup_with_inventory(&inventory);

    reserve(&app, vec![passenger("Ada", None, None)]).await;
    let (status, json) = send(
        &app,
        "POST",
        "/tickets",
        Some(json!({
            "from_code": "LON",
            "to_code": "PAR",
            "passengers": [passenger("Grace", None, None)],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("No seats available"));
}

#[tokio::test]
async fn test_get_ticket() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", Some("B"), Some(4))]).await;

    let (status, json) = send(&app, "GET", "/tickets/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ticket_no"], 1);
    assert_eq!(json["passengers"][0]["section"], "B");
    assert_eq!(json["passengers"][0]["seat"], 4);
}

#[tokio::test]
async fn test_get_unknown_ticket_is_not_found() {
    let app = setup();

    let (status, json) = send(&app, "GET", "/tickets/99", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_get_with_invalid_id_is_bad_request() {
    let app = setup();

    let (status, _) = send(&app, "GET", "/tickets/not-a-number", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", None, None)]).await;
    reserve(&app, vec![passenger("Grace", None, None)]).await;

    let (status, json) = send(&app, "GET", "/tickets", None).await;

    assert_eq!(status, StatusCode::OK);
    let tickets = json.as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0]["ticket_no"], 2);
    assert_eq!(tickets[1]["ticket_no"], 1);
}

#[tokio::test]
async fn test_modify_moves_passenger() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", Some("A"), Some(1))]).await;

    let (status, json) = send(
        &app,
        "PUT",
        "/tickets/1/seats",
        Some(json!({ "passengers": [{ "section": "B", "seat": 7 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Modified");
    assert_eq!(json["message"], "Modification Saved");
    assert_eq!(json["changes"][0]["outcome"], "moved");
    assert_eq!(json["ticket"]["passengers"][0]["section"], "B");
    assert_eq!(json["ticket"]["passengers"][0]["seat"], 7);

    let (_, seats) = send(&app, "GET", "/seats", None).await;
    assert_eq!(seats["sections"][0]["slots"][0], Value::Null);
    assert_eq!(seats["sections"][1]["slots"][6], 1);
}

#[tokio::test]
async fn test_modify_onto_taken_seat_reports_conflict() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", Some("A"), Some(1))]).await;
    reserve(&app, vec![passenger("Grace", Some("A"), Some(2))]).await;

    let (status, json) = send(
        &app,
        "PUT",
        "/tickets/1/seats",
        Some(json!({ "passengers": [{ "section": "A", "seat": 2 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Failed");
    assert_eq!(json["message"], "Seat already taken: A2 (ticket 2)");
    assert_eq!(json["changes"][0]["outcome"], "conflict");
    assert_eq!(json["changes"][0]["owner"], 2);

    let (_, ticket) = send(&app, "GET", "/tickets/1", None).await;
    assert_eq!(ticket["passengers"][0]["seat"], 1);
}

#[tokio::test]
async fn test_modify_with_zero_seat_skips_passenger() {
    let app = setup();
    reserve(
        &app,
        vec![passenger("Ada", None, None), passenger("Grace", None, None)],
    )
    .await;

    let (status, json) = send(
        &app,
        "PUT",
        "/tickets/1/seats",
        Some(json!({
            "passengers": [{ "section": "A", "seat": 0 }, { "section": "B", "seat": 1 }],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changes"][0]["outcome"], "skipped");
    assert_eq!(json["changes"][1]["outcome"], "moved");
    assert_eq!(json["ticket"]["passengers"][0]["seat"], 1);
}

#[tokio::test]
async fn test_modify_out_of_range_seat_is_bad_request() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", None, None)]).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/tickets/1/seats",
        Some(json!({ "passengers": [{ "section": "A", "seat": 21 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_releases_seats() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", Some("A"), Some(3))]).await;

    let (status, json) = send(&app, "DELETE", "/tickets/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Cancelled");
    assert_eq!(json["message"], "Ticket Cancelled");
    assert_eq!(json["passengers"][0]["section"], "");
    assert_eq!(json["passengers"][0]["seat"], 0);

    let (_, seats) = send(&app, "GET", "/seats", None).await;
    assert_eq!(seats["available"], 40);

    let (status, _) = send(
        &app,
        "PUT",
        "/tickets/1/seats",
        Some(json!({ "passengers": [{ "section": "A", "seat": 3 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_unknown_ticket_is_not_found() {
    let app = setup();

    let (status, _) = send(&app, "DELETE", "/tickets/5", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seat_map_shape() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", None, None)]).await;

    let (status, json) = send(&app, "GET", "/seats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["capacity"], 40);
    assert_eq!(json["available"], 39);
    assert_eq!(json["seats_per_section"], 20);
    assert_eq!(json["sections"][0]["section"], "A");
    assert_eq!(json["sections"][0]["slots"][0], 1);
    assert_eq!(json["sections"][1]["slots"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    reserve(&app, vec![passenger("Ada", None, None)]).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("tickets_reserved_total"));
}
