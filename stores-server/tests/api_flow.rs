//! End-to-end exercise of the HTTP surface against an in-memory store:
//! item CRUD, the ledger path, low-stock view, the order → bid → award →
//! invoice flow, and the error payload shape.

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use stores_server::core::{Config, Server, ServerState};

async fn test_app() -> Router {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let config = Config {
        http_port: 0,
        database_path: ":memory:".into(),
        environment: "test".into(),
        log_level: "debug".into(),
        log_dir: None,
    };
    Server::build_router(ServerState { config, pool })
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn item_payload(name: &str, stock: i64, minimum: i64) -> Value {
    json!({
        "name": name,
        "category": "Engine Stores",
        "unit": "ltr",
        "current_stock": stock,
        "minimum_stock": minimum,
        "location": "Engine room locker 2",
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn item_crud_and_ledger_flow() {
    let app = test_app().await;

    let (status, item) = send(
        &app,
        "POST",
        "/api/items",
        Some(item_payload("Lube oil", 100, 50)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_i64().unwrap();

    // out 30 → 70
    let (status, txn) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "item_id": item_id, "direction": "out", "quantity": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(txn["direction"], "out");

    let (_, item) = send(&app, "GET", &format!("/api/items/{item_id}"), None).await;
    assert_eq!(item["current_stock"], 70);

    // out 80 → 409, stock unchanged, no extra ledger row
    let (status, err) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "item_id": item_id, "direction": "out", "quantity": 80 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["code"], 4002);

    let (_, item) = send(&app, "GET", &format!("/api/items/{item_id}"), None).await;
    assert_eq!(item["current_stock"], 70);
    let (_, rows) = send(
        &app,
        "GET",
        &format!("/api/transactions/item/{item_id}"),
        None,
    )
    .await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    // stock-bearing item cannot be deleted
    let (status, _) = send(&app, "DELETE", &format!("/api/items/{item_id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn low_stock_view_orders_by_depletion_ratio() {
    let app = test_app().await;
    send(&app, "POST", "/api/items", Some(item_payload("Coffee", 6, 10))).await; // 0.6
    send(&app, "POST", "/api/items", Some(item_payload("Filters", 3, 10))).await; // 0.3
    send(&app, "POST", "/api/items", Some(item_payload("Rice", 50, 20))).await; // fine

    let (status, body) = send(&app, "GET", "/api/items/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Filters", "Coffee"]);
}

#[tokio::test]
async fn procurement_flow_from_order_to_paid_invoice() {
    let app = test_app().await;

    let (_, rope) = send(&app, "POST", "/api/items", Some(item_payload("Rope", 2, 8))).await;
    let (_, paint) = send(&app, "POST", "/api/items", Some(item_payload("Paint", 5, 10))).await;
    let (_, cheap) = send(
        &app,
        "POST",
        "/api/chandlers",
        Some(json!({ "name": "Seven Seas Supply" })),
    )
    .await;
    let (_, dear) = send(
        &app,
        "POST",
        "/api/chandlers",
        Some(json!({ "name": "Harbour Stores" })),
    )
    .await;

    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "items": [
                { "item_id": rope["id"], "quantity": 10, "unit": "pcs" },
                { "item_id": paint["id"], "quantity": 4, "unit": "tin" },
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending-quotes");
    let order_id = order["id"].as_i64().unwrap();
    let order_no = order["order_no"].as_str().unwrap();
    assert!(order_no.starts_with("ORD-"));
    assert!(order_no.ends_with("-001"));

    let (_, detail) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    let mut lines = detail["items"].as_array().unwrap().clone();
    assert_eq!(lines.len(), 2);
    // Ids are not insertion-ordered; pin rope (qty 10) before paint (qty 4)
    lines.sort_by_key(|l| std::cmp::Reverse(l["quantity"].as_i64().unwrap()));
    let priced = |unit_prices: [f64; 2]| -> Value {
        lines
            .iter()
            .zip(unit_prices)
            .map(|(line, unit_price)| {
                json!({
                    "order_item_id": line["id"],
                    "unit_price": unit_price,
                    "availability": "in-stock",
                })
            })
            .collect()
    };

    // 10×10 + 4×20 = 180
    let (status, low_bid) = send(
        &app,
        "POST",
        "/api/bids",
        Some(json!({
            "order_id": order_id,
            "chandler_id": cheap["id"],
            "items": priced([10.0, 20.0]),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(low_bid["total_amount"], 180.0);

    // 10×15 + 4×25 = 250
    let (_, high_bid) = send(
        &app,
        "POST",
        "/api/bids",
        Some(json!({
            "order_id": order_id,
            "chandler_id": dear["id"],
            "items": priced([15.0, 25.0]),
        })),
    )
    .await;

    // First bid already moved the order along
    let (_, order) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(order["status"], "quotes-received");

    // Accept the lower bid
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/bids/{}", low_bid["id"]),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(detail["status"], "approved");
    assert_eq!(detail["selected_chandler_id"], cheap["id"]);
    assert_eq!(detail["total_amount"], 180.0);
    let statuses: Vec<&str> = detail["bids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["status"].as_str().unwrap())
        .collect();
    assert!(statuses.contains(&"accepted"));
    assert!(statuses.contains(&"rejected"));
    let _ = high_bid;

    // Deliver, then bill
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{order_id}"),
        Some(json!({ "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, invoice) = send(
        &app,
        "POST",
        "/api/invoices",
        Some(json!({
            "order_id": order_id,
            "chandler_id": cheap["id"],
            "due_date": 4102444800000i64,
            "total_amount": 180.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["status"], "unpaid");
    assert_eq!(invoice["effective_status"], "unpaid");

    let (_, invoice) = send(
        &app,
        "PATCH",
        &format!("/api/invoices/{}", invoice["id"]),
        Some(json!({ "paid_amount": 180.0 })),
    )
    .await;
    assert_eq!(invoice["status"], "paid");

    // Billed orders cannot be deleted
    let (status, _) = send(&app, "DELETE", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_status_patch_applies_nothing() {
    let app = test_app().await;
    let (_, item) = send(&app, "POST", "/api/items", Some(item_payload("Rope", 2, 8))).await;
    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "notes": "original note",
            "items": [{ "item_id": item["id"], "quantity": 3, "unit": "pcs" }],
        })),
    )
    .await;
    let order_id = order["id"].as_i64().unwrap();

    // Illegal transition combined with a metadata change: neither lands
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{order_id}"),
        Some(json!({ "notes": "sneaky note", "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 5002);

    let (_, order) = send(&app, "GET", &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(order["notes"], "original note");
    assert_eq!(order["status"], "pending-quotes");
}

#[tokio::test]
async fn validation_errors_carry_field_list() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/items",
        Some(json!({
            "name": "",
            "category": "Provisions",
            "unit": "kg",
            "location": "Store room",
            "current_stock": -5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"current_stock"));
}

#[tokio::test]
async fn user_responses_never_carry_the_password_hash() {
    let app = test_app().await;
    let (status, user) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": "captain.smith",
            "password": "password123",
            "display_name": "Captain John Smith",
            "role": "admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());
    assert_eq!(user["role"], "admin");

    let (_, users) = send(&app, "GET", "/api/users", None).await;
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn missing_resources_return_404() {
    let app = test_app().await;
    for path in [
        "/api/items/42",
        "/api/chandlers/42",
        "/api/orders/42",
        "/api/bids/42",
        "/api/invoices/42",
        "/api/users/42",
    ] {
        let (status, body) = send(&app, "GET", path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["code"], 3, "{path}");
    }
}
