//! Route-level tests driving the assembled router with oneshot requests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use feast_server::auth::{JwtConfig, JwtService, password};
use feast_server::core::{Config, ServerState, build_app};
use feast_server::db::MIGRATOR;
use feast_server::db::repository::user;
use shared::models::{User, UserCreate, UserRole};

const TEST_SECRET: &str = "test-secret-test-secret-test-secret-test-secret!";

async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

fn test_config() -> Config {
    Config {
        http_port: 0,
        database_path: ":memory:".to_string(),
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expiration_minutes: 60,
            issuer: "feast-server".to_string(),
            audience: "feast-clients".to_string(),
        },
        environment: "test".to_string(),
        log_dir: None,
        admin_username: "admin".to_string(),
        admin_email: "admin@feast.local".to_string(),
        admin_password: None,
    }
}

/// Build the app plus an admin account with a ready-to-use token.
async fn setup_app() -> (Router, ServerState, String) {
    let pool = setup_pool().await;
    let config = test_config();
    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    let state = ServerState::new(config, pool, jwt_service);

    let hash = password::hash_password("admin password!").expect("hash");
    let admin: User = user::create(
        &state.pool,
        &UserCreate {
            username: "admin".to_string(),
            email: "admin@feast.local".to_string(),
            password: String::new(),
            first_name: "Feast".to_string(),
            last_name: "Admin".to_string(),
            phone: None,
        },
        &hash,
        UserRole::Admin,
    )
    .await
    .expect("create admin");

    let admin_token = state
        .jwt_service
        .generate_token(admin.id, &admin.username, admin.role)
        .expect("admin token");

    let app = build_app(state.clone());
    (app, state, admin_token)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("build request")
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("build request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse json body")
}

async fn register_customer(app: &Router, username: &str, email: &str) -> (String, i64) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "username": username,
                "email": email,
                "password": "customer password",
                "first_name": "Test",
                "last_name": "Customer",
                "phone": null
            }),
        ))
        .await
        .expect("register request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let token = body["token"].as_str().expect("token").to_string();
    let id = body["user"]["id"].as_i64().expect("user id");
    (token, id)
}

async fn create_menu_item(app: &Router, admin_token: &str, name: &str, price: f64) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/menu",
            Some(admin_token),
            &json!({
                "name": name,
                "description": null,
                "category": "Mains",
                "unit_price": price,
                "image_url": null,
                "is_available": true
            }),
        ))
        .await
        .expect("create menu item");
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("item id")
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state, _admin) = setup_app().await;
    let response = app
        .oneshot(bare_request("GET", "/api/health", None))
        .await
        .expect("health request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn register_login_me_flow() {
    let (app, _state, _admin) = setup_app().await;
    let (token, _id) = register_customer(&app, "maria", "maria@example.com").await;

    // Duplicate email is refused regardless of username
    let dup = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "username": "maria2",
                "email": "maria@example.com",
                "password": "customer password",
                "first_name": "Maria",
                "last_name": "Santos",
                "phone": null
            }),
        ))
        .await
        .expect("duplicate register");
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    let dup_body = body_json(dup).await;
    assert!(dup_body["error"].is_string());

    // Wrong password yields the unified 401
    let bad_login = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "maria@example.com", "password": "wrong password"}),
        ))
        .await
        .expect("bad login");
    assert_eq!(bad_login.status(), StatusCode::UNAUTHORIZED);

    // Correct login returns a token
    let login = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "maria@example.com", "password": "customer password"}),
        ))
        .await
        .expect("login");
    assert_eq!(login.status(), StatusCode::OK);
    let login_body = body_json(login).await;
    assert!(login_body["token"].is_string());
    assert_eq!(login_body["user"]["username"], "maria");

    // /me requires and honors the token
    let me = app
        .clone()
        .oneshot(bare_request("GET", "/api/auth/me", Some(&token)))
        .await
        .expect("me request");
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["username"], "maria");

    let anonymous = app
        .clone()
        .oneshot(bare_request("GET", "/api/auth/me", None))
        .await
        .expect("anonymous me");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn menu_is_public_to_read_admin_to_write() {
    let (app, _state, admin_token) = setup_app().await;

    // Browsing needs no session
    let listing = app
        .clone()
        .oneshot(bare_request("GET", "/api/menu", None))
        .await
        .expect("menu listing");
    assert_eq!(listing.status(), StatusCode::OK);

    let item = json!({
        "name": "Lechon Belly",
        "description": null,
        "category": "Mains",
        "unit_price": 100.0,
        "image_url": null,
        "is_available": true
    });

    // Anonymous and customer writes are refused
    let anonymous = app
        .clone()
        .oneshot(json_request("POST", "/api/menu", None, &item))
        .await
        .expect("anonymous create");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let (customer_token, _) = register_customer(&app, "maria", "maria@example.com").await;
    let customer = app
        .clone()
        .oneshot(json_request("POST", "/api/menu", Some(&customer_token), &item))
        .await
        .expect("customer create");
    assert_eq!(customer.status(), StatusCode::FORBIDDEN);

    // Admin write succeeds and shows up in the public listing
    let admin = app
        .clone()
        .oneshot(json_request("POST", "/api/menu", Some(&admin_token), &item))
        .await
        .expect("admin create");
    assert_eq!(admin.status(), StatusCode::CREATED);

    let listing = app
        .clone()
        .oneshot(bare_request("GET", "/api/menu?category=Mains", None))
        .await
        .expect("filtered listing");
    let body = body_json(listing).await;
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn booking_end_to_end_over_http() {
    let (app, _state, admin_token) = setup_app().await;
    let lechon = create_menu_item(&app, &admin_token, "Lechon Belly", 100.0).await;
    let lumpia = create_menu_item(&app, &admin_token, "Lumpia Platter", 50.0).await;

    let (maria_token, _) = register_customer(&app, "maria", "maria@example.com").await;
    let (bob_token, _) = register_customer(&app, "bob", "bob@example.com").await;

    let booking_body = json!({
        "event_type": "Wedding",
        "event_date": "2026-09-12",
        "event_venue": "Garden Pavilion",
        "guest_count": 120,
        "special_instructions": "Leche flan station please",
        "menu_items": [
            {"item_id": lechon, "quantity": 3},
            {"item_id": lumpia, "quantity": 1}
        ]
    });

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            Some(&maria_token),
            &booking_body,
        ))
        .await
        .expect("create booking");
    assert_eq!(created.status(), StatusCode::CREATED);
    let created_body = body_json(created).await;
    assert_eq!(created_body["total_amount"], 350.0);
    assert_eq!(created_body["status"], "pending");
    let booking_id = created_body["id"].as_i64().expect("booking id");

    // The same date cannot be booked twice
    let conflict = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            Some(&bob_token),
            &booking_body,
        ))
        .await
        .expect("conflicting booking");
    assert_eq!(conflict.status(), StatusCode::CONFLICT);

    // Cross-user reads look like 404; admin reads succeed
    let uri = format!("/api/bookings/{booking_id}");
    let as_bob = app
        .clone()
        .oneshot(bare_request("GET", &uri, Some(&bob_token)))
        .await
        .expect("bob read");
    assert_eq!(as_bob.status(), StatusCode::NOT_FOUND);

    let as_admin = app
        .clone()
        .oneshot(bare_request("GET", &uri, Some(&admin_token)))
        .await
        .expect("admin read");
    assert_eq!(as_admin.status(), StatusCode::OK);

    // Receipt: 12% of 350 = 42
    let receipt = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/receipts/generate",
            Some(&maria_token),
            &json!({"booking_id": booking_id, "payment_method": "cash"}),
        ))
        .await
        .expect("generate receipt");
    assert_eq!(receipt.status(), StatusCode::CREATED);
    let receipt_body = body_json(receipt).await;
    assert_eq!(receipt_body["subtotal"], 350.0);
    assert_eq!(receipt_body["tax_amount"], 42.0);
    assert_eq!(receipt_body["total_amount"], 392.0);
    assert_eq!(receipt_body["payment_status"], "pending");
    let receipt_id = receipt_body["id"].as_i64().expect("receipt id");

    // Printable page
    let html = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/receipts/{receipt_id}/html"),
            Some(&maria_token),
        ))
        .await
        .expect("receipt html");
    assert_eq!(html.status(), StatusCode::OK);
    let content_type = html
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    // Mark it paid
    let paid = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/receipts/{receipt_id}/payment-status"),
            Some(&maria_token),
            &json!({"status": "paid"}),
        ))
        .await
        .expect("mark paid");
    assert_eq!(paid.status(), StatusCode::OK);
    assert_eq!(body_json(paid).await["payment_status"], "paid");
}

#[tokio::test]
async fn dashboard_is_admin_only() {
    let (app, _state, admin_token) = setup_app().await;
    let (customer_token, _) = register_customer(&app, "maria", "maria@example.com").await;

    let as_customer = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/admin/dashboard",
            Some(&customer_token),
        ))
        .await
        .expect("customer dashboard");
    assert_eq!(as_customer.status(), StatusCode::FORBIDDEN);

    let as_admin = app
        .clone()
        .oneshot(bare_request("GET", "/api/admin/dashboard", Some(&admin_token)))
        .await
        .expect("admin dashboard");
    assert_eq!(as_admin.status(), StatusCode::OK);
    let body = body_json(as_admin).await;
    // Admin plus the registered customer
    assert_eq!(body["statistics"]["active_users"], 2);
    assert!(body["recent_bookings"].is_array());
    assert!(body["revenue_by_period"].is_array());
}

#[tokio::test]
async fn messages_flow_over_http() {
    let (app, _state, admin_token) = setup_app().await;
    let (customer_token, _) = register_customer(&app, "maria", "maria@example.com").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/messages",
            Some(&customer_token),
            &json!({"subject": "Menu question", "message_content": "Vegetarian set available?"}),
        ))
        .await
        .expect("create message");
    assert_eq!(created.status(), StatusCode::CREATED);
    let message_id = body_json(created).await["id"].as_i64().expect("message id");

    // Customers cannot use the admin inbox or respond
    let inbox_as_customer = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/messages/all?status=unread",
            Some(&customer_token),
        ))
        .await
        .expect("customer inbox");
    assert_eq!(inbox_as_customer.status(), StatusCode::FORBIDDEN);

    // Admin inbox sees the unread message with sender fields
    let inbox = app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/messages/all?status=unread",
            Some(&admin_token),
        ))
        .await
        .expect("admin inbox");
    assert_eq!(inbox.status(), StatusCode::OK);
    let inbox_body = body_json(inbox).await;
    assert_eq!(inbox_body.as_array().expect("array").len(), 1);
    assert_eq!(inbox_body[0]["sender_email"], "maria@example.com");

    // Admin responds; the customer sees the reply on their own copy
    let respond = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/messages/{message_id}/respond"),
            Some(&admin_token),
            &json!({"response": "Yes, we have a full vegetarian set."}),
        ))
        .await
        .expect("respond");
    assert_eq!(respond.status(), StatusCode::OK);
    assert_eq!(body_json(respond).await["status"], "replied");

    let own = app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/messages/{message_id}"),
            Some(&customer_token),
        ))
        .await
        .expect("own message");
    assert_eq!(own.status(), StatusCode::OK);
    let own_body = body_json(own).await;
    assert_eq!(own_body["status"], "replied");
    assert_eq!(
        own_body["admin_response"],
        "Yes, we have a full vegetarian set."
    );
}
