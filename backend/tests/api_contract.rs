//! End-to-end contract tests over the full route table.
//!
//! Validation-path tests run against a store client pointing at an
//! unroutable address: those requests must be rejected before any store
//! call happens (or surface a 500 envelope when a store call was
//! expected). Positive-path tests run against a small in-process stub
//! speaking just enough of the store's REST and auth protocol.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use url::Url;

use backend::api::health::HealthState;
use backend::outbound::store::StoreClient;
use backend::server;

fn store_client(base: &str) -> web::Data<StoreClient> {
    let base = Url::parse(base).expect("valid base URL");
    let client =
        StoreClient::new(base, "test-anon-key", Duration::from_secs(2)).expect("client builds");
    web::Data::new(client)
}

/// A store client nothing listens behind; any request through it fails.
fn unroutable_store() -> web::Data<StoreClient> {
    store_client("http://127.0.0.1:9")
}

async fn send(
    store: web::Data<StoreClient>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let health = web::Data::new(HealthState::new());
    let app = test::init_service(App::new().configure(server::configure(store, health))).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn assert_failure(body: &Value, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], message);
    assert!(body.get("data").is_none());
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn products_list_rejects_a_bad_sort_order() {
    let req = test::TestRequest::get().uri("/api/products?order=sideways");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid sort order. Must be \"asc\" or \"desc\"");
}

#[actix_web::test]
async fn products_list_rejects_a_bad_sort_field() {
    let req = test::TestRequest::get().uri("/api/products?sortBy=weight");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(
        &body,
        "Invalid sort field. Must be one of: price, name, created_at, stock",
    );
}

#[actix_web::test]
async fn product_fetch_rejects_a_malformed_id() {
    let req = test::TestRequest::get().uri("/api/products/not-a-uuid");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid product ID format");
}

#[actix_web::test]
async fn product_create_requires_name_and_price() {
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({}));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Missing required fields: name and price");
}

#[actix_web::test]
async fn product_create_rejects_a_negative_price() {
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({ "name": "Ramen", "price": -1 }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Price must be a positive number");
}

#[actix_web::test]
async fn product_create_accepts_a_zero_price() {
    // Zero passes validation; the failure here is the unreachable
    // store, which proves the request got past the validators.
    let req = test::TestRequest::post()
        .uri("/api/products")
        .set_json(json!({ "name": "Water", "price": 0 }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn order_create_lists_every_missing_field() {
    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({}));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Missing required fields: user_id, items, total_price");
}

#[actix_web::test]
async fn order_create_rejects_a_malformed_user_id() {
    let req = test::TestRequest::post().uri("/api/orders").set_json(json!({
        "user_id": "not-a-uuid",
        "items": [{ "product_id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 1, "price": 5 }],
        "total_price": 5
    }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid user_id format");
}

#[actix_web::test]
async fn order_create_rejects_a_zero_quantity_item() {
    let req = test::TestRequest::post().uri("/api/orders").set_json(json!({
        "user_id": "6fa459ea-ee8a-3ca4-894e-db77e160355e",
        "items": [{ "product_id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 0, "price": 5 }],
        "total_price": 5
    }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Item quantity must be at least 1");
}

#[actix_web::test]
async fn order_create_rejects_an_incomplete_item() {
    let req = test::TestRequest::post().uri("/api/orders").set_json(json!({
        "user_id": "6fa459ea-ee8a-3ca4-894e-db77e160355e",
        "items": [{ "product_id": "550e8400-e29b-41d4-a716-446655440000" }],
        "total_price": 5
    }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Each item requires product_id, quantity and price");
}

#[actix_web::test]
async fn order_fetch_rejects_a_malformed_id() {
    let req = test::TestRequest::get().uri("/api/orders/banana");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid order ID format");
}

#[actix_web::test]
async fn order_update_requires_a_status_field() {
    let req = test::TestRequest::patch()
        .uri("/api/orders/550e8400-e29b-41d4-a716-446655440000")
        .set_json(json!({ "total_price": 99.0 }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(
        &body,
        "No updateable fields provided. Currently only \"status\" can be updated",
    );
}

#[actix_web::test]
async fn order_update_rejects_an_unknown_status() {
    let req = test::TestRequest::patch()
        .uri("/api/orders/550e8400-e29b-41d4-a716-446655440000")
        .set_json(json!({ "status": "teleported" }));
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(
        &body,
        "Invalid status. Must be one of: pending, processing, shipped, delivered, cancelled",
    );
}

#[actix_web::test]
async fn orders_list_rejects_a_malformed_user_filter() {
    let req = test::TestRequest::get().uri("/api/orders?userId=nope");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_failure(&body, "Invalid userId format");
}

#[actix_web::test]
async fn signup_validates_its_inputs() {
    let cases = [
        (json!({}), "Email and password are required"),
        (
            json!({ "email": "not-an-email", "password": "abcdef" }),
            "Invalid email format",
        ),
        (
            json!({ "email": "a@b.com", "password": "abc" }),
            "Password must be at least 6 characters long",
        ),
    ];
    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(payload);
        let (status, body) = send(unroutable_store(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_failure(&body, expected);
    }
}

#[actix_web::test]
async fn me_without_a_token_is_unauthenticated() {
    let req = test::TestRequest::get().uri("/api/auth/me");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_failure(&body, "Not authenticated");
}

#[actix_web::test]
async fn unknown_routes_get_an_enveloped_404() {
    let req = test::TestRequest::get().uri("/api/unknown");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Resource not found");
}

#[actix_web::test]
async fn malformed_json_bodies_get_an_enveloped_400() {
    let req = test::TestRequest::post()
        .uri("/api/products")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json");
    let (status, body) = send(unroutable_store(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn readiness_flips_with_the_health_state() {
    let health = web::Data::new(HealthState::new());
    let app = test::init_service(
        App::new().configure(server::configure(unroutable_store(), health.clone())),
    )
    .await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.mark_ready();
    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------
// Positive paths against an in-process store stub.
// ---------------------------------------------------------------------

fn product_row(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "price": 10.99,
        "image_url": null,
        "category": "ramen",
        "stock": 5,
        "calories": null,
        "spicy_level": null,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

async fn stub_products(req: HttpRequest) -> HttpResponse {
    let wants_single = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("vnd.pgrst.object"));
    if wants_single {
        // PostgREST's no-rows answer for a single-object fetch.
        return HttpResponse::NotAcceptable().json(json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        }));
    }
    HttpResponse::Ok()
        .insert_header(("Content-Range", "0-1/25"))
        .json(json!([
            product_row("550e8400-e29b-41d4-a716-446655440000", "Shoyu Ramen"),
            product_row("6fa459ea-ee8a-3ca4-894e-db77e160355e", "Miso Ramen"),
        ]))
}

async fn stub_signup() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "id": "16fd2706-8baf-433b-82eb-8c7fada847da",
        "email": "new@example.com",
        "user_metadata": { "name": "new" }
    }))
}

async fn stub_profiles(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Created().json(json!([body.into_inner()]))
}

/// Bind a minimal store stub on an ephemeral port and return its address.
fn spawn_store_stub() -> SocketAddr {
    let server = HttpServer::new(|| {
        App::new()
            .route("/rest/v1/products", web::get().to(stub_products))
            .route("/auth/v1/signup", web::post().to(stub_signup))
            .route("/rest/v1/user_profiles", web::post().to(stub_profiles))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("stub binds");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    addr
}

#[actix_web::test]
async fn products_list_pages_through_the_store() {
    let addr = spawn_store_stub();
    let req = test::TestRequest::get().uri("/api/products?category=ramen&limit=10");
    let (status, body) = send(store_client(&format!("http://{addr}")), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["name"], "Shoyu Ramen");
    assert_eq!(body["pagination"]["total"], 25);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPrevPage"], false);
}

#[actix_web::test]
async fn missing_product_rows_become_a_404_envelope() {
    let addr = spawn_store_stub();
    let req = test::TestRequest::get().uri("/api/products/550e8400-e29b-41d4-a716-446655440000");
    let (status, body) = send(store_client(&format!("http://{addr}")), req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_failure(&body, "Product not found");
}

#[actix_web::test]
async fn signup_returns_the_created_user() {
    let addr = spawn_store_stub();
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "email": "new@example.com", "password": "abcdef" }));
    let (status, body) = send(store_client(&format!("http://{addr}")), req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"]["user"]["id"],
        "16fd2706-8baf-433b-82eb-8c7fada847da"
    );
    assert_eq!(
        body["data"]["message"],
        "Account created successfully. Please check your email to confirm."
    );
}
