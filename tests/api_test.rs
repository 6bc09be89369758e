//! Router-level tests: the full stack over the in-memory Unit of Work.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{test_config, InMemoryUnitOfWork, ACCESS_SECRET};
use marketplace_api::api::{create_router, AppState};
use marketplace_api::domain::Role;
use marketplace_api::services::{Claims, Services};

fn app(uow: &InMemoryUnitOfWork) -> Router {
    let services = Services::with_unit_of_work(Arc::new(uow.clone()), test_config());
    create_router(AppState::new(&services, None))
}

fn token(user_id: i32, role: Role) -> String {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        role,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(5)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(app, method, uri, bearer, body).await;
    (status, body)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

#[tokio::test]
async fn test_health_without_database() {
    let uow = InMemoryUnitOfWork::new();
    let (status, body) = send(&app(&uow), Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "unchecked");
}

#[tokio::test]
async fn test_protected_routes_require_bearer() {
    let uow = InMemoryUnitOfWork::new();
    let app = app(&uow);

    for (method, uri) in [
        (Method::GET, "/users/me"),
        (Method::GET, "/orders/info/1"),
        (Method::GET, "/tracking/status/1"),
        (Method::DELETE, "/products/admin/deleteproduct/1"),
    ] {
        let (status, body) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["status"], "fail");
    }

    let (status, _) = send(&app, Method::GET, "/users/me", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_role_is_forbidden_on_admin_routes() {
    let uow = InMemoryUnitOfWork::new();
    let user = uow.store.insert_user("user@example.com", "User", Role::User);
    let app = app(&uow);
    let bearer = token(user.id, Role::User);

    let (status, body) = send(&app, Method::GET, "/users/allUsers", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "fail");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/tracking/update/1",
        Some(&bearer),
        Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/orders/admin/info/1", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_catalog_reads_are_public() {
    let uow = InMemoryUnitOfWork::new();
    let products = uow.store.insert_products(&[100, 200]);
    let app = app(&uow);

    let (status, body) = send(&app, Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 2);

    let uri = format!("/products/category/{}", products[0].category_id);
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["productsByCategory"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::GET, "/products/424242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_validation_failure_lists_fields() {
    let uow = InMemoryUnitOfWork::new();
    let app = app(&uow);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Validation failed");
    let paths: Vec<&str> = body["meta"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["email", "password"]);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_failure() {
    let uow = InMemoryUnitOfWork::new();
    let user = uow.store.insert_user("user@example.com", "User", Role::User);
    let app = app(&uow);

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders/create",
        Some(&token(user.id, Role::User)),
        Some(json!({ "userId": user.id, "productIds": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["meta"][0]["path"], "body");
}

#[tokio::test]
async fn test_register_sets_refresh_cookie_and_hides_hash() {
    let uow = InMemoryUnitOfWork::new();
    let app = app(&uow);

    let (status, headers, body) = send_raw(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "new@example.com",
            "password": "password123",
            "name": "Newcomer"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["registeredUser"]["email"], "new@example.com");
    assert_eq!(body["registeredUser"]["role"], "USER");
    assert!(body["registeredUser"].get("passwordHash").is_none());
    assert!(body["accessToken"].as_str().is_some());

    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("refreshToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "new@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["meta"]["target"], json!(["email"]));
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let uow = InMemoryUnitOfWork::new();
    let (status, _) = send(&app(&uow), Method::POST, "/auth/refresh", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_order_flow_over_http() {
    let uow = InMemoryUnitOfWork::new();
    let buyer = uow.store.insert_user("buyer@example.com", "Buyer", Role::User);
    let admin = uow.store.insert_user("admin@example.com", "Admin", Role::Admin);
    let products = uow.store.insert_products(&[100, 200]);
    let app = app(&uow);
    let user_bearer = token(buyer.id, Role::User);
    let admin_bearer = token(admin.id, Role::Admin);

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders/create",
        Some(&user_bearer),
        Some(json!({ "userId": buyer.id, "productIds": [products[0].id, products[1].id, 999999] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "PLACED");
    assert_eq!(body["order"]["items"].as_array().unwrap().len(), 2);
    let order_id = body["order"]["id"].as_i64().unwrap();

    let uri = format!("/orders/users/{}", buyer.id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&user_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["userOrders"],
        json!([{
            "orderId": order_id,
            "userId": buyer.id,
            "status": "PLACED",
            "items": [
                { "productId": products[0].id, "quantity": 1, "price": 100.0 },
                { "productId": products[1].id, "quantity": 1, "price": 200.0 }
            ]
        }])
    );

    let uri = format!("/orders/admin/info/{}", order_id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&admin_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["orderInfo"]["user"],
        json!({ "id": buyer.id, "name": "Buyer", "email": "buyer@example.com" })
    );

    let uri = format!("/tracking/update/{}", order_id);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&admin_bearer),
        Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedStatus"]["status"], "SHIPPED");

    let uri = format!("/tracking/status/{}", order_id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&user_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusInfo"]["status"], "SHIPPED");

    let uri = format!("/orders/update-status/{}", order_id);
    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&admin_bearer),
        Some(json!({ "status": "LOST" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/orders/delete/{}", order_id);
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&user_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted successfully");

    let uri = format!("/orders/info/{}", order_id);
    let (status, body) = send(&app, Method::GET, &uri, Some(&user_bearer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn test_orders_are_scoped_to_their_owner() {
    let uow = InMemoryUnitOfWork::new();
    let owner = uow.store.insert_user("owner@example.com", "Owner", Role::User);
    let other = uow.store.insert_user("other@example.com", "Other", Role::User);
    let admin = uow.store.insert_user("admin@example.com", "Admin", Role::Admin);
    let products = uow.store.insert_products(&[100]);
    let app = app(&uow);
    let owner_bearer = token(owner.id, Role::User);
    let other_bearer = token(other.id, Role::User);
    let admin_bearer = token(admin.id, Role::Admin);

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders/create",
        Some(&other_bearer),
        Some(json!({ "userId": owner.id, "productIds": [products[0].id] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "fail");
    assert_eq!(uow.store.order_count(), 0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders/create",
        Some(&owner_bearer),
        Some(json!({ "userId": owner.id, "productIds": [products[0].id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["order"]["id"].as_i64().unwrap();

    let info_uri = format!("/orders/info/{}", order_id);
    let (status, _) = send(&app, Method::GET, &info_uri, Some(&other_bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let list_uri = format!("/orders/users/{}", owner.id);
    let (status, _) = send(&app, Method::GET, &list_uri, Some(&other_bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let delete_uri = format!("/orders/delete/{}", order_id);
    let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&other_bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(uow.store.order_count(), 1);

    let (status, body) = send(&app, Method::GET, &info_uri, Some(&admin_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderInfo"]["user"]["email"], "owner@example.com");

    let (status, body) = send(&app, Method::GET, &list_uri, Some(&admin_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userOrders"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/orders/create",
        Some(&admin_bearer),
        Some(json!({ "userId": owner.id, "productIds": [products[0].id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&admin_bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uow.store.order_count(), 1);
}

#[tokio::test]
async fn test_admin_can_manage_catalog() {
    let uow = InMemoryUnitOfWork::new();
    let admin = uow.store.insert_user("admin@example.com", "Admin", Role::Admin);
    let existing = uow.store.insert_products(&[50]).remove(0);
    let app = app(&uow);
    let bearer = token(admin.id, Role::Admin);

    let (status, body) = send(
        &app,
        Method::POST,
        "/products/admin/addproduct",
        Some(&bearer),
        Some(json!({
            "name": "Tablet",
            "price": 499.99,
            "stock": 5,
            "categoryId": existing.category_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newProduct"]["name"], "Tablet");
    let product_id = body["newProduct"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/products/admin/addproduct",
        Some(&bearer),
        Some(json!({ "name": "Ghost", "price": 1, "stock": 1, "categoryId": 9999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");

    let uri = format!("/products/admin/updateproduct/{}", product_id);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&bearer),
        Some(json!({ "stock": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedProduct"]["stock"], 7);

    let uri = format!("/products/admin/deleteproduct/{}", product_id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bearer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
