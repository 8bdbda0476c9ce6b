mod common;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use axum_catalog_api::{app::build_app, cache::X_CACHE, state::AppState};
use common::{admin, customer, seed_category, spawn_app, token_for};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(state: &AppState) -> Router {
    build_app(state.clone())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<Response> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(app.clone().oneshot(request).await?)
}

async fn json_body(response: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn cache_status(response: &Response) -> Option<&str> {
    response.headers().get(X_CACHE).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn product_list_requires_a_token() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let app = app(&app_state.state);

    let response = send(&app, Method::GET, "/api/products", None, None).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app_state.state.cache.is_empty());

    let response = send(&app, Method::GET, "/api/products", Some("garbage"), None).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_then_login_returns_a_usable_token() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let app = app(&app_state.state);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "dilshod", "email": "d@example.com", "password": "s3cret-pass" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["user"]["username"], "dilshod");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "dilshod", "password": "wrong-pass" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "dilshod", "password": "s3cret-pass" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(response).await?["data"]["token"]
        .as_str()
        .map(str::to_owned)
        .expect("token");

    let response = send(&app, Method::GET, "/api/products", Some(&token), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn reads_are_cached_until_a_write() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let state = &app_state.state;
    let app = app(state);
    let admin = admin(state).await?;
    let customer = customer(state).await?;
    let admin_token = token_for(&admin);
    let token = token_for(&customer);
    seed_category(state, &admin, "Phones").await?;

    let first = send(&app, Method::GET, "/api/categories", Some(&token), None).await?;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first), Some("MISS"));

    let second = send(&app, Method::GET, "/api/categories", Some(&token), None).await?;
    assert_eq!(cache_status(&second), Some("HIT"));
    let body = json_body(second).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let created = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(&admin_token),
        Some(json!({ "category_name": "Laptops" })),
    )
    .await?;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert!(state.cache.is_empty());

    let third = send(&app, Method::GET, "/api/categories", Some(&token), None).await?;
    assert_eq!(cache_status(&third), Some("MISS"));
    let body = json_body(third).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn category_detail_is_public_and_writes_need_admin() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let state = &app_state.state;
    let app = app(state);
    let admin = admin(state).await?;
    let customer = customer(state).await?;
    seed_category(state, &admin, "Smart Phones").await?;

    let response = send(&app, Method::GET, "/api/categories/smart-phones", None, None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["category_name"], "Smart Phones");
    assert_eq!(body["data"]["products"], json!([]));

    let response = send(
        &app,
        Method::DELETE,
        "/api/categories/smart-phones",
        Some(&token_for(&customer)),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::GET, "/api/categories/missing", None, None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_get_a_json_404_and_a_request_id() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let app = app(&app_state.state);

    let response = send(&app, Method::GET, "/nowhere", None, None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
    let body = json_body(response).await?;
    assert_eq!(body["data"]["path"], "/nowhere");
    Ok(())
}

#[tokio::test]
async fn invalid_payload_reports_fields() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let state = &app_state.state;
    let app = app(state);
    let admin = admin(state).await?;
    let category = seed_category(state, &admin, "Phones").await?;

    let response = send(
        &app,
        Method::POST,
        "/api/products",
        Some(&token_for(&admin)),
        Some(json!({
            "product_name": "Galaxy",
            "price": 100,
            "discount": 101,
            "category_id": category.id
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await?;
    assert!(body["data"]["fields"]["discount"].is_array());
    Ok(())
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)], file: (&str, &[u8])) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    let (file_name, bytes) = file;
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

async fn upload(
    app: &Router,
    token: &str,
    fields: &[(&str, &str)],
    file: (&str, &[u8]),
) -> anyhow::Result<Response> {
    let boundary = "catalog-test-boundary";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/images")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(multipart_body(boundary, fields, file)))?;
    Ok(app.clone().oneshot(request).await?)
}

#[tokio::test]
async fn multipart_upload_attaches_image() -> anyhow::Result<()> {
    let app_state = spawn_app().await?;
    let state = &app_state.state;
    let app = app(state);
    let admin = admin(state).await?;
    let token = token_for(&admin);
    let category = seed_category(state, &admin, "Phones").await?;
    let category_id = category.id.to_string();

    let response = upload(
        &app,
        &token,
        &[("category_id", category_id.as_str()), ("is_primary", "true")],
        ("../banner.png", &b"\x89PNG"[..]),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["category_id"], category.id);
    assert_eq!(body["data"]["is_primary"], true);
    let relative = body["data"]["image"].as_str().unwrap_or_default().to_string();
    assert!(relative.starts_with("images/") && relative.ends_with("-banner.png"));
    assert_eq!(std::fs::read(state.config.media_dir.join(&relative))?, b"\x89PNG");

    let response = upload(
        &app,
        &token,
        &[("category_id", category_id.as_str()), ("product_id", "1")],
        ("banner.png", &b"\x89PNG"[..]),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(
        &app,
        &token,
        &[("category_id", category_id.as_str())],
        ("empty.png", &[][..]),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await?;
    assert!(body["data"]["fields"]["file"].is_array());
    Ok(())
}
