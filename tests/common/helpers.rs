// tests/common/helpers.rs
//! Shared helper functions for integration tests

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use recipe_server::{
    auth::Claims,
    create_router,
    models::{Recipe, RecipeComment},
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub async fn create_test_app(pool: PgPool) -> Router {
    let test_upload_dir = "./test_uploads".to_string();
    let test_base_url = "/test_images".to_string();
    create_router(
        pool,
        test_upload_dir,
        test_base_url,
        TEST_JWT_SECRET.to_string(),
    )
}

/// Mints a session token the way the auth provider would, for the given
/// principal.
pub fn bearer_token(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode test token");
    format!("Bearer {}", token)
}

pub fn generate_boundary() -> String {
    format!("----WebKitFormBoundary{}", Uuid::new_v4().simple())
}

fn push_text_field(body: &mut Vec<u8>, boundary: &str, name: &str, value: &str) {
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
    );
    body.extend_from_slice(value.as_bytes());
    body.extend_from_slice(b"\r\n");
}

/// Builds the multipart body for a recipe upload. `image` is an optional
/// (filename, content_type, bytes) triple.
pub fn recipe_upload_body(
    boundary: &str,
    title: &str,
    ingredients: &[&str],
    instructions: &[&str],
    cooking_time: Option<i32>,
    difficulty: Option<&str>,
    image: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    push_text_field(&mut body, boundary, "title", title);
    for ingredient in ingredients {
        push_text_field(&mut body, boundary, "ingredient", ingredient);
    }
    for instruction in instructions {
        push_text_field(&mut body, boundary, "instruction", instruction);
    }
    if let Some(minutes) = cooking_time {
        push_text_field(&mut body, boundary, "cooking_time", &minutes.to_string());
    }
    if let Some(level) = difficulty {
        push_text_field(&mut body, boundary, "difficulty", level);
    }
    if let Some((filename, content_type, bytes)) = image {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

pub async fn create_test_recipe_full(
    app: &Router,
    user_id: Uuid,
    title: &str,
    ingredients: &[&str],
    cooking_time: Option<i32>,
    difficulty: Option<&str>,
) -> Recipe {
    let boundary = generate_boundary();
    let body = recipe_upload_body(
        &boundary,
        title,
        ingredients,
        &["Mix everything", "Serve"],
        cooking_time,
        difficulty,
        None,
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri("/recipes")
                .header(http::header::AUTHORIZATION, bearer_token(user_id))
                .header(
                    http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to create recipe in helper: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to deserialize recipe in helper")
}

pub async fn create_test_recipe(app: &Router, user_id: Uuid, title: &str) -> Recipe {
    create_test_recipe_full(app, user_id, title, &["eggs", "flour"], Some(30), None).await
}

pub async fn create_test_comment(
    app: &Router,
    user_id: Uuid,
    recipe_id: Uuid,
    content: &str,
    parent_id: Option<Uuid>,
) -> RecipeComment {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri(format!("/recipes/{}/comments", recipe_id))
                .header(http::header::AUTHORIZATION, bearer_token(user_id))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "content": content, "parent_id": parent_id }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status,
        StatusCode::OK,
        "Failed to create comment in helper: {}",
        String::from_utf8_lossy(&body)
    );
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    serde_json::from_value(value["comment"].clone())
        .expect("Failed to deserialize comment in helper")
}

pub async fn save_test_profile(app: &Router, user_id: Uuid, user_name: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::PUT)
                .uri("/profiles/me")
                .header(http::header::AUTHORIZATION, bearer_token(user_id))
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "user_name": user_name }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "Failed to save profile in helper"
    );
}

/// Toggles a like and returns the reported state.
pub async fn toggle_test_like(app: &Router, user_id: Uuid, recipe_id: Uuid) -> bool {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri(format!("/recipes/{}/like", recipe_id))
                .header(http::header::AUTHORIZATION, bearer_token(user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status,
        StatusCode::OK,
        "Failed to toggle like in helper: {}",
        String::from_utf8_lossy(&body)
    );
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    value["liked"].as_bool().expect("liked flag missing")
}

/// Fetches the public feed and returns the parsed entries.
pub async fn fetch_feed(app: &Router, query: &str, token: Option<&str>) -> serde_json::Value {
    let uri = if query.is_empty() {
        "/recipes".to_string()
    } else {
        format!("/recipes?{}", query)
    };

    let mut builder = Request::builder().method(http::Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, token);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        status,
        StatusCode::OK,
        "Failed to fetch feed in helper: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).unwrap()
}
