// tests/like_api.rs

mod common;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::helpers::{
    bearer_token, create_test_app, create_test_recipe, fetch_feed, toggle_test_like,
};

#[sqlx::test]
async fn test_like_toggle_cycle(pool: PgPool) {
    let app = create_test_app(pool.clone()).await;
    let author = Uuid::new_v4();
    let fan = Uuid::new_v4();
    let recipe = create_test_recipe(&app, author, "Toggled Dish").await;

    // 0 -> 1
    assert!(toggle_test_like(&app, fan, recipe.id).await);
    let feed = fetch_feed(&app, "", Some(&bearer_token(fan))).await;
    assert_eq!(feed.as_array().unwrap()[0]["like_count"], 1);
    assert_eq!(feed.as_array().unwrap()[0]["is_liked_by_user"], true);

    // 1 -> 0
    assert!(!toggle_test_like(&app, fan, recipe.id).await);
    let feed = fetch_feed(&app, "", Some(&bearer_token(fan))).await;
    assert_eq!(feed.as_array().unwrap()[0]["like_count"], 0);
    assert_eq!(feed.as_array().unwrap()[0]["is_liked_by_user"], false);
}

#[sqlx::test]
async fn test_like_counts_are_per_recipe_and_per_user(pool: PgPool) {
    let app = create_test_app(pool.clone()).await;
    let author = Uuid::new_v4();
    let fan_one = Uuid::new_v4();
    let fan_two = Uuid::new_v4();
    let liked = create_test_recipe(&app, author, "Crowd Favorite").await;
    let ignored = create_test_recipe(&app, author, "Overlooked").await;

    assert!(toggle_test_like(&app, fan_one, liked.id).await);
    assert!(toggle_test_like(&app, fan_two, liked.id).await);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe_likes WHERE recipe_id = $1")
        .bind(liked.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe_likes WHERE recipe_id = $1")
        .bind(ignored.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test]
async fn test_like_requires_auth(pool: PgPool) {
    let app = create_test_app(pool).await;
    let recipe = create_test_recipe(&app, Uuid::new_v4(), "Members Only").await;

    let response = app
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri(format!("/recipes/{}/like", recipe.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn test_like_missing_recipe_not_found(pool: PgPool) {
    let app = create_test_app(pool).await;
    let response = app
        .oneshot(
            Request::builder()
                .method(http::Method::POST)
                .uri(format!("/recipes/{}/like", Uuid::new_v4()))
                .header(http::header::AUTHORIZATION, bearer_token(Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn test_duplicate_like_row_is_never_created(pool: PgPool) {
    let app = create_test_app(pool.clone()).await;
    let fan = Uuid::new_v4();
    let recipe = create_test_recipe(&app, Uuid::new_v4(), "Dish").await;

    // A racing duplicate insert hits the composite key; simulate the loser
    // of the race by inserting the row behind the handler's back first.
    sqlx::query("INSERT INTO recipe_likes (user_id, recipe_id) VALUES ($1, $2)")
        .bind(fan)
        .bind(recipe.id)
        .execute(&pool)
        .await
        .unwrap();

    let duplicate =
        sqlx::query("INSERT INTO recipe_likes (user_id, recipe_id) VALUES ($1, $2)")
            .bind(fan)
            .bind(recipe.id)
            .execute(&pool)
            .await;
    assert!(duplicate.is_err());

    // The handler sees the existing row and toggles it off
    assert!(!toggle_test_like(&app, fan, recipe.id).await);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe_likes WHERE recipe_id = $1")
        .bind(recipe.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
