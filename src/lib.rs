use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod storage;
pub mod utils;
pub mod validation;

use handlers::{
    comment_handlers::{
        create_comment_handler, delete_comment_handler, list_comments_handler,
        update_comment_handler,
    },
    get_server_info_handler,
    like_handlers::toggle_like_handler,
    profile_handlers::{
        get_my_profile_handler, get_profile_by_username_handler, save_my_profile_handler,
    },
    recipe_handlers::{
        create_recipe_handler, delete_recipe_handler, get_recipe_handler,
        list_my_recipes_handler, list_recipes_handler, update_recipe_handler,
    },
};

use storage::ImageStorage;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub image_storage: ImageStorage,
    pub jwt_secret: Arc<String>,
}

/// Builds the application router over the given pool and configuration.
pub fn create_router(
    db_pool: PgPool,
    image_upload_dir: String,
    image_base_url: String,
    jwt_secret: String,
) -> Router {
    let image_storage = ImageStorage::new(image_upload_dir.clone(), image_base_url);

    let app_state = AppState {
        db_pool,
        image_storage: image_storage.clone(),
        jwt_secret: Arc::new(jwt_secret),
    };

    let static_service = ServeDir::new(PathBuf::from(&image_upload_dir));

    // Bounds a whole upload (image plus fields).
    const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

    Router::new()
        .route("/", get(get_server_info_handler))
        .route(
            "/recipes",
            get(list_recipes_handler).post(create_recipe_handler),
        )
        .route(
            "/recipes/:recipe_id",
            get(get_recipe_handler)
                .put(update_recipe_handler)
                .delete(delete_recipe_handler),
        )
        .route(
            "/recipes/:recipe_id/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route(
            "/comments/:comment_id",
            put(update_comment_handler).delete(delete_comment_handler),
        )
        .route("/recipes/:recipe_id/like", post(toggle_like_handler))
        .route("/users/me/recipes", get(list_my_recipes_handler))
        .route(
            "/profiles/me",
            get(get_my_profile_handler).put(save_my_profile_handler),
        )
        .route("/profiles/:user_name", get(get_profile_by_username_handler))
        .nest_service(&image_storage.base_url, static_service)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}
