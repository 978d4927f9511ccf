pub mod comment_handlers;
pub mod like_handlers;
pub mod profile_handlers;
pub mod recipe_handlers;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::env;

#[derive(Serialize)]
pub struct ServerInfoResponse {
    name: String,
    description: String,
}

/// Service identity for the root route.
pub async fn get_server_info_handler() -> impl IntoResponse {
    let name =
        env::var("RECIPE_SERVER_NAME").unwrap_or_else(|_| "Recipe Sharing Platform".to_string());
    let description = env::var("RECIPE_SERVER_DESCRIPTION")
        .unwrap_or_else(|_| "Discover, share, and explore recipes".to_string());

    (StatusCode::OK, Json(ServerInfoResponse { name, description }))
}
