use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::AuthenticatedUser,
    errors::AppError,
    repositories::{like_repository, recipe_repository},
    AppState,
};

#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
}

/// Handler for the like toggle: delete the like if it exists, insert it
/// otherwise, and report the resulting state.
///
/// The check-then-act sequence can race against a concurrent toggle by the
/// same user; the composite key on recipe_likes turns the duplicate insert
/// into a unique violation, reported here as already liked.
pub async fn toggle_like_handler(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<Json<LikeResponse>, AppError> {
    recipe_repository::get_recipe_by_id(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    if like_repository::like_exists(&state.db_pool, user.0, recipe_id).await? {
        like_repository::delete_like(&state.db_pool, user.0, recipe_id).await?;
        info!(recipe_id = %recipe_id, user_id = %user.0, "recipe unliked");
        return Ok(Json(LikeResponse { liked: false }));
    }

    match like_repository::insert_like(&state.db_pool, user.0, recipe_id).await {
        Ok(()) => {
            info!(recipe_id = %recipe_id, user_id = %user.0, "recipe liked");
            Ok(Json(LikeResponse { liked: true }))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            debug!(recipe_id = %recipe_id, user_id = %user.0, "duplicate like collapsed");
            Ok(Json(LikeResponse { liked: true }))
        }
        Err(e) => Err(e.into()),
    }
}
