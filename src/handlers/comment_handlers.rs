use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{ensure_owner, AuthenticatedUser},
    errors::AppError,
    models::{AuthorProfile, CommentWithAuthor, RecipeComment},
    repositories::{
        comment_repository,
        comment_repository::CreateCommentData,
        profile_repository, recipe_repository,
    },
    validation, AppState,
};

#[derive(Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub comment: CommentWithAuthor,
}

/// Resolves the author map for a set of user ids, degrading to an empty map
/// (placeholder authors) when the profile join is unavailable.
async fn authors_or_placeholders(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> HashMap<Uuid, AuthorProfile> {
    match profile_repository::get_authors_by_user_ids(pool, user_ids).await {
        Ok(authors) => authors,
        Err(e) => {
            warn!(error = %e, "author profiles unavailable, using placeholders");
            HashMap::new()
        }
    }
}

async fn with_author(pool: &PgPool, comment: RecipeComment) -> CommentWithAuthor {
    let authors = authors_or_placeholders(pool, &[comment.user_id]).await;
    let user_profile = authors
        .get(&comment.user_id)
        .cloned()
        .unwrap_or_else(AuthorProfile::unknown);
    CommentWithAuthor {
        comment,
        user_profile,
    }
}

/// Handler to list a recipe's top-level comments, newest first, each
/// enriched with its author via one batched profile join.
pub async fn list_comments_handler(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<CommentsResponse>, AppError> {
    recipe_repository::get_recipe_by_id(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    let comments = comment_repository::list_top_level_comments(&state.db_pool, recipe_id).await?;

    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let authors = authors_or_placeholders(&state.db_pool, &author_ids).await;

    let comments = comments
        .into_iter()
        .map(|comment| {
            let user_profile = authors
                .get(&comment.user_id)
                .cloned()
                .unwrap_or_else(AuthorProfile::unknown);
            CommentWithAuthor {
                comment,
                user_profile,
            }
        })
        .collect();

    Ok(Json(CommentsResponse { comments }))
}

#[derive(Deserialize)]
pub struct CreateCommentPayload {
    pub content: String,
    pub parent_id: Option<Uuid>,
}

/// Handler to post a comment (or a reply, when `parent_id` is set).
pub async fn create_comment_handler(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCommentPayload>,
) -> Result<Json<CommentResponse>, AppError> {
    let content = validation::validate_comment_content(&payload.content)?;

    recipe_repository::get_recipe_by_id(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    if let Some(parent_id) = payload.parent_id {
        let parent = comment_repository::get_comment_by_id(&state.db_pool, parent_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Parent comment not found"))?;
        if parent.recipe_id != recipe_id {
            return Err(AppError::bad_request(
                "Parent comment belongs to a different recipe",
            ));
        }
    }

    let comment = comment_repository::create_comment(
        &state.db_pool,
        recipe_id,
        user.0,
        CreateCommentData {
            content,
            parent_id: payload.parent_id,
        },
    )
    .await?;

    info!(comment_id = %comment.id, recipe_id = %recipe_id, user_id = %user.0, "comment created");
    let comment = with_author(&state.db_pool, comment).await;
    Ok(Json(CommentResponse { comment }))
}

#[derive(Deserialize)]
pub struct UpdateCommentPayload {
    pub content: String,
}

/// Handler to edit a comment. Owner-gated; sets the edited flag.
pub async fn update_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateCommentPayload>,
) -> Result<Json<CommentResponse>, AppError> {
    let content = validation::validate_comment_content(&payload.content)?;

    let existing = comment_repository::get_comment_by_id(&state.db_pool, comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    if let Err(denied) = ensure_owner(user.0, existing.user_id) {
        warn!(comment_id = %comment_id, user_id = %user.0, owner_id = %existing.user_id, "comment edit denied");
        return Err(denied);
    }

    let updated = comment_repository::update_comment(&state.db_pool, comment_id, &content)
        .await?
        .ok_or(AppError::NotFound("Comment"))?;

    info!(comment_id = %comment_id, user_id = %user.0, "comment updated");
    let comment = with_author(&state.db_pool, updated).await;
    Ok(Json(CommentResponse { comment }))
}

/// Handler to delete a comment. Owner-gated hard delete; replies are left
/// in place and simply stop rendering under the deleted parent.
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let owner = comment_repository::get_comment_by_id(&state.db_pool, comment_id)
        .await?
        .ok_or(AppError::NotFound("Comment"))?
        .user_id;

    if let Err(denied) = ensure_owner(user.0, owner) {
        warn!(comment_id = %comment_id, user_id = %user.0, owner_id = %owner, "comment delete denied");
        return Err(denied);
    }

    let rows_affected = comment_repository::delete_comment(&state.db_pool, comment_id).await?;
    if rows_affected == 0 {
        return Err(AppError::NotFound("Comment"));
    }

    info!(comment_id = %comment_id, user_id = %user.0, "comment deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}
