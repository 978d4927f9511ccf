use sqlx::PgPool;
use uuid::Uuid;

use crate::models::RecipeComment;

const COMMENT_COLUMNS: &str = "id, user_id, recipe_id, parent_id, content, is_edited, created_at";

/// Input data for creating a new comment. Content is validated and trimmed
/// by the handler before it reaches here.
pub struct CreateCommentData {
    pub content: String,
    pub parent_id: Option<Uuid>,
}

pub async fn create_comment(
    pool: &PgPool,
    recipe_id: Uuid,
    user_id: Uuid,
    data: CreateCommentData,
) -> Result<RecipeComment, sqlx::Error> {
    let query = format!(
        "INSERT INTO recipe_comments (user_id, recipe_id, content, parent_id)
         VALUES ($1, $2, $3, $4)
         RETURNING {COMMENT_COLUMNS}"
    );
    sqlx::query_as::<_, RecipeComment>(&query)
        .bind(user_id)
        .bind(recipe_id)
        .bind(&data.content)
        .bind(data.parent_id)
        .fetch_one(pool)
        .await
}

pub async fn get_comment_by_id(
    pool: &PgPool,
    comment_id: Uuid,
) -> Result<Option<RecipeComment>, sqlx::Error> {
    let query = format!("SELECT {COMMENT_COLUMNS} FROM recipe_comments WHERE id = $1");
    sqlx::query_as::<_, RecipeComment>(&query)
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

/// Top-level comments for a recipe, newest first. Replies (rows with a
/// parent) are never surfaced here, dangling parents included.
pub async fn list_top_level_comments(
    pool: &PgPool,
    recipe_id: Uuid,
) -> Result<Vec<RecipeComment>, sqlx::Error> {
    let query = format!(
        "SELECT {COMMENT_COLUMNS} FROM recipe_comments
         WHERE recipe_id = $1 AND parent_id IS NULL
         ORDER BY created_at DESC"
    );
    sqlx::query_as::<_, RecipeComment>(&query)
        .bind(recipe_id)
        .fetch_all(pool)
        .await
}

/// Replaces a comment's content and marks it edited. Ownership is checked by
/// the caller.
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    content: &str,
) -> Result<Option<RecipeComment>, sqlx::Error> {
    let query = format!(
        "UPDATE recipe_comments
         SET content = $1, is_edited = TRUE
         WHERE id = $2
         RETURNING {COMMENT_COLUMNS}"
    );
    sqlx::query_as::<_, RecipeComment>(&query)
        .bind(content)
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

/// Hard-deletes one comment. Replies keep their parent_id and simply stop
/// being rendered under the vanished parent.
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipe_comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
