use sqlx::PgPool;
use uuid::Uuid;

/// Existence check for the toggle protocol.
pub async fn like_exists(
    pool: &PgPool,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query_scalar::<_, i32>(
        "SELECT 1 FROM recipe_likes WHERE user_id = $1 AND recipe_id = $2",
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Inserts a like row. The composite primary key enforces at most one like
/// per (user, recipe); a concurrent duplicate surfaces as a unique violation
/// the caller collapses into "already liked".
pub async fn insert_like(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO recipe_likes (user_id, recipe_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Removes a like row. Returns the number of rows affected.
pub async fn delete_like(pool: &PgPool, user_id: Uuid, recipe_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipe_likes WHERE user_id = $1 AND recipe_id = $2")
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
