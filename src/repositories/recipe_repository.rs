use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Difficulty, Recipe};
use crate::utils::PaginationParams;

const RECIPE_COLUMNS: &str = "id, user_id, title, ingredients, instructions, image_url, \
                              cooking_time, difficulty, created_at, updated_at";

/// Input data for creating a new recipe. The owner comes from the session.
pub struct CreateRecipeData {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

/// Input data for updating a recipe. The image is managed separately through
/// the storage layer and is not touched here.
pub struct UpdateRecipeData {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

/// Inserts a new recipe owned by `user_id`.
pub async fn create_recipe(
    pool: &PgPool,
    user_id: Uuid,
    data: CreateRecipeData,
) -> Result<Recipe, sqlx::Error> {
    let query = format!(
        "INSERT INTO recipes (user_id, title, ingredients, instructions, image_url, cooking_time, difficulty)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {RECIPE_COLUMNS}"
    );
    sqlx::query_as::<_, Recipe>(&query)
        .bind(user_id)
        .bind(&data.title)
        .bind(&data.ingredients)
        .bind(&data.instructions)
        .bind(&data.image_url)
        .bind(data.cooking_time)
        .bind(data.difficulty)
        .fetch_one(pool)
        .await
}

/// Fetches a single recipe by its ID.
pub async fn get_recipe_by_id(pool: &PgPool, recipe_id: Uuid) -> Result<Option<Recipe>, sqlx::Error> {
    let query = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1");
    sqlx::query_as::<_, Recipe>(&query)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
}

/// Fetches the owner of a recipe without loading the whole row.
pub async fn get_recipe_owner(pool: &PgPool, recipe_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
}

/// The shared feed: every user's recipes, newest first.
pub async fn list_recipes(
    pool: &PgPool,
    pagination: &PaginationParams,
) -> Result<Vec<Recipe>, sqlx::Error> {
    let query = format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    );
    sqlx::query_as::<_, Recipe>(&query)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await
}

/// One user's recipes, newest first.
pub async fn list_recipes_by_user(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &PaginationParams,
) -> Result<Vec<Recipe>, sqlx::Error> {
    let query = format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, Recipe>(&query)
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(pool)
        .await
}

/// Replaces a recipe's editable fields. Ownership is checked by the caller.
pub async fn update_recipe(
    pool: &PgPool,
    recipe_id: Uuid,
    data: UpdateRecipeData,
) -> Result<Option<Recipe>, sqlx::Error> {
    let query = format!(
        "UPDATE recipes
         SET title = $1, ingredients = $2, instructions = $3, cooking_time = $4,
             difficulty = $5, updated_at = NOW()
         WHERE id = $6
         RETURNING {RECIPE_COLUMNS}"
    );
    sqlx::query_as::<_, Recipe>(&query)
        .bind(&data.title)
        .bind(&data.ingredients)
        .bind(&data.instructions)
        .bind(data.cooking_time)
        .bind(data.difficulty)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
}

/// Deletes a recipe; likes and comments cascade at the storage layer.
/// Returns the number of rows affected.
pub async fn delete_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
