use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use mime::Mime;
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{ensure_owner, AuthenticatedUser, MaybeUser},
    errors::AppError,
    feed::{self, SearchFilters},
    models::{AuthorProfile, Difficulty, Recipe, RecipeWithSocial},
    repositories::{
        profile_repository, recipe_repository,
        recipe_repository::{CreateRecipeData, UpdateRecipeData},
        social_repository,
    },
    utils::PaginationParams,
    validation, AppState,
};

const MAX_IMAGE_SIZE_MB: u64 = 5;
const MAX_IMAGE_SIZE_BYTES: u64 = MAX_IMAGE_SIZE_MB * 1024 * 1024;

/// Builds feed entries from recipe rows: batch profile join plus the social
/// counter aggregator, merged by recipe id. Fresh on every call, never cached.
///
/// The enrichment queries degrade per-value: an unavailable profile join
/// falls back to the placeholder author, it does not abort the render.
pub(crate) async fn enrich_recipes(
    pool: &PgPool,
    recipes: Vec<Recipe>,
    viewer: Option<Uuid>,
) -> Vec<RecipeWithSocial> {
    if recipes.is_empty() {
        return Vec::new();
    }

    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = match profile_repository::get_authors_by_user_ids(pool, &author_ids).await {
        Ok(authors) => authors,
        Err(e) => {
            warn!(error = %e, "author profiles unavailable, using placeholders");
            HashMap::new()
        }
    };
    let counts = social_repository::get_social_counts(pool, &recipe_ids, viewer).await;

    recipes
        .into_iter()
        .map(|recipe| {
            let social = counts.get(&recipe.id).copied().unwrap_or_default();
            let user_profile = authors
                .get(&recipe.user_id)
                .cloned()
                .unwrap_or_else(AuthorProfile::unknown);
            RecipeWithSocial {
                recipe,
                like_count: social.like_count,
                comment_count: social.comment_count,
                is_liked_by_user: social.is_liked_by_user,
                user_profile,
            }
        })
        .collect()
}

/// The public feed: enriched recipes with search/filter/sort applied.
pub async fn list_recipes_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(filters): Query<SearchFilters>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<RecipeWithSocial>>, AppError> {
    let recipes = recipe_repository::list_recipes(&state.db_pool, &pagination).await?;
    let entries = enrich_recipes(&state.db_pool, recipes, viewer).await;
    Ok(Json(feed::filter_and_sort(&entries, &filters)))
}

/// The session user's own recipes, enriched with their liked-set.
pub async fn list_my_recipes_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<RecipeWithSocial>>, AppError> {
    let recipes =
        recipe_repository::list_recipes_by_user(&state.db_pool, user.0, &pagination).await?;
    let entries = enrich_recipes(&state.db_pool, recipes, Some(user.0)).await;
    Ok(Json(entries))
}

pub async fn get_recipe_handler(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<RecipeWithSocial>, AppError> {
    let recipe = recipe_repository::get_recipe_by_id(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    let mut entries = enrich_recipes(&state.db_pool, vec![recipe], viewer).await;
    Ok(Json(entries.remove(0)))
}

struct CollectedUpload {
    title: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    cooking_time: Option<i32>,
    difficulty: Option<Difficulty>,
    image: Option<(Vec<u8>, Option<String>)>,
}

async fn collect_upload_fields(mut multipart: Multipart) -> Result<CollectedUpload, AppError> {
    let mut collected = CollectedUpload {
        title: String::new(),
        ingredients: Vec::new(),
        instructions: Vec::new(),
        cooking_time: None,
        difficulty: None,
        image: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Multipart processing error: {}", e)))?
    {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match field_name.as_str() {
            "title" => {
                collected.title = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid UTF-8 in title field"))?;
            }
            "ingredient" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid UTF-8 in ingredient field"))?;
                collected.ingredients.push(value);
            }
            "instruction" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid UTF-8 in instruction field"))?;
                collected.instructions.push(value);
            }
            "cooking_time" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid UTF-8 in cooking_time field"))?;
                if !value.is_empty() {
                    let minutes = value.parse::<i32>().map_err(|_| {
                        AppError::bad_request("Invalid number format for cooking_time")
                    })?;
                    collected.cooking_time = Some(minutes);
                }
            }
            "difficulty" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Invalid UTF-8 in difficulty field"))?;
                if !value.is_empty() {
                    let difficulty = value
                        .parse::<Difficulty>()
                        .map_err(|e| AppError::bad_request(e.to_string()))?;
                    collected.difficulty = Some(difficulty);
                }
            }
            "image" => {
                let filename = field.file_name().map(|s| s.to_string());
                let content_type = field.content_type().and_then(|s| s.parse::<Mime>().ok());
                if !matches!(&content_type, Some(ct) if ct.type_() == mime::IMAGE) {
                    return Err(AppError::bad_request("Please select a valid image file"));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read image: {}", e)))?;
                if data.len() as u64 > MAX_IMAGE_SIZE_BYTES {
                    return Err(AppError::bad_request(format!(
                        "Image file size must be less than {}MB",
                        MAX_IMAGE_SIZE_MB
                    )));
                }
                collected.image = Some((data.to_vec(), filename));
            }
            _ => { /* Ignore */ }
        }
    }

    Ok(collected)
}

/// Handler to upload a new recipe with an optional image.
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    let collected = collect_upload_fields(multipart).await?;

    let fields = validation::validate_recipe_fields(
        &collected.title,
        collected.ingredients,
        collected.instructions,
        collected.cooking_time,
    )?;

    let image_url = match collected.image {
        Some((data, filename)) => Some(
            state
                .image_storage
                .save_image(data.into(), filename)
                .await?,
        ),
        None => None,
    };

    let recipe = recipe_repository::create_recipe(
        &state.db_pool,
        user.0,
        CreateRecipeData {
            title: fields.title,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            image_url,
            cooking_time: fields.cooking_time,
            difficulty: collected.difficulty,
        },
    )
    .await?;

    info!(recipe_id = %recipe.id, user_id = %user.0, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[derive(Deserialize)]
pub struct UpdateRecipePayload {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
}

/// Handler to edit a recipe. Owner-gated; the image is left untouched.
pub async fn update_recipe_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<UpdateRecipePayload>,
) -> Result<Json<Recipe>, AppError> {
    let owner = recipe_repository::get_recipe_owner(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;
    ensure_owner(user.0, owner)?;

    let fields = validation::validate_recipe_fields(
        &payload.title,
        payload.ingredients,
        payload.instructions,
        payload.cooking_time,
    )?;

    let updated = recipe_repository::update_recipe(
        &state.db_pool,
        recipe_id,
        UpdateRecipeData {
            title: fields.title,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            cooking_time: fields.cooking_time,
            difficulty: payload.difficulty,
        },
    )
    .await?
    .ok_or(AppError::NotFound("Recipe"))?;

    info!(recipe_id = %updated.id, user_id = %user.0, "recipe updated");
    Ok(Json(updated))
}

/// Handler to delete a recipe, its stored image included. Owner-gated.
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let recipe = recipe_repository::get_recipe_by_id(&state.db_pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;
    ensure_owner(user.0, recipe.user_id)?;

    // Image first; a storage failure is logged and the row still goes.
    if let Some(image_url) = &recipe.image_url {
        if let Err(e) = state.image_storage.delete_image(image_url).await {
            warn!(error = %e, recipe_id = %recipe_id, image_url = %image_url, "failed to delete recipe image");
        }
    }

    let rows_affected = recipe_repository::delete_recipe(&state.db_pool, recipe_id).await?;
    if rows_affected == 0 {
        return Err(AppError::NotFound("Recipe"));
    }

    info!(recipe_id = %recipe_id, user_id = %user.0, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
