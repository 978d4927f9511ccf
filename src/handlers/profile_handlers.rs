use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use std::collections::BTreeMap;
use tracing::info;

use crate::{
    auth::AuthenticatedUser,
    errors::AppError,
    models::Profile,
    repositories::{profile_repository, profile_repository::UpsertProfileData},
    validation, AppState,
};

/// Handler to fetch the session user's own profile. 404 until first save.
pub async fn get_my_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Profile>, AppError> {
    let profile = profile_repository::get_profile_by_user_id(&state.db_pool, user.0)
        .await?
        .ok_or(AppError::NotFound("Profile"))?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct SaveProfilePayload {
    pub user_name: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

/// Handler to save the session user's profile: validates, normalizes, and
/// upserts (the profile row is created lazily on first save).
pub async fn save_my_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SaveProfilePayload>,
) -> Result<Json<Profile>, AppError> {
    // Usernames are case-folded to lowercase on write.
    let user_name = payload.user_name.trim().to_lowercase();
    validation::validate_username(&user_name)?;

    let website = validation::normalize_optional(payload.website);
    if let Some(url) = &website {
        validation::validate_link(url, "website")?;
    }

    let social_links = match payload.social_links {
        Some(links) => {
            let mut cleaned = BTreeMap::new();
            for (platform, url) in links {
                let url = url.trim().to_string();
                if url.is_empty() {
                    continue;
                }
                validation::validate_link(&url, &platform)?;
                cleaned.insert(platform, url);
            }
            if cleaned.is_empty() {
                None
            } else {
                Some(SqlJson(cleaned))
            }
        }
        None => None,
    };

    let data = UpsertProfileData {
        user_name,
        full_name: validation::normalize_optional(payload.full_name),
        bio: validation::normalize_optional(payload.bio),
        location: validation::normalize_optional(payload.location),
        website,
        social_links,
    };

    let profile = match profile_repository::upsert_profile(&state.db_pool, user.0, data).await {
        Ok(profile) => profile,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(AppError::conflict("Username is already taken"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.0, user_name = %profile.user_name, "profile saved");
    Ok(Json(profile))
}

/// Handler for public profile lookup by username.
pub async fn get_profile_by_username_handler(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile =
        profile_repository::get_profile_by_user_name(&state.db_pool, &user_name.to_lowercase())
            .await?
            .ok_or(AppError::NotFound("Profile"))?;
    Ok(Json(profile))
}
