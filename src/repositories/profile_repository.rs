use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::models::{AuthorProfile, Profile};

const PROFILE_COLUMNS: &str = "id, user_id, user_name, full_name, bio, location, website, \
                               social_links, created_at, updated_at";

/// Input data for saving a profile. Fields arrive normalized (username
/// lowercased, blanks collapsed to None) from the handler.
pub struct UpsertProfileData {
    pub user_name: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<Json<BTreeMap<String, String>>>,
}

pub async fn get_profile_by_user_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<Profile>, sqlx::Error> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1");
    sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_profile_by_user_name(
    pool: &PgPool,
    user_name: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_name = $1");
    sqlx::query_as::<_, Profile>(&query)
        .bind(user_name)
        .fetch_optional(pool)
        .await
}

/// Creates the profile on first save, updates it afterwards. A username
/// collision surfaces as a unique violation for the handler to map.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    data: UpsertProfileData,
) -> Result<Profile, sqlx::Error> {
    let query = format!(
        "INSERT INTO user_profiles (user_id, user_name, full_name, bio, location, website, social_links)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (user_id) DO UPDATE SET
             user_name = EXCLUDED.user_name,
             full_name = EXCLUDED.full_name,
             bio = EXCLUDED.bio,
             location = EXCLUDED.location,
             website = EXCLUDED.website,
             social_links = EXCLUDED.social_links,
             updated_at = NOW()
         RETURNING {PROFILE_COLUMNS}"
    );
    sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .bind(&data.user_name)
        .bind(&data.full_name)
        .bind(&data.bio)
        .bind(&data.location)
        .bind(&data.website)
        .bind(&data.social_links)
        .fetch_one(pool)
        .await
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    user_id: Uuid,
    user_name: String,
    full_name: Option<String>,
}

/// The profile join: one batched query for any number of authors, mapped by
/// user id. Missing authors are simply absent; callers fall back to
/// `AuthorProfile::unknown()`.
pub async fn get_authors_by_user_ids(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> Result<HashMap<Uuid, AuthorProfile>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, AuthorRow>(
        "SELECT user_id, user_name, full_name FROM user_profiles WHERE user_id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.user_id,
                AuthorProfile {
                    user_name: row.user_name,
                    full_name: row.full_name,
                },
            )
        })
        .collect())
}
