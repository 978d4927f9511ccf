use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Recipe difficulty rating. Stored as the `difficulty` enum type in Postgres.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "difficulty")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDifficultyError;

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "difficulty must be one of Easy, Medium, Hard")
    }
}

impl std::error::Error for ParseDifficultyError {}

/// A recipe row. `user_id` is the owning principal from the auth provider.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user profile. Created lazily on first save, 1:1 with an auth principal.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: Option<Json<BTreeMap<String, String>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The author fields attached to feed entries and comments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorProfile {
    pub user_name: String,
    pub full_name: Option<String>,
}

impl AuthorProfile {
    /// Sentinel used when no profile row exists for an author.
    pub fn unknown() -> Self {
        Self {
            user_name: "Unknown".to_string(),
            full_name: None,
        }
    }
}

/// A comment on a recipe. `parent_id` threads replies; only comments with no
/// parent are surfaced by top-level listings.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct RecipeComment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub is_edited: bool,
    pub created_at: DateTime<Utc>,
}

/// A recipe enriched with derived social counters and author display info.
/// Constructed fresh on every feed read; never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecipeWithSocial {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked_by_user: bool,
    pub user_profile: AuthorProfile,
}

/// A comment enriched with its author's display info.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: RecipeComment,
    pub user_profile: AuthorProfile,
}
