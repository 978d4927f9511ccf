use crate::models::{Difficulty, RecipeWithSocial};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Sort orders accepted by the feed. `Newest` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
    CookingTime,
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title" => Ok(SortOrder::Title),
            "cooking_time" => Ok(SortOrder::CookingTime),
            _ => Err(ParseSortOrderError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSortOrderError;

impl fmt::Display for ParseSortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sort must be one of newest, oldest, title, cooking_time")
    }
}

impl std::error::Error for ParseSortOrderError {}

/// Feed search controls, deserializable straight from the query string.
/// Absent and explicitly-empty parameters are both no-ops.
#[derive(Debug, Default, Deserialize)]
pub struct SearchFilters {
    #[serde(default, rename = "search")]
    pub search_term: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, rename = "max_time", deserialize_with = "empty_as_none")]
    pub max_cooking_time: Option<i32>,
    #[serde(default, rename = "sort", deserialize_with = "empty_as_none")]
    pub sort_by: Option<SortOrder>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Applies the feed filters and sort to an in-memory collection of enriched
/// entries. Pure and total: the input is never mutated, the output is always
/// a (reordered) subset of the input.
///
/// Filters are conjunctive and run in a fixed order: search term, difficulty,
/// max cooking time. A recipe with no cooking time is excluded while the
/// max-time filter is active, and sorts as 0 minutes under the cooking-time
/// order (observable behavior kept as-is).
pub fn filter_and_sort(
    entries: &[RecipeWithSocial],
    filters: &SearchFilters,
) -> Vec<RecipeWithSocial> {
    let mut filtered: Vec<RecipeWithSocial> = entries.to_vec();

    let term = filters.search_term.trim().to_lowercase();
    if !term.is_empty() {
        filtered.retain(|entry| {
            entry.recipe.title.to_lowercase().contains(&term)
                || entry
                    .recipe
                    .ingredients
                    .iter()
                    .any(|ingredient| ingredient.to_lowercase().contains(&term))
        });
    }

    if let Some(difficulty) = filters.difficulty {
        filtered.retain(|entry| entry.recipe.difficulty == Some(difficulty));
    }

    if let Some(max_time) = filters.max_cooking_time {
        filtered.retain(|entry| matches!(entry.recipe.cooking_time, Some(t) if t <= max_time));
    }

    match filters.sort_by.unwrap_or_default() {
        SortOrder::Newest => {
            filtered.sort_by(|a, b| b.recipe.created_at.cmp(&a.recipe.created_at))
        }
        SortOrder::Oldest => {
            filtered.sort_by(|a, b| a.recipe.created_at.cmp(&b.recipe.created_at))
        }
        SortOrder::Title => filtered.sort_by(|a, b| {
            a.recipe
                .title
                .to_lowercase()
                .cmp(&b.recipe.title.to_lowercase())
        }),
        SortOrder::CookingTime => {
            filtered.sort_by_key(|entry| entry.recipe.cooking_time.unwrap_or(0))
        }
    }

    filtered
}
