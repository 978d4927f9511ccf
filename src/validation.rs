use crate::errors::AppError;
use url::Url;

pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MAX_TITLE_LENGTH: usize = 100;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;
pub const MAX_COOKING_TIME_MINUTES: i32 = 1440;

/// Usernames are 3-20 characters of letters, digits, and underscores.
/// Callers are expected to have lowercased the name already (see
/// `normalize_optional` / the profile handler); validation itself is
/// case-insensitive.
pub fn validate_username(user_name: &str) -> Result<(), AppError> {
    if user_name.is_empty() {
        return Err(AppError::bad_request("Username is required"));
    }
    if user_name.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AppError::bad_request(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_LENGTH
        )));
    }
    if user_name.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::bad_request(format!(
            "Username must be no more than {} characters long",
            MAX_USERNAME_LENGTH
        )));
    }
    if !user_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::bad_request(
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// Trims comment content and enforces the non-empty / length invariants.
/// Runs before any backend call is made.
pub fn validate_comment_content(content: &str) -> Result<String, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request("Comment content is required"));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::bad_request(format!(
            "Comment is too long (max {} characters)",
            MAX_COMMENT_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Drops blank entries and trims the rest, preserving order.
pub fn clean_string_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Validated, cleaned recipe fields ready for insert/update.
pub struct RecipeFields {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: Option<i32>,
}

pub fn validate_recipe_fields(
    title: &str,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    cooking_time: Option<i32>,
) -> Result<RecipeFields, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request("Recipe title is required"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::bad_request(format!(
            "Recipe title must be no more than {} characters long",
            MAX_TITLE_LENGTH
        )));
    }

    let ingredients = clean_string_list(ingredients);
    if ingredients.is_empty() {
        return Err(AppError::bad_request("At least one ingredient is required"));
    }

    let instructions = clean_string_list(instructions);
    if instructions.is_empty() {
        return Err(AppError::bad_request(
            "At least one instruction is required",
        ));
    }

    if let Some(minutes) = cooking_time {
        if minutes < 1 || minutes > MAX_COOKING_TIME_MINUTES {
            return Err(AppError::bad_request(format!(
                "Cooking time must be between 1 and {} minutes",
                MAX_COOKING_TIME_MINUTES
            )));
        }
    }

    Ok(RecipeFields {
        title: title.to_string(),
        ingredients,
        instructions,
        cooking_time,
    })
}

/// Checks a user-supplied link parses as an absolute URL. `label` names the
/// offending field in the error message.
pub fn validate_link(value: &str, label: &str) -> Result<(), AppError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|_| AppError::bad_request(format!("Please enter a valid {} URL", label)))
}

/// Trims an optional field, collapsing blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
