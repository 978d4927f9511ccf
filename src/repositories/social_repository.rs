use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::warn;
use uuid::Uuid;

/// Derived social counters for one recipe. Ids with no matching rows keep
/// the defaults: absence is not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocialCounts {
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked_by_user: bool,
}

/// The social counter aggregator: like counts, top-level comment counts, and
/// the viewer's liked-set for a batch of recipes, in three grouped queries
/// issued concurrently (one round trip each regardless of batch size).
///
/// A failed counter query degrades its values to the defaults and logs a
/// warning instead of failing the whole page render.
pub async fn get_social_counts(
    pool: &PgPool,
    recipe_ids: &[Uuid],
    viewer: Option<Uuid>,
) -> HashMap<Uuid, SocialCounts> {
    let mut counts: HashMap<Uuid, SocialCounts> = recipe_ids
        .iter()
        .map(|id| (*id, SocialCounts::default()))
        .collect();

    if recipe_ids.is_empty() {
        return counts;
    }

    let likes_query = sqlx::query_as::<_, (Uuid, i64)>(
        "SELECT recipe_id, COUNT(*) FROM recipe_likes
         WHERE recipe_id = ANY($1)
         GROUP BY recipe_id",
    )
    .bind(recipe_ids)
    .fetch_all(pool);

    let comments_query = sqlx::query_as::<_, (Uuid, i64)>(
        "SELECT recipe_id, COUNT(*) FROM recipe_comments
         WHERE recipe_id = ANY($1) AND parent_id IS NULL
         GROUP BY recipe_id",
    )
    .bind(recipe_ids)
    .fetch_all(pool);

    let liked_query = async {
        match viewer {
            Some(user_id) => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT recipe_id FROM recipe_likes
                     WHERE user_id = $1 AND recipe_id = ANY($2)",
                )
                .bind(user_id)
                .bind(recipe_ids)
                .fetch_all(pool)
                .await
            }
            None => Ok(Vec::new()),
        }
    };

    let (likes, comments, liked) = tokio::join!(likes_query, comments_query, liked_query);

    match likes {
        Ok(rows) => {
            for (recipe_id, count) in rows {
                if let Some(entry) = counts.get_mut(&recipe_id) {
                    entry.like_count = count;
                }
            }
        }
        Err(e) => warn!(error = %e, "like counts unavailable, defaulting to zero"),
    }

    match comments {
        Ok(rows) => {
            for (recipe_id, count) in rows {
                if let Some(entry) = counts.get_mut(&recipe_id) {
                    entry.comment_count = count;
                }
            }
        }
        Err(e) => warn!(error = %e, "comment counts unavailable, defaulting to zero"),
    }

    match liked {
        Ok(rows) => {
            let liked_set: HashSet<Uuid> = rows.into_iter().collect();
            for (recipe_id, entry) in counts.iter_mut() {
                entry.is_liked_by_user = liked_set.contains(recipe_id);
            }
        }
        Err(e) => warn!(error = %e, "liked-set unavailable, defaulting to not liked"),
    }

    counts
}
