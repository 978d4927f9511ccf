use serde::Deserialize;

const DEFAULT_PAGE_LIMIT: u64 = 50;
const MAX_PAGE_LIMIT: u64 = 200;

/// Pagination query parameters shared by the list endpoints. An omitted or
/// zero limit falls back to the default; the cap bounds a single fetch.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        let limit = if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit.min(MAX_PAGE_LIMIT)
        };
        limit as i64
    }

    pub fn offset(&self) -> i64 {
        self.offset.min(i64::MAX as u64) as i64
    }
}
