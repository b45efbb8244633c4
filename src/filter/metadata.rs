use serde::Serialize;

/// Pagination metadata derived from a count query. Recomputed per request,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl Metadata {
    /// With zero total records, `last_page` is reported as 0 rather than
    /// floored to 1: an empty set has no pages, and callers can detect it
    /// from `total_records` either way.
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
