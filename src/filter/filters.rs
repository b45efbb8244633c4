use crate::validator::{permitted_value, Validator};

/// Validated listing parameters: pagination, sort column, sort direction.
///
/// The sort allow-list is supplied by the caller per-endpoint rather than
/// hardcoded here, so the same spec serves multiple resource types. An
/// out-of-list sort value is a hard validation error, never silently
/// clamped; this is what keeps the downstream query builder free of
/// unchecked strings.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub order: String,
    pub sort_safe_list: Vec<&'static str>,
    pub order_safe_list: Vec<&'static str>,
}

impl Filters {
    pub fn validate(&self, v: &mut Validator) {
        v.check(self.page > 0, "page", "must be greater than 0");
        v.check(
            self.page <= 10_000_000,
            "page",
            "must be a maximum of 10 million",
        );
        v.check(self.page_size > 0, "page_size", "must be greater than 0");
        v.check(
            self.page_size <= 100,
            "page_size",
            "must be a maximum of 100",
        );

        v.check(
            permitted_value(&self.sort.as_str(), &self.sort_safe_list),
            "sort",
            format!(
                "\"{}\" is an invalid sort value, use one of the following: {}",
                self.sort,
                self.sort_safe_list.join(", ")
            ),
        );
        v.check(
            permitted_value(&self.order.as_str(), &self.order_safe_list),
            "order",
            format!(
                "\"{}\" is an invalid order value, use one of the following: {}",
                self.order,
                self.order_safe_list.join(", ")
            ),
        );
    }

    /// The sort column destined for direct SQL interpolation. A value that
    /// was never validated against the allow-list reaching this point is a
    /// programming error, not a user error, and fails loud.
    pub fn sort_column(&self) -> &str {
        for safe_value in &self.sort_safe_list {
            if self.sort == *safe_value {
                return &self.sort;
            }
        }

        panic!("unsafe sort parameter: {}", self.sort)
    }

    pub fn sort_direction(&self) -> &'static str {
        if self.order == "asc" {
            "ASC"
        } else {
            "DESC"
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}
