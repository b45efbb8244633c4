use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Email sanity check. Deliberately permissive; the definitive check is the
/// activation/sign-in round-trip, not the regex.
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex must compile")
});

/// Accumulating validation engine. Checks never fail fast; every violation
/// lands in the `errors` map keyed by field name so a single response can
/// report all of them together.
#[derive(Debug, Default)]
pub struct Validator {
    pub errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error for a field. The first message for a field wins;
    /// later messages for the same field are dropped.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn check(&mut self, ok: bool, field: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.add_error(field, message);
        }
    }
}

/// Membership test against a caller-supplied allow-list.
pub fn permitted_value<T: PartialEq>(value: &T, list: &[T]) -> bool {
    list.contains(value)
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}
