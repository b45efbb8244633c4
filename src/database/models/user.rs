use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::validator::{matches, Validator, EMAIL_RX};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized, never empty once persisted.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

pub fn validate_email(v: &mut Validator, email: &str) {
    v.check(!email.is_empty(), "email", "must be provided");
    v.check(
        matches(email, &EMAIL_RX),
        "email",
        "must be a valid email address",
    );
}

pub fn validate_user(v: &mut Validator, user: &User) {
    v.check(!user.name.is_empty(), "name", "must be provided");
    v.check(
        user.name.chars().count() <= 500,
        "name",
        "must not be more than 500 characters long",
    );

    validate_email(v, &user.email);

    // A user reaching persistence without a hash is a programming error
    assert!(!user.password_hash.is_empty(), "missing password hash for user");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 0,
            created_at: Utc::now(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[test]
    fn valid_user_passes() {
        let mut v = Validator::new();
        validate_user(&mut v, &user());
        assert!(v.is_valid());
    }

    #[test]
    fn bad_email_and_missing_name_reported_together() {
        let mut u = user();
        u.name = String::new();
        u.email = "nope".to_string();

        let mut v = Validator::new();
        validate_user(&mut v, &u);
        assert_eq!(v.errors["name"], "must be provided");
        assert_eq!(v.errors["email"], "must be a valid email address");
    }

    #[test]
    #[should_panic(expected = "missing password hash")]
    fn empty_hash_is_fatal() {
        let mut u = user();
        u.password_hash = String::new();
        validate_user(&mut Validator::new(), &u);
    }

    #[test]
    fn serialization_hides_password_hash() {
        let value = serde_json::to_value(user()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "alice@example.com");
    }
}
