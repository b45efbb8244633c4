//! Argon2id password hashing and verification.
//!
//! Hashes are stored in PHC string format so the algorithm parameters and
//! salt travel with the hash itself. The plaintext is only ever held
//! transiently for validation; it is never persisted.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::validator::Validator;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Syntactic checks on a candidate password, accumulated into the validator.
pub fn validate_password_plaintext(v: &mut Validator, password: &str) {
    v.check(!password.is_empty(), "password", "must be provided");
    v.check(
        password.chars().count() >= 8,
        "password",
        "must be at least 8 characters long",
    );
    v.check(
        password.chars().count() <= 72,
        "password",
        "must not be more than 72 characters long",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");

        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("real-password").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Random salt means no two stored hashes should collide
        let a = hash_password("pa55word-pa55word").unwrap();
        let b = hash_password("pa55word-pa55word").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn plaintext_rules_accumulate() {
        let mut v = Validator::new();
        validate_password_plaintext(&mut v, "");
        assert!(!v.is_valid());
        assert_eq!(v.errors["password"], "must be provided");

        let mut v = Validator::new();
        validate_password_plaintext(&mut v, "short");
        assert_eq!(v.errors["password"], "must be at least 8 characters long");

        let mut v = Validator::new();
        validate_password_plaintext(&mut v, &"x".repeat(73));
        assert_eq!(
            v.errors["password"],
            "must not be more than 72 characters long"
        );

        let mut v = Validator::new();
        validate_password_plaintext(&mut v, "long-enough-password");
        assert!(v.is_valid());
    }
}
