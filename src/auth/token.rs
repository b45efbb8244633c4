//! Opaque bearer tokens.
//!
//! A token is a random, unstructured secret with no embedded claims. The
//! client receives the plaintext exactly once at issuance; only the SHA-256
//! digest is persisted, so the server can never recover the secret from
//! storage. Verification re-derives the digest from a presented plaintext
//! and lets the storage index do the equality check.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::validator::Validator;

/// Tokens issued at sign-in carry this scope. Stored but not currently
/// branched on; reserved for future use-classes such as password reset.
pub const SCOPE_AUTHENTICATION: &str = "authentication";

#[derive(Debug, Clone, Serialize)]
pub struct Token {
    /// Client-facing secret, returned once and never retrievable again.
    #[serde(rename = "token")]
    pub plaintext: String,
    #[serde(skip)]
    pub hash: Vec<u8>,
    #[serde(skip)]
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    #[serde(skip)]
    pub scope: String,
}

impl Token {
    /// Generate a fresh token: 128 bits of OS entropy, base64url-encoded
    /// plaintext, SHA-256 digest for storage. Fails only if the OS random
    /// source does.
    pub fn generate(user_id: i64, ttl: Duration, scope: &str) -> Result<Self, rand::Error> {
        let mut random_bytes = [0u8; 16];
        OsRng.try_fill_bytes(&mut random_bytes)?;

        let plaintext = URL_SAFE_NO_PAD.encode(random_bytes);
        let hash = hash_plaintext(&plaintext);

        Ok(Self {
            plaintext,
            hash,
            user_id,
            expiry: Utc::now() + ttl,
            scope: scope.to_string(),
        })
    }
}

/// The one digest function used on both the issuance and verification paths.
pub fn hash_plaintext(plaintext: &str) -> Vec<u8> {
    Sha256::digest(plaintext.as_bytes()).to_vec()
}

/// Syntactic well-formedness check, run before any storage round-trip.
pub fn validate_token_plaintext(v: &mut Validator, plaintext: &str) {
    v.check(!plaintext.is_empty(), "token", "must be provided");
}
