//! Password hashing and verification.
//!
//! Secrets are stored as the lowercase hex SHA-256 digest of their UTF-8
//! bytes: always [`DIGEST_HEX_LEN`] characters. Callers state whether an input
//! is a raw secret or an already-computed digest with [`Secret`], so a raw
//! password that happens to be 64 characters long is still hashed.
//!
//! # Example
//!
//! ```rust
//! use phonebook_core::credential::{hash_secret, verify};
//!
//! let digest = hash_secret("123");
//! assert!(verify(&digest, "123"));
//! assert!(!verify(&digest, "wrong"));
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DigestError;

/// Length of a stored digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// A SHA-256 password digest in lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Parse a stored digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly [`DIGEST_HEX_LEN`]
    /// lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(DigestError::Length {
                expected: DIGEST_HEX_LEN,
                actual: s.len(),
            });
        }
        if s.chars().any(|c| c.is_ascii_uppercase()) || hex::decode(s).is_err() {
            return Err(DigestError::NotHex);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Digests are secrets in their own right; keep them out of debug output.
impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

impl TryFrom<String> for PasswordDigest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PasswordDigest> for String {
    fn from(digest: PasswordDigest) -> Self {
        digest.0
    }
}

/// A password as supplied at account construction.
#[derive(Debug, Clone)]
pub enum Secret {
    /// A plain-text secret; it is hashed before being stored.
    Raw(String),
    /// A digest that was computed earlier and is stored verbatim.
    Hashed(PasswordDigest),
}

impl Secret {
    pub fn raw(secret: impl Into<String>) -> Self {
        Self::Raw(secret.into())
    }

    /// Resolve into the digest that gets stored on the account.
    pub fn into_digest(self) -> PasswordDigest {
        match self {
            Self::Raw(secret) => hash_secret(&secret),
            Self::Hashed(digest) => digest,
        }
    }
}

/// Hash a secret into its stored digest.
pub fn hash_secret(secret: &str) -> PasswordDigest {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    PasswordDigest(format!("{:x}", hasher.finalize()))
}

/// Check a candidate secret against a stored digest.
pub fn verify(stored: &PasswordDigest, candidate: &str) -> bool {
    hash_secret(candidate) == *stored
}
