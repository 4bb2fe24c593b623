//! Error types for the phonebook domain.
//!
//! Member-level address-book operations never fail with an error: they report
//! `bool` or `Option` results. The errors here cover the two places where a
//! caller needs to know *why* something was rejected.

use crate::AccountId;

/// Errors that can occur when parsing a [`PasswordDigest`](crate::PasswordDigest).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The input does not have the fixed digest length.
    #[error("digest must be {expected} hex characters, got {actual}")]
    Length {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("digest must be lowercase hexadecimal")]
    NotHex,
}

/// Errors from account management on a [`Directory`](crate::Directory).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Another member already uses this username.
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    /// No member with this id exists.
    #[error("member not found: {0}")]
    MemberNotFound(AccountId),
}
