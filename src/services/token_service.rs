//! Domain service for administrative token management.
//!
//! Covers create/update/toggle/delete/find/list — everything the admin shell
//! does to the token table outside of activation and backup.

use thiserror::Error;

use crate::models::token::{NewToken, Token, TokenPatch};

/// Errors specific to administrative token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A token with the same secret already exists.
    #[error("Duplicate token")]
    DuplicateToken,

    /// A required field was missing on create.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for TokenError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for token administration.
#[async_trait::async_trait]
pub trait TokenService: Send + Sync {
    /// Creates a token, filling in the admin-editor defaults (random secret,
    /// disabled, no target).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingField`] when a user target is requested
    /// without a target id, [`TokenError::Validation`] on malformed fields,
    /// and [`TokenError::DuplicateToken`] when the secret is taken.
    async fn create(&self, new: NewToken) -> Result<Token, TokenError>;

    /// Applies a partial administrative update. Returns false when the id
    /// does not exist; a double-submitted edit is benign, not an error.
    async fn update(&self, id: i32, patch: TokenPatch) -> Result<bool, TokenError>;

    /// Sets the enabled flag. Key is an id or a secret.
    async fn set_enabled(&self, key: &str, enabled: bool) -> Result<bool, TokenError>;

    /// Flips the enabled flag, returning the new state, or `None` when the
    /// key matches nothing.
    async fn toggle(&self, key: &str) -> Result<Option<bool>, TokenError>;

    /// Deletes by id or secret. Returns false when nothing matched.
    async fn delete(&self, key: &str) -> Result<bool, TokenError>;

    /// Wipes the whole table, returning the number of deleted records.
    async fn delete_all(&self) -> Result<u64, TokenError>;

    /// Finds by id or secret.
    async fn find(&self, key: &str) -> Result<Option<Token>, TokenError>;

    /// Lists tokens ordered by id. `limit == 0` returns everything.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Token>, TokenError>;
}
