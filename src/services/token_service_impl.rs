//! `SeaORM` implementation of the `TokenService` trait.

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::info;

use crate::constants::tokens::SECRET_LENGTH;
use crate::db::{CreateOutcome, Store};
use crate::models::token::{ExtendedAction, NewToken, TargetType, Token, TokenPatch};
use crate::services::token_service::{TokenError, TokenService};

pub struct SeaOrmTokenService {
    store: Store,
}

impl SeaOrmTokenService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn generate_secret() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect()
    }

    fn validate_action(action: &Option<(ExtendedAction, String)>) -> Result<(), TokenError> {
        if let Some((kind, options)) = action {
            if *kind == ExtendedAction::None {
                return Err(TokenError::Validation(
                    "Action 'none' takes no options".to_string(),
                ));
            }
            if options.trim().is_empty() {
                return Err(TokenError::Validation(
                    "Action options must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn validate_counters(limited: i64, time_limited: i64) -> Result<(), TokenError> {
        if limited < 0 {
            return Err(TokenError::Validation(
                "Usage limit must not be negative".to_string(),
            ));
        }
        if time_limited < 0 {
            return Err(TokenError::Validation(
                "Lifetime must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenService for SeaOrmTokenService {
    async fn create(&self, new: NewToken) -> Result<Token, TokenError> {
        if new.target_type == TargetType::User && new.target_id.is_none() {
            return Err(TokenError::MissingField("target_id"));
        }

        Self::validate_counters(new.limited, new.time_limited)?;
        Self::validate_action(&new.action)?;

        let secret = match new.token {
            Some(secret) if !secret.trim().is_empty() => secret,
            Some(_) => {
                return Err(TokenError::Validation(
                    "Token secret must not be empty".to_string(),
                ));
            }
            None => Self::generate_secret(),
        };

        let repo = self.store.token_repo();

        if repo.find_by_secret(&secret).await?.is_some() {
            return Err(TokenError::DuplicateToken);
        }

        let now = chrono::Utc::now().timestamp();
        let (extended_action, extended_options) = new
            .action
            .unwrap_or((ExtendedAction::None, String::new()));

        let candidate = Token {
            id: 0,
            token: secret,
            enabled: new.enabled,
            target_type: new.target_type,
            target_id: new.target_id.unwrap_or(0),
            scope: 0,
            limited: new.limited,
            time_created: now,
            time_modified: now,
            time_last_use: None,
            time_limited: new.time_limited,
            extended_action,
            extended_options,
        };

        // The pre-check above races with concurrent creates; the unique
        // index on the secret is the authority.
        match repo.insert(&candidate).await? {
            CreateOutcome::Created(token) => {
                info!(id = token.id, "Token created");
                Ok(token)
            }
            CreateOutcome::DuplicateToken => Err(TokenError::DuplicateToken),
        }
    }

    async fn update(&self, id: i32, patch: TokenPatch) -> Result<bool, TokenError> {
        if let Some(limited) = patch.limited {
            Self::validate_counters(limited, 0)?;
        }
        if let Some(time_limited) = patch.time_limited {
            Self::validate_counters(0, time_limited)?;
        }
        Self::validate_action(&patch.action)?;

        let repo = self.store.token_repo();

        if let Some(secret) = &patch.token {
            if secret.trim().is_empty() {
                return Err(TokenError::Validation(
                    "Token secret must not be empty".to_string(),
                ));
            }
            if let Some(existing) = repo.find_by_secret(secret).await? {
                if existing.id != id {
                    return Err(TokenError::DuplicateToken);
                }
            }
        }

        let now = chrono::Utc::now().timestamp();
        Ok(repo.update(id, &patch, now).await?)
    }

    async fn set_enabled(&self, key: &str, enabled: bool) -> Result<bool, TokenError> {
        let repo = self.store.token_repo();

        let Some(token) = repo.find(key).await? else {
            return Ok(false);
        };

        let patch = TokenPatch {
            enabled: Some(enabled),
            ..TokenPatch::default()
        };
        let now = chrono::Utc::now().timestamp();
        Ok(repo.update(token.id, &patch, now).await?)
    }

    async fn toggle(&self, key: &str) -> Result<Option<bool>, TokenError> {
        let repo = self.store.token_repo();

        let Some(token) = repo.find(key).await? else {
            return Ok(None);
        };

        let next = !token.enabled;
        let patch = TokenPatch {
            enabled: Some(next),
            ..TokenPatch::default()
        };
        let now = chrono::Utc::now().timestamp();
        repo.update(token.id, &patch, now).await?;

        Ok(Some(next))
    }

    async fn delete(&self, key: &str) -> Result<bool, TokenError> {
        let repo = self.store.token_repo();

        let Some(token) = repo.find(key).await? else {
            return Ok(false);
        };

        let deleted = repo.delete(token.id).await?;
        if deleted {
            info!(id = token.id, "Token deleted");
        }
        Ok(deleted)
    }

    async fn delete_all(&self) -> Result<u64, TokenError> {
        let deleted = self.store.token_repo().delete_all().await?;
        info!(count = deleted, "All tokens deleted");
        Ok(deleted)
    }

    async fn find(&self, key: &str) -> Result<Option<Token>, TokenError> {
        Ok(self.store.token_repo().find(key).await?)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Token>, TokenError> {
        Ok(self.store.token_repo().list(offset, limit).await?)
    }
}
