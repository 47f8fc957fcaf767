//! Activation engine: validates and atomically consumes a token.

use tracing::debug;

use crate::db::Store;
use crate::models::token::Token;
use crate::services::token_service::TokenError;

/// Outcome of an activation attempt.
///
/// `NotEligible` deliberately carries no reason. Whether the token was
/// unknown, disabled, exhausted or expired must look identical to the
/// bearer.
#[derive(Debug)]
pub enum Activation {
    Activated(Token),
    NotEligible,
}

impl Activation {
    #[must_use]
    pub const fn is_activated(&self) -> bool {
        matches!(self, Self::Activated(_))
    }
}

/// Validates a bearer secret against the eligibility predicate and, when it
/// holds, consumes one use.
///
/// The whole predicate (secret match, enabled, usage limit, expiry) and the
/// scope increment travel in one conditional store update, so concurrent
/// attempts against the same usage-limited token serialize at the store and
/// never overshoot the limit.
pub struct ActivationEngine {
    store: Store,
}

impl ActivationEngine {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn activate(&self, secret: &str) -> Result<Activation, TokenError> {
        let now = chrono::Utc::now().timestamp();

        match self.store.token_repo().activate(secret, now).await? {
            Some(token) => {
                debug!(id = token.id, scope = token.scope, "Token activated");
                Ok(Activation::Activated(token))
            }
            None => Ok(Activation::NotEligible),
        }
    }
}
