//! Update token command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::token::{TargetType, TokenPatch};
use crate::services::{SeaOrmTokenService, TokenError, TokenService};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_update(
    config: &Config,
    id: i32,
    token: Option<String>,
    user: Option<i64>,
    limited: Option<i64>,
    lifetime: Option<i64>,
    action: Option<String>,
    options: Option<String>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    let patch = TokenPatch {
        token,
        enabled: None,
        target_type: user.map(|_| TargetType::User),
        target_id: user,
        limited,
        time_limited: lifetime,
        action: super::parse_action(action.as_deref(), options.as_deref())?,
    };

    match service.update(id, patch).await {
        Ok(true) => {
            println!("Token {id} updated.");
            Ok(())
        }
        Ok(false) => {
            println!("No token with id {id}.");
            Ok(())
        }
        Err(TokenError::DuplicateToken) => {
            anyhow::bail!("A token with that secret already exists")
        }
        Err(err) => Err(err.into()),
    }
}
