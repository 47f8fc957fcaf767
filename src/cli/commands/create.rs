//! Create token command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::token::{NewToken, TargetType};
use crate::services::{SeaOrmTokenService, TokenError, TokenService};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_create(
    config: &Config,
    token: Option<String>,
    user: Option<i64>,
    enabled: bool,
    limited: i64,
    lifetime: i64,
    action: Option<String>,
    options: Option<String>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    let new = NewToken {
        token,
        enabled,
        target_type: if user.is_some() {
            TargetType::User
        } else {
            TargetType::None
        },
        target_id: user,
        limited,
        time_limited: lifetime,
        action: super::parse_action(action.as_deref(), options.as_deref())?,
    };

    match service.create(new).await {
        Ok(created) => {
            println!("Created token {} (id {})", created.token, created.id);
            if !created.enabled {
                println!("The token is disabled; enable it with: gatekey enable {}", created.id);
            }
            Ok(())
        }
        Err(TokenError::DuplicateToken) => {
            anyhow::bail!("A token with that secret already exists")
        }
        Err(TokenError::MissingField(field)) => anyhow::bail!("Missing field: {field}"),
        Err(err) => Err(err.into()),
    }
}
