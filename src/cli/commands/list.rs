//! List tokens command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmTokenService, TokenService};

pub async fn cmd_list(config: &Config, offset: u64, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    let tokens = service.list(offset, limit).await?;

    if tokens.is_empty() {
        println!("No tokens.");
        println!();
        println!("Create one with: gatekey create");
        return Ok(());
    }

    println!("Tokens ({} shown)", tokens.len());
    println!("{:-<72}", "");

    for token in tokens {
        let state = if token.enabled { "on " } else { "off" };
        let uses = if token.limited == 0 {
            format!("{}/∞", token.scope)
        } else {
            format!("{}/{}", token.scope, token.limited)
        };

        println!(
            "[{}] {:>5}  {}  uses {}  action {}",
            state,
            token.id,
            token.token,
            uses,
            token.extended_action.as_str()
        );
    }

    Ok(())
}
