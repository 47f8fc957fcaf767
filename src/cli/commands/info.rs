//! Token details command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::token::{TargetType, Token};
use crate::services::{SeaOrmTokenService, TokenService};

pub async fn cmd_info(config: &Config, key: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    match service.find(key).await? {
        Some(token) => {
            print_token(&token);
            Ok(())
        }
        None => {
            println!("No token matches '{key}'.");
            Ok(())
        }
    }
}

fn print_token(token: &Token) {
    println!("Token {}", token.token);
    println!("  id:        {}", token.id);
    println!("  enabled:   {}", token.enabled);

    match token.target_type {
        TargetType::None => println!("  target:    none"),
        TargetType::User => println!("  target:    user {}", token.target_id),
    }

    if token.limited == 0 {
        println!("  uses:      {} (unlimited)", token.scope);
    } else {
        println!("  uses:      {}/{}", token.scope, token.limited);
    }

    if token.time_limited == 0 {
        println!("  expires:   never");
    } else {
        println!(
            "  expires:   {} (created {} + {}s)",
            token.time_created + token.time_limited,
            token.time_created,
            token.time_limited
        );
    }

    match token.time_last_use {
        Some(t) => println!("  last use:  {t}"),
        None => println!("  last use:  never"),
    }

    println!(
        "  action:    {} {}",
        token.extended_action.as_str(),
        token.extended_options
    );
}
