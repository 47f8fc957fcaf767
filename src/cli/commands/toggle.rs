//! Enable/disable command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmTokenService, TokenService};

pub async fn cmd_set_enabled(config: &Config, key: &str, enabled: bool) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    if service.set_enabled(key, enabled).await? {
        println!(
            "Token '{key}' {}.",
            if enabled { "enabled" } else { "disabled" }
        );
    } else {
        println!("No token matches '{key}'.");
    }

    Ok(())
}
