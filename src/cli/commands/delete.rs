//! Delete commands handlers

use std::io::Write;

use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmTokenService, TokenService};

pub async fn cmd_delete(config: &Config, key: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    if service.delete(key).await? {
        println!("Token '{key}' deleted.");
    } else {
        println!("No token matches '{key}'.");
    }

    Ok(())
}

pub async fn cmd_delete_all(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm("Delete ALL tokens? This cannot be undone. [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }

    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmTokenService::new(store);

    let deleted = service.delete_all().await?;
    println!("Deleted {deleted} token(s).");

    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
