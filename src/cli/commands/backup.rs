//! Backup export command handler

use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::services::BackupCodec;

pub async fn cmd_backup(config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let codec = BackupCodec::new(store);

    let blob = codec.export().await?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &blob).await?;
            println!("Backup written to {}", path.display());
        }
        None => println!("{blob}"),
    }

    Ok(())
}
