//! Backup restore command handler

use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::services::{BackupCodec, BackupError};

pub async fn cmd_restore(config: &Config, input: &Path) -> anyhow::Result<()> {
    let blob = tokio::fs::read_to_string(input).await?;

    let store = Store::new(&config.general.database_path).await?;
    let codec = BackupCodec::new(store);

    match codec.import(&blob).await {
        Ok(restored) => {
            println!("Restored {restored} token(s).");
            Ok(())
        }
        Err(err @ (BackupError::Malformed(_) | BackupError::Unsupported(_))) => {
            anyhow::bail!("{err}. Existing tokens were left untouched.")
        }
        Err(err) => Err(err.into()),
    }
}
