pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::commands::{
    cmd_activate, cmd_backup, cmd_create, cmd_delete, cmd_delete_all, cmd_info, cmd_list,
    cmd_restore, cmd_set_enabled, cmd_update,
};
use cli::{Cli, Commands};
pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            token,
            user,
            enabled,
            limited,
            lifetime,
            action,
            options,
        } => {
            cmd_create(
                &config, token, user, enabled, limited, lifetime, action, options,
            )
            .await
        }

        Commands::List { offset, limit } => cmd_list(&config, offset, limit).await,

        Commands::Info { key } => cmd_info(&config, &key).await,

        Commands::Enable { key } => cmd_set_enabled(&config, &key, true).await,

        Commands::Disable { key } => cmd_set_enabled(&config, &key, false).await,

        Commands::Update {
            id,
            token,
            user,
            limited,
            lifetime,
            action,
            options,
        } => {
            cmd_update(
                &config, id, token, user, limited, lifetime, action, options,
            )
            .await
        }

        Commands::Delete { key } => cmd_delete(&config, &key).await,

        Commands::DeleteAll { yes } => cmd_delete_all(&config, yes).await,

        Commands::Backup { output } => cmd_backup(&config, output.as_deref()).await,

        Commands::Restore { input } => cmd_restore(&config, &input).await,

        Commands::Activate { token } => cmd_activate(&config, &token).await,
    }
}
