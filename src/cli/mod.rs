//! CLI module - administrative shell over the token engine.
//!
//! Thin glue: each subcommand loads the store, calls into the services and
//! prints the outcome. No token logic lives here.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gatekey - shared access token manager
#[derive(Parser)]
#[command(name = "gatekey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a token
    #[command(alias = "c")]
    Create {
        /// Bearer secret; generated when omitted
        #[arg(long)]
        token: Option<String>,

        /// Target user id (sets the target type to "user")
        #[arg(long)]
        user: Option<i64>,

        /// Create the token already enabled
        #[arg(long)]
        enabled: bool,

        /// Max activations; 0 = unlimited
        #[arg(long, default_value = "0")]
        limited: i64,

        /// Seconds until expiry, counted from creation; 0 = never
        #[arg(long, default_value = "0")]
        lifetime: i64,

        /// Side effect on activation: redirect, group, cohort or course
        #[arg(long, requires = "options")]
        action: Option<String>,

        /// Action parameter: URL for redirect, numeric id otherwise
        #[arg(long, requires = "action")]
        options: Option<String>,
    },

    /// List tokens
    #[command(alias = "ls", alias = "l")]
    List {
        #[arg(long, default_value = "0")]
        offset: u64,

        /// 0 = all
        #[arg(long, default_value = "0")]
        limit: u64,
    },

    /// Show details for one token
    #[command(alias = "i")]
    Info {
        /// Token id or secret
        key: String,
    },

    /// Enable a token
    Enable { key: String },

    /// Disable a token
    Disable { key: String },

    /// Update fields of an existing token
    Update {
        id: i32,

        #[arg(long)]
        token: Option<String>,

        #[arg(long)]
        user: Option<i64>,

        #[arg(long)]
        limited: Option<i64>,

        #[arg(long)]
        lifetime: Option<i64>,

        #[arg(long, requires = "options")]
        action: Option<String>,

        #[arg(long, requires = "action")]
        options: Option<String>,
    },

    /// Delete a token by id or secret
    #[command(alias = "rm")]
    Delete { key: String },

    /// Delete every token
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export all tokens as a portable blob
    Backup {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Restore a backup blob, replacing all tokens
    Restore {
        /// File containing the blob
        input: PathBuf,
    },

    /// Attempt to activate a token
    #[command(alias = "a")]
    Activate {
        /// Bearer secret
        token: String,
    },
}
