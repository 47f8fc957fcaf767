//! Activation command handler
//!
//! Runs the activation engine against the local table. The enrollment and
//! redirect collaborators belong to the embedding host, so this command
//! reports the follow-up action the host would dispatch instead of
//! performing it.

use crate::config::Config;
use crate::db::Store;
use crate::models::token::ExtendedAction;
use crate::services::{Activation, ActivationEngine};

pub async fn cmd_activate(config: &Config, secret: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let engine = ActivationEngine::new(store);

    match engine.activate(secret).await? {
        Activation::Activated(token) => {
            println!("Token activated (use {}).", token.scope);

            match token.extended_action {
                ExtendedAction::None => {}
                ExtendedAction::Redirect => {
                    println!("Follow-up: redirect to {}", token.extended_options);
                }
                action => {
                    println!(
                        "Follow-up: {} {}",
                        action.as_str(),
                        token.extended_options
                    );
                }
            }
            Ok(())
        }
        Activation::NotEligible => {
            // One generic message, whatever the failed predicate was.
            println!("Token cannot be activated.");
            Ok(())
        }
    }
}
