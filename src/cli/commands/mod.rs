mod activate;
mod backup;
mod create;
mod delete;
mod info;
mod list;
mod restore;
mod toggle;
mod update;

pub use activate::cmd_activate;
pub use backup::cmd_backup;
pub use create::cmd_create;
pub use delete::{cmd_delete, cmd_delete_all};
pub use info::cmd_info;
pub use list::cmd_list;
pub use restore::cmd_restore;
pub use toggle::cmd_set_enabled;
pub use update::cmd_update;

use crate::models::token::ExtendedAction;

/// Parses the `--action`/`--options` pair shared by create and update.
pub(crate) fn parse_action(
    action: Option<&str>,
    options: Option<&str>,
) -> anyhow::Result<Option<(ExtendedAction, String)>> {
    match (action, options) {
        (Some(action), Some(options)) => {
            let kind: ExtendedAction = action
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid action: {e}"))?;
            Ok(Some((kind, options.to_string())))
        }
        _ => Ok(None),
    }
}
