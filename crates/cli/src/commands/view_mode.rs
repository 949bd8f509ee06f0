//! Customer/manager view preference.

use tracing::info;

use stockroom_core::ViewMode;
use stockroom_storefront::storage;

use crate::error::CommandError;
use crate::output::Output;
use crate::workspace::Workspace;

/// Show the view mode, or switch it when `mode` is given.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the preference cannot be saved.
pub fn run(ws: &Workspace, out: Output, mode: Option<ViewMode>) -> Result<(), CommandError> {
    let mode = match mode {
        Some(mode) => {
            storage::save_view_mode(ws.storage(), mode)?;
            info!(%mode, "View mode changed");
            mode
        }
        None => ws.view_mode(),
    };
    out.show(&mode, |m| format!("View mode: {m}"))
}
