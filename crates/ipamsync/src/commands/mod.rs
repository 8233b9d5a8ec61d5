//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod grid;
pub mod import;
pub mod mapping;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a Grid Master-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Import(args) => import::handle(args, resolved, global).await,
        Command::TestConnection => grid::test_connection(resolved, global).await,
        Command::ListEas => grid::list_eas(resolved, global).await,
        Command::ListNetworks(args) => grid::list_networks(&args, resolved, global).await,
        Command::ListViews => grid::list_views(resolved, global).await,
        // Handled before a connection is resolved
        Command::Config(_) | Command::MappingTemplate(_) | Command::Completions(_) => Ok(()),
    }
}
