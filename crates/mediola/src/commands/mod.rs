//! Command dispatch: bridges CLI args -> coordinator -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod shutters;
pub mod watch;

use mediola_core::GatewayConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: GatewayConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Shutters(args) => shutters::handle(config, args, global).await,
        Command::Watch => watch::handle(config, global).await,
        Command::Check => check::handle(config, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to gateway dispatch".into(),
        )),
    }
}
