//! Command dispatch: bridges CLI args -> router calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod filter;
pub mod switch;
pub mod system;
pub mod util;

use hwmesh_api::RouterClient;
use hwmesh_core::Router;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    router: &Router<RouterClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Info => system::info(router, global).await,
        Command::Wan => system::wan(router, global).await,
        Command::Features => system::features(router, global).await,
        Command::Reboot => system::reboot(router, global).await,
        Command::Devices => devices::list(router, global).await,
        Command::Topology => devices::topology(router, global).await,
        Command::Switch(args) => switch::handle(router, args, global).await,
        Command::Filter(args) => filter::handle(router, args, global).await,
        // Config, Completions and Man are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Man => unreachable!(),
    }
}
