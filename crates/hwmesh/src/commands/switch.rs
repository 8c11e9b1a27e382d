//! Switch command handlers.

use hwmesh_api::RouterClient;
use hwmesh_core::{Router, Switch};
use serde::Serialize;

use crate::cli::{GlobalOpts, SwitchArgs, SwitchCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct SwitchState {
    switch: Switch,
    enabled: bool,
}

pub async fn handle(
    router: &Router<RouterClient>,
    args: SwitchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        SwitchCommand::Get { name } => {
            let switch: Switch = name.parse()?;
            let enabled = router.switch_state(switch).await?;
            let state = SwitchState { switch, enabled };
            let out = output::render_single(
                &global.output,
                &state,
                |s| format!("{}: {}", s.switch, output::on_off(s.enabled, color)),
                |s| output::on_off(s.enabled, false),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SwitchCommand::Set { name, state } => {
            let switch: Switch = name.parse()?;
            let enabled = state.as_bool();
            let applied = router.set_switch_state(switch, enabled).await?;
            util::ensure_applied(applied, if enabled { "enable" } else { "disable" })?;
            output::print_status(
                &format!("{switch} turned {}", output::on_off(enabled, color)),
                global.quiet,
                color,
            );
            Ok(())
        }
    }
}
