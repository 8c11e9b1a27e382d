//! Router-level command handlers: info, wan, features, reboot.

use hwmesh_api::RouterClient;
use hwmesh_core::{ConnectionInfo, Feature, Router, RouterAction, RouterInfo};
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct FeatureStatus {
    #[tabled(rename = "Feature")]
    feature: Feature,
    #[tabled(rename = "Available")]
    available: bool,
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn info_detail(info: &RouterInfo) -> String {
    [
        format!("Name:       {}", or_dash(info.name.as_deref())),
        format!("Model:      {}", or_dash(info.model.as_deref())),
        format!("Serial:     {}", or_dash(info.serial_number.as_deref())),
        format!("Software:   {}", or_dash(info.software_version.as_deref())),
        format!("Hardware:   {}", or_dash(info.hardware_version.as_deref())),
        format!("HarmonyOS:  {}", or_dash(info.harmony_os_version.as_deref())),
        format!(
            "Uptime:     {}",
            info.uptime.map_or_else(|| "-".into(), output::uptime)
        ),
    ]
    .join("\n")
}

fn wan_detail(wan: &ConnectionInfo, color: bool) -> String {
    [
        format!("Connected:  {}", output::on_off(wan.connected, color)),
        format!("Address:    {}", or_dash(wan.address.as_deref())),
        format!("Uptime:     {}", output::uptime(wan.uptime)),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn info(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let info = router.router_info().await?;
    let out = output::render_single(&global.output, &info, info_detail, |i| {
        i.name.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn wan(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let wan = router.wan_connection_info().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &wan,
        |w| wan_detail(w, color),
        |w| w.address.clone().unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn features(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let available = router.available_features().await?;
    let statuses: Vec<FeatureStatus> = Feature::iter()
        .map(|feature| FeatureStatus {
            feature,
            available: available.contains(&feature),
        })
        .collect();

    // Plain output lists only what the router has.
    let out = match global.output {
        OutputFormat::Plain => available
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_list(
            &global.output,
            &statuses,
            |s| FeatureStatus {
                feature: s.feature,
                available: s.available,
            },
            |s| s.feature.to_string(),
        ),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn reboot(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    if !util::confirm("Reboot the router?", "reboot", global.yes)? {
        return Ok(());
    }
    router.execute_action(RouterAction::Reboot).await?;
    output::print_status(
        "Router reboot initiated",
        global.quiet,
        output::should_color(&global.color),
    );
    Ok(())
}
