//! WLAN filter command handlers.

use hwmesh_api::RouterClient;
use hwmesh_core::{AccessListEntry, FilterAction, FilterInfo, FilterMode, MacAddress, Router};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{FilterArgs, FilterCommand, GlobalOpts, ListArg};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<ListArg> for FilterMode {
    fn from(list: ListArg) -> Self {
        match list {
            ListArg::Whitelist => Self::Whitelist,
            ListArg::Blacklist => Self::Blacklist,
        }
    }
}

// ── Report ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FilterReport {
    #[serde(rename = "2.4GHz")]
    two_ghz: Option<FilterInfo>,
    #[serde(rename = "5GHz")]
    five_ghz: Option<FilterInfo>,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "List")]
    list: &'static str,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn entry_rows(info: &FilterInfo) -> Vec<EntryRow> {
    let row = |list, e: &AccessListEntry| EntryRow {
        list,
        mac: e.mac().map_or_else(
            || e.mac_address.clone().unwrap_or_default(),
            |m| m.to_string(),
        ),
        name: e.host_name.clone().unwrap_or_default(),
    };
    info.whitelist
        .iter()
        .map(|e| row("whitelist", e))
        .chain(info.blacklist.iter().map(|e| row("blacklist", e)))
        .collect()
}

fn band_detail(label: &str, info: Option<&FilterInfo>, color: bool) -> String {
    let Some(info) = info else {
        return format!("{label}: not reported by the router");
    };
    let mode = info.mode.map_or_else(|| "-".into(), |m| m.to_string());
    let header = format!(
        "{label}: filter {}, mode {mode}",
        output::on_off(info.enabled, color)
    );
    let rows = entry_rows(info);
    if rows.is_empty() {
        format!("{header}\n(no entries)")
    } else {
        format!("{header}\n{}", output::render_table(&rows))
    }
}

fn report_detail(report: &FilterReport, color: bool) -> String {
    [
        band_detail("2.4GHz", report.two_ghz.as_ref(), color),
        band_detail("5GHz", report.five_ghz.as_ref(), color),
    ]
    .join("\n\n")
}

/// `<band> <list> <mac>` per entry.
fn report_plain(report: &FilterReport) -> String {
    [("2.4GHz", &report.two_ghz), ("5GHz", &report.five_ghz)]
        .into_iter()
        .filter_map(|(label, info)| info.as_ref().map(|info| (label, info)))
        .flat_map(|(label, info)| {
            entry_rows(info)
                .into_iter()
                .map(move |row| format!("{label} {} {}", row.list, row.mac))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

async fn apply(
    router: &Router<RouterClient>,
    action: FilterAction,
    mac: &str,
    list: ListArg,
    name: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mac: MacAddress = mac.parse()?;
    let mode = FilterMode::from(list);

    let applied = router.apply_wlan_filter(mode, action, &mac, name).await?;
    util::ensure_applied(applied, &action.to_string())?;

    let verb = match action {
        FilterAction::Add => "added to",
        FilterAction::Remove => "removed from",
    };
    output::print_status(
        &format!("{mac} {verb} the {mode}"),
        global.quiet,
        output::should_color(&global.color),
    );
    Ok(())
}

pub async fn handle(
    router: &Router<RouterClient>,
    args: FilterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        FilterCommand::Info => {
            let (two_ghz, five_ghz) = router.wlan_filter_info().await?;
            let report = FilterReport { two_ghz, five_ghz };
            let out = output::render_single(
                &global.output,
                &report,
                |r| report_detail(r, color),
                report_plain,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FilterCommand::Add { mac, list, name } => {
            apply(router, FilterAction::Add, &mac, list, name.as_deref(), global).await
        }

        FilterCommand::Remove { mac, list } => {
            apply(router, FilterAction::Remove, &mac, list, None, global).await
        }

        FilterCommand::Mode { mode } => {
            let mode = FilterMode::from(mode);
            let applied = router.set_wlan_filter_mode(mode).await?;
            util::ensure_applied(applied, "mode change")?;
            output::print_status(&format!("Filter mode set to {mode}"), global.quiet, color);
            Ok(())
        }

        FilterCommand::Enable => set_enabled(router, true, global).await,
        FilterCommand::Disable => set_enabled(router, false, global).await,
    }
}

async fn set_enabled(
    router: &Router<RouterClient>,
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let applied = router.set_wlan_filter_enabled(enabled).await?;
    util::ensure_applied(applied, if enabled { "enable" } else { "disable" })?;
    let color = output::should_color(&global.color);
    output::print_status(
        &format!("WLAN filter turned {}", output::on_off(enabled, color)),
        global.quiet,
        color,
    );
    Ok(())
}
