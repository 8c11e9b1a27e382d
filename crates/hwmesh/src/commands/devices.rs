//! Device command handlers: known clients and the mesh topology.

use std::fmt::Write;

use hwmesh_api::RouterClient;
use hwmesh_core::{DeviceNode, KnownDevice, Router};
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Guest")]
    guest: bool,
}

impl From<&KnownDevice> for DeviceRow {
    fn from(d: &KnownDevice) -> Self {
        Self {
            mac: d.mac().map_or_else(|| d.mac_address.clone(), |m| m.to_string()),
            name: d.name().unwrap_or_default().to_owned(),
            ip: d.ip_address.clone().unwrap_or_default(),
            interface: d.interface_type.clone().unwrap_or_default(),
            active: d.is_active,
            guest: d.is_guest,
        }
    }
}

/// Indented tree, one node per line.
fn topology_tree(nodes: &[DeviceNode]) -> String {
    let mut out = String::new();
    for root in nodes {
        for (depth, node) in root.walk() {
            let indent = "  ".repeat(depth);
            let mac = node.mac_address.as_deref().unwrap_or("?");
            match node.hilink_type.as_deref() {
                Some(kind) => {
                    let _ = writeln!(out, "{indent}- {mac} ({kind})");
                }
                None => {
                    let _ = writeln!(out, "{indent}- {mac}");
                }
            }
        }
    }
    out.trim_end().to_owned()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = router.known_devices().await?;
    let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| {
        d.mac_address.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn topology(router: &Router<RouterClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let nodes = router.devices_topology().await?;
    let out = output::render_single(&global.output, nodes.as_slice(), topology_tree, |nodes| {
        nodes
            .iter()
            .flat_map(DeviceNode::walk)
            .filter_map(|(_, node)| node.mac_address.clone())
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
