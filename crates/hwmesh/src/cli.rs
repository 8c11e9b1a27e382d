//! Clap derive structures for the `hwmesh` CLI.
//!
//! Defines the command tree, global flags, and shared value types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hwmesh -- manage Huawei mesh routers from the command line
#[derive(Debug, Parser)]
#[command(
    name = "hwmesh",
    version,
    about = "Manage Huawei mesh routers and their WLAN access filter",
    long_about = "Talks to the router's local HTTP/JSON API.\n\n\
        Reads device and connection info, toggles switches, and edits the\n\
        per-band MAC whitelist/blacklist as a single combined write.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Router profile to use
    #[arg(long, short = 'p', env = "HWMESH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router host or IP address (overrides profile)
    #[arg(long, env = "HWMESH_HOST", global = true)]
    pub host: Option<String>,

    /// Login user name (overrides profile)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, env = "HWMESH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HWMESH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HWMESH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HWMESH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnOff {
    On,
    Off,
}

impl OnOff {
    pub fn as_bool(self) -> bool {
        matches!(self, Self::On)
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show router identity and firmware versions
    Info,

    /// Show the WAN connection state
    Wan,

    /// List client devices the router knows about
    #[command(alias = "dev")]
    Devices,

    /// Show the mesh topology tree
    Topology,

    /// List optional features and whether this router has them
    Features,

    /// Read or change a boolean router setting
    #[command(alias = "sw")]
    Switch(SwitchArgs),

    /// Reboot the router
    Reboot,

    /// Manage the WLAN MAC access filter
    #[command(alias = "f")]
    Filter(FilterArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print the man page (roff) to stdout
    Man,
}

// ── Switch ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SwitchArgs {
    #[command(subcommand)]
    pub command: SwitchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwitchCommand {
    /// Print a switch state
    Get {
        /// Switch name (nfc, wifi_80211r, wifi_twt, wlan_filter)
        name: String,
    },

    /// Turn a switch on or off
    Set {
        /// Switch name (nfc, wifi_80211r, wifi_twt, wlan_filter)
        name: String,

        #[arg(value_enum)]
        state: OnOff,
    },
}

// ── Filter ───────────────────────────────────────────────────────────

/// One of the two WLAN access lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListArg {
    #[value(alias = "white")]
    Whitelist,
    #[value(alias = "black")]
    Blacklist,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub command: FilterCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilterCommand {
    /// Show filter state and access lists for both bands
    Info,

    /// Put a device on an access list
    Add {
        /// Device MAC address
        mac: String,

        /// Target list
        #[arg(long, short = 'l', value_enum)]
        list: ListArg,

        /// Name to store with the entry (defaults to the router's name for the device)
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Take a device off an access list
    #[command(alias = "rm")]
    Remove {
        /// Device MAC address
        mac: String,

        /// List to remove from
        #[arg(long, short = 'l', value_enum)]
        list: ListArg,
    },

    /// Switch which list the router enforces
    Mode {
        /// List the router should enforce
        #[arg(value_enum)]
        mode: ListArg,
    },

    /// Turn the filter on for both bands
    Enable,

    /// Turn the filter off for both bands
    Disable,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (host, port, use_ssl, username, password_env, verify_ssl, ca_cert, timeout)
        key: String,

        /// Value to set
        value: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
