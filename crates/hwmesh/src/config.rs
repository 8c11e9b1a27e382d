//! CLI configuration -- thin wrapper around `hwmesh_config`.
//!
//! Adds the resolution step that lets `GlobalOpts` flags (--host,
//! --username, --insecure, --timeout, --config) override the profile.

use std::path::PathBuf;
use std::time::Duration;

use hwmesh_core::{RouterConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use hwmesh_config::{Config, Profile, save_config_to};

/// Config file this invocation reads and writes.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(hwmesh_config::config_path)
}

/// Load the config file, falling back to defaults when it is absent.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    if !path.exists() {
        return Ok(Config::default());
    }
    Ok(hwmesh_config::load_config_from(&path)?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `RouterConfig` for this invocation.
///
/// An explicitly named profile must exist. Without one, the default
/// profile is used if configured, else the built-in router defaults.
pub fn resolve_router_config(global: &GlobalOpts) -> Result<RouterConfig, CliError> {
    let cfg = load(global)?;
    let name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profile(global.profile.as_deref()) {
        Some((_, profile)) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name,
            });
        }
        None => Profile::default(),
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }

    let mut router = hwmesh_config::profile_to_router_config(&profile, &name)?;

    if let Some(ref username) = global.username {
        router.username.clone_from(username);
    }
    if global.insecure {
        router.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(seconds) = global.timeout {
        router.timeout = Duration::from_secs(seconds);
    }

    tracing::debug!(profile = %name, url = %router.url, "resolved router config");
    Ok(router)
}

/// Copy of `cfg` safe to print: plaintext passwords are masked.
pub fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: hwmesh_config::Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, profile)| {
                let mut profile = profile.clone();
                if profile.password.is_some() {
                    profile.password = Some("****".into());
                }
                (name.clone(), profile)
            })
            .collect(),
    }
}
