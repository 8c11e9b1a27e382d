//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map an interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_value<T: std::str::FromStr>(
    field: &str,
    value: &str,
    expected: &str,
) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "host" => profile.host = value,
        "port" => profile.port = parse_value("port", &value, "a port number")?,
        "use_ssl" | "use-ssl" => {
            profile.use_ssl = parse_value("use_ssl", &value, "'true' or 'false'")?;
        }
        "username" => profile.username = value,
        "password_env" | "password-env" => profile.password_env = Some(value),
        "verify_ssl" | "verify-ssl" => {
            profile.verify_ssl = parse_value("verify_ssl", &value, "'true' or 'false'")?;
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "timeout" => {
            profile.timeout = Some(parse_value("timeout", &value, "a number (seconds)")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: host, port, use_ssl, \
                     username, password_env, verify_ssl, ca_cert, timeout"
                ),
            });
        }
    }
    Ok(())
}

fn show_detail(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = config::config_file(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::redacted(&config::load(global)?);
            let out = output::render_single(&global.output, &cfg, show_detail, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load(global)?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            config::save_config_to(&cfg, &config::config_file(global))?;
            output::print_status(
                &format!("Set {key} on profile '{profile_name}'"),
                global.quiet,
                output::should_color(&global.color),
            );
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load(global)?;
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            hwmesh_config::store_password(&profile_name, &secret)?;

            output::print_status(
                &format!("Password stored in system keyring for profile '{profile_name}'"),
                global.quiet,
                output::should_color(&global.color),
            );
            Ok(())
        }
    }
}
