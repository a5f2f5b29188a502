//! Config subcommand handlers.

use std::path::{Path, PathBuf};

use dialoguer::{Input, Select};
use serde::Serialize;

use crux_config::{DEFAULT_API_KEY_ENV, Defaults};
use crux_core::FormFactor;

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, FormFactorArg, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const SETTABLE_KEYS: &str =
    "api_key_env, endpoint, form_factor, ca_cert, output, color, timeout, page_size";

// ── Helpers ─────────────────────────────────────────────────────────

/// `Config` with the plaintext key masked, for structured output.
#[derive(Serialize)]
struct Redacted<'a> {
    api_key: Option<&'static str>,
    api_key_env: Option<&'a str>,
    endpoint: Option<&'a str>,
    form_factor: Option<FormFactor>,
    ca_cert: Option<&'a Path>,
    defaults: &'a Defaults,
}

impl<'a> From<&'a Config> for Redacted<'a> {
    fn from(cfg: &'a Config) -> Self {
        Self {
            api_key: cfg.api_key.as_ref().map(|_| "****"),
            api_key_env: cfg.api_key_env.as_deref(),
            endpoint: cfg.endpoint.as_deref(),
            form_factor: cfg.form_factor,
            ca_cert: cfg.ca_cert.as_deref(),
            defaults: &cfg.defaults,
        }
    }
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if cfg.api_key.is_some() {
        let _ = writeln!(out, "api_key = \"****\"");
    }
    if let Some(ref env) = cfg.api_key_env {
        let _ = writeln!(out, "api_key_env = \"{env}\"");
    }
    if let Some(ref endpoint) = cfg.endpoint {
        let _ = writeln!(out, "endpoint = \"{endpoint}\"");
    }
    if let Some(form_factor) = cfg.form_factor {
        let _ = writeln!(out, "form_factor = \"{}\"", form_factor_name(form_factor));
    }
    if let Some(ref ca) = cfg.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = write!(out, "page_size = {}", cfg.defaults.page_size);

    out
}

fn form_factor_name(form_factor: FormFactor) -> &'static str {
    match form_factor {
        FormFactor::Phone => "PHONE",
        FormFactor::Desktop => "DESKTOP",
        FormFactor::Tablet => "TABLET",
        FormFactor::AllFormFactors => "ALL_FORM_FACTORS",
    }
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_api_key() -> Result<String, CliError> {
    let key = rpassword::prompt_password("CrUX API key: ").map_err(prompt_err)?;
    let key = key.trim().to_owned();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key)
}

fn validation(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Apply `crux config set <key> <value>` to an in-memory config.
fn apply_setting(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    use clap::ValueEnum;

    match key {
        "api_key_env" | "api-key-env" => cfg.api_key_env = Some(value),
        "endpoint" => {
            url::Url::parse(&value)
                .map_err(|e| validation("endpoint", format!("invalid URL '{value}': {e}")))?;
            cfg.endpoint = Some(value);
        }
        "form_factor" | "form-factor" => {
            let arg = FormFactorArg::from_str(&value, true).map_err(|_| {
                validation("form_factor", "must be 'phone', 'desktop', 'tablet', or 'all'")
            })?;
            cfg.form_factor = Some(arg.into());
        }
        "ca_cert" | "ca-cert" => cfg.ca_cert = Some(PathBuf::from(value)),
        "output" => {
            OutputFormat::from_str(&value, true).map_err(|_| {
                validation("output", "must be 'table', 'json', 'json-compact', 'yaml', or 'plain'")
            })?;
            cfg.defaults.output = value;
        }
        "color" => {
            ColorMode::from_str(&value, true)
                .map_err(|_| validation("color", "must be 'auto', 'always', or 'never'"))?;
            cfg.defaults.color = value;
        }
        "timeout" => {
            cfg.defaults.timeout = value
                .parse()
                .map_err(|_| validation("timeout", "must be a number (seconds)"))?;
        }
        "page_size" | "page-size" => {
            cfg.defaults.page_size = value
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| validation("page_size", "must be a positive integer"))?;
        }
        other => {
            return Err(validation(
                other,
                format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            ));
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("crux configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let key_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Read from an environment variable",
                "No key: use sample data",
            ];
            let key_selection = Select::new()
                .with_prompt("How should crux find your CrUX API key?")
                .items(key_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut cfg = Config::default();
            match key_selection {
                0 => {
                    crux_config::store_api_key(&prompt_api_key()?)?;
                    eprintln!("   ✓ API key stored in system keyring");
                }
                1 => cfg.api_key = Some(prompt_api_key()?),
                2 => {
                    let env: String = Input::new()
                        .with_prompt("Environment variable name")
                        .default(DEFAULT_API_KEY_ENV.into())
                        .interact_text()
                        .map_err(prompt_err)?;
                    cfg.api_key_env = Some(env);
                }
                _ => {}
            }

            let ff_choices = &["phone", "desktop", "tablet", "all"];
            let ff_selection = Select::new()
                .with_prompt("Default form factor")
                .items(ff_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            apply_setting(&mut cfg, "form_factor", ff_choices[ff_selection].into())?;

            let page_size: String = Input::new()
                .with_prompt("Rows per page")
                .default(Defaults::default().page_size.to_string())
                .interact_text()
                .map_err(prompt_err)?;
            apply_setting(&mut cfg, "page_size", page_size)?;

            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("\n  Try it: crux query https://web.dev/");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                config::output_format(global, &cfg),
                &Redacted::from(&cfg),
                |_| format_config_redacted(&cfg),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            apply_setting(&mut cfg, &key, value)?;
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key}");
            }
            Ok(())
        }

        // ── Keyring ─────────────────────────────────────────────────
        ConfigCommand::SetKey => {
            crux_config::store_api_key(&prompt_api_key()?)?;
            eprintln!("✓ API key stored in system keyring");
            Ok(())
        }

        ConfigCommand::ClearKey => {
            if crux_config::clear_api_key()? {
                eprintln!("✓ API key removed from system keyring");
            } else {
                eprintln!("No API key stored in system keyring");
            }
            Ok(())
        }
    }
}
