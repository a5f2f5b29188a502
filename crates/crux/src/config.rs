//! CLI configuration -- thin wrapper around `crux_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-key, --endpoint, --timeout, etc.).

use std::time::Duration;

use clap::ValueEnum;

use crux_core::{FormFactor, SourceConfig};

use crate::cli::{ColorMode, FormFactorArg, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use crux_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

impl From<FormFactorArg> for FormFactor {
    fn from(arg: FormFactorArg) -> Self {
        match arg {
            FormFactorArg::Phone => Self::Phone,
            FormFactorArg::Desktop => Self::Desktop,
            FormFactorArg::Tablet => Self::Tablet,
            FormFactorArg::All => Self::AllFormFactors,
        }
    }
}

/// Translate config + global flags into a `SourceConfig`.
///
/// CLI flag overrides take priority over file values. `--synthetic`
/// skips credential resolution entirely.
pub fn build_source_config(global: &GlobalOpts, cfg: &Config) -> Result<SourceConfig, CliError> {
    let api_key = if global.synthetic {
        None
    } else {
        crux_config::resolve_api_key(cfg, global.api_key.as_deref())
    };

    let mut source = crux_config::to_source_config(cfg, api_key)?;

    if let Some(ref raw) = global.endpoint {
        source.endpoint = url::Url::parse(raw).map_err(|e| CliError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL '{raw}': {e}"),
        })?;
    }
    if let Some(form_factor) = global.form_factor {
        source.form_factor = form_factor.into();
    }
    if let Some(secs) = global.timeout {
        source.timeout = Duration::from_secs(secs);
    }

    Ok(source)
}

/// Output format: flag > env > config default > table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag > config default > auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["crux"];
        argv.extend_from_slice(args);
        argv.push("metrics");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn synthetic_flag_ignores_key() {
        let cfg = Config {
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        let source = build_source_config(&global(&["--synthetic", "--api-key", "k"]), &cfg).unwrap();
        assert!(!source.is_live());
    }

    #[test]
    fn flags_override_file() {
        let cfg = Config {
            endpoint: Some("http://localhost:1/q".into()),
            ..Config::default()
        };
        let g = global(&[
            "--synthetic",
            "--endpoint",
            "http://localhost:2/q",
            "-f",
            "all",
            "--timeout",
            "3",
        ]);
        let source = build_source_config(&g, &cfg).unwrap();
        assert_eq!(source.endpoint.as_str(), "http://localhost:2/q");
        assert_eq!(source.form_factor, FormFactor::AllFormFactors);
        assert_eq!(source.timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_endpoint_flag() {
        let err = build_source_config(&global(&["--synthetic", "--endpoint", "nope"]), &Config::default())
            .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "endpoint"));
    }

    #[test]
    fn output_falls_back_to_config() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Yaml);
        assert_eq!(output_format(&global(&["-o", "plain"]), &cfg), OutputFormat::Plain);

        cfg.defaults.output = "bogus".into();
        assert_eq!(output_format(&global(&[]), &cfg), OutputFormat::Table);
    }
}
