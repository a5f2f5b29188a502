//! Configuration for the crux CLI.
//!
//! TOML config file, credential resolution (flag + env + keyring +
//! plaintext), and translation to `crux_core::SourceConfig`. The CLI layers
//! its own flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crux_core::{FormFactor, SourceConfig, TlsVerification};

/// Keyring service name the API key is stored under.
pub const KEYRING_SERVICE: &str = "crux";
/// Keyring user name the API key is stored under.
pub const KEYRING_USER: &str = "api-key";

/// Env var consulted when the config names none.
pub const DEFAULT_API_KEY_ENV: &str = "CRUX_API_KEY";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// API key (plaintext; prefer the keyring or an env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override the `records:queryRecord` endpoint.
    pub endpoint: Option<String>,

    /// Device class to query (`PHONE`, `DESKTOP`, `TABLET`, `ALL_FORM_FACTORS`).
    pub form_factor: Option<FormFactor>,

    /// Path to an extra CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    crux_core::pipeline::DEFAULT_PAGE_SIZE
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "crux", "crux").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("crux");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults overlaid with the TOML file at `path` (missing file is fine).
fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load config from `path` plus `CRUX_`-prefixed environment variables.
/// `__` separates nested keys (`CRUX_DEFAULTS__TIMEOUT`).
///
/// `CRUX_API_KEY` and `CRUX_FORM_FACTOR` belong to the CLI flags and are
/// not read here.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let env = Env::prefixed("CRUX_")
        .split("__")
        .ignore(&["api_key", "form_factor"]);
    let figment = file_figment(path).merge(env);
    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry() -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?)
}

/// The API key stored in the system keyring, if any.
pub fn keyring_api_key() -> Option<String> {
    keyring_entry().ok()?.get_password().ok()
}

pub fn store_api_key(key: &str) -> Result<(), ConfigError> {
    keyring_entry()?.set_password(key)?;
    Ok(())
}

/// Remove the stored key. Returns `false` if there was nothing to remove.
pub fn clear_api_key() -> Result<bool, ConfigError> {
    match keyring_entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Where a resolved API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Flag,
    Env,
    Keyring,
    ConfigFile,
}

/// Resolve the API key: CLI flag → env var named by `api_key_env` →
/// keyring → plaintext `api_key`. Blank values are skipped.
///
/// `None` means synthetic mode.
pub fn resolve_api_key_with(
    cfg: &Config,
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn() -> Option<String>,
) -> Option<(SecretString, KeySource)> {
    let present = |v: &String| !v.trim().is_empty();

    if let Some(key) = flag.map(str::to_owned).filter(present) {
        return Some((SecretString::from(key), KeySource::Flag));
    }

    let env_name = cfg.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
    if let Some(key) = env(env_name).filter(present) {
        return Some((SecretString::from(key), KeySource::Env));
    }

    if let Some(key) = keyring().filter(present) {
        return Some((SecretString::from(key), KeySource::Keyring));
    }

    cfg.api_key
        .clone()
        .filter(present)
        .map(|key| (SecretString::from(key), KeySource::ConfigFile))
}

/// [`resolve_api_key_with`] against the real environment and keyring.
pub fn resolve_api_key(cfg: &Config, flag: Option<&str>) -> Option<SecretString> {
    let resolved = resolve_api_key_with(cfg, flag, |name| std::env::var(name).ok(), keyring_api_key);
    match &resolved {
        Some((_, source)) => debug!(?source, "resolved CrUX API key"),
        None => debug!("no CrUX API key found"),
    }
    resolved.map(|(key, _)| key)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `SourceConfig` from file settings and an already-resolved key.
pub fn to_source_config(
    cfg: &Config,
    api_key: Option<SecretString>,
) -> Result<SourceConfig, ConfigError> {
    let endpoint = match cfg.endpoint.as_deref() {
        Some(raw) => url::Url::parse(raw).map_err(|e| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL '{raw}': {e}"),
        })?,
        None => crux_core::config::default_endpoint(),
    };

    let tls = cfg
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

    Ok(SourceConfig {
        api_key,
        endpoint,
        form_factor: cfg.form_factor.unwrap_or_default(),
        tls,
        timeout: Duration::from_secs(cfg.defaults.timeout),
    })
}
