//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use crux_config::ConfigError;
use crux_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const MALFORMED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(crux::invalid_input), help("{help}"))]
    InvalidInput { message: String, help: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(crux::validation))]
    Validation { field: String, reason: String },

    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Failed to fetch CrUX data. Please check your API key and URLs.")]
    #[diagnostic(code(crux::fetch_failed))]
    FetchFailed {
        #[source]
        source: CoreError,
        #[help]
        help: Option<String>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(crux::config),
        help("Check the config file. Run: crux config path")
    )]
    Config(Box<ConfigError>),

    #[error("System keyring unavailable: {reason}")]
    #[diagnostic(
        code(crux::keyring),
        help(
            "Store the key in an environment variable instead:\n\
             export CRUX_API_KEY=..."
        )
    )]
    Keyring { reason: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(crux::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(crux::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::FetchFailed { source, .. } => match source {
                CoreError::CredentialRejected { .. } => exit_code::AUTH,
                CoreError::ConnectionFailed { .. } => exit_code::CONNECTION,
                CoreError::Timeout => exit_code::TIMEOUT,
                CoreError::MalformedResponse { .. } => exit_code::MALFORMED,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }

    /// An input rejection, naming the offending value.
    pub fn invalid_input(message: String, input: &str) -> Self {
        Self::InvalidInput {
            message,
            help: if input.trim().is_empty() {
                "Pass one or more absolute URLs, e.g. crux query https://web.dev/".into()
            } else {
                format!("Offending input: {input:?}")
            },
        }
    }
}

fn fetch_help(err: &CoreError) -> Option<String> {
    match err {
        CoreError::CredentialRejected { .. } => Some(
            "The API key was rejected. Check it in the Google Cloud console,\n\
             then run: crux config set-key"
                .into(),
        ),
        CoreError::ConnectionFailed { .. } => {
            Some("Check your network connection or the configured endpoint.".into())
        }
        CoreError::Timeout => Some("Increase the timeout with --timeout.".into()),
        CoreError::Api {
            status: Some(404), ..
        } => Some("CrUX has no data for this URL. Try its origin or --form-factor all.".into()),
        _ => None,
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { message } => CliError::invalid_input(message, ""),
            other => CliError::FetchFailed {
                help: fetch_help(&other),
                source: other,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Keyring(e) => CliError::Keyring {
                reason: e.to_string(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}
