// ── Core error types ──
//
// User-facing errors from crux-core. Consumers never see reqwest errors or
// JSON parse failures directly; the `From<crux_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    /// Rejected at entry; never reaches the network.
    #[error("{message}")]
    InvalidInput { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to CrUX API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("CrUX API request timed out")]
    Timeout,

    #[error("CrUX API rejected the API key: {message}")]
    CredentialRejected { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Invalid data format from CrUX API: {message}")]
    MalformedResponse { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("CrUX API error: {message}")]
    Api {
        message: String,
        /// Google status string, e.g. `"NOT_FOUND"`.
        code: Option<String>,
        status: Option<u16>,
    },
}

impl CoreError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<crux_api::Error> for CoreError {
    fn from(err: crux_api::Error) -> Self {
        if err.is_credential_rejected() {
            let message = match err {
                crux_api::Error::Api { message, .. } => message,
                other => other.to_string(),
            };
            return CoreError::CredentialRejected { message };
        }

        match err {
            crux_api::Error::Transport(e) => {
                let url = e.url().map_or_else(|| "<unknown>".into(), url_without_query);
                // reqwest's Display includes the request URL, key and all.
                let e = e.without_url();
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            crux_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            crux_api::Error::Api {
                status,
                message,
                code,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            crux_api::Error::MalformedResponse { message } => {
                CoreError::MalformedResponse { message }
            }
            crux_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}

/// Request URLs carry the API key in the query string; strip it before the
/// URL ends up in an error message.
fn url_without_query(url: &url::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
