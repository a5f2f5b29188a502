use thiserror::Error;

/// Top-level error type for the `crux-api` crate.
///
/// Covers every failure mode of a single `records:queryRecord` round-trip.
/// `crux-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// TLS setup error (unreadable or invalid CA certificate).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx reply. `message` comes from the `{error: {message}}`
    /// envelope when the body carries one.
    #[error("CrUX API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Google status string, e.g. `"NOT_FOUND"` or `"INVALID_ARGUMENT"`.
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Reply parsed as JSON but lacks the `record` / `record.metrics` shape.
    #[error("Invalid data format from CrUX API: {message}")]
    MalformedResponse { message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the upstream rejected the API key.
    pub fn is_credential_rejected(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                matches!(status, 401 | 403)
                    || code.as_deref() == Some("PERMISSION_DENIED")
                    || code.as_deref() == Some("UNAUTHENTICATED")
            }
            _ => false,
        }
    }

    /// Returns `true` if CrUX has no data for the requested URL.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
