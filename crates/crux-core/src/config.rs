// ── Runtime source configuration ──
//
// Describes *where* metrics come from. Carries the credential but never
// touches disk; crux-config (or a test) builds one and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use crux_api::{DEFAULT_ENDPOINT, FormFactor};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// TLS trust strategy for the live source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// Bundled webpki roots.
    #[default]
    SystemDefaults,
    /// Additionally trust this PEM CA certificate.
    CustomCa(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// `None` or blank selects synthetic data.
    pub api_key: Option<SecretString>,
    pub endpoint: Url,
    pub form_factor: FormFactor,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            form_factor: FormFactor::Phone,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SourceConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// The credential, if one is set and not blank.
    pub fn credential(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
    }

    /// Whether fetches go to the network.
    pub fn is_live(&self) -> bool {
        self.credential().is_some()
    }
}

pub fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}
