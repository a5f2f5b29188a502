// HTTP client for the CrUX `records:queryRecord` endpoint.
//
// Auth: API key passed as the `key` query parameter.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ErrorEnvelope, FormFactor, QueryRecordRequest, QueryRecordResponse, Record,
};

/// Production endpoint for URL- and origin-level CrUX records.
pub const DEFAULT_ENDPOINT: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";

/// Async client for the CrUX API.
///
/// One `query_record` call is exactly one POST; the client never retries.
#[derive(Clone)]
pub struct CruxClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
}

impl CruxClient {
    /// Build a client from an endpoint, API key, and transport config.
    pub fn new(
        endpoint: Url,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url, api_key: SecretString) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        url
    }

    /// Fetch the CrUX record for a page URL.
    ///
    /// Fails with [`Error::MalformedResponse`] if the reply has no `record`
    /// or no `record.metrics`.
    pub async fn query_record(&self, page_url: &str, form_factor: FormFactor) -> Result<Record, Error> {
        let body = QueryRecordRequest {
            url: page_url,
            form_factor: form_factor.request_value(),
        };
        debug!(endpoint = %self.endpoint, url = page_url, ?form_factor, "POST queryRecord");

        let resp = self.http.post(self.request_url()).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "CrUX API error details");
            return Err(api_error(status.as_u16(), &body));
        }

        let text = resp.text().await?;
        trace!(len = text.len(), "queryRecord response received");

        let parsed: QueryRecordResponse = serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.clone(),
            }
        })?;

        let raw = parsed.record.ok_or_else(|| Error::MalformedResponse {
            message: "response has no `record`".into(),
        })?;
        let metrics = raw.metrics.ok_or_else(|| Error::MalformedResponse {
            message: "record has no `metrics`".into(),
        })?;

        Ok(Record {
            key: raw.key,
            metrics,
            collection_period: raw.collection_period,
        })
    }
}

impl std::fmt::Debug for CruxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CruxClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

/// Build an [`Error::Api`] from a non-2xx body, using the Google error
/// envelope when present.
fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Api {
            status,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {status}")),
            code: envelope.error.status,
        },
        Err(_) => Error::Api {
            status,
            message: if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body.chars().take(200).collect()
            },
            code: None,
        },
    }
}
