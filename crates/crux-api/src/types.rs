// CrUX API wire types
//
// Request and response shapes for `records:queryRecord`. Response fields use
// `Option` liberally: the API omits metrics it has no data for, and the
// `collectionPeriod` block is absent on some older records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Request ──────────────────────────────────────────────────────────

/// Device class the CrUX record is aggregated over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormFactor {
    #[default]
    Phone,
    Desktop,
    Tablet,
    /// Aggregate over every device class. Sent by omitting `formFactor`.
    AllFormFactors,
}

impl FormFactor {
    /// The value for the request's `formFactor` field, if any.
    pub fn request_value(self) -> Option<Self> {
        match self {
            Self::AllFormFactors => None,
            other => Some(other),
        }
    }
}

/// Body of a `records:queryRecord` POST.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRecordRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,
}

// ── Response ─────────────────────────────────────────────────────────

/// Top-level reply. `record` is required for a usable answer; its absence
/// is reported as a malformed response by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRecordResponse {
    #[serde(default)]
    pub record: Option<RawRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub key: RecordKey,
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, MetricEntry>>,
    #[serde(default)]
    pub collection_period: Option<CollectionPeriod>,
}

/// A validated CrUX record: the `metrics` object is known to be present.
#[derive(Debug, Clone)]
pub struct Record {
    pub key: RecordKey,
    /// Metric identifier (e.g. `largest_contentful_paint`) → entry.
    pub metrics: BTreeMap<String, MetricEntry>,
    pub collection_period: Option<CollectionPeriod>,
}

impl Record {
    /// The numerically coerced p75 of the metric with the given identifier.
    pub fn p75(&self, identifier: &str) -> Option<f64> {
        self.metrics.get(identifier).and_then(MetricEntry::p75)
    }
}

/// What the record was keyed by. URL-level queries carry `url`,
/// origin-level queries carry `origin`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub form_factor: Option<String>,
}

/// One metric's distribution summary. Only the percentiles are modelled;
/// the histogram is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricEntry {
    #[serde(default)]
    pub percentiles: Option<Percentiles>,
}

impl MetricEntry {
    /// p75 coerced to `f64`. CrUX reports CLS as a decimal string
    /// (`"0.05"`) and the timing metrics as integers.
    pub fn p75(&self) -> Option<f64> {
        let raw = self.percentiles.as_ref()?.p75.as_ref()?;
        let value = match raw {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Percentiles {
    #[serde(default)]
    pub p75: Option<serde_json::Value>,
}

/// Window of real-user data the record was aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPeriod {
    #[serde(default)]
    pub first_date: Option<WireDate>,
    #[serde(default)]
    pub last_date: Option<WireDate>,
}

/// Calendar date as the API spells it: `{year, month, day}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

// ── Error envelope ───────────────────────────────────────────────────

/// Google API error body: `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND"}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
