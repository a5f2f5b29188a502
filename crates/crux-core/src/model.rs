// ── Domain model ──
//
// Canonical types for fetched CrUX results. Consumers (pipeline, CLI) never
// see the API's wire shapes; `convert` builds these from `crux_api::Record`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

// ── MetricName ──────────────────────────────────────────────────────

/// One of the six Core Web Vitals-style measures CrUX reports.
///
/// Declaration order is the canonical column order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MetricName {
    Lcp,
    Fid,
    Cls,
    Fcp,
    Ttfb,
    Inp,
}

/// How a metric's value is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    #[strum(serialize = "ms")]
    Milliseconds,
    /// Unitless score (CLS).
    #[strum(serialize = "score")]
    Score,
}

impl MetricName {
    pub const ALL: [Self; 6] = [
        Self::Lcp,
        Self::Fid,
        Self::Cls,
        Self::Fcp,
        Self::Ttfb,
        Self::Inp,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Key of this metric inside `record.metrics` of a CrUX reply.
    pub fn crux_identifier(self) -> &'static str {
        match self {
            Self::Lcp => "largest_contentful_paint",
            Self::Fid => "first_input_delay",
            Self::Cls => "cumulative_layout_shift",
            Self::Fcp => "first_contentful_paint",
            Self::Ttfb => "experimental_time_to_first_byte",
            Self::Inp => "interaction_to_next_paint",
        }
    }

    pub fn unit(self) -> MetricUnit {
        match self {
            Self::Cls => MetricUnit::Score,
            _ => MetricUnit::Milliseconds,
        }
    }
}

// ── Rating ──────────────────────────────────────────────────────────

/// Qualitative classification of a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
    Unknown,
}

// ── MetricSet ───────────────────────────────────────────────────────

/// The p75 values a result actually reported. Metrics CrUX had no data for
/// are absent, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeMap<MetricName, f64>);

impl MetricSet {
    pub fn get(&self, metric: MetricName) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn contains(&self, metric: MetricName) -> bool {
        self.0.contains_key(&metric)
    }

    /// Metric names present, in canonical order.
    pub fn names(&self) -> impl Iterator<Item = MetricName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MetricName, f64)> for MetricSet {
    fn from_iter<I: IntoIterator<Item = (MetricName, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(MetricName, f64); N]> for MetricSet {
    fn from(pairs: [(MetricName, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// ── CruxResult ──────────────────────────────────────────────────────

/// Window of real-user data a record was aggregated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPeriod {
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// One fetched record: the URL as entered plus its metrics.
///
/// `origin` and `collection_period` are informational and play no part in
/// filtering, sorting, or aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CruxResult {
    pub url: String,
    pub metrics: MetricSet,
    pub origin: Option<String>,
    pub collection_period: Option<CollectionPeriod>,
}

impl CruxResult {
    pub fn new(url: impl Into<String>, metrics: MetricSet) -> Self {
        Self {
            url: url.into(),
            metrics,
            origin: None,
            collection_period: None,
        }
    }

    pub fn metric(&self, metric: MetricName) -> Option<f64> {
        self.metrics.get(metric)
    }
}
