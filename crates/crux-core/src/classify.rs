//! Metric classification and display helpers.
//!
//! Pure, total functions: every input produces an output, and odd input
//! (unknown metric name, absent value) maps to a sentinel (`Rating::Unknown`,
//! `"-"`) instead of an error. The string-keyed `*_named` variants accept
//! arbitrary metric names for callers that hold untyped input.

use std::borrow::Cow;

use crate::model::{MetricName, MetricUnit, Rating};

/// Upper bounds of the "good" and "needs improvement" bands (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl MetricName {
    /// Core Web Vitals thresholds for this metric.
    pub fn thresholds(self) -> Thresholds {
        let (good, needs_improvement) = match self {
            Self::Lcp => (2500.0, 4000.0),
            Self::Fid => (100.0, 300.0),
            Self::Cls => (0.1, 0.25),
            Self::Fcp => (1800.0, 3000.0),
            Self::Ttfb => (800.0, 1800.0),
            Self::Inp => (200.0, 500.0),
        };
        Thresholds {
            good,
            needs_improvement,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Lcp => "Largest Contentful Paint - measures loading performance",
            Self::Fid => "First Input Delay - measures interactivity",
            Self::Cls => "Cumulative Layout Shift - measures visual stability",
            Self::Fcp => "First Contentful Paint - measures when the first content is painted",
            Self::Ttfb => {
                "Time to First Byte - measures time until the first byte of the page is received"
            }
            Self::Inp => "Interaction to Next Paint - measures responsiveness",
        }
    }
}

/// Classify a value against the metric's thresholds.
pub fn rate(metric: MetricName, value: Option<f64>) -> Rating {
    let Some(value) = value else {
        return Rating::Unknown;
    };
    let t = metric.thresholds();
    if value <= t.good {
        Rating::Good
    } else if value <= t.needs_improvement {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

pub fn describe(metric: MetricName) -> &'static str {
    metric.description()
}

/// Display string for a value: `cls` to three decimals, timings as whole
/// milliseconds, `"-"` when absent.
pub fn format(metric: MetricName, value: Option<f64>) -> String {
    let Some(value) = value else {
        return "-".into();
    };
    match metric.unit() {
        MetricUnit::Score => format!("{value:.3}"),
        MetricUnit::Milliseconds => format!("{} ms", value.round()),
    }
}

/// [`rate`] for an untyped metric name. Unrecognized names rate `Unknown`.
pub fn rate_named(metric: &str, value: Option<f64>) -> Rating {
    metric
        .parse::<MetricName>()
        .map_or(Rating::Unknown, |m| rate(m, value))
}

/// Description for an untyped metric name; unrecognized names come back
/// unchanged.
pub fn describe_named(metric: &str) -> Cow<'_, str> {
    metric
        .parse::<MetricName>()
        .map_or(Cow::Borrowed(metric), |m| Cow::Borrowed(m.description()))
}

/// [`format`] for an untyped metric name. Unrecognized names fall back to
/// the value's default string form.
pub fn format_named(metric: &str, value: Option<f64>) -> String {
    match (metric.parse::<MetricName>(), value) {
        (_, None) => "-".into(),
        (Ok(m), v) => format(m, v),
        (Err(_), Some(v)) => v.to_string(),
    }
}
