// ── API-to-domain type conversions ──
//
// Bridges raw `crux_api::Record` into canonical `CruxResult`. Only the six
// known metric identifiers are read; everything else in the record is
// ignored.

use chrono::NaiveDate;
use crux_api::{Record, WireDate};
use tracing::warn;

use crate::model::{CollectionPeriod, CruxResult, MetricName, MetricSet};

/// Normalize a record into a result stamped with the URL it was requested
/// for.
pub fn record_to_result(url: &str, record: &Record) -> CruxResult {
    let metrics: MetricSet = MetricName::ALL
        .into_iter()
        .filter_map(|metric| {
            let identifier = metric.crux_identifier();
            record.metrics.get(identifier)?;
            match record.p75(identifier) {
                Some(value) => Some((metric, value)),
                None => {
                    warn!(url, metric = identifier, "p75 missing or not numeric; skipping metric");
                    None
                }
            }
        })
        .collect();

    CruxResult {
        url: url.to_owned(),
        metrics,
        origin: record.key.origin.clone(),
        collection_period: record.collection_period.map(|p| CollectionPeriod {
            first_date: p.first_date.and_then(wire_date),
            last_date: p.last_date.and_then(wire_date),
        }),
    }
}

fn wire_date(d: WireDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(d.year, d.month, d.day)
}
