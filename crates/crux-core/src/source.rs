// ── Metric source ──
//
// Where CrUX results come from: the live API when a credential is
// configured, otherwise randomly generated sample data. Batch fetches run
// one request per URL concurrently and fail as a whole.

use std::ops::Range;

use chrono::NaiveDate;
use crux_api::{CruxClient, FormFactor, TlsMode, TransportConfig};
use futures_util::future::try_join_all;
use rand::Rng;
use tracing::{debug, info};

use crate::config::{SourceConfig, TlsVerification};
use crate::convert::record_to_result;
use crate::error::CoreError;
use crate::model::{CollectionPeriod, CruxResult, MetricName, MetricSet};

pub const SYNTHETIC_ORIGIN: &str = "https://example.com";

/// Provider of CrUX results.
#[derive(Debug, Clone)]
pub enum MetricSource {
    Live {
        client: CruxClient,
        form_factor: FormFactor,
    },
    /// No credential configured. Never performs I/O and never fails.
    Synthetic,
}

impl MetricSource {
    /// Pick live or synthetic from the config. Only building the HTTP
    /// client can fail.
    pub fn new(config: &SourceConfig) -> Result<Self, CoreError> {
        let Some(key) = config.credential() else {
            info!("no CrUX API key configured; using synthetic data");
            return Ok(Self::Synthetic);
        };

        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: config.timeout,
        };
        let client = CruxClient::new(config.endpoint.clone(), key.clone(), &transport)?;
        Ok(Self::Live {
            client,
            form_factor: config.form_factor,
        })
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    /// Fetch one URL's metrics. One network round-trip when live.
    pub async fn fetch_metrics(&self, url: &str) -> Result<CruxResult, CoreError> {
        match self {
            Self::Live {
                client,
                form_factor,
            } => {
                let record = client.query_record(url, *form_factor).await?;
                Ok(record_to_result(url, &record))
            }
            Self::Synthetic => Ok(synthetic_result(url, &mut rand::thread_rng())),
        }
    }

    /// Fetch every URL concurrently.
    ///
    /// All-or-nothing: the first failure drops the remaining in-flight
    /// requests and is returned. On success results are in input order.
    pub async fn fetch_batch(&self, urls: &[String]) -> Result<Vec<CruxResult>, CoreError> {
        debug!(count = urls.len(), live = self.is_live(), "fetching batch");
        let results = try_join_all(urls.iter().map(|u| self.fetch_metrics(u))).await?;
        info!(
            count = results.len(),
            metrics = results.iter().map(|r| r.metrics.len()).sum::<usize>(),
            "batch fetched"
        );
        Ok(results)
    }
}

// ── Synthetic data ──────────────────────────────────────────────────

/// Sampling range for each metric's synthetic value.
pub fn synthetic_range(metric: MetricName) -> Range<f64> {
    match metric {
        MetricName::Lcp => 1000.0..5000.0,
        MetricName::Fid => 0.0..300.0,
        MetricName::Cls => 0.0..0.25,
        MetricName::Fcp => 500.0..2500.0,
        MetricName::Ttfb => 200.0..1000.0,
        MetricName::Inp => 50.0..550.0,
    }
}

/// A full metric set drawn uniformly from [`synthetic_range`].
pub fn synthetic_metrics<R: Rng>(rng: &mut R) -> MetricSet {
    MetricName::ALL
        .into_iter()
        .map(|m| (m, rng.gen_range(synthetic_range(m))))
        .collect()
}

pub fn synthetic_result<R: Rng>(url: &str, rng: &mut R) -> CruxResult {
    CruxResult {
        url: url.to_owned(),
        metrics: synthetic_metrics(rng),
        origin: Some(SYNTHETIC_ORIGIN.to_owned()),
        collection_period: Some(CollectionPeriod {
            first_date: NaiveDate::from_ymd_opt(2023, 6, 1),
            last_date: NaiveDate::from_ymd_opt(2023, 6, 28),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn synthetic_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let set = synthetic_metrics(&mut rng);
            assert_eq!(set.len(), 6);
            for (metric, value) in set.iter() {
                assert!(synthetic_range(metric).contains(&value), "{metric}={value}");
            }
        }
    }

    #[test]
    fn synthetic_is_reproducible_with_seed() {
        let a = synthetic_metrics(&mut StdRng::seed_from_u64(42));
        let b = synthetic_metrics(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_result_carries_fixed_metadata() {
        let result = synthetic_result("https://a.com", &mut StdRng::seed_from_u64(1));
        assert_eq!(result.url, "https://a.com");
        assert_eq!(result.origin.as_deref(), Some(SYNTHETIC_ORIGIN));
        let period = result.collection_period.unwrap();
        assert_eq!(period.first_date, NaiveDate::from_ymd_opt(2023, 6, 1));
        assert_eq!(period.last_date, NaiveDate::from_ymd_opt(2023, 6, 28));
    }

    #[test]
    fn missing_key_selects_synthetic() {
        let source = MetricSource::new(&SourceConfig::default()).unwrap();
        assert!(!source.is_live());
        let blank = MetricSource::new(&SourceConfig::default().with_api_key(" ")).unwrap();
        assert!(!blank.is_live());
    }

    #[test]
    fn key_selects_live() {
        let source = MetricSource::new(&SourceConfig::default().with_api_key("k")).unwrap();
        assert!(source.is_live());
    }
}
