// crux-core: Domain model, classification, and result derivation over CrUX data.

pub mod classify;
pub mod collector;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use collector::UrlList;
pub use config::{SourceConfig, TlsVerification};
pub use error::CoreError;
pub use source::MetricSource;

pub use crux_api::FormFactor;

// Re-export model and pipeline types at the crate root for ergonomics.
pub use model::{CollectionPeriod, CruxResult, MetricName, MetricSet, MetricUnit, Rating};
pub use pipeline::{
    AggregateStats, Comparison, DerivedView, FilterSpec, MetricFilter, MetricStats, PageSpec,
    SortDirection, SortKey, SortSpec, ViewState, derive,
};
