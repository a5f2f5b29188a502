// crux-api: Async Rust client for the Chrome UX Report API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{CruxClient, DEFAULT_ENDPOINT};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{CollectionPeriod, FormFactor, Record, RecordKey, WireDate};
