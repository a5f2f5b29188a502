//! Command handlers: bridge CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod metrics;
pub mod query;
pub mod rate;
