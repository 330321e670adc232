//! Pipeline diagnostics

mod metrics;

pub use metrics::ThroughputStats;
