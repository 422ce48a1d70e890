//! Performance counters ([`stats`]) and engagement quality ([`metrics`]).
//! Both persist their state on every update and feed the optimizer.

pub mod metrics;
pub mod stats;

pub use metrics::EngagementMetrics;
pub use stats::{PerformanceStats, StatsSummary};
