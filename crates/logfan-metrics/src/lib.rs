//! Logfan Metrics Module
//!
//! Prometheus-based counters tracking every record the logging facade emits,
//! labeled by severity and exposed for external scraping.
//!
//! # Features
//!
//! - **Prometheus Integration**: Standard counters with text exposition format
//! - **Per-Severity Labels**: One `logger_logs_total{severity}` series per level
//! - **Namespace Prefixing**: Optional `namespace_subsystem_` metric prefix
//! - **Pull Model**: The registry is handed to an external scraper; nothing is pushed
//!
//! # Example
//!
//! ```ignore
//! use logfan_metrics::{Severity, SeverityCounters};
//!
//! fn main() -> anyhow::Result<()> {
//!     let counters = SeverityCounters::new()?;
//!
//!     counters.record(Severity::Info);
//!     assert_eq!(counters.count(Severity::Info), 1);
//!
//!     // Hand `counters.registry()` to whatever serves /metrics.
//!     Ok(())
//! }
//! ```

pub mod counters;
pub mod types;

pub use counters::SeverityCounters;
pub use types::Severity;

// Re-export prometheus types for convenience
pub use prometheus::{Encoder, Registry, TextEncoder};
