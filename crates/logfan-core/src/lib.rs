//! Logfan Core Module
//!
//! Structured logging facade that fans each record out to standard output and
//! an optional append-only disk file, while counting every record per severity
//! for Prometheus scraping.
//!
//! # Features
//!
//! - **Two Output Formats**: logfmt for humans, JSON for machines
//! - **Dual-Sink Fan-Out**: One call writes stdout and, when enabled, a disk file
//! - **Accurate Call Sites**: `#[track_caller]` attribution that survives wrappers
//! - **Severity Counters**: Every emitted record increments a scrapeable counter
//!
//! # Example
//!
//! ```ignore
//! use logfan_core::{FacadeConfig, LogFacade};
//!
//! fn main() -> Result<(), logfan_core::FacadeError> {
//!     let log = LogFacade::new(FacadeConfig::new().with_verbose(true))?;
//!
//!     log.info("listener ready", &[("port", 8080.into())]);
//!     log.sync()?;
//!     Ok(())
//! }
//! ```

pub mod callsite;
pub mod config;
pub mod encoder;
pub mod facade;
pub mod macros;
pub mod sink;

pub use callsite::CallSite;
pub use config::{FacadeConfig, FacadeError, FatalHook};
pub use encoder::{Encoder, Record};
pub use facade::LogFacade;
pub use sink::Sink;

/// Severity re-export so callers need only this crate
pub use logfan_metrics::{Severity, SeverityCounters};

// Re-exported for the field-list macros
#[doc(hidden)]
pub use serde_json::json;
