//! Configuration for the logging facade.
//!
//! The facade takes an explicit [`FacadeConfig`] at construction instead of
//! mutating hidden process state; independent facades with different
//! configurations can coexist in one process. [`FacadeConfig::from_env`]
//! keeps the conventional environment toggles available for binaries that
//! want them.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while configuring the facade
#[derive(Error, Debug)]
pub enum FacadeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Metrics(#[from] anyhow::Error),
}

/// Callback invoked after a fatal record has been written and flushed.
///
/// The default hook exits the process with status 1. Embedding applications
/// (and tests) may install their own to run a shutdown sequence instead.
pub type FatalHook = Arc<dyn Fn() + Send + Sync>;

/// Configuration for the logging facade
#[derive(Clone, Default)]
pub struct FacadeConfig {
    /// Include Debug-severity records in output and in the counters
    pub verbose: bool,

    /// Emit machine-readable JSON instead of human-readable logfmt
    pub structured_output: bool,

    /// Secondary append-only sink; every emitted record is mirrored here
    pub disk_path: Option<PathBuf>,

    /// `(namespace, subsystem)` prefix for the counter metric names
    pub namespace: Option<(String, String)>,

    /// Replacement for the default exit-the-process fatal behavior
    pub fatal_hook: Option<FatalHook>,
}

impl FacadeConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the conventional environment toggles, once.
    ///
    /// Any non-empty `VERBOSE` enables Debug output and counting; any
    /// non-empty `PRODUCTION` selects JSON encoding. The variables are not
    /// re-read after construction.
    pub fn from_env() -> Self {
        let set = |name: &str| std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
        FacadeConfig {
            verbose: set("VERBOSE"),
            structured_output: set("PRODUCTION"),
            ..Self::default()
        }
    }

    /// Enable or disable Debug-severity output and counting
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Select JSON (true) or logfmt (false) encoding
    pub fn with_structured_output(mut self, structured: bool) -> Self {
        self.structured_output = structured;
        self
    }

    /// Mirror every record to an append-only file at `path`
    pub fn with_disk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.disk_path = Some(path.into());
        self
    }

    /// Prefix counter metric names with `namespace_subsystem_`
    pub fn with_namespace(mut self, namespace: impl Into<String>, subsystem: impl Into<String>) -> Self {
        self.namespace = Some((namespace.into(), subsystem.into()));
        self
    }

    /// Install a termination hook invoked after fatal records are flushed
    pub fn with_fatal_hook(mut self, hook: FatalHook) -> Self {
        self.fatal_hook = Some(hook);
        self
    }
}

impl std::fmt::Debug for FacadeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacadeConfig")
            .field("verbose", &self.verbose)
            .field("structured_output", &self.structured_output)
            .field("disk_path", &self.disk_path)
            .field("namespace", &self.namespace)
            .field("fatal_hook", &self.fatal_hook.as_ref().map(|_| "custom"))
            .finish()
    }
}
