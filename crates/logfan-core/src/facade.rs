// Copyright (C) 2026  Logfan Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! The logging facade.
//!
//! One entry point per severity. Every call encodes a single record, fans it
//! out to the primary sink plus the optional disk sink, and advances the
//! matching severity counter. Logging calls return nothing: steady-state
//! write failures are counted, never surfaced. Only configuration calls
//! return `Result`.
//!
//! The facade is an explicit value, not process-global state. Clone it freely;
//! clones share sinks and counters. Configuration calls are synchronized
//! against concurrent logging, so late `set_log_to_disk` / `set_namespace`
//! calls are safe, if rarely advisable.

use std::io::Write;
use std::path::Path;
use std::process;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use crate::callsite::CallSite;
use crate::config::{FacadeConfig, FacadeError, FatalHook};
use crate::encoder::{Encoder, Record};
use crate::sink::Sink;
use logfan_metrics::{Severity, SeverityCounters};

/// Structured logging facade with dual-sink fan-out and severity counters.
#[derive(Clone)]
pub struct LogFacade {
    inner: Arc<FacadeInner>,
}

struct FacadeInner {
    /// Primary sink, bound for the facade's lifetime
    primary: Sink,

    /// At most one disk sink; installed by `set_log_to_disk`
    disk: RwLock<Option<Sink>>,

    /// Current counter registry; replaced wholesale by `set_namespace`
    counters: RwLock<SeverityCounters>,

    verbose: bool,
    encoder: Encoder,
    threshold: Severity,
    fatal_hook: FatalHook,
}

impl LogFacade {
    /// Build a facade with the primary sink on standard output.
    ///
    /// Fails if the counter registry cannot be built or the configured disk
    /// file cannot be opened.
    pub fn new(config: FacadeConfig) -> Result<Self, FacadeError> {
        Self::build(config, None)
    }

    /// Build a facade whose primary sink is a caller-supplied writer.
    ///
    /// For embedders that redirect log output, and for tests that read it
    /// back.
    pub fn with_writer(
        config: FacadeConfig,
        writer: Box<dyn Write + Send>,
    ) -> Result<Self, FacadeError> {
        Self::build(config, Some(writer))
    }

    fn build(
        config: FacadeConfig,
        writer: Option<Box<dyn Write + Send>>,
    ) -> Result<Self, FacadeError> {
        let encoder = if config.structured_output {
            Encoder::Json
        } else {
            Encoder::Logfmt
        };
        let threshold = if config.verbose {
            Severity::Debug
        } else {
            Severity::Info
        };

        let counters = match &config.namespace {
            Some((namespace, subsystem)) => SeverityCounters::with_namespace(namespace, subsystem)?,
            None => SeverityCounters::new()?,
        };

        let primary = match writer {
            Some(writer) => Sink::writer(writer, encoder, threshold),
            None => Sink::stdout(encoder, threshold),
        };

        let disk = match &config.disk_path {
            Some(path) => Some(Sink::file(path, encoder, threshold)?),
            None => None,
        };

        let fatal_hook: FatalHook = config
            .fatal_hook
            .unwrap_or_else(|| Arc::new(|| process::exit(1)));

        Ok(LogFacade {
            inner: Arc::new(FacadeInner {
                primary,
                disk: RwLock::new(disk),
                counters: RwLock::new(counters),
                verbose: config.verbose,
                encoder,
                threshold,
                fatal_hook,
            }),
        })
    }

    /// Log at Debug severity, attributed to the immediate caller.
    ///
    /// A complete no-op unless the facade is verbose: neither output nor the
    /// Debug counter moves. Info and above always count.
    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[(&'static str, Value)]) {
        if !self.inner.verbose {
            return;
        }
        self.emit(Severity::Debug, CallSite::here(), message, fields);
    }

    /// Log at Info severity, attributed to the immediate caller.
    #[track_caller]
    pub fn info(&self, message: &str, fields: &[(&'static str, Value)]) {
        self.emit(Severity::Info, CallSite::here(), message, fields);
    }

    /// Log at Error severity, attributed to the immediate caller.
    #[track_caller]
    pub fn error(&self, message: &str, fields: &[(&'static str, Value)]) {
        self.emit(Severity::Error, CallSite::here(), message, fields);
    }

    /// Log at Error severity, attributed to an explicit call site.
    ///
    /// For helpers that log on behalf of their caller: annotate the helper
    /// `#[track_caller]` and pass [`CallSite::here`], and the record points
    /// at the helper's caller instead of the helper.
    pub fn error_at(&self, site: CallSite, message: &str, fields: &[(&'static str, Value)]) {
        self.emit(Severity::Error, site, message, fields);
    }

    /// Log at Fatal severity, flush all sinks, and invoke the fatal hook.
    ///
    /// The Fatal counter is incremented before the record is written, so the
    /// count is visible to a scraper even if the hook never returns. The
    /// default hook exits the process with status 1; it can be replaced via
    /// [`FacadeConfig::with_fatal_hook`], in which case this returns after
    /// the hook does.
    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[(&'static str, Value)]) {
        self.emit(Severity::Fatal, CallSite::here(), message, fields);
        let _ = self.sync();
        (self.inner.fatal_hook)();
    }

    /// Flush buffered output on the primary and disk sinks.
    ///
    /// Call before process exit so no buffered records are lost.
    pub fn sync(&self) -> Result<(), FacadeError> {
        self.inner.primary.flush()?;
        if let Some(disk) = read_lock(&self.inner.disk).as_ref() {
            disk.flush()?;
        }
        Ok(())
    }

    /// Replace the counter registry with one prefixed `namespace_subsystem_`.
    ///
    /// The old registry is dropped, so all counts restart from zero: call
    /// this before steady-state logging or accept the loss.
    pub fn set_namespace(&self, namespace: &str, subsystem: &str) -> Result<(), FacadeError> {
        let replacement = SeverityCounters::with_namespace(namespace, subsystem)?;
        *write_lock(&self.inner.counters) = replacement;
        Ok(())
    }

    /// Mirror every subsequent record to an append-only file at `path`.
    ///
    /// The file is created if absent. On open failure the error is reported
    /// through the primary sink and returned; the existing disk sink (if
    /// any) is left in place. On success any previous disk sink is replaced.
    #[track_caller]
    pub fn set_log_to_disk(&self, path: &Path) -> Result<(), FacadeError> {
        let site = CallSite::here();
        match Sink::file(path, self.inner.encoder, self.inner.threshold) {
            Ok(sink) => {
                *write_lock(&self.inner.disk) = Some(sink);
                Ok(())
            }
            Err(err) => {
                self.error_at(
                    site,
                    "failed to open log file",
                    &[
                        ("path", Value::String(path.display().to_string())),
                        ("error", Value::String(err.to_string())),
                    ],
                );
                Err(err.into())
            }
        }
    }

    /// Shared handle to the current counter registry, for scraping
    pub fn counters(&self) -> SeverityCounters {
        read_lock(&self.inner.counters).clone()
    }

    /// Current count for a severity
    pub fn severity_count(&self, severity: Severity) -> u64 {
        read_lock(&self.inner.counters).count(severity)
    }

    /// Counter snapshot in Prometheus text exposition format
    pub fn gather(&self) -> Result<String, FacadeError> {
        Ok(read_lock(&self.inner.counters).gather_text()?)
    }

    // Count first, then fan out. A Fatal record whose terminating write never
    // returns must still have been counted.
    fn emit(
        &self,
        severity: Severity,
        site: CallSite,
        message: &str,
        fields: &[(&'static str, Value)],
    ) {
        let counters = read_lock(&self.inner.counters).clone();
        counters.record(severity);

        let record = Record::new(severity, site, message, fields);
        if self.inner.primary.write_record(&record).is_err() {
            counters.record_write_failure();
        }
        if let Some(disk) = read_lock(&self.inner.disk).as_ref() {
            if disk.write_record(&record).is_err() {
                counters.record_write_failure();
            }
        }
    }
}

impl std::fmt::Debug for LogFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFacade")
            .field("verbose", &self.inner.verbose)
            .field("encoder", &self.inner.encoder)
            .field("threshold", &self.inner.threshold)
            .finish()
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
