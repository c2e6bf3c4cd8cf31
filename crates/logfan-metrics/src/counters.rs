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
//! Counter registry for records emitted through the logging facade

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::types::Severity;

/// Per-severity log counters backed by a dedicated Prometheus registry.
///
/// Thread-safe and cheap to clone; clones share the same underlying counters.
/// Replacing the namespace means building a fresh `SeverityCounters` — counts
/// do not carry over.
#[derive(Clone)]
pub struct SeverityCounters {
    inner: Arc<SeverityCountersInner>,
}

struct SeverityCountersInner {
    /// Prometheus registry scraped by the embedding application
    registry: Registry,

    /// Records emitted, labeled by severity
    logs_total: IntCounterVec,

    /// Sink write failures swallowed by the facade
    write_failures: IntCounter,
}

impl SeverityCounters {
    /// Create counters with unprefixed metric names.
    pub fn new() -> anyhow::Result<Self> {
        Self::build(Opts::new(
            "logger_logs_total",
            "Number of logs emitted with a severity label",
        ))
    }

    /// Create counters whose metric names carry a `namespace_subsystem_` prefix.
    pub fn with_namespace(namespace: &str, subsystem: &str) -> anyhow::Result<Self> {
        Self::build(
            Opts::new(
                "logger_logs_total",
                "Number of logs emitted with a severity label",
            )
            .namespace(namespace)
            .subsystem(subsystem),
        )
    }

    fn build(opts: Opts) -> anyhow::Result<Self> {
        let registry = Registry::new();

        let failure_opts = Opts::new(
            "logger_write_failures_total",
            "Number of sink writes that failed and were dropped",
        )
        .namespace(opts.namespace.clone())
        .subsystem(opts.subsystem.clone());

        let logs_total = IntCounterVec::new(opts, &["severity"])?;
        registry.register(Box::new(logs_total.clone()))?;

        let write_failures = IntCounter::with_opts(failure_opts)?;
        registry.register(Box::new(write_failures.clone()))?;

        Ok(Self {
            inner: Arc::new(SeverityCountersInner {
                registry,
                logs_total,
                write_failures,
            }),
        })
    }

    /// Record one emitted log at the given severity
    pub fn record(&self, severity: Severity) {
        self.inner
            .logs_total
            .with_label_values(&[severity.as_label()])
            .inc();
    }

    /// Current count for a severity
    pub fn count(&self, severity: Severity) -> u64 {
        self.inner
            .logs_total
            .with_label_values(&[severity.as_label()])
            .get()
    }

    /// Record one swallowed sink write failure
    pub fn record_write_failure(&self) {
        self.inner.write_failures.inc();
    }

    /// Current count of swallowed write failures
    pub fn write_failures(&self) -> u64 {
        self.inner.write_failures.get()
    }

    /// Registry handle for external scraping
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Snapshot of all counters in Prometheus text exposition format
    pub fn gather_text(&self) -> anyhow::Result<String> {
        let metric_families = self.inner.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
