//! Record encoding.
//!
//! One encoded line per record, in either of two formats fixed at facade
//! construction: logfmt (`key=value`, human-readable) or JSON (one object per
//! line, machine-readable). Both carry the same fields in the same order:
//! timestamp, severity, call site, message, then the caller's key/value pairs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::callsite::CallSite;
use logfan_metrics::Severity;

/// A single log event, assembled by the facade and handed to a sink.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    /// Event time, UTC with nanosecond precision
    pub timestamp: DateTime<Utc>,
    /// Severity of the event
    pub severity: Severity,
    /// Attributed source location
    pub callsite: CallSite,
    /// Free-form message
    pub message: &'a str,
    /// Ordered key/value pairs supplied by the caller
    pub fields: &'a [(&'static str, Value)],
}

impl<'a> Record<'a> {
    /// Build a record stamped with the current time.
    pub fn new(
        severity: Severity,
        callsite: CallSite,
        message: &'a str,
        fields: &'a [(&'static str, Value)],
    ) -> Self {
        Record {
            timestamp: Utc::now(),
            severity,
            callsite,
            message,
            fields,
        }
    }

    fn timestamp_str(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Output format for encoded records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    /// Human-readable `key=value` lines
    Logfmt,

    /// Machine-readable JSON, one object per line
    Json,
}

impl Encoder {
    /// Encode a record as a single line, without a trailing newline.
    pub fn encode(&self, record: &Record<'_>) -> String {
        match self {
            Encoder::Logfmt => encode_logfmt(record),
            Encoder::Json => encode_json(record),
        }
    }
}

fn encode_logfmt(record: &Record<'_>) -> String {
    let mut out = String::with_capacity(96);
    out.push_str("ts=");
    out.push_str(&record.timestamp_str());
    out.push_str(" level=");
    out.push_str(record.severity.as_str());
    out.push_str(" caller=");
    push_logfmt_value(&mut out, &record.callsite.to_string());
    out.push_str(" msg=");
    push_logfmt_value(&mut out, record.message);
    for (key, value) in record.fields {
        out.push(' ');
        out.push_str(key);
        out.push('=');
        push_logfmt_value(&mut out, &plain_value(value));
    }
    out
}

/// Render a JSON value the way logfmt shows it: strings bare, everything
/// else in its compact JSON form.
fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_logfmt_value(out: &mut String, raw: &str) {
    let needs_quotes = raw.is_empty()
        || raw
            .chars()
            .any(|c| c == ' ' || c == '"' || c == '=' || c.is_control());
    if !needs_quotes {
        out.push_str(raw);
        return;
    }
    out.push('"');
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}

fn encode_json(record: &Record<'_>) -> String {
    let mut out = String::with_capacity(128);
    out.push('{');
    push_json_pair(&mut out, "ts", &Value::String(record.timestamp_str()));
    out.push(',');
    push_json_pair(
        &mut out,
        "level",
        &Value::String(record.severity.as_str().to_owned()),
    );
    out.push(',');
    push_json_pair(&mut out, "caller", &Value::String(record.callsite.to_string()));
    out.push(',');
    push_json_pair(&mut out, "msg", &Value::String(record.message.to_owned()));
    for (key, value) in record.fields {
        out.push(',');
        push_json_pair(&mut out, key, value);
    }
    out.push('}');
    out
}

// Pairs are written by hand so field order survives; serde_json maps would
// reorder keys.
fn push_json_pair(out: &mut String, key: &str, value: &Value) {
    out.push_str(&Value::String(key.to_owned()).to_string());
    out.push(':');
    out.push_str(&value.to_string());
}
