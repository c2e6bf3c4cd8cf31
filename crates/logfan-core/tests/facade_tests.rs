//! Integration tests for the logging facade
//!
//! Each facade instance owns its sinks and counters, so tests run fully
//! isolated: output goes to shared in-memory writers, fatal behavior goes
//! through an injected hook, and disk sinks live in temp directories.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};

use logfan_core::{CallSite, FacadeConfig, LogFacade, Severity};

/// Writer handing every byte to a shared buffer the test can read back.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that refuses every byte.
struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_facade(config: FacadeConfig) -> (LogFacade, SharedBuf) {
    let buf = SharedBuf::default();
    let log = LogFacade::with_writer(config, Box::new(buf.clone())).unwrap();
    (log, buf)
}

/// The `caller=` value of a logfmt line.
fn caller_of(line: &str) -> &str {
    line.split(' ')
        .find_map(|tok| tok.strip_prefix("caller="))
        .unwrap()
}

#[test]
fn test_info_and_error_always_count() {
    let (log, _buf) = capture_facade(FacadeConfig::new());

    for _ in 0..4 {
        log.info("i", &[]);
    }
    for _ in 0..3 {
        log.error("e", &[]);
    }

    assert_eq!(log.severity_count(Severity::Info), 4);
    assert_eq!(log.severity_count(Severity::Error), 3);
    assert_eq!(log.severity_count(Severity::Debug), 0);
    assert_eq!(log.severity_count(Severity::Fatal), 0);
}

#[test]
fn test_debug_is_noop_without_verbose() {
    let (log, buf) = capture_facade(FacadeConfig::new());

    log.debug("hidden", &[("k", json!("v"))]);
    log.debug("hidden again", &[]);

    assert_eq!(log.severity_count(Severity::Debug), 0);
    assert!(buf.contents().is_empty());
}

#[test]
fn test_debug_counts_and_emits_when_verbose() {
    let (log, buf) = capture_facade(FacadeConfig::new().with_verbose(true));

    log.debug("visible", &[]);
    log.debug("visible", &[]);

    assert_eq!(log.severity_count(Severity::Debug), 2);
    assert_eq!(buf.lines().len(), 2);
}

#[track_caller]
fn error_for_caller(log: &LogFacade) {
    // Attribution shifts one frame up, to whoever called this helper.
    log.error_at(CallSite::here(), "wrapped", &[]);
}

fn error_inside_helper(log: &LogFacade) {
    log.error("direct", &[]);
}

#[test]
fn test_error_at_attributes_one_frame_up() {
    let (log, buf) = capture_facade(FacadeConfig::new());

    let expected = CallSite::here();
    error_for_caller(&log); // reported site: this line
    error_inside_helper(&log); // reported site: inside the helper

    let lines = buf.lines();
    let wrapped = caller_of(&lines[0]);
    let direct = caller_of(&lines[1]);

    assert_eq!(
        wrapped,
        format!("{}:{}", expected.file(), expected.line() + 1)
    );
    // Same file (the helper lives here too), different frame.
    assert!(direct.starts_with(expected.file()));
    assert_ne!(wrapped, direct);
}

#[test]
fn test_plain_error_attributes_to_immediate_caller() {
    let (log, buf) = capture_facade(FacadeConfig::new());

    let expected = CallSite::here();
    log.error("direct from test", &[]);

    let lines = buf.lines();
    assert_eq!(
        caller_of(&lines[0]),
        format!("{}:{}", expected.file(), expected.line() + 1)
    );
}

#[test]
fn test_disk_sink_mirrors_every_record_after_enablement() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mirror.log");
    let (log, buf) = capture_facade(FacadeConfig::new());

    log.info("before disk", &[]);
    log.set_log_to_disk(&path).unwrap();
    log.info("after disk", &[("n", json!(1))]);
    log.error("also after", &[("why", json!("test"))]);
    log.sync().unwrap();

    let disk = std::fs::read_to_string(&path).unwrap();
    let disk_lines: Vec<&str> = disk.lines().collect();
    let primary_lines = buf.lines();

    assert_eq!(primary_lines.len(), 3);
    assert_eq!(disk_lines.len(), 2);
    // A record is encoded once and fanned out, so mirrored lines are
    // byte-identical to the primary's.
    assert_eq!(disk_lines[0], primary_lines[1]);
    assert_eq!(disk_lines[1], primary_lines[2]);
    assert!(!disk.contains("before disk"));
}

#[test]
fn test_set_log_to_disk_replaces_previous_sink() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");
    let (log, _buf) = capture_facade(FacadeConfig::new());

    log.set_log_to_disk(&first).unwrap();
    log.info("into first", &[]);

    // Re-invocation swaps the single disk sink; the old file stops growing.
    log.set_log_to_disk(&second).unwrap();
    log.info("into second", &[]);
    log.sync().unwrap();

    let first_out = std::fs::read_to_string(&first).unwrap();
    let second_out = std::fs::read_to_string(&second).unwrap();
    assert!(first_out.contains("into first"));
    assert!(!first_out.contains("into second"));
    assert_eq!(first_out.lines().count(), 1);
    assert!(second_out.contains("into second"));
    assert!(!second_out.contains("into first"));
    assert_eq!(second_out.lines().count(), 1);
}

#[test]
fn test_set_log_to_disk_failure_reports_and_returns_err() {
    let (log, buf) = capture_facade(FacadeConfig::new());

    let bogus = std::path::Path::new("/nonexistent-dir-for-logfan/x.log");
    let result = log.set_log_to_disk(bogus);

    assert!(result.is_err());
    let out = buf.contents();
    assert!(out.contains("failed to open log file"));
    assert!(out.contains("nonexistent-dir-for-logfan"));
    assert_eq!(log.severity_count(Severity::Error), 1);
}

#[test]
fn test_set_namespace_resets_counts() {
    let (log, _buf) = capture_facade(FacadeConfig::new());

    log.info("one", &[]);
    log.info("two", &[]);
    log.info("three", &[]);
    assert_eq!(log.severity_count(Severity::Info), 3);

    log.set_namespace("svc", "ingest").unwrap();
    assert_eq!(log.severity_count(Severity::Info), 0);

    log.info("counted anew", &[]);
    assert_eq!(log.severity_count(Severity::Info), 1);
    let text = log.gather().unwrap();
    assert!(text.contains("svc_ingest_logger_logs_total"));
}

#[test]
fn test_concurrent_info_calls_lose_no_updates() {
    const THREADS: usize = 8;
    const CALLS: usize = 250;

    let (log, _buf) = capture_facade(FacadeConfig::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let log = log.clone();
            thread::spawn(move || {
                for _ in 0..CALLS {
                    log.info("concurrent", &[]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(log.severity_count(Severity::Info), (THREADS * CALLS) as u64);
}

#[test]
fn test_concurrent_records_never_interleave_bytes() {
    const THREADS: usize = 4;
    const CALLS: usize = 100;

    let (log, buf) = capture_facade(FacadeConfig::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let log = log.clone();
            thread::spawn(move || {
                for _ in 0..CALLS {
                    log.info("interleave check", &[("writer", json!(i))]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = buf.lines();
    assert_eq!(lines.len(), THREADS * CALLS);
    for line in &lines {
        assert!(line.starts_with("ts="), "torn record: {line}");
        assert!(line.contains("msg=\"interleave check\""), "torn record: {line}");
    }
}

#[test]
fn test_end_to_end_error_record() {
    let (log, buf) = capture_facade(FacadeConfig::new().with_structured_output(true));

    log.error("disk failed", &[("path", json!("/tmp/x"))]);

    let lines = buf.lines();
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["level"], "error");
    assert_eq!(record["msg"], "disk failed");
    assert_eq!(record["path"], "/tmp/x");
    assert!(record["ts"].as_str().unwrap().ends_with('Z'));

    assert_eq!(log.severity_count(Severity::Error), 1);
    assert_eq!(log.severity_count(Severity::Debug), 0);
}

#[test]
fn test_fatal_counts_writes_and_invokes_hook() {
    let hook_calls = Arc::new(AtomicUsize::new(0));
    let hook_calls_seen = Arc::clone(&hook_calls);

    let buf = SharedBuf::default();
    let config = FacadeConfig::new().with_fatal_hook(Arc::new(move || {
        hook_calls_seen.fetch_add(1, Ordering::SeqCst);
    }));
    let log = LogFacade::with_writer(config, Box::new(buf.clone())).unwrap();

    log.fatal("unrecoverable", &[("reason", json!("test"))]);

    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(log.severity_count(Severity::Fatal), 1);
    let out = buf.contents();
    assert!(out.contains("msg=unrecoverable"));
    assert!(out.contains("level=fatal"));
}

#[test]
fn test_fatal_mirrors_to_disk_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fatal.log");

    let buf = SharedBuf::default();
    let config = FacadeConfig::new().with_fatal_hook(Arc::new(|| {}));
    let log = LogFacade::with_writer(config, Box::new(buf.clone())).unwrap();
    log.set_log_to_disk(&path).unwrap();

    log.fatal("going down", &[]);

    let disk = std::fs::read_to_string(&path).unwrap();
    assert!(disk.contains("msg=\"going down\""));
    assert!(buf.contents().contains("msg=\"going down\""));
}

#[test]
fn test_write_failures_are_counted_not_surfaced() {
    let log = LogFacade::with_writer(FacadeConfig::new(), Box::new(BrokenWriter)).unwrap();

    log.info("lost", &[]);
    log.error("also lost", &[]);

    // Severity counters still advance; failures land in their own counter.
    assert_eq!(log.severity_count(Severity::Info), 1);
    assert_eq!(log.severity_count(Severity::Error), 1);
    assert_eq!(log.counters().write_failures(), 2);
}

#[test]
fn test_disk_sink_honors_verbosity_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiet.log");
    let (log, _buf) = capture_facade(FacadeConfig::new());
    log.set_log_to_disk(&path).unwrap();

    log.debug("suppressed", &[]);
    log.info("kept", &[]);
    log.sync().unwrap();

    let disk = std::fs::read_to_string(&path).unwrap();
    assert!(!disk.contains("suppressed"));
    assert!(disk.contains("kept"));
}
