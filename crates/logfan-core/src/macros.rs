//! Convenience macros for structured logging.
//!
//! The macros expand directly at the call site, so call-site attribution is
//! identical to invoking the facade methods by hand.

/// Log an info message with structured fields
///
/// # Example
///
/// ```ignore
/// log_info!(log, "processing file" => {
///     "path" => "/path/to/file",
///     "size" => 1024,
/// });
/// ```
#[macro_export]
macro_rules! log_info {
    ($facade:expr, $msg:expr) => {
        $facade.info($msg, &[])
    };
    ($facade:expr, $msg:expr => { $($key:expr => $value:expr),* $(,)? }) => {
        $facade.info($msg, &[$(($key, $crate::json!($value))),*])
    };
}

/// Log a debug message with structured fields
#[macro_export]
macro_rules! log_debug {
    ($facade:expr, $msg:expr) => {
        $facade.debug($msg, &[])
    };
    ($facade:expr, $msg:expr => { $($key:expr => $value:expr),* $(,)? }) => {
        $facade.debug($msg, &[$(($key, $crate::json!($value))),*])
    };
}

/// Log an error message with structured fields
#[macro_export]
macro_rules! log_error {
    ($facade:expr, $msg:expr) => {
        $facade.error($msg, &[])
    };
    ($facade:expr, $msg:expr => { $($key:expr => $value:expr),* $(,)? }) => {
        $facade.error($msg, &[$(($key, $crate::json!($value))),*])
    };
}

/// Log a fatal message with structured fields, then invoke the fatal hook
#[macro_export]
macro_rules! log_fatal {
    ($facade:expr, $msg:expr) => {
        $facade.fatal($msg, &[])
    };
    ($facade:expr, $msg:expr => { $($key:expr => $value:expr),* $(,)? }) => {
        $facade.fatal($msg, &[$(($key, $crate::json!($value))),*])
    };
}
