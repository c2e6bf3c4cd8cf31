//! Common types for severity-labeled metrics

use serde::{Deserialize, Serialize};

/// Log severity levels, ordered from least to most severe.
///
/// The ordering is used by sinks as a minimum threshold; the labels are used
/// as the single dimension of the log counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Diagnostic records, emitted and counted only in verbose mode
    Debug,
    /// Routine operational records
    Info,
    /// Failures the process survives
    Error,
    /// Failures the process does not survive
    Fatal,
}

impl Severity {
    /// All severities in ascending order
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Get string label for Prometheus
    pub fn as_label(&self) -> &'static str {
        match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        }
    }

    /// Lowercase name used in encoded log records
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    /// Parse a severity name, case-insensitively, for configuration values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => anyhow::bail!(
                "Unknown severity: {}. Expected one of: debug, info, error, fatal",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Error.as_label(), "Error");
        assert_eq!(Severity::Error.as_str(), "error");
        assert_eq!(Severity::Fatal.to_string(), "fatal");
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("info".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("error".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("fatal".parse::<Severity>().unwrap(), Severity::Fatal);
        assert!("warning".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_parsing_case_insensitive() {
        assert_eq!("DEBUG".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("Fatal".parse::<Severity>().unwrap(), Severity::Fatal);
    }

    #[test]
    fn test_all_is_ascending() {
        let mut sorted = Severity::ALL;
        sorted.sort();
        assert_eq!(sorted, Severity::ALL);
    }
}
