//! Call-site capture for log attribution.
//!
//! Records report the file and line of the code that logically asked for the
//! log, not of the facade internals. Capture rides on `#[track_caller]`:
//! every facade logging method is annotated, so the reported location is the
//! immediate caller. Helpers that log on behalf of *their* caller annotate
//! themselves and pass [`CallSite::here`] down explicitly, which shifts the
//! attribution one frame up — and composes to any wrapping depth.

use std::fmt;
use std::panic::Location;

/// A captured source location shown in log records as `file:line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    location: &'static Location<'static>,
}

impl CallSite {
    /// Capture the caller's location.
    ///
    /// Inside a `#[track_caller]` function this resolves to that function's
    /// caller, which is what makes wrapper attribution work:
    ///
    /// ```ignore
    /// #[track_caller]
    /// fn warn_and_bail(log: &LogFacade, msg: &str) {
    ///     // Reported call site: whoever called warn_and_bail.
    ///     log.error_at(CallSite::here(), msg, &[]);
    /// }
    /// ```
    #[track_caller]
    pub fn here() -> Self {
        Self {
            location: Location::caller(),
        }
    }

    /// Source file of the call
    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    /// Line within the file
    pub fn line(&self) -> u32 {
        self.location.line()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.location.file(), self.location.line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn capture_for_caller() -> CallSite {
        CallSite::here()
    }

    #[test]
    fn test_here_reports_this_file() {
        let site = CallSite::here();
        assert!(site.file().ends_with("callsite.rs"));
        assert!(site.line() > 0);
    }

    #[test]
    fn test_track_caller_wrapper_reports_call_line() {
        let before = CallSite::here();
        let site = capture_for_caller();
        // The wrapper is transparent: attribution lands on the line above,
        // not inside capture_for_caller.
        assert_eq!(site.file(), before.file());
        assert_eq!(site.line(), before.line() + 1);
    }

    #[test]
    fn test_display_format() {
        let site = CallSite::here();
        assert_eq!(format!("{site}"), format!("{}:{}", site.file(), site.line()));
    }
}
