//! Log severity levels and level-string parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered log severity.
///
/// `Critical` is the least verbose level and `Debug` the most. A record
/// passes an engine whose threshold is `t` when its severity is at
/// least as severe as `t`, i.e. `severity <= t` under this ordering.
///
/// Note that the emission path uses only four of the five levels:
/// `crit` emission and the `"crit"` level string both collapse to
/// `Error`. This asymmetry is observable in log output and is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Unrecoverable conditions. Never produced by the parser.
    Critical,
    /// Errors requiring attention; also carries `crit` emissions.
    Error,
    /// Non-critical issues worth surfacing.
    Warn,
    /// Routine operational messages.
    Info,
    /// Developer-facing detail.
    Debug,
}

impl Severity {
    /// Returns the uppercase name used in the `level` key of emitted
    /// records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Returns true if a record at this severity passes the given
    /// threshold.
    #[must_use]
    pub fn enabled(self, threshold: Self) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced when a level string matches no known alias.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {text}")]
pub struct ParseSeverityError {
    /// The unrecognized level string.
    pub text: String,
}

/// Parses a level string into a severity.
///
/// Aliases are case-sensitive: `"debug"`/`"dbug"`, `"info"`, `"warn"`,
/// and `"error"`/`"eror"`/`"crit"`. Both `"error"` and `"crit"` map to
/// [`Severity::Error`].
///
/// Unknown strings yield the permissive default `Severity::Debug`
/// *together with* an error, so callers may either accept the verbose
/// fallback or inspect the error and substitute a stricter level.
/// [`configure`](crate::config::configure) does the latter, forcing
/// `Severity::Error` on any parse failure.
#[must_use]
pub fn parse_severity(text: &str) -> (Severity, Option<ParseSeverityError>) {
    match text {
        "debug" | "dbug" => (Severity::Debug, None),
        "info" => (Severity::Info, None),
        "warn" => (Severity::Warn, None),
        "error" | "eror" | "crit" => (Severity::Error, None),
        other => (
            Severity::Debug,
            Some(ParseSeverityError {
                text: other.to_string(),
            }),
        ),
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_severity(s) {
            (severity, None) => Ok(severity),
            (_, Some(err)) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_aliases() {
        assert_eq!(parse_severity("debug"), (Severity::Debug, None));
        assert_eq!(parse_severity("dbug"), (Severity::Debug, None));
        assert_eq!(parse_severity("info"), (Severity::Info, None));
        assert_eq!(parse_severity("warn"), (Severity::Warn, None));
        assert_eq!(parse_severity("error"), (Severity::Error, None));
        assert_eq!(parse_severity("eror"), (Severity::Error, None));
    }

    #[test]
    fn test_crit_collapses_to_error() {
        let (crit, err) = parse_severity("crit");
        assert_eq!(crit, Severity::Error);
        assert!(err.is_none());
        assert_eq!(parse_severity("crit").0, parse_severity("error").0);
    }

    #[test]
    fn test_unknown_returns_debug_and_error() {
        for text in ["", "trace", "ERROR", "Warn", "verbose"] {
            let (severity, err) = parse_severity(text);
            assert_eq!(severity, Severity::Debug, "fallback for {text:?}");
            assert!(err.is_some(), "error expected for {text:?}");
        }
        assert_eq!(
            parse_severity("trace").1.unwrap().to_string(),
            "unknown log level: trace"
        );
    }

    #[test]
    fn test_from_str_is_strict() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warn));
        assert!("nope".parse::<Severity>().is_err());
        assert_eq!(
            "nope".parse::<Severity>().unwrap_or(Severity::Error),
            Severity::Error
        );
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(Severity::Error.enabled(Severity::Error));
        assert!(Severity::Critical.enabled(Severity::Error));
        assert!(!Severity::Warn.enabled(Severity::Error));
        assert!(!Severity::Debug.enabled(Severity::Info));
        assert!(Severity::Debug.enabled(Severity::Debug));
    }

    #[test]
    fn test_uppercase_rendering() {
        assert_eq!(Severity::Error.as_str(), "ERROR");
        assert_eq!(Severity::Debug.to_string(), "DEBUG");
    }
}
