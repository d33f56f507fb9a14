//! Sink configuration: settings, defaults, and engine assembly.
//!
//! [`configure`] is the one-shot entry point: it consumes a
//! [`LogSettings`] value from the host application's settings source,
//! builds a console sink plus (unless the file path is empty) a
//! rotating file sink, and installs the result behind the shared
//! engine handle.

use crate::engine::{Engine, Handle};
use crate::level::Severity;
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// File path used when [`configure`] is called without settings.
pub const DEFAULT_LOG_FILE: &str = "logs/skald.log";

/// Errors that can occur while assembling the output pipeline.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create the log file's parent directory.
    #[error("failed to create log directory: {0}")]
    DirectoryCreation(#[from] io::Error),
}

/// External logging settings, consumed once to build the engine.
///
/// An empty `log_file` selects console-only mode. Unset level strings
/// default to `"error"` before the engine is built, so an incomplete
/// configuration never floods the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// Log file path; empty means console-only.
    #[serde(default)]
    pub log_file: String,

    /// Severity threshold when a file sink is configured.
    #[serde(default)]
    pub log_level: String,

    /// Severity threshold in console-only mode.
    #[serde(default)]
    pub log_console_level: String,

    /// Maximum log file size in megabytes before rotation.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of rotated backup files to retain (0 = no limit).
    #[serde(default)]
    pub max_backups: usize,

    /// Maximum age of rotated backup files in days (0 = no limit).
    #[serde(default)]
    pub max_age: u64,

    /// Render record timestamps in local time instead of UTC.
    #[serde(default)]
    pub local_time: bool,

    /// Compress rotated backup files.
    #[serde(default)]
    pub compress: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            log_file: String::new(),
            log_level: String::new(),
            log_console_level: String::new(),
            max_file_size: default_max_file_size(),
            max_backups: 0,
            max_age: 0,
            local_time: false,
            compress: false,
        }
    }
}

fn default_max_file_size() -> u64 {
    100
}

/// Builds the output pipeline from the given settings and installs it
/// behind the process-wide engine handle.
///
/// `None` substitutes the built-in default (`logs/skald.log`, levels
/// defaulting to Error). An empty `log_file` skips file-sink
/// construction entirely and only applies the console threshold.
pub fn configure(settings: Option<LogSettings>) -> Result<(), LoggingError> {
    configure_with(&Handle::global(), settings)
}

/// [`configure`] against an explicit handle.
pub fn configure_with(handle: &Handle, settings: Option<LogSettings>) -> Result<(), LoggingError> {
    let mut settings = settings.unwrap_or_else(|| LogSettings {
        log_file: DEFAULT_LOG_FILE.to_string(),
        ..LogSettings::default()
    });

    if settings.log_file.is_empty() {
        set_console_level_with(handle, &settings.log_console_level);
        return Ok(());
    }

    fill_default_levels(&mut settings);
    // Parse failures fall back to the most restrictive threshold
    // rather than the parser's permissive Debug default.
    let threshold = settings.log_level.parse().unwrap_or(Severity::Error);

    if let Some(dir) = Path::new(&settings.log_file).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let sinks: Vec<Box<dyn Write + Send>> =
        vec![Box::new(io::stdout()), Box::new(rotating_sink(&settings))];
    handle.install(Engine::new(threshold, settings.local_time, sinks));
    Ok(())
}

/// Installs a console-only engine at the given threshold on the
/// process-wide handle. Unparseable or empty level strings collapse to
/// Error.
pub fn set_console_level(level: &str) {
    set_console_level_with(&Handle::global(), level);
}

fn set_console_level_with(handle: &Handle, level: &str) {
    let threshold = level.parse().unwrap_or(Severity::Error);
    handle.install(Engine::console(threshold));
}

/// Defaults unset level strings to the most restrictive severity so an
/// incomplete configuration cannot flood the output.
fn fill_default_levels(settings: &mut LogSettings) {
    if settings.log_level.is_empty() {
        settings.log_level = "error".to_string();
    }
    if settings.log_console_level.is_empty() {
        settings.log_console_level = "error".to_string();
    }
}

/// Builds the rotating file writer. Backup naming and rotation suffixes
/// follow the rotation backend's own timestamped convention.
fn rotating_sink(settings: &LogSettings) -> FileRotate<AppendTimestamp> {
    // The suffix scheme admits one pruning rule: an explicit backup
    // count wins over an age limit.
    let retention = if settings.max_backups > 0 {
        FileLimit::MaxFiles(settings.max_backups)
    } else if settings.max_age > 0 {
        let days = i64::try_from(settings.max_age).unwrap_or(i64::MAX);
        FileLimit::Age(chrono::Duration::try_days(days).unwrap_or(chrono::Duration::MAX))
    } else {
        FileLimit::Unlimited
    };

    let size = if settings.max_file_size > 0 {
        let bytes = usize::try_from(settings.max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_mul(1024 * 1024);
        ContentLimit::Bytes(bytes)
    } else {
        ContentLimit::None
    };

    let compression = if settings.compress {
        Compression::OnRotate(0)
    } else {
        Compression::None
    };

    FileRotate::new(
        &settings.log_file,
        AppendTimestamp::default(retention),
        size,
        compression,
        #[cfg(unix)]
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx;
    use crate::logger::Logger;
    use tempfile::TempDir;

    #[test]
    fn test_settings_defaults() {
        let settings: LogSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.log_file, "");
        assert_eq!(settings.log_level, "");
        assert_eq!(settings.max_file_size, 100);
        assert_eq!(settings.max_backups, 0);
        assert_eq!(settings.max_age, 0);
        assert!(!settings.local_time);
        assert!(!settings.compress);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = LogSettings {
            log_file: "logs/app.log".to_string(),
            log_level: "info".to_string(),
            log_console_level: "warn".to_string(),
            max_file_size: 64,
            max_backups: 7,
            max_age: 30,
            local_time: true,
            compress: true,
        };

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: LogSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.log_file, "logs/app.log");
        assert_eq!(parsed.max_backups, 7);
        assert!(parsed.compress);
    }

    #[test]
    fn test_empty_log_file_is_console_only() {
        let tmp = TempDir::new().unwrap();
        let handle = Handle::new(Engine::console(Severity::Debug));

        let settings = LogSettings {
            log_console_level: "warn".to_string(),
            max_file_size: 1,
            compress: true,
            ..LogSettings::default()
        };
        configure_with(&handle, Some(settings)).unwrap();

        assert_eq!(handle.load().threshold(), Severity::Warn);
        // No file sink was built, so nothing can ever land on disk.
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_console_only_unset_level_collapses_to_error() {
        let handle = Handle::new(Engine::console(Severity::Debug));
        configure_with(&handle, Some(LogSettings::default())).unwrap();
        assert_eq!(handle.load().threshold(), Severity::Error);

        let settings = LogSettings {
            log_console_level: "not-a-level".to_string(),
            ..LogSettings::default()
        };
        configure_with(&handle, Some(settings)).unwrap();
        assert_eq!(handle.load().threshold(), Severity::Error);
    }

    #[test]
    fn test_file_mode_defaults_levels_to_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("app.log");
        let handle = Handle::new(Engine::console(Severity::Debug));

        let settings = LogSettings {
            log_file: path.to_string_lossy().into_owned(),
            ..LogSettings::default()
        };
        configure_with(&handle, Some(settings)).unwrap();
        assert_eq!(handle.load().threshold(), Severity::Error);

        let log = Logger::with_handle(handle, ctx!["svc", "auth"]);
        log.info("below threshold", ctx![]);
        log.error("written", ctx!["code", 7_i64]);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("below threshold"));
        assert!(contents.contains("written"));
        assert!(contents.contains("\"svc\":\"auth\""));
        assert!(contents.contains("\"level\":\"ERROR\""));
    }

    #[test]
    fn test_file_mode_honors_configured_level() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app.log");
        let handle = Handle::new(Engine::console(Severity::Debug));

        let settings = LogSettings {
            log_file: path.to_string_lossy().into_owned(),
            log_level: "info".to_string(),
            ..LogSettings::default()
        };
        configure_with(&handle, Some(settings)).unwrap();
        assert_eq!(handle.load().threshold(), Severity::Info);

        let log = Logger::with_handle(handle, ctx![]);
        log.debug("too verbose", ctx![]);
        log.info("kept", ctx![]);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("too verbose"));
        assert!(contents.contains("kept"));
    }

    #[test]
    fn test_creates_missing_log_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a").join("b").join("app.log");
        let handle = Handle::new(Engine::console(Severity::Debug));

        let settings = LogSettings {
            log_file: path.to_string_lossy().into_owned(),
            log_level: "error".to_string(),
            ..LogSettings::default()
        };
        configure_with(&handle, Some(settings)).unwrap();

        Logger::with_handle(handle, ctx![]).error("hello", ctx![]);
        assert!(path.exists());
    }

    #[test]
    fn test_fill_default_levels() {
        let mut settings = LogSettings::default();
        fill_default_levels(&mut settings);
        assert_eq!(settings.log_level, "error");
        assert_eq!(settings.log_console_level, "error");

        let mut settings = LogSettings {
            log_level: "warn".to_string(),
            ..LogSettings::default()
        };
        fill_default_levels(&mut settings);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.log_console_level, "error");
    }
}
