//! # Skald
//!
//! Structured-logging facade with contextual fields, child loggers, and
//! rotating file sinks.
//!
//! This crate provides:
//! - Five-level emission surface (`debug`/`info`/`warn`/`error`/`crit`)
//! - Typed key-value context fields with a lenient normalizer
//! - Child facades that inherit and append sticky fields
//! - JSON records with fixed encoder keys (`time`, `level`, `logger`,
//!   `linenum`, `msg`, `stacktrace`)
//! - A console sink plus an optional size/age/backup-bounded rotating
//!   file sink with optional compression
//! - Atomic, late-binding reconfiguration of the shared engine
//!
//! ## Example
//!
//! ```no_run
//! use skald::{configure, ctx, LogSettings, Logger};
//!
//! configure(Some(LogSettings {
//!     log_file: "logs/app.log".to_string(),
//!     log_level: "info".to_string(),
//!     max_file_size: 64,
//!     max_backups: 5,
//!     compress: true,
//!     ..LogSettings::default()
//! }))
//! .expect("failed to configure logging");
//!
//! let log = Logger::new(ctx!["svc", "gateway"]);
//! log.info("listening", ctx!["port", 8080]);
//!
//! let req = log.child(ctx!["req_id", "abc"]);
//! req.warn("slow upstream", ctx!["elapsed_ms", 412]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Sink configuration and engine assembly
pub mod config;

/// The record engine and the shared engine handle
pub mod engine;

/// Typed fields and the context-argument normalizer
pub mod field;

/// Severity levels and level-string parsing
pub mod level;

/// The logger facade
pub mod logger;

pub use config::{configure, configure_with, set_console_level, LogSettings, LoggingError, DEFAULT_LOG_FILE};
pub use engine::{Engine, Handle};
pub use field::{Arg, Field, FieldValue};
pub use level::{parse_severity, ParseSeverityError, Severity};
pub use logger::{crit, debug, error, info, warn, Logger};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{configure, LogSettings};
    pub use crate::ctx;
    pub use crate::field::{Arg, Field, FieldValue};
    pub use crate::level::Severity;
    pub use crate::logger::Logger;
}
