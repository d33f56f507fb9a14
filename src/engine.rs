//! The severity-gated record engine and the shared engine handle.
//!
//! An [`Engine`] is an immutable bundle of a severity threshold, a
//! timestamp mode, and one or more sinks. Facades never hold an engine
//! directly; they hold a [`Handle`], which they dereference at emission
//! time. Reconfiguration builds a fresh engine and swaps it into the
//! handle as a single atomic reference replacement, so concurrent
//! emitters observe either the fully-old or the fully-new engine.

use crate::field::Field;
use crate::level::Severity;
use arc_swap::ArcSwap;
use serde::Serialize;
use std::backtrace::Backtrace;
use std::io::Write;
use std::panic::Location;
use std::sync::{Arc, LazyLock, Mutex};

/// The fixed encoder layout of an emitted record.
///
/// Key order is part of the output contract: `time`, `level`, `logger`
/// (omitted for unnamed facades), `linenum`, `msg`, `stacktrace`
/// (present only on misuse diagnostics), then the contextual fields in
/// the order the normalizer produced them.
#[derive(Serialize)]
struct Record<'a> {
    time: String,
    level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    logger: Option<&'a str>,
    linenum: String,
    msg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stacktrace: Option<String>,
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

/// One output destination. The mutex serializes concurrent emitters so
/// every record reaches the writer as one intact line.
struct Sink(Mutex<Box<dyn Write + Send>>);

/// An immutable output pipeline: severity gate, timestamp mode, sinks.
pub struct Engine {
    threshold: Severity,
    local_time: bool,
    sinks: Vec<Sink>,
}

impl Engine {
    /// Creates an engine writing to the given sinks.
    ///
    /// With `local_time` set, record timestamps carry the local UTC
    /// offset; otherwise they are UTC with a `Z` suffix.
    #[must_use]
    pub fn new(threshold: Severity, local_time: bool, writers: Vec<Box<dyn Write + Send>>) -> Self {
        Self {
            threshold,
            local_time,
            sinks: writers.into_iter().map(|w| Sink(Mutex::new(w))).collect(),
        }
    }

    /// Creates a console-only engine writing UTC-timestamped records to
    /// stdout.
    #[must_use]
    pub fn console(threshold: Severity) -> Self {
        Self::new(threshold, false, vec![Box::new(std::io::stdout())])
    }

    /// Returns the severity threshold this engine was built with.
    #[must_use]
    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Emits one record through the severity gate to every sink.
    pub(crate) fn emit(
        &self,
        severity: Severity,
        logger: Option<&str>,
        msg: &str,
        fields: &[Field],
        caller: &Location<'_>,
    ) {
        self.write_record(severity, logger, msg, fields, caller, None);
    }

    /// Emits a misuse diagnostic (malformed field input) at Error
    /// severity, with a captured backtrace so the offending call site
    /// can be found.
    #[track_caller]
    pub(crate) fn diagnostic(&self, msg: &str, fields: &[Field]) {
        let trace = Backtrace::force_capture().to_string();
        self.write_record(
            Severity::Error,
            None,
            msg,
            fields,
            Location::caller(),
            Some(trace),
        );
    }

    fn write_record(
        &self,
        severity: Severity,
        logger: Option<&str>,
        msg: &str,
        fields: &[Field],
        caller: &Location<'_>,
        stacktrace: Option<String>,
    ) {
        if !severity.enabled(self.threshold) {
            return;
        }

        let mut map = serde_json::Map::with_capacity(fields.len());
        for field in fields {
            // Later duplicates overwrite earlier ones; that is the
            // encoder's behavior, not the normalizer's.
            map.insert(field.key.clone(), field.value.to_json());
        }

        let record = Record {
            time: self.timestamp(),
            level: severity.as_str(),
            logger,
            linenum: format!("{}:{}", caller.file(), caller.line()),
            msg,
            stacktrace,
            fields: map,
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        // Emission has no error path: sink failures are the backend's
        // problem, never the caller's.
        for sink in &self.sinks {
            if let Ok(mut writer) = sink.0.lock() {
                let _ = writeln!(writer, "{line}");
                let _ = writer.flush();
            }
        }
    }

    fn timestamp(&self) -> String {
        if self.local_time {
            chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
                .to_string()
        } else {
            chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string()
        }
    }
}

/// A clonable, late-binding reference to a shared engine.
///
/// Every facade created from a handle dereferences it at call time, so
/// swapping in a new engine via [`Handle::install`] redirects the
/// output of facades that already exist.
#[derive(Clone)]
pub struct Handle {
    engine: Arc<ArcSwap<Engine>>,
}

impl Handle {
    /// Creates a standalone handle around the given engine.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(ArcSwap::from_pointee(engine)),
        }
    }

    /// Returns the process-wide handle.
    ///
    /// Until the first [`configure`](crate::config::configure) call its
    /// engine is console-only with a `Debug` threshold.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Atomically replaces the engine behind this handle.
    ///
    /// Emissions racing the swap use whichever engine was loaded at
    /// their call time.
    pub fn install(&self, engine: Engine) {
        self.engine.store(Arc::new(engine));
    }

    /// Loads the engine currently behind this handle.
    #[must_use]
    pub fn load(&self) -> Arc<Engine> {
        self.engine.load_full()
    }
}

static GLOBAL: LazyLock<Handle> = LazyLock::new(|| Handle::new(Engine::console(Severity::Debug)));
