//! The logger facade: sticky fields, child derivation, emission.

use crate::engine::Handle;
use crate::field::{normalize, Arg, Field};
use crate::level::Severity;
use std::panic::Location;

/// A lightweight logging facade carrying sticky contextual fields.
///
/// A facade holds a [`Handle`] to the shared engine and an owned
/// sequence of sticky fields included in every record it emits. The
/// handle is dereferenced at call time, so reconfiguring the engine
/// redirects facades that already exist.
///
/// Derivation copies: [`Logger::child`] concatenates the parent's
/// sticky fields with its own, and the parent is never mutated.
///
/// ```no_run
/// use skald::{ctx, Logger};
///
/// let base = Logger::new(ctx!["svc", "auth"]);
/// let req = base.child(ctx!["req_id", "abc"]);
/// req.info("login accepted", ctx!["user", "ada"]);
/// ```
#[derive(Clone)]
pub struct Logger {
    handle: Handle,
    name: Option<String>,
    sticky: Vec<Field>,
}

impl Logger {
    /// Roots a facade at the process-wide engine handle.
    #[must_use]
    pub fn new(args: Vec<Arg>) -> Self {
        Self::with_handle(Handle::global(), args)
    }

    /// Roots a facade at an explicit handle. Useful for tests and for
    /// components that own their output pipeline.
    #[must_use]
    pub fn with_handle(handle: Handle, args: Vec<Arg>) -> Self {
        let sticky = normalize(args, &handle.load());
        Self {
            handle,
            name: None,
            sticky,
        }
    }

    /// Derives a child whose sticky fields are this facade's followed
    /// by the normalized `args`. The parent is unaffected.
    #[must_use]
    pub fn child(&self, args: Vec<Arg>) -> Self {
        let appended = normalize(args, &self.handle.load());
        let mut sticky = Vec::with_capacity(self.sticky.len() + appended.len());
        sticky.extend(self.sticky.iter().cloned());
        sticky.extend(appended);
        Self {
            handle: self.handle.clone(),
            name: self.name.clone(),
            sticky,
        }
    }

    /// Returns a copy of this facade with the given name, rendered
    /// under the `logger` key of every record. Children inherit it.
    #[must_use]
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            handle: self.handle.clone(),
            name: Some(name.into()),
            sticky: self.sticky.clone(),
        }
    }

    /// Emits at Debug severity.
    #[track_caller]
    pub fn debug(&self, msg: &str, args: Vec<Arg>) {
        self.log(Severity::Debug, msg, args);
    }

    /// Emits at Info severity.
    #[track_caller]
    pub fn info(&self, msg: &str, args: Vec<Arg>) {
        self.log(Severity::Info, msg, args);
    }

    /// Emits at Warn severity.
    #[track_caller]
    pub fn warn(&self, msg: &str, args: Vec<Arg>) {
        self.log(Severity::Warn, msg, args);
    }

    /// Emits at Error severity.
    #[track_caller]
    pub fn error(&self, msg: &str, args: Vec<Arg>) {
        self.log(Severity::Error, msg, args);
    }

    /// Emits at Error severity. The severity enum distinguishes
    /// Critical from Error but the emission path does not; records from
    /// `crit` and `error` are indistinguishable in their `level` key.
    #[track_caller]
    pub fn crit(&self, msg: &str, args: Vec<Arg>) {
        self.log(Severity::Error, msg, args);
    }

    #[track_caller]
    fn log(&self, severity: Severity, msg: &str, args: Vec<Arg>) {
        let engine = self.handle.load();
        let call_fields = normalize(args, &engine);
        let mut fields = Vec::with_capacity(self.sticky.len() + call_fields.len());
        fields.extend(self.sticky.iter().cloned());
        fields.extend(call_fields);
        engine.emit(severity, self.name.as_deref(), msg, &fields, Location::caller());
    }
}

/// Emits at Debug severity through the process-wide handle, with no
/// sticky fields.
#[track_caller]
pub fn debug(msg: &str, args: Vec<Arg>) {
    emit_root(Severity::Debug, msg, args);
}

/// Emits at Info severity through the process-wide handle.
#[track_caller]
pub fn info(msg: &str, args: Vec<Arg>) {
    emit_root(Severity::Info, msg, args);
}

/// Emits at Warn severity through the process-wide handle.
#[track_caller]
pub fn warn(msg: &str, args: Vec<Arg>) {
    emit_root(Severity::Warn, msg, args);
}

/// Emits at Error severity through the process-wide handle.
#[track_caller]
pub fn error(msg: &str, args: Vec<Arg>) {
    emit_root(Severity::Error, msg, args);
}

/// Emits at Error severity through the process-wide handle; see
/// [`Logger::crit`] for the Critical/Error collapse.
#[track_caller]
pub fn crit(msg: &str, args: Vec<Arg>) {
    emit_root(Severity::Error, msg, args);
}

#[track_caller]
fn emit_root(severity: Severity, msg: &str, args: Vec<Arg>) {
    let engine = Handle::global().load();
    let fields = normalize(args, &engine);
    engine.emit(severity, None, msg, &fields, Location::caller());
}
