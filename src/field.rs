//! Typed key-value fields and the context-argument normalizer.
//!
//! Context arguments arrive as an ordered list of [`Arg`] values:
//! either an already-typed [`Field`], or a raw value participating in
//! an alternating key/value sequence. [`normalize`] turns that list
//! into the field sequence that reaches the encoder, surfacing
//! malformed input (a trailing bare key, a non-string key) as misuse
//! diagnostics instead of failing the calling code path.

use crate::engine::Engine;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// The closed set of value shapes a field can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A string value.
    Str(String),
    /// A signed integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A duration, encoded as fractional seconds.
    Duration(Duration),
    /// An arbitrary nested structure.
    Object(Value),
    /// An error, encoded as its display string.
    Error(String),
}

impl FieldValue {
    /// Encodes this value per its variant's encoding rule.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Bool(b) => Value::Bool(*b),
            Self::Duration(d) => Value::from(d.as_secs_f64()),
            Self::Object(v) => v.clone(),
            Self::Error(e) => Value::String(e.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        // Values past i64::MAX lose integer precision rather than wrap.
        i64::try_from(v).map_or_else(|_| Self::Float(v as f64), Self::Int)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Duration> for FieldValue {
    fn from(v: Duration) -> Self {
        Self::Duration(v)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::Object(v)
    }
}

/// A key paired with a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The field key.
    pub key: String,
    /// The field value.
    pub value: FieldValue,
}

impl Field {
    /// Creates a field from a key and anything convertible to a value.
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a field carrying an error's display string.
    pub fn error(key: impl Into<String>, err: &dyn std::error::Error) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Error(err.to_string()),
        }
    }

    /// Creates a field carrying a serializable value as a nested
    /// structure. Values that fail to serialize encode as null.
    pub fn object<T: Serialize>(key: impl Into<String>, value: &T) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Object(serde_json::to_value(value).unwrap_or(Value::Null)),
        }
    }
}

/// One element of a context-argument list.
#[derive(Debug, Clone)]
pub enum Arg {
    /// An already-typed field; passes through the normalizer unchanged.
    Field(Field),
    /// A raw value, interpreted positionally as a key or a value.
    Raw(FieldValue),
}

impl From<Field> for Arg {
    fn from(f: Field) -> Self {
        Self::Field(f)
    }
}

impl From<FieldValue> for Arg {
    fn from(v: FieldValue) -> Self {
        Self::Raw(v)
    }
}

macro_rules! impl_raw_arg {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Self::Raw(FieldValue::from(v))
                }
            }
        )*
    };
}

impl_raw_arg!(&str, String, i64, i32, u32, u64, f64, f32, bool, Duration, Value);

/// Builds a `Vec<Arg>` context list from alternating keys and values
/// and/or pre-built [`Field`]s.
///
/// ```
/// use skald::{ctx, Field, Logger};
///
/// let log = Logger::new(ctx!["svc", "auth"]);
/// log.info("login", ctx!["user", "ada", Field::new("attempt", 2)]);
/// ```
#[macro_export]
macro_rules! ctx {
    () => {
        ::std::vec::Vec::<$crate::field::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::field::Arg::from($arg)),+]
    };
}

/// A key/value pair rejected because its key is not a string.
struct InvalidPair {
    position: usize,
    key: FieldValue,
    value: FieldValue,
}

impl InvalidPair {
    fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::with_capacity(3);
        obj.insert("position".to_string(), Value::from(self.position));
        obj.insert("key".to_string(), self.key.to_json());
        obj.insert("value".to_string(), self.value.to_json());
        Value::Object(obj)
    }
}

/// Converts an argument in value position into a field value. A typed
/// field used as a value encodes as a one-entry nested object.
fn value_of(arg: Arg) -> FieldValue {
    match arg {
        Arg::Raw(v) => v,
        Arg::Field(f) => {
            let mut obj = serde_json::Map::with_capacity(1);
            obj.insert(f.key, f.value.to_json());
            FieldValue::Object(Value::Object(obj))
        }
    }
}

/// Scans an argument list left to right into the field sequence that
/// reaches the encoder.
///
/// Typed fields pass through in order. Raw values pair up as key/value;
/// a non-string key drops the pair into an invalid-pairs list reported
/// as one batched diagnostic after the scan, and a trailing bare key is
/// dropped with its own diagnostic, ending the scan. Valid fields keep
/// scan order and duplicates are not deduplicated here.
pub(crate) fn normalize(args: Vec<Arg>, engine: &Engine) -> Vec<Field> {
    if args.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::with_capacity(args.len());
    let mut invalid: Vec<InvalidPair> = Vec::new();
    let mut position = 0_usize;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg {
            Arg::Field(f) => {
                fields.push(f);
                position += 1;
            }
            Arg::Raw(key) => {
                let Some(next) = iter.next() else {
                    engine.diagnostic(
                        "Ignored key without a value",
                        &[Field::new("ignored", key)],
                    );
                    break;
                };
                let value = value_of(next);
                match key {
                    FieldValue::Str(k) => fields.push(Field::new(k, value)),
                    other => invalid.push(InvalidPair {
                        position,
                        key: other,
                        value,
                    }),
                }
                position += 2;
            }
        }
    }

    if !invalid.is_empty() {
        let pairs = Value::Array(invalid.iter().map(InvalidPair::to_json).collect());
        engine.diagnostic(
            "Ignored key-value pairs with non-string keys",
            &[Field::new("invalid", FieldValue::Object(pairs))],
        );
    }
    fields
}
