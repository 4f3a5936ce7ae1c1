//! Value types declared by argument definitions and the typed values
//! produced by conversion.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of an argument's values.
///
/// Serialized as a lowercase identifier; choice sets and custom identifiers
/// carry their payload:
///
/// ```
/// use argmatch_core::ValueType;
///
/// assert_eq!(ValueType::Integer.type_id(), "integer");
/// assert_eq!(ValueType::Custom("semver".into()).type_id(), "semver");
/// assert!(ValueType::Boolean.is_flag());
/// assert!(!ValueType::Path.is_flag());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// `true`/`false`/`1`/`0`; as an option, a presence flag.
    Boolean,
    /// Base-10 signed 64-bit integer.
    Integer,
    /// 64-bit floating point.
    Float,
    /// Any text (the default).
    #[default]
    String,
    /// Filesystem path, not checked against the filesystem.
    Path,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
    /// Occurrence counter (`-vvv` ⇒ 3).
    Counter,
    /// Identifier of a converter registered on the
    /// [`ConverterRegistry`](crate::ConverterRegistry).
    Custom(String),
}

impl ValueType {
    /// Identifier under which the converter for this type is looked up.
    pub fn type_id(&self) -> &str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Path => "path",
            ValueType::Choice(_) => "choice",
            ValueType::Counter => "counter",
            ValueType::Custom(id) => id,
        }
    }

    /// Flag types never consume a separate value token.
    pub fn is_flag(&self) -> bool {
        matches!(self, ValueType::Boolean | ValueType::Counter)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Choice(choices) => write!(f, "choice [{}]", choices.join(", ")),
            other => f.write_str(other.type_id()),
        }
    }
}

/// A converted argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Path(PathBuf),
}

impl TypedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(v) => Some(*v),
            TypedValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Str(s) => Some(s),
            TypedValue::Path(p) => p.to_str(),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            TypedValue::Path(p) => Some(p),
            TypedValue::Str(s) => Some(Path::new(s)),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(b) => write!(f, "{b}"),
            TypedValue::Int(i) => write!(f, "{i}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Str(s) => f.write_str(s),
            TypedValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Failure returned by a converter.
///
/// Carries only the reason; the matcher adds the raw text and target type
/// when it turns the failure into an `invalid-value` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ConversionError {
    pub reason: String,
}

impl ConversionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
