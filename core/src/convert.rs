//! Converter registry: maps a value-type identifier to a conversion function.
//!
//! Built-in converters cover [`ValueType`]'s fixed variants. Callers extend
//! the registry with [`ValueType::Custom`] identifiers before parsing starts;
//! once a [`Parser`](crate::Parser) holds the registry it is only read.
//!
//! # Examples
//!
//! ```
//! use argmatch_core::{ConversionError, ConverterRegistry, TypedValue, ValueType};
//!
//! let mut registry = ConverterRegistry::new();
//! registry
//!     .register("port", |raw: &str| match raw.parse::<u16>() {
//!         Ok(port) if port > 0 => Ok(TypedValue::Int(i64::from(port))),
//!         _ => Err(ConversionError::new("expected a port between 1 and 65535")),
//!     })
//!     .unwrap();
//!
//! let port = ValueType::Custom("port".into());
//! assert_eq!(registry.convert(&port, "8080"), Ok(TypedValue::Int(8080)));
//! assert!(registry.convert(&port, "0").is_err());
//!
//! // Built-in identifiers cannot be replaced.
//! assert!(registry.register("integer", |_: &str| Ok(TypedValue::Int(0))).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::{ConversionError, TypedValue, ValueType};

/// A conversion function from raw text to a typed value.
pub type Converter = Arc<dyn Fn(&str) -> Result<TypedValue, ConversionError> + Send + Sync>;

pub(crate) const BUILTIN_IDS: &[&str] = &[
    "boolean", "integer", "float", "string", "path", "choice", "counter",
];

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The identifier is built in or was already registered.
    #[error("duplicate converter: {0}")]
    DuplicateConverter(String),
    /// Empty identifiers cannot be looked up from a schema.
    #[error("converter identifier cannot be empty")]
    EmptyIdentifier,
}

/// Registry of value converters keyed by type identifier.
///
/// Cloning is cheap (converters are shared), so each parser can hold its
/// own snapshot.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    custom: HashMap<String, Converter>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.custom.keys().collect();
        ids.sort();
        f.debug_struct("ConverterRegistry")
            .field("custom", &ids)
            .finish()
    }
}

impl ConverterRegistry {
    /// Creates a registry holding only the built-in converters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a converter for a new type identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateConverter`] if `id` names a
    /// built-in type or an already registered converter.
    pub fn register<F>(&mut self, id: impl Into<String>, converter: F) -> Result<(), RegistryError>
    where
        F: Fn(&str) -> Result<TypedValue, ConversionError> + Send + Sync + 'static,
    {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }
        if BUILTIN_IDS.contains(&id.as_str()) || self.custom.contains_key(&id) {
            return Err(RegistryError::DuplicateConverter(id));
        }
        self.custom.insert(id, Arc::new(converter));
        Ok(())
    }

    /// Returns `true` if a converter exists for `value_type`.
    pub fn supports(&self, value_type: &ValueType) -> bool {
        match value_type {
            ValueType::Custom(id) => self.custom.contains_key(id),
            _ => true,
        }
    }

    /// Returns `true` if `id` is built in or registered.
    pub fn contains(&self, id: &str) -> bool {
        BUILTIN_IDS.contains(&id) || self.custom.contains_key(id)
    }

    /// Converts `raw` according to `value_type`.
    ///
    /// Counters convert like integers (an explicit count such as
    /// `--verbose=2`).
    pub fn convert(&self, value_type: &ValueType, raw: &str) -> Result<TypedValue, ConversionError> {
        match value_type {
            ValueType::Boolean => convert_bool(raw),
            ValueType::Integer | ValueType::Counter => convert_int(raw),
            ValueType::Float => convert_float(raw),
            ValueType::String => Ok(TypedValue::Str(raw.to_string())),
            ValueType::Path => Ok(TypedValue::Path(PathBuf::from(raw))),
            ValueType::Choice(allowed) => convert_choice(allowed, raw),
            ValueType::Custom(id) => match self.custom.get(id) {
                Some(converter) => converter(raw),
                None => Err(ConversionError::new(format!("no converter registered for `{id}`"))),
            },
        }
    }
}

fn convert_bool(raw: &str) -> Result<TypedValue, ConversionError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(TypedValue::Bool(true)),
        "false" | "0" => Ok(TypedValue::Bool(false)),
        _ => Err(ConversionError::new("expected one of true, false, 1, 0")),
    }
}

fn convert_int(raw: &str) -> Result<TypedValue, ConversionError> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::new("expected a base-10 integer"));
    }
    raw.parse::<i64>()
        .map(TypedValue::Int)
        .map_err(|_| ConversionError::new("integer out of range"))
}

fn convert_float(raw: &str) -> Result<TypedValue, ConversionError> {
    if raw.is_empty() || raw.trim() != raw {
        return Err(ConversionError::new("expected a number"));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(TypedValue::Float(v)),
        Ok(_) => Err(ConversionError::new("expected a finite number")),
        Err(_) => Err(ConversionError::new("expected a number")),
    }
}

fn convert_choice(allowed: &[String], raw: &str) -> Result<TypedValue, ConversionError> {
    if allowed.iter().any(|choice| choice == raw) {
        Ok(TypedValue::Str(raw.to_string()))
    } else {
        Err(ConversionError::new(format!(
            "expected one of: {}",
            allowed.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_accepts_signs() {
        let registry = ConverterRegistry::new();
        assert_eq!(
            registry.convert(&ValueType::Integer, "-42"),
            Ok(TypedValue::Int(-42))
        );
        assert_eq!(
            registry.convert(&ValueType::Integer, "+7"),
            Ok(TypedValue::Int(7))
        );
    }

    #[test]
    fn test_integer_rejects_garbage_and_overflow() {
        let registry = ConverterRegistry::new();
        assert!(registry.convert(&ValueType::Integer, "xyz").is_err());
        assert!(registry.convert(&ValueType::Integer, "1.5").is_err());
        assert!(registry.convert(&ValueType::Integer, "-").is_err());
        let err = registry
            .convert(&ValueType::Integer, "99999999999999999999")
            .unwrap_err();
        assert_eq!(err.reason, "integer out of range");
    }

    #[test]
    fn test_boolean_is_case_insensitive() {
        let registry = ConverterRegistry::new();
        assert_eq!(
            registry.convert(&ValueType::Boolean, "TRUE"),
            Ok(TypedValue::Bool(true))
        );
        assert_eq!(
            registry.convert(&ValueType::Boolean, "0"),
            Ok(TypedValue::Bool(false))
        );
        assert!(registry.convert(&ValueType::Boolean, "yes").is_err());
    }

    #[test]
    fn test_float_rejects_non_numeric() {
        let registry = ConverterRegistry::new();
        assert_eq!(
            registry.convert(&ValueType::Float, "2.5"),
            Ok(TypedValue::Float(2.5))
        );
        assert!(registry.convert(&ValueType::Float, "abc").is_err());
        assert!(registry.convert(&ValueType::Float, "").is_err());
    }

    #[test]
    fn test_float_rejects_non_finite_and_padded_input() {
        let registry = ConverterRegistry::new();
        for raw in ["nan", "NaN", "inf", "-infinity", "1e999"] {
            let err = registry.convert(&ValueType::Float, raw).unwrap_err();
            assert_eq!(err.reason, "expected a finite number", "{raw}");
        }
        assert!(registry.convert(&ValueType::Float, " 2.5 ").is_err());
        assert!(registry.convert(&ValueType::Float, "2.5\n").is_err());
        assert_eq!(
            registry.convert(&ValueType::Float, "1e3"),
            Ok(TypedValue::Float(1000.0))
        );
        assert_eq!(
            registry.convert(&ValueType::Float, "-.5"),
            Ok(TypedValue::Float(-0.5))
        );
    }

    #[test]
    fn test_string_and_path_always_succeed() {
        let registry = ConverterRegistry::new();
        assert_eq!(
            registry.convert(&ValueType::String, ""),
            Ok(TypedValue::Str(String::new()))
        );
        assert_eq!(
            registry.convert(&ValueType::Path, "/does/not/exist"),
            Ok(TypedValue::Path(PathBuf::from("/does/not/exist")))
        );
    }

    #[test]
    fn test_choice_error_names_allowed_set() {
        let registry = ConverterRegistry::new();
        let vt = ValueType::Choice(vec!["json".into(), "yaml".into()]);
        assert_eq!(
            registry.convert(&vt, "yaml"),
            Ok(TypedValue::Str("yaml".into()))
        );
        let err = registry.convert(&vt, "toml").unwrap_err();
        assert!(err.reason.contains("json"));
        assert!(err.reason.contains("yaml"));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ConverterRegistry::new();
        registry
            .register("upper", |raw: &str| Ok(TypedValue::Str(raw.to_uppercase())))
            .unwrap();
        assert_eq!(
            registry.register("upper", |raw: &str| Ok(TypedValue::Str(raw.to_string()))),
            Err(RegistryError::DuplicateConverter("upper".into()))
        );
        assert_eq!(
            registry.register("path", |raw: &str| Ok(TypedValue::Str(raw.to_string()))),
            Err(RegistryError::DuplicateConverter("path".into()))
        );
        assert_eq!(
            registry.convert(&ValueType::Custom("upper".into()), "abc"),
            Ok(TypedValue::Str("ABC".into()))
        );
    }

    #[test]
    fn test_unknown_custom_type_fails_conversion() {
        let registry = ConverterRegistry::new();
        assert!(!registry.supports(&ValueType::Custom("semver".into())));
        assert!(
            registry
                .convert(&ValueType::Custom("semver".into()), "1.0.0")
                .is_err()
        );
    }
}
