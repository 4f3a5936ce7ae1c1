//! Declarative command-line argument matching engine.
//!
//! This crate turns a raw argument vector into a validated, typed result
//! tree, following a command schema built once up front:
//!
//! - [`scan`] classifies each argument into a [`Token`] without looking at
//!   the schema.
//! - [`ConverterRegistry`] converts raw text into [`TypedValue`]s for the
//!   built-in [`ValueType`]s and caller-registered custom types.
//! - [`CommandSchema`] is the immutable, validated command tree built from
//!   [`CommandDefinition`] and [`ArgumentDefinition`] values.
//! - [`Parser`] runs the single-pass matcher and the constraint validator
//!   and returns a [`ParseResult`].
//!
//! Parse problems never abort a parse. They accumulate as [`Diagnostic`]s
//! next to whatever bindings could be built, and the caller decides what to
//! do with them. Structural schema problems, on the other hand, fail schema
//! construction with a [`SchemaError`].
//!
//! # Example
//!
//! ```
//! use argmatch_core::*;
//!
//! let schema = CommandSchema::build(
//!     CommandDefinition::new("greet")
//!         .positional(ArgumentDefinition::positional("name", ValueType::String).required())
//!         .option(ArgumentDefinition::flag("verbose").short('v'))
//!         .option(ArgumentDefinition::option("count", ValueType::Integer).default_value("1")),
//! )
//! .unwrap();
//! let parser = Parser::new(schema, ConverterRegistry::new()).unwrap();
//!
//! let result = parser.parse(["-v", "Alice"]);
//! assert!(!result.has_errors());
//! assert!(result.root().flag("verbose"));
//! assert_eq!(result.root().value("count"), Some(&TypedValue::Int(1)));
//!
//! let result = parser.parse(["--count=xyz"]);
//! let reported: Vec<_> = result
//!     .diagnostics()
//!     .iter()
//!     .map(|d| (d.kind, d.argument.as_deref()))
//!     .collect();
//! assert_eq!(
//!     reported,
//!     vec![
//!         (DiagnosticKind::InvalidValue, Some("count")),
//!         (DiagnosticKind::MissingRequired, Some("name")),
//!     ]
//! );
//! ```

mod config;
mod constraints;
mod convert;
mod diagnostic;
mod matcher;
mod parser;
mod result;
mod schema;
mod token;
mod types;
mod validate;
mod value;

pub use config::ParserConfig;
pub use convert::{Converter, ConverterRegistry, RegistryError};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use parser::Parser;
pub use result::{ArgumentBinding, Binding, CommandBindings, ParseResult};
pub use schema::{CommandId, CommandNode, CommandSchema};
pub use token::{Token, TokenKind, scan};
pub use types::{ArgumentDefinition, Arity, CommandDefinition};
pub use validate::{SchemaError, validate_definition};
pub use value::{ConversionError, TypedValue, ValueType};
