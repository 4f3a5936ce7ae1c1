//! Structural validation of command definition trees.
//!
//! Catches definitions the matcher could not handle unambiguously (duplicate
//! names, a variadic positional that is not last, unmatchable option names)
//! before a [`CommandSchema`](crate::CommandSchema) is built. A schema that
//! fails validation is never handed to a parser.
//!
//! # Examples
//!
//! ```
//! use argmatch_core::*;
//!
//! let ok = CommandDefinition::new("tool")
//!     .option(ArgumentDefinition::flag("verbose").short('v'));
//! assert!(validate_definition(&ok).is_empty());
//!
//! // Two options claim `-v`.
//! let bad = CommandDefinition::new("tool")
//!     .option(ArgumentDefinition::flag("verbose").short('v'))
//!     .option(ArgumentDefinition::flag("version").short('v'));
//! assert!(!validate_definition(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::convert::BUILTIN_IDS;
use crate::{ArgumentDefinition, CommandDefinition, ValueType};

/// Schema construction errors.
///
/// `command` fields hold the space-separated command path (`git remote add`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty (under `{0}`)")]
    EmptyCommandName(String),
    /// Argument name is empty or whitespace-only.
    #[error("argument name cannot be empty in `{0}`")]
    EmptyArgumentName(String),
    /// Option name starts with `-`, or contains `=` or whitespace.
    #[error("invalid argument name `{name}` in `{command}`")]
    InvalidName { command: String, name: String },
    /// Short form is `-`, `=`, or whitespace.
    #[error("invalid short form `{short}` for `{name}` in `{command}`")]
    InvalidShort {
        command: String,
        name: String,
        short: char,
    },
    /// Two sibling subcommands share a name or alias.
    #[error("duplicate subcommand `{name}` in `{command}`")]
    DuplicateSubcommand { command: String, name: String },
    /// Two arguments of one command share a name or long alias.
    #[error("duplicate argument `{name}` in `{command}`")]
    DuplicateArgument { command: String, name: String },
    /// Two options of one command share a short form.
    #[error("duplicate short form `-{short}` in `{command}`")]
    DuplicateShort { command: String, short: char },
    /// Positional arguments are matched by rank, not by name.
    #[error("positional `{name}` in `{command}` cannot have a short form")]
    PositionalWithShort { command: String, name: String },
    /// A variadic positional must be the last positional.
    #[error("variadic positional `{name}` in `{command}` must be the last positional")]
    MisplacedVariadic { command: String, name: String },
    /// A required positional follows an optional one.
    #[error("required positional `{name}` in `{command}` follows an optional positional")]
    RequiredAfterOptional { command: String, name: String },
    /// Counters only make sense as options.
    #[error("counter `{name}` in `{command}` cannot be positional")]
    CounterPositional { command: String, name: String },
    /// Arity with `min > max` or `max == 0`.
    #[error("invalid arity for `{name}` in `{command}`")]
    InvalidArity { command: String, name: String },
    /// Required arguments never fall back to a default.
    #[error("required argument `{name}` in `{command}` cannot have a default")]
    RequiredWithDefault { command: String, name: String },
    /// Choice type with no allowed values.
    #[error("choice argument `{name}` in `{command}` has no allowed values")]
    EmptyChoice { command: String, name: String },
    /// Custom value type with no registered converter.
    #[error("unknown value type `{type_id}` for `{name}` in `{command}`")]
    UnknownValueType {
        command: String,
        name: String,
        type_id: String,
    },
    /// Custom value type that reuses a built-in type id.
    #[error("custom type `{type_id}` for `{name}` in `{command}` shadows a built-in type")]
    ReservedTypeId {
        command: String,
        name: String,
        type_id: String,
    },
    /// Default text does not convert to the declared type.
    #[error("invalid default `{raw}` for `{name}` in `{command}`: {reason}")]
    InvalidDefault {
        command: String,
        name: String,
        raw: String,
        reason: String,
    },
}

/// Validates a command definition tree.
///
/// Returns every structural error found, in tree order. An empty vector
/// means [`CommandSchema::build`](crate::CommandSchema::build) will succeed.
pub fn validate_definition(root: &CommandDefinition) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    validate_command(root, &mut path, &mut errors);
    errors
}

fn validate_command(cmd: &CommandDefinition, path: &mut Vec<String>, errors: &mut Vec<SchemaError>) {
    let name = cmd.name.trim();
    if name.is_empty() {
        let parent = if path.is_empty() {
            "<root>".to_string()
        } else {
            path.join(" ")
        };
        errors.push(SchemaError::EmptyCommandName(parent));
        return;
    }

    path.push(name.to_string());
    let command = path.join(" ");

    validate_arguments(cmd, &command, errors);

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &cmd.subcommands {
        for label in std::iter::once(&sub.name).chain(sub.aliases.iter()) {
            if !label.trim().is_empty() && !seen.insert(label.as_str()) {
                errors.push(SchemaError::DuplicateSubcommand {
                    command: command.clone(),
                    name: label.clone(),
                });
            }
        }
        validate_command(sub, path, errors);
    }

    path.pop();
}

fn validate_arguments(cmd: &CommandDefinition, command: &str, errors: &mut Vec<SchemaError>) {
    let mut names: HashSet<&str> = HashSet::new();
    let mut shorts: HashSet<char> = HashSet::new();

    for (rank, arg) in cmd.positional.iter().enumerate() {
        if !validate_argument(arg, command, &mut names, errors) {
            continue;
        }
        let command = command.to_string();
        let name = arg.name.clone();

        if arg.short.is_some() {
            errors.push(SchemaError::PositionalWithShort {
                command: command.clone(),
                name: name.clone(),
            });
        }
        if arg.value_type == ValueType::Counter {
            errors.push(SchemaError::CounterPositional {
                command: command.clone(),
                name: name.clone(),
            });
        }
        if arg.arity.is_variadic() && rank + 1 != cmd.positional.len() {
            errors.push(SchemaError::MisplacedVariadic {
                command: command.clone(),
                name: name.clone(),
            });
        }
        let follows_optional = cmd.positional[..rank].iter().any(|prev| !prev.required);
        if arg.required && follows_optional {
            errors.push(SchemaError::RequiredAfterOptional { command, name });
        }
    }

    for arg in &cmd.options {
        if !validate_argument(arg, command, &mut names, errors) {
            continue;
        }
        if arg.name.starts_with('-') || arg.name.contains(['=', ' ', '\t']) {
            errors.push(SchemaError::InvalidName {
                command: command.to_string(),
                name: arg.name.clone(),
            });
        }
        if let Some(short) = arg.short {
            if short == '-' || short == '=' || short.is_whitespace() {
                errors.push(SchemaError::InvalidShort {
                    command: command.to_string(),
                    name: arg.name.clone(),
                    short,
                });
            } else if !shorts.insert(short) {
                errors.push(SchemaError::DuplicateShort {
                    command: command.to_string(),
                    short,
                });
            }
        }
    }
}

/// Checks shared by positionals and options. Returns `false` when the
/// argument is too broken for the kind-specific checks to be meaningful.
fn validate_argument<'a>(
    arg: &'a ArgumentDefinition,
    command: &str,
    names: &mut HashSet<&'a str>,
    errors: &mut Vec<SchemaError>,
) -> bool {
    if arg.name.trim().is_empty() {
        errors.push(SchemaError::EmptyArgumentName(command.to_string()));
        return false;
    }

    for label in std::iter::once(&arg.name).chain(arg.aliases.iter()) {
        if !names.insert(label.as_str()) {
            errors.push(SchemaError::DuplicateArgument {
                command: command.to_string(),
                name: label.clone(),
            });
        }
    }

    let arity_ok = match arg.arity.max {
        Some(max) => max > 0 && arg.arity.min <= max,
        None => true,
    };
    if !arity_ok {
        errors.push(SchemaError::InvalidArity {
            command: command.to_string(),
            name: arg.name.clone(),
        });
    }

    if arg.required && arg.default.is_some() {
        errors.push(SchemaError::RequiredWithDefault {
            command: command.to_string(),
            name: arg.name.clone(),
        });
    }

    match &arg.value_type {
        ValueType::Choice(choices) if choices.is_empty() => {
            errors.push(SchemaError::EmptyChoice {
                command: command.to_string(),
                name: arg.name.clone(),
            });
        }
        ValueType::Custom(id) if BUILTIN_IDS.contains(&id.as_str()) => {
            errors.push(SchemaError::ReservedTypeId {
                command: command.to_string(),
                name: arg.name.clone(),
                type_id: id.clone(),
            });
        }
        _ => {}
    }

    true
}
