//! Parse entry point tying the scanner, matcher and validator together.

use std::ffi::OsStr;
use std::sync::Arc;

use tracing::debug;

use crate::constraints::{ConstraintValidator, DefaultTable};
use crate::matcher::Matcher;
use crate::validate::SchemaError;
use crate::{CommandSchema, ConverterRegistry, ParseResult, ParserConfig, Token, scan};

/// A reusable parser over one schema and one converter registry snapshot.
///
/// Construction checks everything that needs the registry: every custom
/// value type must have a converter and every default must convert.
/// Parsing takes `&self` and allocates all per-parse state, so one parser
/// can serve many threads.
///
/// # Examples
///
/// ```
/// use argmatch_core::*;
///
/// let schema = CommandSchema::build(
///     CommandDefinition::new("app").subcommand(
///         CommandDefinition::new("build")
///             .option(ArgumentDefinition::option("target", ValueType::String)),
///     ),
/// )
/// .unwrap();
/// let parser = Parser::new(schema, ConverterRegistry::new()).unwrap();
///
/// let result = parser.parse(["build", "--target=release"]);
/// assert_eq!(result.command_path(), vec!["app", "build"]);
/// assert_eq!(
///     result.leaf().value("target"),
///     Some(&TypedValue::Str("release".into()))
/// );
/// assert!(result.diagnostics().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    schema: Arc<CommandSchema>,
    registry: ConverterRegistry,
    config: ParserConfig,
    defaults: DefaultTable,
}

impl Parser {
    /// Creates a parser with the default [`ParserConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownValueType`] for a custom type without a
    /// registered converter and [`SchemaError::InvalidDefault`] for a default
    /// that does not convert.
    pub fn new(
        schema: impl Into<Arc<CommandSchema>>,
        registry: ConverterRegistry,
    ) -> Result<Self, SchemaError> {
        let schema = schema.into();
        let defaults = convert_defaults(&schema, &registry)?;
        Ok(Self {
            schema,
            registry,
            config: ParserConfig::default(),
            defaults,
        })
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses an argument vector (program name excluded).
    pub fn parse<I, S>(&self, argv: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_tokens(scan(argv))
    }

    /// Parses OS-native arguments. Arguments that are not valid UTF-8 are
    /// converted lossily.
    pub fn parse_os<I, S>(&self, argv: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.parse(
            argv.into_iter()
                .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
        )
    }

    /// Parses the current process arguments.
    pub fn parse_env(&self) -> ParseResult {
        self.parse_os(std::env::args_os().skip(1))
    }

    /// Parses an already scanned token sequence.
    pub fn parse_tokens(&self, tokens: Vec<Token>) -> ParseResult {
        let outcome = Matcher::new(&self.schema, &self.registry, &self.config, &tokens).run();

        let mut levels = outcome.levels;
        let mut diagnostics = outcome.diagnostics;
        let validator = ConstraintValidator {
            schema: &self.schema,
            defaults: &self.defaults,
            config: &self.config,
            failed: &outcome.failed,
        };
        validator.validate(&mut levels, &mut diagnostics);

        debug!(
            command = %self.schema.command_path(levels[levels.len() - 1].command),
            tokens = tokens.len(),
            diagnostics = diagnostics.len(),
            "parse finished"
        );

        let forward = tokens
            .iter()
            .filter(|token| token.escaped)
            .map(|token| token.text.clone())
            .collect();

        ParseResult {
            tokens,
            levels,
            diagnostics,
            forward,
        }
    }
}

fn convert_defaults(
    schema: &CommandSchema,
    registry: &ConverterRegistry,
) -> Result<DefaultTable, SchemaError> {
    let mut table = Vec::with_capacity(schema.len());

    for id in schema.ids() {
        let node = schema.node(id);
        let mut row = Vec::with_capacity(node.argument_count());

        for arg in node.arguments() {
            if !registry.supports(&arg.value_type) {
                return Err(SchemaError::UnknownValueType {
                    command: schema.command_path(id),
                    name: arg.name.clone(),
                    type_id: arg.value_type.type_id().to_string(),
                });
            }

            let default = match &arg.default {
                Some(raw) => match registry.convert(&arg.value_type, raw) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        return Err(SchemaError::InvalidDefault {
                            command: schema.command_path(id),
                            name: arg.name.clone(),
                            raw: raw.clone(),
                            reason: err.reason,
                        });
                    }
                },
                None => None,
            };
            row.push(default);
        }
        table.push(row);
    }

    Ok(table)
}
