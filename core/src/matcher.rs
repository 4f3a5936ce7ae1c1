//! Token matching: the single-pass state machine that resolves each token
//! against the active command.
//!
//! State is an index into the token slice, the active command, and the
//! positional cursor. Descending into a subcommand is a one-way commitment:
//! options are only ever resolved against the active command's own
//! definitions. Problems are appended to the diagnostic log and matching
//! always continues with the next token.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    CommandBindings, CommandId, CommandNode, CommandSchema, ConverterRegistry, Diagnostic,
    DiagnosticKind, ParserConfig, Token, TokenKind, TypedValue, ValueType,
};

/// Raw bindings and diagnostics produced by [`Matcher::run`].
#[derive(Debug)]
pub(crate) struct MatchOutcome {
    pub levels: Vec<CommandBindings>,
    pub diagnostics: Vec<Diagnostic>,
    /// `(command, argument index)` pairs that saw a failed occurrence.
    pub failed: HashSet<(CommandId, usize)>,
}

pub(crate) struct Matcher<'a> {
    schema: &'a CommandSchema,
    registry: &'a ConverterRegistry,
    config: &'a ParserConfig,
    tokens: &'a [Token],
    pos: usize,
    active: CommandId,
    cursor: usize,
    /// Tokens consumed by the positional at `cursor`.
    filled: usize,
    levels: Vec<CommandBindings>,
    diagnostics: Vec<Diagnostic>,
    failed: HashSet<(CommandId, usize)>,
}

impl<'a> Matcher<'a> {
    pub fn new(
        schema: &'a CommandSchema,
        registry: &'a ConverterRegistry,
        config: &'a ParserConfig,
        tokens: &'a [Token],
    ) -> Self {
        Self {
            schema,
            registry,
            config,
            tokens,
            pos: 0,
            active: CommandId::ROOT,
            cursor: 0,
            filled: 0,
            levels: Vec::new(),
            diagnostics: Vec::new(),
            failed: HashSet::new(),
        }
    }

    pub fn run(mut self) -> MatchOutcome {
        self.push_level(CommandId::ROOT);

        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            self.pos += 1;
            trace!(index = token.index, kind = ?token.kind, text = %token.text, "matching token");

            match token.kind {
                TokenKind::Terminator => self.close_variadic(),
                TokenKind::Positional => self.positional(token),
                TokenKind::LongOption => {
                    self.close_variadic();
                    self.long_option(token, None);
                }
                TokenKind::OptionWithValue => {
                    self.close_variadic();
                    self.long_option(token, token.value.as_deref());
                }
                TokenKind::ShortCluster => self.short_cluster(token),
            }
        }

        MatchOutcome {
            levels: self.levels,
            diagnostics: self.diagnostics,
            failed: self.failed,
        }
    }

    fn node(&self) -> &'a CommandNode {
        self.schema.node(self.active)
    }

    fn level(&mut self) -> &mut CommandBindings {
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    fn push_level(&mut self, id: CommandId) {
        let node = self.schema.node(id);
        let names = node.arguments().map(|a| a.name.clone()).collect();
        self.levels.push(CommandBindings::new(id, &node.name, names));
        self.active = id;
        self.cursor = 0;
        self.filled = 0;
    }

    fn positional(&mut self, token: &Token) {
        if !token.escaped {
            if let Some(child) = self.schema.find_child(self.active, &token.text) {
                debug!(
                    command = %self.schema.command_path(child),
                    index = token.index,
                    "descending into subcommand"
                );
                self.push_level(child);
                return;
            }
        }
        self.bind_positional(token);
    }

    fn bind_positional(&mut self, token: &Token) {
        let node = self.node();
        let Some(arg) = node.positional.get(self.cursor) else {
            let message = format!("unexpected argument `{}`", token.text);
            self.unrecognized(token, message);
            return;
        };

        let index = self.cursor;
        self.filled += 1;
        if self.filled >= arg.arity.upper() {
            self.cursor += 1;
            self.filled = 0;
        }

        if let Some(value) = self.convert(index, &token.text, token) {
            self.level().binding_mut(index).push(value, token.index);
        }
    }

    /// Ends a variadic positional that has already bound at least one value.
    fn close_variadic(&mut self) {
        let node = self.node();
        if self.filled > 0
            && node
                .positional
                .get(self.cursor)
                .is_some_and(|arg| arg.arity.is_variadic())
        {
            self.cursor += 1;
            self.filled = 0;
        }
    }

    fn long_option(&mut self, token: &Token, inline: Option<&str>) {
        let name = token.name.as_deref().unwrap_or_default();
        match self.node().find_long(name) {
            Some(index) => self.apply_option(index, token, inline),
            None => {
                let owner = self
                    .schema
                    .ancestors(self.active)
                    .find(|&id| self.schema.node(id).find_long(name).is_some());
                let flag = format!("--{name}");
                self.unrecognized_option(token, &flag, owner);
            }
        }
    }

    fn short_cluster(&mut self, token: &Token) {
        let node = self.node();
        let body = token.cluster();

        let Some(first) = body.chars().next() else {
            return;
        };
        if node.find_short(first).is_none() {
            if self.config.negative_numbers && token.looks_numeric() {
                self.bind_positional(token);
                return;
            }
            self.close_variadic();
            // The whole token is reported once; nothing in it could be resolved.
            let owner = self
                .schema
                .ancestors(self.active)
                .find(|&id| self.schema.node(id).find_short(first).is_some());
            self.unrecognized_option(token, &token.text, owner);
            return;
        }

        self.close_variadic();
        for (offset, ch) in body.char_indices() {
            let Some(index) = node.find_short(ch) else {
                let message = format!("unrecognized flag `-{ch}` in `{}`", token.text);
                self.unrecognized(token, message);
                continue;
            };

            if node.argument(index).value_type.is_flag() {
                self.apply_option(index, token, None);
                continue;
            }

            // The first value-taking character claims the rest of the cluster.
            let rest = &body[offset + ch.len_utf8()..];
            let rest = rest.strip_prefix('=').unwrap_or(rest);
            let inline = if rest.is_empty() { None } else { Some(rest) };
            self.apply_option(index, token, inline);
            break;
        }
    }

    fn apply_option(&mut self, index: usize, token: &Token, inline: Option<&str>) {
        let arg = self.node().argument(index);

        match arg.value_type {
            ValueType::Counter => {
                let step = match inline {
                    Some(raw) => match self.convert(index, raw, token) {
                        Some(TypedValue::Int(n)) => n,
                        _ => return,
                    },
                    None => 1,
                };
                let binding = self.level().binding_mut(index);
                let count = binding.first().and_then(TypedValue::as_int).unwrap_or(0);
                binding.values = vec![TypedValue::Int(count.saturating_add(step))];
                binding.token_indices.push(token.index);
            }
            ValueType::Boolean => {
                let value = match inline {
                    Some(raw) => self.convert(index, raw, token),
                    None => Some(TypedValue::Bool(true)),
                };
                if let Some(value) = value {
                    self.bind_option(index, value, token);
                }
            }
            _ => {
                let raw = match inline {
                    Some(raw) => raw.to_string(),
                    None => match self.take_value() {
                        Some(raw) => raw,
                        None => {
                            self.missing_value(index, token);
                            return;
                        }
                    },
                };
                self.bind_raw(index, &raw, token);

                // A fixed count is taken as a group from one occurrence.
                if arg.arity.is_fixed() {
                    for _ in 1..arg.arity.min {
                        let Some(raw) = self.take_value() else {
                            break;
                        };
                        self.bind_raw(index, &raw, token);
                    }
                }
            }
        }
    }

    fn bind_raw(&mut self, index: usize, raw: &str, token: &Token) {
        if let Some(value) = self.convert(index, raw, token) {
            self.bind_option(index, value, token);
        }
    }

    /// Consumes the following token as an option value unless it is the
    /// terminator or names an option of the active command.
    fn take_value(&mut self) -> Option<String> {
        let next = self.tokens.get(self.pos)?;
        let node = self.node();
        let is_option = match next.kind {
            TokenKind::Terminator => true,
            TokenKind::Positional => false,
            TokenKind::LongOption | TokenKind::OptionWithValue => next
                .name
                .as_deref()
                .is_some_and(|name| node.find_long(name).is_some()),
            TokenKind::ShortCluster => next
                .cluster()
                .chars()
                .next()
                .is_some_and(|c| node.find_short(c).is_some()),
        };
        if is_option {
            return None;
        }
        self.pos += 1;
        Some(next.text.clone())
    }

    fn bind_option(&mut self, index: usize, value: TypedValue, token: &Token) {
        let node = self.node();
        let arg = node.argument(index);
        let bound = self.level().binding(index).len();

        if bound >= arg.arity.upper() {
            let message = match arg.arity.max {
                Some(1) => format!("`{}` cannot be used more than once", node.display_argument(index)),
                _ => format!(
                    "`{}` accepts {} value(s), got more",
                    node.display_argument(index),
                    arg.arity
                ),
            };
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::RepeatedArgument, message)
                    .at(token.index)
                    .for_argument(&arg.name),
            );
            return;
        }

        self.level().binding_mut(index).push(value, token.index);
    }

    fn convert(&mut self, index: usize, raw: &str, token: &Token) -> Option<TypedValue> {
        let node = self.node();
        let arg = node.argument(index);
        match self.registry.convert(&arg.value_type, raw) {
            Ok(value) => Some(value),
            Err(err) => {
                let message = format!(
                    "invalid value `{raw}` for `{}` ({}): {err}",
                    node.display_argument(index),
                    arg.value_type.type_id()
                );
                self.diagnostics.push(
                    Diagnostic::error(DiagnosticKind::InvalidValue, message)
                        .at(token.index)
                        .for_argument(&arg.name),
                );
                self.failed.insert((self.active, index));
                None
            }
        }
    }

    fn missing_value(&mut self, index: usize, token: &Token) {
        let node = self.node();
        let arg = node.argument(index);
        let message = format!(
            "expected a value for `{}` ({})",
            node.display_argument(index),
            arg.value_type.type_id()
        );
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::MissingValue, message)
                .at(token.index)
                .for_argument(&arg.name),
        );
        self.failed.insert((self.active, index));
    }

    fn unrecognized_option(&mut self, token: &Token, flag: &str, owner: Option<CommandId>) {
        let message = match owner {
            Some(owner) => format!(
                "unrecognized option `{flag}` for `{}`; it belongs to `{}` and must come before the subcommand",
                self.schema.command_path(self.active),
                self.schema.command_path(owner)
            ),
            None => format!("unrecognized option `{flag}`"),
        };
        self.unrecognized(token, message);
    }

    fn unrecognized(&mut self, token: &Token, message: String) {
        debug!(index = token.index, text = %token.text, "unrecognized token");
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::UnrecognizedToken, message)
                .with_severity(self.config.unrecognized_severity)
                .at(token.index),
        );
    }
}
