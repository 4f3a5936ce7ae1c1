//! Cross-argument validation run after matching.
//!
//! For every level on the selected path this checks required arguments,
//! mutually-exclusive groups and fixed arities, then fills defaults. It
//! never alters a binding that matching populated; it only fills empty
//! bindings from defaults and appends diagnostics.

use std::collections::HashSet;

use tracing::trace;

use crate::{
    CommandBindings, CommandId, CommandNode, CommandSchema, Diagnostic, DiagnosticKind,
    ParserConfig, TypedValue,
};

/// Converted defaults, indexed by command id then argument index.
pub(crate) type DefaultTable = Vec<Vec<Option<TypedValue>>>;

pub(crate) struct ConstraintValidator<'a> {
    pub schema: &'a CommandSchema,
    pub defaults: &'a DefaultTable,
    pub config: &'a ParserConfig,
    pub failed: &'a HashSet<(CommandId, usize)>,
}

impl ConstraintValidator<'_> {
    pub fn validate(&self, levels: &mut [CommandBindings], diagnostics: &mut Vec<Diagnostic>) {
        let depth = levels.len();
        for (position, level) in levels.iter_mut().enumerate() {
            let node = self.schema.node(level.command);
            self.check_required_and_arity(node, level, diagnostics);
            self.check_exclusive_groups(node, level, diagnostics);
            if position + 1 == depth {
                self.check_subcommand(node, level, diagnostics);
            }
            self.fill_defaults(node, level);
        }
    }

    fn suppressed(&self, command: CommandId, index: usize) -> bool {
        self.config.suppress_redundant && self.failed.contains(&(command, index))
    }

    fn scope(&self, command: CommandId) -> String {
        if command == CommandId::ROOT {
            String::new()
        } else {
            format!(" for `{}`", self.schema.command_path(command))
        }
    }

    fn check_required_and_arity(
        &self,
        node: &CommandNode,
        level: &CommandBindings,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for (index, arg) in node.arguments().enumerate() {
            let binding = level.binding(index);
            if self.suppressed(level.command, index) {
                continue;
            }

            if binding.is_empty() {
                if arg.required {
                    let message = format!(
                        "missing required argument `{}`{}",
                        node.display_argument(index),
                        self.scope(level.command)
                    );
                    diagnostics.push(
                        Diagnostic::error(DiagnosticKind::MissingRequired, message)
                            .for_argument(&arg.name),
                    );
                }
            } else if !arg.arity.contains(binding.len()) {
                let message = format!(
                    "`{}` expects {} value(s), got {}",
                    node.display_argument(index),
                    arg.arity,
                    binding.len()
                );
                let mut diag = Diagnostic::error(DiagnosticKind::ArityViolation, message)
                    .for_argument(&arg.name);
                if let Some(&last) = binding.token_indices.last() {
                    diag = diag.at(last);
                }
                diagnostics.push(diag);
            }
        }
    }

    fn check_exclusive_groups(
        &self,
        node: &CommandNode,
        level: &CommandBindings,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut groups: Vec<&str> = Vec::new();
        for arg in node.arguments() {
            for group in &arg.groups {
                if !groups.contains(&group.as_str()) {
                    groups.push(group);
                }
            }
        }

        for group in groups {
            let present: Vec<usize> = node
                .arguments()
                .enumerate()
                .filter(|(_, arg)| arg.groups.iter().any(|g| g == group))
                .map(|(index, _)| index)
                .filter(|&index| {
                    let binding = level.binding(index);
                    !binding.is_empty() && !binding.from_default
                })
                .collect();

            if present.len() < 2 {
                continue;
            }

            let names: Vec<String> = present
                .iter()
                .map(|&index| format!("`{}`", node.display_argument(index)))
                .collect();
            let message = format!(
                "arguments {} are mutually exclusive (group `{group}`){}",
                names.join(", "),
                self.scope(level.command)
            );

            // Point at whichever conflicting argument appeared last.
            let latest = present
                .iter()
                .copied()
                .max_by_key(|&index| level.binding(index).token_indices.first().copied());
            let mut diag = Diagnostic::error(DiagnosticKind::MutuallyExclusiveViolation, message);
            if let Some(index) = latest {
                diag = diag.for_argument(&node.argument(index).name);
                if let Some(&first) = level.binding(index).token_indices.first() {
                    diag = diag.at(first);
                }
            }
            diagnostics.push(diag);
        }
    }

    fn check_subcommand(
        &self,
        node: &CommandNode,
        level: &CommandBindings,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if !node.subcommand_required || node.children.is_empty() {
            return;
        }
        let names: Vec<&str> = node
            .children
            .iter()
            .map(|&child| self.schema.node(child).name.as_str())
            .collect();
        let message = format!(
            "`{}` requires a subcommand: {}",
            self.schema.command_path(level.command),
            names.join(", ")
        );
        diagnostics.push(Diagnostic::error(DiagnosticKind::MissingSubcommand, message));
    }

    fn fill_defaults(&self, node: &CommandNode, level: &mut CommandBindings) {
        let defaults = &self.defaults[level.command.index()];
        for (index, arg) in node.arguments().enumerate() {
            let Some(default) = &defaults[index] else {
                continue;
            };
            let binding = level.binding_mut(index);
            if binding.is_empty() && !arg.required {
                trace!(argument = %arg.name, value = %default, "filling default");
                binding.values.push(default.clone());
                binding.from_default = true;
            }
        }
    }
}
