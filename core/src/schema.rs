//! Immutable, arena-backed command schema.
//!
//! [`CommandSchema::build`] validates a [`CommandDefinition`] tree and
//! flattens it into a vector of [`CommandNode`]s addressed by [`CommandId`].
//! Children are owned by the arena; each node's `parent` is a plain index
//! used only for lookups. A built schema is read-only and can be shared
//! across threads and parses.
//!
//! # Examples
//!
//! ```
//! use argmatch_core::*;
//!
//! let schema = CommandSchema::build(
//!     CommandDefinition::new("git")
//!         .subcommand(CommandDefinition::new("remote").subcommand(CommandDefinition::new("add"))),
//! )
//! .unwrap();
//!
//! let remote = schema.find_child(CommandId::ROOT, "remote").unwrap();
//! let add = schema.find_child(remote, "add").unwrap();
//! assert_eq!(schema.command_path(add), "git remote add");
//! assert_eq!(schema.node(add).parent, Some(remote));
//! ```

use std::fmt;

use serde::Serialize;

use crate::validate::{SchemaError, validate_definition};
use crate::{ArgumentDefinition, CommandDefinition};

/// Index of a command within a [`CommandSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommandId(usize);

impl CommandId {
    /// The root command is always the first node.
    pub const ROOT: CommandId = CommandId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One command in the arena.
///
/// Arguments are addressed by a per-command index: positionals first, in
/// rank order, then named options.
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub positional: Vec<ArgumentDefinition>,
    pub options: Vec<ArgumentDefinition>,
    pub children: Vec<CommandId>,
    /// Non-owning back-reference; `None` for the root.
    pub parent: Option<CommandId>,
    pub subcommand_required: bool,
}

impl CommandNode {
    /// Total number of argument definitions.
    pub fn argument_count(&self) -> usize {
        self.positional.len() + self.options.len()
    }

    /// Argument by per-command index.
    pub fn argument(&self, index: usize) -> &ArgumentDefinition {
        match index.checked_sub(self.positional.len()) {
            Some(option) => &self.options[option],
            None => &self.positional[index],
        }
    }

    /// All arguments, positionals first.
    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentDefinition> {
        self.positional.iter().chain(self.options.iter())
    }

    pub fn is_positional(&self, index: usize) -> bool {
        index < self.positional.len()
    }

    /// Per-command index of the argument named `name`.
    pub fn argument_index(&self, name: &str) -> Option<usize> {
        self.arguments().position(|a| a.name == name)
    }

    /// Per-command index of the option matching a long name or alias.
    pub fn find_long(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|a| a.matches_long(name))
            .map(|i| i + self.positional.len())
    }

    /// Per-command index of the option with the given short form.
    pub fn find_short(&self, short: char) -> Option<usize> {
        self.options
            .iter()
            .position(|a| a.short == Some(short))
            .map(|i| i + self.positional.len())
    }

    /// Name as spelled in messages (`--name` or `<name>`).
    pub fn display_argument(&self, index: usize) -> String {
        self.argument(index).display_name(self.is_positional(index))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

/// Validated, immutable command tree.
#[derive(Debug, Clone)]
pub struct CommandSchema {
    nodes: Vec<CommandNode>,
}

impl CommandSchema {
    /// Validates `root` and flattens it into an arena.
    ///
    /// # Errors
    ///
    /// Returns the first structural error reported by
    /// [`validate_definition`].
    pub fn build(root: CommandDefinition) -> Result<Self, SchemaError> {
        if let Some(err) = validate_definition(&root).into_iter().next() {
            return Err(err);
        }

        let mut schema = Self { nodes: Vec::new() };
        schema.insert(root, None);
        Ok(schema)
    }

    fn insert(&mut self, def: CommandDefinition, parent: Option<CommandId>) -> CommandId {
        let id = CommandId(self.nodes.len());
        self.nodes.push(CommandNode {
            name: def.name,
            aliases: def.aliases,
            description: def.description,
            positional: def.positional,
            options: def.options,
            children: Vec::new(),
            parent,
            subcommand_required: def.subcommand_required,
        });

        for sub in def.subcommands {
            let child = self.insert(sub, Some(id));
            self.nodes[id.0].children.push(child);
        }
        id
    }

    pub fn root(&self) -> &CommandNode {
        &self.nodes[0]
    }

    /// Node by id. Ids always come from this schema.
    pub fn node(&self, id: CommandId) -> &CommandNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All command ids in depth-first order.
    pub fn ids(&self) -> impl Iterator<Item = CommandId> + '_ {
        (0..self.nodes.len()).map(CommandId)
    }

    /// Direct child of `parent` matching `name` or an alias.
    pub fn find_child(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).matches(name))
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: CommandId) -> impl Iterator<Item = CommandId> + '_ {
        std::iter::successors(self.node(id).parent, |&current| self.node(current).parent)
    }

    /// Space-separated names from the root to `id`.
    pub fn command_path(&self, id: CommandId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self.node(ancestor).name.as_str())
            .collect();
        names.reverse();
        names.push(&self.node(id).name);
        names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use crate::{Arity, ValueType};

    use super::*;

    fn sample() -> CommandSchema {
        CommandSchema::build(
            CommandDefinition::new("tool")
                .positional(ArgumentDefinition::positional("input", ValueType::Path).required())
                .option(ArgumentDefinition::flag("verbose").short('v').alias("loud"))
                .subcommand(
                    CommandDefinition::new("build")
                        .alias("b")
                        .option(ArgumentDefinition::option("target", ValueType::String)),
                )
                .subcommand(
                    CommandDefinition::new("test").positional(
                        ArgumentDefinition::positional("filters", ValueType::String)
                            .arity(Arity::zero_or_more()),
                    ),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_build_flattens_tree() {
        let schema = sample();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.root().name, "tool");
        assert_eq!(schema.root().children.len(), 2);
        assert!(schema.root().parent.is_none());
    }

    #[test]
    fn test_find_child_by_alias() {
        let schema = sample();
        let build = schema.find_child(CommandId::ROOT, "b").unwrap();
        assert_eq!(schema.node(build).name, "build");
        assert_eq!(schema.node(build).parent, Some(CommandId::ROOT));
        assert!(schema.find_child(CommandId::ROOT, "deploy").is_none());
    }

    #[test]
    fn test_argument_indexing_puts_positionals_first() {
        let schema = sample();
        let root = schema.root();
        assert_eq!(root.argument_count(), 2);
        assert!(root.is_positional(0));
        assert_eq!(root.argument(1).name, "verbose");
        assert_eq!(root.find_long("loud"), Some(1));
        assert_eq!(root.find_short('v'), Some(1));
        assert_eq!(root.find_long("input"), None);
        assert_eq!(root.display_argument(0), "<input>");
    }

    #[test]
    fn test_build_rejects_invalid_definition() {
        let result = CommandSchema::build(
            CommandDefinition::new("tool")
                .subcommand(CommandDefinition::new("run"))
                .subcommand(CommandDefinition::new("run")),
        );
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateSubcommand { .. })
        ));
    }

    #[test]
    fn test_schema_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandSchema>();
    }
}
