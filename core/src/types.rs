//! Declarative definitions of commands and their arguments.
//!
//! These types describe *what* a command line accepts. They are plain data
//! (serializable with [`serde`]) and carry no parsing state; a definition
//! tree is turned into an immutable [`CommandSchema`](crate::CommandSchema)
//! once, before any parse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValueType;

/// Allowed number of values an argument may bind.
///
/// `max = None` means unbounded (variadic).
///
/// # Examples
///
/// ```
/// use argmatch_core::Arity;
///
/// assert!(Arity::EXACTLY_ONE.contains(1));
/// assert!(!Arity::EXACTLY_ONE.contains(2));
/// assert!(Arity::zero_or_more().is_variadic());
/// assert!(Arity::exactly(2).is_fixed());
/// assert_eq!(Arity::one_or_more().to_string(), "1 or more");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl Arity {
    pub const EXACTLY_ONE: Arity = Arity {
        min: 1,
        max: Some(1),
    };

    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Zero or one value.
    pub const fn optional() -> Self {
        Self {
            min: 0,
            max: Some(1),
        }
    }

    pub const fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    pub const fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Unbounded upper limit.
    pub fn is_variadic(&self) -> bool {
        self.max.is_none()
    }

    /// Fixed count greater than one (`exactly(n)`, `n > 1`).
    pub fn is_fixed(&self) -> bool {
        self.max == Some(self.min) && self.min > 1
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Upper bound, `usize::MAX` when unbounded.
    pub fn upper(&self) -> usize {
        self.max.unwrap_or(usize::MAX)
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::optional()
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, None) => write!(f, "{min} or more"),
            (min, Some(max)) if min == max => write!(f, "exactly {min}"),
            (min, Some(max)) => write!(f, "{min} to {max}"),
        }
    }
}

/// Definition of one positional or named argument.
///
/// Positional definitions are matched by rank (their order within the
/// command); named definitions are matched by `--name`, any long alias, or
/// the optional single-character short form.
///
/// # Examples
///
/// ```
/// use argmatch_core::{ArgumentDefinition, Arity, ValueType};
///
/// let verbose = ArgumentDefinition::flag("verbose").short('v');
/// assert!(verbose.value_type.is_flag());
/// assert!(verbose.matches_long("verbose"));
///
/// let files = ArgumentDefinition::positional("files", ValueType::Path)
///     .arity(Arity::one_or_more());
/// assert!(files.arity.is_variadic());
///
/// let count = ArgumentDefinition::option("count", ValueType::Integer)
///     .alias("num")
///     .default_value("1");
/// assert!(count.matches_long("num"));
/// assert_eq!(count.default.as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    /// Canonical name; also the long option name for named arguments.
    pub name: String,
    /// Additional long names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Single-character short form (named arguments only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default)]
    pub value_type: ValueType,
    #[serde(default)]
    pub arity: Arity,
    #[serde(default)]
    pub required: bool,
    /// Raw default text, converted when the schema is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Mutually-exclusive groups this argument belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentDefinition {
    fn new(name: &str, value_type: ValueType, arity: Arity) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            short: None,
            value_type,
            arity,
            required: false,
            default: None,
            groups: Vec::new(),
            description: None,
        }
    }

    /// A positional argument taking exactly one value when present.
    pub fn positional(name: &str, value_type: ValueType) -> Self {
        Self::new(name, value_type, Arity::EXACTLY_ONE)
    }

    /// A named option taking one value per occurrence, at most once.
    pub fn option(name: &str, value_type: ValueType) -> Self {
        Self::new(name, value_type, Arity::optional())
    }

    /// A boolean presence flag.
    pub fn flag(name: &str) -> Self {
        Self::new(name, ValueType::Boolean, Arity::optional())
    }

    /// An occurrence counter.
    pub fn counter(name: &str) -> Self {
        Self::new(name, ValueType::Counter, Arity::optional())
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, raw: &str) -> Self {
        self.default = Some(raw.to_string());
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Adds membership in a mutually-exclusive group.
    pub fn group(mut self, group: &str) -> Self {
        self.groups.push(group.to_string());
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Checks a long option name (without `--`) against name and aliases.
    pub fn matches_long(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// How the argument is spelled in messages.
    pub fn display_name(&self, positional: bool) -> String {
        if positional {
            format!("<{}>", self.name)
        } else {
            format!("--{}", self.name)
        }
    }
}

/// Definition of a command and, recursively, its subcommands.
///
/// # Examples
///
/// ```
/// use argmatch_core::{ArgumentDefinition, CommandDefinition, ValueType};
///
/// let root = CommandDefinition::new("cargo")
///     .option(ArgumentDefinition::flag("verbose").short('v'))
///     .subcommand(
///         CommandDefinition::new("build")
///             .alias("b")
///             .option(ArgumentDefinition::option("target", ValueType::String)),
///     );
///
/// assert_eq!(root.subcommands.len(), 1);
/// assert!(root.find_subcommand("b").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Positional arguments in rank order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positional: Vec<ArgumentDefinition>,
    /// Named options and flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ArgumentDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandDefinition>,
    /// Parsing must select one of the subcommands.
    #[serde(default)]
    pub subcommand_required: bool,
}

impl CommandDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Appends a positional argument at the next rank.
    pub fn positional(mut self, arg: ArgumentDefinition) -> Self {
        self.positional.push(arg);
        self
    }

    /// Adds a named option or flag.
    pub fn option(mut self, arg: ArgumentDefinition) -> Self {
        self.options.push(arg);
        self
    }

    pub fn subcommand(mut self, sub: CommandDefinition) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn require_subcommand(mut self) -> Self {
        self.subcommand_required = true;
        self
    }

    /// Checks the name and aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Finds a direct subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandDefinition> {
        self.subcommands.iter().find(|s| s.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_bounds() {
        assert!(Arity::optional().contains(0));
        assert!(Arity::optional().contains(1));
        assert!(!Arity::optional().contains(2));
        assert!(!Arity::one_or_more().contains(0));
        assert!(Arity::one_or_more().contains(100));
        assert!(!Arity::exactly(3).contains(2));
        assert!(!Arity::EXACTLY_ONE.is_fixed());
    }

    #[test]
    fn test_arity_display() {
        assert_eq!(Arity::exactly(2).to_string(), "exactly 2");
        assert_eq!(Arity::optional().to_string(), "0 to 1");
        assert_eq!(Arity::zero_or_more().to_string(), "0 or more");
    }

    #[test]
    fn test_argument_defaults_from_json() {
        let arg: ArgumentDefinition = serde_json::from_str(r#"{"name": "output"}"#).unwrap();
        assert_eq!(arg.value_type, ValueType::String);
        assert_eq!(arg.arity, Arity::optional());
        assert!(!arg.required);
    }

    #[test]
    fn test_command_definition_json_shape() {
        let json = r#"{
            "name": "git",
            "options": [{"name": "verbose", "short": "v", "value_type": "boolean"}],
            "subcommands": [{"name": "commit", "aliases": ["ci"]}]
        }"#;
        let cmd: CommandDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.options[0].short, Some('v'));
        assert!(cmd.find_subcommand("ci").is_some());
        assert!(cmd.find_subcommand("push").is_none());
    }

    #[test]
    fn test_display_name() {
        let arg = ArgumentDefinition::positional("name", ValueType::String);
        assert_eq!(arg.display_name(true), "<name>");
        assert_eq!(arg.display_name(false), "--name");
    }
}
