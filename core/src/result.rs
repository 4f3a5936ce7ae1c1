//! The parse result tree: per-command bindings plus diagnostics.

use serde::Serialize;

use crate::{CommandId, Diagnostic, Severity, Token, TypedValue};

/// Values bound to one argument definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Binding {
    pub values: Vec<TypedValue>,
    /// Source tokens of the values; every occurrence for counters, empty
    /// for defaults.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub token_indices: Vec<usize>,
    /// Set when the value came from the definition's default.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_default: bool,
}

impl Binding {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn first(&self) -> Option<&TypedValue> {
        self.values.first()
    }

    pub(crate) fn push(&mut self, value: TypedValue, token_index: usize) {
        self.values.push(value);
        self.token_indices.push(token_index);
    }
}

/// Binding for one named argument of a command level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentBinding {
    pub name: String,
    #[serde(flatten)]
    pub binding: Binding,
}

/// All bindings for one matched command level.
///
/// `arguments` is aligned with the command's argument indices (positionals
/// first, then options).
///
/// # Examples
///
/// ```
/// use argmatch_core::*;
///
/// let schema = CommandSchema::build(
///     CommandDefinition::new("greet")
///         .positional(ArgumentDefinition::positional("name", ValueType::String).required())
///         .option(ArgumentDefinition::flag("verbose").short('v')),
/// )
/// .unwrap();
/// let parser = Parser::new(schema, ConverterRegistry::new()).unwrap();
///
/// let result = parser.parse(["-v", "Alice"]);
/// let root = result.root();
/// assert!(root.flag("verbose"));
/// assert_eq!(root.value("name").and_then(|v| v.as_str()), Some("Alice"));
/// assert!(root.get("missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandBindings {
    #[serde(skip)]
    pub command: CommandId,
    #[serde(rename = "command")]
    pub name: String,
    pub arguments: Vec<ArgumentBinding>,
}

impl CommandBindings {
    pub(crate) fn new(command: CommandId, name: &str, argument_names: Vec<String>) -> Self {
        Self {
            command,
            name: name.to_string(),
            arguments: argument_names
                .into_iter()
                .map(|name| ArgumentBinding {
                    name,
                    binding: Binding::default(),
                })
                .collect(),
        }
    }

    /// Binding by argument name.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.binding)
    }

    /// First bound value.
    pub fn value(&self, name: &str) -> Option<&TypedValue> {
        self.get(name).and_then(Binding::first)
    }

    /// All bound values, empty when unset or unknown.
    pub fn values(&self, name: &str) -> &[TypedValue] {
        self.get(name).map(|b| b.values.as_slice()).unwrap_or_default()
    }

    /// `true` if the argument holds a true boolean or a non-zero count.
    pub fn flag(&self, name: &str) -> bool {
        self.values(name).iter().any(|v| match v {
            TypedValue::Bool(b) => *b,
            TypedValue::Int(n) => *n > 0,
            _ => false,
        })
    }

    /// Counter value, or the number of bound values for other types.
    pub fn count(&self, name: &str) -> i64 {
        match self.values(name) {
            [TypedValue::Int(n)] => *n,
            values => values.len() as i64,
        }
    }

    /// `true` if the argument was supplied on the command line.
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some_and(|b| !b.is_empty() && !b.from_default)
    }

    pub fn binding(&self, index: usize) -> &Binding {
        &self.arguments[index].binding
    }

    pub(crate) fn binding_mut(&mut self, index: usize) -> &mut Binding {
        &mut self.arguments[index].binding
    }
}

/// Output of one parse.
///
/// Always holds at least the root level. Diagnostics are ordered: matching
/// problems in token order, then validation problems from the root level
/// down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    #[serde(skip)]
    pub tokens: Vec<Token>,
    pub levels: Vec<CommandBindings>,
    pub diagnostics: Vec<Diagnostic>,
    /// Raw text of every argument after the first `--`, in order. These
    /// tokens are still matched as positionals.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forward: Vec<String>,
}

impl ParseResult {
    /// Selected command ids, root first.
    pub fn path(&self) -> Vec<CommandId> {
        self.levels.iter().map(|l| l.command).collect()
    }

    /// Selected command names, root first.
    pub fn command_path(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn root(&self) -> &CommandBindings {
        &self.levels[0]
    }

    /// Deepest matched command.
    pub fn leaf(&self) -> &CommandBindings {
        &self.levels[self.levels.len() - 1]
    }

    /// Level by command name.
    pub fn level(&self, name: &str) -> Option<&CommandBindings> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Arguments given after the terminator, for handing on to another
    /// program.
    pub fn forward(&self) -> &[String] {
        &self.forward
    }

    /// `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

#[cfg(test)]
mod tests {
    use crate::DiagnosticKind;

    use super::*;

    fn level() -> CommandBindings {
        let mut level = CommandBindings::new(
            CommandId::ROOT,
            "tool",
            vec!["file".into(), "verbose".into(), "level".into()],
        );
        level.binding_mut(1).push(TypedValue::Int(3), 0);
        level.binding_mut(2).values.push(TypedValue::Int(5));
        level.binding_mut(2).from_default = true;
        level
    }

    #[test]
    fn test_counter_accessors() {
        let level = level();
        assert!(level.flag("verbose"));
        assert_eq!(level.count("verbose"), 3);
        assert_eq!(level.count("file"), 0);
        assert!(!level.flag("file"));
    }

    #[test]
    fn test_is_present_ignores_defaults() {
        let level = level();
        assert!(level.is_present("verbose"));
        assert!(!level.is_present("level"));
        assert_eq!(level.value("level"), Some(&TypedValue::Int(5)));
    }

    #[test]
    fn test_result_error_filtering() {
        let result = ParseResult {
            tokens: Vec::new(),
            levels: vec![level()],
            diagnostics: vec![
                Diagnostic::error(DiagnosticKind::UnrecognizedToken, "a")
                    .with_severity(Severity::Warning),
            ],
            forward: Vec::new(),
        };
        assert!(!result.has_errors());
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.command_path(), vec!["tool"]);
        assert_eq!(result.leaf().name, "tool");
    }

    #[test]
    fn test_result_serializes_bindings() {
        let result = ParseResult {
            tokens: Vec::new(),
            levels: vec![level()],
            diagnostics: Vec::new(),
            forward: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["levels"][0]["command"], "tool");
        assert_eq!(json["levels"][0]["arguments"][1]["values"][0], 3);
        assert_eq!(json["levels"][0]["arguments"][2]["from_default"], true);
        assert!(json.get("forward").is_none());
    }

    #[test]
    fn test_result_serializes_forward_arguments() {
        let result = ParseResult {
            tokens: Vec::new(),
            levels: vec![level()],
            diagnostics: Vec::new(),
            forward: vec!["-x".into(), "file".into()],
        };
        assert_eq!(result.forward(), ["-x", "file"]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["forward"], serde_json::json!(["-x", "file"]));
    }
}
