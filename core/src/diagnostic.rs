//! Structured, non-fatal parse diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a diagnostic should stop the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// Category of a parse problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A value-expecting option had no value available.
    MissingValue,
    /// Raw text failed conversion for the declared type.
    InvalidValue,
    /// No argument definition or subcommand matched a token.
    UnrecognizedToken,
    /// A required argument ended with no binding.
    MissingRequired,
    /// Two or more members of a mutually-exclusive group were supplied.
    MutuallyExclusiveViolation,
    /// A fixed-count arity was not satisfied.
    ArityViolation,
    /// An option occurred more often than its arity allows.
    RepeatedArgument,
    /// The selected command requires a subcommand and none was given.
    MissingSubcommand,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingValue => "missing-value",
            DiagnosticKind::InvalidValue => "invalid-value",
            DiagnosticKind::UnrecognizedToken => "unrecognized-token",
            DiagnosticKind::MissingRequired => "missing-required",
            DiagnosticKind::MutuallyExclusiveViolation => "mutually-exclusive-violation",
            DiagnosticKind::ArityViolation => "arity-violation",
            DiagnosticKind::RepeatedArgument => "repeated-argument",
            DiagnosticKind::MissingSubcommand => "missing-subcommand",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found while matching or validating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Index of the offending token in the argument vector, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_index: Option<usize>,
    pub message: String,
    /// Name of the argument definition involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            token_index: None,
            message: message.into(),
            argument: None,
        }
    }

    pub fn at(mut self, token_index: usize) -> Self {
        self.token_index = Some(token_index);
        self
    }

    pub fn for_argument(mut self, name: &str) -> Self {
        self.argument = Some(name.to_string());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}[{}]: {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let diag = Diagnostic::error(DiagnosticKind::MissingValue, "expected a value for `--out`")
            .at(2)
            .for_argument("out");
        assert_eq!(
            diag.to_string(),
            "error[missing-value]: expected a value for `--out`"
        );
        assert_eq!(diag.token_index, Some(2));
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&DiagnosticKind::MutuallyExclusiveViolation).unwrap();
        assert_eq!(json, r#""mutually-exclusive-violation""#);
    }

    #[test]
    fn test_warning_is_not_error() {
        let diag = Diagnostic::error(DiagnosticKind::UnrecognizedToken, "x")
            .with_severity(Severity::Warning);
        assert!(!diag.is_error());
    }
}
