//! Parser behavior settings.

use serde::{Deserialize, Serialize};

use crate::Severity;

/// Tunable parser behavior.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use argmatch_core::{ParserConfig, Severity};
///
/// let config: ParserConfig =
///     serde_json::from_str(r#"{"unrecognized_severity": "warning"}"#).unwrap();
/// assert_eq!(config.unrecognized_severity, Severity::Warning);
/// assert!(!config.suppress_redundant);
/// assert!(config.negative_numbers);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Severity of `unrecognized-token` diagnostics.
    pub unrecognized_severity: Severity,
    /// Drop `missing-required` and `arity-violation` for arguments that
    /// already failed with `invalid-value` or `missing-value`. Off by
    /// default, so an unfilled required argument is always reported.
    pub suppress_redundant: bool,
    /// Treat unmatched short clusters that read as numbers (`-5`) as
    /// positional values.
    pub negative_numbers: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            unrecognized_severity: Severity::Error,
            suppress_redundant: false,
            negative_numbers: true,
        }
    }
}
