//! Error types for schema document loading.

use argmatch_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while loading a schema document or building a
/// parser from it.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but describes an invalid command tree.
    #[error("invalid schema: {0}")]
    SchemaError(#[from] SchemaError),

    /// The file extension is not one of `json`, `yaml` or `yml`.
    #[error("unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// Two documents in one directory define the same root command.
    #[error("duplicate command `{0}` in schema directory")]
    DuplicateCommand(String),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
