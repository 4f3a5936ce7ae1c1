//! Serialized schema documents.
//!
//! A document pairs a root [`CommandDefinition`] with the [`ParserConfig`]
//! it should be parsed under, so a whole command-line interface can be
//! authored as data.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! parser:
//!   unrecognized_severity: warning
//! command:
//!   name: greet
//!   positional:
//!     - name: name
//!       required: true
//!   options:
//!     - name: verbose
//!       short: v
//!       value_type: counter
//!     - name: count
//!       value_type: integer
//!       default: "1"
//! ```

use std::path::Path;

use argmatch_core::{
    CommandDefinition, CommandSchema, ConverterRegistry, Parser, ParserConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LoaderError, Result};

/// On-disk encoding of a [`SchemaDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Picks the format from a file extension (`json`, `yaml` or `yml`).
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use argmatch_loader::SchemaFormat;
    ///
    /// assert_eq!(SchemaFormat::from_path("cli.yml").unwrap(), SchemaFormat::Yaml);
    /// assert_eq!(SchemaFormat::from_path("cli.JSON").unwrap(), SchemaFormat::Json);
    /// assert!(SchemaFormat::from_path("cli.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(SchemaFormat::Json),
            Some("yaml" | "yml") => Ok(SchemaFormat::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Returns `true` if `path` has an extension this crate can load.
    pub fn is_supported(path: impl AsRef<Path>) -> bool {
        Self::from_path(path).is_ok()
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

/// A command definition tree plus its parser configuration.
///
/// # Examples
///
/// ```
/// use argmatch_loader::SchemaDocument;
/// use argmatch_core::ConverterRegistry;
///
/// let doc = SchemaDocument::from_json_str(r#"{
///     "command": {
///         "name": "greet",
///         "positional": [{ "name": "name", "required": true }],
///         "options": [{ "name": "verbose", "short": "v", "value_type": "boolean" }]
///     }
/// }"#)
/// .unwrap();
///
/// let parser = doc.build_parser(ConverterRegistry::new()).unwrap();
/// let result = parser.parse(["-v", "Alice"]);
/// assert!(result.diagnostics().is_empty());
/// assert!(result.root().flag("verbose"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Document format version (e.g., `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Parser behavior; every field falls back to [`ParserConfig::default`].
    #[serde(default)]
    pub parser: ParserConfig,
    /// Root of the command tree.
    pub command: CommandDefinition,
}

impl SchemaDocument {
    /// Wraps a command tree with the default parser configuration.
    pub fn new(command: CommandDefinition) -> Self {
        Self {
            version: default_version(),
            parser: ParserConfig::default(),
            command,
        }
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Loads a document, choosing JSON or YAML from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for an unknown extension,
    /// [`LoaderError::IoError`] if the file cannot be read, or a JSON/YAML
    /// error if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        let doc = Self::parse_str(&text, format)?;
        info!(
            path = %path.display(),
            command = %doc.command.name,
            "loaded schema document"
        );
        Ok(doc)
    }

    /// Saves the document, choosing JSON or YAML from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for an unknown extension,
    /// or [`LoaderError::IoError`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)?;
        std::fs::write(path, self.to_string(format)?)?;
        debug!(path = %path.display(), "saved schema document");
        Ok(())
    }

    pub fn parse_str(text: &str, format: SchemaFormat) -> Result<Self> {
        match format {
            SchemaFormat::Json => Self::from_json_str(text),
            SchemaFormat::Yaml => Self::from_yaml_str(text),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Renders the document; JSON output is pretty-printed.
    pub fn to_string(&self, format: SchemaFormat) -> Result<String> {
        match format {
            SchemaFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            SchemaFormat::Yaml => Ok(serde_yaml::to_string(self)?),
        }
    }

    /// Validates the command tree and flattens it into a [`CommandSchema`].
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::SchemaError`] with the first structural
    /// problem found.
    pub fn schema(&self) -> Result<CommandSchema> {
        Ok(CommandSchema::build(self.command.clone())?)
    }

    /// Builds a ready [`Parser`] using this document's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::SchemaError`] if the tree is invalid, uses a
    /// custom type missing from `registry`, or has a default that does not
    /// convert.
    pub fn build_parser(&self, registry: ConverterRegistry) -> Result<Parser> {
        let parser = Parser::new(self.schema()?, registry)?;
        Ok(parser.with_config(self.parser.clone()))
    }
}
