//! Directory-backed collections of schema documents.
//!
//! ```no_run
//! use argmatch_loader::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::from_dir("schemas/").unwrap();
//! for name in catalog.commands() {
//!     println!("{name}");
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::{SchemaDocument, SchemaFormat};
use crate::error::{LoaderError, Result};

/// Schema documents indexed by root command name.
///
/// Iteration order is sorted by command name.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    documents: BTreeMap<String, SchemaDocument>,
    sources: BTreeMap<String, PathBuf>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json`, `*.yaml` and `*.yml` file in a directory.
    ///
    /// Files with other extensions and subdirectories are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or parse error, or
    /// [`LoaderError::DuplicateCommand`] if two files define the same root
    /// command.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut catalog = Self::new();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if SchemaFormat::is_supported(&file_path) {
                files.push(file_path);
            } else {
                debug!(path = %file_path.display(), "skipping non-schema file");
            }
        }
        files.sort();

        for file in files {
            let doc = SchemaDocument::load(&file)?;
            catalog.insert_from(doc, Some(file))?;
        }

        if catalog.is_empty() {
            warn!(path = %path.display(), "no schema documents found");
        }
        Ok(catalog)
    }

    /// Adds a document.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::DuplicateCommand`] if a document with the same
    /// root command name is already present.
    pub fn insert(&mut self, doc: SchemaDocument) -> Result<()> {
        self.insert_from(doc, None)
    }

    fn insert_from(&mut self, doc: SchemaDocument, source: Option<PathBuf>) -> Result<()> {
        let name = doc.command.name.clone();
        if self.documents.contains_key(&name) {
            return Err(LoaderError::DuplicateCommand(name));
        }
        if let Some(source) = source {
            self.sources.insert(name.clone(), source);
        }
        self.documents.insert(name, doc);
        Ok(())
    }

    pub fn get(&self, command: &str) -> Option<&SchemaDocument> {
        self.documents.get(command)
    }

    pub fn contains(&self, command: &str) -> bool {
        self.documents.contains_key(command)
    }

    /// File the document for `command` was loaded from, if any.
    pub fn source(&self, command: &str) -> Option<&Path> {
        self.sources.get(command).map(PathBuf::as_path)
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = &SchemaDocument> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
