//! Schema document loading for the argmatch argument parser.
//!
//! This crate reads command-line interface definitions authored as JSON or
//! YAML documents and turns them into ready [`argmatch_core::Parser`]s.
//!
//! # Quick start
//!
//! ```no_run
//! use argmatch_core::ConverterRegistry;
//! use argmatch_loader::{SchemaCatalog, SchemaDocument};
//!
//! // A single document
//! let doc = SchemaDocument::load("schemas/greet.yaml").unwrap();
//! let parser = doc.build_parser(ConverterRegistry::new()).unwrap();
//! let result = parser.parse(["-v", "Alice"]);
//! println!("{} diagnostics", result.diagnostics().len());
//!
//! // Every document in a directory
//! let catalog = SchemaCatalog::from_dir("schemas/").unwrap();
//! println!("{} commands", catalog.len());
//! ```

mod catalog;
mod document;
mod error;

pub use catalog::SchemaCatalog;
pub use document::{SchemaDocument, SchemaFormat};
pub use error::{LoaderError, Result};
