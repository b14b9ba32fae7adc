//! Schemagen code generator library.
//!
//! This crate turns parsed schema packages into Rust modules. Each package
//! produces two files:
//!
//! - `mod.rs`: the package source with enums, messages, the package's own
//!   imports, and a `<Name>Base` trait plus `<Name>Stub<C>` client per service
//! - `prelude.rs`: an index re-exporting the package's export surface
//!
//! Every file passes through the [`canonical`] formatter, so output is
//! byte-for-byte deterministic for a given model.
//!
//! ## Modules
//!
//! - [`model`] - Package model handed over by the schema parser
//! - [`loader`] - Reading package models from JSON or YAML files or directories
//! - [`validation`] - Pre-generation checks on names and symbols
//! - [`codegen`] - Token builders for the package source and index
//! - [`render`] - Binding templates to a context and canonicalizing
//! - [`canonical`] - Import ordering and pretty printing
//! - [`exports`] - Export surface computation
//! - [`output`] - Final assembly and atomic file writing
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use schemagen_gen::loader::{LoadOptions, load_packages};
//! use schemagen_gen::output::{OutputOptions, assemble_all};
//!
//! let packages = load_packages(Path::new("model.json"), &LoadOptions::default()).unwrap();
//! for result in assemble_all(&packages, Path::new("generated"), &OutputOptions::default()) {
//!     match result {
//!         Ok(assembled) => println!("wrote {}", assembled.source_path.display()),
//!         Err(err) => eprintln!("{err}"),
//!     }
//! }
//! ```

pub mod canonical;
pub mod codegen;
pub mod errors;
pub mod exports;
pub mod loader;
pub mod model;
pub mod naming;
pub mod output;
pub mod render;
pub mod validation;

#[cfg(test)]
mod test_utils;
