//! Error types for the schemagen generator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The canonicalizer received text that does not parse as a Rust file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid source at {line}:{column}: {message}")]
pub struct FormattingError {
    pub message: String,
    /// 1-based line of the first syntax error.
    pub line: usize,
    /// 0-based column of the first syntax error.
    pub column: usize,
}

impl From<syn::Error> for FormattingError {
    fn from(err: syn::Error) -> Self {
        let start = err.span().start();
        Self {
            message: err.to_string(),
            line: start.line,
            column: start.column,
        }
    }
}

/// Which step of rendering failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Binding the context to the template.
    Binding,
    /// Canonicalizing the rendered text.
    Canonicalization,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binding => f.write_str("binding"),
            Self::Canonicalization => f.write_str("canonicalization"),
        }
    }
}

/// A template could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The context could not be bound to the template.
    #[error("template '{template}' failed during binding: {reason}")]
    Binding {
        template: &'static str,
        reason: String,
    },

    /// The rendered text was rejected by the canonicalizer.
    #[error("template '{template}' failed during canonicalization: {source}")]
    Canonicalization {
        template: &'static str,
        #[source]
        source: FormattingError,
    },
}

impl RenderError {
    /// The stage that failed.
    #[must_use]
    pub fn stage(&self) -> RenderStage {
        match self {
            Self::Binding { .. } => RenderStage::Binding,
            Self::Canonicalization { .. } => RenderStage::Canonicalization,
        }
    }
}

/// Errors that can occur while generating a package.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to load package models
    #[error("Failed to load package models from '{path}': {reason}")]
    LoadError { path: PathBuf, reason: String },

    /// Failed to render a template
    #[error("Failed to render package '{package}': {source}")]
    RenderError {
        package: String,
        #[source]
        source: RenderError,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The package name is not a usable dotted path.
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    /// A model name cannot be turned into a Rust identifier.
    #[error("Invalid identifier '{name}' in package '{package}'")]
    InvalidIdentifier { package: String, name: String },

    /// Two generated symbols in one package share a name.
    ///
    /// Service names count twice, as `<Name>Base` and `<Name>Stub`.
    #[error("Duplicate symbol '{symbol}' in package '{package}'")]
    DuplicateSymbol { package: String, symbol: String },

    /// Two variants, fields or methods of one entity share a name.
    ///
    /// Method names are compared after conversion to `snake_case`.
    #[error("Duplicate member '{member}' in '{owner}' of package '{package}'")]
    DuplicateMember {
        package: String,
        owner: String,
        member: String,
    },

    /// An enum declares no variants.
    #[error("Enum '{name}' in package '{package}' has no variants")]
    EmptyEnum { package: String, name: String },

    /// Two variants of one enum share a wire value.
    #[error("Enum '{name}' in package '{package}' assigns value {value} more than once")]
    DuplicateEnumValue {
        package: String,
        name: String,
        value: i32,
    },
}
