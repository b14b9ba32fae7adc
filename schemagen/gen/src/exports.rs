//! Export surface computation.
//!
//! The export surface of a package is the sorted, deduplicated list of symbol
//! names its index file (`prelude.rs`) re-exports. It combines:
//!
//! - symbols declared in the package: every enum, every message, and for
//!   every service both `<Name>Base` and `<Name>Stub`
//! - symbols pulled in from a subpackage by a relative import of exactly one
//!   name, e.g. `use self::common::Timestamp;`
//!
//! Import lines of any other shape (absolute paths, groups, globs, renames,
//! or text that is not an import at all) are skipped without error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::PackageModel;

/// `[pub[(..)]] use self::<sub>[::<sub>]*::<Ident>;`
static RELATIVE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?use\s+self\s*::\s*((?:[A-Za-z_][A-Za-z0-9_]*\s*::\s*)+)([A-Za-z_][A-Za-z0-9_]*)\s*;\s*$",
    )
    .expect("relative import pattern is valid")
});

/// Where an exported symbol is defined, relative to the package module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportOrigin {
    /// Declared in the package's own source file.
    Package,
    /// Imported from a subpackage; holds the module path below the package.
    Subpackage(Vec<String>),
}

/// One re-exported symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    pub origin: ExportOrigin,
}

/// Sorted, deduplicated set of symbols a package re-exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSurface {
    entries: Vec<ExportEntry>,
}

impl ExportSurface {
    /// Symbol names in code point order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    #[must_use]
    pub fn entries(&self) -> &[ExportEntry] {
        &self.entries
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
            .is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A relative import of one symbol from a subpackage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeImport {
    pub subpackage: Vec<String>,
    pub symbol: String,
}

/// Matches an import line against the relative-import shape.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::exports::parse_relative_import;
///
/// let import = parse_relative_import("use self::common::Timestamp;").unwrap();
/// assert_eq!(import.subpackage, vec!["common"]);
/// assert_eq!(import.symbol, "Timestamp");
///
/// assert!(parse_relative_import("use std::fmt::Display;").is_none());
/// assert!(parse_relative_import("use self::common::{A, B};").is_none());
/// ```
pub fn parse_relative_import(line: &str) -> Option<RelativeImport> {
    let captures = RELATIVE_IMPORT.captures(line)?;
    let subpackage: Vec<String> = captures[1]
        .split("::")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();
    let symbol = captures[2].to_string();

    if is_path_keyword(&symbol) || subpackage.iter().any(|s| is_path_keyword(s)) {
        return None;
    }

    Some(RelativeImport { subpackage, symbol })
}

fn is_path_keyword(segment: &str) -> bool {
    matches!(segment, "self" | "Self" | "super" | "crate")
}

/// Computes the export surface of a package.
///
/// When a name is both declared in the package and imported from a
/// subpackage it appears once, with [`ExportOrigin::Package`].
pub fn build_exports(package: &PackageModel) -> ExportSurface {
    let mut symbols: BTreeMap<String, ExportOrigin> = BTreeMap::new();

    for import in package.imports.iter().filter_map(|line| parse_relative_import(line)) {
        symbols
            .entry(import.symbol)
            .or_insert(ExportOrigin::Subpackage(import.subpackage));
    }

    let declared = package
        .enums
        .iter()
        .map(|e| e.name.clone())
        .chain(package.messages.iter().map(|m| m.name.clone()))
        .chain(
            package
                .services
                .iter()
                .flat_map(|s| [s.base_name(), s.stub_name()]),
        );

    for name in declared {
        symbols.insert(name, ExportOrigin::Package);
    }

    ExportSurface {
        entries: symbols
            .into_iter()
            .map(|(name, origin)| ExportEntry { name, origin })
            .collect(),
    }
}
