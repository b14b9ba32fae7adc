//! Output assembly and file writing for generated packages.
//!
//! This module handles the final phase of code generation: rendering both
//! files of a package, and writing them to disk atomically.
//!
//! ## Output Structure
//!
//! A package `acme.health.v1` produces:
//! ```text
//! <root>/acme/health/v1/
//! ├── mod.rs         # Package source: enums, messages, services, imports
//! └── prelude.rs     # Index: re-exports of the package's export surface
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: the package model is validated before rendering
//! - **Canonical output**: both files go through the canonicalizer
//! - **No partial files**: both files are fully rendered in memory before
//!   anything is written, and each write uses the temp file + rename pattern

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::codegen::{GenerationMode, INDEX_MODULE};
use crate::errors::GeneratorError;
use crate::exports::build_exports;
use crate::model::PackageModel;
use crate::render::{RenderContext, TemplateId, render};
use crate::validation::validate_package;

/// File name of the package's primary source file.
pub const SOURCE_FILE: &str = "mod.rs";

/// How packages are assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Return the rendered files without writing them.
    pub dry_run: bool,
    pub mode: GenerationMode,
}

/// The rendered files of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPackage {
    /// Dotted package name.
    pub package: String,
    pub source_path: PathBuf,
    pub source: String,
    pub index_path: PathBuf,
    pub index: String,
}

/// Returns the directory a package is written to, below `output_root`.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use schemagen_gen::output::package_dir;
///
/// assert_eq!(
///     package_dir(Path::new("out"), "acme.health.v1"),
///     Path::new("out/acme/health/v1")
/// );
/// ```
pub fn package_dir(output_root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .fold(output_root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Renders both files of a package without touching the filesystem.
///
/// ## Errors
///
/// Returns a validation error from [`validate_package`] or
/// `GeneratorError::RenderError` tagged with the failing stage.
pub fn render_package(
    package: &PackageModel,
    output_root: &Path,
    mode: GenerationMode,
) -> Result<AssembledPackage, GeneratorError> {
    validate_package(package)?;

    let wrap = |source| GeneratorError::RenderError {
        package: package.name.clone(),
        source,
    };

    let source = render(
        TemplateId::PackageSource,
        &RenderContext::Source { package, mode },
    )
    .map_err(wrap)?;

    let exports = build_exports(package);
    debug!(package = %package.name, exports = exports.len(), "computed export surface");

    let index = render(
        TemplateId::PackageIndex,
        &RenderContext::Index {
            package,
            exports: &exports,
            package_short_name: package.short_name(),
        },
    )
    .map_err(wrap)?;

    let dir = package_dir(output_root, &package.name);
    Ok(AssembledPackage {
        package: package.name.clone(),
        source_path: dir.join(SOURCE_FILE),
        source,
        index_path: dir.join(format!("{INDEX_MODULE}.rs")),
        index,
    })
}

/// Writes content to a file atomically using temp file + rename.
///
/// This pattern ensures that:
/// - The file is never left in a partially-written state
/// - Other processes see either the old or new content, never a mix
///
/// Parent directories are created as needed.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    // Create parent directories if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    // Write to temp file first
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    // Atomically rename to final path
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    Ok(())
}

/// Renders a package and writes its two files below `output_root`.
///
/// With `options.dry_run` set, the rendered files are returned without
/// writing.
///
/// ## Examples
///
/// ```no_run
/// use std::path::Path;
/// use schemagen_gen::model::PackageModel;
/// use schemagen_gen::output::{OutputOptions, assemble};
///
/// let package = PackageModel::new("acme.v1");
/// let assembled = assemble(&package, Path::new("generated"), &OutputOptions::default()).unwrap();
/// println!("wrote {}", assembled.source_path.display());
/// ```
///
/// ## Errors
///
/// Returns an error if validation, rendering or writing fails. Nothing is
/// written when validation or rendering fails.
#[instrument(skip(package, output_root), fields(package = %package.name))]
pub fn assemble(
    package: &PackageModel,
    output_root: &Path,
    options: &OutputOptions,
) -> Result<AssembledPackage, GeneratorError> {
    let assembled = render_package(package, output_root, options.mode)?;

    if options.dry_run {
        debug!("dry run, skipping writes");
        return Ok(assembled);
    }

    write_atomic(&assembled.source_path, &assembled.source)?;
    write_atomic(&assembled.index_path, &assembled.index)?;
    info!(dir = %assembled.source_path.parent().unwrap_or(output_root).display(), "wrote package");

    Ok(assembled)
}

/// Assembles every package independently.
///
/// One package failing never stops the others; the result for each package
/// is returned in input order.
pub fn assemble_all(
    packages: &[PackageModel],
    output_root: &Path,
    options: &OutputOptions,
) -> Vec<Result<AssembledPackage, GeneratorError>> {
    packages
        .iter()
        .map(|package| {
            let result = assemble(package, output_root, options);
            if let Err(err) = &result {
                warn!(package = %package.name, error = %err, "failed to assemble package");
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RenderStage;
    use crate::test_utils::make_package;
    use tempfile::TempDir;

    const WRITE: OutputOptions = OutputOptions {
        dry_run: false,
        mode: GenerationMode::Default,
    };
    const DRY_RUN: OutputOptions = OutputOptions {
        dry_run: true,
        mode: GenerationMode::Default,
    };

    // === write_atomic tests ===

    #[test]
    fn write_atomic_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.rs");

        let content = "// Test content";
        let result = write_atomic(&file_path, content);

        assert!(result.is_ok());
        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/test.rs");

        assert!(write_atomic(&file_path, "// Nested content").is_ok());
        assert!(file_path.exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
    }

    #[test]
    fn write_atomic_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("clean.rs");

        write_atomic(&file_path, "// Content").unwrap();

        assert!(!file_path.with_extension("tmp").exists());
    }

    // === assemble tests ===

    #[test]
    fn assemble_writes_source_and_index() {
        let temp_dir = TempDir::new().unwrap();
        let package = make_package();

        let assembled = assemble(&package, temp_dir.path(), &WRITE).unwrap();

        let dir = temp_dir.path().join("acme/health/v1");
        assert_eq!(assembled.source_path, dir.join("mod.rs"));
        assert_eq!(assembled.index_path, dir.join("prelude.rs"));
        assert_eq!(fs::read_to_string(dir.join("mod.rs")).unwrap(), assembled.source);
        assert_eq!(fs::read_to_string(dir.join("prelude.rs")).unwrap(), assembled.index);
    }

    #[test]
    fn assemble_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();

        let assembled = assemble(&make_package(), temp_dir.path(), &DRY_RUN).unwrap();

        assert!(assembled.source.contains("pub enum Status"));
        assert!(!assembled.source_path.exists());
        assert!(!assembled.index_path.exists());
    }

    #[test]
    fn assemble_is_deterministic() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let package = make_package();

        let a = assemble(&package, first.path(), &WRITE).unwrap();
        let b = assemble(&package, second.path(), &WRITE).unwrap();

        assert_eq!(
            fs::read(&a.source_path).unwrap(),
            fs::read(&b.source_path).unwrap()
        );
        assert_eq!(
            fs::read(&a.index_path).unwrap(),
            fs::read(&b.index_path).unwrap()
        );
    }

    #[test]
    fn failed_render_leaves_existing_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("acme/health/v1");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mod.rs"), "// previous").unwrap();

        let mut package = make_package();
        package.imports.push("use ;".to_string());

        let err = assemble(&package, temp_dir.path(), &WRITE).unwrap_err();

        match err {
            GeneratorError::RenderError { source, .. } => {
                assert_eq!(source.stage(), RenderStage::Canonicalization)
            }
            other => panic!("expected RenderError, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(dir.join("mod.rs")).unwrap(), "// previous");
        assert!(!dir.join("prelude.rs").exists());
    }

    #[test]
    fn assemble_all_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = make_package();
        let mut bad = make_package();
        bad.name = "acme.broken".to_string();
        bad.imports.push("use ;".to_string());
        let mut other = make_package();
        other.name = "acme.other".to_string();

        let results = assemble_all(&[good, bad, other], temp_dir.path(), &WRITE);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert!(temp_dir.path().join("acme/other/prelude.rs").exists());
        assert!(!temp_dir.path().join("acme/broken").exists());
    }

    #[test]
    fn variant_mode_changes_only_messages() {
        let temp_dir = TempDir::new().unwrap();
        let package = make_package();
        let variant = OutputOptions {
            dry_run: true,
            mode: GenerationMode::Variant,
        };

        let plain = assemble(&package, temp_dir.path(), &DRY_RUN).unwrap();
        let built = assemble(&package, temp_dir.path(), &variant).unwrap();

        assert!(!plain.source.contains("fn with_id"));
        assert!(built.source.contains("#[non_exhaustive]"));
        assert!(built.source.contains("pub fn with_id(mut self, value: u64) -> Self"));
        assert_eq!(plain.index, built.index);
    }

    #[test]
    fn index_reexports_export_surface() {
        let temp_dir = TempDir::new().unwrap();
        let assembled = assemble(&make_package(), temp_dir.path(), &DRY_RUN).unwrap();

        for symbol in ["CheckReply", "CheckRequest", "HealthBase", "HealthStub", "Status"] {
            assert!(
                assembled.index.contains(&format!("pub use super::{symbol};")),
                "missing re-export of {symbol}"
            );
        }
        assert!(assembled.index.contains("pub use super::common::Timestamp;"));
    }
}
