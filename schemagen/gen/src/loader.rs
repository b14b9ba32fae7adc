//! Loading package models produced by the schema parser.
//!
//! The parser runs out of process and hands its output over as a serialized
//! document: either a single package or a list of packages, in JSON or YAML.
//! Which decoder is used is an explicit [`LoadOptions`] setting; when it is
//! left unset the format is inferred from the file extension.
//!
//! The input may also be a directory of model documents. Its non-hidden
//! regular files are loaded in path order and their packages concatenated.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::GeneratorError;
use crate::model::PackageModel;

/// Serialization format of a model document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Yaml,
}

impl ModelFormat {
    /// Infers the format from a file extension (`json`, `yaml`, `yml`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Options for the model loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Decoder to use; `None` infers it from the file extension.
    pub format: Option<ModelFormat>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelDocument {
    Many(Vec<PackageModel>),
    One(PackageModel),
}

/// Parses a model document from text.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::loader::{ModelFormat, parse_packages};
///
/// let packages = parse_packages(r#"{ "name": "acme.v1" }"#, ModelFormat::Json).unwrap();
/// assert_eq!(packages[0].name, "acme.v1");
/// ```
///
/// ## Errors
///
/// Returns the decoder's message if the text is not a package or a list of
/// packages.
pub fn parse_packages(text: &str, format: ModelFormat) -> Result<Vec<PackageModel>, String> {
    let document: ModelDocument = match format {
        ModelFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
        ModelFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string())?,
    };

    Ok(match document {
        ModelDocument::Many(packages) => packages,
        ModelDocument::One(package) => vec![package],
    })
}

/// Loads package models from a file or a directory of files.
///
/// In a directory without an explicit format, only files with a known
/// extension are read.
///
/// ## Errors
///
/// Returns `GeneratorError::LoadError` if the format cannot be determined,
/// a file cannot be read, or its contents do not decode.
#[instrument(skip(options))]
pub fn load_packages(
    path: &Path,
    options: &LoadOptions,
) -> Result<Vec<PackageModel>, GeneratorError> {
    if !fs::metadata(path).is_ok_and(|meta| meta.is_dir()) {
        return load_file(path, options);
    }

    let mut packages = Vec::new();
    for file in model_files(path, options)? {
        packages.extend(load_file(&file, options)?);
    }
    debug!(dir = %path.display(), count = packages.len(), "loaded model directory");
    Ok(packages)
}

fn model_files(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, GeneratorError> {
    let load_error = |err: std::io::Error| GeneratorError::LoadError {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(load_error)? {
        let path = entry.map_err(load_error)?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_none_or(|name| name.starts_with('.'));
        let known = options.format.is_some() || ModelFormat::from_path(&path).is_some();
        if !hidden && known && fs::metadata(&path).is_ok_and(|meta| meta.is_file()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_file(path: &Path, options: &LoadOptions) -> Result<Vec<PackageModel>, GeneratorError> {
    let load_error = |reason: String| GeneratorError::LoadError {
        path: path.to_path_buf(),
        reason,
    };

    let format = options
        .format
        .or_else(|| ModelFormat::from_path(path))
        .ok_or_else(|| {
            load_error("cannot infer the model format from the file extension".to_string())
        })?;

    let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    let packages = parse_packages(&text, format).map_err(load_error)?;

    debug!(?format, count = packages.len(), "loaded package models");
    Ok(packages)
}
