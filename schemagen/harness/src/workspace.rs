//! Per-case output directories.
//!
//! Every role gets one directory per test case below its role root. A
//! [`CaseWorkspace`] is the only thing in the harness that deletes files,
//! and it can only delete inside its own case directory.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::HarnessError;

/// The output directory of one case for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseWorkspace {
    role_root: PathBuf,
    case: String,
}

impl CaseWorkspace {
    /// Creates the workspace for `case` below `role_root`.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::InvalidCaseKey` unless `case` is a single
    /// normal path component (no separators, `.` or `..`).
    pub fn new(role_root: impl Into<PathBuf>, case: &str) -> Result<Self, HarnessError> {
        validate_case_key(case)?;
        Ok(Self {
            role_root: role_root.into(),
            case: case.to_string(),
        })
    }

    /// `<role root>/<case>`
    #[must_use]
    pub fn case_dir(&self) -> PathBuf {
        self.role_root.join(&self.case)
    }

    /// Directory handed to the generator: the case directory, or
    /// `<case>/<case>` for special cases.
    #[must_use]
    pub fn output_dir(&self, special: bool) -> PathBuf {
        let dir = self.case_dir();
        if special { dir.join(&self.case) } else { dir }
    }

    /// Removes everything inside the case directory, keeping the directory.
    ///
    /// A missing case directory is not an error.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::Io` if an entry cannot be listed or removed.
    pub async fn clear_own_subtree(&self) -> Result<(), HarnessError> {
        let dir = self.case_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(HarnessError::io(&dir)(err)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(HarnessError::io(&dir))? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(HarnessError::io(&path))?;
            let removed = if file_type.is_dir() {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };
            removed.map_err(HarnessError::io(&path))?;
        }

        debug!(dir = %dir.display(), "cleared case directory");
        Ok(())
    }

    /// Clears the case directory and creates the generator output directory.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::Io` if clearing or creating fails.
    pub async fn prepare(&self, special: bool) -> Result<PathBuf, HarnessError> {
        self.clear_own_subtree().await?;
        let dir = self.output_dir(special);
        fs::create_dir_all(&dir).await.map_err(HarnessError::io(&dir))?;
        Ok(dir)
    }
}

fn validate_case_key(case: &str) -> Result<(), HarnessError> {
    let mut components = Path::new(case).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == case => Ok(()),
        _ => Err(HarnessError::InvalidCaseKey(case.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn accepts_plain_names() {
        for name in ["bool", "enum_values", "proto2-dupes", "v1.2"] {
            assert!(CaseWorkspace::new("out", name).is_ok(), "rejected '{name}'");
        }
    }

    #[test]
    fn rejects_names_that_escape() {
        for name in ["", ".", "..", "a/b", "/abs", "a/", "../x"] {
            assert!(
                matches!(CaseWorkspace::new("out", name), Err(HarnessError::InvalidCaseKey(_))),
                "accepted '{name}'"
            );
        }
    }

    #[test]
    fn special_output_dir_is_nested() {
        let workspace = CaseWorkspace::new("out/reference", "dupes").unwrap();

        assert_eq!(workspace.output_dir(false), Path::new("out/reference/dupes"));
        assert_eq!(workspace.output_dir(true), Path::new("out/reference/dupes/dupes"));
    }

    #[tokio::test]
    async fn clear_keeps_directory_and_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("a/nested")).unwrap();
        std::fs::write(root.join("a/stale.rs"), "old").unwrap();
        std::fs::write(root.join("a/nested/deep.rs"), "old").unwrap();
        std::fs::create_dir_all(root.join("b")).unwrap();
        std::fs::write(root.join("b/keep.rs"), "keep").unwrap();

        CaseWorkspace::new(root, "a")
            .unwrap()
            .clear_own_subtree()
            .await
            .unwrap();

        assert!(root.join("a").is_dir());
        assert_eq!(std::fs::read_dir(root.join("a")).unwrap().count(), 0);
        assert!(root.join("b/keep.rs").is_file());
    }

    #[tokio::test]
    async fn clear_missing_directory_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = CaseWorkspace::new(temp_dir.path(), "never").unwrap();

        assert!(workspace.clear_own_subtree().await.is_ok());
        assert!(!temp_dir.path().join("never").exists());
    }

    #[tokio::test]
    async fn prepare_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = CaseWorkspace::new(temp_dir.path(), "dupes").unwrap();

        let dir = workspace.prepare(true).await.unwrap();

        assert_eq!(dir, temp_dir.path().join("dupes/dupes"));
        assert!(dir.is_dir());
    }
}
