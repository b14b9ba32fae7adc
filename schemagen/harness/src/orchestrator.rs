//! Test case discovery, selection and fan-out.
//!
//! ## Examples
//!
//! ```no_run
//! use schemagen_harness::config::{GeneratorCommand, HarnessConfig};
//! use schemagen_harness::orchestrator::TestOrchestrator;
//!
//! # async fn example() {
//! let config = HarnessConfig::new(
//!     "inputs",
//!     "outputs",
//!     GeneratorCommand::new("reference-gen"),
//!     GeneratorCommand::new("schemagen-gen"),
//! );
//! let report = TestOrchestrator::new(config).run_all(&[]).await.unwrap();
//! std::process::exit(report.exit_code());
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use futures::future::join_all;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::runner::{TestCase, TestCaseResult, TestCaseRunner};

/// Directory names that are never test cases.
const IGNORED_DIRS: [&str; 2] = ["__pycache__", "target"];

/// Which discovered cases to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Only {
        names: BTreeSet<String>,
        paths: BTreeSet<PathBuf>,
    },
}

impl Selection {
    /// Builds a selection from whitelist items.
    ///
    /// An item equal to a discovered case name selects by name; any other
    /// item is a path, resolved against `base` when relative. An empty
    /// whitelist selects everything.
    pub fn from_whitelist(items: &[String], cases: &[TestCase], base: &Path) -> Self {
        if items.is_empty() {
            return Self::All;
        }

        let known: BTreeSet<&str> = cases.iter().map(|case| case.name.as_str()).collect();
        let (names, paths): (Vec<&String>, Vec<&String>) = items
            .iter()
            .partition(|item| known.contains(item.as_str()));

        Self::Only {
            names: names.into_iter().cloned().collect(),
            paths: paths
                .into_iter()
                .map(|item| resolve_path(base, Path::new(item)))
                .collect(),
        }
    }

    #[must_use]
    pub fn includes(&self, case: &TestCase) -> bool {
        match self {
            Self::All => true,
            Self::Only { names, paths } => {
                names.contains(&case.name) || paths.contains(&case.input_path)
            }
        }
    }
}

/// Outcome of one selected case.
#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub result: Result<TestCaseResult, HarnessError>,
}

impl CaseOutcome {
    /// A case fails when any role failed or the case could not run.
    #[must_use]
    pub fn failed(&self) -> bool {
        !matches!(&self.result, Ok(result) if result.passed())
    }
}

/// Aggregated outcome of a harness run.
#[derive(Debug, Default)]
pub struct HarnessReport {
    /// Outcomes in case-name order.
    pub outcomes: Vec<CaseOutcome>,
}

impl HarnessReport {
    /// Names of the failing cases, sorted.
    #[must_use]
    pub fn failed_cases(&self) -> Vec<&str> {
        let mut failed: Vec<&str> = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.failed())
            .map(|outcome| outcome.name.as_str())
            .collect();
        failed.sort_unstable();
        failed
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| !outcome.failed())
    }

    /// Process exit code: 0 on success, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() { 0 } else { 1 }
    }
}

/// Discovers, selects and runs test cases.
#[derive(Debug, Clone)]
pub struct TestOrchestrator {
    config: HarnessConfig,
}

impl TestOrchestrator {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Lists the test cases below the inputs root, sorted by name.
    ///
    /// Hidden directories and build or cache directories are skipped.
    /// Symlinks to directories are cases too.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::Discovery` if the inputs root cannot be read.
    pub async fn discover(&self) -> Result<Vec<TestCase>, HarnessError> {
        let root = &self.config.inputs_root;
        let discovery_error = |source| HarnessError::Discovery {
            path: root.clone(),
            source,
        };

        let base = std::env::current_dir().map_err(discovery_error)?;
        let absolute_root = resolve_path(&base, root);
        let mut entries = fs::read_dir(root).await.map_err(discovery_error)?;
        let mut cases = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(discovery_error)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || IGNORED_DIRS.contains(&name.as_str()) {
                continue;
            }
            // Symlinked case directories are followed; dangling links are skipped.
            let path = entry.path();
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_dir() => {}
                Ok(_) => continue,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable input entry");
                    continue;
                }
            }

            cases.push(TestCase {
                special: self.config.is_special(&name),
                input_path: absolute_root.join(&name),
                name,
            });
        }

        cases.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = cases.len(), "discovered test cases");
        Ok(cases)
    }

    /// Runs every selected case concurrently and collects the outcomes.
    ///
    /// Whitelist items are case names or paths (relative to the current
    /// directory). Every selected case runs to completion; a failing case
    /// never cancels the others.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::Discovery` if test cases cannot be listed.
    #[instrument(skip(self))]
    pub async fn run_all(&self, whitelist: &[String]) -> Result<HarnessReport, HarnessError> {
        let cases = self.discover().await?;
        let base = std::env::current_dir().map_err(|source| HarnessError::Discovery {
            path: self.config.inputs_root.clone(),
            source,
        })?;
        let selection = Selection::from_whitelist(whitelist, &cases, &base);

        let selected: Vec<TestCase> = cases
            .into_iter()
            .filter(|case| selection.includes(case))
            .collect();
        info!(count = selected.len(), "running test cases");

        let runner = TestCaseRunner::new(&self.config);
        let results = join_all(selected.iter().map(|case| runner.run(case))).await;

        let outcomes = selected
            .into_iter()
            .zip(results)
            .map(|(case, result)| {
                if let Err(err) = &result {
                    warn!(case = %case.name, error = %err, "test case could not run");
                }
                CaseOutcome {
                    name: case.name,
                    result,
                }
            })
            .collect();

        Ok(HarnessReport { outcomes })
    }
}

/// Makes `path` absolute against `base` and removes `.` and `..`
/// components lexically.
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
