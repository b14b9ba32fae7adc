//! Running one test case through all three roles.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument};

use crate::config::{HarnessConfig, Role};
use crate::error::HarnessError;
use crate::process::{GenerationResult, invoke, invoke_each};
use crate::workspace::CaseWorkspace;

/// A discovered test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Directory basename.
    pub name: String,
    /// Absolute path of the case's input directory.
    pub input_path: PathBuf,
    /// Whether inputs are generated one file at a time.
    pub special: bool,
}

/// The three role results of one test case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCaseResult {
    pub reference: GenerationResult,
    pub candidate_default: GenerationResult,
    pub candidate_variant: GenerationResult,
}

impl TestCaseResult {
    #[must_use]
    pub fn get(&self, role: Role) -> &GenerationResult {
        match role {
            Role::Reference => &self.reference,
            Role::CandidateDefault => &self.candidate_default,
            Role::CandidateVariant => &self.candidate_variant,
        }
    }

    /// The worst of the three exit codes.
    #[must_use]
    pub fn overall_code(&self) -> i32 {
        Role::ALL
            .iter()
            .map(|role| self.get(*role).code)
            .max()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.overall_code() == 0
    }
}

/// Runs single test cases against a configuration.
#[derive(Debug, Clone, Copy)]
pub struct TestCaseRunner<'a> {
    config: &'a HarnessConfig,
}

impl<'a> TestCaseRunner<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self { config }
    }

    /// Prepares the case's output directories and runs the three roles
    /// concurrently.
    ///
    /// ## Errors
    ///
    /// Returns a `HarnessError` if the case name is unusable or its
    /// directories cannot be prepared. Generator failures are recorded in
    /// the result instead.
    #[instrument(skip(self, case), fields(case = %case.name))]
    pub async fn run(&self, case: &TestCase) -> Result<TestCaseResult, HarnessError> {
        let reference_dir = self.prepare(Role::Reference, case).await?;
        let default_dir = self.prepare(Role::CandidateDefault, case).await?;
        let variant_dir = self.prepare(Role::CandidateVariant, case).await?;

        let inputs = if case.special {
            list_input_files(&case.input_path).await?
        } else {
            vec![case.input_path.clone()]
        };

        let (reference, candidate_default, candidate_variant) = tokio::join!(
            self.run_role(Role::Reference, case.special, &inputs, &reference_dir),
            self.run_role(Role::CandidateDefault, case.special, &inputs, &default_dir),
            self.run_role(Role::CandidateVariant, case.special, &inputs, &variant_dir),
        );

        let result = TestCaseResult {
            reference,
            candidate_default,
            candidate_variant,
        };
        info!(code = result.overall_code(), "case finished");
        Ok(result)
    }

    async fn prepare(&self, role: Role, case: &TestCase) -> Result<PathBuf, HarnessError> {
        CaseWorkspace::new(self.config.role_root(role), &case.name)?
            .prepare(case.special)
            .await
    }

    async fn run_role(
        &self,
        role: Role,
        special: bool,
        inputs: &[PathBuf],
        output_dir: &Path,
    ) -> GenerationResult {
        let command = self.config.generator(role);
        match inputs {
            [input] if !special => invoke(command, role, input, output_dir).await,
            _ => invoke_each(command, role, inputs, output_dir).await,
        }
    }
}

/// Lists the regular files of a directory, sorted by name, skipping
/// dotfiles. Symlinks count as what they point to.
async fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let mut entries = fs::read_dir(dir).await.map_err(HarnessError::io(dir))?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(HarnessError::io(dir))? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        // Follows symlinks, so a linked input file is still an input.
        let metadata = fs::metadata(&path).await.map_err(HarnessError::io(&path))?;
        if metadata.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
