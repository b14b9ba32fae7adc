//! Harness configuration.
//!
//! [`HarnessConfig`] is a plain struct. The binary builds it from its
//! command line; tests build it directly.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// One of the three generator runs made for every test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// The reference generator.
    Reference,
    /// The candidate generator in its default mode.
    CandidateDefault,
    /// The candidate generator in its variant mode.
    CandidateVariant,
}

impl Role {
    /// All roles, in reporting order.
    pub const ALL: [Role; 3] = [Role::Reference, Role::CandidateDefault, Role::CandidateVariant];

    /// Directory below the output root that holds this role's case outputs.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::CandidateDefault => "candidate-default",
            Self::CandidateVariant => "candidate-variant",
        }
    }

    /// Value passed to the generator's `--mode` flag.
    #[must_use]
    pub const fn mode(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::CandidateDefault => "default",
            Self::CandidateVariant => "variant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// An external generator program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
    pub program: PathBuf,
    /// Arguments placed before the `--mode`/`--output` arguments.
    pub args: Vec<String>,
}

impl GeneratorCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Everything the harness needs to run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory whose immediate subdirectories are the test cases.
    pub inputs_root: PathBuf,
    /// Directory that receives one output tree per role.
    pub output_root: PathBuf,
    pub reference: GeneratorCommand,
    /// Run twice per case, once per candidate mode.
    pub candidate: GeneratorCommand,
    /// Cases whose input files are generated one at a time.
    pub special_cases: BTreeSet<String>,
    /// Echo captured generator output.
    pub verbose: bool,
}

impl HarnessConfig {
    pub fn new(
        inputs_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        reference: GeneratorCommand,
        candidate: GeneratorCommand,
    ) -> Self {
        Self {
            inputs_root: inputs_root.into(),
            output_root: output_root.into(),
            reference,
            candidate,
            special_cases: BTreeSet::new(),
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_special_case(mut self, name: impl Into<String>) -> Self {
        self.special_cases.insert(name.into());
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The program run for a role.
    #[must_use]
    pub fn generator(&self, role: Role) -> &GeneratorCommand {
        match role {
            Role::Reference => &self.reference,
            Role::CandidateDefault | Role::CandidateVariant => &self.candidate,
        }
    }

    #[must_use]
    pub fn is_special(&self, case: &str) -> bool {
        self.special_cases.contains(case)
    }

    /// Output directory of a role, below the output root.
    #[must_use]
    pub fn role_root(&self, role: Role) -> PathBuf {
        self.output_root.join(role.dir_name())
    }

    /// Checks that the inputs root is a directory and the roots differ.
    ///
    /// ## Errors
    ///
    /// Returns `HarnessError::Config` describing the first problem found.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if !self.inputs_root.is_dir() {
            return Err(HarnessError::Config(format!(
                "inputs root {} is not a directory",
                self.inputs_root.display()
            )));
        }
        if same_path(&self.inputs_root, &self.output_root) {
            return Err(HarnessError::Config(
                "inputs root and output root must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
