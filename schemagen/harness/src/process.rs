//! Generator subprocess invocation and capture.
//!
//! A generator is run as
//! `<program> [args..] --mode <mode> --output <dir> <input>` with stdout and
//! stderr captured. Its exit code is only ever recorded, never turned into
//! an error.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::config::{GeneratorCommand, Role};

/// Exit code recorded when the generator cannot be started.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Exit code recorded when the generator was terminated by a signal.
pub const SIGNAL_CODE: i32 = 1;

/// Exit code recorded when a per-file run has no input files.
pub const NO_INPUT_CODE: i32 = 1;

/// Captured output of one role's run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub code: i32,
}

impl GenerationResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.code == 0
    }

    fn from_output(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code().unwrap_or(SIGNAL_CODE),
        }
    }

    fn spawn_failure(program: &Path, err: &std::io::Error) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: format!("failed to start {}: {err}\n", program.display()).into_bytes(),
            code: SPAWN_FAILURE_CODE,
        }
    }

    /// Appends another run's output; the first nonzero code is kept.
    fn absorb(&mut self, other: Self) {
        self.stdout.extend(other.stdout);
        self.stderr.extend(other.stderr);
        if self.code == 0 {
            self.code = other.code;
        }
    }
}

/// Runs the generator once for a role.
#[instrument(skip(command), fields(program = %command.program.display(), mode = role.mode()))]
pub async fn invoke(
    command: &GeneratorCommand,
    role: Role,
    input: &Path,
    output_dir: &Path,
) -> GenerationResult {
    let output = Command::new(&command.program)
        .args(&command.args)
        .arg("--mode")
        .arg(role.mode())
        .arg("--output")
        .arg(output_dir)
        .arg(input)
        .stdin(Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) => {
            let result = GenerationResult::from_output(output);
            debug!(code = result.code, "generator finished");
            result
        }
        Err(err) => {
            warn!(error = %err, "failed to start generator");
            GenerationResult::spawn_failure(&command.program, &err)
        }
    }
}

/// Runs the generator once per input, in order.
///
/// Every input is run even after a failure. Output is concatenated and the
/// first nonzero exit code becomes the role's code. An empty input list is
/// recorded as [`NO_INPUT_CODE`].
pub async fn invoke_each(
    command: &GeneratorCommand,
    role: Role,
    inputs: &[PathBuf],
    output_dir: &Path,
) -> GenerationResult {
    if inputs.is_empty() {
        warn!(mode = role.mode(), output = %output_dir.display(), "no input files to generate");
        return GenerationResult {
            stdout: Vec::new(),
            stderr: b"no input files\n".to_vec(),
            code: NO_INPUT_CODE,
        };
    }

    let mut combined = GenerationResult::default();
    for input in inputs {
        combined.absorb(invoke(command, role, input, output_dir).await);
    }
    combined
}
