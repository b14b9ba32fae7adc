//! Schemagen Harness
//!
//! Compares a reference generator against the candidate over all test cases.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use schemagen_harness::config::{GeneratorCommand, HarnessConfig};
use schemagen_harness::error::HarnessError;
use schemagen_harness::orchestrator::TestOrchestrator;
use schemagen_harness::report::{format_case, format_failures};
use tracing_subscriber::EnvFilter;

/// Runs reference and candidate generators over every test case
#[derive(Parser, Debug)]
#[command(name = "schemagen-harness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing one subdirectory per test case
    #[arg(long, default_value = "tests/inputs")]
    inputs: PathBuf,

    /// Directory receiving one output tree per role
    #[arg(long, default_value = "tests/outputs")]
    outputs: PathBuf,

    /// Reference generator program
    #[arg(long)]
    reference: PathBuf,

    /// Candidate generator program
    #[arg(long)]
    candidate: PathBuf,

    /// Extra argument passed to every generator run (repeatable)
    #[arg(long = "generator-arg", value_name = "ARG", allow_hyphen_values = true)]
    generator_args: Vec<String>,

    /// Case whose input files are generated one at a time (repeatable)
    #[arg(long = "special", value_name = "CASE")]
    special_cases: Vec<String>,

    /// Echo captured generator output (-v); -vv also enables debug logs
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Test case names or input directory paths to run (default: all)
    #[arg(value_name = "CASE")]
    whitelist: Vec<String>,
}

impl Cli {
    fn into_config(self) -> (HarnessConfig, Vec<String>) {
        let config = HarnessConfig::new(
            self.inputs,
            self.outputs,
            GeneratorCommand::new(self.reference).with_args(self.generator_args.clone()),
            GeneratorCommand::new(self.candidate).with_args(self.generator_args),
        )
        .with_verbose(self.verbose > 0);

        let config = self
            .special_cases
            .into_iter()
            .fold(config, |config, name| config.with_special_case(name));

        (config, self.whitelist)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, HarnessError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, whitelist) = cli.into_config();
    config.validate()?;
    let verbose = config.verbose;

    let report = TestOrchestrator::new(config).run_all(&whitelist).await?;

    for outcome in &report.outcomes {
        print!("{}", format_case(outcome, verbose));
    }
    if let Some(failures) = format_failures(&report) {
        eprint!("{failures}");
    }

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            _ => "debug".to_string(),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
