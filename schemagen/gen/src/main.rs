//! Schemagen Code Generator
//!
//! Generates Rust modules from parsed schema package models.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use schemagen_gen::codegen::GenerationMode;
use schemagen_gen::errors::GeneratorError;
use schemagen_gen::loader::{LoadOptions, ModelFormat, load_packages};
use schemagen_gen::output::{OutputOptions, assemble_all};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Schemagen code generator - transforms package models into Rust modules
#[derive(Parser, Debug)]
#[command(name = "schemagen-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Package model file, or a directory of model files
    input: PathBuf,

    /// Representation of generated messages
    #[arg(long, value_enum, default_value_t = ModeArg::Default)]
    mode: ModeArg,

    /// Model file format
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,

    /// Output directory for generated packages
    #[arg(short, long, default_value = "generated")]
    output: PathBuf,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Auto,
    Json,
    Yaml,
}

/// `reference` is accepted so the binary can stand in for the reference
/// generator; it produces the default representation.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Reference,
    Default,
    Variant,
}

impl From<ModeArg> for GenerationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Reference | ModeArg::Default => GenerationMode::Default,
            ModeArg::Variant => GenerationMode::Variant,
        }
    }
}

impl From<FormatArg> for Option<ModelFormat> {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => None,
            FormatArg::Json => Some(ModelFormat::Json),
            FormatArg::Yaml => Some(ModelFormat::Yaml),
        }
    }
}

fn main() -> Result<ExitCode, GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = LoadOptions {
        format: cli.format.into(),
    };
    let packages = load_packages(&cli.input, &options)?;
    let output = OutputOptions {
        dry_run: cli.dry_run,
        mode: cli.mode.into(),
    };
    debug!(count = packages.len(), output = %cli.output.display(), mode = ?output.mode, "generating packages");

    let mut failed = 0usize;
    for result in assemble_all(&packages, &cli.output, &output) {
        match result {
            Ok(assembled) if cli.dry_run => {
                println!("// {}", assembled.source_path.display());
                print!("{}", assembled.source);
                println!("// {}", assembled.index_path.display());
                print!("{}", assembled.index);
            }
            Ok(assembled) => {
                eprintln!("{} {}", "generated".green(), assembled.package);
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} {}", "error".red().bold(), err);
            }
        }
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{} of {} packages failed", failed, packages.len());
        Ok(ExitCode::FAILURE)
    }
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
