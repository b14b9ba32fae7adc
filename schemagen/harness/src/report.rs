//! Console rendering of harness results.

use std::fmt::Write;

use colored::Colorize;

use crate::config::Role;
use crate::orchestrator::{CaseOutcome, HarnessReport};
use crate::process::GenerationResult;

/// Formats one case: a status line per role, plus captured output when
/// `verbose` is set.
pub fn format_case(outcome: &CaseOutcome, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", outcome.name.bold());

    match &outcome.result {
        Ok(result) => {
            for role in Role::ALL {
                let generation = result.get(role);
                let _ = writeln!(out, "  {:<18} {}", role.dir_name(), status(generation));
                if verbose {
                    echo(&mut out, "stdout", &generation.stdout);
                    echo(&mut out, "stderr", &generation.stderr);
                }
            }
        }
        Err(err) => {
            let _ = writeln!(out, "  {} {}", "error".red().bold(), err);
        }
    }

    out
}

/// Formats the final failing-case list, or `None` when every case passed.
pub fn format_failures(report: &HarnessReport) -> Option<String> {
    let failed = report.failed_cases();
    if failed.is_empty() {
        return None;
    }

    let mut out = format!("{}\n", "Failed test cases:".red().bold());
    for name in failed {
        let _ = writeln!(out, "  - {name}");
    }
    Some(out)
}

fn status(result: &GenerationResult) -> String {
    if result.succeeded() {
        "ok".green().to_string()
    } else {
        format!("failed (exit code {})", result.code).red().to_string()
    }
}

fn echo(out: &mut String, label: &str, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    let _ = writeln!(out, "    {}:", label.dimmed());
    for line in String::from_utf8_lossy(bytes).lines() {
        let _ = writeln!(out, "      {line}");
    }
}
