//! Schemagen comparison harness.
//!
//! Runs a reference generator and a candidate generator (in two modes) over
//! every test case directory, each role writing into its own isolated
//! output tree, and reports the cases where any run failed.
//!
//! ## Modules
//!
//! - [`config`] - Roles, generator programs and roots
//! - [`workspace`] - Per-case output directories and clearing
//! - [`process`] - Generator subprocess invocation
//! - [`runner`] - One test case across the three roles
//! - [`orchestrator`] - Discovery, whitelist selection and fan-out
//! - [`report`] - Console output
//! - [`error`] - Error types for the harness

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod runner;
pub mod workspace;
