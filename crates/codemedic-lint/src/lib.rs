//! External static-analysis tools run as subprocesses.
//!
//! A tool's exit status is recorded but never treated as failure: linters
//! exit non-zero whenever they report findings.

pub mod runner;

pub use runner::{LintError, LintTool, StaticAnalysisRunner, ToolOutput};
