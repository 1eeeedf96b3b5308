//! In-process Python syntax checking built on tree-sitter.
//!
//! The source is parsed, never executed. [`checker::check`] renders the
//! first syntax error (or the all-clear message) as report text;
//! [`checker::find_syntax_issue`] returns it as data.

pub mod checker;
mod rules;

pub use checker::{check, find_syntax_issue, SyntaxIssue, NO_ERRORS};
