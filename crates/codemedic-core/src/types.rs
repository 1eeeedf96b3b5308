use std::fmt;

/// One of the three analysis steps of a checkup, in report order.
///
/// # Examples
///
/// ```
/// use codemedic_core::Stage;
///
/// assert_eq!(Stage::Syntax.heading(), "=== Syntax Analysis ===");
/// assert_eq!(Stage::ALL[2], Stage::Suggestions);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// In-process Python parse.
    Syntax,
    /// External lint tools.
    Static,
    /// Completion endpoint suggestions.
    Suggestions,
}

impl Stage {
    /// Every stage in the order it runs and prints.
    pub const ALL: [Stage; 3] = [Stage::Syntax, Stage::Static, Stage::Suggestions];

    /// Heading printed above the stage's output.
    pub fn heading(self) -> &'static str {
        match self {
            Stage::Syntax => "=== Syntax Analysis ===",
            Stage::Static => "=== Static Analysis ===",
            Stage::Suggestions => "=== AI-Powered Suggestions ===",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Syntax => write!(f, "syntax"),
            Stage::Static => write!(f, "static"),
            Stage::Suggestions => write!(f, "suggestions"),
        }
    }
}

/// Text produced by a single stage.
///
/// The body is advisory: a stage that failed internally still yields a
/// report whose body describes the failure.
///
/// # Examples
///
/// ```
/// use codemedic_core::{Stage, StageReport};
///
/// let report = StageReport::new(Stage::Syntax, "No syntax errors detected.");
/// assert_eq!(
///     report.to_string(),
///     "=== Syntax Analysis ===\nNo syntax errors detected."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Stage that produced this report.
    pub stage: Stage,
    /// Human-readable result text.
    pub body: String,
}

impl StageReport {
    /// Create a report for `stage`.
    pub fn new(stage: Stage, body: impl Into<String>) -> Self {
        Self {
            stage,
            body: body.into(),
        }
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.stage.heading(), self.body)
    }
}
