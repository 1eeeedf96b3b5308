use std::path::{Path, PathBuf};
use std::process::Command;

/// An external analysis tool invoked as `<program> <file>`.
///
/// # Examples
///
/// ```
/// use codemedic_lint::LintTool;
///
/// let tool = LintTool::new("Pylint", "pylint");
/// assert_eq!(tool.program, "pylint");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintTool {
    /// Section label used in the report (`"<label> Output:"`).
    pub label: String,
    /// Executable name looked up on `PATH`, or a path to it.
    pub program: String,
}

impl LintTool {
    /// Create a tool description.
    pub fn new(label: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
        }
    }
}

/// Everything a tool printed, plus how it exited.
///
/// Exit status is data. A non-zero exit is an ordinary result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Label of the tool that produced this output.
    pub label: String,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code, or `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    /// Standard output if non-empty, otherwise standard error.
    ///
    /// # Examples
    ///
    /// ```
    /// use codemedic_lint::ToolOutput;
    ///
    /// let out = ToolOutput {
    ///     label: "Flake8".into(),
    ///     stdout: String::new(),
    ///     stderr: "usage: flake8".into(),
    ///     exit_code: Some(2),
    /// };
    /// assert_eq!(out.text(), "usage: flake8");
    /// ```
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// Reasons the static-analysis stage could not collect output.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// A tool executable is not on `PATH`.
    #[error("{program}: {reason}")]
    ToolNotFound {
        /// Program that could not be located.
        program: String,
        /// Lookup failure detail.
        reason: String,
    },

    /// The tool exists but could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Runs two lint tools against a file and reports their output in order.
///
/// # Examples
///
/// ```
/// use codemedic_lint::StaticAnalysisRunner;
///
/// let runner = StaticAnalysisRunner::default();
/// let labels: Vec<&str> = runner.tools().iter().map(|t| t.label.as_str()).collect();
/// assert_eq!(labels, vec!["Pylint", "Flake8"]);
/// ```
#[derive(Debug, Clone)]
pub struct StaticAnalysisRunner {
    tools: [LintTool; 2],
}

impl Default for StaticAnalysisRunner {
    fn default() -> Self {
        Self::new(
            LintTool::new("Pylint", "pylint"),
            LintTool::new("Flake8", "flake8"),
        )
    }
}

impl StaticAnalysisRunner {
    /// Create a runner for `first` then `second`.
    pub fn new(first: LintTool, second: LintTool) -> Self {
        Self {
            tools: [first, second],
        }
    }

    /// The configured tools in report order.
    pub fn tools(&self) -> &[LintTool] {
        &self.tools
    }

    /// Run both tools on `path` and render their output as report text.
    ///
    /// Never fails: a missing tool or a spawn failure becomes a single
    /// descriptive message instead of partial output.
    pub fn run(&self, path: &Path) -> String {
        match self.collect(path) {
            Ok(outputs) => render(&outputs),
            Err(e @ LintError::ToolNotFound { .. }) => format!(
                "Error: Required tool not found. Please ensure {} and {} are installed. {e}",
                self.tools[0].program, self.tools[1].program
            ),
            Err(e) => format!("Error running static analysis: {e}"),
        }
    }

    /// Run both tools on `path` and return their raw output.
    ///
    /// Both executables are resolved before either is started, so a missing
    /// second tool means the first one never runs.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::ToolNotFound`] if either tool is not on `PATH`,
    /// or [`LintError::Spawn`] if a located tool cannot be started.
    pub fn collect(&self, path: &Path) -> Result<Vec<ToolOutput>, LintError> {
        let resolved = self
            .tools
            .iter()
            .map(|tool| resolve(&tool.program).map(|exe| (tool, exe)))
            .collect::<Result<Vec<_>, _>>()?;

        resolved
            .into_iter()
            .map(|(tool, exe)| run_tool(tool, &exe, path))
            .collect()
    }
}

fn resolve(program: &str) -> Result<PathBuf, LintError> {
    which::which(program).map_err(|e| LintError::ToolNotFound {
        program: program.to_string(),
        reason: e.to_string(),
    })
}

fn run_tool(tool: &LintTool, exe: &Path, path: &Path) -> Result<ToolOutput, LintError> {
    tracing::debug!(tool = %tool.program, file = %path.display(), "running lint tool");
    let output = Command::new(exe)
        .arg(path)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LintError::ToolNotFound {
                program: tool.program.clone(),
                reason: e.to_string(),
            },
            _ => LintError::Spawn {
                program: tool.program.clone(),
                source: e,
            },
        })?;

    let exit_code = output.status.code();
    tracing::debug!(tool = %tool.program, ?exit_code, "lint tool finished");

    Ok(ToolOutput {
        label: tool.label.clone(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code,
    })
}

fn render(outputs: &[ToolOutput]) -> String {
    outputs
        .iter()
        .map(|out| format!("{} Output:\n{}", out.label, out.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
