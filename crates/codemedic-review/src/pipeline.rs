use std::io::Write;
use std::path::Path;
use std::time::Duration;

use codemedic_core::{CodemedicError, Stage, StageReport};
use codemedic_lint::StaticAnalysisRunner;

use crate::llm::CompletionClient;
use crate::prompt;

/// Read the file under review.
///
/// # Errors
///
/// Returns [`CodemedicError::FileNotFound`] if `path` does not exist and
/// [`CodemedicError::Io`] for any other read failure.
pub fn read_source(path: &Path) -> Result<String, CodemedicError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CodemedicError::FileNotFound(path.to_path_buf()),
        _ => CodemedicError::Io(e),
    })
}

/// Checkup orchestrator that runs the three stages in order.
///
/// Stage results are advisory text; a stage that fails internally still
/// produces a report and the remaining stages run.
pub struct CheckupPipeline {
    llm: CompletionClient,
    lint: StaticAnalysisRunner,
    show_progress: bool,
}

impl CheckupPipeline {
    /// Create a pipeline from a completion client and lint runner.
    pub fn new(llm: CompletionClient, lint: StaticAnalysisRunner) -> Self {
        Self {
            llm,
            lint,
            show_progress: false,
        }
    }

    /// Show a spinner on stderr while waiting for suggestions.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Ask the completion endpoint for fixes and improvements to `code`.
    pub async fn suggest(&self, code: &str) -> String {
        let prompt = prompt::build_suggestion_prompt(code);
        self.llm.complete_text(&prompt).await
    }

    /// Read `path` once, run every stage, and write each report to `out` as
    /// soon as it is ready.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read or `out` cannot be
    /// written; stage failures are reported inside the returned text.
    pub async fn run<W: Write>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<Vec<StageReport>, CodemedicError> {
        let code = read_source(path)?;
        let mut reports = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            tracing::debug!(%stage, "running stage");
            let body = match stage {
                Stage::Syntax => codemedic_syntax::check(&code),
                Stage::Static => self.lint.run(path),
                Stage::Suggestions => self.suggest_with_progress(&code).await,
            };
            let report = StageReport::new(stage, body);

            if !reports.is_empty() {
                writeln!(out)?;
            }
            writeln!(out, "{report}")?;
            out.flush()?;

            reports.push(report);
        }

        Ok(reports)
    }

    async fn suggest_with_progress(&self, code: &str) -> String {
        if !self.show_progress {
            return self.suggest(code).await;
        }

        let pb = indicatif::ProgressBar::new_spinner();
        let template = "{spinner:.cyan} {msg} ({elapsed})";
        if let Ok(style) = indicatif::ProgressStyle::with_template(template) {
            pb.set_style(style);
        }
        pb.set_message("Waiting for AI suggestions...");
        pb.enable_steady_tick(Duration::from_millis(120));

        let text = self.suggest(code).await;
        pb.finish_and_clear();
        text
    }
}
