use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use codemedic_core::CodemedicConfig;
use codemedic_lint::StaticAnalysisRunner;
use codemedic_review::llm::CompletionClient;
use codemedic_review::pipeline::CheckupPipeline;

/// Environment variable pointing at an alternative `.env` file.
const ENV_FILE_VAR: &str = "CODEMEDIC_ENV_FILE";

#[derive(Parser)]
#[command(
    name = "codemedic",
    version,
    about = "AI-powered Python code checkup",
    long_about = "AI-powered Python code checkup.\n\n\
                   Runs three checks on a Python file and prints one report:\n  \
                     1. Syntax analysis (parsed in-process, never executed)\n  \
                     2. Static analysis with pylint and flake8\n  \
                     3. AI-powered suggestions from a chat-completion endpoint\n\n\
                   Configuration is read from a .env file next to the executable\n\
                   (override with CODEMEDIC_ENV_FILE). It must define DEEPSEEK_API_KEY.\n\
                   Set DEEPSEEK_API_URL to use a different completion endpoint.\n\n\
                   Example:\n  \
                     codemedic src/app.py"
)]
struct Cli {
    /// Path to the Python file to analyze
    file: PathBuf,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(ENV_FILE_VAR) {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe()
        .into_diagnostic()
        .wrap_err("locating the codemedic executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| miette::miette!("executable path has no parent directory"))?;
    Ok(dir.join(".env"))
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing();

    let config_path = config_path()?;
    let config = CodemedicConfig::load(&config_path)
        .wrap_err_with(|| format!("loading configuration from {}", config_path.display()))?;
    tracing::debug!(
        api_url = %config.api_url,
        model = %config.model,
        timeout = ?config.request_timeout,
        "configuration loaded"
    );

    let llm = CompletionClient::new(&config)?;
    let pipeline = CheckupPipeline::new(llm, StaticAnalysisRunner::default())
        .with_progress(std::io::stderr().is_terminal());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline
        .run(&cli.file, &mut out)
        .await
        .wrap_err_with(|| format!("checking {}", cli.file.display()))?;

    Ok(())
}
