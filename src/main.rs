//! deskhand: sort a folder and summarize PDFs with help from a chat model.
//!
//! There are no command-line flags. Settings come from the environment
//! (OPENROUTER_API_KEY, OPENROUTER_BASE_URL, OPENROUTER_MODEL, BASE_FOLDER,
//! MAX_PDF_CHARS, REQUEST_TIMEOUT), a `.env` file in the working directory,
//! and an optional TOML file named by DESKHAND_CONFIG.
use deskhand::cli::run_cli;
use deskhand::config::Settings;
use deskhand::output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_cli(&settings) {
        OutputFormatter::error(&e.to_string());
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
