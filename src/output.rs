//! Output formatting and styling module.
//!
//! The interactive loop talks to the terminal only through the [`Console`]
//! trait; [`OutputFormatter`] is the colored terminal implementation.

use crate::file_organizer::ClassificationResult;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Sink for everything the interactive loop shows the user.
pub trait Console {
    /// Session banner and other neutral notices.
    fn info(&mut self, message: &str);
    /// Announces work that is about to start.
    fn thinking(&mut self, message: &str);
    /// Result of a local tool (sorting, PDF lookup).
    fn tool(&mut self, message: &str);
    /// Text produced by the model.
    fn reply(&mut self, message: &str);
    /// Non-fatal problem worth pointing out.
    fn warning(&mut self, message: &str);

    /// Reports a finished classification run.
    fn classification(&mut self, result: &ClassificationResult) {
        self.tool(&format!("Hasil pemindahan file: {}", result));
    }

    /// Shows the input prompt.
    fn prompt(&mut self) {}

    /// Runs `work` while indicating that the user has to wait.
    fn wait<T>(&mut self, _message: &str, work: impl FnOnce() -> T) -> T {
        work()
    }
}

/// Colored terminal output with a spinner for blocking requests.
///
/// - Thinking notices are yellow
/// - Tool output and model replies are cyan
/// - Warnings are yellow with ⚠
#[derive(Debug, Default)]
pub struct OutputFormatter;

impl OutputFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deskhand::output::OutputFormatter;
    /// OutputFormatter::error("OPENROUTER_API_KEY is not set");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints per-category counts as a table.
    pub fn summary_table(result: &ClassificationResult) {
        let width = result
            .counts()
            .keys()
            .map(|category| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!("{:<width$} | {}", "Category".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for (category, count) in result.counts() {
            println!(
                "{:<width$} | {}",
                category.dir_name(),
                count.to_string().green(),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            "Total".bold(),
            result.total().to_string().green().bold(),
            width = width
        );
    }

    fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}

impl Console for OutputFormatter {
    fn info(&mut self, message: &str) {
        println!("{}", message.cyan());
    }

    fn thinking(&mut self, message: &str) {
        println!("{}", format!("[AI THINKING] {}", message).yellow());
    }

    fn tool(&mut self, message: &str) {
        println!("{}", format!("[TOOL OUTPUT] {}", message).cyan());
    }

    fn reply(&mut self, message: &str) {
        println!("{}", message.cyan());
    }

    fn warning(&mut self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    fn classification(&mut self, result: &ClassificationResult) {
        self.tool(&format!("Hasil pemindahan file: {}", result));
        Self::summary_table(result);
    }

    fn prompt(&mut self) {
        print!("{}", "User: ".green());
        let _ = io::stdout().flush();
    }

    fn wait<T>(&mut self, message: &str, work: impl FnOnce() -> T) -> T {
        let pb = Self::spinner(message);
        let out = work();
        pb.finish_and_clear();
        out
    }
}
