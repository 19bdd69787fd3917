//! Interactive read-eval-print loop.
//!
//! This module handles:
//! - Reading one line at a time
//! - Turning it into an [`Intent`]
//! - Running the classifier or the conversation client
//! - Reporting results through a [`Console`]

use crate::config::{ConfigError, Settings};
use crate::file_category::{Category, ExtensionTable};
use crate::file_organizer;
use crate::intent::{Intent, parse_intent};
use crate::llm_client::LlmClient;
use crate::output::{Console, OutputFormatter};
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Fatal errors of the interactive session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Whether the loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One interactive session over a base folder.
pub struct Session<C: Console> {
    client: LlmClient,
    base_folder: PathBuf,
    table: ExtensionTable,
    console: C,
}

impl<C: Console> Session<C> {
    pub fn new(client: LlmClient, base_folder: impl Into<PathBuf>, console: C) -> Self {
        Self {
            client,
            base_folder: base_folder.into(),
            table: ExtensionTable::default(),
            console,
        }
    }

    /// Uses `table` instead of the default extension table.
    pub fn with_table(mut self, table: ExtensionTable) -> Self {
        self.table = table;
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Reads lines from `input` until an exit keyword or end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending the
    /// session.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        self.console
            .info(&format!("Base folder aktif: {}", self.base_folder.display()));
        self.console.info("Ketik 'q' untuk keluar.\n");

        let mut buf = Vec::new();
        loop {
            self.console.prompt();
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!("input closed");
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if self.handle_line(line) == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Handles a single input line.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        self.execute(parse_intent(line))
    }

    pub fn execute(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::Empty => {}
            Intent::Exit => {
                self.console.reply("Agent: Sampai jumpa!");
                return Flow::Exit;
            }
            Intent::SortFolder => self.sort_folder(),
            Intent::SummarizePdf { file_name } => self.summarize_pdf(&file_name),
            Intent::Chat(text) => self.chat(&text),
        }
        Flow::Continue
    }

    fn sort_folder(&mut self) {
        self.console.thinking("Menjalankan perintah sortir...");

        let result = match file_organizer::classify(&self.base_folder, &self.table) {
            Ok(result) => result,
            Err(e) => {
                self.console.tool(&format!("Gagal sortir: {}", e));
                return;
            }
        };

        self.console.classification(&result);
        for failure in &result.failures {
            self.console.warning(&format!(
                "{} tidak dipindahkan: {}",
                failure.path.display(),
                failure.reason
            ));
        }

        let answer = self.console.wait("Menyusun penjelasan...", || {
            self.client.explain_classification(&result)
        });
        self.console.reply(&answer);
    }

    fn summarize_pdf(&mut self, file_name: &str) {
        let pdf_path = self
            .base_folder
            .join(Category::Pdf.dir_name())
            .join(file_name);

        if !pdf_path.exists() {
            self.console.tool(&format!(
                "File PDF tidak ditemukan: {}",
                pdf_path.display()
            ));
            return;
        }

        self.console.thinking("Membaca dan merangkum PDF...");
        let summary = self
            .console
            .wait("Merangkum...", || self.client.summarize_pdf(&pdf_path));

        match summary {
            Ok(summary) => {
                self.console.tool("Ringkasan PDF selesai dibuat:\n");
                self.console.reply(&summary);
            }
            Err(e) => self.console.tool(&format!("Gagal membaca PDF: {}", e)),
        }
    }

    fn chat(&mut self, text: &str) {
        self.console.thinking("Memproses...");
        let answer = self.console.wait("Memproses...", || self.client.ask(text));
        self.console.reply(&format!("Agent: {}", answer));
    }
}

/// Builds a session from `settings` and runs it on standard input.
///
/// # Errors
///
/// Returns `CliError::Config` when the API key is missing, before any
/// request is made.
pub fn run_cli(settings: &Settings) -> Result<(), CliError> {
    let mut client = LlmClient::new(settings)?;
    client.set_system_prompt(settings.system_prompt.clone());

    let mut session = Session::new(client, settings.base_folder.clone(), OutputFormatter::new());
    session.run(io::stdin().lock())?;
    Ok(())
}
