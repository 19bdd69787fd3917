use deskhand::cli::{Flow, Session};
use deskhand::output::Console;
use deskhand::{
    Category, ClassificationResult, ERROR_MARKER, ExtensionTable, LlmClient, OrganizeError,
    Settings, classify,
};
/// Integration tests for deskhand
///
/// These tests exercise the classifier on real temporary folders and drive
/// whole sessions against a mock chat endpoint.
///
/// Test categories:
/// 1. Folder classification
/// 2. Collision handling
/// 3. Interactive session flows
use httpmock::prelude::*;
use serde_json::json;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary base folder with helpers for building and inspecting it.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name);
        }
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// All files below the fixture, relative and sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut files: Vec<PathBuf> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        files.sort();
        files
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }
}

/// Console that keeps every line for later assertions.
#[derive(Default)]
struct RecordingConsole {
    lines: Vec<(&'static str, String)>,
}

impl RecordingConsole {
    fn of_kind(&self, kind: &str) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl Console for RecordingConsole {
    fn info(&mut self, message: &str) {
        self.lines.push(("info", message.to_string()));
    }
    fn thinking(&mut self, message: &str) {
        self.lines.push(("thinking", message.to_string()));
    }
    fn tool(&mut self, message: &str) {
        self.lines.push(("tool", message.to_string()));
    }
    fn reply(&mut self, message: &str) {
        self.lines.push(("reply", message.to_string()));
    }
    fn warning(&mut self, message: &str) {
        self.lines.push(("warning", message.to_string()));
    }
}

fn settings_for(base_url: String) -> Settings {
    Settings {
        api_key: Some("test-key".to_string()),
        base_url,
        model: "test/model".to_string(),
        request_timeout_secs: 5,
        ..Settings::default()
    }
}

fn session_for(fixture: &TestFixture, base_url: String) -> Session<RecordingConsole> {
    let mut client = LlmClient::new(&settings_for(base_url)).expect("client");
    client.set_system_prompt("sys");
    Session::new(client, fixture.path(), RecordingConsole::default())
}

fn reply_body(content: &str) -> serde_json::Value {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
}

// ============================================================================
// Test Suite 1: Folder Classification
// ============================================================================

#[test]
fn test_classify_moves_known_extensions() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "essay.docx",
        "letter.rtf",
        "budget.xlsx",
        "data.csv",
        "paper.pdf",
        "photo.jpg",
        "icon.gif",
    ]);

    let result = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(result.count(Category::Word), 2);
    assert_eq!(result.count(Category::Worksheet), 2);
    assert_eq!(result.count(Category::Pdf), 1);
    assert_eq!(result.count(Category::Image), 2);
    assert_eq!(result.total(), 7);

    fixture.assert_file_exists("word/essay.docx");
    fixture.assert_file_exists("word/letter.rtf");
    fixture.assert_file_exists("worksheet/budget.xlsx");
    fixture.assert_file_exists("worksheet/data.csv");
    fixture.assert_file_exists("pdf/paper.pdf");
    fixture.assert_file_exists("image/photo.jpg");
    fixture.assert_file_exists("image/icon.gif");
    fixture.assert_file_not_exists("essay.docx");
    fixture.assert_file_not_exists("paper.pdf");
}

#[test]
fn test_classify_uppercase_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&["SCAN.PNG", "Report.Docx"]);

    let result = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(result.total(), 2);
    fixture.assert_file_exists("image/SCAN.PNG");
    fixture.assert_file_exists("word/Report.Docx");
}

#[test]
fn test_unknown_extensions_are_untouched_and_uncounted() {
    let fixture = TestFixture::new();
    fixture.create_files(&["notes.txt", "Makefile", "archive.zip", "paper.pdf"]);

    let result = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(result.total(), 1);
    assert_eq!(
        result.to_json(),
        r#"{"word":0,"worksheet":0,"pdf":1,"image":0}"#
    );
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_exists("Makefile");
    fixture.assert_file_exists("archive.zip");
}

#[test]
fn test_subdirectories_are_not_descended() {
    let fixture = TestFixture::new();
    fixture.create_file("nested/inner.pdf", "inner");
    fixture.create_file("pdf/already.pdf", "sorted");
    fixture.create_file("top.pdf", "top");

    let result = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(result.count(Category::Pdf), 1);
    assert_eq!(
        fixture.list_files_recursive(),
        vec![
            PathBuf::from("nested/inner.pdf"),
            PathBuf::from("pdf/already.pdf"),
            PathBuf::from("pdf/top.pdf"),
        ]
    );
}

#[test]
fn test_empty_folder_reports_zero_and_creates_nothing() {
    let fixture = TestFixture::new();

    let result = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(result.total(), 0);
    assert_eq!(fs::read_dir(fixture.path()).unwrap().count(), 0);
}

#[test]
fn test_second_run_is_a_no_op() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.pdf", "b.png"]);

    classify(fixture.path(), &ExtensionTable::default()).unwrap();
    let second = classify(fixture.path(), &ExtensionTable::default()).unwrap();

    assert_eq!(second.total(), 0);
    fixture.assert_file_exists("pdf/a.pdf");
    fixture.assert_file_exists("image/b.png");
}

#[test]
fn test_missing_base_folder() {
    let fixture = TestFixture::new();
    let missing = fixture.path().join("does-not-exist");

    let err = classify(&missing, &ExtensionTable::default()).unwrap_err();
    assert!(matches!(err, OrganizeError::DirectoryNotFound { ref path } if *path == missing));
}

#[test]
fn test_first_declared_category_wins() {
    let fixture = TestFixture::new();
    fixture.create_file("slides.pdf", "x");
    let table = ExtensionTable::new([
        (Category::Word, vec![".pdf"]),
        (Category::Pdf, vec![".pdf"]),
    ]);

    let result = classify(fixture.path(), &table).unwrap();

    assert_eq!(result.count(Category::Word), 1);
    assert_eq!(result.count(Category::Pdf), 0);
    fixture.assert_file_exists("word/slides.pdf");
}

// ============================================================================
// Test Suite 2: Collision Handling
// ============================================================================

#[test]
fn test_collision_appends_increasing_counter() {
    let fixture = TestFixture::new();
    fixture.create_file("word/report.docx", "original");

    fixture.create_file("report.docx", "second");
    classify(fixture.path(), &ExtensionTable::default()).unwrap();
    fixture.assert_file_exists("word/report (1).docx");

    fixture.create_file("report.docx", "third");
    classify(fixture.path(), &ExtensionTable::default()).unwrap();
    fixture.assert_file_exists("word/report (2).docx");

    assert_eq!(fixture.read("word/report.docx"), "original");
    assert_eq!(fixture.read("word/report (1).docx"), "second");
    assert_eq!(fixture.read("word/report (2).docx"), "third");
}

// ============================================================================
// Test Suite 3: Interactive Session
// ============================================================================

#[test]
fn test_session_sort_moves_files_and_explains() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_includes("Tolong jelaskan hasil pemindahan file berikut kepada user");
        then.status(200).json_body(reply_body("Dua file sudah dirapikan."));
    });

    let fixture = TestFixture::new();
    fixture.create_files(&["a.docx", "b.jpeg", "c.txt"]);
    let mut session = session_for(&fixture, server.base_url());

    assert_eq!(session.handle_line("tolong rapihkan folder"), Flow::Continue);

    mock.assert();
    fixture.assert_file_exists("word/a.docx");
    fixture.assert_file_exists("image/b.jpeg");
    fixture.assert_file_exists("c.txt");

    let console = session.console();
    assert_eq!(
        console.of_kind("tool"),
        vec![r#"Hasil pemindahan file: {"word":1,"worksheet":0,"pdf":0,"image":1}"#]
    );
    assert_eq!(console.of_kind("reply"), vec!["Dua file sudah dirapikan."]);
}

#[test]
fn test_session_sort_reports_missing_folder_without_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(reply_body("unused"));
    });

    let fixture = TestFixture::new();
    let mut client = LlmClient::new(&settings_for(server.base_url())).unwrap();
    client.set_system_prompt("sys");
    let mut session = Session::new(
        client,
        fixture.path().join("gone"),
        RecordingConsole::default(),
    );

    assert_eq!(session.handle_line("sortir"), Flow::Continue);

    assert_eq!(mock.calls(), 0);
    let tool = session.console().of_kind("tool");
    assert_eq!(tool.len(), 1);
    assert!(tool[0].starts_with("Gagal sortir: Folder not found"));
}

#[test]
fn test_session_summarize_missing_pdf() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(reply_body("unused"));
    });

    let fixture = TestFixture::new();
    let mut session = session_for(&fixture, server.base_url());

    session.handle_line("tolong ringkas laporan.pdf");

    assert_eq!(mock.calls(), 0);
    let expected = fixture.path().join("pdf").join("laporan.pdf");
    assert_eq!(
        session.console().of_kind("tool"),
        vec![format!("File PDF tidak ditemukan: {}", expected.display())]
    );
}

#[test]
fn test_session_summarize_unreadable_pdf_continues() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(reply_body("unused"));
    });

    let fixture = TestFixture::new();
    fixture.create_file("pdf/rusak.pdf", "not really a pdf");
    let mut session = session_for(&fixture, server.base_url());

    assert_eq!(session.handle_line("rangkum rusak.pdf"), Flow::Continue);

    assert_eq!(mock.calls(), 0);
    let tool = session.console().of_kind("tool");
    assert!(tool.last().unwrap().starts_with("Gagal membaca PDF"));
}

#[test]
fn test_session_summarize_pdf_sends_extracted_text() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/chat/completions")
            .body_includes("Tolong ringkas dokumen PDF berikut")
            .body_includes("Bab pertama")
            .body_includes("Bab ketiga");
        then.status(200).json_body(reply_body("Ringkasan tiga halaman."));
    });

    let fixture = TestFixture::new();
    fs::create_dir_all(fixture.path().join("pdf")).unwrap();
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/three_pages.pdf");
    fs::copy(&source, fixture.path().join("pdf").join("Laporan.pdf")).unwrap();
    let mut session = session_for(&fixture, server.base_url());

    assert_eq!(session.handle_line("tolong rangkum Laporan.pdf"), Flow::Continue);

    mock.assert();
    let console = session.console();
    assert_eq!(console.of_kind("tool"), vec!["Ringkasan PDF selesai dibuat:\n"]);
    assert_eq!(console.of_kind("reply"), vec!["Ringkasan tiga halaman."]);
}

#[test]
fn test_session_chat_is_stateless() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST).json_body(json!({
            "model": "test/model",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "halo"}
            ],
            "stream": false
        }));
        then.status(200).json_body(reply_body("hai"));
    });
    let second = server.mock(|when, then| {
        when.method(POST).json_body(json!({
            "model": "test/model",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "apa kabar?"}
            ],
            "stream": false
        }));
        then.status(200).json_body(reply_body("baik"));
    });

    let fixture = TestFixture::new();
    let mut session = session_for(&fixture, server.base_url());
    session.handle_line("halo");
    session.handle_line("apa kabar?");

    first.assert();
    second.assert();
    assert_eq!(
        session.console().of_kind("reply"),
        vec!["Agent: hai", "Agent: baik"]
    );
}

#[test]
fn test_session_chat_survives_network_failure() {
    let fixture = TestFixture::new();
    let mut session = session_for(&fixture, "http://127.0.0.1:1".to_string());

    assert_eq!(session.handle_line("halo"), Flow::Continue);

    let replies = session.console().of_kind("reply");
    assert_eq!(replies.len(), 1);
    assert!(replies[0].starts_with(&format!("Agent: {}", ERROR_MARKER)));
}

#[test]
fn test_run_stops_at_exit_keyword() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(reply_body("ok"));
    });

    let fixture = TestFixture::new();
    let mut session = session_for(&fixture, server.base_url());
    session
        .run(Cursor::new("halo\n\nQ\nhalo lagi\n"))
        .expect("run should succeed");

    mock.assert_calls(1);
    let replies = session.console().of_kind("reply");
    assert_eq!(replies, vec!["Agent: ok", "Agent: Sampai jumpa!"]);
}

#[test]
fn test_classification_result_display_matches_json() {
    let result = ClassificationResult::for_table(&ExtensionTable::default());
    assert_eq!(result.to_string(), result.to_json());
}
