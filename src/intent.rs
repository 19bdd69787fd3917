//! Keyword dispatch for one line of user input.
//!
//! This is plain substring matching, evaluated as an ordered rule table:
//! the first rule whose predicate accepts the lowercased line decides the
//! intent; anything unmatched is a chat message.

/// Whole-line words that end the session.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "q"];
/// Substrings that trigger folder sorting.
pub const SORT_KEYWORDS: &[&str] = &["rapihkan", "sortir", "pindahkan"];
/// Substrings that, together with `.pdf`, trigger a PDF summary.
pub const SUMMARIZE_KEYWORDS: &[&str] = &["ringkas", "rangkum"];

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Blank line; nothing to do.
    Empty,
    /// Leave the loop.
    Exit,
    /// Classify the base folder.
    SortFolder,
    /// Summarize `<base>/pdf/<file_name>`.
    SummarizePdf { file_name: String },
    /// Forward the line to the model.
    Chat(String),
}

struct Rule {
    matches: fn(&str) -> bool,
    build: fn(&str) -> Intent,
}

const RULES: &[Rule] = &[
    Rule {
        matches: str::is_empty,
        build: |_| Intent::Empty,
    },
    Rule {
        matches: |lower| EXIT_KEYWORDS.contains(&lower),
        build: |_| Intent::Exit,
    },
    Rule {
        matches: |lower| SORT_KEYWORDS.iter().any(|k| lower.contains(k)),
        build: |_| Intent::SortFolder,
    },
    Rule {
        matches: |lower| {
            SUMMARIZE_KEYWORDS.iter().any(|k| lower.contains(k)) && lower.contains(".pdf")
        },
        build: |line| Intent::SummarizePdf {
            file_name: line.split_whitespace().last().unwrap_or_default().to_string(),
        },
    },
];

/// Maps a raw input line to an [`Intent`].
///
/// # Examples
///
/// ```
/// use deskhand::intent::{parse_intent, Intent};
///
/// assert_eq!(parse_intent("  Q "), Intent::Exit);
/// assert_eq!(parse_intent("tolong sortir folder"), Intent::SortFolder);
/// assert_eq!(
///     parse_intent("rangkum Laporan.pdf"),
///     Intent::SummarizePdf { file_name: "Laporan.pdf".to_string() }
/// );
/// assert_eq!(parse_intent("halo"), Intent::Chat("halo".to_string()));
/// ```
pub fn parse_intent(line: &str) -> Intent {
    let line = line.trim();
    let lower = line.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| (rule.build)(line))
        .unwrap_or_else(|| Intent::Chat(line.to_string()))
}
