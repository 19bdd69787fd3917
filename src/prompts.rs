//! Fixed prompt templates.
//!
//! The assistant talks to its user in Indonesian, so every template here is
//! Indonesian text.

use crate::file_organizer::ClassificationResult;

/// Default system prompt for a session.
pub const SYSTEM_PROMPT: &str = "Kamu adalah AI Agent untuk membantu Hikam menjawab dan \
menyelesaikan segala masalahnya. Gunakan bahasa Indonesia yang jelas.";

/// Appended to PDF text cut at the character limit.
pub const TRUNCATION_MARKER: &str = "\n\n[TEKS DIPOTONG AGAR TIDAK TERLALU PANJANG]";

/// Keeps at most `max_chars` characters of `text`, appending
/// [`TRUNCATION_MARKER`] when anything was cut.
///
/// # Examples
///
/// ```
/// use deskhand::prompts::{truncate_for_prompt, TRUNCATION_MARKER};
///
/// assert_eq!(truncate_for_prompt("abcdef", 10), "abcdef");
/// assert_eq!(truncate_for_prompt("abcdef", 3), format!("abc{}", TRUNCATION_MARKER));
/// ```
pub fn truncate_for_prompt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Builds the summarization request for already-truncated PDF text.
pub fn summary_prompt(text: &str) -> String {
    format!(
        "Tolong ringkas dokumen PDF berikut:\n\n\
         {}\n\n\
         Buatkan tiga bagian:\n\
         1. Ringkasan singkat (2–3 kalimat).\n\
         2. Ringkasan lengkap (1 paragraf).\n\
         3. 5 poin-poin penting.\n\
         Jawab dalam bahasa Indonesia.",
        text
    )
}

/// Asks the model to explain a classification run to the user.
pub fn sort_explanation_prompt(result: &ClassificationResult) -> String {
    format!(
        "Tolong jelaskan hasil pemindahan file berikut kepada user: {}",
        result
    )
}
