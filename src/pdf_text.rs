/// Best-effort PDF text extraction.
///
/// Pages are extracted in document order; pages without extractable text
/// contribute nothing and the rest are joined with a newline.
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while reading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be opened or parsed as a PDF.
    #[error("Cannot read PDF {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// Extracts the text of every page of the PDF at `path`.
///
/// # Errors
///
/// Returns `DocumentError::Unreadable` if the file cannot be read or parsed.
pub fn extract_text(path: &Path) -> Result<String, DocumentError> {
    let unreadable = |reason: String| DocumentError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| unreadable(e.to_string()))?;

    // The parser can panic on malformed fonts; treat that as an unreadable file.
    let pages = match catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "PDF extraction failed");
            return Err(unreadable(e.to_string()));
        }
        Err(_) => {
            warn!(path = %path.display(), "PDF extraction panicked");
            return Err(unreadable("parser panicked on malformed content".to_string()));
        }
    };

    debug!(path = %path.display(), pages = pages.len(), "extracted PDF text");
    Ok(join_pages(pages))
}

/// Joins page texts with `\n`, skipping pages that hold only whitespace.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
