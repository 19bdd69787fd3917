/// Folder classification: moving files into category sub-folders.
///
/// This module scans the direct children of a base folder, moves every file
/// with a known extension into `<base>/<category>/`, and never overwrites an
/// existing file at the destination.
use crate::file_category::{Category, ExtensionTable};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while classifying a folder.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The base folder does not exist.
    #[error("Folder not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// The base folder exists but could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Result type for folder classification.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A file that matched a category but could not be moved.
#[derive(Debug)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub category: Category,
    pub reason: String,
}

/// Per-category counts of one classification run.
#[derive(Debug, Default)]
pub struct ClassificationResult {
    counts: BTreeMap<Category, usize>,
    /// Files that matched a category but failed to move. Not counted.
    pub failures: Vec<MoveFailure>,
}

impl ClassificationResult {
    /// Creates a result with every category of `table` at zero.
    pub fn for_table(table: &ExtensionTable) -> Self {
        Self {
            counts: table.categories().into_iter().map(|c| (c, 0)).collect(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Number of files moved into `category`.
    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Category counts in category order.
    pub fn counts(&self) -> &BTreeMap<Category, usize> {
        &self.counts
    }

    /// Total number of files moved.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Compact JSON rendering, e.g. `{"word":1,"worksheet":0,"pdf":2,"image":0}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.counts).unwrap_or_else(|_| format!("{:?}", self.counts))
    }
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Moves `src` into `dst_dir` without overwriting anything.
///
/// `dst_dir` is created if missing. When `dst_dir/<name>` is taken, the file
/// lands at the first free `<stem> (N)<ext>` for N = 1, 2, ...
///
/// # Examples
///
/// ```no_run
/// use deskhand::file_organizer::safe_move;
/// use std::path::Path;
///
/// let moved = safe_move(Path::new("/data/report.docx"), Path::new("/data/word")).unwrap();
/// println!("now at {}", moved.display());
/// ```
pub fn safe_move(src: &Path, dst_dir: &Path) -> OrganizeResult<PathBuf> {
    fs::create_dir_all(dst_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: dst_dir.to_path_buf(),
        source: e,
    })?;

    let file_name = src.file_name().ok_or_else(|| OrganizeError::FileMoveFailure {
        from: src.to_path_buf(),
        to: dst_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
    })?;

    let destination = free_destination(dst_dir, Path::new(file_name));
    move_file(src, &destination).map_err(|e| OrganizeError::FileMoveFailure {
        from: src.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    debug!(from = %src.display(), to = %destination.display(), "moved file");
    Ok(destination)
}

fn free_destination(dst_dir: &Path, file_name: &Path) -> PathBuf {
    let candidate = dst_dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut i: u64 = 1;
    loop {
        let candidate = dst_dir.join(format!("{} ({}){}", stem, i, suffix));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

fn move_file(src: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(src, destination) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(src, destination)?;
            fs::remove_file(src)
        }
        other => other,
    }
}

/// Sorts the direct children of `base_path` into category sub-folders.
///
/// Only regular files are considered; sub-folders (including the category
/// folders themselves) are never entered. Files with an unknown extension
/// are left in place and not counted.
///
/// # Errors
///
/// Returns `OrganizeError::DirectoryNotFound` when `base_path` does not
/// exist. A file that fails to move is recorded in
/// [`ClassificationResult::failures`] and the run continues.
pub fn classify(base_path: &Path, table: &ExtensionTable) -> OrganizeResult<ClassificationResult> {
    if !base_path.exists() {
        return Err(OrganizeError::DirectoryNotFound {
            path: base_path.to_path_buf(),
        });
    }

    let entries = fs::read_dir(base_path).map_err(|e| OrganizeError::ReadDirFailed {
        path: base_path.to_path_buf(),
        source: e,
    })?;

    // Snapshot before moving so freshly created category folders are never scanned.
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut result = ClassificationResult::for_table(table);
    for file in files {
        let Some(category) = table.category_for(&file) else {
            continue;
        };

        match safe_move(&file, &base_path.join(category.dir_name())) {
            Ok(_) => result.record(category),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "could not classify file");
                result.failures.push(MoveFailure {
                    path: file,
                    category,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(base = %base_path.display(), moved = result.total(), "classification finished");
    Ok(result)
}
