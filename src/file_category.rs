/// File categorization by extension.
///
/// This module maps lowercase file extensions (dot included) to the folder
/// categories the classifier sorts into.
///
/// # Examples
///
/// ```
/// use deskhand::file_category::{Category, ExtensionTable};
/// use std::path::Path;
///
/// let table = ExtensionTable::default();
/// assert_eq!(table.category_for(Path::new("report.DOCX")), Some(Category::Word));
/// assert_eq!(table.category_for(Path::new("notes.txt")), None);
/// ```
use serde::Serialize;
use std::path::Path;

/// A folder category.
///
/// The declaration order is also the order categories are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Word-processor documents (DOCX, DOC, RTF)
    Word,
    /// Spreadsheets (XLSX, XLS, CSV)
    Worksheet,
    /// PDF documents
    Pdf,
    /// Images (JPG, PNG, GIF)
    Image,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::Word,
        Category::Worksheet,
        Category::Pdf,
        Category::Image,
    ];

    /// Returns the sub-folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use deskhand::file_category::Category;
    ///
    /// assert_eq!(Category::Worksheet.dir_name(), "worksheet");
    /// assert_eq!(Category::Image.dir_name(), "image");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Word => "word",
            Category::Worksheet => "worksheet",
            Category::Pdf => "pdf",
            Category::Image => "image",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Ordered extension table.
///
/// Lookups walk the table in declaration order and return the first
/// category listing the extension, so an extension declared twice always
/// resolves to its earliest entry.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl ExtensionTable {
    /// Creates a table from `(category, extensions)` pairs.
    ///
    /// Extensions are stored lowercase and must include the leading dot.
    pub fn new<I, E, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Category, E)>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, exts)| {
                let exts = exts
                    .into_iter()
                    .map(|ext| ext.as_ref().to_lowercase())
                    .collect();
                (category, exts)
            })
            .collect();
        Self { entries }
    }

    /// Categories in table order, without duplicates.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for (category, _) in &self.entries {
            if !seen.contains(category) {
                seen.push(*category);
            }
        }
        seen
    }

    /// Looks up a dotted extension such as `".pdf"` (case-insensitive).
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        let ext = ext.to_lowercase();
        self.entries
            .iter()
            .find(|(_, exts)| exts.iter().any(|e| *e == ext))
            .map(|(category, _)| *category)
    }

    /// Returns the category for a file path, or `None` when its extension
    /// is missing or unknown.
    pub fn category_for(&self, path: &Path) -> Option<Category> {
        let ext = path.extension()?.to_string_lossy();
        self.extension_to_category(&format!(".{}", ext))
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::new([
            (Category::Word, vec![".docx", ".doc", ".rtf"]),
            (Category::Worksheet, vec![".xlsx", ".xls", ".csv"]),
            (Category::Pdf, vec![".pdf"]),
            (Category::Image, vec![".jpg", ".jpeg", ".png", ".gif"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Word.dir_name(), "word");
        assert_eq!(Category::Worksheet.dir_name(), "worksheet");
        assert_eq!(Category::Pdf.dir_name(), "pdf");
        assert_eq!(Category::Image.dir_name(), "image");
    }

    #[test]
    fn test_default_table_extensions() {
        let table = ExtensionTable::default();
        for ext in [".docx", ".doc", ".rtf"] {
            assert_eq!(table.extension_to_category(ext), Some(Category::Word));
        }
        for ext in [".xlsx", ".xls", ".csv"] {
            assert_eq!(table.extension_to_category(ext), Some(Category::Worksheet));
        }
        assert_eq!(table.extension_to_category(".pdf"), Some(Category::Pdf));
        for ext in [".jpg", ".jpeg", ".png", ".gif"] {
            assert_eq!(table.extension_to_category(ext), Some(Category::Image));
        }
    }

    #[test]
    fn test_category_for_is_case_insensitive() {
        let table = ExtensionTable::default();
        assert_eq!(
            table.category_for(Path::new("Scan.JPEG")),
            Some(Category::Image)
        );
        assert_eq!(
            table.category_for(Path::new("budget.Xlsx")),
            Some(Category::Worksheet)
        );
    }

    #[test]
    fn test_category_for_unknown_or_missing_extension() {
        let table = ExtensionTable::default();
        assert_eq!(table.category_for(Path::new("notes.txt")), None);
        assert_eq!(table.category_for(Path::new("Makefile")), None);
        assert_eq!(table.category_for(Path::new(".bashrc")), None);
    }

    #[test]
    fn test_only_last_extension_counts() {
        let table = ExtensionTable::default();
        assert_eq!(table.category_for(Path::new("report.pdf.zip")), None);
        assert_eq!(
            table.category_for(Path::new("archive.zip.pdf")),
            Some(Category::Pdf)
        );
    }

    #[test]
    fn test_first_declared_category_wins() {
        let table = ExtensionTable::new([
            (Category::Word, vec![".pdf"]),
            (Category::Pdf, vec![".pdf"]),
        ]);
        assert_eq!(table.extension_to_category(".pdf"), Some(Category::Word));
    }

    #[test]
    fn test_categories_in_table_order() {
        let table = ExtensionTable::default();
        assert_eq!(table.categories(), Category::ALL.to_vec());
    }

    #[test]
    fn test_category_serializes_as_dir_name() {
        let json = serde_json::to_string(&Category::Worksheet).unwrap();
        assert_eq!(json, "\"worksheet\"");
    }
}
