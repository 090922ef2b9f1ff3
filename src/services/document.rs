// Document Sources
// Supplies visible text elements to the extractor (pages, uploaded files)

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::text_extractor::{elements_from_text, normalize_document_text, TextElement};

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No document attached")]
    NoDocument,
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to parse DOCX: {0}")]
    Docx(String),
    #[error("Failed to parse PDF: {0}")]
    Pdf(String),
    #[error("Document parsing task failed: {0}")]
    Task(String),
}

/// Source of the visible text-bearing elements of one document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn visible_elements(&self) -> Result<Vec<TextElement>, ExtractionError>;
}

/// In-memory element list, e.g. as captured from a rendered page.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    elements: Vec<TextElement>,
}

impl StaticDocument {
    pub fn new(elements: Vec<TextElement>) -> Self {
        Self { elements }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(elements_from_text(text))
    }
}

#[async_trait]
impl DocumentSource for StaticDocument {
    async fn visible_elements(&self) -> Result<Vec<TextElement>, ExtractionError> {
        Ok(self.elements.clone())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FileFormat {
    PlainText,
    Docx,
    Pdf,
}

fn detect_format(path: &Path) -> Result<FileFormat, ExtractionError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" | "markdown" | "text" => Ok(FileFormat::PlainText),
        "docx" => Ok(FileFormat::Docx),
        "pdf" => Ok(FileFormat::Pdf),
        other => Err(ExtractionError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            other.to_string()
        })),
    }
}

/// Document loaded from disk; the format is chosen by file extension.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSource for FileDocument {
    async fn visible_elements(&self) -> Result<Vec<TextElement>, ExtractionError> {
        let format = detect_format(&self.path)?;
        let bytes = tokio::fs::read(&self.path).await?;
        info!(
            path = %self.path.display(),
            bytes = bytes.len(),
            format = ?format,
            "document.load"
        );

        // Parsers are synchronous and can be slow on large files
        let elements = tokio::task::spawn_blocking(move || parse_elements(format, &bytes))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;

        debug!(elements = elements.len(), "document.elements");
        Ok(elements)
    }
}

fn parse_elements(format: FileFormat, bytes: &[u8]) -> Result<Vec<TextElement>, ExtractionError> {
    match format {
        FileFormat::PlainText => Ok(elements_from_text(&String::from_utf8_lossy(bytes))),
        FileFormat::Docx => docx_elements(bytes),
        FileFormat::Pdf => {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
            Ok(elements_from_text(&text))
        }
    }
}

/// One element per non-empty DOCX paragraph
fn docx_elements(bytes: &[u8]) -> Result<Vec<TextElement>, ExtractionError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut elements = Vec::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        let mut text = String::new();
        for p_child in &paragraph.children {
            if let ParagraphChild::Run(run) = p_child {
                for r_child in &run.children {
                    if let RunChild::Text(t) = r_child {
                        text.push_str(&t.text);
                    }
                }
            }
        }
        let text = normalize_document_text(&text);
        if !text.is_empty() {
            elements.push(TextElement::visible(text));
        }
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.TXT")).unwrap(), FileFormat::PlainText);
        assert_eq!(detect_format(Path::new("a.docx")).unwrap(), FileFormat::Docx);
        assert_eq!(detect_format(Path::new("a.pdf")).unwrap(), FileFormat::Pdf);
        assert!(matches!(
            detect_format(Path::new("a.exe")),
            Err(ExtractionError::UnsupportedFormat(ext)) if ext == "exe"
        ));
    }

    #[tokio::test]
    async fn test_plain_text_file_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "First block of text here.\n\nSecond block of text here.").unwrap();

        let elements = FileDocument::new(&path).visible_elements().await.unwrap();
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|e| e.is_visible()));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileDocument::new(dir.path().join("missing.md"))
            .visible_elements()
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = FileDocument::new(&path).visible_elements().await.unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[tokio::test]
    async fn test_static_document_returns_elements() {
        let doc = StaticDocument::from_text("alpha\n\nbeta");
        let elements = doc.visible_elements().await.unwrap();
        assert_eq!(elements.len(), 2);
    }
}
