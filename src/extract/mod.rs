//! Turning files and pasted text into library records.
//!
//! Plain text files are read locally. PDF and Word documents are handed to a
//! remote model that returns their text (feature `network`). Whatever comes
//! back is sanitized and normalized before it is accepted.

#[cfg(feature = "network")]
pub mod gemini;
pub mod plain;

use std::io;
use std::path::Path;

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::engine::normalize::{intake, normalize};
use crate::error::PracticeError;
use crate::store::schema::SourceText;

pub use plain::PlainTextExtractor;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Gemini API key is missing. Set the {0} environment variable.")]
    MissingApiKey(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read the file: {0}")]
    Io(#[from] io::Error),

    #[error("Document extraction failed: {0}")]
    Request(String),

    #[error("Extraction returned no text.")]
    EmptyResponse,

    #[error("Document content is too brief for practice ({len} of {min} characters).")]
    TooShort { len: usize, min: usize },

    #[error("Document extraction needs network support, which this build lacks.")]
    NetworkDisabled,
}

/// Pull plain text out of a file on disk.
pub trait Extractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
    Doc,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" | "md" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "doc" => Some(DocumentKind::Doc),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Doc => "application/msword",
        }
    }

    pub fn is_remote(self) -> bool {
        !matches!(self, DocumentKind::PlainText)
    }
}

/// Picks the local reader or the remote model by file extension.
pub struct DocumentExtractor {
    plain: PlainTextExtractor,
    #[cfg(feature = "network")]
    remote: Option<gemini::GeminiExtractor>,
    api_key_env: String,
}

impl DocumentExtractor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            plain: PlainTextExtractor,
            #[cfg(feature = "network")]
            remote: gemini::GeminiExtractor::from_config(config).ok(),
            api_key_env: config.extraction_api_key_env.clone(),
        }
    }

    #[cfg(feature = "network")]
    fn extract_remote(&self, path: &Path) -> Result<String, ExtractError> {
        match &self.remote {
            Some(remote) => remote.extract(path),
            None => Err(ExtractError::MissingApiKey(self.api_key_env.clone())),
        }
    }

    #[cfg(not(feature = "network"))]
    fn extract_remote(&self, _path: &Path) -> Result<String, ExtractError> {
        let _ = &self.api_key_env;
        Err(ExtractError::NetworkDisabled)
    }
}

impl Extractor for DocumentExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let kind = DocumentKind::from_path(path).ok_or_else(|| {
            ExtractError::UnsupportedFormat(
                path.extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_else(|| path.display().to_string()),
            )
        })?;
        if kind.is_remote() {
            self.extract_remote(path)
        } else {
            self.plain.extract(path)
        }
    }
}

/// Extract, clean and check a document, producing a new library record
/// titled after the file name.
pub fn import_document(
    extractor: &dyn Extractor,
    path: &Path,
    config: &Config,
) -> Result<SourceText, PracticeError> {
    let raw = extractor.extract(path)?;
    let filter = config.char_filter();
    let content = intake(&raw, &filter, config.min_content_chars).map_err(|err| {
        let cleaned = normalize(&filter.filter_text(&raw)).join("\n");
        match cleaned.chars().count() {
            0 => err,
            len => ExtractError::TooShort {
                len,
                min: config.min_content_chars,
            }
            .into(),
        }
    })?;
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(default_title);
    info!(path = %path.display(), chars = content.len(), "document imported");
    Ok(SourceText::new(&title, &content))
}

/// Clean and check pasted text. A blank title falls back to `Session HH:MM`.
pub fn import_pasted(raw: &str, title: &str, config: &Config) -> Result<SourceText, PracticeError> {
    let content = intake(raw.trim(), &config.char_filter(), config.min_content_chars)?;
    let title = match title.trim() {
        "" => default_title(),
        t => t.to_string(),
    };
    info!(chars = content.len(), "pasted text imported");
    Ok(SourceText::new(&title, &content))
}

fn default_title() -> String {
    format!("Session {}", Local::now().format("%H:%M"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    struct FixedExtractor(Result<String, ()>);

    impl Extractor for FixedExtractor {
        fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
            self.0
                .clone()
                .map_err(|_| ExtractError::Request("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("a/b/Essay.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.md")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("x.docx")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::from_path(Path::new("x.png")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
        assert!(DocumentKind::Doc.is_remote());
        assert_eq!(DocumentKind::Doc.mime_type(), "application/msword");
    }

    #[test]
    fn test_unsupported_extension() {
        let extractor = DocumentExtractor::from_config(&Config::default());
        let err = extractor.extract(Path::new("picture.png")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ref e) if e == ".png"));
    }

    #[test]
    fn test_import_document_titles_from_stem() {
        let extractor = FixedExtractor(Ok("\u{2022} The first line.\n\nThe second line.".into()));
        let text =
            import_document(&extractor, &PathBuf::from("/tmp/My Essay.pdf"), &Config::default())
                .unwrap();
        assert_eq!(text.title, "My Essay");
        assert_eq!(text.content, "The first line.\nThe second line.");
    }

    #[test]
    fn test_import_document_too_short() {
        let extractor = FixedExtractor(Ok("tiny".into()));
        let err = import_document(&extractor, Path::new("a.pdf"), &Config::default()).unwrap_err();
        assert_eq!(
            err,
            PracticeError::Extraction(
                "Document content is too brief for practice (4 of 10 characters).".into()
            )
        );
    }

    #[test]
    fn test_import_document_reports_length_after_cleaning() {
        let extractor = FixedExtractor(Ok("\u{2022} \u{2022}  ok  \u{2022}\n\n\u{25cf}\u{25cf}".into()));
        let err = import_document(&extractor, Path::new("a.pdf"), &Config::default()).unwrap_err();
        assert_eq!(
            err,
            PracticeError::Extraction(
                "Document content is too brief for practice (2 of 10 characters).".into()
            )
        );

        let only_bullets = FixedExtractor(Ok("\u{2022}".repeat(12)));
        let err =
            import_document(&only_bullets, Path::new("a.pdf"), &Config::default()).unwrap_err();
        assert_eq!(err, PracticeError::EmptyContent);
    }

    #[test]
    fn test_import_document_surfaces_upstream_message() {
        let extractor = FixedExtractor(Err(()));
        let err = import_document(&extractor, Path::new("a.pdf"), &Config::default()).unwrap_err();
        assert_eq!(
            err,
            PracticeError::Extraction("Document extraction failed: quota exceeded".into())
        );
    }

    #[test]
    fn test_import_pasted() {
        let config = Config::default();
        let text = import_pasted("  Hello   there, world!  \n\n again ", "  Greeting ", &config)
            .unwrap();
        assert_eq!(text.title, "Greeting");
        assert_eq!(text.content, "Hello there, world!\nagain");

        let untitled = import_pasted("long enough content", "", &config).unwrap();
        assert!(untitled.title.starts_with("Session "));

        assert_eq!(
            import_pasted("short", "t", &config).unwrap_err(),
            PracticeError::EmptyContent
        );
    }
}
