use std::fs;
use std::path::Path;

use tracing::debug;

use super::{ExtractError, Extractor};

/// Reads UTF-8 text files. Invalid sequences are replaced rather than rejected.
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read plain text");
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }
}
