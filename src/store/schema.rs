use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::normalize::word_count;
use crate::session::result::PracticeResult;

pub const SCHEMA_VERSION: u32 = 1;

/// Opaque record id: creation millis in hex followed by random bits.
pub fn new_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let salt: u32 = rand::thread_rng().r#gen();
    format!("{millis:x}{salt:08x}")
}

/// A text saved in the library. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceText {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl SourceText {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    /// First `max_chars` characters on one line, with an ellipsis if cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('\u{2026}');
        cut
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryData {
    pub schema_version: u32,
    pub texts: Vec<SourceText>,
}

impl Default for LibraryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            texts: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultHistoryData {
    pub schema_version: u32,
    pub results: Vec<PracticeResult>,
}

impl Default for ResultHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}
