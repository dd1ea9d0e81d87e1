use icu_normalizer::ComposingNormalizerBorrowed;

use crate::engine::filter::CharFilter;
use crate::error::PracticeError;

/// Smallest amount of normalized text, in characters, worth starting a session on.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 10;

/// Split raw content into trimmed, whitespace-collapsed, non-empty paragraphs.
pub fn normalize(raw: &str) -> Vec<String> {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(raw);
    composed
        .split(['\n', '\r'])
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Build the exact character sequence a session asks the user to reproduce.
pub fn practice_target(practice: &str) -> String {
    normalize(practice).join("\n")
}

/// Clean incoming text and check it is long enough to practice.
///
/// Returns the surviving paragraphs joined by single line breaks, which is the
/// form stored in a library record.
pub fn intake(raw: &str, filter: &CharFilter, min_chars: usize) -> Result<String, PracticeError> {
    let paragraphs = normalize(&filter.filter_text(raw));
    if paragraphs.is_empty() {
        return Err(PracticeError::EmptyContent);
    }
    let content = paragraphs.join("\n");
    if content.chars().count() < min_chars {
        return Err(PracticeError::EmptyContent);
    }
    Ok(content)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
