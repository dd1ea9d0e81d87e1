/// Decorative glyphs word processors like to leave behind in list items.
const DECORATIVE: &[char] = &[
    '\u{00b7}', '\u{2022}', '\u{25cf}', '\u{25aa}', '\u{2023}', '\u{2043}', '\u{2027}', '\u{25e6}',
    '\u{25ab}', '\u{25ac}',
];

/// Punctuation that survives symbol sanitizing.
const TYPING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '\'', '"', '(', ')', '-'];

/// Decides which characters of extracted or pasted text reach the trainer.
pub struct CharFilter {
    pub allowed_punctuation: Vec<char>,
    /// When false only decorative glyphs are removed.
    pub strict: bool,
}

impl CharFilter {
    pub fn new(allowed_punctuation: Vec<char>, strict: bool) -> Self {
        Self {
            allowed_punctuation,
            strict,
        }
    }

    /// ASCII letters, digits, whitespace and common typing punctuation.
    pub fn typing(strict: bool) -> Self {
        Self::new(TYPING_PUNCTUATION.to_vec(), strict)
    }

    pub fn is_allowed(&self, ch: char) -> bool {
        if DECORATIVE.contains(&ch) {
            return false;
        }
        if !self.strict {
            return true;
        }
        ch.is_ascii_alphanumeric() || ch.is_whitespace() || self.allowed_punctuation.contains(&ch)
    }

    pub fn filter_text(&self, text: &str) -> String {
        text.chars().filter(|&ch| self.is_allowed(ch)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bullets_in_both_modes() {
        let input = "\u{2022} first\n\u{25cf} second";
        assert_eq!(CharFilter::typing(true).filter_text(input), " first\n second");
        assert_eq!(CharFilter::typing(false).filter_text(input), " first\n second");
    }

    #[test]
    fn strict_mode_keeps_typing_punctuation_only() {
        let filter = CharFilter::typing(true);
        assert_eq!(
            filter.filter_text("Hi, \"you\" (there)! #tag @me 50% é"),
            "Hi, \"you\" (there)! tag me 50 "
        );
    }

    #[test]
    fn lenient_mode_keeps_unicode() {
        let filter = CharFilter::typing(false);
        assert_eq!(filter.filter_text("café #1"), "café #1");
    }
}
