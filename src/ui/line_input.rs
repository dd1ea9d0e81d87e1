use std::io;
use std::path::{MAIN_SEPARATOR, Path};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typen::extract::DocumentKind;

const MAX_SCANNED: usize = 1000;
const MAX_CANDIDATES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Whether Tab completes file system paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Off,
    /// Directories plus files the importer can read.
    Documents,
}

/// Single-line editor used for the import path, titles and range prompts.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index.
    cursor: usize,
    completion: Completion,
    candidates: Vec<String>,
    candidate_index: Option<usize>,
    /// True if the last directory scan failed.
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str, completion: Completion) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            completion,
            candidates: Vec::new(),
            candidate_index: None,
            completion_error: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Split around the cursor for styled rendering. The middle is `None` at end of text.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => (
                &self.text[..byte_offset],
                Some(ch),
                &self.text[byte_offset + ch.len_utf8()..],
            ),
            None => (&self.text, None, ""),
        }
    }

    /// Insert pasted text at the cursor. Line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        self.reset_completion();
        let flat: String = s
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert_str(byte_offset, &flat);
        self.cursor += flat.chars().count();
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Tab => self.tab_complete(true),
            KeyCode::BackTab => self.tab_complete(false),
            code => {
                self.reset_completion();
                match code {
                    KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
                    KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
                    KeyCode::Home => self.cursor = 0,
                    KeyCode::End => self.cursor = self.len(),
                    KeyCode::Backspace if self.cursor > 0 => {
                        self.cursor -= 1;
                        self.remove_at(self.cursor);
                    }
                    KeyCode::Delete => self.remove_at(self.cursor),
                    KeyCode::Char('u') if ctrl => {
                        self.text.clear();
                        self.cursor = 0;
                    }
                    KeyCode::Char('w') if ctrl => self.delete_word_back(),
                    KeyCode::Char(ch) if !ctrl => {
                        let byte_offset = self.char_to_byte(self.cursor);
                        self.text.insert(byte_offset, ch);
                        self.cursor += 1;
                    }
                    _ => {}
                }
            }
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// unix-word-rubout: skip whitespace, then the word before it.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }

    fn reset_completion(&mut self) {
        self.candidates.clear();
        self.candidate_index = None;
        self.completion_error = false;
    }

    fn tab_complete(&mut self, forward: bool) {
        if self.completion == Completion::Off || self.cursor < self.len() {
            return;
        }
        match self.candidate_index {
            None => {
                self.completion_error = false;
                self.candidates = self.scan_directory();
                if !self.candidates.is_empty() {
                    self.apply_candidate(0);
                }
            }
            Some(idx) => {
                let count = self.candidates.len();
                let next = if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                };
                self.apply_candidate(next);
            }
        }
    }

    fn apply_candidate(&mut self, idx: usize) {
        self.candidate_index = Some(idx);
        self.text = self.candidates[idx].clone();
        self.cursor = self.len();
    }

    fn scan_directory(&mut self) -> Vec<String> {
        let seed = self.text.clone();
        let last_sep = seed.rfind('/').into_iter().chain(seed.rfind('\\')).max();
        let (dir_str, partial) = match last_sep {
            Some(pos) => (&seed[..=pos], &seed[pos + 1..]),
            None => ("", seed.as_str()),
        };

        // Expand ~ for the scan but keep it in the candidates.
        let scan_dir = match (dir_str.strip_prefix('~'), dirs::home_dir()) {
            (Some(rest), Some(home)) => format!("{}{rest}", home.display()),
            _ if dir_str.is_empty() => ".".to_string(),
            _ => dir_str.to_string(),
        };

        match std::fs::read_dir(&scan_dir) {
            Ok(rd) => {
                let entries = rd.map(|r| {
                    r.map(|entry| {
                        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                        (entry.file_name().to_string_lossy().to_string(), is_dir)
                    })
                });
                self.collect_candidates(entries, dir_str, partial)
            }
            Err(_) => {
                self.completion_error = true;
                Vec::new()
            }
        }
    }

    /// Filter and order scanned entries: directories first, then importable files.
    fn collect_candidates(
        &mut self,
        entries: impl Iterator<Item = io::Result<(String, bool)>>,
        dir_str: &str,
        partial: &str,
    ) -> Vec<String> {
        let include_hidden = partial.starts_with('.');
        let mut found: Vec<(bool, String)> = Vec::new();

        for entry in entries.take(MAX_SCANNED) {
            let Ok((name, is_dir)) = entry else {
                self.completion_error = true;
                return Vec::new();
            };
            if (!include_hidden && name.starts_with('.')) || !name.starts_with(partial) {
                continue;
            }
            if is_dir {
                found.push((true, format!("{dir_str}{name}{MAIN_SEPARATOR}")));
            } else if self.completion == Completion::Documents
                && DocumentKind::from_path(Path::new(&name)).is_some()
            {
                found.push((false, format!("{dir_str}{name}")));
            }
        }

        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        found.truncate(MAX_CANDIDATES);
        found.into_iter().map(|(_, path)| path).collect()
    }
}
