/// How a single target position currently reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    /// Typed something else; carries what was actually typed.
    Incorrect { typed: char },
    /// The next position to type.
    Cursor,
    Untyped,
}

/// Target text and the input typed against it, compared position by position.
///
/// There is no alignment: one skipped or doubled keystroke shifts every later
/// comparison. The input never grows past the target.
#[derive(Clone, Debug)]
pub struct DrillState {
    target: Vec<char>,
    input: Vec<char>,
}

impl DrillState {
    pub fn new(text: &str) -> Self {
        Self {
            target: text.chars().collect(),
            input: Vec::new(),
        }
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn typed_len(&self) -> usize {
        self.input.len()
    }

    /// Position of the cursor, equal to how many characters have been typed.
    pub fn cursor(&self) -> usize {
        self.input.len()
    }

    pub fn is_complete(&self) -> bool {
        self.input.len() >= self.target.len()
    }

    /// Append one character. Returns false once the target is fully typed.
    pub fn append(&mut self, ch: char) -> bool {
        if self.is_complete() {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub fn classify(&self, index: usize) -> CharClass {
        match index.cmp(&self.input.len()) {
            std::cmp::Ordering::Less => {
                let typed = self.input[index];
                if self.target.get(index) == Some(&typed) {
                    CharClass::Correct
                } else {
                    CharClass::Incorrect { typed }
                }
            }
            std::cmp::Ordering::Equal => CharClass::Cursor,
            std::cmp::Ordering::Greater => CharClass::Untyped,
        }
    }

    pub fn expected_at(&self, index: usize) -> Option<char> {
        self.target.get(index).copied()
    }

    pub fn correct_count(&self) -> usize {
        self.input
            .iter()
            .zip(&self.target)
            .filter(|(typed, expected)| typed == expected)
            .count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.input.len() - self.correct_count()
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.input.len() as f64 / self.target.len() as f64
    }
}
