use anyhow::Result;

use crate::session::result::PracticeResult;
use crate::store::schema::SourceText;

/// Where the library is kept between runs.
pub trait LibraryStore {
    fn load_library(&self) -> Vec<SourceText>;
    fn save_library(&self, texts: &[SourceText]) -> Result<()>;
}

/// Receives each finished session's result.
pub trait ResultSink {
    fn record(&self, result: &PracticeResult) -> Result<()>;
}

/// Saved texts in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Library {
    texts: Vec<SourceText>,
}

impl Library {
    pub fn new(texts: Vec<SourceText>) -> Self {
        Self { texts }
    }

    pub fn load(store: &dyn LibraryStore) -> Self {
        Self::new(store.load_library())
    }

    pub fn save(&self, store: &dyn LibraryStore) -> Result<()> {
        store.save_library(&self.texts)
    }

    pub fn append(&mut self, text: SourceText) {
        self.texts.push(text);
    }

    pub fn remove(&mut self, id: &str) -> Option<SourceText> {
        let idx = self.texts.iter().position(|t| t.id == id)?;
        Some(self.texts.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&SourceText> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Newest first, the order the library is shown in.
    pub fn newest_first(&self) -> impl Iterator<Item = &SourceText> {
        self.texts.iter().rev()
    }

    /// Record at a newest-first display position.
    pub fn nth_newest(&self, display_idx: usize) -> Option<&SourceText> {
        self.newest_first().nth(display_idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceText> {
        self.texts.iter()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_remove_get() {
        let mut lib = Library::default();
        let a = SourceText::new("a", "alpha text");
        let b = SourceText::new("b", "beta text");
        let a_id = a.id.clone();
        lib.append(a);
        lib.append(b);
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.get(&a_id).map(|t| t.title.as_str()), Some("a"));

        let removed = lib.remove(&a_id).unwrap();
        assert_eq!(removed.title, "a");
        assert!(lib.get(&a_id).is_none());
        assert!(lib.remove(&a_id).is_none());
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn test_newest_first_order() {
        let mut lib = Library::default();
        lib.append(SourceText::new("first", "x"));
        lib.append(SourceText::new("second", "y"));
        let titles: Vec<&str> = lib.newest_first().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(lib.nth_newest(1).map(|t| t.title.as_str()), Some("first"));
        assert!(lib.nth_newest(2).is_none());
    }
}
