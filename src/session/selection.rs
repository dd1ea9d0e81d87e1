use std::collections::BTreeSet;

use crate::engine::normalize::{normalize, word_count};
use crate::error::PracticeError;

/// Which paragraphs of a source text the user wants to practice.
///
/// Every gesture unions into the current selection except a plain toggle,
/// which flips a single paragraph. Confirming always joins paragraphs in
/// document order regardless of the order they were picked in.
#[derive(Clone, Debug)]
pub struct SelectionModel {
    paragraphs: Vec<String>,
    selected: BTreeSet<usize>,
    anchor: Option<usize>,
}

impl SelectionModel {
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self {
            paragraphs,
            selected: BTreeSet::new(),
            anchor: None,
        }
    }

    pub fn from_content(content: &str) -> Self {
        Self::new(normalize(content))
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected indices in ascending order.
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn can_confirm(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn paragraph_words(&self, index: usize) -> usize {
        self.paragraphs.get(index).map_or(0, |p| word_count(p))
    }

    /// Flip one paragraph, or with a range gesture union everything between
    /// the anchor and `index`. The anchor moves to `index` either way.
    pub fn toggle(&mut self, index: usize, range_gesture: bool) {
        if index >= self.paragraphs.len() {
            return;
        }
        match self.anchor {
            Some(anchor) if range_gesture => {
                let (lo, hi) = (anchor.min(index), anchor.max(index));
                self.selected.extend(lo..=hi);
            }
            _ => {
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
            }
        }
        self.anchor = Some(index);
    }

    /// Union a 1-indexed inclusive range, clamped to the paragraph count.
    /// Argument order does not matter.
    pub fn apply_range(&mut self, from: usize, to: usize) {
        let len = self.paragraphs.len();
        if len == 0 {
            return;
        }
        let from = from.clamp(1, len);
        let to = to.clamp(1, len);
        let (lo, hi) = (from.min(to), from.max(to));
        self.selected.extend(lo - 1..hi);
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.paragraphs.len()).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Join the selected paragraphs, ascending, with single spaces.
    pub fn confirm(&self) -> Result<String, PracticeError> {
        if self.selected.is_empty() {
            return Err(PracticeError::EmptySelection);
        }
        let parts: Vec<&str> = self
            .selected
            .iter()
            .map(|&i| self.paragraphs[i].as_str())
            .collect();
        Ok(parts.join(" "))
    }
}

/// Parse a range typed as `from-to`, `from to`, `from,to` or a single number.
pub fn parse_range(input: &str) -> Option<(usize, usize)> {
    let mut parts = input
        .split(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let from: usize = parts.next()?.parse().ok()?;
    let to: usize = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => from,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(n: usize) -> SelectionModel {
        SelectionModel::new((0..n).map(|i| format!("p{i}")).collect())
    }

    #[test]
    fn test_confirm_orders_by_index_not_click_order() {
        let mut m = model(3);
        m.toggle(2, false);
        m.toggle(0, false);
        m.toggle(1, false);
        assert_eq!(m.confirm().unwrap(), "p0 p1 p2");
    }

    #[test]
    fn test_confirm_empty_selection() {
        let m = model(3);
        assert!(!m.can_confirm());
        assert_eq!(m.confirm(), Err(PracticeError::EmptySelection));
    }

    #[test]
    fn test_shift_toggle_then_plain_toggle() {
        let mut m = model(6);
        m.toggle(1, false);
        m.toggle(4, true);
        assert_eq!(m.selected(), vec![1, 2, 3, 4]);
        m.toggle(2, false);
        assert_eq!(m.selected(), vec![1, 3, 4]);
        assert_eq!(m.anchor(), Some(2));
    }

    #[test]
    fn test_range_gesture_without_anchor_acts_as_toggle() {
        let mut m = model(4);
        m.toggle(2, true);
        assert_eq!(m.selected(), vec![2]);
        assert_eq!(m.anchor(), Some(2));
    }

    #[test]
    fn test_range_gesture_backwards_unions() {
        let mut m = model(8);
        m.toggle(6, false);
        m.toggle(0, false);
        m.toggle(6, false); // deselects 6, anchor at 6
        m.toggle(3, true);
        assert_eq!(m.selected(), vec![0, 3, 4, 5, 6]);
    }

    #[test]
    fn test_toggle_out_of_bounds_ignored() {
        let mut m = model(2);
        m.toggle(5, false);
        assert_eq!(m.selected_count(), 0);
        assert_eq!(m.anchor(), None);
    }

    #[test]
    fn test_apply_range_order_independent() {
        let mut a = model(8);
        let mut b = model(8);
        a.apply_range(5, 2);
        b.apply_range(2, 5);
        assert_eq!(a.selected(), b.selected());
        assert_eq!(a.selected(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_apply_range_clamps_and_unions() {
        let mut m = model(5);
        m.toggle(0, false);
        m.apply_range(4, 99);
        assert_eq!(m.selected(), vec![0, 3, 4]);
        m.apply_range(0, 0);
        assert!(m.is_selected(0));
    }

    #[test]
    fn test_apply_range_on_empty_model() {
        let mut m = model(0);
        m.apply_range(1, 3);
        assert_eq!(m.selected_count(), 0);
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut m = model(3);
        m.toggle(1, false);
        m.select_all();
        assert_eq!(m.selected(), vec![0, 1, 2]);
        m.clear();
        assert_eq!(m.selected_count(), 0);
        assert_eq!(m.anchor(), None);
        // after clear a range gesture has no anchor to extend from
        m.toggle(2, true);
        assert_eq!(m.selected(), vec![2]);
    }

    #[test]
    fn test_from_content_normalizes() {
        let m = SelectionModel::from_content("first  one\n\n  second\n");
        assert_eq!(m.paragraphs(), &["first one".to_string(), "second".to_string()]);
        assert_eq!(m.paragraph_words(0), 2);
        assert_eq!(m.paragraph_words(9), 0);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("2-5"), Some((2, 5)));
        assert_eq!(parse_range(" 7 3 "), Some((7, 3)));
        assert_eq!(parse_range("4,4"), Some((4, 4)));
        assert_eq!(parse_range("3"), Some((3, 3)));
        assert_eq!(parse_range(""), None);
        assert_eq!(parse_range("a-b"), None);
        assert_eq!(parse_range("1-2-3"), None);
    }
}
