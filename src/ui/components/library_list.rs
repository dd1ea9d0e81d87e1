use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use typen::store::{Library, SourceText};

use crate::ui::layout::scroll_window;
use crate::ui::theme::Theme;

const ROW_HEIGHT: u16 = 3;

/// Cursor over the library in newest-first order.
#[derive(Debug, Default)]
pub struct LibraryCursor {
    pub selected: usize,
}

impl LibraryCursor {
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = if self.selected > 0 {
            self.selected - 1
        } else {
            len - 1
        };
    }

    /// Keep the cursor on a real row after the library shrinks.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub struct LibraryList<'a> {
    library: &'a Library,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> LibraryList<'a> {
    pub fn new(library: &'a Library, selected: usize, theme: &'a Theme) -> Self {
        Self {
            library,
            selected,
            theme,
        }
    }
}

fn row_lines(
    text: &SourceText,
    is_selected: bool,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let colors = &theme.colors;
    let indicator = if is_selected { ">" } else { " " };
    let meta = format!(
        "  {} words \u{00b7} {}",
        text.word_count(),
        text.created_at.format("%Y-%m-%d")
    );
    vec![
        Line::from(vec![
            Span::styled(
                format!(" {indicator} {}", text.title),
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ),
            Span::styled(meta, Style::default().fg(colors.text_pending())),
        ]),
        Line::from(Span::styled(
            format!("     {}", text.preview(width.saturating_sub(6))),
            Style::default().fg(colors.text_pending()),
        )),
    ]
}

impl Widget for LibraryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Library ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.library.is_empty() {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Your library is empty.",
                    Style::default().fg(colors.fg()),
                )),
                Line::from(Span::styled(
                    "Press [i] to import a document or paste text.",
                    Style::default().fg(colors.text_pending()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let rows = (inner.height / ROW_HEIGHT) as usize;
        let window = scroll_window(self.selected, self.library.len(), rows);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                window
                    .clone()
                    .map(|_| Constraint::Length(ROW_HEIGHT))
                    .collect::<Vec<_>>(),
            )
            .split(inner);

        for (slot, idx) in window.enumerate() {
            let Some(text) = self.library.nth_newest(idx) else {
                break;
            };
            let lines = row_lines(text, idx == self.selected, inner.width as usize, self.theme);
            if let Some(rect) = layout.get(slot) {
                Paragraph::new(lines).render(*rect, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = LibraryCursor::default();
        cursor.prev(3);
        assert_eq!(cursor.selected, 2);
        cursor.next(3);
        assert_eq!(cursor.selected, 0);
        cursor.next(0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn test_cursor_clamps_after_delete() {
        let mut cursor = LibraryCursor { selected: 4 };
        cursor.clamp(3);
        assert_eq!(cursor.selected, 2);
        cursor.clamp(0);
        assert_eq!(cursor.selected, 0);
    }
}
