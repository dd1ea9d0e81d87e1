use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use typen::session::SelectionModel;

use crate::ui::layout::scroll_window;
use crate::ui::theme::Theme;

/// Paragraph picker: one row per paragraph with its check mark and word count.
pub struct SelectionList<'a> {
    model: &'a SelectionModel,
    cursor: usize,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> SelectionList<'a> {
    pub fn new(model: &'a SelectionModel, cursor: usize, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            model,
            cursor,
            title,
            theme,
        }
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

impl Widget for SelectionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " {} \u{00b7} {}/{} selected ",
                self.title,
                self.model.selected_count(),
                self.model.len()
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let number_width = self.model.len().to_string().len();
        let window = scroll_window(self.cursor, self.model.len(), inner.height as usize);
        let mut lines = Vec::with_capacity(window.len());

        for idx in window {
            let is_cursor = idx == self.cursor;
            let checked = self.model.is_selected(idx);
            let mark = if checked { "[x]" } else { "[ ]" };
            let anchor = if self.model.anchor() == Some(idx) { "\u{2022}" } else { " " };
            let words = format!(" ({}w)", self.model.paragraph_words(idx));
            let prefix = format!(" {mark}{anchor}{:>number_width$}. ", idx + 1);
            let room = (inner.width as usize)
                .saturating_sub(prefix.chars().count() + words.chars().count());
            let text = self.model.paragraphs().get(idx).map_or("", |p| p.as_str());

            let mut row_style = Style::default().fg(if checked {
                colors.fg()
            } else {
                colors.text_pending()
            });
            if is_cursor {
                row_style = row_style
                    .bg(colors.selected_bg())
                    .add_modifier(Modifier::BOLD);
            }

            lines.push(Line::from(vec![
                Span::styled(
                    prefix,
                    row_style.fg(if checked { colors.accent() } else { colors.text_pending() }),
                ),
                Span::styled(clip(text, room), row_style),
                Span::styled(words, row_style.fg(colors.text_pending())),
            ]));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a longer paragraph", 6), "a lon\u{2026}");
    }

    #[test]
    fn test_render_marks_selected_rows() {
        let mut model = SelectionModel::from_content("first para\nsecond para\nthird para");
        model.toggle(1, false);
        let theme = Theme::default();
        let area = Rect::new(0, 0, 50, 6);
        let mut buf = Buffer::empty(area);
        SelectionList::new(&model, 1, "Essay", &theme).render(area, &mut buf);

        let row = |y: u16| -> String { (0..50).map(|x| buf[(x, y)].symbol().to_string()).collect() };
        assert!(row(0).contains("1/3 selected"));
        assert!(row(1).contains("[ ] 1. first para"));
        assert!(row(2).contains("[x]\u{2022}2. second para"));
    }
}
