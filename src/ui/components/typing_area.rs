use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use typen::session::drill::{CharClass, DrillState};

use crate::ui::layout::scroll_window;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    drill: &'a DrillState,
    theme: &'a Theme,
    paused: bool,
}

impl<'a> TypingArea<'a> {
    pub fn new(drill: &'a DrillState, theme: &'a Theme, paused: bool) -> Self {
        Self {
            drill,
            theme,
            paused,
        }
    }
}

/// A render token maps a single target character to its display representation.
struct RenderToken {
    display: String,
    is_line_break: bool,
}

fn build_render_tokens(target: &[char]) -> Vec<RenderToken> {
    target
        .iter()
        .map(|&ch| match ch {
            '\n' => RenderToken {
                display: "\u{21b5}".to_string(), // ↵
                is_line_break: true,
            },
            _ => RenderToken {
                display: ch.to_string(),
                is_line_break: false,
            },
        })
        .collect()
}

/// How a wrongly typed character is drawn in place of the target.
fn typed_display(typed: char) -> String {
    match typed {
        ' ' => "\u{2423}".to_string(), // ␣
        '\n' => "\u{21b5}".to_string(),
        c => c.to_string(),
    }
}

/// Spoken name of an expected character for the corrective hint.
pub fn hint_label(expected: char) -> String {
    match expected {
        ' ' => "Space".to_string(),
        '\n' => "Enter".to_string(),
        c => c.to_string(),
    }
}

/// The most recent wrong position with what was expected there.
pub fn latest_miss(drill: &DrillState) -> Option<(usize, char)> {
    (0..drill.typed_len())
        .rev()
        .find(|&i| matches!(drill.classify(i), CharClass::Incorrect { .. }))
        .and_then(|i| drill.expected_at(i).map(|c| (i, c)))
}

/// Split the target into screen rows of at most `width` cells.
///
/// Rows break after a space when the next word would not fit, inside a word
/// only when it is wider than a row, and always after a line break.
fn wrap_rows(target: &[char], width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    if width == 0 {
        return rows;
    }
    let mut line_start = 0;
    while line_start < target.len() {
        let line_end = target[line_start..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(target.len(), |p| line_start + p + 1);
        let mut pos = line_start;
        while pos < line_end {
            if line_end - pos <= width {
                rows.push(pos..line_end);
                break;
            }
            let cut = target[pos..pos + width]
                .iter()
                .rposition(|&c| c == ' ')
                .map_or(pos + width, |s| pos + s + 1);
            rows.push(pos..cut);
            pos = cut;
        }
        line_start = line_end;
    }
    rows
}

/// Row holding `cursor`; past the end counts as the last row.
fn cursor_row(rows: &[Range<usize>], cursor: usize) -> usize {
    rows.iter()
        .position(|r| r.contains(&cursor))
        .unwrap_or(rows.len().saturating_sub(1))
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let tokens = build_render_tokens(self.drill.target());

        let mut block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        if let Some((idx, expected)) = latest_miss(self.drill) {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" expected {} at {} ", hint_label(expected), idx + 1),
                Style::default().fg(colors.accent()),
            )));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = wrap_rows(self.drill.target(), inner.width as usize);
        // Keep one row of upcoming text below the cursor when there is one.
        let focus = (cursor_row(&rows, self.drill.cursor()) + 1).min(rows.len().saturating_sub(1));
        let window = scroll_window(focus, rows.len(), inner.height as usize);

        let mut lines = Vec::with_capacity(window.len());
        for row in &rows[window] {
            let spans: Vec<Span> = row
                .clone()
                .map(|idx| {
                    let token = &tokens[idx];
                    match self.drill.classify(idx) {
                        CharClass::Correct => Span::styled(
                            token.display.clone(),
                            Style::default().fg(colors.text_correct()),
                        ),
                        CharClass::Incorrect { typed } => Span::styled(
                            if token.is_line_break {
                                token.display.clone()
                            } else {
                                typed_display(typed)
                            },
                            Style::default()
                                .fg(colors.text_incorrect())
                                .bg(colors.text_incorrect_bg())
                                .add_modifier(Modifier::UNDERLINED),
                        ),
                        CharClass::Cursor if !self.paused => Span::styled(
                            token.display.clone(),
                            Style::default()
                                .fg(colors.text_cursor_fg())
                                .bg(colors.text_cursor_bg()),
                        ),
                        CharClass::Cursor | CharClass::Untyped => Span::styled(
                            token.display.clone(),
                            Style::default().fg(colors.text_pending()),
                        ),
                    }
                })
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
