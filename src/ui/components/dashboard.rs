use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use typen::engine::metrics::format_duration;
use typen::session::PracticeResult;

use crate::ui::theme::Theme;

/// Summary shown once a session finishes.
pub struct Dashboard<'a> {
    result: &'a PracticeResult,
    title: &'a str,
    /// Best earlier WPM on the same text, if any.
    previous_best: Option<u32>,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        result: &'a PracticeResult,
        title: &'a str,
        previous_best: Option<u32>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            result,
            title,
            previous_best,
            theme,
        }
    }
}

/// Signed difference against an earlier best, e.g. `+4` or `-2`.
fn format_delta(current: u32, best: u32) -> String {
    let delta = current as i64 - best as i64;
    if delta > 0 {
        format!("\u{2191}+{delta}")
    } else if delta < 0 {
        format!("\u{2193}{delta}")
    } else {
        "=".to_string()
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Practice Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.title,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let mut speed = vec![
            Span::styled("  Speed:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} WPM", self.result.wpm),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(best) = self.previous_best {
            speed.push(Span::styled(
                format!("  ({} vs best {best})", format_delta(self.result.wpm, best)),
                Style::default().fg(colors.text_pending()),
            ));
        }
        Paragraph::new(Line::from(speed)).render(layout[1], buf);

        let acc_color = if self.result.accuracy >= 95 {
            colors.success()
        } else if self.result.accuracy >= 85 {
            colors.accent()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", self.result.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(layout[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  Time:     ", Style::default().fg(colors.fg())),
            Span::styled(
                format_duration(self.result.duration),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            "  [Enter/Esc] Back to library",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[5], buf);
    }
}
