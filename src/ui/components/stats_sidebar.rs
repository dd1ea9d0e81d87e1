use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use typen::engine::metrics::format_duration;
use typen::session::{LiveMetrics, SessionStatus};

use crate::ui::theme::Theme;

pub struct StatsSidebar<'a> {
    metrics: LiveMetrics,
    status: SessionStatus,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(metrics: LiveMetrics, status: SessionStatus, theme: &'a Theme) -> Self {
        Self {
            metrics,
            status,
            theme,
        }
    }
}

/// One-line stats for layouts too narrow for the sidebar.
pub fn compact_summary(metrics: &LiveMetrics) -> String {
    format!(
        " {} wpm | {}% | {} | {} errors ",
        metrics.wpm,
        metrics.accuracy,
        format_duration(metrics.elapsed_secs),
        metrics.mistakes
    )
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let m = &self.metrics;

        let accuracy_color = if m.accuracy >= 95 {
            colors.success()
        } else if m.accuracy >= 85 {
            colors.accent()
        } else {
            colors.error()
        };
        let status_label = match self.status {
            SessionStatus::Idle => "type to start",
            other => other.as_str(),
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("WPM: ", Style::default().fg(colors.fg())),
                Span::styled(
                    m.wpm.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Accuracy: ", Style::default().fg(colors.fg())),
                Span::styled(format!("{}%", m.accuracy), Style::default().fg(accuracy_color)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Time: ", Style::default().fg(colors.fg())),
                Span::styled(format_duration(m.elapsed_secs), Style::default().fg(colors.fg())),
            ]),
            Line::from(vec![
                Span::styled("Errors: ", Style::default().fg(colors.fg())),
                Span::styled(m.mistakes.to_string(), Style::default().fg(colors.error())),
            ]),
            Line::from(vec![
                Span::styled("Done: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:.0}%", m.progress * 100.0),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                status_label,
                Style::default().fg(colors.text_pending()),
            )),
        ];

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
