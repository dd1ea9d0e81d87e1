use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use typen::session::drill::DrillState;

use crate::ui::theme::Theme;

/// How far through the target the typist is, as `typed / total` over a bar.
pub struct ProgressBar<'a> {
    typed: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(drill: &DrillState, theme: &'a Theme) -> Self {
        Self {
            typed: drill.typed_len(),
            total: drill.target_len(),
            theme,
        }
    }

    fn filled_cells(&self, width: u16) -> u16 {
        if self.total == 0 {
            return 0;
        }
        let cells = self.typed.min(self.total) * width as usize / self.total;
        cells as u16
    }

    fn caption(&self) -> String {
        let pct = if self.total == 0 {
            0
        } else {
            self.typed * 100 / self.total
        };
        format!("{}/{} chars \u{00b7} {pct}%", self.typed, self.total)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let bar = block.inner(area);
        block.render(area, buf);
        if bar.is_empty() {
            return;
        }

        let split = bar.x + self.filled_cells(bar.width);
        let filled = Style::default().fg(colors.bg()).bg(colors.bar_filled());
        let empty = Style::default().fg(colors.fg()).bg(colors.bar_empty());
        for x in bar.left()..bar.right() {
            buf[(x, bar.y)].set_style(if x < split { filled } else { empty });
        }

        let caption = self.caption();
        let caption_len = caption.chars().count() as u16;
        if caption_len <= bar.width {
            let x = bar.x + (bar.width - caption_len) / 2;
            buf.set_stringn(x, bar.y, &caption, bar.width as usize, Style::default());
        }
    }
}
