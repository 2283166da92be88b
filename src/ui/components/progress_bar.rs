use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Lesson progress: correct and incorrect sentences as two filled segments.
pub struct ProgressBar<'a> {
    pub label: String,
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, correct: usize, incorrect: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            correct,
            incorrect,
            total,
            theme,
        }
    }

    /// Cells for (correct, incorrect) in a bar `width` wide.
    pub fn segments(&self, width: u16) -> (u16, u16) {
        if self.total == 0 {
            return (0, 0);
        }
        let scale = |n: usize| (n.min(self.total) as f64 / self.total as f64 * width as f64) as u16;
        let correct = scale(self.correct);
        let done = scale(self.correct + self.incorrect).min(width);
        (correct, done.saturating_sub(correct))
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let (correct, incorrect) = self.segments(inner.width);
        let done = self.correct + self.incorrect;
        let label = format!("{done}/{}", self.total);

        for x in inner.x..inner.x + inner.width {
            let offset = x - inner.x;
            let style = if offset < correct {
                Style::default().fg(colors.bg()).bg(colors.success())
            } else if offset < correct + incorrect {
                Style::default().fg(colors.bg()).bg(colors.error())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_scale_to_width() {
        let theme = Theme::default();
        let bar = ProgressBar::new("p", 11, 11, 22, &theme);
        assert_eq!(bar.segments(20), (10, 10));
        let bar = ProgressBar::new("p", 0, 0, 22, &theme);
        assert_eq!(bar.segments(20), (0, 0));
        let bar = ProgressBar::new("p", 22, 0, 22, &theme);
        assert_eq!(bar.segments(20), (20, 0));
        let bar = ProgressBar::new("p", 0, 0, 0, &theme);
        assert_eq!(bar.segments(20), (0, 0));
    }
}
