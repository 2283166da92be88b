use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::Sentence;
use crate::session::{Progress, SentenceStatus};
use crate::ui::theme::Theme;

/// Every sentence of the lesson, coloured by its recorded outcome.
pub struct TranscriptPanel<'a> {
    title: String,
    sentences: &'a [Sentence],
    progress: &'a Progress,
    current: usize,
    theme: &'a Theme,
}

impl<'a> TranscriptPanel<'a> {
    pub fn new(
        title: String,
        sentences: &'a [Sentence],
        progress: &'a Progress,
        current: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            sentences,
            progress,
            current,
            theme,
        }
    }
}

/// First visible row so that `current` stays roughly centred.
pub fn scroll_offset(current: usize, len: usize, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    current.saturating_sub(height / 2).min(len - height)
}

impl Widget for TranscriptPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        let offset = scroll_offset(self.current, self.sentences.len(), height);
        let lines: Vec<Line> = self
            .sentences
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, sentence)| {
                let mut style = match self.progress.status(sentence.id) {
                    SentenceStatus::Correct => Style::default().fg(colors.text_correct()),
                    SentenceStatus::Incorrect => Style::default().fg(colors.text_incorrect()),
                    SentenceStatus::Untouched => Style::default().fg(colors.text_pending()),
                };
                let marker = if i == self.current {
                    style = style.add_modifier(Modifier::BOLD).bg(colors.accent_dim());
                    "▶"
                } else {
                    " "
                };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(colors.accent())),
                    Span::styled(format!("{:>3}. {}", sentence.id, sentence.text), style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_current_in_view() {
        assert_eq!(scroll_offset(0, 22, 10), 0);
        assert_eq!(scroll_offset(8, 22, 10), 3);
        assert_eq!(scroll_offset(21, 22, 10), 12);
        assert_eq!(scroll_offset(5, 4, 10), 0);
        assert_eq!(scroll_offset(5, 22, 0), 0);
    }
}
