use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::check::WordStatus;
use crate::ui::theme::Theme;

/// One word slot on the card strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card<'a> {
    pub text: &'a str,
    pub status: WordStatus,
    pub current: bool,
}

/// Word-by-word feedback strip: each word as a small bracketed card, coloured
/// by its status.
pub struct WordCards<'a> {
    cards: Vec<Card<'a>>,
    theme: &'a Theme,
}

impl<'a> WordCards<'a> {
    pub fn new(cards: Vec<Card<'a>>, theme: &'a Theme) -> Self {
        Self { cards, theme }
    }
}

pub fn card_label(card: &Card<'_>) -> String {
    format!("[{}]", card.text)
}

impl Widget for WordCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = Vec::with_capacity(self.cards.len() * 2);
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let mut style = match card.status {
                WordStatus::Correct => Style::default().fg(colors.text_correct()),
                WordStatus::Incorrect => Style::default().fg(colors.text_incorrect()),
                WordStatus::Pending => Style::default().fg(colors.text_pending()),
            };
            if card.current {
                style = style
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(card_label(card), style));
        }
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_render_in_order_with_brackets() {
        let theme = Theme::default();
        let cards = vec![
            Card {
                text: "First",
                status: WordStatus::Correct,
                current: false,
            },
            Card {
                text: "*********",
                status: WordStatus::Pending,
                current: true,
            },
        ];
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        WordCards::new(cards, &theme).render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row.trim_end(), "[First] [*********]");
        assert_eq!(buf[(1, 0)].fg, theme.colors.text_correct());
        assert_eq!(buf[(9, 0)].fg, theme.colors.accent());
    }
}
