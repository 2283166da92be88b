use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::check::WordStatus;
use crate::session::{Outcome, VariantView};
use crate::ui::components::word_cards::{Card, WordCards};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Recording state shown in the shadowing view.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowingStatus<'a> {
    pub can_record: bool,
    pub recording: bool,
    pub interim: &'a str,
}

/// The active variant's prompt, the answer field and the result line.
pub struct PracticeArea<'a> {
    title: String,
    view: &'a VariantView,
    input: &'a LineInput,
    shadowing: ShadowingStatus<'a>,
    auto_advance: bool,
    theme: &'a Theme,
}

impl<'a> PracticeArea<'a> {
    pub fn new(title: String, view: &'a VariantView, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self {
            title,
            view,
            input,
            shadowing: ShadowingStatus::default(),
            auto_advance: false,
            theme,
        }
    }

    pub fn shadowing(mut self, status: ShadowingStatus<'a>) -> Self {
        self.shadowing = status;
        self
    }

    /// Whether a correct missing word moves on by itself.
    pub fn auto_advance(mut self, on: bool) -> Self {
        self.auto_advance = on;
        self
    }

    fn input_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let (before, cursor, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            Span::styled(cursor.map_or(" ".to_string(), |c| c.to_string()), cursor_style),
            Span::styled(after.to_string(), Style::default().fg(colors.fg())),
        ])
    }

    fn outcome_line(&self, result: Option<Outcome>, extra: Option<String>) -> Line<'a> {
        let colors = &self.theme.colors;
        let Some(outcome) = result else {
            return Line::raw("");
        };
        let (text, color) = match outcome {
            Outcome::Correct => (t!("practice.correct").to_string(), colors.success()),
            Outcome::Incorrect => (t!("practice.incorrect").to_string(), colors.error()),
        };
        let mut spans = vec![Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if let Some(extra) = extra {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(extra, Style::default().fg(colors.text_pending())));
        }
        Line::from(spans)
    }

    /// (prompt lines, cards, show input, result line)
    fn parts(&self) -> (Vec<Line<'a>>, Vec<Card<'a>>, bool, Line<'a>) {
        let colors = &self.theme.colors;
        let muted = Style::default().fg(colors.text_pending());
        match self.view {
            VariantView::Whole {
                cards,
                revealed,
                result,
            } => {
                let cards = cards
                    .iter()
                    .map(|c| Card {
                        text: c.text.as_str(),
                        status: c.status,
                        current: false,
                    })
                    .collect();
                let extra = if *revealed {
                    Some(t!("practice.revealed").to_string())
                } else {
                    result.map(|_| t!("practice.press_next").to_string())
                };
                let prompt = vec![Line::styled(t!("practice.listen_first").to_string(), muted)];
                (prompt, cards, true, self.outcome_line(*result, extra))
            }
            VariantView::MissingWord { prompt, result } => {
                let lines = vec![
                    Line::styled(t!("practice.missing_word").to_string(), muted),
                    Line::styled(prompt.clone(), Style::default().fg(colors.fg())),
                ];
                let extra = match result {
                    Some(Outcome::Correct) if self.auto_advance => {
                        Some(t!("practice.auto_next").to_string())
                    }
                    _ => None,
                };
                (lines, Vec::new(), true, self.outcome_line(*result, extra))
            }
            VariantView::Sequential {
                words,
                current,
                last_correct,
            } => {
                let cards = words
                    .iter()
                    .enumerate()
                    .map(|(i, w)| Card {
                        text: w.text.as_str(),
                        status: w.status,
                        current: i == *current && w.status == WordStatus::Pending,
                    })
                    .collect();
                let prompt = vec![Line::styled(
                    t!(
                        "practice.next_word",
                        current = current + 1,
                        total = words.len()
                    )
                    .to_string(),
                    muted,
                )];
                let result = match (last_correct, words.get(*current)) {
                    (Some(true), Some(w)) => Line::styled(
                        t!("practice.word_correct", word = w.text.as_str()).to_string(),
                        Style::default().fg(colors.success()),
                    ),
                    (Some(false), Some(w)) => Line::styled(
                        t!("practice.word_incorrect", word = w.text.as_str()).to_string(),
                        Style::default().fg(colors.error()),
                    ),
                    _ => Line::raw(""),
                };
                (prompt, cards, true, result)
            }
            VariantView::Shadowing {
                target,
                transcript,
                result,
            } => {
                let mut lines = vec![
                    Line::styled(t!("shadowing.target").to_string(), muted),
                    Line::styled(
                        target.clone(),
                        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                    ),
                    Line::raw(""),
                ];
                let status = if !self.shadowing.can_record {
                    Line::styled(t!("shadowing.disabled").to_string(), muted)
                } else if self.shadowing.recording {
                    Line::styled(
                        t!("shadowing.recording").to_string(),
                        Style::default().fg(colors.error()),
                    )
                } else {
                    Line::styled(t!("shadowing.idle").to_string(), Style::default().fg(colors.accent()))
                };
                lines.push(status);
                if self.shadowing.recording && !self.shadowing.interim.is_empty() {
                    lines.push(Line::styled(
                        t!("shadowing.listening", text = self.shadowing.interim).to_string(),
                        muted,
                    ));
                }
                let extra = transcript
                    .as_ref()
                    .map(|text| t!("shadowing.heard", text = text.as_str()).to_string());
                (lines, Vec::new(), false, self.outcome_line(*result, extra))
            }
        }
    }
}

impl Widget for PracticeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (prompt, cards, show_input, result) = self.parts();
        let prompt_height = prompt.len() as u16;
        let card_height = if cards.is_empty() { 0 } else { 3 };
        let input_height = if show_input { 2 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(prompt_height + 1),
                Constraint::Length(card_height),
                Constraint::Length(input_height),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(prompt)
            .wrap(Wrap { trim: false })
            .render(rows[0], buf);
        if !cards.is_empty() {
            WordCards::new(cards, self.theme).render(rows[1], buf);
        }
        if show_input {
            Paragraph::new(self.input_line()).render(rows[2], buf);
        }
        Paragraph::new(result).render(rows[3], buf);
    }
}
