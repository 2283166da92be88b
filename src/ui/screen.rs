use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use crate::app::{App, NoticeKind, Overlay};
use crate::session::{DictationMode, PracticeMode, VariantKind};
use crate::ui::components::confirm_dialog::ConfirmDialog;
use crate::ui::components::practice_area::{PracticeArea, ShadowingStatus};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::summary_banner::SummaryBanner;
use crate::ui::components::transcript_panel::TranscriptPanel;
use crate::ui::layout::{self, AppLayout};

pub fn mode_label(mode: PracticeMode, dictation: DictationMode) -> String {
    match mode {
        PracticeMode::Shadowing => t!("mode.shadowing").to_string(),
        PracticeMode::Dictation => {
            let sub = match dictation {
                DictationMode::MissingWord => t!("mode.missing-word"),
                DictationMode::Sequential => t!("mode.sequential"),
                DictationMode::Whole => t!("mode.whole"),
            };
            format!("{} · {}", t!("mode.dictation"), sub)
        }
    }
}

/// Key hints for the current mode and state, in display order.
pub fn hints(app: &App) -> Vec<String> {
    let practice = &app.practice;
    let mut hints = Vec::new();
    match practice.kind() {
        VariantKind::Shadowing => {
            if app.capture.can_record() {
                hints.push(t!("hint.record"));
            }
            hints.push(t!("hint.replay"));
            hints.push(t!("hint.original"));
            if app.capture.clip().is_some() {
                hints.push(t!("hint.my_take"));
            }
        }
        kind => {
            if app.awaiting_next() && kind == VariantKind::Whole {
                hints.push(t!("hint.next_sentence"));
            } else {
                hints.push(t!("hint.submit"));
            }
            hints.push(t!("hint.replay"));
            hints.push(t!("hint.reveal"));
        }
    }
    if practice.allows_manual_advance() {
        hints.push(t!("hint.next"));
    }
    if practice.allows_retreat() {
        hints.push(t!("hint.prev"));
    }
    hints.push(t!("hint.transcript"));
    hints.push(t!("hint.mode"));
    hints.push(t!("hint.submode"));
    hints.push(t!("hint.speed"));
    hints.push(t!("hint.quit"));
    hints.into_iter().map(|h| h.to_string()).collect()
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hint_strings = hints(app);
    let hint_refs: Vec<&str> = hint_strings.iter().map(String::as_str).collect();
    let hint_lines = layout::pack_hint_lines(&hint_refs, area.width as usize);
    let footer_height = hint_lines.len() as u16 + 1;
    let app_layout = AppLayout::new(area, app.show_transcript, footer_height);

    let practice = &app.practice;
    let progress = practice.progress();
    let total = practice.session().len();

    // Header: lesson title, mode, position, speed; progress bar below.
    let header_text = format!(
        " {} | {} | {}",
        mode_label(practice.mode(), practice.dictation_mode()),
        t!(
            "header.sentence",
            current = practice.position() + 1,
            total = total
        ),
        t!("header.speed", rate = app.rate().label()),
    );
    let header_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(app_layout.header);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", practice.session().catalog().title()),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_text,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, header_rows[0]);

    let bar = ProgressBar::new(
        &t!(
            "header.counter",
            correct = progress.correct_count(),
            total = total
        ),
        progress.correct().len(),
        progress.incorrect().len(),
        total,
        app.theme,
    );
    frame.render_widget(bar, header_rows[1]);

    // Main: practice area plus advisory line.
    let main_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(1)])
        .split(app_layout.main);

    let view = practice.view();
    let area_widget = PracticeArea::new(
        mode_label(practice.mode(), practice.dictation_mode()),
        &view,
        &app.input,
        app.theme,
    )
    .shadowing(ShadowingStatus {
        can_record: app.capture.can_record(),
        recording: app.capture.is_recording(),
        interim: app.capture.interim(),
    })
    .auto_advance(app.config.missing_word_auto_advance);
    frame.render_widget(area_widget, main_rows[0]);

    let advisory = if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Info => colors.accent(),
            NoticeKind::Warning => colors.warning(),
            NoticeKind::Error => colors.error(),
        };
        Some(Line::styled(format!(" {}", notice.message), Style::default().fg(color)))
    } else {
        app.capture_advisory()
            .map(|text| Line::styled(format!(" {text}"), Style::default().fg(colors.warning())))
    };
    if let Some(line) = advisory {
        frame.render_widget(Paragraph::new(line), main_rows[1]);
    }

    if let Some(transcript_area) = app_layout.transcript {
        let panel = TranscriptPanel::new(
            t!("transcript.title").to_string(),
            practice.session().catalog().sentences(),
            progress,
            practice.position(),
            app.theme,
        );
        frame.render_widget(panel, transcript_area);
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::styled(l, Style::default().fg(colors.text_pending())))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), app_layout.footer);

    if app.overlay == Overlay::ConfirmReveal {
        let popup = layout::centered_rect(50, 30, area);
        frame.render_widget(
            ConfirmDialog {
                title: t!("confirm.title").to_string(),
                message: t!("confirm.reveal").to_string(),
                choices: t!("confirm.choices").to_string(),
                theme: app.theme,
            },
            popup,
        );
    } else if app.show_summary() {
        if let Some(summary) = practice.summary() {
            let popup = layout::centered_rect(40, 30, area);
            frame.render_widget(
                SummaryBanner {
                    title: t!("summary.title").to_string(),
                    score: t!(
                        "summary.score",
                        correct = summary.correct,
                        total = summary.total,
                        percent = summary.accuracy_percent
                    )
                    .to_string(),
                    dismiss: t!("summary.dismiss").to_string(),
                    theme: app.theme,
                },
                popup,
            );
        }
    }
}
