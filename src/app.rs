use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rust_i18n::t;
use tracing::{info, warn};

use crate::audio::{AudioOutput, AutoplayTrigger, CueController, PlaybackRate};
use crate::capture::{Availability, CaptureController, CaptureEvent, CaptureHost, CaptureUpdate};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::AudioError;
use crate::session::{
    Change, DictationMode, Phase, Practice, PracticeMode, Submission, VariantKind,
};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

const NOTICE_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    until: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    None,
    ConfirmReveal,
}

pub struct App {
    pub theme: &'static Theme,
    pub config: Config,
    pub practice: Practice,
    pub cue: CueController,
    pub capture: CaptureController,
    pub input: LineInput,
    pub overlay: Overlay,
    pub show_transcript: bool,
    pub summary_dismissed: bool,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    autoplay: AutoplayTrigger,
}

impl App {
    pub fn new(
        config: Config,
        catalog: Catalog,
        mode: PracticeMode,
        output: Box<dyn AudioOutput>,
        host: Box<dyn CaptureHost>,
    ) -> Self {
        let loaded_theme = Theme::load_or_default(&config.theme);
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        info!(
            lesson = catalog.title(),
            sentences = catalog.len(),
            ?mode,
            "session start"
        );
        let practice = Practice::new(
            catalog,
            mode,
            config.default_dictation_mode,
            config.timing(),
        );
        let cue = CueController::new(
            output,
            PlaybackRate::nearest(config.playback_rate),
            config.stop_guard(),
        );
        let capture = CaptureController::new(host, &config.recording_mime);
        let autoplay = AutoplayTrigger::new(config.autoplay_delay());

        let mut app = Self {
            theme,
            config,
            practice,
            cue,
            capture,
            input: LineInput::default(),
            overlay: Overlay::None,
            show_transcript: false,
            summary_dismissed: false,
            notice: None,
            should_quit: false,
            autoplay,
        };
        if mode == PracticeMode::Shadowing {
            app.open_capture();
        }
        app
    }

    /// Persistent advisory about the capture host, shown while shadowing.
    pub fn capture_advisory(&self) -> Option<String> {
        if self.practice.mode() != PracticeMode::Shadowing {
            return None;
        }
        match self.capture.availability() {
            Availability::NoMicrophone => Some(t!("advisory.no_microphone").to_string()),
            Availability::NoSpeechRecognition => {
                Some(t!("advisory.no_speech_recognition").to_string())
            }
            Availability::Ready | Availability::Closed => None,
        }
    }

    pub fn show_summary(&self) -> bool {
        !self.summary_dismissed && self.practice.summary().is_some()
    }

    pub fn rate(&self) -> PlaybackRate {
        self.cue.rate()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if self.overlay == Overlay::ConfirmReveal {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.overlay = Overlay::None;
                    self.reveal(now);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.overlay = Overlay::None,
                _ => {}
            }
            return;
        }

        if self.show_summary() && key.code == KeyCode::Esc {
            self.summary_dismissed = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.play_current(now);
                return;
            }
            KeyCode::F(2) => {
                let mode = match self.practice.mode() {
                    PracticeMode::Dictation => PracticeMode::Shadowing,
                    PracticeMode::Shadowing => PracticeMode::Dictation,
                };
                self.switch_mode(mode, now);
                return;
            }
            KeyCode::F(3) => {
                let next = if self.practice.mode() == PracticeMode::Dictation {
                    self.practice.dictation_mode().next()
                } else {
                    self.practice.dictation_mode()
                };
                self.switch_dictation_mode(next, now);
                return;
            }
            KeyCode::F(5) => {
                self.cue.set_rate(self.cue.rate().slower());
                return;
            }
            KeyCode::F(6) => {
                self.cue.set_rate(self.cue.rate().faster());
                return;
            }
            KeyCode::PageDown => {
                self.next_sentence(now);
                return;
            }
            KeyCode::PageUp => {
                self.previous_sentence(now);
                return;
            }
            KeyCode::Char('n') if ctrl => {
                self.next_sentence(now);
                return;
            }
            KeyCode::Char('p') if ctrl => {
                self.previous_sentence(now);
                return;
            }
            KeyCode::Char('t') if ctrl => {
                self.show_transcript = !self.show_transcript;
                return;
            }
            KeyCode::Char('r') if ctrl => {
                self.request_reveal(now);
                return;
            }
            _ => {}
        }

        if self.practice.accepts_typing() {
            self.handle_answer_key(key, now);
        } else {
            self.handle_shadowing_key(key, now);
        }
    }

    fn handle_answer_key(&mut self, key: KeyEvent, now: Instant) {
        match self.input.handle(key) {
            InputResult::Changed => self.practice.input_changed(self.input.value()),
            InputResult::Submit => {
                let answer = self.input.value().to_string();
                let (submission, change) = self.practice.confirm(&answer, now);
                self.after_submission(submission);
                self.apply(change, now);
            }
            InputResult::Cancel => {
                if !self.input.is_blank() {
                    self.input.clear();
                    self.practice.input_changed("");
                }
            }
            InputResult::Continue | InputResult::Ignored => {}
        }
    }

    fn handle_shadowing_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => self.toggle_recording(now),
            KeyCode::Char(' ') => self.play_current(now),
            KeyCode::Char('o') => {
                let sentence = self.practice.current().clone();
                let result = self.cue.play_original(&sentence, now).map(|_| ());
                self.report_playback(result, now);
            }
            KeyCode::Char('p') => match self.capture.clip().cloned() {
                Some(clip) => {
                    let result = self.cue.play_clip(&clip).map(|_| ());
                    self.report_playback(result, now);
                }
                None => self.notify(NoticeKind::Info, t!("advisory.no_clip").to_string(), now),
            },
            KeyCode::Char('n') | KeyCode::Right => self.next_sentence(now),
            _ => {}
        }
    }

    pub fn play_current(&mut self, now: Instant) {
        let sentence = self.practice.current().clone();
        let result = self.cue.replay(&sentence, now).map(|_| ());
        self.report_playback(result, now);
    }

    fn report_playback(&mut self, result: Result<(), AudioError>, now: Instant) {
        if let Err(e) = result {
            warn!(error = %e, "playback failed");
            let message = t!("advisory.playback_failed", error = e.to_string()).to_string();
            self.notify(NoticeKind::Warning, message, now);
        }
    }

    pub fn next_sentence(&mut self, now: Instant) {
        if !self.practice.allows_manual_advance() {
            return;
        }
        let change = self.practice.advance();
        self.apply(change, now);
    }

    pub fn previous_sentence(&mut self, now: Instant) {
        let change = self.practice.retreat();
        self.apply(change, now);
    }

    pub fn switch_mode(&mut self, mode: PracticeMode, now: Instant) {
        let change = self.practice.switch_mode(mode);
        if change == Change::Reset {
            self.show_transcript = false;
        }
        if mode == PracticeMode::Shadowing {
            self.open_capture();
        }
        self.apply(change, now);
    }

    pub fn switch_dictation_mode(&mut self, dictation: DictationMode, now: Instant) {
        let change = self.practice.switch_dictation_mode(dictation);
        self.apply(change, now);
    }

    /// Whole-sentence reveal asks first; the other reveals are immediate.
    fn request_reveal(&mut self, now: Instant) {
        match self.practice.kind() {
            VariantKind::Whole if !self.practice.is_revealed() => {
                self.overlay = Overlay::ConfirmReveal;
            }
            VariantKind::Shadowing => {}
            _ => self.reveal(now),
        }
    }

    fn reveal(&mut self, now: Instant) {
        let submission = self.practice.reveal(now);
        self.after_submission(submission);
    }

    fn after_submission(&mut self, submission: Submission) {
        if submission == Submission::Rejected {
            return;
        }
        if let Some(answer) = self.practice.filled_answer() {
            let answer = answer.to_string();
            self.input.set(&answer);
        } else if matches!(submission, Submission::Word { .. })
            || (self.practice.kind() == VariantKind::Sequential
                && matches!(submission, Submission::Scored { .. }))
        {
            // The checked word stays on the word strip, not in the field.
            self.input.clear();
        }
    }

    fn open_capture(&mut self) {
        let language = self.config.recognition_language.clone();
        self.capture.open(&language);
    }

    pub fn toggle_recording(&mut self, now: Instant) {
        if self.capture.is_recording() {
            self.capture.stop();
            return;
        }
        if !self.capture.can_record() {
            return;
        }
        self.cue.stop();
        if let Err(e) = self.capture.start() {
            warn!(error = %e, "recording failed to start");
            let message = t!("advisory.record_failed", error = e.to_string()).to_string();
            self.notify(NoticeKind::Error, message, now);
        }
    }

    /// Merge one capture event against the session as it is now.
    pub fn handle_capture(&mut self, event: CaptureEvent, now: Instant) {
        match self.capture.handle(event) {
            CaptureUpdate::Final(text) => {
                if self.practice.kind() == VariantKind::Shadowing {
                    let submission = self.practice.submit(&text, now);
                    info!(sentence = self.practice.current().id, ?submission, "transcript scored");
                }
            }
            CaptureUpdate::Failed(message) => {
                let message = t!("advisory.recognition_error", error = message).to_string();
                self.notify(NoticeKind::Error, message, now);
            }
            CaptureUpdate::ClipReady => {
                self.notify(NoticeKind::Info, t!("shadowing.clip_ready").to_string(), now);
            }
            CaptureUpdate::Ignored
            | CaptureUpdate::Interim
            | CaptureUpdate::Chunk
            | CaptureUpdate::Ended => {}
        }
    }

    pub fn tick(&mut self, now: Instant) {
        let change = self.practice.fire_due(now);
        self.apply(change, now);
        if self.autoplay.take_due(now) {
            self.play_current(now);
        }
        self.cue.tick(now);
        if self.notice.as_ref().is_some_and(|n| n.until <= now) {
            self.notice = None;
        }
    }

    fn apply(&mut self, change: Change, now: Instant) {
        match change {
            Change::None => {}
            Change::Input => self.input.clear(),
            Change::Sentence => {
                self.input.clear();
                self.capture.discard();
                self.autoplay.sentence_changed(self.practice.position(), now);
            }
            Change::Reset => {
                self.input.clear();
                self.capture.discard();
                self.cue.stop();
                self.overlay = Overlay::None;
                self.summary_dismissed = false;
                self.autoplay.sentence_changed(self.practice.position(), now);
            }
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, message: String, now: Instant) {
        self.notice = Some(Notice {
            kind,
            message,
            until: now + NOTICE_TTL,
        });
    }

    pub fn awaiting_next(&self) -> bool {
        self.practice.phase() == Phase::ShowingResult
    }
}
