use std::time::Instant;

use tracing::debug;

use crate::catalog::{Catalog, Sentence};
use crate::session::machine::{Phase, Session};
use crate::session::progress::{Progress, Summary};
use crate::session::timer::Scheduler;
use crate::session::variant::{
    self, AfterResult, DictationMode, PracticeMode, PracticeTiming, PracticeVariant, SessionStep,
    Submission, VariantKind, VariantView,
};

/// What a user action or a fired continuation did to the session, ordered
/// by how much of the screen it invalidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Change {
    None,
    /// Same sentence, new input state (next word, result dismissed).
    Input,
    Sentence,
    Reset,
}

/// A session driven through exactly one active variant.
pub struct Practice {
    session: Session,
    variant: Box<dyn PracticeVariant>,
    scheduler: Scheduler<SessionStep>,
    timing: PracticeTiming,
    edited_since_result: bool,
}

impl Practice {
    pub fn new(
        catalog: Catalog,
        mode: PracticeMode,
        dictation_mode: DictationMode,
        timing: PracticeTiming,
    ) -> Self {
        let session = Session::new(catalog, mode, dictation_mode);
        let mut variant = variant::variant_for(mode, dictation_mode, timing);
        variant.present(session.current());
        Self {
            session,
            variant,
            scheduler: Scheduler::default(),
            timing,
            edited_since_result: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current(&self) -> &Sentence {
        self.session.current()
    }

    pub fn position(&self) -> usize {
        self.session.position()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn progress(&self) -> &Progress {
        self.session.progress()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.session.summary()
    }

    pub fn mode(&self) -> PracticeMode {
        self.session.mode()
    }

    pub fn dictation_mode(&self) -> DictationMode {
        self.session.dictation_mode()
    }

    pub fn kind(&self) -> VariantKind {
        self.variant.kind()
    }

    pub fn view(&self) -> VariantView {
        self.variant.view()
    }

    pub fn accepts_typing(&self) -> bool {
        self.variant.accepts_typing()
    }

    pub fn is_revealed(&self) -> bool {
        self.variant.is_revealed()
    }

    pub fn filled_answer(&self) -> Option<&str> {
        self.variant.filled_answer()
    }

    pub fn allows_retreat(&self) -> bool {
        self.session.allows_retreat()
    }

    /// Sequential dictation moves on by itself.
    pub fn allows_manual_advance(&self) -> bool {
        self.variant.kind() != VariantKind::Sequential
    }

    pub fn has_pending(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn input_changed(&mut self, input: &str) {
        self.variant.input_changed(input);
        if self.session.phase() == Phase::ShowingResult {
            self.edited_since_result = true;
            if self.variant.after_result() == AfterResult::Resume {
                self.session.resume_answer();
            }
        }
    }

    /// Check an answer (typed text or a final transcript).
    pub fn submit(&mut self, input: &str, now: Instant) -> Submission {
        let submission = self.variant.submit(input);
        self.settle(submission, now);
        submission
    }

    /// Enter key: dismiss a shown result with Next where the variant allows
    /// it, otherwise submit.
    pub fn confirm(&mut self, input: &str, now: Instant) -> (Submission, Change) {
        if self.session.phase() == Phase::ShowingResult
            && self.variant.after_result() == AfterResult::Advance
            && !self.edited_since_result
        {
            return (Submission::Rejected, self.advance());
        }
        (self.submit(input, now), Change::None)
    }

    /// Toggle reveal. A toggleable reveal that is already shown is hidden
    /// again without recording anything.
    pub fn reveal(&mut self, now: Instant) -> Submission {
        if self.variant.is_revealed() {
            self.variant.conceal();
            return Submission::Rejected;
        }
        let submission = self.variant.reveal();
        self.settle(submission, now);
        submission
    }

    fn settle(&mut self, submission: Submission, now: Instant) {
        if let Submission::Scored { outcome, .. } = submission {
            self.session.record(outcome);
            self.edited_since_result = false;
        }
        if let Some(follow) = self.variant.follow_up(&submission) {
            debug!(step = ?follow.step, delay_ms = follow.delay.as_millis() as u64, "continuation scheduled");
            self.scheduler
                .schedule(self.session.ticket(), follow.delay, now, follow.step);
        }
    }

    /// Run due continuations. Ones scheduled for a session state that no
    /// longer exists are dropped.
    pub fn fire_due(&mut self, now: Instant) -> Change {
        let mut change = Change::None;
        for due in self.scheduler.take_due(now) {
            if due.ticket != self.session.ticket() {
                debug!(ticket = ?due.ticket, "stale continuation dropped");
                continue;
            }
            change = change.max(match due.action {
                SessionStep::NextWord => {
                    self.variant.next_word();
                    self.session.bump_epoch();
                    Change::Input
                }
                SessionStep::NextSentence => self.advance(),
            });
        }
        change
    }

    pub fn advance(&mut self) -> Change {
        if !self.session.advance() {
            return Change::None;
        }
        self.present();
        Change::Sentence
    }

    pub fn retreat(&mut self) -> Change {
        if !self.session.retreat() {
            return Change::None;
        }
        self.present();
        Change::Sentence
    }

    pub fn switch_mode(&mut self, mode: PracticeMode) -> Change {
        if mode == self.session.mode() {
            return Change::None;
        }
        self.session.switch_mode(mode);
        self.rebuild();
        Change::Reset
    }

    pub fn switch_dictation_mode(&mut self, dictation_mode: DictationMode) -> Change {
        if dictation_mode == self.session.dictation_mode()
            && self.session.mode() == PracticeMode::Dictation
        {
            return Change::None;
        }
        self.session.switch_dictation_mode(dictation_mode);
        if self.session.mode() != PracticeMode::Dictation {
            self.session.switch_mode(PracticeMode::Dictation);
        }
        self.rebuild();
        Change::Reset
    }

    fn rebuild(&mut self) {
        self.variant =
            variant::variant_for(self.session.mode(), self.session.dictation_mode(), self.timing);
        self.present();
    }

    fn present(&mut self) {
        self.edited_since_result = false;
        self.variant.present(self.session.current());
    }
}
