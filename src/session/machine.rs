use tracing::debug;

use crate::catalog::{Catalog, Sentence};
use crate::session::progress::{Outcome, Progress, Summary};
use crate::session::timer::Ticket;
use crate::session::variant::{DictationMode, PracticeMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingAnswer,
    ShowingResult,
}

/// Position, phase and outcome sets of one practice run over a catalog.
///
/// The epoch is bumped by every transition that invalidates deferred
/// continuations; see [`Session::ticket`].
pub struct Session {
    catalog: Catalog,
    position: usize,
    phase: Phase,
    progress: Progress,
    mode: PracticeMode,
    dictation_mode: DictationMode,
    epoch: u64,
}

impl Session {
    pub fn new(catalog: Catalog, mode: PracticeMode, dictation_mode: DictationMode) -> Self {
        Self {
            catalog,
            position: 0,
            phase: Phase::AwaitingAnswer,
            progress: Progress::default(),
            mode,
            dictation_mode,
            epoch: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn dictation_mode(&self) -> DictationMode {
        self.dictation_mode
    }

    pub fn current(&self) -> &Sentence {
        // A validated catalog is never empty and position stays in range.
        &self.catalog.sentences()[self.position]
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.catalog.len()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            position: self.position,
            epoch: self.epoch,
        }
    }

    pub fn bump_epoch(&mut self) {
        self.epoch += 1;
    }

    /// Returns true if the position changed.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.move_to(self.position + 1);
        true
    }

    pub fn allows_retreat(&self) -> bool {
        self.mode == PracticeMode::Dictation && self.dictation_mode == DictationMode::Whole
    }

    /// Returns true if the position changed.
    pub fn retreat(&mut self) -> bool {
        if !self.allows_retreat() || self.is_first() {
            return false;
        }
        self.move_to(self.position - 1);
        true
    }

    fn move_to(&mut self, position: usize) {
        debug!(from = self.position, to = position, "sentence change");
        self.position = position;
        self.phase = Phase::AwaitingAnswer;
        self.bump_epoch();
    }

    pub fn switch_mode(&mut self, mode: PracticeMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn switch_dictation_mode(&mut self, dictation_mode: DictationMode) {
        self.dictation_mode = dictation_mode;
        self.reset();
    }

    fn reset(&mut self) {
        debug!(mode = ?self.mode, dictation = self.dictation_mode.as_str(), "session reset");
        self.position = 0;
        self.phase = Phase::AwaitingAnswer;
        self.progress.clear();
        self.bump_epoch();
    }

    /// Record an outcome for the current sentence and show the result.
    pub fn record(&mut self, outcome: Outcome) {
        let id = self.current().id;
        debug!(id, ?outcome, "outcome recorded");
        self.progress.record(id, outcome);
        self.phase = Phase::ShowingResult;
    }

    /// Leave the result view without changing sentence; drops pending
    /// continuations.
    pub fn resume_answer(&mut self) {
        if self.phase == Phase::ShowingResult {
            self.phase = Phase::AwaitingAnswer;
            self.bump_epoch();
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress.completed().len() >= self.catalog.len()
    }

    /// Completion summary, once every sentence has an outcome.
    pub fn summary(&self) -> Option<Summary> {
        self.is_complete()
            .then(|| Summary::new(self.progress.correct_count(), self.catalog.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LessonFile;

    fn catalog(n: u32) -> Catalog {
        let sentences = (1..=n)
            .map(|id| Sentence {
                id,
                text: format!("Sentence number {id}."),
                start: id as f64,
                end: id as f64 + 0.9,
            })
            .collect();
        Catalog::new(
            LessonFile {
                title: "test".to_string(),
                audio: None,
                sentences,
            },
            None,
        )
        .unwrap()
    }

    fn whole(n: u32) -> Session {
        Session::new(catalog(n), PracticeMode::Dictation, DictationMode::Whole)
    }

    #[test]
    fn navigation_is_clamped() {
        let mut s = whole(3);
        assert!(!s.retreat());
        assert_eq!(s.position(), 0);
        assert!(s.advance());
        assert!(s.advance());
        assert!(!s.advance());
        assert_eq!(s.position(), 2);
        assert!(s.retreat());
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn retreat_only_in_whole_dictation() {
        let mut s = Session::new(catalog(3), PracticeMode::Dictation, DictationMode::Sequential);
        s.advance();
        assert!(!s.allows_retreat());
        assert!(!s.retreat());
        assert_eq!(s.position(), 1);

        let mut s = Session::new(catalog(3), PracticeMode::Shadowing, DictationMode::Whole);
        s.advance();
        assert!(!s.retreat());
    }

    #[test]
    fn record_moves_to_showing_result() {
        let mut s = whole(2);
        s.record(Outcome::Incorrect);
        assert_eq!(s.phase(), Phase::ShowingResult);
        assert!(s.progress().is_completed(1));
        s.advance();
        assert_eq!(s.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn switching_resets_position_and_progress() {
        let mut s = whole(3);
        s.record(Outcome::Correct);
        s.advance();
        s.record(Outcome::Incorrect);
        s.switch_dictation_mode(DictationMode::MissingWord);
        assert_eq!(s.position(), 0);
        assert!(s.progress().is_empty());

        s.advance();
        s.record(Outcome::Correct);
        s.switch_mode(PracticeMode::Shadowing);
        assert_eq!(s.position(), 0);
        assert!(s.progress().is_empty());
        assert_eq!(s.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn every_transition_invalidates_tickets() {
        let mut s = whole(3);
        let t0 = s.ticket();
        s.record(Outcome::Correct);
        assert_eq!(s.ticket(), t0);
        s.resume_answer();
        let t1 = s.ticket();
        assert_ne!(t1, t0);
        s.advance();
        s.retreat();
        // Same position, different epoch.
        assert_eq!(s.ticket().position, t1.position);
        assert_ne!(s.ticket(), t1);
    }

    #[test]
    fn summary_appears_once_everything_is_completed() {
        let mut s = whole(2);
        s.record(Outcome::Correct);
        assert!(s.summary().is_none());
        s.advance();
        s.record(Outcome::Incorrect);
        let summary = s.summary().unwrap();
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.accuracy_percent, 50);
        // Still interactive after completion.
        assert!(s.retreat());
    }
}
