use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentenceStatus {
    Untouched,
    Correct,
    Incorrect,
}

/// Per-session outcome sets, keyed by sentence id.
///
/// `correct` and `incorrect` are disjoint and both are subsets of `completed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    completed: BTreeSet<u32>,
    correct: BTreeSet<u32>,
    incorrect: BTreeSet<u32>,
}

impl Progress {
    /// Record the latest outcome for a sentence. A later outcome replaces an
    /// earlier one.
    pub fn record(&mut self, id: u32, outcome: Outcome) {
        self.completed.insert(id);
        match outcome {
            Outcome::Correct => {
                self.incorrect.remove(&id);
                self.correct.insert(id);
            }
            Outcome::Incorrect => {
                self.correct.remove(&id);
                self.incorrect.insert(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.completed.clear();
        self.correct.clear();
        self.incorrect.clear();
    }

    pub fn status(&self, id: u32) -> SentenceStatus {
        if self.correct.contains(&id) {
            SentenceStatus::Correct
        } else if self.incorrect.contains(&id) {
            SentenceStatus::Incorrect
        } else {
            SentenceStatus::Untouched
        }
    }

    pub fn is_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }

    pub fn completed(&self) -> &BTreeSet<u32> {
        &self.completed
    }

    pub fn correct(&self) -> &BTreeSet<u32> {
        &self.correct
    }

    pub fn incorrect(&self) -> &BTreeSet<u32> {
        &self.incorrect
    }

    pub fn correct_count(&self) -> usize {
        self.correct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Completion overlay data, shown once every sentence has an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    pub accuracy_percent: u32,
}

impl Summary {
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct,
            total,
            accuracy_percent: accuracy_percent(correct, total),
        }
    }
}

/// `round(100 * correct / total)`, 0 for an empty total.
pub fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 * 100.0 / total as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_adds_to_completed_and_one_outcome_set() {
        let mut p = Progress::default();
        p.record(3, Outcome::Correct);
        p.record(4, Outcome::Incorrect);
        assert!(p.is_completed(3) && p.is_completed(4));
        assert_eq!(p.status(3), SentenceStatus::Correct);
        assert_eq!(p.status(4), SentenceStatus::Incorrect);
        assert_eq!(p.status(5), SentenceStatus::Untouched);
    }

    #[test]
    fn later_outcome_replaces_earlier_and_sets_stay_disjoint() {
        let mut p = Progress::default();
        p.record(1, Outcome::Incorrect);
        p.record(1, Outcome::Correct);
        assert!(p.correct().contains(&1));
        assert!(!p.incorrect().contains(&1));
        p.record(1, Outcome::Incorrect);
        assert!(p.correct().is_disjoint(p.incorrect()));
        assert_eq!(p.completed().len(), 1);
    }

    #[test]
    fn clear_empties_all_sets() {
        let mut p = Progress::default();
        p.record(1, Outcome::Correct);
        p.record(2, Outcome::Incorrect);
        p.clear();
        assert!(p.is_empty());
        assert!(p.correct().is_empty());
        assert!(p.incorrect().is_empty());
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        assert_eq!(accuracy_percent(18, 22), 82);
        assert_eq!(accuracy_percent(22, 22), 100);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(0, 0), 0);
    }
}
