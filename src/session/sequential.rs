use crate::catalog::Sentence;
use crate::check::{self, WordStatus};
use crate::session::progress::Outcome;
use crate::session::variant::{
    FollowUp, PracticeTiming, PracticeVariant, SequentialWord, SessionStep, Submission,
    VariantKind, VariantView,
};

/// Word-by-word dictation. Each word is checked on its own and the next one
/// is uncovered after a short display delay; there is no manual Next.
pub struct SequentialVariant {
    timing: PracticeTiming,
    words: Vec<String>,
    results: Vec<Option<bool>>,
    current: usize,
    /// A word result is on display and a `NextWord`/`NextSentence` is pending.
    waiting: bool,
    filled: bool,
}

impl SequentialVariant {
    pub fn new(timing: PracticeTiming) -> Self {
        Self {
            timing,
            words: Vec::new(),
            results: Vec::new(),
            current: 0,
            waiting: false,
            filled: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    fn is_last_word(&self) -> bool {
        self.current + 1 >= self.words.len()
    }

    fn settle(&mut self, correct: bool, revealed: bool) -> Submission {
        self.results[self.current] = Some(correct);
        self.waiting = true;
        if self.is_last_word() {
            let all = self.results.iter().all(|r| *r == Some(true));
            Submission::Scored {
                outcome: Outcome::from_match(all),
                revealed,
            }
        } else {
            Submission::Word {
                index: self.current,
                correct,
            }
        }
    }

    fn mask(word: &str) -> String {
        "*".repeat(word.chars().count())
    }
}

impl PracticeVariant for SequentialVariant {
    fn kind(&self) -> VariantKind {
        VariantKind::Sequential
    }

    fn present(&mut self, sentence: &Sentence) {
        self.words = sentence.words().into_iter().map(str::to_string).collect();
        self.results = vec![None; self.words.len()];
        self.current = 0;
        self.waiting = false;
        self.filled = false;
    }

    fn submit(&mut self, input: &str) -> Submission {
        if self.waiting || input.trim().is_empty() || self.words.is_empty() {
            return Submission::Rejected;
        }
        let correct = check::is_match(input, &self.words[self.current]);
        self.settle(correct, false)
    }

    /// Uncover the current word and count it as correct.
    fn reveal(&mut self) -> Submission {
        if self.waiting || self.words.is_empty() {
            return Submission::Rejected;
        }
        self.filled = true;
        self.settle(true, true)
    }

    fn filled_answer(&self) -> Option<&str> {
        if self.filled {
            self.words.get(self.current).map(String::as_str)
        } else {
            None
        }
    }

    fn follow_up(&self, submission: &Submission) -> Option<FollowUp> {
        let step = match submission {
            Submission::Word { .. } => SessionStep::NextWord,
            Submission::Scored { .. } => SessionStep::NextSentence,
            Submission::Rejected => return None,
        };
        Some(FollowUp {
            step,
            delay: self.timing.word_advance_delay,
        })
    }

    fn next_word(&mut self) {
        if self.waiting && !self.is_last_word() {
            self.current += 1;
            self.waiting = false;
            self.filled = false;
        }
    }

    fn view(&self) -> VariantView {
        let words = self
            .words
            .iter()
            .zip(&self.results)
            .map(|(word, result)| match result {
                Some(true) => SequentialWord {
                    text: word.clone(),
                    status: WordStatus::Correct,
                },
                Some(false) => SequentialWord {
                    text: word.clone(),
                    status: WordStatus::Incorrect,
                },
                None => SequentialWord {
                    text: Self::mask(word),
                    status: WordStatus::Pending,
                },
            })
            .collect();
        let last_correct = if self.waiting {
            self.results[self.current]
        } else {
            None
        };
        VariantView::Sequential {
            words,
            current: self.current,
            last_correct,
        }
    }
}
