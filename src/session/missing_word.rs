use crate::catalog::Sentence;
use crate::check;
use crate::session::progress::Outcome;
use crate::session::variant::{
    AfterResult, FollowUp, PracticeTiming, PracticeVariant, SessionStep, Submission, VariantKind,
    VariantView,
};

/// Dictation of the last word of each sentence; the rest is shown.
pub struct MissingWordVariant {
    timing: PracticeTiming,
    visible: Vec<String>,
    hidden: String,
    revealed: bool,
    result: Option<Outcome>,
}

impl MissingWordVariant {
    pub fn new(timing: PracticeTiming) -> Self {
        Self {
            timing,
            visible: Vec::new(),
            hidden: String::new(),
            revealed: false,
            result: None,
        }
    }

    pub fn hidden_word(&self) -> &str {
        &self.hidden
    }
}

impl PracticeVariant for MissingWordVariant {
    fn kind(&self) -> VariantKind {
        VariantKind::MissingWord
    }

    fn present(&mut self, sentence: &Sentence) {
        let mut words: Vec<String> = sentence.words().into_iter().map(str::to_string).collect();
        self.hidden = words.pop().unwrap_or_default();
        self.visible = words;
        self.revealed = false;
        self.result = None;
    }

    fn input_changed(&mut self, _input: &str) {
        self.result = None;
    }

    fn submit(&mut self, input: &str) -> Submission {
        if input.trim().is_empty() {
            return Submission::Rejected;
        }
        let outcome = Outcome::from_match(check::is_match(input, &self.hidden));
        self.result = Some(outcome);
        Submission::Scored {
            outcome,
            revealed: false,
        }
    }

    /// Fill in the hidden word and count the sentence as correct.
    fn reveal(&mut self) -> Submission {
        self.revealed = true;
        self.result = Some(Outcome::Correct);
        Submission::Scored {
            outcome: Outcome::Correct,
            revealed: true,
        }
    }

    fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn filled_answer(&self) -> Option<&str> {
        self.revealed.then_some(self.hidden.as_str())
    }

    fn follow_up(&self, submission: &Submission) -> Option<FollowUp> {
        match submission {
            Submission::Scored {
                outcome: Outcome::Correct,
                revealed: false,
            } if self.timing.missing_word_auto_advance => Some(FollowUp {
                step: SessionStep::NextSentence,
                delay: self.timing.missing_word_delay,
            }),
            _ => None,
        }
    }

    fn after_result(&self) -> AfterResult {
        AfterResult::Resume
    }

    fn view(&self) -> VariantView {
        let mut prompt = self.visible.join(" ");
        if !prompt.is_empty() {
            prompt.push(' ');
        }
        prompt.push_str("[     ]");
        VariantView::MissingWord {
            prompt,
            result: self.result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented(text: &str, timing: PracticeTiming) -> MissingWordVariant {
        let mut v = MissingWordVariant::new(timing);
        v.present(&Sentence {
            id: 7,
            text: text.to_string(),
            start: 17.6,
            end: 19.5,
        });
        v
    }

    #[test]
    fn withholds_last_word() {
        let v = presented("My mom doesn't like the snow.", PracticeTiming::default());
        assert_eq!(v.hidden_word(), "snow.");
        match v.view() {
            VariantView::MissingWord { prompt, .. } => {
                assert_eq!(prompt, "My mom doesn't like the [     ]")
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn trailing_space_does_not_hide_an_empty_word() {
        let mut v = presented("The snow finally stopped. ", PracticeTiming::default());
        assert_eq!(v.hidden_word(), "stopped.");
        assert!(matches!(
            v.submit(","),
            Submission::Scored {
                outcome: Outcome::Incorrect,
                ..
            }
        ));
    }

    #[test]
    fn single_word_sentence_hides_everything() {
        let v = presented("Snow!", PracticeTiming::default());
        assert_eq!(v.hidden_word(), "Snow!");
        assert_eq!(
            v.view(),
            VariantView::MissingWord {
                prompt: "[     ]".to_string(),
                result: None
            }
        );
    }

    #[test]
    fn word_match_ignores_case_and_punctuation() {
        let mut v = presented("My mom doesn't like the snow.", PracticeTiming::default());
        assert!(matches!(
            v.submit(" SNOW "),
            Submission::Scored {
                outcome: Outcome::Correct,
                ..
            }
        ));
        assert!(matches!(
            v.submit("snowy"),
            Submission::Scored {
                outcome: Outcome::Incorrect,
                ..
            }
        ));
        assert_eq!(v.submit(""), Submission::Rejected);
    }

    #[test]
    fn correct_answer_schedules_next_sentence() {
        let timing = PracticeTiming::default();
        let mut v = presented("The snow is beautiful.", timing);
        let s = v.submit("beautiful");
        assert_eq!(
            v.follow_up(&s),
            Some(FollowUp {
                step: SessionStep::NextSentence,
                delay: timing.missing_word_delay
            })
        );
        let miss = v.submit("pretty");
        assert_eq!(v.follow_up(&miss), None);
    }

    #[test]
    fn auto_advance_can_be_disabled() {
        let timing = PracticeTiming {
            missing_word_auto_advance: false,
            ..PracticeTiming::default()
        };
        let mut v = presented("The snow is beautiful.", timing);
        let s = v.submit("beautiful");
        assert_eq!(v.follow_up(&s), None);
    }

    #[test]
    fn reveal_forces_correct_and_fills_answer() {
        let mut v = presented("We begin to make a snowman.", PracticeTiming::default());
        assert_eq!(v.filled_answer(), None);
        let s = v.reveal();
        assert_eq!(
            s,
            Submission::Scored {
                outcome: Outcome::Correct,
                revealed: true
            }
        );
        assert_eq!(v.filled_answer(), Some("snowman."));
        assert_eq!(v.follow_up(&s), None);
    }
}
