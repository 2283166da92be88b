use crate::catalog::Sentence;
use crate::check::{self, answer::all_correct};
use crate::session::progress::Outcome;
use crate::session::variant::{AfterResult, PracticeVariant, Submission, VariantKind, VariantView};

/// Whole-sentence dictation with per-word live feedback.
#[derive(Default)]
pub struct WholeVariant {
    target: String,
    input: String,
    revealed: bool,
    result: Option<Outcome>,
}

impl PracticeVariant for WholeVariant {
    fn kind(&self) -> VariantKind {
        VariantKind::Whole
    }

    fn present(&mut self, sentence: &Sentence) {
        self.target = sentence.text.clone();
        self.input.clear();
        self.revealed = false;
        self.result = None;
    }

    fn input_changed(&mut self, input: &str) {
        self.input = input.to_string();
        self.result = None;
    }

    fn submit(&mut self, input: &str) -> Submission {
        if input.trim().is_empty() {
            return Submission::Rejected;
        }
        self.input = input.to_string();
        let outcome = Outcome::from_match(check::is_match(input, &self.target));
        self.result = Some(outcome);
        Submission::Scored {
            outcome,
            revealed: false,
        }
    }

    /// Show every target word; scores the sentence on what is typed so far.
    fn reveal(&mut self) -> Submission {
        if self.revealed {
            return Submission::Rejected;
        }
        self.revealed = true;
        let statuses = check::word_statuses(&self.target, &self.input);
        Submission::Scored {
            outcome: Outcome::from_match(all_correct(&statuses)),
            revealed: true,
        }
    }

    fn conceal(&mut self) {
        self.revealed = false;
    }

    fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn after_result(&self) -> AfterResult {
        AfterResult::Advance
    }

    fn view(&self) -> VariantView {
        VariantView::Whole {
            cards: check::word_cards(&self.target, &self.input, self.revealed),
            revealed: self.revealed,
            result: self.result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str) -> Sentence {
        Sentence {
            id: 1,
            text: text.to_string(),
            start: 0.0,
            end: 1.0,
        }
    }

    fn presented(text: &str) -> WholeVariant {
        let mut v = WholeVariant::default();
        v.present(&sentence(text));
        v
    }

    #[test]
    fn exact_match_after_normalization_is_correct() {
        let mut v = presented("The snow is beautiful.");
        assert_eq!(
            v.submit("the   SNOW is beautiful"),
            Submission::Scored {
                outcome: Outcome::Correct,
                revealed: false
            }
        );
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut v = presented("The snow is beautiful.");
        assert_eq!(v.submit("   "), Submission::Rejected);
    }

    #[test]
    fn resubmission_scores_again() {
        let mut v = presented("It snowed all day today.");
        assert!(matches!(
            v.submit("it snowed all day"),
            Submission::Scored {
                outcome: Outcome::Incorrect,
                ..
            }
        ));
        v.input_changed("it snowed all day today");
        assert!(matches!(
            v.submit("it snowed all day today"),
            Submission::Scored {
                outcome: Outcome::Correct,
                ..
            }
        ));
    }

    #[test]
    fn reveal_scores_on_current_word_statuses() {
        let mut v = presented("First snowfall.");
        v.input_changed("first snowfall");
        assert_eq!(
            v.reveal(),
            Submission::Scored {
                outcome: Outcome::Correct,
                revealed: true
            }
        );

        let mut v = presented("First snowfall.");
        v.input_changed("first");
        assert!(matches!(
            v.reveal(),
            Submission::Scored {
                outcome: Outcome::Incorrect,
                ..
            }
        ));
    }

    #[test]
    fn reveal_toggles_without_rescoring() {
        let mut v = presented("First snowfall.");
        v.reveal();
        assert!(v.is_revealed());
        assert_eq!(v.reveal(), Submission::Rejected);
        v.conceal();
        assert!(!v.is_revealed());
    }

    #[test]
    fn present_clears_previous_sentence_state() {
        let mut v = presented("First snowfall.");
        v.input_changed("first");
        v.reveal();
        v.present(&sentence("Today is November 26th."));
        match v.view() {
            VariantView::Whole {
                cards,
                revealed,
                result,
            } => {
                assert_eq!(cards.len(), 4);
                assert!(!revealed);
                assert!(result.is_none());
                assert_eq!(cards[0].text, "*****");
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
