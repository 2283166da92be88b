use crate::catalog::Sentence;
use crate::check;
use crate::session::progress::Outcome;
use crate::session::variant::{PracticeVariant, Submission, VariantKind, VariantView};

/// Spoken repetition; the answer is a final speech-to-text transcript.
#[derive(Default)]
pub struct ShadowingVariant {
    target: String,
    transcript: Option<String>,
    result: Option<Outcome>,
}

impl PracticeVariant for ShadowingVariant {
    fn kind(&self) -> VariantKind {
        VariantKind::Shadowing
    }

    fn present(&mut self, sentence: &Sentence) {
        self.target = sentence.text.clone();
        self.transcript = None;
        self.result = None;
    }

    fn submit(&mut self, transcript: &str) -> Submission {
        if transcript.trim().is_empty() {
            return Submission::Rejected;
        }
        let outcome = Outcome::from_match(check::is_match(transcript, &self.target));
        self.transcript = Some(transcript.to_string());
        self.result = Some(outcome);
        Submission::Scored {
            outcome,
            revealed: false,
        }
    }

    fn accepts_typing(&self) -> bool {
        false
    }

    fn view(&self) -> VariantView {
        VariantView::Shadowing {
            target: self.target.clone(),
            transcript: self.transcript.clone(),
            result: self.result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented(text: &str) -> ShadowingVariant {
        let mut v = ShadowingVariant::default();
        v.present(&Sentence {
            id: 22,
            text: text.to_string(),
            start: 62.2,
            end: 64.5,
        });
        v
    }

    #[test]
    fn transcript_is_checked_against_sentence() {
        let mut v = presented("We go inside for hot chocolate.");
        assert_eq!(
            v.submit("we go inside for hot chocolate"),
            Submission::Scored {
                outcome: Outcome::Correct,
                revealed: false
            }
        );
        assert!(matches!(
            v.submit("we go outside for hot chocolate"),
            Submission::Scored {
                outcome: Outcome::Incorrect,
                ..
            }
        ));
    }

    #[test]
    fn empty_transcript_is_rejected_and_reveal_unsupported() {
        let mut v = presented("It starts to snow again.");
        assert_eq!(v.submit(" "), Submission::Rejected);
        assert_eq!(v.reveal(), Submission::Rejected);
        assert!(!v.accepts_typing());
    }

    #[test]
    fn view_keeps_the_transcript() {
        let mut v = presented("It starts to snow again.");
        v.submit("it starts to snow again");
        match v.view() {
            VariantView::Shadowing {
                transcript, result, ..
            } => {
                assert_eq!(transcript.as_deref(), Some("it starts to snow again"));
                assert_eq!(result, Some(Outcome::Correct));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }
}
