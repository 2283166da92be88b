use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Sentence;
use crate::check::{WordCard, WordStatus};
use crate::session::missing_word::MissingWordVariant;
use crate::session::progress::Outcome;
use crate::session::sequential::SequentialVariant;
use crate::session::shadowing::ShadowingVariant;
use crate::session::whole::WholeVariant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeMode {
    Dictation,
    Shadowing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictationMode {
    MissingWord,
    Sequential,
    Whole,
}

impl DictationMode {
    pub fn next(self) -> Self {
        match self {
            DictationMode::MissingWord => DictationMode::Sequential,
            DictationMode::Sequential => DictationMode::Whole,
            DictationMode::Whole => DictationMode::MissingWord,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DictationMode::MissingWord => "missing-word",
            DictationMode::Sequential => "sequential",
            DictationMode::Whole => "whole",
        }
    }
}

impl FromStr for DictationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "missing-word" => Ok(DictationMode::MissingWord),
            "sequential" => Ok(DictationMode::Sequential),
            "whole" => Ok(DictationMode::Whole),
            other => Err(format!(
                "unknown dictation mode `{other}` (expected missing-word, sequential or whole)"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantKind {
    Whole,
    MissingWord,
    Sequential,
    Shadowing,
}

/// Result of handing an answer (or a reveal) to a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Nothing to check: blank input, unsupported action, or a word result
    /// still on display.
    Rejected,
    /// One word of a sentence was checked; the sentence is not finished.
    Word { index: usize, correct: bool },
    /// The sentence has an outcome to record.
    Scored { outcome: Outcome, revealed: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStep {
    NextWord,
    NextSentence,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowUp {
    pub step: SessionStep,
    pub delay: Duration,
}

/// What Enter does once a result is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterResult {
    Advance,
    Resume,
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialWord {
    pub text: String,
    pub status: WordStatus,
}

/// Render model of the active variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantView {
    Whole {
        cards: Vec<WordCard>,
        revealed: bool,
        result: Option<Outcome>,
    },
    MissingWord {
        prompt: String,
        result: Option<Outcome>,
    },
    Sequential {
        words: Vec<SequentialWord>,
        current: usize,
        last_correct: Option<bool>,
    },
    Shadowing {
        target: String,
        transcript: Option<String>,
        result: Option<Outcome>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PracticeTiming {
    pub word_advance_delay: Duration,
    pub missing_word_delay: Duration,
    pub missing_word_auto_advance: bool,
}

impl Default for PracticeTiming {
    fn default() -> Self {
        Self {
            word_advance_delay: Duration::from_millis(1500),
            missing_word_delay: Duration::from_millis(1500),
            missing_word_auto_advance: true,
        }
    }
}

/// One interchangeable exercise strategy over the shared session contract.
pub trait PracticeVariant {
    fn kind(&self) -> VariantKind;

    /// Show a new sentence, discarding all per-sentence state.
    fn present(&mut self, sentence: &Sentence);

    /// Live feedback hook, called with the full input on every edit.
    fn input_changed(&mut self, _input: &str) {}

    fn submit(&mut self, input: &str) -> Submission;

    fn reveal(&mut self) -> Submission {
        Submission::Rejected
    }

    /// Undo a toggleable reveal. Never records anything.
    fn conceal(&mut self) {}

    fn is_revealed(&self) -> bool {
        false
    }

    /// Text the answer field should show after a reveal.
    fn filled_answer(&self) -> Option<&str> {
        None
    }

    fn follow_up(&self, _submission: &Submission) -> Option<FollowUp> {
        None
    }

    /// Apply a `SessionStep::NextWord` continuation.
    fn next_word(&mut self) {}

    fn after_result(&self) -> AfterResult {
        AfterResult::Ignore
    }

    fn accepts_typing(&self) -> bool {
        true
    }

    fn view(&self) -> VariantView;
}

pub fn variant_for(
    mode: PracticeMode,
    dictation: DictationMode,
    timing: PracticeTiming,
) -> Box<dyn PracticeVariant> {
    match (mode, dictation) {
        (PracticeMode::Shadowing, _) => Box::new(ShadowingVariant::default()),
        (PracticeMode::Dictation, DictationMode::Whole) => Box::new(WholeVariant::default()),
        (PracticeMode::Dictation, DictationMode::MissingWord) => {
            Box::new(MissingWordVariant::new(timing))
        }
        (PracticeMode::Dictation, DictationMode::Sequential) => {
            Box::new(SequentialVariant::new(timing))
        }
    }
}
