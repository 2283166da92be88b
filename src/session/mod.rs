pub mod machine;
pub mod missing_word;
pub mod practice;
pub mod progress;
pub mod sequential;
pub mod shadowing;
pub mod timer;
pub mod variant;
pub mod whole;

pub use machine::{Phase, Session};
pub use practice::{Change, Practice};
pub use progress::{Outcome, Progress, SentenceStatus, Summary};
pub use variant::{
    DictationMode, PracticeMode, PracticeTiming, PracticeVariant, Submission, VariantKind,
    VariantView,
};
