pub mod cue;
pub mod output;

pub use cue::{AutoplayTrigger, CueController, CueId, PlaybackRate};
pub use output::{AudioOutput, ExternalPlayer, SilentOutput};
