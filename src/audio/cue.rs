use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::capture::RecordedClip;
use crate::catalog::Sentence;
use crate::error::AudioError;

use super::output::AudioOutput;

const RATES: [f32; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];
const ORIGINAL_GUARD: Duration = Duration::from_millis(100);

/// One of the eight selectable playback speeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackRate(usize);

impl PlaybackRate {
    pub const NORMAL: PlaybackRate = PlaybackRate(3);

    pub fn all() -> impl Iterator<Item = PlaybackRate> {
        (0..RATES.len()).map(PlaybackRate)
    }

    pub fn nearest(value: f32) -> Self {
        let index = RATES
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
            .map(|(i, _)| i)
            .unwrap_or(Self::NORMAL.0);
        PlaybackRate(index)
    }

    pub fn value(self) -> f32 {
        RATES[self.0]
    }

    pub fn faster(self) -> Self {
        PlaybackRate((self.0 + 1).min(RATES.len() - 1))
    }

    pub fn slower(self) -> Self {
        PlaybackRate(self.0.saturating_sub(1))
    }

    pub fn label(self) -> String {
        format!("{}x", self.value())
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CueId(u64);

struct ActiveCue {
    id: CueId,
    stop_at: Option<Instant>,
}

/// Plays sentence windows on the shared output and pauses them when their
/// window (scaled by rate, plus a guard) has elapsed.
///
/// Every play supersedes the previous one: a stop deadline only takes effect
/// while its cue is still the active one.
pub struct CueController {
    output: Box<dyn AudioOutput>,
    rate: PlaybackRate,
    guard: Duration,
    next_id: u64,
    active: Option<ActiveCue>,
}

impl CueController {
    pub fn new(output: Box<dyn AudioOutput>, rate: PlaybackRate, guard: Duration) -> Self {
        info!(output = output.name(), rate = rate.value(), "audio ready");
        Self {
            output,
            rate,
            guard,
            next_id: 0,
            active: None,
        }
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    /// Takes effect from the next play.
    pub fn set_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// When the active cue should be paused, if it has a window.
    pub fn stop_deadline(&self) -> Option<Instant> {
        self.active.as_ref().and_then(|a| a.stop_at)
    }

    pub fn play(&mut self, sentence: &Sentence, now: Instant) -> Result<CueId, AudioError> {
        self.play_window(sentence, self.rate.value(), self.guard, now)
    }

    /// Same as [`play`](Self::play); safe to call while a cue is playing.
    pub fn replay(&mut self, sentence: &Sentence, now: Instant) -> Result<CueId, AudioError> {
        self.play(sentence, now)
    }

    /// The sentence at normal speed, for comparing against a shadowing take.
    pub fn play_original(&mut self, sentence: &Sentence, now: Instant) -> Result<CueId, AudioError> {
        self.play_window(sentence, 1.0, ORIGINAL_GUARD, now)
    }

    pub fn play_clip(&mut self, clip: &RecordedClip) -> Result<CueId, AudioError> {
        let id = self.fresh_id();
        self.active = None;
        self.output.play_clip(clip)?;
        debug!(?id, "clip playback");
        self.active = Some(ActiveCue { id, stop_at: None });
        Ok(id)
    }

    fn play_window(
        &mut self,
        sentence: &Sentence,
        rate: f32,
        guard: Duration,
        now: Instant,
    ) -> Result<CueId, AudioError> {
        let id = self.fresh_id();
        self.active = None;
        self.output.play_window(sentence.start, rate)?;
        let window = Duration::from_secs_f64((sentence.duration() / rate as f64).max(0.0));
        let stop_at = now + window + guard;
        debug!(?id, sentence = sentence.id, rate, window_ms = window.as_millis() as u64, "cue");
        self.active = Some(ActiveCue {
            id,
            stop_at: Some(stop_at),
        });
        Ok(id)
    }

    fn fresh_id(&mut self) -> CueId {
        self.next_id += 1;
        CueId(self.next_id)
    }

    /// Pause only if `id` is still the active cue. Returns whether it paused.
    pub fn stop_if_current(&mut self, id: CueId) -> bool {
        match &self.active {
            Some(active) if active.id == id => {
                self.output.pause();
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn stop(&mut self) {
        self.output.pause();
        self.active = None;
    }

    /// Pause the active cue once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<CueId> {
        let id = match &self.active {
            Some(ActiveCue {
                id,
                stop_at: Some(at),
            }) if *at <= now => *id,
            _ => return None,
        };
        self.stop_if_current(id).then_some(id)
    }
}

/// Counter bumped whenever the current sentence changes to a position past
/// the first; shortly afterwards the new sentence plays by itself.
pub struct AutoplayTrigger {
    delay: Duration,
    counter: u64,
    armed: Option<(u64, Instant)>,
}

impl AutoplayTrigger {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            counter: 0,
            armed: None,
        }
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn sentence_changed(&mut self, position: usize, now: Instant) {
        if position == 0 {
            self.armed = None;
            return;
        }
        self.counter += 1;
        self.armed = Some((self.counter, now + self.delay));
    }

    /// True once per bump, when its delay has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.armed {
            Some((counter, at)) if at <= now && counter == self.counter => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }
}
