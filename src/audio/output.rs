use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use crate::capture::RecordedClip;
use crate::error::AudioError;

/// The single audio sink shared by cue playback and clip playback. Every call
/// replaces whatever is currently playing.
pub trait AudioOutput {
    /// Seek to `start` seconds, set `rate` and start playing.
    fn play_window(&mut self, start: f64, rate: f32) -> Result<(), AudioError>;

    fn play_clip(&mut self, clip: &RecordedClip) -> Result<(), AudioError>;

    fn pause(&mut self);

    fn name(&self) -> &'static str;
}

/// Plays through an external player process (mpv by default). Killing the
/// process is the pause.
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
    source: Option<PathBuf>,
    stage_dir: PathBuf,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(command: &str, source: Option<PathBuf>) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "mpv".to_string());
        Self {
            program,
            args: parts.collect(),
            source,
            stage_dir: stage_dir(),
            child: None,
        }
    }

    pub fn with_stage_dir(mut self, dir: PathBuf) -> Self {
        self.stage_dir = dir;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one cue, in the order they are passed to the player.
    pub fn window_args(&self, source: &Path, start: f64, rate: f32) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(format!("--start={start:.2}"));
        args.push(format!("--speed={rate}"));
        args.push(source.to_string_lossy().to_string());
        args
    }

    /// Write the clip next to other cache files so the player can open it.
    pub fn stage_clip(&self, clip: &RecordedClip) -> Result<PathBuf, AudioError> {
        fs::create_dir_all(&self.stage_dir).map_err(AudioError::Stage)?;
        let path = self
            .stage_dir
            .join(format!("shadowing-take.{}", clip.extension()));
        fs::write(&path, &clip.bytes).map_err(AudioError::Stage)?;
        Ok(path)
    }

    fn spawn(&mut self, args: Vec<String>) -> Result<(), AudioError> {
        self.pause();
        debug!(program = %self.program, ?args, "starting player");
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        self.child = Some(child);
        Ok(())
    }
}

impl AudioOutput for ExternalPlayer {
    fn play_window(&mut self, start: f64, rate: f32) -> Result<(), AudioError> {
        let source = self.source.clone().ok_or(AudioError::NoSource)?;
        let args = self.window_args(&source, start, rate);
        self.spawn(args)
    }

    fn play_clip(&mut self, clip: &RecordedClip) -> Result<(), AudioError> {
        let path = self.stage_clip(clip)?;
        let mut args = self.args.clone();
        args.push(path.to_string_lossy().to_string());
        self.spawn(args)
    }

    fn pause(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "player already exited");
            }
            if let Err(e) = child.wait() {
                warn!(error = %e, "failed to reap player");
            }
        }
    }

    fn name(&self) -> &'static str {
        "external"
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.pause();
    }
}

/// No audio device. Cues still run their timing so the session flow is the
/// same.
#[derive(Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play_window(&mut self, start: f64, rate: f32) -> Result<(), AudioError> {
        debug!(start, rate, "silent cue");
        Ok(())
    }

    fn play_clip(&mut self, clip: &RecordedClip) -> Result<(), AudioError> {
        debug!(bytes = clip.bytes.len(), "silent clip");
        Ok(())
    }

    fn pause(&mut self) {}

    fn name(&self) -> &'static str {
        "silent"
    }
}

fn stage_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dictr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_args_append_start_speed_and_file() {
        let player = ExternalPlayer::new("mpv --no-video", None);
        assert_eq!(player.program(), "mpv");
        let args = player.window_args(Path::new("/tmp/a.mp3"), 6.3, 0.75);
        assert_eq!(
            args,
            vec!["--no-video", "--start=6.30", "--speed=0.75", "/tmp/a.mp3"]
        );
    }

    #[test]
    fn missing_source_is_reported() {
        let mut player = ExternalPlayer::new("mpv", None);
        assert!(matches!(
            player.play_window(0.0, 1.0),
            Err(AudioError::NoSource)
        ));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut player = ExternalPlayer::new(
            "dictr-definitely-not-a-player",
            Some(PathBuf::from("a.mp3")),
        );
        assert!(matches!(
            player.play_window(0.0, 1.0),
            Err(AudioError::Spawn { .. })
        ));
    }

    #[test]
    fn clip_is_staged_with_mime_extension() {
        let dir = tempfile::tempdir().unwrap();
        let player = ExternalPlayer::new("mpv", None).with_stage_dir(dir.path().to_path_buf());
        let clip = RecordedClip {
            bytes: vec![1, 2, 3],
            mime: "audio/ogg;codecs=opus".to_string(),
        };
        let path = player.stage_clip(&clip).unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("ogg"));
        assert_eq!(fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
