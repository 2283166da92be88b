use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("lesson has no sentences")]
    Empty,
    #[error("duplicate sentence id {0}")]
    DuplicateId(u32),
    #[error("sentence {0} has empty text")]
    EmptyText(u32),
    #[error("sentence {id} has an invalid time window {start}..{end}")]
    InvalidWindow { id: u32, start: f64, end: f64 },
    #[error("embedded lesson `{0}` not found")]
    UnknownLesson(String),
    #[error("failed to read lesson {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse lesson: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to parse transcription segments: {0}")]
    Segments(#[from] serde_json::Error),
    #[error("cannot cut {total}s into {segment}s windows (minimum {min_segment}s)")]
    InvalidDraft {
        total: f64,
        segment: f64,
        min_segment: f64,
    },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio file configured for this lesson")]
    NoSource,
    #[error("audio player `{program}` could not be started")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to stage recorded clip")]
    Stage(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no microphone available")]
    NoMicrophone,
    #[error("speech recognition is not available")]
    NoSpeechRecognition,
    #[error("capture is not ready")]
    NotReady,
    #[error("failed to start `{program}`")]
    Start {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
