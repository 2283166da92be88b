use tracing::{debug, info, warn};

use crate::error::CaptureError;

use super::host::{CaptureEvent, CaptureHost, RecordingId};

/// One recorded take, assembled from the recorder's chunks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedClip {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl RecordedClip {
    /// File extension for the clip's container.
    pub fn extension(&self) -> &'static str {
        let essence = self.mime.split(';').next().unwrap_or("").trim();
        match essence {
            "audio/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/mp4" => "m4a",
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/flac" => "flac",
            _ => "wav",
        }
    }
}

/// Why recording is not available. Shown until the session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Closed,
    Ready,
    NoMicrophone,
    NoSpeechRecognition,
}

/// What merging one capture event changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureUpdate {
    /// From a recording that is no longer current.
    Ignored,
    Interim,
    /// A final transcript, to be checked against the sentence current now.
    Final(String),
    Chunk,
    ClipReady,
    Ended,
    Failed(String),
}

/// Owns the recognizer/recorder pair for the shadowing session.
pub struct CaptureController {
    host: Box<dyn CaptureHost>,
    mime: String,
    availability: Availability,
    next_id: u64,
    active: Option<RecordingId>,
    recording: bool,
    interim: String,
    chunks: Vec<u8>,
    clip: Option<RecordedClip>,
}

impl CaptureController {
    pub fn new(host: Box<dyn CaptureHost>, mime: &str) -> Self {
        Self {
            host,
            mime: mime.to_string(),
            availability: Availability::Closed,
            next_id: 0,
            active: None,
            recording: false,
            interim: String::new(),
            chunks: Vec::new(),
            clip: None,
        }
    }

    /// Acquire the host once. Failure is not retried.
    pub fn open(&mut self, language: &str) -> Availability {
        if self.availability != Availability::Closed {
            return self.availability;
        }
        self.availability = match self.host.open(language) {
            Ok(()) => Availability::Ready,
            Err(CaptureError::NoSpeechRecognition) => Availability::NoSpeechRecognition,
            Err(e) => {
                warn!(error = %e, host = self.host.name(), "capture unavailable");
                Availability::NoMicrophone
            }
        };
        info!(host = self.host.name(), availability = ?self.availability, "capture open");
        self.availability
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn can_record(&self) -> bool {
        self.availability == Availability::Ready
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn clip(&self) -> Option<&RecordedClip> {
        self.clip.as_ref()
    }

    /// Start recognizer and recorder together; discards the previous take.
    pub fn start(&mut self) -> Result<RecordingId, CaptureError> {
        if !self.can_record() {
            return Err(CaptureError::NotReady);
        }
        if self.recording {
            if let Some(id) = self.active {
                return Ok(id);
            }
        }
        self.next_id += 1;
        let id = RecordingId(self.next_id);
        self.interim.clear();
        self.chunks.clear();
        self.clip = None;
        self.active = Some(id);
        if let Err(e) = self.host.start(id) {
            self.active = None;
            return Err(e);
        }
        self.recording = true;
        debug!(?id, "recording");
        Ok(id)
    }

    /// User stop. The recognizer is asked to finish, and its final
    /// transcript for this take is still merged when it arrives.
    pub fn stop(&mut self) {
        if self.recording {
            self.host.finish_recognizer();
            self.host.stop_recorder();
            self.recording = false;
        }
    }

    fn halt(&mut self) {
        if self.active.is_some() {
            self.host.stop_recognizer();
            self.host.stop_recorder();
        }
        self.recording = false;
    }

    /// Forget the current take; late events for it are ignored from now on.
    pub fn discard(&mut self) {
        self.halt();
        self.active = None;
        self.interim.clear();
        self.chunks.clear();
        self.clip = None;
    }

    pub fn handle(&mut self, event: CaptureEvent) -> CaptureUpdate {
        if self.active != Some(event.id()) {
            debug!(id = ?event.id(), "stale capture event");
            return CaptureUpdate::Ignored;
        }
        match event {
            CaptureEvent::Interim { text, .. } => {
                self.interim = text;
                CaptureUpdate::Interim
            }
            CaptureEvent::Final { text, .. } => {
                // Recording never outlives recognition.
                self.host.stop_recognizer();
                self.host.stop_recorder();
                self.recording = false;
                self.interim = text.clone();
                CaptureUpdate::Final(text)
            }
            CaptureEvent::Chunk { bytes, .. } => {
                self.chunks.extend_from_slice(&bytes);
                CaptureUpdate::Chunk
            }
            CaptureEvent::RecorderStopped { .. } => {
                if self.chunks.is_empty() {
                    warn!("recorder stopped without audio data");
                    return CaptureUpdate::Ended;
                }
                self.clip = Some(RecordedClip {
                    bytes: std::mem::take(&mut self.chunks),
                    mime: self.mime.clone(),
                });
                CaptureUpdate::ClipReady
            }
            CaptureEvent::RecognitionEnded { .. } => {
                if self.recording {
                    self.host.stop_recorder();
                    self.recording = false;
                }
                CaptureUpdate::Ended
            }
            CaptureEvent::Failed { message, .. } => {
                warn!(%message, "speech recognition error");
                self.halt();
                CaptureUpdate::Failed(message)
            }
        }
    }
}
