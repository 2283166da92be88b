use std::env;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, info, warn};

use crate::error::CaptureError;
use crate::event::AppEvent;

const PARTIAL_PREFIX: &str = "partial:";
const CHUNK_SIZE: usize = 4096;

/// Identifies one start..stop recording so late events from an earlier one
/// can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordingId(pub u64);

/// Produced off the UI thread and merged into the session on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    Interim { id: RecordingId, text: String },
    Final { id: RecordingId, text: String },
    Chunk { id: RecordingId, bytes: Vec<u8> },
    RecorderStopped { id: RecordingId },
    RecognitionEnded { id: RecordingId },
    Failed { id: RecordingId, message: String },
}

impl CaptureEvent {
    pub fn id(&self) -> RecordingId {
        match self {
            CaptureEvent::Interim { id, .. }
            | CaptureEvent::Final { id, .. }
            | CaptureEvent::Chunk { id, .. }
            | CaptureEvent::RecorderStopped { id }
            | CaptureEvent::RecognitionEnded { id }
            | CaptureEvent::Failed { id, .. } => *id,
        }
    }
}

/// Microphone capture plus speech-to-text over one shared source.
pub trait CaptureHost {
    /// Acquire the capture device and the recognizer.
    fn open(&mut self, language: &str) -> Result<(), CaptureError>;

    /// Start the recognizer and the raw recorder together.
    fn start(&mut self, id: RecordingId) -> Result<(), CaptureError>;

    /// Ask the recognizer to finish with the speech heard so far. Its final
    /// result, if any, still arrives as an event.
    fn finish_recognizer(&mut self) {
        self.stop_recognizer();
    }

    /// Stop the recognizer now, dropping anything it has not reported.
    fn stop_recognizer(&mut self);

    fn stop_recorder(&mut self);

    fn name(&self) -> &'static str;
}

/// For sessions without any capture device.
#[derive(Default)]
pub struct NoCaptureHost;

impl CaptureHost for NoCaptureHost {
    fn open(&mut self, _language: &str) -> Result<(), CaptureError> {
        Err(CaptureError::NoMicrophone)
    }

    fn start(&mut self, _id: RecordingId) -> Result<(), CaptureError> {
        Err(CaptureError::NotReady)
    }

    fn stop_recognizer(&mut self) {}

    fn stop_recorder(&mut self) {}

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Runs a recognizer and a recorder as child processes.
///
/// The recognizer prints one result per line: `partial: <text>` for interim
/// hypotheses, anything else is the final transcript. Closing its stdin asks
/// it to flush a final result and exit. The recorder writes raw audio to
/// stdout. Reader threads forward both as [`AppEvent::Capture`].
pub struct CommandCaptureHost {
    recognizer: Vec<String>,
    recorder: Vec<String>,
    language: String,
    events: Sender<AppEvent>,
    recognizer_child: Option<Child>,
    recognizer_stdin: Option<ChildStdin>,
    recorder_child: Option<Child>,
}

impl CommandCaptureHost {
    pub fn new(recognizer_command: &str, recorder_command: &str, events: Sender<AppEvent>) -> Self {
        Self {
            recognizer: split_command(recognizer_command),
            recorder: split_command(recorder_command),
            language: String::new(),
            events,
            recognizer_child: None,
            recognizer_stdin: None,
            recorder_child: None,
        }
    }

    fn spawn(argv: &[String], language: &str, stdin: Stdio) -> Result<Child, CaptureError> {
        let (program, args) = argv.split_first().ok_or(CaptureError::NotReady)?;
        Command::new(program)
            .args(args)
            .env("DICTR_LANGUAGE", language)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CaptureError::Start {
                program: program.clone(),
                source,
            })
    }
}

impl CaptureHost for CommandCaptureHost {
    fn open(&mut self, language: &str) -> Result<(), CaptureError> {
        if !self.recorder.first().is_some_and(|p| program_exists(p)) {
            return Err(CaptureError::NoMicrophone);
        }
        if !self.recognizer.first().is_some_and(|p| program_exists(p)) {
            return Err(CaptureError::NoSpeechRecognition);
        }
        self.language = language.to_string();
        info!(recognizer = %self.recognizer[0], recorder = %self.recorder[0], language, "capture opened");
        Ok(())
    }

    fn start(&mut self, id: RecordingId) -> Result<(), CaptureError> {
        self.stop_recognizer();
        self.stop_recorder();

        let mut recognizer = Self::spawn(&self.recognizer, &self.language, Stdio::piped())?;
        let mut recorder = match Self::spawn(&self.recorder, &self.language, Stdio::null()) {
            Ok(child) => child,
            Err(e) => {
                kill(&mut recognizer);
                return Err(e);
            }
        };
        if let Some(stdout) = recognizer.stdout.take() {
            forward_transcripts(stdout, id, self.events.clone());
        }
        if let Some(stdout) = recorder.stdout.take() {
            forward_chunks(stdout, id, self.events.clone());
        }
        self.recognizer_stdin = recognizer.stdin.take();
        self.recognizer_child = Some(recognizer);
        self.recorder_child = Some(recorder);
        debug!(?id, "capture started");
        Ok(())
    }

    /// Close the recognizer's stdin and leave the process to its reader
    /// thread, which forwards the final line and then `RecognitionEnded`.
    fn finish_recognizer(&mut self) {
        if self.recognizer_stdin.take().is_some() {
            debug!("recognizer stdin closed");
        }
    }

    fn stop_recognizer(&mut self) {
        self.recognizer_stdin = None;
        if let Some(mut child) = self.recognizer_child.take() {
            kill(&mut child);
        }
    }

    fn stop_recorder(&mut self) {
        if let Some(mut child) = self.recorder_child.take() {
            kill(&mut child);
        }
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

impl Drop for CommandCaptureHost {
    fn drop(&mut self) {
        self.stop_recognizer();
        self.stop_recorder();
    }
}

/// Turn one recognizer output line into an event. Blank lines carry nothing.
pub fn parse_transcript_line(line: &str, id: RecordingId) -> Option<CaptureEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix(PARTIAL_PREFIX) {
        Some(text) => Some(CaptureEvent::Interim {
            id,
            text: text.trim().to_string(),
        }),
        None => Some(CaptureEvent::Final {
            id,
            text: line.to_string(),
        }),
    }
}

fn forward_transcripts(stdout: ChildStdout, id: RecordingId, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let reader = BufReader::new(stdout);
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let message = e.to_string();
                    let _ = tx.send(AppEvent::Capture(CaptureEvent::Failed { id, message }));
                    return;
                }
            };
            let Some(event) = parse_transcript_line(&line, id) else {
                continue;
            };
            if tx.send(AppEvent::Capture(event)).is_err() {
                return;
            }
        }
        let _ = tx.send(AppEvent::Capture(CaptureEvent::RecognitionEnded { id }));
    });
}

fn forward_chunks(mut stdout: ChildStdout, id: RecordingId, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            match stdout.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    let event = CaptureEvent::Chunk {
                        id,
                        bytes: buf[..n].to_vec(),
                    };
                    if tx.send(AppEvent::Capture(event)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "recorder read failed");
                    break;
                }
            }
        }
        let _ = tx.send(AppEvent::Capture(CaptureEvent::RecorderStopped { id }));
    });
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "capture process already exited");
    }
    let _ = child.wait();
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

fn program_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
