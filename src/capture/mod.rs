pub mod controller;
pub mod host;

pub use controller::{Availability, CaptureController, CaptureUpdate, RecordedClip};
pub use host::{CaptureEvent, CaptureHost, CommandCaptureHost, NoCaptureHost, RecordingId};
