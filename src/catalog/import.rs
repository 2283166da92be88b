//! Conversion of speech-to-text segment dumps into lesson files.
//!
//! Accepts the `{ "segments": [ { "id", "start", "end", "text" } ] }` shape
//! written by Whisper-style transcribers. Extra fields are ignored.

use serde::Deserialize;

use crate::catalog::lesson::{LessonFile, Sentence};
use crate::error::CatalogError;

#[derive(Debug, Deserialize)]
struct SegmentDump {
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    id: Option<u32>,
    start: f64,
    end: f64,
    #[serde(default)]
    text: String,
}

/// Build a lesson from a segment dump. Segments with blank text are skipped,
/// text is trimmed, times are rounded to tenths of a second and ids are
/// renumbered from 1 in playback order. A segment that rounds to nothing is
/// widened to one tenth.
pub fn lesson_from_segments(
    json: &str,
    title: &str,
    audio: Option<&str>,
) -> Result<LessonFile, CatalogError> {
    let dump: SegmentDump = serde_json::from_str(json)?;

    let mut segments: Vec<Segment> = dump
        .segments
        .into_iter()
        .filter(|s| !s.text.trim().is_empty())
        .collect();
    segments.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.id.cmp(&b.id)));

    let sentences = segments
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let start = round_tenths(s.start);
            Sentence {
                id: i as u32 + 1,
                text: s.text.trim().to_string(),
                start,
                end: round_tenths(s.end).max(round_tenths(start + 0.1)),
            }
        })
        .collect();

    Ok(LessonFile {
        title: title.to_string(),
        audio: audio.map(str::to_string),
        sentences,
    })
}

/// Draft a lesson by cutting `total` seconds of audio into `segment`-second
/// windows. A trailing window shorter than `min_segment` is dropped. Each
/// sentence gets a placeholder text naming its window, to be replaced by
/// hand.
pub fn fixed_interval_lesson(
    total: f64,
    segment: f64,
    min_segment: f64,
    title: &str,
    audio: Option<&str>,
) -> Result<LessonFile, CatalogError> {
    if !(segment.is_finite() && segment > 0.0 && total.is_finite() && min_segment >= 0.0) {
        return Err(CatalogError::InvalidDraft {
            total,
            segment,
            min_segment,
        });
    }

    let mut sentences = Vec::new();
    let mut current = 0.0;
    while current < total - min_segment {
        let end = (current + segment).min(total);
        if end - current >= min_segment {
            let (start, end) = (round_tenths(current), round_tenths(end));
            let id = sentences.len() as u32 + 1;
            sentences.push(Sentence {
                id,
                text: format!("[{id}] {start:.1}s-{end:.1}s"),
                start,
                end,
            });
        }
        current = end;
    }

    Ok(LessonFile {
        title: title.to_string(),
        audio: audio.map(str::to_string),
        sentences,
    })
}

pub fn to_toml(lesson: &LessonFile) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(lesson)
}

fn round_tenths(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}
