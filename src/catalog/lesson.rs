use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_LESSON: &str = "first-snowfall";

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

/// One timestamped unit of the lesson transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: u32,
    pub text: String,
    /// Offset into the audio track, in seconds.
    pub start: f64,
    pub end: f64,
}

impl Sentence {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// On-disk lesson format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonFile {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    pub sentences: Vec<Sentence>,
}

/// Validated, immutable sentence catalog for one audio recording.
#[derive(Clone, Debug)]
pub struct Catalog {
    title: String,
    audio: Option<PathBuf>,
    sentences: Vec<Sentence>,
}

impl Catalog {
    /// Whitespace runs in sentence text are collapsed to one space and the
    /// ends trimmed, so words are always separated by exactly one space.
    pub fn new(mut lesson: LessonFile, audio_base: Option<&Path>) -> Result<Self, CatalogError> {
        for s in &mut lesson.sentences {
            s.text = s.text.split_whitespace().collect::<Vec<_>>().join(" ");
        }
        validate(&lesson.sentences)?;
        let audio = lesson.audio.map(|a| {
            let path = PathBuf::from(a);
            match audio_base {
                Some(base) if path.is_relative() => base.join(path),
                _ => path,
            }
        });
        Ok(Self {
            title: lesson.title,
            audio,
            sentences: lesson.sentences,
        })
    }

    /// Load a lesson bundled into the binary. Its audio is looked up in the
    /// user data directory.
    pub fn embedded(name: &str) -> Result<Self, CatalogError> {
        let file = LessonAssets::get(&format!("{name}.toml"))
            .ok_or_else(|| CatalogError::UnknownLesson(name.to_string()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        let lesson: LessonFile = toml::from_str(&content)?;
        Self::new(lesson, Some(&embedded_audio_dir()))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let lesson: LessonFile = toml::from_str(&content)?;
        Self::new(lesson, path.parent())
    }

    pub fn available_embedded() -> Vec<String> {
        LessonAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn audio(&self) -> Option<&Path> {
        self.audio.as_deref()
    }

    pub fn set_audio(&mut self, path: PathBuf) {
        self.audio = Some(path);
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

fn embedded_audio_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dictr")
        .join("audio")
}

fn validate(sentences: &[Sentence]) -> Result<(), CatalogError> {
    if sentences.is_empty() {
        return Err(CatalogError::Empty);
    }
    let mut seen = HashSet::new();
    for s in sentences {
        if !seen.insert(s.id) {
            return Err(CatalogError::DuplicateId(s.id));
        }
        if s.text.trim().is_empty() {
            return Err(CatalogError::EmptyText(s.id));
        }
        let window_ok = s.start.is_finite() && s.end.is_finite() && s.start >= 0.0 && s.start < s.end;
        if !window_ok {
            return Err(CatalogError::InvalidWindow {
                id: s.id,
                start: s.start,
                end: s.end,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: u32, text: &str, start: f64, end: f64) -> Sentence {
        Sentence {
            id,
            text: text.to_string(),
            start,
            end,
        }
    }

    fn lesson(sentences: Vec<Sentence>) -> LessonFile {
        LessonFile {
            title: "test".to_string(),
            audio: Some("clip.mp3".to_string()),
            sentences,
        }
    }

    #[test]
    fn embedded_default_lesson_loads() {
        let catalog = Catalog::embedded(DEFAULT_LESSON).unwrap();
        assert_eq!(catalog.title(), "First Snowfall");
        assert_eq!(catalog.len(), 22);
        assert_eq!(catalog.get(3).unwrap().text, "The snow is beautiful.");
        assert!(catalog.audio().unwrap().ends_with("learn-english-via-listening-1001.mp3"));
    }

    #[test]
    fn embedded_lessons_are_listed() {
        assert!(Catalog::available_embedded().contains(&DEFAULT_LESSON.to_string()));
    }

    #[test]
    fn unknown_embedded_lesson_is_an_error() {
        assert!(matches!(
            Catalog::embedded("nope"),
            Err(CatalogError::UnknownLesson(_))
        ));
    }

    #[test]
    fn stray_spaces_in_text_are_collapsed() {
        let catalog = Catalog::new(
            lesson(vec![sentence(7, " My mom  doesn't like the snow. ", 17.6, 19.5)]),
            None,
        )
        .unwrap();
        let s = catalog.get(0).unwrap();
        assert_eq!(s.text, "My mom doesn't like the snow.");
        assert_eq!(s.words().last(), Some(&"snow."));
    }

    #[test]
    fn words_skip_empty_runs() {
        let s = sentence(1, "snow  angels ", 0.0, 1.0);
        assert_eq!(s.words(), vec!["snow", "angels"]);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(Catalog::new(lesson(vec![]), None), Err(CatalogError::Empty)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let l = lesson(vec![sentence(1, "a", 0.0, 1.0), sentence(1, "b", 1.0, 2.0)]);
        assert!(matches!(Catalog::new(l, None), Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn rejects_inverted_or_empty_window() {
        let l = lesson(vec![sentence(1, "a", 2.0, 2.0)]);
        assert!(matches!(
            Catalog::new(l, None),
            Err(CatalogError::InvalidWindow { id: 1, .. })
        ));
        let l = lesson(vec![sentence(2, "a", f64::NAN, 1.0)]);
        assert!(Catalog::new(l, None).is_err());
    }

    #[test]
    fn rejects_blank_text() {
        let l = lesson(vec![sentence(4, "   ", 0.0, 1.0)]);
        assert!(matches!(Catalog::new(l, None), Err(CatalogError::EmptyText(4))));
    }

    #[test]
    fn relative_audio_resolves_against_base() {
        let l = lesson(vec![sentence(1, "a", 0.0, 1.0)]);
        let c = Catalog::new(l, Some(Path::new("/lessons"))).unwrap();
        assert_eq!(c.audio(), Some(Path::new("/lessons/clip.mp3")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson.toml");
        let content = r#"
title = "Tiny"
audio = "tiny.mp3"

[[sentences]]
id = 1
text = "Hello there."
start = 0.0
end = 1.5
"#;
        fs::write(&path, content).unwrap();
        let c = Catalog::load(&path).unwrap();
        assert_eq!(c.title(), "Tiny");
        assert_eq!(c.audio(), Some(dir.path().join("tiny.mp3").as_path()));
        assert_eq!(c.sentences()[0].duration(), 1.5);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
