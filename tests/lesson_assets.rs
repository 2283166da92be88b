use std::fs;

use dictr::catalog::import::{lesson_from_segments, to_toml};
use dictr::catalog::{Catalog, lesson::DEFAULT_LESSON};
use dictr::session::progress::accuracy_percent;

#[test]
fn bundled_lesson_is_well_formed() {
    let catalog = Catalog::embedded(DEFAULT_LESSON).unwrap();
    assert_eq!(catalog.title(), "First Snowfall");
    assert_eq!(catalog.len(), 22);

    let sentences = catalog.sentences();
    for (i, s) in sentences.iter().enumerate() {
        assert_eq!(s.id as usize, i + 1);
        assert!(s.end > s.start, "sentence {} has an empty window", s.id);
        assert!(!s.text.trim().is_empty());
    }
    for pair in sentences.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
    assert_eq!(sentences[0].text, "First snowfall.");
    assert_eq!(sentences[1].start, 3.6);
    assert_eq!(sentences[1].end, 5.6);
}

#[test]
fn full_lesson_accuracy_rounds() {
    assert_eq!(accuracy_percent(18, 22), 82);
    assert_eq!(accuracy_percent(22, 22), 100);
    assert_eq!(accuracy_percent(0, 22), 0);
}

#[test]
fn imported_lesson_loads_back_from_disk() {
    let json = r#"{"segments": [
        {"text": " The snow is beautiful.", "start": 8.8, "end": 10.4},
        {"text": "  ", "start": 10.5, "end": 10.6},
        {"text": " First snowfall.", "start": 0.0, "end": 1.6}
    ]}"#;
    let lesson = lesson_from_segments(json, "Imported", Some("take.mp3")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("imported.toml");
    fs::write(&path, to_toml(&lesson).unwrap()).unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.title(), "Imported");
    let texts: Vec<_> = catalog.sentences().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, ["First snowfall.", "The snow is beautiful."]);
    assert_eq!(catalog.audio(), Some(dir.path().join("take.mp3").as_path()));
}
