//! Loading stories through manifests and script files.

use std::path::{Path, PathBuf};

use story_engine::{LoadError, Story, StoryManifest};

#[test]
fn manifest_resolves_script_next_to_it() {
    let manifest = StoryManifest::load_from_ron(Path::new("stories/newburyport.ron")).unwrap();
    assert_eq!(manifest.script, PathBuf::from("stories").join("newburyport.twee"));
    assert_eq!(manifest.start.as_deref(), Some("Newburyport"));
    assert_eq!(manifest.title, None);
}

#[test]
fn story_loads_from_manifest() {
    let story = Story::builder()
        .manifest("stories/newburyport.ron")
        .build()
        .unwrap();

    assert_eq!(story.title(), "Newburyport");
    assert_eq!(story.passages().count(), 11);
    let start = story.start().unwrap();
    assert_eq!(story.passage(start).title(), "Newburyport");
}

#[test]
fn builder_overrides_manifest_values() {
    let story = Story::builder()
        .manifest("stories/newburyport.ron")
        .start("Train Station")
        .title("Night Train")
        .build()
        .unwrap();

    assert_eq!(story.title(), "Night Train");
    assert_eq!(story.start(), story.passage_id("Train Station"));
}

#[test]
fn script_path_and_manifest_agree() {
    let from_manifest = Story::builder()
        .manifest("stories/newburyport.ron")
        .build()
        .unwrap();
    let from_script = Story::builder()
        .script_path("stories/newburyport.twee")
        .start("Newburyport")
        .build()
        .unwrap();

    let titles = |story: &Story| -> Vec<String> {
        story.passages().map(|p| p.title().to_string()).collect()
    };
    assert_eq!(titles(&from_manifest), titles(&from_script));
    assert_eq!(from_manifest.links_iter().count(), from_script.links_iter().count());
}

#[test]
fn missing_manifest_is_io_error() {
    let err = Story::builder()
        .manifest("stories/no_such_manifest.ron")
        .build()
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn malformed_manifest_is_ron_error() {
    let err = StoryManifest::parse_ron("(start: Some(\"Newburyport\"))").unwrap_err();
    assert!(matches!(err, LoadError::Ron(_)));
}

#[test]
fn fixtures_load_without_start() {
    let story = Story::builder()
        .script_path("tests/fixtures/cycle.twee")
        .build()
        .unwrap();
    assert_eq!(story.title(), "Loop");
    assert_eq!(story.start(), None);
}
