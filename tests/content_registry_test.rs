use lookbook::{ContentRegistry, ContentSelection, MAX_ITEMS_PER_KIND};

fn registry() -> ContentRegistry {
    ContentRegistry::from_json(
        r#"{
            "cat": {
                "texts": ["first", "second", "third", "fourth", "fifth"],
                "images": ["  https://example.com/a.jpg  ", "", "https://example.com/b.jpg"],
                "videos": ["https://www.youtube.com/watch?v=dQw4w9WgXcQ"]
            },
            "dog": {
                "texts": ["   ", "\t", ""]
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn test_unknown_label_yields_three_empty_sequences() {
    let selection = registry().lookup("no-such-label");
    assert_eq!(selection, ContentSelection::default());
    assert!(selection.texts.is_empty());
    assert!(selection.images.is_empty());
    assert!(selection.videos.is_empty());
}

#[test]
fn test_sequences_are_capped_and_clean() {
    let selection = registry().lookup("cat");

    assert!(selection.texts.len() <= MAX_ITEMS_PER_KIND);
    assert!(selection.images.len() <= MAX_ITEMS_PER_KIND);
    assert!(selection.videos.len() <= MAX_ITEMS_PER_KIND);

    for item in selection
        .texts
        .iter()
        .chain(&selection.images)
        .chain(&selection.videos)
    {
        assert!(!item.is_empty());
        assert_eq!(item, item.trim());
    }

    assert_eq!(selection.texts, vec!["first", "second", "third"]);
    assert_eq!(
        selection.images,
        vec!["https://example.com/a.jpg", "https://example.com/b.jpg"]
    );
}

#[test]
fn test_entry_with_only_blank_items_is_effectively_empty() {
    let selection = registry().lookup("dog");
    assert!(selection.is_empty());
}

#[test]
fn test_validation_against_vocabulary() {
    let labels: Vec<String> = ["cat", "rabbit"].iter().map(|s| s.to_string()).collect();
    let report = registry().validate_against(&labels);
    assert_eq!(report.unknown, vec!["dog".to_string()]);
    assert_eq!(report.uncovered, vec!["rabbit".to_string()]);
}

#[test]
fn test_registry_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.json");
    std::fs::write(&path, r#"{"cat": {"texts": ["hello"]}}"#).unwrap();

    let registry = ContentRegistry::from_path(&path).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("cat").texts, vec!["hello"]);
}

#[test]
fn test_bundled_registry_parses() {
    // The registry shipped with the server binary has to stay well-formed
    let bundled = include_str!("../assets/content.json");
    let registry = ContentRegistry::from_json(bundled).unwrap();
    assert!(!registry.is_empty());
    for label in ["golden retriever", "tabby", "sports car"] {
        assert!(!registry.lookup(label).is_empty());
    }
}
