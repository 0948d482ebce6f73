//! A hand translation of a concatenated text, mapped back through the
//! concatenation's own map to the files the text started from.

use seam_conformance::{readable_mappings, translation, translation_inner, HELLO_WORLD, TRANSLATED};
use seam_map::SourceEntry;
use seam_source::{MapOptions, Source};

const INNER_TEXT: &str = "Hello World\nis a test string\nTranslate: Other text";

#[test]
fn inner_concat_map() {
    let map = translation_inner()
        .map(&MapOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        readable_mappings(&map),
        "1:0 -> [hello-world.txt] 1:0\n\
         2:0 -> [hello-world.txt] 2:0\n\
         3:0 -> [header.txt] 1:0, :11"
    );
}

#[test]
fn text_passes_through_unchanged() {
    assert_eq!(translation(false).text().unwrap(), TRANSLATED);
    assert_eq!(translation(true).text().unwrap(), TRANSLATED);
}

#[test]
fn composed_through_inner_map() {
    let map = translation(false)
        .map(&MapOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        readable_mappings(&map),
        "1:12 -> [hello-world.txt] 1:0 (Hello), :17, :18 -> [hello-world.txt] 1:6 (World)\n\
         2:0 -> [hello-world.txt] 2:0, :7, :13 -> [hello-world.txt] 2:10\n\
         3:0 -> [text] 3:11, :7, :8 -> [text] 3:17"
    );
    assert_eq!(map.encode_mappings(), "YCAAA,K,CAAMC;AACN,O,MAAU;ADCC,O,CAAM");
    assert_eq!(map.names(), &["Hello".to_string(), "World".to_string()]);
    assert_eq!(
        map.sources(),
        &[
            SourceEntry::new("text", Some(INNER_TEXT.to_string())),
            SourceEntry::new("hello-world.txt", Some(HELLO_WORLD.to_string())),
        ]
    );
    // The leaf's own `file` names its text, not whatever embeds it.
    assert_eq!(map.file(), None);
}

#[test]
fn remove_original_drops_untraceable() {
    let map = translation(true)
        .map(&MapOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(
        readable_mappings(&map),
        "1:12 -> [hello-world.txt] 1:0 (Hello), :17, :18 -> [hello-world.txt] 1:6 (World)\n\
         2:0 -> [hello-world.txt] 2:0, :7, :13 -> [hello-world.txt] 2:10"
    );
    assert_eq!(map.encode_mappings(), "YAAAA,K,CAAMC;AACN,O,MAAU");
    assert_eq!(
        map.sources(),
        &[SourceEntry::new("hello-world.txt", Some(HELLO_WORLD.to_string()))]
    );
}

#[test]
fn wire_output() {
    let map = translation(true)
        .map(&MapOptions::default().with_file("x"))
        .unwrap()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&map.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "version": 3,
            "file": "x",
            "sources": ["hello-world.txt"],
            "sourcesContent": [HELLO_WORLD],
            "names": ["Hello", "World"],
            "mappings": "YAAAA,K,CAAMC;AACN,O,MAAU",
        })
    );
}

#[test]
fn hash_is_stable_and_clone_safe() {
    let source = translation(false);
    let digest = source.content_hash();
    assert_eq!(source.content_hash(), digest);

    let clone = source.clone();
    assert_eq!(clone.content_hash(), digest);
    assert_eq!(
        clone.text_and_map(&MapOptions::default()).unwrap(),
        source.text_and_map(&MapOptions::default()).unwrap()
    );

    assert_eq!(translation(false).content_hash(), digest);
    assert_ne!(translation(true).content_hash(), digest);
}

#[test]
fn embedding_keeps_composed_provenance() {
    let bundle = Source::concat([Source::raw("/* bundle */\n"), translation(false)]);
    let map = bundle.map(&MapOptions::default()).unwrap().unwrap();
    let first = readable_mappings(&map);
    assert!(first.starts_with("2:12 -> [hello-world.txt] 1:0 (Hello)"), "{first}");
    assert_eq!(map.sources()[1].identity.as_deref(), Some("hello-world.txt"));
}
