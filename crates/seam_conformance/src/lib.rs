//! Conformance test helpers for seam source trees.
//!
//! Renders maps in a line-oriented readable form so scenario tests can
//! assert on provenance directly, and builds the fixtures those scenarios
//! share.

#![warn(missing_docs)]

use std::fmt::Write;

use seam_config::{load_options_from_str, MapOptions};
use seam_map::{Mapping, RawSourceMap, Segment, SourceEntry};
use seam_source::{InnerSource, Source};

/// Renders every segment of `map`, one generated line per output line.
///
/// The first segment of a line is written `line:column`, later ones
/// `:column`. Traced segments append `-> [source] line:column` and, when
/// named, `(name)`. Lines without segments are omitted.
pub fn readable_mappings(map: &Mapping) -> String {
    let mut out = String::new();
    let mut current_line = 0;
    for seg in map.segments() {
        if seg.generated_line != current_line {
            if !out.is_empty() {
                out.push('\n');
            }
            current_line = seg.generated_line;
            let _ = write!(out, "{}:{}", seg.generated_line, seg.generated_column);
        } else {
            let _ = write!(out, ", :{}", seg.generated_column);
        }
        if let Some(original) = seg.original {
            let source = map
                .source(original.source)
                .and_then(|s| s.identity.as_deref())
                .unwrap_or("null");
            let _ = write!(out, " -> [{source}] {}:{}", original.line, original.column);
            if let Some(name) = original.name.and_then(|n| map.name(n)) {
                let _ = write!(out, " ({name})");
            }
        }
    }
    out
}

/// Builds a wire map from decoded parts.
pub fn wire_map(
    file: Option<&str>,
    segments: Vec<Segment>,
    sources: Vec<SourceEntry>,
    names: &[&str],
) -> RawSourceMap {
    let names = names.iter().map(|n| n.to_string()).collect();
    Mapping::from_parts(segments, sources, names)
        .expect("fixture segments are ordered")
        .with_file(file.map(str::to_owned))
        .to_raw()
}

/// Parses resolution options from a TOML document with a `[map]` table.
pub fn options(toml: &str) -> MapOptions {
    load_options_from_str(toml).unwrap()
}

/// The text the translation scenario starts from.
pub const HELLO_WORLD: &str = "Hello World\nis a test string\n";

/// The intermediate tree of the translation scenario: a named greeting,
/// a header, and an untracked trailer.
pub fn translation_inner() -> Source {
    Source::concat([
        Source::original(HELLO_WORLD, "hello-world.txt"),
        Source::original("Translate: ", "header.txt"),
        Source::raw("Other text"),
    ])
}

/// The hand-written translation of [`translation_inner`]'s text, mapped
/// phrase by phrase back onto it under the identity `text`.
pub fn translation_outer_map() -> RawSourceMap {
    wire_map(
        Some("translated.txt"),
        vec![
            Segment::traced(1, 12, 0, 1, 0).with_name(0),
            Segment::marker(1, 17),
            Segment::traced(1, 18, 0, 1, 6).with_name(1),
            Segment::traced(2, 0, 0, 2, 0).with_name(2),
            Segment::marker(2, 7),
            Segment::traced(2, 13, 0, 2, 10),
            Segment::traced(3, 0, 0, 3, 11),
            Segment::marker(3, 7),
            Segment::traced(3, 8, 0, 3, 17),
        ],
        vec![SourceEntry::new("text", Some(HELLO_WORLD.to_string()))],
        &["Hello", "World", "nope"],
    )
}

/// The translated text.
pub const TRANSLATED: &str = "Translated: Hallo Welt\nist ein test Text\nAnderer Text";

/// Builds the translation scenario's outer leaf, composed through the inner
/// tree's own map.
pub fn translation(remove_original: bool) -> Source {
    let inner = translation_inner();
    let resolved = inner.text_and_map(&MapOptions::default()).unwrap();
    Source::mapped_with_inner(
        TRANSLATED,
        "text",
        translation_outer_map(),
        InnerSource::new(resolved.text, resolved.map.map(|m| m.to_raw()))
            .remove_original(remove_original),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_form() {
        let map = Mapping::from_parts(
            vec![
                Segment::traced(1, 0, 0, 1, 0).with_name(0),
                Segment::marker(1, 4),
                Segment::traced(3, 2, 1, 5, 6),
            ],
            vec![SourceEntry::new("a.js", None), SourceEntry::anonymous()],
            vec!["x".to_string()],
        )
        .unwrap();
        assert_eq!(
            readable_mappings(&map),
            "1:0 -> [a.js] 1:0 (x), :4\n3:2 -> [null] 5:6"
        );
    }

    #[test]
    fn options_fixture() {
        assert!(!options("[map]\ncolumns = false\n").columns);
    }
}
