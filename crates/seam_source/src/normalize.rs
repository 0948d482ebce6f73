//! Segment clean-up shared by every resolution path.

use seam_map::{MapError, Mapping, Position, Segment};

/// Drops generated-only markers that carry no information.
///
/// A marker only matters when it ends a mapped run, so it is kept only when
/// the closest earlier segment on the same line is traced. Markers at or
/// past `end` (the end of the generated text) are dropped as well.
pub(crate) fn drop_redundant_markers(segments: Vec<Segment>, end: Position) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    let mut line = 0;
    let mut mapped = false;
    for seg in segments {
        if seg.generated_line != line {
            line = seg.generated_line;
            mapped = false;
        }
        if seg.is_marker() {
            if !mapped || seg.position() >= end {
                continue;
            }
            mapped = false;
        } else {
            mapped = true;
        }
        out.push(seg);
    }
    out
}

/// Sorts segments by generated position; on ties the one pushed last wins.
pub(crate) fn sort_last_wins(mut segments: Vec<Segment>) -> Vec<Segment> {
    // Stable, so pushes from later plan items stay after earlier ones.
    segments.sort_by_key(Segment::position);
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        match out.last_mut() {
            Some(last) if last.position() == seg.position() => *last = seg,
            _ => out.push(seg),
        }
    }
    out
}

/// Turns segments with dangling source indices into markers and drops
/// dangling name indices.
pub(crate) fn sanitize(mapping: Mapping) -> Result<Mapping, MapError> {
    let source_count = mapping.sources().len() as u32;
    let name_count = mapping.names().len() as u32;
    let file = mapping.file().map(str::to_owned);
    let source_root = mapping.source_root().map(str::to_owned);
    let (segments, sources, names) = mapping.into_parts();
    let segments = segments
        .into_iter()
        .map(|mut seg| {
            if seg.original.is_some_and(|o| o.source >= source_count) {
                seg.original = None;
            }
            if let Some(original) = seg.original.as_mut() {
                original.name = original.name.filter(|&n| n < name_count);
            }
            seg
        })
        .collect();
    Ok(Mapping::from_parts(segments, sources, names)?
        .with_file(file)
        .with_source_root(source_root))
}

/// Collapses a mapping to one segment per generated line.
///
/// The first traced segment of each line is kept and moved to column 0;
/// original columns and names are dropped.
pub(crate) fn collapse_lines(mapping: Mapping) -> Result<Mapping, MapError> {
    let file = mapping.file().map(str::to_owned);
    let source_root = mapping.source_root().map(str::to_owned);
    let (segments, sources, names) = mapping.into_parts();
    let mut out: Vec<Segment> = Vec::new();
    for seg in segments {
        let Some(original) = seg.original else {
            continue;
        };
        if out
            .last()
            .is_some_and(|last| last.generated_line == seg.generated_line)
        {
            continue;
        }
        out.push(Segment::traced(
            seg.generated_line,
            0,
            original.source,
            original.line,
            0,
        ));
    }
    Ok(Mapping::from_parts(out, sources, names)?
        .with_file(file)
        .with_source_root(source_root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use seam_map::SourceEntry;

    #[test]
    fn markers_without_mapped_predecessor_dropped() {
        let segs = vec![
            Segment::marker(1, 0),
            Segment::traced(1, 2, 0, 1, 0),
            Segment::marker(1, 4),
            Segment::marker(1, 6),
            Segment::marker(2, 3),
        ];
        let out = drop_redundant_markers(segs, Position::new(3, 0));
        assert_eq!(
            out,
            vec![Segment::traced(1, 2, 0, 1, 0), Segment::marker(1, 4)]
        );
    }

    #[test]
    fn marker_at_end_dropped() {
        let segs = vec![Segment::traced(1, 0, 0, 1, 0), Segment::marker(1, 5)];
        let out = drop_redundant_markers(segs, Position::new(1, 5));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn later_push_wins_ties() {
        let segs = vec![
            Segment::traced(1, 0, 0, 1, 0),
            Segment::marker(1, 3),
            Segment::traced(1, 3, 1, 4, 0),
            Segment::traced(1, 1, 0, 1, 1),
        ];
        assert_eq!(
            sort_last_wins(segs),
            vec![
                Segment::traced(1, 0, 0, 1, 0),
                Segment::traced(1, 1, 0, 1, 1),
                Segment::traced(1, 3, 1, 4, 0),
            ]
        );
    }

    #[test]
    fn dangling_indices_sanitized() {
        let m = Mapping::from_parts(
            vec![
                Segment::traced(1, 0, 0, 1, 0).with_name(4),
                Segment::traced(1, 3, 2, 1, 0),
            ],
            vec![SourceEntry::new("a.js", None)],
            vec![],
        )
        .unwrap();
        let clean = sanitize(m).unwrap();
        assert_eq!(
            clean.segments(),
            &[Segment::traced(1, 0, 0, 1, 0), Segment::marker(1, 3)]
        );
    }

    #[test]
    fn collapse_keeps_first_per_line() {
        let m = Mapping::from_parts(
            vec![
                Segment::traced(1, 4, 0, 2, 7).with_name(0),
                Segment::marker(1, 6),
                Segment::traced(1, 8, 0, 3, 1),
                Segment::traced(2, 1, 0, 5, 2),
            ],
            vec![SourceEntry::new("a.js", None)],
            vec!["x".to_string()],
        )
        .unwrap()
        .with_file(Some("out.js".to_string()));
        let collapsed = collapse_lines(m).unwrap();
        assert_eq!(
            collapsed.segments(),
            &[Segment::traced(1, 0, 0, 2, 0), Segment::traced(2, 0, 0, 5, 0)]
        );
        assert_eq!(collapsed.file(), Some("out.js"));
    }

    proptest! {
        #[test]
        fn sorted_output_strictly_increases(
            raw in prop::collection::vec((1u32..4, 0u32..6, any::<bool>()), 0..24)
        ) {
            let segs: Vec<Segment> = raw
                .iter()
                .map(|&(line, col, traced)| {
                    if traced {
                        Segment::traced(line, col, 0, 1, 0)
                    } else {
                        Segment::marker(line, col)
                    }
                })
                .collect();
            let sorted = sort_last_wins(segs);
            prop_assert!(sorted.windows(2).all(|w| w[0].position() < w[1].position()));
            let cleaned = drop_redundant_markers(sorted, Position::new(4, 0));
            prop_assert!(Mapping::from_parts(cleaned, vec![], vec![]).is_ok());
        }
    }
}
