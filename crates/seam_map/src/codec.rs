//! Conversion between the compact `mappings` string and decoded segments.
//!
//! Lines are separated by `;`, segments within a line by `,`. Each segment is
//! 1, 4, or 5 VLQ deltas: generated column (relative to the previous segment
//! on the same line), then source index, original line and original column
//! (relative to the previous segment that had a source), then name index
//! (relative to the previous segment that had a name). Original lines are
//! 0-indexed on the wire and 1-indexed in [`Segment`].

use crate::error::MapError;
use crate::segment::{OriginalLocation, Segment};
use crate::vlq::{decode_segment, encode_vlq};

/// Running absolute values shared by the decoder and the encoder.
#[derive(Default)]
struct DeltaState {
    generated_column: i64,
    source: i64,
    original_line: i64,
    original_column: i64,
    name: i64,
}

/// Converts a running absolute value into a `u32`, rejecting negatives.
fn absolute(value: i64, field: &str) -> Result<u32, MapError> {
    u32::try_from(value)
        .map_err(|_| MapError::malformed(format!("{field} {value} is out of range")))
}

/// Decodes a `mappings` string into absolute segments.
///
/// Segments come out ordered by generated position. Within a line the
/// generated column must strictly increase.
pub fn decode(mappings: &str) -> Result<Vec<Segment>, MapError> {
    let mut segments = Vec::new();
    let mut state = DeltaState::default();
    let mut values = Vec::with_capacity(5);

    for (line_idx, line) in mappings.split(';').enumerate() {
        let generated_line = absolute(line_idx as i64 + 1, "generated line")?;
        state.generated_column = 0;
        let mut previous_column: Option<i64> = None;

        for raw in line.split(',') {
            if raw.is_empty() {
                continue;
            }
            decode_segment(raw, &mut values)?;
            if !matches!(values.len(), 1 | 4 | 5) {
                return Err(MapError::malformed(format!(
                    "segment '{raw}' has {} fields, expected 1, 4 or 5",
                    values.len()
                )));
            }

            state.generated_column += values[0];
            if previous_column.is_some_and(|prev| state.generated_column <= prev) {
                return Err(MapError::malformed(format!(
                    "generated column {} on line {generated_line} does not increase",
                    state.generated_column
                )));
            }
            previous_column = Some(state.generated_column);
            let generated_column = absolute(state.generated_column, "generated column")?;

            let original = if values.len() >= 4 {
                state.source += values[1];
                state.original_line += values[2];
                state.original_column += values[3];
                let name = if values.len() == 5 {
                    state.name += values[4];
                    Some(absolute(state.name, "name index")?)
                } else {
                    None
                };
                Some(OriginalLocation {
                    source: absolute(state.source, "source index")?,
                    line: absolute(state.original_line + 1, "original line")?,
                    column: absolute(state.original_column, "original column")?,
                    name,
                })
            } else {
                None
            };

            segments.push(Segment {
                generated_line,
                generated_column,
                original,
            });
        }
    }

    Ok(segments)
}

/// Encodes ordered segments into a `mappings` string.
///
/// The caller guarantees ordering; the composer always produces sorted,
/// de-duplicated segments.
pub fn encode(segments: &[Segment]) -> String {
    let mut out = String::with_capacity(segments.len() * 6);
    let mut state = DeltaState::default();
    let mut current_line = 1u32;
    let mut first_on_line = true;

    for seg in segments {
        while current_line < seg.generated_line {
            out.push(';');
            current_line += 1;
            state.generated_column = 0;
            first_on_line = true;
        }
        if !first_on_line {
            out.push(',');
        }
        first_on_line = false;

        let column = i64::from(seg.generated_column);
        encode_vlq(column - state.generated_column, &mut out);
        state.generated_column = column;

        if let Some(original) = seg.original {
            let source = i64::from(original.source);
            let line = i64::from(original.line) - 1;
            let col = i64::from(original.column);
            encode_vlq(source - state.source, &mut out);
            encode_vlq(line - state.original_line, &mut out);
            encode_vlq(col - state.original_column, &mut out);
            state.source = source;
            state.original_line = line;
            state.original_column = col;

            if let Some(name) = original.name {
                let name = i64::from(name);
                encode_vlq(name - state.name, &mut out);
                state.name = name;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decode_simple() {
        let segs = decode("AAAA").unwrap();
        assert_eq!(segs, vec![Segment::traced(1, 0, 0, 1, 0)]);
    }

    #[test]
    fn decode_multi_line_with_markers_and_names() {
        let segs = decode("YCAAA,K,CAAMC;AACN").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::traced(1, 12, 1, 1, 0).with_name(0),
                Segment::marker(1, 17),
                Segment::traced(1, 18, 1, 1, 6).with_name(1),
                Segment::traced(2, 0, 1, 2, 0),
            ]
        );
    }

    #[test]
    fn empty_lines_advance_generated_line() {
        let segs = decode("AAAA;;ACAA").unwrap();
        assert_eq!(segs[1].generated_line, 3);
        assert_eq!(segs[1].original.map(|o| o.source), Some(1));
    }

    #[test]
    fn empty_segments_skipped() {
        assert_eq!(decode("AAAA,,C").unwrap().len(), 2);
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn wrong_field_count_rejected() {
        assert!(decode("AA").is_err());
        assert!(decode("AAA").is_err());
        assert!(decode("AAAAAA").is_err());
    }

    #[test]
    fn non_increasing_column_rejected() {
        assert!(decode("C,D").is_err());
        assert!(decode("C,A").is_err());
    }

    #[test]
    fn negative_absolute_rejected() {
        assert!(decode("D").is_err());
        assert!(decode("ADAA").is_err());
    }

    #[test]
    fn encode_resets_column_per_line() {
        let segs = vec![
            Segment::traced(1, 4, 0, 1, 0),
            Segment::traced(3, 2, 0, 2, 1),
        ];
        assert_eq!(encode(&segs), "IAAA;;EACC");
    }

    #[test]
    fn encode_known_composed_mappings() {
        let segs = vec![
            Segment::traced(1, 12, 1, 1, 0).with_name(0),
            Segment::marker(1, 17),
            Segment::traced(1, 18, 1, 1, 6).with_name(1),
            Segment::traced(2, 0, 1, 2, 0),
            Segment::marker(2, 7),
            Segment::traced(2, 13, 1, 2, 10),
            Segment::traced(3, 0, 0, 3, 11),
            Segment::marker(3, 7),
            Segment::traced(3, 8, 0, 3, 17),
        ];
        assert_eq!(encode(&segs), "YCAAA,K,CAAMC;AACN,O,MAAU;ADCC,O,CAAM");
    }

    fn arb_segments() -> impl Strategy<Value = Vec<Segment>> {
        let original = prop::option::of((0u32..6, 1u32..50, 0u32..80, prop::option::of(0u32..6)));
        prop::collection::vec((1u32..4, 0u32..40, original), 0..40).prop_map(|raw| {
            let mut segs: Vec<Segment> = raw
                .into_iter()
                .map(|(dl, col, original)| Segment {
                    generated_line: dl,
                    generated_column: col,
                    original: original.map(|(source, line, column, name)| OriginalLocation {
                        source,
                        line,
                        column,
                        name,
                    }),
                })
                .collect();
            segs.sort_by_key(Segment::position);
            segs.dedup_by_key(|s| s.position());
            segs
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(segs in arb_segments()) {
            let encoded = encode(&segs);
            prop_assert_eq!(decode(&encoded).unwrap(), segs);
        }
    }
}
