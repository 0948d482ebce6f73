//! The mapping composer.
//!
//! Given the resolved children of a node and its generation plan, builds the
//! node's text and, when requested, a single map expressed in the coordinate
//! space of that text. Child segments are re-based onto the output, child
//! tables are merged, and the result is sorted with last-write-wins on ties.

use seam_map::{
    MapError, Mapping, NameTable, OriginalLocation, Position, Segment, SourceTable, TextIndex,
};
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::normalize::{drop_redundant_markers, sort_last_wins};
use crate::plan::{PlanItem, Resolved};

/// How one child's table indices translate into the merged tables.
struct ChildTables {
    sources: Vec<u32>,
    names: Vec<u32>,
    /// Merged source index of a map-less child with a declared identity.
    pass_through: Option<u32>,
}

impl ChildTables {
    fn register(
        child: &Resolved,
        sources: &mut SourceTable,
        names: &mut NameTable,
    ) -> Result<Self, MapError> {
        match &child.map {
            Some(map) => Ok(Self {
                sources: map
                    .sources()
                    .iter()
                    .map(|entry| sources.register_entry(entry))
                    .collect::<Result<_, _>>()?,
                names: map.names().iter().map(|n| names.register(n)).collect(),
                pass_through: None,
            }),
            None => Ok(Self {
                sources: Vec::new(),
                names: Vec::new(),
                pass_through: child
                    .identity
                    .as_deref()
                    .map(|id| sources.register(Some(id), Some(&child.text)))
                    .transpose()?,
            }),
        }
    }

    /// Rewrites a child location into merged indices; `None` if the child's
    /// source index dangles.
    fn remap(&self, original: OriginalLocation) -> Option<OriginalLocation> {
        let source = *self.sources.get(original.source as usize)?;
        let name = original
            .name
            .and_then(|n| self.names.get(n as usize).copied());
        Some(OriginalLocation {
            source,
            name,
            ..original
        })
    }
}

/// Per-child state built on the child's first appearance in the plan.
struct ChildState {
    index: TextIndex,
    tables: Option<ChildTables>,
}

/// Moves a child position into the output, given that child position `from`
/// lands at output position `start`.
fn shift(pos: Position, from: Position, start: Position) -> Position {
    if pos.line == from.line {
        Position::new(start.line, start.column + (pos.column - from.column))
    } else {
        Position::new(start.line + (pos.line - from.line), pos.column)
    }
}

fn at(pos: Position, original: Option<OriginalLocation>) -> Segment {
    Segment {
        generated_line: pos.line,
        generated_column: pos.column,
        original,
    }
}

/// Emits the segments of a child map that fall inside the copied child
/// range `from..to`, re-based so that `from` lands on `start`.
fn rebase_copy(
    map: &Mapping,
    tables: &ChildTables,
    from: Position,
    to: Position,
    start: Position,
    out: &mut Vec<Segment>,
) {
    // The segment covering the copy start; one that began earlier is split.
    let head = map
        .last_segment_before(from.line, from.column)
        .and_then(|seg| {
            let original = tables.remap(seg.original?)?;
            if seg.generated_column == from.column {
                Some(original)
            } else {
                Some(OriginalLocation {
                    column: original.column + (from.column - seg.generated_column),
                    name: None,
                    ..original
                })
            }
        });
    out.push(at(start, head));

    let first = map.first_index_at(from);
    let last = map.first_index_at(to);
    for seg in &map.segments()[first..last] {
        if seg.position() == from {
            continue;
        }
        let pos = shift(seg.position(), from, start);
        out.push(at(pos, seg.original.and_then(|o| tables.remap(o))));
    }
}

/// Synthesizes identity segments for a map-less child with a declared
/// identity: one per line of the copied range.
fn pass_through(
    source: u32,
    from: Position,
    to: Position,
    start: Position,
    out: &mut Vec<Segment>,
) {
    out.push(Segment::traced(
        start.line,
        start.column,
        source,
        from.line,
        from.column,
    ));
    for line in from.line + 1..=to.line {
        let line_start = Position::new(line, 0);
        if line_start >= to {
            break;
        }
        let pos = shift(line_start, from, start);
        out.push(Segment::traced(pos.line, pos.column, source, line, 0));
    }
}

/// Runs a generation plan over resolved children.
///
/// With `with_map == false` only the text is assembled. The returned map is
/// `None` when no copied child carried a map or a declared identity.
pub fn compose(
    children: &[Resolved],
    plan: &[PlanItem],
    with_map: bool,
) -> Result<Resolved, SourceError> {
    let mut text = String::new();
    let mut out_index = TextIndex::empty();
    let mut states: Vec<Option<ChildState>> = children.iter().map(|_| None).collect();
    let mut sources = SourceTable::new();
    let mut names = NameTable::new();
    let mut segments: Vec<Segment> = Vec::new();
    let mut tracked = false;

    for (item_idx, item) in plan.iter().enumerate() {
        let start = out_index.end_position();
        match item {
            PlanItem::Insert {
                text: literal,
                marker,
            } => {
                if with_map && *marker && !literal.is_empty() {
                    segments.push(Segment::marker(start.line, start.column));
                }
                text.push_str(literal);
                out_index.push_str(literal);
            }
            PlanItem::Copy { child, range } => {
                let resolved = children.get(*child).ok_or(MapError::OutOfRange {
                    what: "child",
                    value: *child,
                    limit: children.len().saturating_sub(1),
                })?;
                let state = match states[*child].take() {
                    Some(state) => state,
                    None => {
                        let tables = if with_map {
                            tracked |= resolved.map.is_some() || resolved.identity.is_some();
                            Some(ChildTables::register(resolved, &mut sources, &mut names)?)
                        } else {
                            None
                        };
                        ChildState {
                            index: TextIndex::new(&resolved.text),
                            tables,
                        }
                    }
                };

                let span = state.index.slice(&resolved.text, range.clone())?;
                if let Some(tables) = state.tables.as_ref().filter(|_| !range.is_empty()) {
                    let from = state.index.line_column_of(range.start)?;
                    let to = state.index.line_column_of(range.end)?;
                    match (&resolved.map, tables.pass_through) {
                        (Some(map), _) => rebase_copy(map, tables, from, to, start, &mut segments),
                        (None, Some(source)) => {
                            pass_through(source, from, to, start, &mut segments)
                        }
                        (None, None) => segments.push(Segment::marker(start.line, start.column)),
                    }
                }
                text.push_str(span);
                out_index.push_str(span);
                if with_map && !range.is_empty() {
                    // Nothing from this copy may extend past its end.
                    let end = out_index.end_position();
                    segments.push(Segment::marker(end.line, end.column));
                }
                trace!(item = item_idx, child, ?range, "copied child range");
                states[*child] = Some(state);
            }
        }
    }

    let map = if with_map && tracked {
        let segments = drop_redundant_markers(sort_last_wins(segments), out_index.end_position());
        debug!(
            items = plan.len(),
            segments = segments.len(),
            sources = sources.len(),
            names = names.len(),
            "composed generation plan"
        );
        Some(Mapping::from_parts(
            segments,
            sources.into_entries(),
            names.into_names(),
        )?)
    } else {
        None
    };

    Ok(Resolved {
        text,
        map,
        identity: None,
    })
}
