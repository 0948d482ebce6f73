//! Iterative resolution of a source tree into text and map.

use crate::compose::compose;
use crate::concat::ConcatSource;
use crate::error::SourceError;
use crate::plan::Resolved;
use crate::replace::ReplaceSource;
use crate::source::Source;

enum Step<'s> {
    /// Resolve a node, scheduling its children first if it has any.
    Enter(&'s Source),
    /// Compose the last `children().len()` results.
    Concat(&'s ConcatSource),
    /// Compose the last result through the edits.
    Replace(&'s ReplaceSource),
}

/// Resolves `root` bottom-up over an explicit stack.
///
/// With `with_map == false` only text is assembled.
pub(crate) fn resolve(root: &Source, with_map: bool) -> Result<Resolved, SourceError> {
    let mut stack = vec![Step::Enter(root)];
    let mut done: Vec<Resolved> = Vec::new();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(Source::Raw(raw)) => done.push(raw.resolve()),
            Step::Enter(Source::Original(leaf)) => done.push(leaf.resolve(with_map)?),
            Step::Enter(Source::Mapped(leaf)) => done.push(leaf.resolve(with_map)?),
            Step::Enter(Source::Concat(node)) => {
                stack.push(Step::Concat(node));
                stack.extend(node.children().iter().rev().map(Step::Enter));
            }
            Step::Enter(Source::Replace(node)) => {
                stack.push(Step::Replace(node));
                stack.push(Step::Enter(node.child()));
            }
            Step::Concat(node) => {
                let children = done.split_off(done.len() - node.children().len());
                let plan = ConcatSource::plan(&children);
                done.push(compose(&children, &plan, with_map)?);
            }
            Step::Replace(node) => {
                let children = done.split_off(done.len() - 1);
                let plan = node.plan(&children[0])?;
                done.push(compose(&children, &plan, with_map)?);
            }
        }
    }

    Ok(done.pop().unwrap_or_else(|| Resolved::untracked("")))
}
