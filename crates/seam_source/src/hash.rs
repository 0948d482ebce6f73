//! Structural hashing of source trees.

use seam_common::ContentHasher;

use crate::source::Source;

/// Feeds `root` into `hasher`, pre-order and without resolving anything.
///
/// Each node contributes its kind tag followed by its own constructor
/// arguments; children follow their parent.
pub(crate) fn update_tree<H: ContentHasher>(root: &Source, hasher: &mut H) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        hasher.update_str(node.kind().tag());
        match node {
            Source::Raw(leaf) => leaf.update_hash(hasher),
            Source::Original(leaf) => leaf.update_hash(hasher),
            Source::Mapped(leaf) => leaf.update_hash(hasher),
            Source::Concat(concat) => {
                hasher.update_u64(concat.children().len() as u64);
                stack.extend(concat.children().iter().rev());
            }
            Source::Replace(replace) => {
                replace.update_edits_hash(hasher);
                stack.push(replace.child());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replace::Edit;
    use seam_common::Xxh3Hasher;

    fn digest(source: &Source) -> seam_common::ContentHash {
        let mut hasher = Xxh3Hasher::new();
        update_tree(source, &mut hasher);
        hasher.finalize()
    }

    #[test]
    fn grouping_changes_hash() {
        let flat = Source::concat([
            Source::raw_named("a", "a"),
            Source::raw_named("b", "b"),
            Source::raw_named("c", "c"),
        ]);
        let nested = Source::concat([
            Source::concat([Source::raw_named("a", "a"), Source::raw_named("b", "b")]),
            Source::raw_named("c", "c"),
        ]);
        assert_ne!(digest(&flat), digest(&nested));
    }

    #[test]
    fn kind_is_hashed() {
        assert_ne!(
            digest(&Source::raw_named("x", "x.js")),
            digest(&Source::original("x", "x.js"))
        );
    }

    #[test]
    fn edit_order_does_not_matter() {
        let a = Source::replace(
            Source::raw("abcdef"),
            [Edit::new(0..1, "A"), Edit::new(3..4, "D")],
        )
        .unwrap();
        let b = Source::replace(
            Source::raw("abcdef"),
            [Edit::new(3..4, "D"), Edit::new(0..1, "A")],
        )
        .unwrap();
        assert_eq!(digest(&a), digest(&b));
    }
}
