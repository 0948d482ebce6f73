//! Source trees: text assembled from fragments, with a source map that
//! follows every character back to where it was written.
//!
//! A tree is built from leaves ([`RawSource`], [`OriginalSource`],
//! [`MappedSource`]) and composite nodes ([`ConcatSource`],
//! [`ReplaceSource`]). Composite nodes describe their output as a generation
//! plan over their children ([`PlanItem`]), which the composer turns into
//! text plus one merged [`Mapping`](seam_map::Mapping). Resolution walks the
//! tree with an explicit stack, so depth is bounded only by memory.

#![warn(missing_docs)]

pub mod compose;
pub mod error;
mod hash;
mod normalize;
pub mod plan;
mod resolve;
mod through;

mod concat;
mod mapped;
mod original;
mod raw;
mod replace;
mod source;

pub use compose::compose;
pub use concat::ConcatSource;
pub use error::SourceError;
pub use mapped::{InnerSource, MappedSource};
pub use original::OriginalSource;
pub use plan::{PlanItem, Resolved};
pub use raw::RawSource;
pub use replace::{Edit, ReplaceSource};
pub use source::{Source, SourceKind, TextAndMap};

pub use seam_config::MapOptions;
