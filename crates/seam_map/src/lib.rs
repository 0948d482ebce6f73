//! Source map data model, Base64 VLQ codec, and text position indexing.
//!
//! This crate provides the decoded [`Mapping`] with its [`Segment`]s and
//! source/name tables, the [`codec`] that converts segments to and from the
//! compact `mappings` string, the serde [`RawSourceMap`] wire format, and the
//! [`TextIndex`] used to translate UTF-16 offsets into line/column
//! coordinates.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod mapping;
pub mod segment;
pub mod table;
pub mod text_index;
pub mod vlq;
pub mod wire;

pub use codec::{decode, encode};
pub use error::MapError;
pub use mapping::{Mapping, SourceEntry};
pub use segment::{OriginalLocation, Position, Segment};
pub use table::{NameTable, SourceTable};
pub use text_index::{utf16_len, TextIndex};
pub use wire::RawSourceMap;
