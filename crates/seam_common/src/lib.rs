//! Shared foundational types used across the seam workspace.
//!
//! This crate provides the content hash value and the streaming hasher
//! capability that source trees feed when computing cache keys.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, ContentHasher, Xxh3Hasher};
