//! Content hashing for cache keys over source trees.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

/// A 128-bit content hash computed using XXH3.
///
/// Two source trees with the same `ContentHash` are assumed to be built from
/// identical constructor arguments. Used as the cache key by memoizing layers
/// that wrap source nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// A streaming digest accumulator that source trees feed their structure into.
///
/// Any digest with an "update with bytes" and a "finalize" step can implement
/// this; the source layer never depends on a concrete hash function.
pub trait ContentHasher {
    /// The value produced when the hasher is finalized.
    type Digest;

    /// Feeds `bytes` into the running digest.
    fn update(&mut self, bytes: &[u8]);

    /// Consumes the hasher and returns the digest.
    fn finalize(self) -> Self::Digest;

    /// Feeds a length-prefixed string so adjacent fields cannot run together.
    fn update_str(&mut self, s: &str) {
        self.update_u64(s.len() as u64);
        self.update(s.as_bytes());
    }

    /// Feeds an integer as little-endian bytes.
    fn update_u64(&mut self, value: u64) {
        self.update(&value.to_le_bytes());
    }

    /// Feeds an optional string behind a presence byte.
    fn update_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.update(&[1]);
                self.update_str(s);
            }
            None => self.update(&[0]),
        }
    }
}

/// Streaming XXH3-128 hasher producing a [`ContentHash`].
#[derive(Default, Clone)]
pub struct Xxh3Hasher {
    state: Xxh3,
}

impl Xxh3Hasher {
    /// Creates a hasher with the default seed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentHasher for Xxh3Hasher {
    type Digest = ContentHash;

    fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    fn finalize(self) -> ContentHash {
        ContentHash(self.state.digest128().to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(chunks: &[&[u8]]) -> ContentHash {
        let mut hasher = Xxh3Hasher::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        hasher.finalize()
    }

    #[test]
    fn chunking_does_not_matter() {
        assert_eq!(digest(&[b"hello ", b"world"]), digest(&[b"hello world"]));
        assert_ne!(digest(&[b"hello"]), digest(&[b"world"]));
    }

    #[test]
    fn digest_is_xxh3_128() {
        let expected = xxhash_rust::xxh3::xxh3_128(b"source tree").to_le_bytes();
        assert_eq!(digest(&[b"source", b" tree"]).as_bytes(), &expected);
    }

    #[test]
    fn display_is_full_hex() {
        let s = digest(&[b"test"]).to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let s = format!("{:?}", digest(&[b"test"]));
        assert!(s.starts_with("ContentHash("));
        assert_eq!(s.len(), "ContentHash(abcd..)".len());
    }

    #[test]
    fn serde_roundtrip() {
        let h = digest(&[b"serde test"]);
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn length_prefix_separates_fields() {
        let mut a = Xxh3Hasher::new();
        a.update_str("ab");
        a.update_str("c");
        let mut b = Xxh3Hasher::new();
        b.update_str("a");
        b.update_str("bc");
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn absent_differs_from_empty() {
        let mut a = Xxh3Hasher::new();
        a.update_opt_str(None);
        let mut b = Xxh3Hasher::new();
        b.update_opt_str(Some(""));
        assert_ne!(a.finalize(), b.finalize());
    }
}
