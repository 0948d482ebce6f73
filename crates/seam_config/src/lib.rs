//! Resolution options for source trees and their TOML representation.
//!
//! Options control how a source tree's map is rendered: whether column
//! information is kept, and which generated file name the map declares.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod options;

pub use error::ConfigError;
pub use loader::load_options_from_str;
pub use options::MapOptions;
