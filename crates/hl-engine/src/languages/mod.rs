//! Base grammars shipped with the engine.
//!
//! Language grammars built on top of these (see `hl-templ`) start from a
//! copy obtained through the registry, never from the statics here
//! directly, so every consumer sees the same base.

pub mod go;
pub mod markup;

/// Registry id of the markup grammar.
pub const MARKUP: &str = "markup";

/// Registry id of the Go grammar.
pub const GO: &str = "go";

pub use go::go;
pub use markup::markup;
