//! Highlighting engine.
//!
//! Turns source text into a tree of classified tokens using ordered,
//! regex-style rule sets. Grammars are plain values that can be copied and
//! extended to build new languages; a [`GrammarRegistry`] holds the
//! installed ones and runs post-tokenize hooks.
//!
//! # Example
//!
//! ```
//! use hl_engine::{stringify, GrammarRegistry};
//!
//! let registry = GrammarRegistry::with_base_grammars().unwrap();
//! let tokens = registry.highlight("go", "x := 1").unwrap();
//! assert_eq!(stringify(&tokens), "x := 1");
//! ```

pub mod grammar;
pub mod languages;
pub mod pattern;
pub mod registry;
pub mod token;
pub mod tokenizer;

pub use grammar::{Grammar, Inside, Rule};
pub use pattern::{EitherPattern, KeywordPattern, Pattern, RegexPattern};
pub use registry::{AfterTokenize, GrammarRegistry, HookEnv};
pub use token::{stringify, Content, Node, Token, TokenKind};
pub use tokenizer::tokenize;

/// Engine error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("No grammar registered for language '{0}'")]
    UnknownLanguage(String),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}
