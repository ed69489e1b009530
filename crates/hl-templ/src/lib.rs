//! templ language support
//!
//! Builds the `templ` grammar by combining the engine's markup grammar with
//! its Go grammar, and installs an after-tokenize pass that turns the text
//! between tags into plain text.
//!
//! ```
//! use hl_engine::{stringify, GrammarRegistry};
//! use hl_templ::{register, ComposeOptions};
//!
//! let registry = GrammarRegistry::with_base_grammars().unwrap();
//! register(&registry, &ComposeOptions::default()).unwrap();
//! let tokens = registry.highlight("templ", "<p>{ name }</p>").unwrap();
//! assert_eq!(stringify(&tokens), "<p>{ name }</p>");
//! ```

pub mod compose;
pub mod patterns;
pub mod rewrite;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use hl_engine::{Grammar, GrammarRegistry};

pub use compose::{compose, compose_templ_grammar, extend_keywords};
pub use patterns::DEFAULT_BRACE_DEPTH;
pub use rewrite::{rewrite, OpenTagFrame, TemplPlainTextHook};

/// Language id the grammar is registered under by default.
pub const LANGUAGE_ID: &str = "templ";

/// Grammar composition error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    #[error("Missing base grammar '{name}'")]
    MissingDependency { name: String },
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Settings for building the templ grammar.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Id the composed grammar and its hook are registered under.
    pub language_id: String,
    pub markup_base: String,
    pub procedural_base: String,
    /// Words added to the procedural grammar's keyword rule.
    pub block_keywords: Vec<String>,
    /// How deeply `{ ... }` groups may nest inside a tag.
    pub max_brace_depth: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            language_id: LANGUAGE_ID.to_string(),
            markup_base: hl_engine::languages::MARKUP.to_string(),
            procedural_base: hl_engine::languages::GO.to_string(),
            block_keywords: ["templ", "css", "script"].map(String::from).to_vec(),
            max_brace_depth: DEFAULT_BRACE_DEPTH,
        }
    }
}

/// Compose the templ grammar and install it in `registry`.
///
/// The grammar replaces any earlier one under the same id. The plain-text
/// hook is added only the first time the id is registered.
pub fn register(
    registry: &GrammarRegistry,
    options: &ComposeOptions,
) -> Result<Arc<Grammar>, ComposeError> {
    let grammar = compose(registry, options)?;
    Ok(registry.register_with_hook(
        &options.language_id,
        grammar,
        TemplPlainTextHook::shared(options.language_id.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_engine::{stringify, Node, TokenKind};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn registry() -> GrammarRegistry {
        let registry = GrammarRegistry::with_base_grammars().unwrap();
        register(&registry, &ComposeOptions::default()).unwrap();
        registry
    }

    fn plain_texts(nodes: &[Node]) -> Vec<&str> {
        nodes
            .iter()
            .filter(|n| n.is_token(TokenKind::PlainText))
            .map(Node::raw)
            .collect()
    }

    #[test]
    fn test_default_options() {
        let options = ComposeOptions::default();
        assert_eq!(options.language_id, "templ");
        assert_eq!(options.markup_base, "markup");
        assert_eq!(options.procedural_base, "go");
        assert_eq!(options.block_keywords, vec!["templ", "css", "script"]);
        assert_eq!(options.max_brace_depth, 2);
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: ComposeOptions =
            serde_json::from_str(r#"{"language_id": "gotempl", "max_brace_depth": 3}"#).unwrap();
        assert_eq!(
            options,
            ComposeOptions {
                language_id: "gotempl".into(),
                max_brace_depth: 3,
                ..ComposeOptions::default()
            }
        );
    }

    #[test]
    fn test_register_highlights_through_registry() {
        let registry = registry();
        assert!(registry.contains("templ"));
        let tokens = registry.highlight("templ", "<p>if you can</p>").unwrap();
        assert_eq!(plain_texts(&tokens), vec!["if you can"]);
    }

    #[test]
    fn test_hook_leaves_other_languages_alone() {
        let registry = registry();
        let tokens = registry.highlight("go", "if x { return }").unwrap();
        assert!(plain_texts(&tokens).is_empty());
        assert!(tokens[0].is_token(TokenKind::Keyword));
    }

    #[test]
    fn test_register_twice_replaces_grammar_and_keeps_one_hook() {
        let registry = registry();
        let again = register(&registry, &ComposeOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&again, &registry.get("templ").unwrap()));
        assert_eq!(registry.hook_count(), 1);

        let tokens = registry.highlight("templ", "<p>a<b>b</b>c</p>").unwrap();
        assert_eq!(plain_texts(&tokens), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_register_adds_one_hook() {
        let registry = Arc::new(GrammarRegistry::with_base_grammars().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    register(&registry, &ComposeOptions::default()).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.hook_count(), 1);
        let tokens = registry.highlight("templ", "<p>if</p>").unwrap();
        assert_eq!(plain_texts(&tokens), vec!["if"]);
    }

    #[test]
    fn test_register_missing_base() {
        let registry = GrammarRegistry::new();
        let err = register(&registry, &ComposeOptions::default()).unwrap_err();
        assert_eq!(err, ComposeError::MissingDependency { name: "markup".into() });
        assert!(!registry.contains("templ"));
        assert_eq!(err.to_string(), "Missing base grammar 'markup'");
    }

    #[test]
    fn test_register_under_custom_id() {
        let registry = GrammarRegistry::with_base_grammars().unwrap();
        let options = ComposeOptions {
            language_id: "gotempl".into(),
            ..ComposeOptions::default()
        };
        register(&registry, &options).unwrap();
        let tokens = registry.highlight("gotempl", "<i>for</i>").unwrap();
        assert_eq!(plain_texts(&tokens), vec!["for"]);
        assert!(!registry.contains("templ"));
    }

    proptest! {
        #[test]
        fn prop_highlight_round_trip(src in r#"[<>/a-z{}().="' \n]{0,80}"#) {
            let registry = registry();
            let tokens = registry.highlight("templ", &src).unwrap();
            prop_assert_eq!(stringify(&tokens), src);
        }

        #[test]
        fn prop_rewrite_idempotent(src in r#"[<>/a-z{}().="' \n]{0,80}"#) {
            let registry = registry();
            let once = registry.highlight("templ", &src).unwrap();
            let twice = rewrite(once.clone());
            prop_assert_eq!(&twice, &once);
            let adjacent_plain = twice.windows(2).any(|w| {
                w[0].is_token(TokenKind::PlainText) && w[1].is_token(TokenKind::PlainText)
            });
            prop_assert!(!adjacent_plain);
        }
    }
}
