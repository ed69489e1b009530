//! WASM bindings for the templ highlighter.
//!
//! Exposes `highlight()`, `tokenize()`, `languages()` and `version()` to
//! JavaScript via wasm-bindgen. All calls share one registry, built on
//! first use with the default templ options.

use once_cell::sync::Lazy;
use wasm_bindgen::prelude::*;

use hl_engine::{GrammarRegistry, Node};
use hl_templ::{ComposeOptions, LANGUAGE_ID};

static REGISTRY: Lazy<Result<GrammarRegistry, String>> = Lazy::new(build_registry);

fn build_registry() -> Result<GrammarRegistry, String> {
    let registry = GrammarRegistry::with_base_grammars().map_err(|e| e.to_string())?;
    hl_templ::register(&registry, &ComposeOptions::default()).map_err(|e| e.to_string())?;
    Ok(registry)
}

fn registry() -> Result<&'static GrammarRegistry, String> {
    REGISTRY.as_ref().map_err(Clone::clone)
}

fn highlight_tokens(source: &str) -> Result<Vec<Node>, String> {
    registry()?
        .highlight(LANGUAGE_ID, source)
        .map_err(|e| e.to_string())
}

fn highlight_block(source: &str) -> Result<String, String> {
    let tokens = highlight_tokens(source)?;
    Ok(hl_render::render_code_block(LANGUAGE_ID, &tokens))
}

/// Highlight templ source.
///
/// Returns `<pre class="language-templ"><code ...>...</code></pre>`.
/// Throws a JS error if the grammar could not be built.
#[wasm_bindgen]
pub fn highlight(source: &str) -> Result<String, JsError> {
    highlight_block(source).map_err(|e| JsError::new(&e))
}

/// Tokenize templ source into the token tree as plain JS objects.
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsError> {
    let tokens = highlight_tokens(source).map_err(|e| JsError::new(&e))?;
    serde_wasm_bindgen::to_value(&tokens).map_err(|e| JsError::new(&e.to_string()))
}

/// Ids of the installed grammars.
#[wasm_bindgen]
pub fn languages() -> Result<js_sys::Array, JsError> {
    let ids = registry().map_err(|e| JsError::new(&e))?.languages();
    Ok(ids.into_iter().map(JsValue::from).collect())
}

/// Get the highlighter version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_engine::{stringify, TokenKind};
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Native tests (non-WASM): the shared registry and pipeline
    // =========================================================================

    #[test]
    fn test_registry_builds() {
        let registry = registry().unwrap();
        assert_eq!(registry.languages(), vec!["go", "markup", "templ"]);
    }

    #[test]
    fn test_empty_source() {
        assert!(highlight_tokens("").unwrap().is_empty());
        assert_eq!(
            highlight_block("").unwrap(),
            "<pre class=\"language-templ\"><code class=\"language-templ\"></code></pre>"
        );
    }

    #[test]
    fn test_component() {
        let src = "templ Hello(name string) {\n\t<div class=\"greeting\">Hello, { name }!</div>\n}";
        let tokens = highlight_tokens(src).unwrap();
        assert_eq!(stringify(&tokens), src);
        assert!(tokens.iter().any(|n| n.is_token(TokenKind::PlainText)));

        let html = highlight_block(src).unwrap();
        assert!(html.contains("<span class=\"token keyword\">templ</span>"));
        assert!(html.contains("<span class=\"token plain-text\">Hello, </span>"));
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let first = highlight_tokens("<p>a</p>").unwrap();
        let second = highlight_tokens("<i>b</i>").unwrap();
        assert_eq!(stringify(&first), "<p>a</p>");
        assert_eq!(stringify(&second), "<i>b</i>");
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
