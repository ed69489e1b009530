//! Token tree to HTML
//!
//! Renders highlighted trees as nested `<span class="token ...">` elements,
//! the markup Prism themes style.
//!
//! ```text
//! Vec<Node> → render_html() → spans
//!           → render_code_block() → <pre><code>spans</code></pre>
//!           → render_document() → standalone page with theme
//! ```

pub mod theme;

use hl_engine::{Content, Node, Token};

/// Class list for a token: `token <kind>`, plus its alias if it has one.
pub fn css_classes(token: &Token) -> String {
    match &token.alias {
        Some(alias) => format!("token {} {alias}", token.kind),
        None => format!("token {}", token.kind),
    }
}

/// Render nodes as HTML spans. Bare text is escaped and emitted as is.
pub fn render_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => escape_into(text, out),
        Node::Token(token) => {
            out.push_str("<span class=\"");
            out.push_str(&css_classes(token));
            out.push_str("\">");
            match &token.content {
                Content::Text(text) => escape_into(text, out),
                Content::Tokens(children) => {
                    for child in children {
                        render_node(child, out);
                    }
                }
            }
            out.push_str("</span>");
        }
    }
}

/// Render nodes inside a `<pre><code>` block tagged with `language`.
pub fn render_code_block(language: &str, nodes: &[Node]) -> String {
    let class = format!("language-{}", escape_attr(language));
    format!(
        "<pre class=\"{class}\"><code class=\"{class}\">{}</code></pre>",
        render_html(nodes)
    )
}

/// A complete HTML page showing one code block with the built-in theme.
pub fn render_document(title: &str, language: &str, nodes: &[Node]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape(title)));
    html.push_str(&format!("  <style>\n{}  </style>\n", theme::STYLESHEET));
    html.push_str("</head>\n<body>\n");
    html.push_str(&render_code_block(language, nodes));
    html.push_str("\n</body>\n</html>\n");
    html
}

/// Escape `&`, `<` and `>`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(text: &str) -> String {
    escape(text).replace('"', "&quot;")
}
