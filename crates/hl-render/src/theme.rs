//! Built-in stylesheet for standalone pages.
//!
//! Light theme keyed on the token classes the templ grammar produces.

pub const STYLESHEET: &str = r#"    pre[class*="language-"] { background: #f6f8fa; padding: 1em; overflow: auto; }
    code[class*="language-"] { font-family: ui-monospace, Menlo, monospace; color: #24292e; }
    .token.comment, .token.prolog, .token.doctype, .token.cdata { color: #6a737d; font-style: italic; }
    .token.tag, .token.tag-name, .token.namespace { color: #22863a; }
    .token.class-name { color: #6f42c1; }
    .token.attr-name { color: #6f42c1; }
    .token.attr-value, .token.string, .token.char { color: #032f62; }
    .token.spread, .token.script { color: #24292e; }
    .token.keyword, .token.boolean { color: #d73a49; }
    .token.function { color: #6f42c1; }
    .token.number, .token.builtin { color: #005cc5; }
    .token.operator, .token.entity { color: #d73a49; }
    .token.punctuation, .token.script-punctuation { color: #586069; }
    .token.plain-text { color: #24292e; }
"#;
