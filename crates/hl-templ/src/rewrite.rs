//! Plain-text reclassification.
//!
//! The templ grammar tokenizes everything outside a tag as Go, so the body
//! of `<p>if you like</p>` comes out with `if` as a keyword. This pass
//! walks the token tree with a stack of open tags and turns every run of
//! body text into one `plain-text` token. Text inside a `{ ... }`
//! expression in a tag body keeps its Go tokens.
//!
//! Malformed input is never an error: a stray closing tag is ignored and a
//! missing one leaves its frame open until the end of the sequence.

use std::sync::Arc;

use log::trace;

use hl_engine::{AfterTokenize, HookEnv, Node, Token, TokenKind};

/// An open tag and the number of `{` not yet closed inside its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTagFrame {
    pub tag_name: String,
    pub opened_braces: usize,
}

impl OpenTagFrame {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            opened_braces: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TagShape {
    Opening(String),
    Closing(String),
    SelfClosing,
}

/// Shape of a `tag` token whose first child is its tag name.
fn tag_shape(token: &Token) -> Option<TagShape> {
    if token.kind != TokenKind::Tag {
        return None;
    }
    let children = token.children()?;
    let name = children.first()?.as_token().filter(|t| t.kind == TokenKind::TagName)?;
    let (opener, tag_name) = match name.children() {
        Some([opener, rest @ ..]) => (opener.raw(), rest.iter().map(Node::raw).collect()),
        _ => ("", String::new()),
    };

    if opener == "</" {
        return Some(TagShape::Closing(tag_name));
    }
    let self_closing = children
        .last()
        .and_then(Node::as_token)
        .and_then(Token::content_text)
        == Some("/>");
    if self_closing {
        Some(TagShape::SelfClosing)
    } else {
        Some(TagShape::Opening(tag_name))
    }
}

/// Apply a structural node to the stack. Returns `false` for tags and for
/// braces that open or close an expression, `true` for everything else.
fn track(node: &Node, stack: &mut Vec<OpenTagFrame>) -> bool {
    let Node::Token(token) = node else {
        return true;
    };
    if let Some(shape) = tag_shape(token) {
        match shape {
            TagShape::Closing(name) => {
                if stack.last().is_some_and(|top| top.tag_name == name) {
                    stack.pop();
                }
            }
            TagShape::SelfClosing => {}
            TagShape::Opening(name) => stack.push(OpenTagFrame::new(name)),
        }
        return false;
    }
    if token.kind == TokenKind::Punctuation {
        match (token.content_text(), stack.last_mut()) {
            (Some("{"), Some(top)) => {
                top.opened_braces += 1;
                return false;
            }
            (Some("}"), Some(top)) if top.opened_braces > 0 => {
                top.opened_braces -= 1;
                return false;
            }
            _ => {}
        }
    }
    true
}

fn in_tag_body(stack: &[OpenTagFrame]) -> bool {
    stack.last().is_some_and(|top| top.opened_braces == 0)
}

/// Append `text` as plain text, merging into a preceding text run.
fn push_plain(out: &mut Vec<Node>, text: &str) {
    let merge = out
        .last()
        .is_some_and(|last| last.is_text() || last.is_token(TokenKind::PlainText));
    let merged = match out.pop() {
        Some(last) if merge => format!("{}{text}", last.raw()),
        Some(last) => {
            out.push(last);
            text.to_string()
        }
        None => text.to_string(),
    };
    out.push(Node::Token(Token::text(TokenKind::PlainText, merged)));
}

/// Reclassify tag-body text in `nodes` as plain text.
///
/// Every nested token sequence is rewritten independently, starting from
/// an empty stack: a tag inside an attribute expression never closes (or
/// is closed by) a tag outside it.
pub fn rewrite(nodes: Vec<Node>) -> Vec<Node> {
    let mut stack: Vec<OpenTagFrame> = Vec::new();
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        if track(&node, &mut stack) && in_tag_body(&stack) {
            push_plain(&mut out, node.raw());
            continue;
        }
        out.push(descend(node));
    }

    if !stack.is_empty() {
        trace!("{} tag(s) left open", stack.len());
    }
    out
}

fn descend(node: Node) -> Node {
    match node {
        Node::Token(Token {
            kind,
            alias,
            content: hl_engine::Content::Tokens(children),
            raw,
        }) => Node::Token(Token {
            kind,
            alias,
            content: hl_engine::Content::Tokens(rewrite(children)),
            raw,
        }),
        other => other,
    }
}

/// After-tokenize hook applying [`rewrite`] to one language's trees.
#[derive(Debug, Clone)]
pub struct TemplPlainTextHook {
    language: String,
}

impl TemplPlainTextHook {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn shared(language: impl Into<String>) -> Arc<dyn AfterTokenize> {
        Arc::new(Self::new(language))
    }
}

impl AfterTokenize for TemplPlainTextHook {
    fn after_tokenize(&self, env: &mut HookEnv<'_>) {
        if env.language != self.language {
            return;
        }
        env.tokens = rewrite(std::mem::take(&mut env.tokens));
    }
}
