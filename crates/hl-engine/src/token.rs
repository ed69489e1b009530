use serde::Serialize;

/// Token classification.
///
/// The templ grammar produces the first block of kinds; the base `markup`
/// and `go` grammars contribute the rest. `as_str` gives the stable,
/// kebab-case name a renderer turns into a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    // Markup structure
    Tag,
    TagName,
    AttrName,
    AttrValue,
    Spread,
    Script,
    ScriptPunctuation,
    Punctuation,
    PlainText,
    ClassName,
    Namespace,
    Comment,

    // Markup extras
    Prolog,
    Doctype,
    Cdata,
    Entity,

    // Procedural language
    Char,
    String,
    Keyword,
    Boolean,
    Function,
    Number,
    Operator,
    Builtin,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Tag => "tag",
            TokenKind::TagName => "tag-name",
            TokenKind::AttrName => "attr-name",
            TokenKind::AttrValue => "attr-value",
            TokenKind::Spread => "spread",
            TokenKind::Script => "script",
            TokenKind::ScriptPunctuation => "script-punctuation",
            TokenKind::Punctuation => "punctuation",
            TokenKind::PlainText => "plain-text",
            TokenKind::ClassName => "class-name",
            TokenKind::Namespace => "namespace",
            TokenKind::Comment => "comment",
            TokenKind::Prolog => "prolog",
            TokenKind::Doctype => "doctype",
            TokenKind::Cdata => "cdata",
            TokenKind::Entity => "entity",
            TokenKind::Char => "char",
            TokenKind::String => "string",
            TokenKind::Keyword => "keyword",
            TokenKind::Boolean => "boolean",
            TokenKind::Function => "function",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Builtin => "builtin",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a token covers: either the matched text itself, or the token
/// sequence an `inside` grammar produced from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Tokens(Vec<Node>),
}

/// A classified span of source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub content: Content,
    /// Exact source text covered, nested content flattened.
    #[serde(skip)]
    pub raw: String,
}

impl Token {
    pub fn new(kind: TokenKind, content: Content, raw: impl Into<String>) -> Self {
        Self {
            kind,
            alias: None,
            content,
            raw: raw.into(),
        }
    }

    /// A token whose content is its raw text.
    pub fn text(kind: TokenKind, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::new(kind, Content::Text(raw.clone()), raw)
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    /// Child nodes, if this token was tokenized by an inside grammar.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.content {
            Content::Tokens(nodes) => Some(nodes),
            Content::Text(_) => None,
        }
    }

    /// Text content, if this token is a leaf.
    pub fn content_text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Tokens(_) => None,
        }
    }
}

/// One entry of a token sequence: unmatched text or a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Token(Token),
}

impl Node {
    /// The source text this node covers.
    pub fn raw(&self) -> &str {
        match self {
            Node::Text(text) => text,
            Node::Token(token) => &token.raw,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Token(token) => Some(token),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// True for a token of `kind`; always false for bare text.
    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.as_token().is_some_and(|t| t.kind == kind)
    }
}

/// Flatten a token sequence back to the text it was produced from.
pub fn stringify(nodes: &[Node]) -> String {
    nodes.iter().map(Node::raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_names_are_kebab_case() {
        assert_eq!(TokenKind::PlainText.as_str(), "plain-text");
        assert_eq!(TokenKind::ScriptPunctuation.to_string(), "script-punctuation");
        assert_eq!(TokenKind::Tag.as_str(), "tag");
    }

    #[test]
    fn test_stringify_flattens_nested_tokens() {
        let inner = Token::new(
            TokenKind::TagName,
            Content::Tokens(vec![
                Node::Token(Token::text(TokenKind::Punctuation, "<")),
                Node::Text("div".into()),
            ]),
            "<div",
        );
        let nodes = vec![
            Node::Text("a".into()),
            Node::Token(inner),
            Node::Token(Token::text(TokenKind::Punctuation, ">")),
        ];
        assert_eq!(stringify(&nodes), "a<div>");
    }

    #[test]
    fn test_node_helpers() {
        let node = Node::Token(Token::text(TokenKind::Keyword, "if"));
        assert!(node.is_token(TokenKind::Keyword));
        assert!(!node.is_token(TokenKind::String));
        assert!(!node.is_text());
        assert!(Node::Text("x".into()).is_text());
        assert_eq!(node.as_token().and_then(Token::content_text), Some("if"));
    }

    #[test]
    fn test_serializes_kind_as_kebab_case() {
        let json = serde_json::to_string(&Token::text(TokenKind::AttrName, "class")).unwrap();
        assert_eq!(json, r#"{"kind":"attr-name","content":"class"}"#);
    }

    #[test]
    fn test_serializes_nested_content_as_array() {
        let token = Token::new(
            TokenKind::Spread,
            Content::Tokens(vec![
                Node::Token(Token::text(TokenKind::Punctuation, "{")),
                Node::Text("x".into()),
            ]),
            "{x",
        )
        .with_alias(Some("rest".into()));
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"spread","alias":"rest","content":[{"kind":"punctuation","content":"{"},"x"]}"#
        );
    }
}
