//! Go grammar.

use crate::grammar::{Grammar, Rule};
use crate::pattern::{KeywordPattern, RegexPattern};
use crate::token::TokenKind;

/// Go reserved words.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// The Go grammar.
///
/// Comments, runes and strings are greedy: a comment marker inside a
/// string (or the reverse) never splits the enclosing token.
pub fn go() -> Result<Grammar, regex::Error> {
    Ok(Grammar::from_rules(vec![
        Rule::new(
            TokenKind::Comment,
            RegexPattern::new(r"(?:^|[^\\])(?P<tok>/\*[\s\S]*?(?:\*/|$))")?,
        )
        .greedy(),
        Rule::new(
            TokenKind::Comment,
            RegexPattern::new(r"(?:^|[^\\:])(?P<tok>//.*)")?,
        )
        .greedy(),
        Rule::new(
            TokenKind::Char,
            RegexPattern::new(r"'(?:\\.|[^'\\\r\n]){0,10}'")?,
        )
        .greedy(),
        Rule::new(
            TokenKind::String,
            RegexPattern::new(r#"(?:^|[^\\])(?P<tok>"(?:\\.|[^"\\\r\n])*"|`[^`]*`)"#)?,
        )
        .greedy(),
        Rule::new(TokenKind::Keyword, KeywordPattern::new(KEYWORDS.iter().copied())?),
        Rule::new(
            TokenKind::Boolean,
            RegexPattern::new(r"\b(?:_|false|iota|nil|true)\b")?,
        ),
        Rule::new(TokenKind::Function, RegexPattern::new(r"\b(?P<tok>\w+)\(")?),
        Rule::new(
            TokenKind::Number,
            RegexPattern::new(r"(?i)(?P<tok>\b0(?:b[01_]+|o[0-7_]+)i?)(?:\W|$)")?,
        ),
        Rule::new(
            TokenKind::Number,
            RegexPattern::new(
                r"(?i)(?P<tok>\b0x(?:[a-f\d_]+(?:\.[a-f\d_]*)?|\.[a-f\d_]+)(?:p[+-]?\d+(?:_\d+)*)?i?)(?:\W|$)",
            )?,
        ),
        Rule::new(
            TokenKind::Number,
            RegexPattern::new(
                r"(?i)(?P<tok>(?:\b\d[\d_]*(?:\.[\d_]*)?|\B\.\d[\d_]*)(?:e[+-]?[\d_]+)?i?)(?:\W|$)",
            )?,
        ),
        Rule::new(
            TokenKind::Operator,
            RegexPattern::new(
                r"[*/%^!=]=?|\+[=+]?|-[=-]?|\|[=|]?|&(?:=|&|\^=?)?|>(?:>=?|=)?|<(?:<=?|=|-)?|:=|\.\.\.",
            )?,
        ),
        Rule::new(TokenKind::Punctuation, RegexPattern::new(r"[{}\[\];(),.:]")?),
        Rule::new(
            TokenKind::Builtin,
            RegexPattern::new(
                r"\b(?:append|bool|byte|cap|close|complex(?:64|128)?|copy|delete|error|float(?:32|64)|u?int(?:8|16|32|64)?|imag|len|make|new|panic|print(?:ln)?|real|recover|rune|string|uintptr)\b",
            )?,
        ),
    ]))
}
