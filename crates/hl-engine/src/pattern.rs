//! Matchers a grammar rule can use.
//!
//! A pattern reports where its *token* lies, which is not always the whole
//! match: a regex may consume context on either side of the token (the
//! `tok` capture group) so rules can express look-behind and look-ahead
//! without engine support for them.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use regex::Regex;

/// Name of the capture group that marks the token inside a wider match.
pub const TOKEN_GROUP: &str = "tok";

/// A matcher used by a grammar rule.
pub trait Pattern: fmt::Debug + Send + Sync {
    /// Find the first token whose match starts at or after byte `start`.
    ///
    /// Text before `start` may be inspected as context (word boundaries,
    /// anchors) but never becomes part of the result.
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>>;

    fn find(&self, text: &str) -> Option<Range<usize>> {
        self.find_at(text, 0)
    }

    /// The words matched, for patterns that are a plain word list.
    fn word_list(&self) -> Option<&[String]> {
        None
    }
}

/// Regex-backed pattern.
///
/// If the expression has a capture group named `tok`, only that group is
/// the token; the rest of the match is context that stays in the
/// surrounding text.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
    has_token_group: bool,
}

impl RegexPattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(source)?))
    }

    pub fn from_regex(regex: Regex) -> Self {
        let has_token_group = regex.capture_names().flatten().any(|n| n == TOKEN_GROUP);
        Self {
            regex,
            has_token_group,
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Pattern for RegexPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        if !self.has_token_group {
            return self.regex.find_at(text, start).map(|m| m.range());
        }
        // A match whose token group did not participate is skipped.
        let mut from = start;
        while from <= text.len() {
            let caps = self.regex.captures_at(text, from)?;
            let whole = caps.get(0)?;
            if let Some(tok) = caps.name(TOKEN_GROUP) {
                return Some(tok.range());
            }
            from = next_boundary(text, whole.start());
        }
        None
    }
}

/// Whole-word alternation over a fixed set of words.
///
/// The word list is kept so grammars can be widened with more keywords
/// later; the list is sorted and deduplicated, so two patterns over the
/// same words compare equal regardless of input order.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    words: Vec<String>,
    regex: Regex,
}

impl KeywordPattern {
    pub fn new<I, S>(words: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
        words.sort();
        words.dedup();
        // Longest first so a word is never shadowed by one of its prefixes.
        let mut ordered: Vec<&str> = words.iter().map(String::as_str).collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = ordered
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"\b(?:{alternation})\b"))?;
        Ok(Self { words, regex })
    }

}

impl Pattern for KeywordPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        if self.words.is_empty() {
            return None;
        }
        self.regex.find_at(text, start).map(|m| m.range())
    }

    fn word_list(&self) -> Option<&[String]> {
        Some(&self.words)
    }
}

/// The earlier match of two patterns. On a tie `first` wins.
#[derive(Debug, Clone)]
pub struct EitherPattern {
    first: Arc<dyn Pattern>,
    second: Arc<dyn Pattern>,
}

impl EitherPattern {
    pub fn new(first: Arc<dyn Pattern>, second: impl Pattern + 'static) -> Self {
        Self {
            first,
            second: Arc::new(second),
        }
    }
}

impl Pattern for EitherPattern {
    fn find_at(&self, text: &str, start: usize) -> Option<Range<usize>> {
        match (self.first.find_at(text, start), self.second.find_at(text, start)) {
            (Some(a), Some(b)) if b.start < a.start => Some(b),
            (Some(a), _) => Some(a),
            (None, b) => b,
        }
    }
}

fn next_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_regex_whole_match() {
        let p = RegexPattern::new(r"\d+").unwrap();
        assert_eq!(p.find("ab 123 c"), Some(3..6));
        assert_eq!(p.find("abc"), None);
    }

    #[test]
    fn test_regex_token_group_as_lookbehind() {
        let p = RegexPattern::new(r#"(?:^|[^\\])(?P<tok>"[^"]*")"#).unwrap();
        assert_eq!(p.find(r#"x "y""#), Some(2..5));
        assert_eq!(p.find(r#""y""#), Some(0..3));
    }

    #[test]
    fn test_regex_token_group_as_lookahead() {
        let p = RegexPattern::new(r"\b(?P<tok>\w+)\(").unwrap();
        assert_eq!(p.find("x := len(s)"), Some(5..8));
    }

    #[test]
    fn test_regex_find_at_respects_start() {
        let p = RegexPattern::new(r"a").unwrap();
        assert_eq!(p.find_at("a a", 1), Some(2..3));
    }

    #[test]
    fn test_regex_anchor_is_text_start() {
        let p = RegexPattern::new(r"^a").unwrap();
        assert_eq!(p.find_at("aa", 1), None);
    }

    #[test]
    fn test_keyword_whole_words_only() {
        let p = KeywordPattern::new(["if", "for"]).unwrap();
        assert_eq!(p.find("format if"), Some(7..9));
        assert_eq!(p.find("iffy"), None);
    }

    #[test]
    fn test_keyword_case_sensitive() {
        let p = KeywordPattern::new(["templ"]).unwrap();
        assert_eq!(p.find("Templ"), None);
        assert_eq!(p.find("templ"), Some(0..5));
    }

    #[test]
    fn test_keyword_list_is_order_independent() {
        let a = KeywordPattern::new(["go", "goto", "css", "templ"]).unwrap();
        let b = KeywordPattern::new(["templ", "goto", "go", "css", "go"]).unwrap();
        assert_eq!(a.word_list(), b.word_list());
        assert_eq!(a.word_list().unwrap(), &["css", "go", "goto", "templ"]);
    }

    #[test]
    fn test_either_takes_earliest_match() {
        let regex: Arc<dyn Pattern> = Arc::new(RegexPattern::new(r"\bfunc\b").unwrap());
        let p = EitherPattern::new(regex, KeywordPattern::new(["templ"]).unwrap());
        assert_eq!(p.find("templ x func"), Some(0..5));
        assert_eq!(p.find("func templ"), Some(0..4));
        assert_eq!(p.find_at("func templ", 1), Some(5..10));
        assert_eq!(p.find("neither"), None);
        assert_eq!(p.word_list(), None);
    }

    #[test]
    fn test_either_prefers_first_on_tie() {
        let short: Arc<dyn Pattern> = Arc::new(RegexPattern::new("ab").unwrap());
        let p = EitherPattern::new(short, RegexPattern::new("abc").unwrap());
        assert_eq!(p.find("abc"), Some(0..2));
    }

    #[test]
    fn test_word_list_through_trait_object() {
        let p: Arc<dyn Pattern> = Arc::new(KeywordPattern::new(["if"]).unwrap());
        assert_eq!(p.word_list(), Some(&["if".to_string()][..]));
        let r: Arc<dyn Pattern> = Arc::new(RegexPattern::new("if").unwrap());
        assert_eq!(r.word_list(), None);
    }

    #[test]
    fn test_keyword_prefers_longest_word() {
        let p = KeywordPattern::new(["go", "goto"]).unwrap();
        assert_eq!(p.find("goto x"), Some(0..4));
    }

    #[test]
    fn test_keyword_escapes_words() {
        let p = KeywordPattern::new(["a.b"]).unwrap();
        assert_eq!(p.find("axb"), None);
    }

    #[test]
    fn test_empty_keyword_list_never_matches() {
        let p = KeywordPattern::new(Vec::<String>::new()).unwrap();
        assert_eq!(p.find("anything"), None);
    }
}
