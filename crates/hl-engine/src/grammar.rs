//! Rule sets consumed by the tokenizer.
//!
//! A [`Grammar`] is an ordered list of rules. Order is priority: earlier
//! rules claim text first. Several rules may share a kind (for example
//! block and line comments); editing helpers address all rules of a kind
//! together.
//!
//! Grammars are values. Every helper here either returns a new grammar or
//! edits one the caller owns, so a grammar installed in a registry is never
//! changed underneath its readers.

use std::sync::Arc;

use crate::pattern::Pattern;
use crate::token::TokenKind;

/// How the text matched by a rule is tokenized further.
#[derive(Debug, Clone)]
pub enum Inside {
    /// A fixed nested grammar.
    Grammar(Arc<Grammar>),
    /// The grammar `tokenize` was called with. Lets a rule recurse into the
    /// language that contains it.
    Root,
}

/// A single matching rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: TokenKind,
    pub pattern: Arc<dyn Pattern>,
    pub inside: Option<Inside>,
    pub alias: Option<String>,
    /// Greedy rules search the flattened text and may swallow tokens that
    /// earlier rules produced inside their match.
    pub greedy: bool,
}

impl Rule {
    pub fn new(kind: TokenKind, pattern: impl Pattern + 'static) -> Self {
        Self {
            kind,
            pattern: Arc::new(pattern),
            inside: None,
            alias: None,
            greedy: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Pattern + 'static) -> Self {
        self.pattern = Arc::new(pattern);
        self
    }

    pub fn inside(mut self, grammar: Grammar) -> Self {
        self.inside = Some(Inside::Grammar(Arc::new(grammar)));
        self
    }

    pub fn inside_root(mut self) -> Self {
        self.inside = Some(Inside::Root);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// The nested grammar, when it is a fixed one.
    pub fn inside_grammar(&self) -> Option<&Grammar> {
        match &self.inside {
            Some(Inside::Grammar(g)) => Some(g),
            _ => None,
        }
    }
}

/// An ordered rule set.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
    /// Rules appended after this grammar's own, resolved at tokenize time.
    pub rest: Option<Inside>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules, rest: None }
    }

    pub fn with_rest(mut self, rest: Inside) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.rules.iter().any(|r| r.kind == kind)
    }

    /// All rules of `kind`, in priority order.
    pub fn rules_of(&self, kind: TokenKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.kind == kind)
    }

    /// The first rule of `kind`.
    pub fn rule(&self, kind: TokenKind) -> Option<&Rule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// Replace every rule of `kind` with `rules`, at the position of the
    /// first one. Appends when the kind is absent.
    pub fn replace(&mut self, kind: TokenKind, rules: Vec<Rule>) {
        match self.rules.iter().position(|r| r.kind == kind) {
            Some(at) => {
                self.rules.retain(|r| r.kind != kind);
                let at = at.min(self.rules.len());
                self.rules.splice(at..at, rules);
            }
            None => self.rules.extend(rules),
        }
    }

    /// Insert `rules` before the first rule of `anchor`. Appends when the
    /// anchor is absent.
    pub fn insert_before(&mut self, anchor: TokenKind, rules: Vec<Rule>) {
        let at = self
            .rules
            .iter()
            .position(|r| r.kind == anchor)
            .unwrap_or(self.rules.len());
        self.rules.splice(at..at, rules);
    }

    /// A copy of this grammar with `other` layered on top: kinds both
    /// define take `other`'s rules in this grammar's position, kinds only
    /// `other` defines are appended in `other`'s order.
    pub fn extend(&self, other: &Grammar) -> Grammar {
        let mut out = self.clone();
        let mut seen = Vec::new();
        for rule in &other.rules {
            if seen.contains(&rule.kind) {
                continue;
            }
            seen.push(rule.kind);
            out.replace(rule.kind, other.rules_of(rule.kind).cloned().collect());
        }
        out
    }

    /// Kinds in priority order, one entry per rule.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.rules.iter().map(|r| r.kind).collect()
    }
}
