//! Grammar composition.
//!
//! The templ grammar is markup with the procedural grammar layered on top,
//! then a tag rule that understands templ attributes:
//!
//! ```text
//! markup ──extend──▶ + go (block keywords added)
//!        tag        ─▶ TagPattern (braces, spread, comments)
//!        tag.inside ─▶ tag-name (+ class-name), script, attr-value,
//!                      punctuation, spread, attr-name, comment
//! ```
//!
//! Every step copies; the base grammars in the registry are left as they
//! were.

use std::sync::Arc;

use log::debug;

use hl_engine::{
    EitherPattern, Grammar, GrammarRegistry, Inside, KeywordPattern, RegexPattern, Rule, TokenKind,
};

use crate::patterns::{BracePattern, ScriptPattern, SpacePattern, SpreadPattern, TagPattern};
use crate::{ComposeError, ComposeOptions};

/// Component tag names such as `Button` or `Layout.Header` (not `ui.Card`).
const CLASS_NAME: &str = r"^[A-Z]\w*(?:\.[A-Z]\w*)*$";

/// Tag name with its opening punctuation; may be empty for fragments.
const TAG_NAME: &str = r"^</?[^\s>/]*";

/// A plain attribute value. A value starting with `{` belongs to the
/// script rule.
const ATTR_VALUE: &str =
    r#"=(?:"(?:\\[\s\S]|[^\\"])*"|'(?:\\[\s\S]|[^\\'])*'|[^\s'">{][^\s'">]*)"#;

/// Widen the keyword rule of `base` with `keywords`.
///
/// A word-list rule gets one merged list. Any other keyword pattern is
/// kept and raced against the new words. A grammar without a keyword rule
/// gets one at the end. Returns a new grammar; `base` is not modified.
pub fn extend_keywords(base: &Grammar, keywords: &[String]) -> Result<Grammar, ComposeError> {
    let mut grammar = base.clone();
    let Some(rule) = base.rule(TokenKind::Keyword) else {
        grammar.push(Rule::new(TokenKind::Keyword, KeywordPattern::new(keywords)?));
        return Ok(grammar);
    };
    let widened = match rule.pattern.word_list() {
        Some(words) => rule
            .clone()
            .with_pattern(KeywordPattern::new(words.iter().chain(keywords))?),
        None => rule.clone().with_pattern(EitherPattern::new(
            Arc::clone(&rule.pattern),
            KeywordPattern::new(keywords)?,
        )),
    };
    grammar.replace(TokenKind::Keyword, vec![widened]);
    Ok(grammar)
}

pub fn build_brace_pattern(max_depth: usize) -> BracePattern {
    BracePattern::new(max_depth)
}

pub fn build_spread_pattern(space: SpacePattern, braces: BracePattern) -> SpreadPattern {
    SpreadPattern::new(space, braces)
}

pub fn build_tag_pattern(
    space: SpacePattern,
    braces: BracePattern,
    spread: SpreadPattern,
) -> TagPattern {
    TagPattern::new(space, braces, spread)
}

pub fn build_script_pattern(braces: BracePattern) -> ScriptPattern {
    ScriptPattern::new(braces)
}

/// Build the templ grammar from a markup grammar and a procedural grammar
/// whose keywords already include the templ block keywords.
pub fn compose_templ_grammar(
    markup: &Grammar,
    procedural: &Grammar,
    options: &ComposeOptions,
) -> Result<Grammar, ComposeError> {
    let missing = |what: &str| ComposeError::MissingDependency {
        name: format!("{}/{what}", options.markup_base),
    };

    let space = SpacePattern;
    let braces = build_brace_pattern(options.max_brace_depth);
    let spread = build_spread_pattern(space, braces);
    let tag = build_tag_pattern(space, braces, spread);

    let base_tag = markup.rule(TokenKind::Tag).ok_or_else(|| missing("tag"))?;
    let mut tag_inside = base_tag
        .inside_grammar()
        .cloned()
        .ok_or_else(|| missing("tag.inside"))?;

    let name_rule = tag_inside
        .rule(TokenKind::TagName)
        .cloned()
        .ok_or_else(|| missing("tag-name"))?;
    let mut name_inside = name_rule.inside_grammar().cloned().unwrap_or_default();
    name_inside.push(Rule::new(TokenKind::ClassName, RegexPattern::new(CLASS_NAME)?));
    tag_inside.replace(
        TokenKind::TagName,
        vec![name_rule
            .with_pattern(RegexPattern::new(TAG_NAME)?)
            .inside(name_inside)],
    );

    let value_rule = tag_inside
        .rule(TokenKind::AttrValue)
        .cloned()
        .ok_or_else(|| missing("attr-value"))?;
    tag_inside.replace(
        TokenKind::AttrValue,
        vec![value_rule.with_pattern(RegexPattern::new(ATTR_VALUE)?)],
    );

    for comment in procedural.rules_of(TokenKind::Comment) {
        tag_inside.push(comment.clone());
    }

    tag_inside.insert_before(
        TokenKind::AttrName,
        vec![Rule::new(TokenKind::Spread, spread).inside_root()],
    );

    let script_inside = Grammar::from_rules(vec![Rule::new(
        TokenKind::ScriptPunctuation,
        RegexPattern::new(r"^=")?,
    )
    .alias("punctuation")])
    .with_rest(Inside::Root);
    tag_inside.insert_before(
        TokenKind::AttrValue,
        vec![Rule::new(TokenKind::Script, build_script_pattern(braces))
            .alias(format!("language-{}", options.procedural_base))
            .inside(script_inside)],
    );

    let mut grammar = markup.extend(procedural);
    grammar.replace(
        TokenKind::Tag,
        vec![base_tag.clone().with_pattern(tag).inside(tag_inside)],
    );
    debug!(
        "composed '{}' grammar: {} rules, brace depth {}",
        options.language_id,
        grammar.rules().len(),
        options.max_brace_depth
    );
    Ok(grammar)
}

/// Look up the base grammars in `registry` and compose the templ grammar.
pub fn compose(registry: &GrammarRegistry, options: &ComposeOptions) -> Result<Grammar, ComposeError> {
    let markup = registry
        .get(&options.markup_base)
        .ok_or_else(|| ComposeError::MissingDependency {
            name: options.markup_base.clone(),
        })?;
    let procedural = registry
        .get(&options.procedural_base)
        .ok_or_else(|| ComposeError::MissingDependency {
            name: options.procedural_base.clone(),
        })?;
    let procedural = extend_keywords(&procedural, &options.block_keywords)?;
    compose_templ_grammar(&markup, &procedural, options)
}
