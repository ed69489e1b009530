//! HTML/XML markup grammar.

use crate::grammar::{Grammar, Rule};
use crate::pattern::RegexPattern;
use crate::token::TokenKind;

/// The markup grammar: comments, prolog, doctype, CDATA, tags and entities.
///
/// Tags tokenize further into a tag name (with its `<` / `</` punctuation),
/// attribute values, closing punctuation and attribute names, in that
/// priority order.
pub fn markup() -> Result<Grammar, regex::Error> {
    Ok(Grammar::from_rules(vec![
        Rule::new(TokenKind::Comment, RegexPattern::new(r"<!--[\s\S]*?-->")?).greedy(),
        Rule::new(TokenKind::Prolog, RegexPattern::new(r"<\?[\s\S]+?\?>")?),
        Rule::new(
            TokenKind::Doctype,
            RegexPattern::new(r#"(?i)<!DOCTYPE(?:[^>"'\[\]]|"[^"]*"|'[^']*'|\[[^\]]*\])+>"#)?,
        )
        .inside(Grammar::from_rules(vec![Rule::new(
            TokenKind::Punctuation,
            RegexPattern::new(r"^<!|>$|[\[\]]")?,
        )]))
        .greedy(),
        Rule::new(TokenKind::Cdata, RegexPattern::new(r"(?i)<!\[cdata\[[\s\S]*?\]\]>")?).greedy(),
        Rule::new(
            TokenKind::Tag,
            RegexPattern::new(
                r#"</?[^\s>/=$<%\d][^\s>/=$<%]*(?:\s+[^\s>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s'">=]+))?)*\s*/?>"#,
            )?,
        )
        .inside(tag_inside()?)
        .greedy(),
        Rule::new(TokenKind::Entity, RegexPattern::new(r"(?i)&[\da-z]{1,8};")?).alias("named-entity"),
        Rule::new(TokenKind::Entity, RegexPattern::new(r"(?i)&#x?[\da-f]{1,8};")?),
    ]))
}

fn tag_inside() -> Result<Grammar, regex::Error> {
    Ok(Grammar::from_rules(vec![
        Rule::new(TokenKind::TagName, RegexPattern::new(r"^</?[^\s>/]+")?).inside(tag_name_inside()?),
        Rule::new(
            TokenKind::AttrValue,
            RegexPattern::new(r#"=\s*(?:"[^"]*"|'[^']*'|[^\s'">=]+)"#)?,
        )
        .inside(attr_value_inside()?),
        Rule::new(TokenKind::Punctuation, RegexPattern::new(r"/?>")?),
        Rule::new(TokenKind::AttrName, RegexPattern::new(r"[^\s>/]+")?).inside(namespace_only()?),
    ]))
}

/// Rules inside a tag name: the opening punctuation and an optional
/// `ns:` prefix.
pub fn tag_name_inside() -> Result<Grammar, regex::Error> {
    let mut grammar = Grammar::from_rules(vec![Rule::new(
        TokenKind::Punctuation,
        RegexPattern::new(r"^</?")?,
    )]);
    grammar.push(namespace_rule()?);
    Ok(grammar)
}

/// Rules inside an attribute value: the `=` and the surrounding quotes.
pub fn attr_value_inside() -> Result<Grammar, regex::Error> {
    Ok(Grammar::from_rules(vec![
        Rule::new(TokenKind::Punctuation, RegexPattern::new(r"^=")?).alias("attr-equals"),
        Rule::new(TokenKind::Punctuation, RegexPattern::new(r#"^\s*(?P<tok>["'])"#)?),
        Rule::new(TokenKind::Punctuation, RegexPattern::new(r#"["']$"#)?),
    ]))
}

fn namespace_only() -> Result<Grammar, regex::Error> {
    Ok(Grammar::from_rules(vec![namespace_rule()?]))
}

fn namespace_rule() -> Result<Rule, regex::Error> {
    Ok(Rule::new(TokenKind::Namespace, RegexPattern::new(r"^[^\s>/:]+:")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use crate::token::{stringify, Node};
    use pretty_assertions::assert_eq;

    fn kinds(nodes: &[Node]) -> Vec<Option<TokenKind>> {
        nodes.iter().map(|n| n.as_token().map(|t| t.kind)).collect()
    }

    #[test]
    fn test_simple_element() {
        let g = markup().unwrap();
        let nodes = tokenize("<p>hi</p>", &g);
        assert_eq!(
            kinds(&nodes),
            vec![Some(TokenKind::Tag), None, Some(TokenKind::Tag)]
        );
    }

    #[test]
    fn test_tag_children() {
        let g = markup().unwrap();
        let nodes = tokenize(r#"<a href="/x" hidden>"#, &g);
        let tag = nodes[0].as_token().unwrap();
        assert_eq!(
            kinds(tag.children().unwrap()),
            vec![
                Some(TokenKind::TagName),
                None,
                Some(TokenKind::AttrName),
                Some(TokenKind::AttrValue),
                None,
                Some(TokenKind::AttrName),
                Some(TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn test_attr_value_punctuation() {
        let g = markup().unwrap();
        let nodes = tokenize(r#"<a b="c">"#, &g);
        let tag = nodes[0].as_token().unwrap();
        let value = tag.children().unwrap()[3].as_token().unwrap();
        assert_eq!(value.kind, TokenKind::AttrValue);
        let parts = value.children().unwrap();
        assert_eq!(parts[0].as_token().unwrap().alias.as_deref(), Some("attr-equals"));
        assert_eq!(stringify(parts), r#"="c""#);
        assert!(parts[1].is_token(TokenKind::Punctuation));
        assert!(parts[3].is_token(TokenKind::Punctuation));
    }

    #[test]
    fn test_comment_doctype_entity() {
        let g = markup().unwrap();
        let src = "<!DOCTYPE html><!-- c -->&amp;&#x27;";
        let nodes = tokenize(src, &g);
        assert_eq!(
            kinds(&nodes),
            vec![
                Some(TokenKind::Doctype),
                Some(TokenKind::Comment),
                Some(TokenKind::Entity),
                Some(TokenKind::Entity),
            ]
        );
        assert_eq!(stringify(&nodes), src);
    }

    #[test]
    fn test_namespaced_tag() {
        let g = markup().unwrap();
        let nodes = tokenize("<svg:rect/>", &g);
        let tag = nodes[0].as_token().unwrap();
        let name = tag.children().unwrap()[0].as_token().unwrap();
        assert!(name.children().unwrap()[1].is_token(TokenKind::Namespace));
    }
}
