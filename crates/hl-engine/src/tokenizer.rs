//! Rule-driven tokenizer.
//!
//! Rules run in priority order over a flat sequence of nodes. Each rule
//! only looks at bare text: a match splits a text node into
//! `before / token / after`, and `after` is searched again by the same
//! rule. Tokens produced by earlier rules are never revisited, except by
//! greedy rules, which search the flattened text and may swallow tokens
//! their match overlaps.
//!
//! Every pass builds a fresh sequence from the previous one; nothing is
//! spliced while being iterated.

use std::collections::VecDeque;

use log::trace;

use crate::grammar::{Grammar, Inside, Rule};
use crate::token::{stringify, Content, Node, Token};

/// Tokenize `text` with `grammar`.
///
/// The concatenated raw text of the result always equals `text`.
pub fn tokenize(text: &str, grammar: &Grammar) -> Vec<Node> {
    tokenize_in(text, grammar, grammar)
}

fn tokenize_in(text: &str, grammar: &Grammar, root: &Grammar) -> Vec<Node> {
    if text.is_empty() {
        return Vec::new();
    }
    let rules = collect_rules(grammar, root);
    trace!("tokenizing {} bytes with {} rules", text.len(), rules.len());
    apply_rules(vec![Node::Text(text.to_string())], &rules, root)
}

/// A grammar's own rules followed by its `rest`.
fn collect_rules<'g>(grammar: &'g Grammar, root: &'g Grammar) -> Vec<&'g Rule> {
    let mut rules: Vec<&Rule> = grammar.rules().iter().collect();
    match &grammar.rest {
        Some(Inside::Grammar(rest)) => rules.extend(rest.rules()),
        Some(Inside::Root) => rules.extend(root.rules()),
        None => {}
    }
    rules
}

fn apply_rules(mut nodes: Vec<Node>, rules: &[&Rule], root: &Grammar) -> Vec<Node> {
    for (i, rule) in rules.iter().enumerate() {
        nodes = if rule.greedy {
            apply_greedy(nodes, rule, &rules[..i], root)
        } else {
            apply_plain(nodes, rule, root)
        };
    }
    nodes
}

/// Match `rule` inside each bare text node in isolation.
fn apply_plain(nodes: Vec<Node>, rule: &Rule, root: &Grammar) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let text = match node {
            Node::Text(text) => text,
            token => {
                out.push(token);
                continue;
            }
        };
        let mut rest = text.as_str();
        while let Some(range) = rule.pattern.find(rest) {
            if range.is_empty() {
                break;
            }
            if range.start > 0 {
                out.push(Node::Text(rest[..range.start].to_string()));
            }
            out.push(Node::Token(make_token(rule, &rest[range.clone()], root)));
            rest = &rest[range.end..];
        }
        if !rest.is_empty() {
            out.push(Node::Text(rest.to_string()));
        }
    }
    out
}

/// Match `rule` against the flattened text, starting from each bare text
/// node. A match may extend over later nodes; those are absorbed and the
/// matched text is tokenized afresh. When a swallowed token leaves a
/// tail behind, the rules before this one get to see that tail again.
fn apply_greedy(nodes: Vec<Node>, rule: &Rule, earlier: &[&Rule], root: &Grammar) -> Vec<Node> {
    let text = stringify(&nodes);
    let mut queue: VecDeque<Node> = nodes.into();
    let mut out = Vec::with_capacity(queue.len());
    let mut pos = 0;

    while let Some(node) = queue.pop_front() {
        let len = node.raw().len();
        if !node.is_text() {
            pos += len;
            out.push(node);
            continue;
        }
        let Some(m) = rule.pattern.find_at(&text, pos) else {
            out.push(node);
            out.extend(queue);
            break;
        };
        if m.is_empty() || m.start >= pos + len {
            // Starts in a later node (or matched nothing); let that node
            // find it.
            pos += len;
            out.push(node);
            continue;
        }

        let mut end = pos + len;
        let mut swallowed_token = false;
        while let Some(next) = queue.front() {
            if end >= m.end && !next.is_text() {
                break;
            }
            swallowed_token |= !next.is_text();
            end += next.raw().len();
            queue.pop_front();
        }

        if m.start > pos {
            out.push(Node::Text(text[pos..m.start].to_string()));
        }
        out.push(Node::Token(make_token(rule, &text[m.clone()], root)));
        pos = m.end;

        let after = &text[m.end..end];
        if after.is_empty() {
            continue;
        }
        let tail = vec![Node::Text(after.to_string())];
        let tail = if swallowed_token && !earlier.is_empty() {
            trace!("greedy {} swallowed tokens, rematching tail", rule.kind);
            apply_rules(tail, earlier, root)
        } else {
            tail
        };
        for n in tail.into_iter().rev() {
            queue.push_front(n);
        }
    }
    out
}

fn make_token(rule: &Rule, matched: &str, root: &Grammar) -> Token {
    let content = match &rule.inside {
        Some(Inside::Grammar(grammar)) => Content::Tokens(tokenize_in(matched, grammar, root)),
        Some(Inside::Root) => Content::Tokens(tokenize_in(matched, root, root)),
        None => Content::Text(matched.to_string()),
    };
    Token::new(rule.kind, content, matched).with_alias(rule.alias.clone())
}
