// Pure predicates over AST nodes.
//
// No mutable state here — every function is a query over a borrowed `Node`
// (or a plain string), which keeps the analyzer and the text-flow engine
// free to call them speculatively without side effects.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Node, NodeKind};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Inline HTML elements — content flows with surrounding text instead of
/// forcing a line break around the element.
pub static INLINE_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "abbr", "acronym", "b", "bdo", "big", "br", "cite", "code", "dfn", "em", "hr",
        "i", "img", "kbd", "label", "map", "object", "q", "samp", "small", "span", "strong",
        "sub", "sup", "tt", "var", "del", "ins", "mark", "s", "u", "time", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Elements whose body is emitted byte-identical to the source.
pub static CONTENT_PRESERVING_ELEMENTS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ["script", "style", "pre", "textarea"].into_iter().collect());

/// Elements with no close tag and no body traversal.
pub static VOID_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Attributes whose value is a space-separated token list.
pub static TOKEN_LIST_ATTRIBUTES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["class", "data-controller", "data-action"]
        .into_iter()
        .collect()
});

pub fn is_inline_element(tag_name: &str) -> bool {
    INLINE_ELEMENTS.contains(tag_name.to_ascii_lowercase().as_str())
}

pub fn is_content_preserving_element(tag_name: &str) -> bool {
    CONTENT_PRESERVING_ELEMENTS.contains(tag_name.to_ascii_lowercase().as_str())
}

pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name.to_ascii_lowercase().as_str())
}

pub fn is_token_list_attribute(name: &str) -> bool {
    TOKEN_LIST_ATTRIBUTES.contains(name.to_ascii_lowercase().as_str())
}

/// `html_text` whose content is only ASCII whitespace.
pub fn pure_whitespace_node(node: &Node) -> bool {
    match &node.kind {
        NodeKind::HtmlText(t) => t.content.chars().all(|c| c.is_ascii_whitespace()),
        NodeKind::Whitespace(_) => true,
        _ => false,
    }
}

/// The inverse of [`pure_whitespace_node`], also false for the `Whitespace`
/// node kind itself.
pub fn non_whitespace_node(node: &Node) -> bool {
    if matches!(node.kind, NodeKind::Whitespace(_)) {
        return false;
    }
    !pure_whitespace_node(node)
}

/// `html_element` whose tag name is not in [`INLINE_ELEMENTS`].
pub fn block_level_node(node: &Node) -> bool {
    match &node.kind {
        NodeKind::HtmlElement(e) => !is_inline_element(&e.tag_name),
        _ => false,
    }
}

/// Control-flow ERB constructs: if/unless/case/case-match/for/while/until/block.
pub fn erb_control_flow(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::ErbIf(_)
            | NodeKind::ErbUnless(_)
            | NodeKind::ErbCase(_)
            | NodeKind::ErbCaseMatch(_)
            | NodeKind::ErbFor(_)
            | NodeKind::ErbWhile(_)
            | NodeKind::ErbUntil(_)
            | NodeKind::ErbBlock(_)
    )
}

/// An ERB comment whose content, trimmed, starts with `herb:disable`.
pub fn herb_disable_comment(node: &Node) -> bool {
    match &node.kind {
        NodeKind::ErbContent(c) => {
            c.tag_opening == "<%#" && c.content.trim().starts_with("herb:disable")
        }
        _ => false,
    }
}

/// An ERB comment whose content, trimmed, is exactly `herb:formatter ignore`.
pub fn herb_formatter_ignore_comment(node: &Node) -> bool {
    match &node.kind {
        NodeKind::ErbContent(c) => {
            c.tag_opening == "<%#" && c.content.trim() == "herb:formatter ignore"
        }
        _ => false,
    }
}

/// Scans an entire tree for a `herb:formatter ignore` directive, used by the
/// (out-of-scope) collaborator that decides whether to invoke the printer at
/// all. Exposed here because it's a pure predicate over the same tree shape
/// every other helper walks.
pub fn contains_formatter_ignore_directive(node: &Node) -> bool {
    if herb_formatter_ignore_comment(node) {
        return true;
    }
    node.child_nodes()
        .iter()
        .any(|child| contains_formatter_ignore_directive(child))
}

/// True iff `children` mix non-empty text with only inline elements and ERB
/// output/statement nodes — the body dispatcher routes such children through
/// the text-flow engine instead of one-per-line block emission.
pub fn in_text_flow_context(children: &[Node]) -> bool {
    let mut has_text = false;
    let mut has_non_text = false;
    for child in children {
        match &child.kind {
            NodeKind::HtmlText(t) if !t.content.trim().is_empty() => has_text = true,
            NodeKind::HtmlText(_) | NodeKind::Whitespace(_) => {}
            NodeKind::HtmlElement(e) => {
                has_non_text = true;
                if !is_inline_element(&e.tag_name) {
                    return false;
                }
            }
            NodeKind::ErbContent(_) => has_non_text = true,
            _ => return false,
        }
    }
    has_text && has_non_text
}

/// An `html_text` node whose content has two or more newlines — the marker
/// the body dispatcher uses to decide whether to preserve one blank line
/// between block siblings.
pub fn is_user_blank_line(node: &Node) -> bool {
    match &node.kind {
        NodeKind::HtmlText(t) => t.content.matches('\n').count() >= 2,
        _ => false,
    }
}

/// Whether a space is needed between `current_line`'s last character and the
/// next `word` in the text-flow engine.
///
/// False when: `word` is pure closing punctuation; `current_line` ends with
/// opening punctuation; or `word` opens an ERB tag right after a character
/// that isn't a word, a quote, or a closing paren (so e.g. `(<%= x %>)` does
/// not get a stray leading space).
pub fn needs_space_between(current_line: &str, word: &str) -> bool {
    if current_line.is_empty() {
        return false;
    }
    if is_pure_closing_punctuation(word) {
        return false;
    }
    if let Some(last) = current_line.chars().last() {
        if matches!(last, '(' | '[' | '{') {
            return false;
        }
        if word.starts_with("<%")
            && !(last.is_alphanumeric() || last == '_' || last == '"' || last == '\'' || last == ')')
        {
            return false;
        }
    }
    true
}

/// Collapses every run of ASCII/Unicode whitespace in `s` to a single space,
/// without trimming the ends. Used wherever the spec calls for "internal
/// whitespace runs collapsed to a single space" — plain text content,
/// normalized class lists.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s, " ").into_owned()
}

fn is_pure_closing_punctuation(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | '}' | ']' | '+'))
}
