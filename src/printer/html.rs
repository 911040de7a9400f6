// HTML tag rendering: open/close tags, attributes (including class/token-list
// wrapping and embedded ERB control flow) — §4.4.

use crate::ast::{HtmlAttributeName, HtmlOpenTag, Node, NodeKind};

use super::{erb, helpers, ElementAnalysis, Printer};

/// Reached only from a malformed tree, where an open tag is visited outside
/// `visit_element`'s own dispatch. Rendered inline as a best-effort fallback.
pub(crate) fn visit_open_tag<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    if let NodeKind::HtmlOpenTag(open) = &node.kind {
        render_open_tag_inline_form(printer, open);
    }
}

pub(crate) fn visit_close_tag(printer: &mut Printer<'_>, node: &Node) {
    if let NodeKind::HtmlCloseTag(close) = &node.kind {
        printer.emit(&format!("{}{}{}", close.tag_opening, close.tag_name, close.tag_closing));
    }
}

pub(crate) fn visit_attribute<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    render_attribute(printer, node);
}

pub(crate) fn render_open_tag<'a>(printer: &mut Printer<'a>, open_tag_node: &'a Node, analysis: ElementAnalysis, is_void: bool) {
    let NodeKind::HtmlOpenTag(open) = &open_tag_node.kind else {
        return;
    };
    if analysis.open_tag_inline {
        render_open_tag_inline_form(printer, open);
    } else {
        render_open_tag_multiline(printer, open, is_void);
    }
}

/// The open tag, its attributes, and the closing bracket all on one line.
pub(crate) fn render_open_tag_inline_form<'a>(printer: &mut Printer<'a>, open: &'a HtmlOpenTag) {
    printer.emit(&format!("<{}", open.tag_name));
    printer.with_inline_mode(|p| {
        for child in &open.children {
            render_inline_child(p, child);
        }
    });
    printer.append(&open.tag_closing);
}

fn render_inline_child<'a>(printer: &mut Printer<'a>, child: &'a Node) {
    match &child.kind {
        NodeKind::Whitespace(_) => printer.append(" "),
        NodeKind::HtmlAttribute(_) => render_attribute(printer, child),
        NodeKind::ErbIf(_)
        | NodeKind::ErbUnless(_)
        | NodeKind::ErbElse(_)
        | NodeKind::ErbCase(_)
        | NodeKind::ErbCaseMatch(_)
        | NodeKind::ErbBlock(_) => erb::render_inline_control_attribute(printer, child),
        _ => printer.visit(child),
    }
}

/// The open tag spread across lines: `<tag_name` (plus any herb-disable
/// comments), one attribute per indented line, then the closing bracket at
/// the original indent.
fn render_open_tag_multiline<'a>(printer: &mut Printer<'a>, open: &'a HtmlOpenTag, is_void: bool) {
    printer.emit(&format!("<{}", open.tag_name));
    for child in &open.children {
        if helpers::herb_disable_comment(child) {
            printer.with_inline_mode(|p| {
                p.append(" ");
                erb::visit_content(p, child);
            });
        }
    }

    printer.with_indent(|p| {
        for child in &open.children {
            match &child.kind {
                NodeKind::Whitespace(_) => {}
                _ if helpers::herb_disable_comment(child) => {}
                NodeKind::HtmlAttribute(_) => {
                    p.start_indented_line();
                    p.with_inline_mode(|pp| render_attribute(pp, child));
                }
                NodeKind::ErbIf(_)
                | NodeKind::ErbUnless(_)
                | NodeKind::ErbCase(_)
                | NodeKind::ErbCaseMatch(_)
                | NodeKind::ErbBlock(_) => {
                    if erb::control_flow_has_attribute_branch(child) {
                        erb::render_attribute_control_flow_block(p, child);
                    } else {
                        p.start_indented_line();
                        p.with_inline_mode(|pp| erb::render_inline_control_attribute(pp, child));
                    }
                }
                _ => {}
            }
        }
    });

    let closing = if is_void { "/>" } else { ">" };
    printer.buf.push_with_indent(closing);
}

pub(crate) fn render_attribute<'a>(printer: &mut Printer<'a>, attr_node: &'a Node) {
    let NodeKind::HtmlAttribute(attr) = &attr_node.kind else {
        return;
    };
    let name = attribute_name_string(&attr.name);
    printer.append(&name);
    if let Some(value_node) = &attr.value {
        printer.append("=");
        let previous = printer.current_attribute_name.replace(name.clone());
        render_attribute_value(printer, &name, value_node);
        printer.current_attribute_name = previous;
    }
}

fn attribute_name_string(name_node: &Node) -> String {
    let NodeKind::HtmlAttributeName(HtmlAttributeName { children }) = &name_node.kind else {
        return String::new();
    };
    children
        .iter()
        .map(|c| match &c.kind {
            NodeKind::Literal(l) => l.content.clone(),
            NodeKind::HtmlText(t) => t.content.clone(),
            _ => String::new(),
        })
        .collect()
}

fn render_attribute_value(printer: &mut Printer<'_>, attr_name: &str, value_node: &Node) {
    let NodeKind::HtmlAttributeValue(value) = &value_node.kind else {
        return;
    };
    let token_list = helpers::is_token_list_attribute(attr_name);
    let has_erb = value.children.iter().any(|c| matches!(c.kind, NodeKind::ErbContent(_)));

    // Token-list attributes wrap by token when they overflow the line
    // budget. An embedded ERB tag opts a value out of that — it is emitted
    // as a single normalized string instead, never split.
    if token_list && !has_erb {
        render_token_list_value(printer, &value.children);
        return;
    }

    let quote = normalize_quote(&value.open_quote, &value.children);
    printer.append(&quote);
    for child in &value.children {
        match &child.kind {
            NodeKind::Literal(l) => {
                let text = if token_list { helpers::collapse_whitespace(&l.content) } else { l.content.clone() };
                printer.append(&text);
            }
            NodeKind::HtmlText(t) => printer.append(&t.content),
            NodeKind::ErbContent(_) => erb::visit_content(printer, child),
            _ => {}
        }
    }
    printer.append(&quote);
}

/// `'...'` normalizes to `"..."` unless the content has a literal `"`, in
/// which case the single quote is kept.
fn normalize_quote(open_quote: &str, children: &[Node]) -> String {
    if open_quote != "'" {
        return "\"".to_string();
    }
    let contains_double = children.iter().any(|c| match &c.kind {
        NodeKind::Literal(l) => l.content.contains('"'),
        NodeKind::HtmlText(t) => t.content.contains('"'),
        _ => false,
    });
    if contains_double {
        "'".to_string()
    } else {
        "\"".to_string()
    }
}

fn render_token_list_value(printer: &mut Printer<'_>, children: &[Node]) {
    let raw: String = children
        .iter()
        .map(|c| match &c.kind {
            NodeKind::Literal(l) => l.content.clone(),
            NodeKind::HtmlText(t) => t.content.clone(),
            _ => String::new(),
        })
        .collect();
    let normalized = helpers::collapse_whitespace(raw.trim());
    let inline_form = format!("\"{}\"", normalized);
    let current_col = printer.buf.last_line_len();

    if normalized.is_empty() || current_col + inline_form.chars().count() <= printer.ctx.max_line_length {
        printer.append(&inline_form);
        return;
    }

    let budget = printer.ctx.max_line_length;
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    let mut wrapped = String::from("\"\n");
    let mut line = String::new();
    for tok in tokens {
        let candidate_len = if line.is_empty() { 2 + tok.len() } else { line.len() + 1 + tok.len() };
        if !line.is_empty() && candidate_len > budget {
            wrapped.push_str("  ");
            wrapped.push_str(&line);
            wrapped.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(tok);
    }
    if !line.is_empty() {
        wrapped.push_str("  ");
        wrapped.push_str(&line);
        wrapped.push('\n');
    }
    wrapped.push('"');
    printer.append_verbatim(&wrapped);
}

pub(crate) fn render_close_tag(printer: &mut Printer<'_>, close_tag_node: &Node, analysis: ElementAnalysis) {
    let NodeKind::HtmlCloseTag(close) = &close_tag_node.kind else {
        return;
    };
    let text = format!("{}{}{}", close.tag_opening, close.tag_name, close.tag_closing);
    if analysis.close_tag_inline || printer.buf.inline_mode {
        printer.append(&text);
    } else {
        printer.buf.push_with_indent(&text);
    }
}
