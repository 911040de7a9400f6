// ERB tag rendering: interior normalization, comments, and every control-flow
// construct (if/unless/case/case_match/when/in/for/while/until/block) — §4.5.

use crate::ast::{ErbContent, Node, NodeKind};

use super::{helpers, html, Printer};

/// Normalizes an ERB tag's interior per §4.5: empty stays empty, a heredoc
/// literal closes with a trailing newline instead of a space, everything
/// else gets exactly one leading and one trailing space.
pub(crate) fn normalize_inner(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with("<<") {
        return format!(" {}\n", trimmed);
    }
    format!(" {} ", trimmed)
}

pub(crate) fn reconstruct(tag_opening: &str, content: &str, tag_closing: &str) -> String {
    format!("{}{}{}", tag_opening, normalize_inner(content), tag_closing)
}

/// Builds a control-flow tag's text: `keyword` plus `expr` (trimmed), both
/// run back through [`normalize_inner`] so spacing stays uniform with plain
/// ERB tags. `expr` empty (e.g. a bare `case` or `else`) keeps just the
/// keyword.
fn control_tag(tag_opening: &str, keyword: &str, expr: &str, tag_closing: &str) -> String {
    let inner = if expr.trim().is_empty() {
        keyword.to_string()
    } else {
        format!("{} {}", keyword, expr.trim())
    };
    reconstruct(tag_opening, &inner, tag_closing)
}

pub(crate) fn visit_content(printer: &mut Printer<'_>, node: &Node) {
    let NodeKind::ErbContent(c) = &node.kind else {
        return;
    };
    if c.tag_opening == "<%#" {
        visit_comment(printer, c);
    } else {
        printer.emit(&reconstruct(&c.tag_opening, &c.content, &c.tag_closing));
    }
}

pub(crate) fn visit_end(printer: &mut Printer<'_>, node: &Node) {
    let NodeKind::ErbEnd(e) = &node.kind else {
        return;
    };
    printer.emit(&reconstruct(&e.tag_opening, &e.content, &e.tag_closing));
}

/// ERB comment rendering — the four cases of §4.5.
fn visit_comment(printer: &mut Printer<'_>, c: &ErbContent) {
    if c.content.trim().is_empty() {
        printer.emit(&format!("{}{}", c.tag_opening, c.tag_closing));
        return;
    }

    let mut lines: Vec<&str> = c.content.split('\n').collect();
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    if lines.len() <= 1 {
        let body = lines.first().map(|l| l.trim()).unwrap_or("");
        printer.emit(&format!("{} {} {}", c.tag_opening, body, c.tag_closing));
        return;
    }

    if printer.buf.inline_mode {
        let joined = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        printer.emit(&format!("{} {} {}", c.tag_opening, joined, c.tag_closing));
        return;
    }

    printer.emit(&c.tag_opening.to_string());
    printer.with_indent(|p| {
        for line in &lines {
            p.buf.push_with_indent(line.trim());
        }
    });
    printer.buf.push_with_indent(&c.tag_closing);
}

fn visit_statements<'a>(printer: &mut Printer<'a>, statements: &'a [Node]) {
    for stmt in statements {
        if helpers::pure_whitespace_node(stmt) {
            continue;
        }
        printer.visit(stmt);
    }
}

pub(crate) fn visit_if<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let NodeKind::ErbIf(n) = &node.kind else {
        return;
    };
    printer.emit(&control_tag(&n.tag_opening, "if", &n.condition, &n.tag_closing));
    printer.with_indent(|p| visit_statements(p, &n.statements));
    if let Some(subsequent) = &n.subsequent {
        printer.visit(subsequent);
    }
    printer.visit(&n.end_node);
}

pub(crate) fn visit_unless<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let NodeKind::ErbUnless(n) = &node.kind else {
        return;
    };
    printer.emit(&control_tag(&n.tag_opening, "unless", &n.condition, &n.tag_closing));
    printer.with_indent(|p| visit_statements(p, &n.statements));
    if let Some(else_clause) = &n.else_clause {
        printer.visit(else_clause);
    }
    printer.visit(&n.end_node);
}

pub(crate) fn visit_else<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let NodeKind::ErbElse(n) = &node.kind else {
        return;
    };
    let text = match &n.condition {
        Some(cond) => control_tag(&n.tag_opening, "elsif", cond, &n.tag_closing),
        None => control_tag(&n.tag_opening, "else", "", &n.tag_closing),
    };
    printer.emit(&text);
    printer.with_indent(|p| visit_statements(p, &n.statements));
    if let Some(subsequent) = &n.subsequent {
        printer.visit(subsequent);
    }
}

pub(crate) fn visit_case<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let n = match &node.kind {
        NodeKind::ErbCase(n) | NodeKind::ErbCaseMatch(n) => n,
        _ => return,
    };
    printer.emit(&control_tag(&n.tag_opening, "case", n.condition.as_deref().unwrap_or(""), &n.tag_closing));
    // Content between `case` and the first `when`/`in` is a lint offense
    // upstream, not a formatting concern — preserved verbatim, in place, one
    // level indented like the `when`/`in` bodies it precedes.
    printer.with_indent(|p| {
        for child in &n.children {
            p.visit(child);
        }
    });
    for cond in &n.conditions {
        printer.visit(cond);
    }
    if let Some(else_clause) = &n.else_clause {
        printer.visit(else_clause);
    }
    printer.visit(&n.end_node);
}

pub(crate) fn visit_when<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let (keyword, n) = match &node.kind {
        NodeKind::ErbWhen(n) => ("when", n),
        NodeKind::ErbIn(n) => ("in", n),
        _ => return,
    };
    printer.emit(&control_tag(&n.tag_opening, keyword, &n.condition, &n.tag_closing));
    printer.with_indent(|p| visit_statements(p, &n.statements));
}

pub(crate) fn visit_loop<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let (keyword, n) = match &node.kind {
        NodeKind::ErbFor(n) => ("for", n),
        NodeKind::ErbWhile(n) => ("while", n),
        NodeKind::ErbUntil(n) => ("until", n),
        _ => return,
    };
    printer.emit(&control_tag(&n.tag_opening, keyword, &n.condition, &n.tag_closing));
    printer.with_indent(|p| visit_statements(p, &n.statements));
    printer.visit(&n.end_node);
}

pub(crate) fn visit_block<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let NodeKind::ErbBlock(n) = &node.kind else {
        return;
    };
    printer.emit(&reconstruct(&n.tag_opening, &n.condition, &n.tag_closing));
    if helpers::in_text_flow_context(&n.body) {
        printer.with_indent(|p| super::text_flow::run(p, &n.body));
    } else {
        printer.with_indent(|p| {
            for child in &n.body {
                if helpers::pure_whitespace_node(child) {
                    continue;
                }
                p.visit(child);
            }
        });
    }
    printer.visit(&n.end_node);
}

/// Renders an ERB if/unless/case/block construct that sits among an open
/// tag's attributes, as one flowing inline expression — §4.5's last bullet.
/// A leading space precedes every statement; a trailing space precedes the
/// closing `<% end %>` when any statement rendered was an attribute, or when
/// the surrounding value is a token-list attribute.
pub(crate) fn render_inline_control_attribute<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    let (header, statements, chain, end) = match &node.kind {
        NodeKind::ErbIf(n) => (
            control_tag(&n.tag_opening, "if", &n.condition, &n.tag_closing),
            &n.statements,
            n.subsequent.as_deref(),
            Some(n.end_node.as_ref()),
        ),
        NodeKind::ErbUnless(n) => (
            control_tag(&n.tag_opening, "unless", &n.condition, &n.tag_closing),
            &n.statements,
            n.else_clause.as_deref(),
            Some(n.end_node.as_ref()),
        ),
        NodeKind::ErbElse(n) => {
            let (kw, expr) = match &n.condition {
                Some(c) => ("elsif", c.as_str()),
                None => ("else", ""),
            };
            (
                control_tag(&n.tag_opening, kw, expr, &n.tag_closing),
                &n.statements,
                n.subsequent.as_deref(),
                None,
            )
        }
        NodeKind::ErbBlock(n) => (
            reconstruct(&n.tag_opening, &n.condition, &n.tag_closing),
            &n.body,
            None,
            Some(n.end_node.as_ref()),
        ),
        _ => {
            printer.visit(node);
            return;
        }
    };

    printer.append(&header);
    let mut any_attribute = false;
    for stmt in statements {
        if helpers::pure_whitespace_node(stmt) {
            continue;
        }
        printer.append(" ");
        if matches!(stmt.kind, NodeKind::HtmlAttribute(_)) {
            any_attribute = true;
            html::render_attribute(printer, stmt);
        } else {
            printer.visit(stmt);
        }
    }
    if let Some(chain) = chain {
        printer.append(" ");
        render_inline_control_attribute(printer, chain);
    }
    if let Some(end) = end {
        let in_token_list = printer
            .current_attribute_name
            .as_deref()
            .map(helpers::is_token_list_attribute)
            .unwrap_or(false);
        if any_attribute || in_token_list {
            printer.append(" ");
        }
        printer.visit(end);
    }
}

/// Whether any branch of this control-flow construct directly contains an
/// `html_attribute` — the §4.4 test for choosing the one-branch-per-line
/// multiline expansion over the single flowing inline form.
pub(crate) fn control_flow_has_attribute_branch(node: &Node) -> bool {
    fn has_attr(n: &Node) -> bool {
        matches!(n.kind, NodeKind::HtmlAttribute(_))
    }
    match &node.kind {
        NodeKind::ErbIf(n) => {
            n.statements.iter().any(has_attr) || n.subsequent.as_deref().is_some_and(control_flow_has_attribute_branch)
        }
        NodeKind::ErbUnless(n) => {
            n.statements.iter().any(has_attr) || n.else_clause.as_deref().is_some_and(control_flow_has_attribute_branch)
        }
        NodeKind::ErbElse(n) => {
            n.statements.iter().any(has_attr) || n.subsequent.as_deref().is_some_and(control_flow_has_attribute_branch)
        }
        NodeKind::ErbCase(n) | NodeKind::ErbCaseMatch(n) => {
            n.conditions.iter().any(control_flow_has_attribute_branch)
                || n.else_clause.as_deref().is_some_and(control_flow_has_attribute_branch)
        }
        NodeKind::ErbWhen(n) | NodeKind::ErbIn(n) => n.statements.iter().any(has_attr),
        NodeKind::ErbBlock(n) => n.body.iter().any(has_attr),
        _ => false,
    }
}

/// The §4.4 multiline expansion: the control-flow tag on its own indented
/// line, each attribute in each branch on its own indented line, then the
/// end tag, nested consistently.
pub(crate) fn render_attribute_control_flow_block<'a>(printer: &mut Printer<'a>, node: &'a Node) {
    match &node.kind {
        NodeKind::ErbIf(n) => {
            printer.start_indented_line();
            let text = control_tag(&n.tag_opening, "if", &n.condition, &n.tag_closing);
            printer.with_inline_mode(|p| p.append(&text));
            render_attribute_statements_block(printer, &n.statements);
            if let Some(sub) = &n.subsequent {
                render_attribute_control_flow_block(printer, sub);
            }
            printer.start_indented_line();
            printer.with_inline_mode(|p| p.visit(&n.end_node));
        }
        NodeKind::ErbUnless(n) => {
            printer.start_indented_line();
            let text = control_tag(&n.tag_opening, "unless", &n.condition, &n.tag_closing);
            printer.with_inline_mode(|p| p.append(&text));
            render_attribute_statements_block(printer, &n.statements);
            if let Some(else_clause) = &n.else_clause {
                render_attribute_control_flow_block(printer, else_clause);
            }
            printer.start_indented_line();
            printer.with_inline_mode(|p| p.visit(&n.end_node));
        }
        NodeKind::ErbElse(n) => {
            printer.start_indented_line();
            let text = match &n.condition {
                Some(cond) => control_tag(&n.tag_opening, "elsif", cond, &n.tag_closing),
                None => control_tag(&n.tag_opening, "else", "", &n.tag_closing),
            };
            printer.with_inline_mode(|p| p.append(&text));
            render_attribute_statements_block(printer, &n.statements);
            if let Some(sub) = &n.subsequent {
                render_attribute_control_flow_block(printer, sub);
            }
        }
        NodeKind::ErbBlock(n) => {
            printer.start_indented_line();
            let text = reconstruct(&n.tag_opening, &n.condition, &n.tag_closing);
            printer.with_inline_mode(|p| p.append(&text));
            render_attribute_statements_block(printer, &n.body);
            printer.start_indented_line();
            printer.with_inline_mode(|p| p.visit(&n.end_node));
        }
        _ => {}
    }
}

fn render_attribute_statements_block<'a>(printer: &mut Printer<'a>, statements: &'a [Node]) {
    printer.with_indent(|p| {
        for stmt in statements {
            if helpers::pure_whitespace_node(stmt) {
                continue;
            }
            p.start_indented_line();
            p.with_inline_mode(|pp| {
                if matches!(stmt.kind, NodeKind::HtmlAttribute(_)) {
                    html::render_attribute(pp, stmt);
                } else {
                    pp.visit(stmt);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::TreeBuilder;
    use crate::printer::{format, FormatContext};

    fn ctx(source: &str) -> FormatContext<'_> {
        FormatContext::new("t.erb", source, 2, 80)
    }

    #[test]
    fn normalize_inner_empty_stays_empty() {
        assert_eq!(normalize_inner(""), "");
        assert_eq!(normalize_inner("   "), "");
    }

    #[test]
    fn normalize_inner_pads_single_space() {
        assert_eq!(normalize_inner("@user.name"), " @user.name ");
    }

    #[test]
    fn normalize_inner_heredoc_closes_with_newline() {
        assert_eq!(normalize_inner("<<SQL"), " <<SQL\n");
    }

    #[test]
    fn if_end_block_renders_multiline() {
        let mut b = TreeBuilder::new();
        let stmt = b.erb_output("link_to \"Admin\", admin_path");
        let if_node = b.erb_if("admin", vec![stmt], None);
        let doc = b.document(vec![if_node]);
        let out = format(&doc, &ctx(""));
        assert_eq!(
            out,
            "<% if admin %>\n  <%= link_to \"Admin\", admin_path %>\n<% end %>"
        );
    }

    #[test]
    fn comment_with_empty_content() {
        let mut b = TreeBuilder::new();
        let c = b.erb_comment("");
        let doc = b.document(vec![c]);
        assert_eq!(format(&doc, &ctx("")), "<%#%>");
    }

    #[test]
    fn comment_with_single_line_content() {
        let mut b = TreeBuilder::new();
        let c = b.erb_comment("comment");
        let doc = b.document(vec![c]);
        assert_eq!(format(&doc, &ctx("")), "<%# comment %>");
    }
}
