// Element analyzer — §4.3. Computes `{open_tag_inline, content_inline,
// close_tag_inline}` once per element via speculative (captured) rendering,
// cached by `Printer::element_analysis`.

use crate::ast::{HtmlElement, Node, NodeKind};
use crate::trace::trace_trace;

use super::{helpers, html, ElementAnalysis, Printer};

/// Rules 1–3: whether `open_tag_node` renders on one line. Shared between
/// the full element analysis below and the preserved-element special case in
/// `Printer::visit_element`, which only ever needs this half of the decision.
pub(crate) fn open_tag_would_be_inline<'a>(printer: &mut Printer<'a>, open_tag_node: &'a Node) -> bool {
    let NodeKind::HtmlOpenTag(open) = &open_tag_node.kind else {
        return true;
    };

    // Rule 1: a multi-line ERB control-flow construct among the attributes
    // forces a multiline open tag.
    if open
        .children
        .iter()
        .any(|c| helpers::erb_control_flow(c) && c.location.is_multiline())
    {
        return false;
    }

    // Rule 2: any attribute whose value contains a literal newline.
    if open.children.iter().any(attribute_value_has_literal_newline) {
        return false;
    }

    // Rule 3: speculatively render with every attribute on one line and
    // measure against the budget at the tag's current indentation.
    let captured = printer.capture(|p| {
        p.with_inline_mode(|pp| html::render_open_tag_inline_form(pp, open));
    });
    fits_single_line(printer, &captured)
}

fn attribute_value_has_literal_newline(node: &Node) -> bool {
    let NodeKind::HtmlAttribute(attr) = &node.kind else {
        return false;
    };
    let Some(value_node) = &attr.value else {
        return false;
    };
    let NodeKind::HtmlAttributeValue(value) = &value_node.kind else {
        return false;
    };
    value.children.iter().any(|c| match &c.kind {
        NodeKind::Literal(l) => l.content.contains('\n'),
        NodeKind::HtmlText(t) => t.content.contains('\n'),
        _ => false,
    })
}

fn fits_single_line(printer: &Printer<'_>, captured: &[String]) -> bool {
    if captured.len() != 1 {
        return false;
    }
    let indent = printer.buf.indent_level * printer.ctx.indent_width;
    captured[0].chars().count() + indent <= printer.ctx.max_line_length
}

/// Full analysis — rules 1–5.
pub(crate) fn analyze<'a>(printer: &mut Printer<'a>, el: &'a HtmlElement) -> ElementAnalysis {
    trace_trace!(tag = %el.tag_name, "analyzing element layout");
    let open_tag_inline = open_tag_would_be_inline(printer, &el.open_tag);

    let content_inline = if helpers::is_inline_element(&el.tag_name) || el.body.is_empty() {
        true
    } else if el.body.iter().any(|c| !is_inline_classified(c)) {
        false
    } else {
        fits_one_line(printer, el)
    };

    ElementAnalysis {
        open_tag_inline,
        content_inline,
        close_tag_inline: content_inline,
    }
}

/// Whether a body child can ever participate in an inline rendering: plain
/// text, whitespace, an inline element, or an ERB output/statement tag.
fn is_inline_classified(node: &Node) -> bool {
    match &node.kind {
        NodeKind::HtmlText(_) | NodeKind::Whitespace(_) | NodeKind::Literal(_) => true,
        NodeKind::HtmlElement(e) => helpers::is_inline_element(&e.tag_name),
        NodeKind::ErbContent(_) => true,
        _ => false,
    }
}

/// Rule 4's speculative full-element render: open tag, body, close tag, all
/// forced inline, measured against the budget.
fn fits_one_line<'a>(printer: &mut Printer<'a>, el: &'a HtmlElement) -> bool {
    let all_inline = ElementAnalysis {
        open_tag_inline: true,
        content_inline: true,
        close_tag_inline: true,
    };
    let captured = printer.capture(|p| {
        p.with_inline_mode(|pp| {
            html::render_open_tag(pp, &el.open_tag, all_inline, el.is_void);
            for child in &el.body {
                if helpers::pure_whitespace_node(child) {
                    continue;
                }
                pp.visit(child);
            }
            if let Some(close) = &el.close_tag {
                html::render_close_tag(pp, close, all_inline);
            }
        });
    });
    fits_single_line(printer, &captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::TreeBuilder;
    use crate::printer::{format, FormatContext};

    fn ctx(source: &str, max_line_length: usize) -> FormatContext<'_> {
        FormatContext::new("t.erb", source, 2, max_line_length)
    }

    #[test]
    fn short_element_stays_inline() {
        let mut b = TreeBuilder::new();
        let p = b.element("p", vec![], vec![b.html_text("Hi")], false);
        let doc = b.document(vec![p]);
        assert_eq!(format(&doc, &ctx("", 80)), "<p>Hi</p>");
    }

    #[test]
    fn element_exceeding_budget_breaks_body_onto_its_own_lines() {
        let mut b = TreeBuilder::new();
        let child = b.element("span", vec![], vec![b.html_text("a very long piece of inline text that overflows")], false);
        let p = b.element("p", vec![], vec![child], false);
        let doc = b.document(vec![p]);
        let out = format(&doc, &ctx("", 20));
        assert!(out.starts_with("<p>\n"));
        assert!(out.trim_end().ends_with("</p>"));
    }

    #[test]
    fn block_level_child_forces_non_inline_content() {
        let mut b = TreeBuilder::new();
        let inner = b.element("div", vec![], vec![], false);
        let outer = b.element("section", vec![], vec![inner], false);
        let doc = b.document(vec![outer]);
        let out = format(&doc, &ctx("", 80));
        assert_eq!(out, "<section>\n  <div></div>\n</section>");
    }
}
