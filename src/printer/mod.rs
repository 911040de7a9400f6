// Tree-walking visitor that turns a parsed ERB+HTML AST into canonical
// source text.
//
// Total on well-formed input: every `NodeKind` arm in `visit` either renders
// the node or, for a kind this printer doesn't special-case, passes it
// through verbatim (`NodeKind::Other`) — see `crate::error` for the handful
// of fallible entry points this module never touches (configuration
// loading). A `Printer` is built fresh for each `format()` call and
// discarded afterward; nothing here is shared across calls.

pub mod analysis;
pub mod buffer;
pub mod erb;
pub mod helpers;
pub mod html;
pub mod text_flow;

use std::collections::HashMap;

use crate::ast::{HtmlElement, HtmlText, Node, NodeId, NodeKind};
use crate::trace::trace_debug;
use buffer::LineBuffer;

/// Immutable input to a single `format()` call — §6 of the specification.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    pub file_path: &'a str,
    pub source: &'a str,
    pub indent_width: usize,
    pub max_line_length: usize,
}

impl<'a> FormatContext<'a> {
    pub fn new(file_path: &'a str, source: &'a str, indent_width: usize, max_line_length: usize) -> Self {
        Self {
            file_path,
            source,
            indent_width,
            max_line_length,
        }
    }
}

/// The layout decision computed once per element by [`analysis::analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementAnalysis {
    pub open_tag_inline: bool,
    pub content_inline: bool,
    pub close_tag_inline: bool,
}

impl ElementAnalysis {
    /// The analysis a preserved element (script/style/pre/textarea) and the
    /// recursion-sentinel fallback both use: everything folds onto one
    /// rendering unit, since there's no body layout decision left to make.
    fn all_inline() -> Self {
        Self {
            open_tag_inline: true,
            content_inline: true,
            close_tag_inline: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CacheSlot {
    InProgress,
    Done(ElementAnalysis),
}

/// Printer state — §3 of the specification, concretized.
pub struct Printer<'a> {
    pub(crate) buf: LineBuffer,
    pub(crate) ctx: FormatContext<'a>,
    element_stack: Vec<&'a Node>,
    pub(crate) current_attribute_name: Option<String>,
    analysis_cache: HashMap<NodeId, CacheSlot>,
    /// Populated by `track_boundary` around each element's body dispatch;
    /// read back by `element_analysis`'s recursion-sentinel fallback, which
    /// has no other way to know how a node it can't safely re-enter last
    /// rendered.
    node_is_multiline: HashMap<NodeId, bool>,
}

impl<'a> Printer<'a> {
    pub fn new(ctx: FormatContext<'a>) -> Self {
        Self {
            buf: LineBuffer::new(ctx.indent_width),
            ctx,
            element_stack: Vec::new(),
            current_attribute_name: None,
            analysis_cache: HashMap::new(),
            node_is_multiline: HashMap::new(),
        }
    }

    /// Runs the printer over `root` and returns the joined output. Consumes
    /// `self` — a `Printer` is single-use, matching §5's "discarded after
    /// producing the output string."
    pub fn run(mut self, root: &'a Node) -> String {
        self.visit(root);
        self.buf.join()
    }

    /// Starts a new emission unit at the node currently being visited,
    /// respecting ambient `inline_mode`: appended to the last line when
    /// inline, else pushed fresh at the current indent. This is the one
    /// entry point every leaf visitor (text, ERB, the first fragment of an
    /// open tag) goes through.
    pub(crate) fn emit(&mut self, text: &str) {
        if self.buf.inline_mode {
            self.buf.append_to_last(text);
        } else {
            self.buf.push_with_indent(text);
        }
    }

    /// Unconditionally continues the current output line, ignoring
    /// `inline_mode`. Used once a renderer already knows it is mid-line (the
    /// second and later fragments of one open tag, one ERB control-flow tag).
    pub(crate) fn append(&mut self, text: &str) {
        self.buf.append_to_last(text);
    }

    /// Like [`Self::append`], but keeps `string_line_count` honest for text
    /// that embeds literal newlines (preserved-element passthrough, wrapped
    /// class values) rather than expressing them as separate buffer entries.
    pub(crate) fn append_verbatim(&mut self, text: &str) {
        self.buf.append_to_last(text);
        self.buf.string_line_count += text.matches('\n').count();
    }

    #[allow(dead_code)] // kept for parity with §3's element_stack; not yet needed by any renderer
    pub(crate) fn current_element(&self) -> Option<&'a Node> {
        self.element_stack.last().copied()
    }

    /// Pushes a new, indented, otherwise-empty line and leaves the cursor on
    /// it — for renderers that need to start a fresh line and then `append`
    /// several fragments onto it (one attribute, one ERB branch in the
    /// multiline open-tag expansion) rather than emitting it as a single
    /// string up front.
    pub(crate) fn start_indented_line(&mut self) {
        let indent = self.buf.indent();
        self.buf.push(indent);
    }

    pub(crate) fn with_inline_mode<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.buf.inline_mode;
        self.buf.inline_mode = true;
        let result = f(self);
        self.buf.inline_mode = previous;
        result
    }

    pub(crate) fn with_indent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.buf.indent_level += 1;
        let result = f(self);
        self.buf.indent_level -= 1;
        result
    }

    /// Substitutes a fresh buffer for the duration of `f`, returning what it
    /// produced and restoring `lines`, `string_line_count`, and
    /// `inline_mode` unconditionally — the speculative-render primitive the
    /// element analyzer and the text-flow engine's atomic units build on.
    pub(crate) fn capture(&mut self, f: impl FnOnce(&mut Self)) -> Vec<String> {
        let saved_lines = self.buf.take_lines();
        let saved_count = self.buf.string_line_count;
        let saved_inline = self.buf.inline_mode;
        self.buf.string_line_count = 0;
        f(self);
        let captured = self.buf.restore_lines(saved_lines);
        self.buf.string_line_count = saved_count;
        self.buf.inline_mode = saved_inline;
        captured
    }

    /// Runs `f` and reports whether it produced more than one output line.
    pub(crate) fn track_boundary(&mut self, node_id: NodeId, f: impl FnOnce(&mut Self)) -> bool {
        let before = self.buf.line_count();
        f(self);
        let lines = self.buf.lines();
        let added = &lines[before..];
        let multiline = added.len() > 1 || added.iter().any(|l| l.contains('\n'));
        self.node_is_multiline.insert(node_id, multiline);
        multiline
    }

    pub(crate) fn visit(&mut self, node: &'a Node) {
        match &node.kind {
            NodeKind::Document(d) => {
                for child in &d.children {
                    self.visit(child);
                }
            }
            NodeKind::HtmlElement(_) => self.visit_element(node),
            NodeKind::HtmlOpenTag(_) => html::visit_open_tag(self, node),
            NodeKind::HtmlCloseTag(_) => html::visit_close_tag(self, node),
            NodeKind::HtmlAttribute(_) => html::visit_attribute(self, node),
            NodeKind::HtmlText(t) => self.visit_text(t),
            NodeKind::Whitespace(w) => self.emit(&w.value),
            NodeKind::Literal(l) => self.emit(&l.content),
            NodeKind::ErbContent(_) => erb::visit_content(self, node),
            NodeKind::ErbEnd(_) => erb::visit_end(self, node),
            NodeKind::ErbIf(_) => erb::visit_if(self, node),
            NodeKind::ErbUnless(_) => erb::visit_unless(self, node),
            NodeKind::ErbElse(_) => erb::visit_else(self, node),
            NodeKind::ErbCase(_) | NodeKind::ErbCaseMatch(_) => erb::visit_case(self, node),
            NodeKind::ErbWhen(_) | NodeKind::ErbIn(_) => erb::visit_when(self, node),
            NodeKind::ErbFor(_) | NodeKind::ErbWhile(_) | NodeKind::ErbUntil(_) => erb::visit_loop(self, node),
            NodeKind::ErbBlock(_) => erb::visit_block(self, node),
            // Reached only from a malformed tree — html.rs reads these
            // typed fields directly instead of recursing generically. Guard
            // per §7 and emit nothing rather than panic.
            NodeKind::HtmlAttributeName(_) | NodeKind::HtmlAttributeValue(_) => {}
            NodeKind::Other(o) => self.emit(&o.raw),
        }
    }

    fn visit_text(&mut self, t: &HtmlText) {
        self.emit(&helpers::collapse_whitespace(&t.content));
    }

    fn visit_element(&mut self, node: &'a Node) {
        let NodeKind::HtmlElement(el) = &node.kind else {
            return;
        };
        self.element_stack.push(node);

        let preserved = helpers::is_content_preserving_element(&el.tag_name);
        let analysis = if preserved {
            ElementAnalysis {
                open_tag_inline: analysis::open_tag_would_be_inline(self, &el.open_tag),
                ..ElementAnalysis::all_inline()
            }
        } else {
            self.element_analysis(node.id, el)
        };

        html::render_open_tag(self, &el.open_tag, analysis, el.is_void);

        if !el.is_void {
            if preserved {
                self.render_preserved_body(el);
            } else {
                let id = node.id;
                let body = &el.body;
                self.track_boundary(id, |p| p.dispatch_body(body, analysis));
            }
            if let Some(close) = &el.close_tag {
                html::render_close_tag(self, close, analysis);
            }
        }

        self.element_stack.pop();
    }

    /// Looks up or computes this element's cached analysis, installing the
    /// in-progress sentinel around the (possibly recursive) speculative
    /// render — §4.3/§9.
    fn element_analysis(&mut self, id: NodeId, el: &'a HtmlElement) -> ElementAnalysis {
        match self.analysis_cache.get(&id) {
            Some(CacheSlot::Done(a)) => *a,
            Some(CacheSlot::InProgress) => {
                // Can't safely re-enter this element's analysis. If we've
                // already rendered its body once this run, trust that
                // outcome instead of blindly forcing everything inline.
                match self.node_is_multiline.get(&id) {
                    Some(true) => {
                        trace_debug!(node_id = id.0, "recursive element analysis, falling back to last known multiline layout");
                        ElementAnalysis::default()
                    }
                    _ => {
                        trace_debug!(node_id = id.0, "recursive element analysis, falling back to inline");
                        ElementAnalysis::all_inline()
                    }
                }
            }
            None => {
                self.analysis_cache.insert(id, CacheSlot::InProgress);
                let result = analysis::analyze(self, el);
                self.analysis_cache.insert(id, CacheSlot::Done(result));
                result
            }
        }
    }

    /// Body dispatcher — §4.7.
    fn dispatch_body(&mut self, children: &'a [Node], analysis: ElementAnalysis) {
        if analysis.content_inline {
            self.with_inline_mode(|p| {
                for child in children {
                    p.visit(child);
                }
            });
            return;
        }

        if helpers::in_text_flow_context(children) {
            self.with_indent(|p| text_flow::run(p, children));
            return;
        }

        self.with_indent(|p| {
            for (i, child) in children.iter().enumerate() {
                if helpers::pure_whitespace_node(child) {
                    if helpers::is_user_blank_line(child) {
                        let has_before = children[..i].iter().any(helpers::non_whitespace_node);
                        let has_after = children[i + 1..].iter().any(helpers::non_whitespace_node);
                        if has_before && has_after {
                            trace_debug!("preserving one user blank line");
                            p.buf.push_with_indent("");
                        }
                    }
                    continue;
                }
                p.visit(child);
            }
        });
    }

    /// Preserved-element body: the byte span between the open tag's end and
    /// the close tag's start, emitted untouched (§8's byte-identity
    /// property). Falls back to reconstructing from the typed child nodes
    /// when locations are unavailable (hand-built trees in tests).
    fn render_preserved_body(&mut self, el: &'a HtmlElement) {
        if let Some(close) = &el.close_tag {
            let start = el.open_tag.location.end_byte as usize;
            let end = close.location.start_byte as usize;
            if end > start && end <= self.ctx.source.len() && self.ctx.source.is_char_boundary(start) && self.ctx.source.is_char_boundary(end) {
                let body = self.ctx.source[start..end].to_string();
                self.append_verbatim(&body);
                return;
            }
        }
        for child in &el.body {
            let text = verbatim_text(child);
            self.append_verbatim(&text);
        }
    }
}

fn verbatim_text(node: &Node) -> String {
    match &node.kind {
        NodeKind::HtmlText(t) => t.content.clone(),
        NodeKind::Whitespace(w) => w.value.clone(),
        NodeKind::Literal(l) => l.content.clone(),
        NodeKind::ErbContent(e) => format!("{}{}{}", e.tag_opening, e.content, e.tag_closing),
        NodeKind::Other(o) => o.raw.clone(),
        _ => String::new(),
    }
}

/// Formats `ast` under `ctx`, returning the canonical source string.
///
/// The sole public entry point (§6). Callers responsible for the
/// `herb:formatter ignore` directive (§6, "Detection is performed by a
/// collaborator before the core runs") should check
/// `helpers::contains_formatter_ignore_directive` themselves and skip
/// calling this function entirely when it matches.
pub fn format<'a>(ast: &'a Node, ctx: &FormatContext<'a>) -> String {
    let printer = Printer::new(*ctx);
    printer.run(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::TreeBuilder;

    fn ctx(source: &str) -> FormatContext<'_> {
        FormatContext::new("test.erb", source, 2, 80)
    }

    #[test]
    fn empty_document_formats_to_empty_string() {
        let mut b = TreeBuilder::new();
        let doc = b.document(vec![]);
        let out = format(&doc, &ctx(""));
        assert_eq!(out, "");
    }

    #[test]
    fn simple_block_element_wraps_inline_child() {
        let mut b = TreeBuilder::new();
        let p = b.element("p", vec![], vec![b.html_text("Hello")], false);
        let doc = b.document(vec![p]);
        let out = format(&doc, &ctx(""));
        assert_eq!(out, "<p>Hello</p>");
    }

    #[test]
    fn nested_block_elements_indent_and_wrap() {
        let mut b = TreeBuilder::new();
        let inner = b.element("p", vec![], vec![b.html_text("Hello")], false);
        let outer = b.element("div", vec![], vec![inner], false);
        let doc = b.document(vec![outer]);
        let out = format(&doc, &ctx(""));
        assert_eq!(out, "<div>\n  <p>Hello</p>\n</div>");
    }

    #[test]
    fn void_element_has_no_close_tag_in_output() {
        let mut b = TreeBuilder::new();
        let br = b.void_element("br", vec![]);
        let doc = b.document(vec![br]);
        let out = format(&doc, &ctx(""));
        assert_eq!(out, "<br />");
    }

    #[test]
    fn erb_output_tag_gets_normalized_spacing() {
        let mut b = TreeBuilder::new();
        let erb = b.erb_output("@user.name");
        let span = b.element("span", vec![], vec![erb], false);
        let doc = b.document(vec![span]);
        let out = format(&doc, &ctx(""));
        assert_eq!(out, "<span><%= @user.name %></span>");
    }
}
