// Tree construction helpers.
//
// The printer consumes trees built by an upstream parser (out of scope for
// this crate). `TreeBuilder` stands in for that parser in tests and in any
// embedder that wants to hand-construct a tree — it owns the `NodeId`
// counter so identity assignment carries no global state (every real parser
// would do the same while walking its own input).
//
// Nodes built here carry a default (zeroed) `Location` unless constructed
// via `TreeBuilder::at`, since hand-built test trees rarely need source
// positions — callers that do (e.g. to exercise the `Other` passthrough, or
// multiline open-tag detection) set them explicitly.

use super::*;

pub struct TreeBuilder {
    next_id: u32,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    fn id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn node(&mut self, kind: NodeKind) -> Node {
        Node {
            id: self.id(),
            location: Location::default(),
            kind,
        }
    }

    /// Like the plain constructor, but with an explicit source location —
    /// for tests exercising location-sensitive behavior (multiline open
    /// tags, the `Other` verbatim fallback).
    pub fn at(&mut self, kind: NodeKind, location: Location) -> Node {
        Node {
            id: self.id(),
            location,
            kind,
        }
    }

    pub fn document(&mut self, children: Vec<Node>) -> Node {
        self.node(NodeKind::Document(Document { children }))
    }

    pub fn html_text(&mut self, content: &str) -> Node {
        self.node(NodeKind::HtmlText(HtmlText {
            content: content.to_string(),
        }))
    }

    pub fn whitespace(&mut self, value: &str) -> Node {
        self.node(NodeKind::Whitespace(Whitespace {
            value: value.to_string(),
        }))
    }

    pub fn literal(&mut self, content: &str) -> Node {
        self.node(NodeKind::Literal(Literal {
            content: content.to_string(),
        }))
    }

    pub fn erb_content(&mut self, tag_opening: &str, content: &str, tag_closing: &str) -> Node {
        self.node(NodeKind::ErbContent(ErbContent {
            tag_opening: tag_opening.to_string(),
            content: content.to_string(),
            tag_closing: tag_closing.to_string(),
        }))
    }

    pub fn erb_output(&mut self, content: &str) -> Node {
        self.erb_content("<%=", content, "%>")
    }

    pub fn erb_statement(&mut self, content: &str) -> Node {
        self.erb_content("<%", content, "%>")
    }

    pub fn erb_comment(&mut self, content: &str) -> Node {
        self.erb_content("<%#", content, "%>")
    }

    pub fn erb_end(&mut self) -> Node {
        self.node(NodeKind::ErbEnd(ErbEnd {
            tag_opening: "<%".to_string(),
            content: "end".to_string(),
            tag_closing: "%>".to_string(),
        }))
    }

    pub fn attribute_name(&mut self, name: &str) -> Node {
        let literal = self.literal(name);
        self.node(NodeKind::HtmlAttributeName(HtmlAttributeName {
            children: vec![literal],
        }))
    }

    pub fn attribute_value(&mut self, quote: char, children: Vec<Node>) -> Node {
        self.node(NodeKind::HtmlAttributeValue(HtmlAttributeValue {
            open_quote: quote.to_string(),
            children,
            close_quote: quote.to_string(),
        }))
    }

    pub fn attribute_value_text(&mut self, quote: char, text: &str) -> Node {
        let literal = self.literal(text);
        self.attribute_value(quote, vec![literal])
    }

    pub fn attribute(&mut self, name: &str, value: Option<Node>) -> Node {
        let name = self.attribute_name(name);
        self.node(NodeKind::HtmlAttribute(HtmlAttribute {
            name: Box::new(name),
            value: value.map(Box::new),
        }))
    }

    /// Convenience: `name="text"` with the default double quote.
    pub fn attr(&mut self, name: &str, text: &str) -> Node {
        let value = self.attribute_value_text('"', text);
        self.attribute(name, Some(value))
    }

    pub fn open_tag(&mut self, tag_name: &str, children: Vec<Node>, tag_closing: &str) -> Node {
        self.node(NodeKind::HtmlOpenTag(HtmlOpenTag {
            tag_opening: "<".to_string(),
            tag_name: tag_name.to_string(),
            children,
            tag_closing: tag_closing.to_string(),
        }))
    }

    pub fn close_tag(&mut self, tag_name: &str) -> Node {
        self.node(NodeKind::HtmlCloseTag(HtmlCloseTag {
            tag_opening: "</".to_string(),
            tag_name: tag_name.to_string(),
            tag_closing: ">".to_string(),
        }))
    }

    /// Interleaves a leading space before each attribute, matching the
    /// whitespace-as-sibling-node shape the rest of the tree uses.
    fn spaced(&mut self, attrs: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::with_capacity(attrs.len() * 2);
        for attr in attrs {
            out.push(self.whitespace(" "));
            out.push(attr);
        }
        out
    }

    pub fn element(&mut self, tag_name: &str, attrs: Vec<Node>, body: Vec<Node>, void: bool) -> Node {
        let children = self.spaced(attrs);
        let closing = if void { "/>" } else { ">" };
        let open = self.open_tag(tag_name, children, closing);
        let close = if void {
            None
        } else {
            Some(Box::new(self.close_tag(tag_name)))
        };
        self.node(NodeKind::HtmlElement(HtmlElement {
            tag_name: tag_name.to_string(),
            is_void: void,
            open_tag: Box::new(open),
            body,
            close_tag: close,
        }))
    }

    pub fn void_element(&mut self, tag_name: &str, attrs: Vec<Node>) -> Node {
        self.element(tag_name, attrs, vec![], true)
    }

    pub fn erb_if(&mut self, condition: &str, statements: Vec<Node>, subsequent: Option<Node>) -> Node {
        let end = self.erb_end();
        self.node(NodeKind::ErbIf(ErbIf {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            statements,
            subsequent: subsequent.map(Box::new),
            end_node: Box::new(end),
        }))
    }

    pub fn erb_elsif(&mut self, condition: &str, statements: Vec<Node>, subsequent: Option<Node>) -> Node {
        self.node(NodeKind::ErbElse(ErbElse {
            tag_opening: "<%".to_string(),
            condition: Some(condition.to_string()),
            tag_closing: "%>".to_string(),
            statements,
            subsequent: subsequent.map(Box::new),
        }))
    }

    pub fn erb_else(&mut self, statements: Vec<Node>) -> Node {
        self.node(NodeKind::ErbElse(ErbElse {
            tag_opening: "<%".to_string(),
            condition: None,
            tag_closing: "%>".to_string(),
            statements,
            subsequent: None,
        }))
    }

    pub fn erb_unless(&mut self, condition: &str, statements: Vec<Node>, else_clause: Option<Node>) -> Node {
        let end = self.erb_end();
        self.node(NodeKind::ErbUnless(ErbUnless {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            statements,
            else_clause: else_clause.map(Box::new),
            end_node: Box::new(end),
        }))
    }

    pub fn erb_when(&mut self, condition: &str, statements: Vec<Node>) -> Node {
        self.node(NodeKind::ErbWhen(ErbWhen {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            statements,
        }))
    }

    pub fn erb_in(&mut self, condition: &str, statements: Vec<Node>) -> Node {
        self.node(NodeKind::ErbIn(ErbWhen {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            statements,
        }))
    }

    fn case_like(
        &mut self,
        condition: Option<&str>,
        children: Vec<Node>,
        conditions: Vec<Node>,
        else_clause: Option<Node>,
    ) -> ErbCase {
        let end = self.erb_end();
        ErbCase {
            tag_opening: "<%".to_string(),
            condition: condition.map(str::to_string),
            tag_closing: "%>".to_string(),
            children,
            conditions,
            else_clause: else_clause.map(Box::new),
            end_node: Box::new(end),
        }
    }

    pub fn erb_case(
        &mut self,
        condition: Option<&str>,
        children: Vec<Node>,
        conditions: Vec<Node>,
        else_clause: Option<Node>,
    ) -> Node {
        let inner = self.case_like(condition, children, conditions, else_clause);
        self.node(NodeKind::ErbCase(inner))
    }

    pub fn erb_case_match(
        &mut self,
        condition: Option<&str>,
        children: Vec<Node>,
        conditions: Vec<Node>,
        else_clause: Option<Node>,
    ) -> Node {
        let inner = self.case_like(condition, children, conditions, else_clause);
        self.node(NodeKind::ErbCaseMatch(inner))
    }

    fn loop_like(&mut self, condition: &str, statements: Vec<Node>) -> ErbLoop {
        let end = self.erb_end();
        ErbLoop {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            statements,
            end_node: Box::new(end),
        }
    }

    pub fn erb_for(&mut self, condition: &str, statements: Vec<Node>) -> Node {
        let inner = self.loop_like(condition, statements);
        self.node(NodeKind::ErbFor(inner))
    }

    pub fn erb_while(&mut self, condition: &str, statements: Vec<Node>) -> Node {
        let inner = self.loop_like(condition, statements);
        self.node(NodeKind::ErbWhile(inner))
    }

    pub fn erb_until(&mut self, condition: &str, statements: Vec<Node>) -> Node {
        let inner = self.loop_like(condition, statements);
        self.node(NodeKind::ErbUntil(inner))
    }

    pub fn erb_block(&mut self, condition: &str, body: Vec<Node>) -> Node {
        let end = self.erb_end();
        self.node(NodeKind::ErbBlock(ErbBlock {
            tag_opening: "<%".to_string(),
            condition: condition.to_string(),
            tag_closing: "%>".to_string(),
            body,
            end_node: Box::new(end),
        }))
    }

    pub fn other(&mut self, raw: &str) -> Node {
        self.node(NodeKind::Other(OtherNode {
            raw: raw.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_assigned_in_allocation_order() {
        let mut b = TreeBuilder::new();
        let a = b.html_text("a");
        let c = b.html_text("b");
        assert_eq!(a.id.0 + 1, c.id.0);
    }

    #[test]
    fn element_builds_matching_open_and_close_tag_names() {
        let mut b = TreeBuilder::new();
        let el = b.element("div", vec![], vec![], false);
        let NodeKind::HtmlElement(ref inner) = el.kind else {
            panic!("expected element");
        };
        let NodeKind::HtmlOpenTag(ref open) = inner.open_tag.kind else {
            panic!("expected open tag");
        };
        assert_eq!(open.tag_name, "div");
        assert!(inner.close_tag.is_some());
    }

    #[test]
    fn void_element_has_no_close_tag() {
        let mut b = TreeBuilder::new();
        let el = b.void_element("br", vec![]);
        let NodeKind::HtmlElement(ref inner) = el.kind else {
            panic!("expected element");
        };
        assert!(inner.close_tag.is_none());
        assert!(inner.is_void);
    }
}
