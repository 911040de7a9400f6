// ERB+HTML syntax tree — consumed, not produced, by this crate.
//
// A parser (out of scope here) builds trees out of these types; the printer
// (`crate::printer`) borrows them for the duration of a `format()` call and
// never mutates them. `ast::builder` stands in for that parser in tests and
// examples.

pub mod builder;

/// 1-based line numbers and byte offsets into the original source.
///
/// Byte offsets back the verbatim-passthrough fallback for `NodeKind::Other`
/// (see `crate::printer` dispatch) and aren't otherwise interpreted by the
/// printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: u32,
    pub end_byte: u32,
}

impl Location {
    pub fn is_multiline(&self) -> bool {
        self.end_line != self.start_line
    }
}

/// Stable node identity, assigned by whoever builds the tree.
///
/// Used as the key for the element analyzer's cache and the multiline map —
/// see `crate::printer::Printer`. Rust's ownership makes pointer identity
/// awkward to rely on across a tree that is freely moved and borrowed, so
/// identity is an explicit field instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// A node in the ERB+HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub location: Location,
    pub kind: NodeKind,
}

impl Node {
    /// Every direct child of this node, in source order.
    ///
    /// Mirrors the `child_nodes` every AST node is documented to expose.
    /// Convenience views used by individual handlers (e.g. an element's
    /// `body`) read the typed fields directly instead of filtering this.
    pub fn child_nodes(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Document(n) => n.children.iter().collect(),
            NodeKind::HtmlElement(n) => {
                let mut out = vec![n.open_tag.as_ref()];
                out.extend(n.body.iter());
                if let Some(close) = &n.close_tag {
                    out.push(close.as_ref());
                }
                out
            }
            NodeKind::HtmlOpenTag(n) => n.children.iter().collect(),
            NodeKind::HtmlCloseTag(_) => vec![],
            NodeKind::HtmlAttribute(n) => {
                let mut out = vec![n.name.as_ref()];
                if let Some(v) = &n.value {
                    out.push(v.as_ref());
                }
                out
            }
            NodeKind::HtmlAttributeName(n) => n.children.iter().collect(),
            NodeKind::HtmlAttributeValue(n) => n.children.iter().collect(),
            NodeKind::HtmlText(_) | NodeKind::Whitespace(_) | NodeKind::Literal(_) => vec![],
            NodeKind::ErbContent(_) | NodeKind::ErbEnd(_) => vec![],
            NodeKind::ErbIf(n) => {
                let mut out: Vec<&Node> = n.statements.iter().collect();
                if let Some(s) = &n.subsequent {
                    out.push(s.as_ref());
                }
                out.push(n.end_node.as_ref());
                out
            }
            NodeKind::ErbUnless(n) => {
                let mut out: Vec<&Node> = n.statements.iter().collect();
                if let Some(e) = &n.else_clause {
                    out.push(e.as_ref());
                }
                out.push(n.end_node.as_ref());
                out
            }
            NodeKind::ErbElse(n) => {
                let mut out: Vec<&Node> = n.statements.iter().collect();
                if let Some(s) = &n.subsequent {
                    out.push(s.as_ref());
                }
                out
            }
            NodeKind::ErbCase(n) | NodeKind::ErbCaseMatch(n) => {
                let mut out: Vec<&Node> = n.children.iter().collect();
                out.extend(n.conditions.iter());
                if let Some(e) = &n.else_clause {
                    out.push(e.as_ref());
                }
                out.push(n.end_node.as_ref());
                out
            }
            NodeKind::ErbWhen(n) | NodeKind::ErbIn(n) => n.statements.iter().collect(),
            NodeKind::ErbFor(n) | NodeKind::ErbWhile(n) | NodeKind::ErbUntil(n) => {
                let mut out: Vec<&Node> = n.statements.iter().collect();
                out.push(n.end_node.as_ref());
                out
            }
            NodeKind::ErbBlock(n) => {
                let mut out: Vec<&Node> = n.body.iter().collect();
                out.push(n.end_node.as_ref());
                out
            }
            NodeKind::Other(_) => vec![],
        }
    }
}

/// The tagged union of every node kind in §3 of the specification this
/// crate implements, plus `Other` for forward compatibility with parser
/// node kinds this printer doesn't special-case.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document(Document),

    HtmlElement(HtmlElement),
    HtmlOpenTag(HtmlOpenTag),
    HtmlCloseTag(HtmlCloseTag),
    HtmlAttribute(HtmlAttribute),
    HtmlAttributeName(HtmlAttributeName),
    HtmlAttributeValue(HtmlAttributeValue),
    HtmlText(HtmlText),

    Whitespace(Whitespace),
    Literal(Literal),

    ErbContent(ErbContent),
    ErbEnd(ErbEnd),
    ErbIf(ErbIf),
    ErbUnless(ErbUnless),
    ErbElse(ErbElse),
    ErbCase(ErbCase),
    ErbCaseMatch(ErbCase),
    ErbWhen(ErbWhen),
    ErbIn(ErbWhen),
    ErbFor(ErbLoop),
    ErbWhile(ErbLoop),
    ErbUntil(ErbLoop),
    ErbBlock(ErbBlock),

    /// A node kind this printer doesn't know about. `raw` is the verbatim
    /// source span (see `Location`), emitted unchanged.
    Other(OtherNode),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    pub tag_name: String,
    pub is_void: bool,
    pub open_tag: Box<Node>,
    pub body: Vec<Node>,
    pub close_tag: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOpenTag {
    pub tag_opening: String,
    pub tag_name: String,
    /// `HtmlAttribute` and `Whitespace` children, in source order.
    pub children: Vec<Node>,
    pub tag_closing: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlCloseTag {
    pub tag_opening: String,
    pub tag_name: String,
    pub tag_closing: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlAttribute {
    pub name: Box<Node>,
    pub value: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlAttributeName {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlAttributeValue {
    pub open_quote: String,
    /// `Literal` and `ErbContent` children, in source order.
    pub children: Vec<Node>,
    pub close_quote: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlText {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Whitespace {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub content: String,
}

/// An ERB output (`<%=`), statement (`<%`), or comment (`<%#`) tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ErbContent {
    pub tag_opening: String,
    pub content: String,
    pub tag_closing: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbEnd {
    pub tag_opening: String,
    pub content: String,
    pub tag_closing: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbIf {
    pub tag_opening: String,
    pub condition: String,
    pub tag_closing: String,
    pub statements: Vec<Node>,
    /// The next `elsif`/`else` in the chain, if any (itself an `ErbElse`).
    pub subsequent: Option<Box<Node>>,
    pub end_node: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbUnless {
    pub tag_opening: String,
    pub condition: String,
    pub tag_closing: String,
    pub statements: Vec<Node>,
    pub else_clause: Option<Box<Node>>,
    pub end_node: Box<Node>,
}

/// Also used for `elsif` — `condition` is `Some` for an `elsif`, `None` for
/// a plain `else`, and `subsequent` chains further `elsif`/`else` branches.
#[derive(Debug, Clone, PartialEq)]
pub struct ErbElse {
    pub tag_opening: String,
    pub condition: Option<String>,
    pub tag_closing: String,
    pub statements: Vec<Node>,
    pub subsequent: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbCase {
    pub tag_opening: String,
    pub condition: Option<String>,
    pub tag_closing: String,
    /// Content between the `case`/`case ... in` tag and the first
    /// `when`/`in` — a lint offense upstream, but preserved verbatim here.
    pub children: Vec<Node>,
    /// `ErbWhen`/`ErbIn` nodes, in source order.
    pub conditions: Vec<Node>,
    pub else_clause: Option<Box<Node>>,
    pub end_node: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbWhen {
    pub tag_opening: String,
    pub condition: String,
    pub tag_closing: String,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbLoop {
    pub tag_opening: String,
    pub condition: String,
    pub tag_closing: String,
    pub statements: Vec<Node>,
    pub end_node: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErbBlock {
    pub tag_opening: String,
    pub condition: String,
    pub tag_closing: String,
    pub body: Vec<Node>,
    pub end_node: Box<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OtherNode {
    pub raw: String,
}

impl NodeKind {
    /// The HTML element tag name, lowercased, if this is an `HtmlElement`.
    pub fn tag_name_lower(&self) -> Option<String> {
        match self {
            NodeKind::HtmlElement(n) => Some(n.tag_name.to_ascii_lowercase()),
            _ => None,
        }
    }
}
