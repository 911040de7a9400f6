// End-to-end scenarios built directly against the tree API (there is no
// parser in this crate — trees are built the way an upstream parser would
// build them).

use herb_printer::ast::builder::TreeBuilder;
use herb_printer::ast::{
    Document, ErbEnd, ErbIf, HtmlAttribute, HtmlAttributeName, HtmlAttributeValue, HtmlCloseTag,
    HtmlElement, HtmlOpenTag, Literal, Location, Node, NodeId, NodeKind, Whitespace,
};
use herb_printer::{format, FormatContext};
use pretty_assertions::assert_eq;

fn ctx(source: &str) -> FormatContext<'_> {
    FormatContext::new("view.html.erb", source, 2, 80)
}

#[test]
fn nested_block_elements_indent() {
    let mut b = TreeBuilder::new();
    let inner = b.element("p", vec![], vec![b.html_text("Hello")], false);
    let outer = b.element("div", vec![], vec![inner], false);
    let doc = b.document(vec![outer]);
    assert_eq!(format(&doc, &ctx("")), "<div>\n  <p>Hello</p>\n</div>");
}

#[test]
fn erb_output_spacing_is_normalized() {
    let mut b = TreeBuilder::new();
    let erb = b.erb_output("@user.name");
    let span = b.element("span", vec![], vec![erb], false);
    let doc = b.document(vec![span]);
    assert_eq!(format(&doc, &ctx("")), "<span><%= @user.name %></span>");
}

#[test]
fn if_end_statement_block_indents_its_body() {
    let mut b = TreeBuilder::new();
    let stmt = b.erb_output("link_to \"Admin\", admin_path");
    let if_node = b.erb_if("admin", vec![stmt], None);
    let doc = b.document(vec![if_node]);
    assert_eq!(
        format(&doc, &ctx("")),
        "<% if admin %>\n  <%= link_to \"Admin\", admin_path %>\n<% end %>"
    );
}

#[test]
fn class_attribute_whitespace_collapses_to_single_spaces() {
    // A token-sorting pre-rewriter (out of scope here) is responsible for
    // cleaning up any literal newlines in a class list before this tree is
    // built; what's left for the printer is run-of-spaces collapsing.
    let mut b = TreeBuilder::new();
    let value = b.attribute_value_text('"', "px-4  bg-red-500   text-white");
    let attr = b.attribute("class", Some(value));
    let text = b.html_text("x");
    let el = b.element("div", vec![attr], vec![text], false);
    let doc = b.document(vec![el]);
    assert_eq!(format(&doc, &ctx("")), "<div class=\"px-4 bg-red-500 text-white\">x</div>");
}

#[test]
fn comment_with_no_surrounding_space_gets_one_space_padding() {
    let mut b = TreeBuilder::new();
    let c = b.erb_comment("comment");
    let doc = b.document(vec![c]);
    assert_eq!(format(&doc, &ctx("")), "<%# comment %>");
}

#[test]
fn erb_if_with_attribute_renders_inline_in_open_tag() {
    fn node(id: u32, kind: NodeKind) -> Node {
        Node {
            id: NodeId(id),
            location: Location::default(),
            kind,
        }
    }

    let class_name = node(
        1,
        NodeKind::HtmlAttributeName(HtmlAttributeName {
            children: vec![node(2, NodeKind::Literal(Literal { content: "class".into() }))],
        }),
    );
    let class_value = node(
        3,
        NodeKind::HtmlAttributeValue(HtmlAttributeValue {
            open_quote: "\"".into(),
            children: vec![node(4, NodeKind::Literal(Literal { content: "dis".into() }))],
            close_quote: "\"".into(),
        }),
    );
    let class_attr = node(
        5,
        NodeKind::HtmlAttribute(HtmlAttribute {
            name: Box::new(class_name),
            value: Some(Box::new(class_value)),
        }),
    );

    let end = node(
        6,
        NodeKind::ErbEnd(ErbEnd {
            tag_opening: "<%".into(),
            content: "end".into(),
            tag_closing: "%>".into(),
        }),
    );
    let if_node = node(
        7,
        NodeKind::ErbIf(ErbIf {
            tag_opening: "<%".into(),
            condition: "d".into(),
            tag_closing: "%>".into(),
            statements: vec![class_attr],
            subsequent: None,
            end_node: Box::new(end),
        }),
    );

    let open_children = vec![node(8, NodeKind::Whitespace(Whitespace { value: " ".into() })), if_node];
    let open_tag = node(
        9,
        NodeKind::HtmlOpenTag(HtmlOpenTag {
            tag_opening: "<".into(),
            tag_name: "div".into(),
            children: open_children,
            tag_closing: ">".into(),
        }),
    );
    let close_tag = node(
        10,
        NodeKind::HtmlCloseTag(HtmlCloseTag {
            tag_opening: "</".into(),
            tag_name: "div".into(),
            tag_closing: ">".into(),
        }),
    );
    let el = node(
        11,
        NodeKind::HtmlElement(HtmlElement {
            tag_name: "div".into(),
            is_void: false,
            open_tag: Box::new(open_tag),
            body: vec![],
            close_tag: Some(Box::new(close_tag)),
        }),
    );
    let doc = node(12, NodeKind::Document(Document { children: vec![el] }));

    assert_eq!(format(&doc, &ctx("")), "<div <% if d %> class=\"dis\" <% end %>></div>");
}

#[test]
fn empty_document_formats_to_empty_string() {
    let mut b = TreeBuilder::new();
    let doc = b.document(vec![]);
    assert_eq!(format(&doc, &ctx("")), "");
}

#[test]
fn void_element_has_no_close_tag_and_no_body() {
    let mut b = TreeBuilder::new();
    let img = b.void_element("img", vec![b.attr("src", "/a.png")]);
    let doc = b.document(vec![img]);
    assert_eq!(format(&doc, &ctx("")), "<img src=\"/a.png\" />");
}

#[test]
fn class_value_containing_erb_is_never_split_and_keeps_a_single_quote() {
    let mut b = TreeBuilder::new();
    let erb = b.erb_output("row.active? ? \"active\" : \"\"");
    let value = b.attribute_value('"', vec![erb]);
    let attr = b.attribute("class", Some(value));
    let el = b.element("tr", vec![attr], vec![], false);
    let doc = b.document(vec![el]);
    let out = format(&doc, &ctx(""));
    assert!(!out.contains('\n'));
    assert_eq!(out.matches('"').count() % 2, 0);
}

#[test]
fn preserved_script_body_is_emitted_byte_identical_to_source() {
    let source = "<script>\n  const x = 1;\n</script>";
    let mut b = TreeBuilder::new();
    let open = b.at(
        NodeKind::HtmlOpenTag(HtmlOpenTag {
            tag_opening: "<".into(),
            tag_name: "script".into(),
            children: vec![],
            tag_closing: ">".into(),
        }),
        Location {
            start_line: 1,
            end_line: 1,
            start_byte: 0,
            end_byte: 8,
        },
    );
    let close = b.at(
        NodeKind::HtmlCloseTag(HtmlCloseTag {
            tag_opening: "</".into(),
            tag_name: "script".into(),
            tag_closing: ">".into(),
        }),
        Location {
            start_line: 3,
            end_line: 3,
            start_byte: 24,
            end_byte: 33,
        },
    );
    let body_text = b.html_text("\n  const x = 1;\n");
    let el = b.at(
        NodeKind::HtmlElement(HtmlElement {
            tag_name: "script".into(),
            is_void: false,
            open_tag: Box::new(open),
            body: vec![body_text],
            close_tag: Some(Box::new(close)),
        }),
        Location::default(),
    );
    let doc = b.document(vec![el]);
    assert_eq!(format(&doc, &ctx(source)), source);
}
