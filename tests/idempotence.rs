// Idempotence — §8: `format(format(D,C), C) == format(D,C)`.
//
// There's no parser in this crate (out of scope, see `ast::builder`'s
// module docs), so "format the formatted output" can't be expressed by
// re-parsing a string. What's exercised here instead, for a small corpus of
// representative trees, is the property idempotence actually depends on:
// formatting the same tree twice, with the printer's analysis cache and
// line buffer freshly constructed each time (as `format()` always does),
// yields byte-identical output. A printer whose layout decisions depended
// on anything but the tree and the context would fail this.

use herb_printer::ast::builder::TreeBuilder;
use herb_printer::ast::Node;
use herb_printer::{format, FormatContext};
use pretty_assertions::assert_eq;

fn assert_idempotent(doc: &Node, ctx: &FormatContext<'_>) {
    let first = format(doc, ctx);
    let second = format(doc, ctx);
    assert_eq!(first, second, "formatting the same tree twice produced different output");
}

#[test]
fn nested_elements_are_idempotent() {
    let mut b = TreeBuilder::new();
    let inner = b.element("p", vec![], vec![b.html_text("Hello")], false);
    let outer = b.element("div", vec![b.attr("class", "wrapper")], vec![inner], false);
    let doc = b.document(vec![outer]);
    assert_idempotent(&doc, &FormatContext::new("t.erb", "", 2, 80));
}

#[test]
fn control_flow_with_nested_elements_is_idempotent() {
    let mut b = TreeBuilder::new();
    let link = b.erb_output("link_to \"Admin\", admin_path");
    let p = b.element("p", vec![], vec![link], false);
    let if_node = b.erb_if("current_user.admin?", vec![p], None);
    let doc = b.document(vec![if_node]);
    assert_idempotent(&doc, &FormatContext::new("t.erb", "", 2, 80));
}

#[test]
fn wrapped_class_list_is_idempotent() {
    let mut b = TreeBuilder::new();
    let tokens = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
    let value = b.attribute_value_text('"', tokens);
    let attr = b.attribute("class", Some(value));
    let el = b.element("div", vec![attr], vec![], false);
    let doc = b.document(vec![el]);
    assert_idempotent(&doc, &FormatContext::new("t.erb", "", 2, 40));
}

#[test]
fn text_flow_wrapping_is_idempotent() {
    let mut b = TreeBuilder::new();
    let em = b.element("em", vec![], vec![b.html_text("tag")], false);
    let text = b.html_text("one two three four five six seven eight nine ten eleven twelve ");
    let p = b.element("p", vec![], vec![text, em], false);
    let doc = b.document(vec![p]);
    assert_idempotent(&doc, &FormatContext::new("t.erb", "", 2, 24));
}

#[test]
fn void_and_block_elements_mixed_are_idempotent() {
    let mut b = TreeBuilder::new();
    let img = b.void_element("img", vec![b.attr("src", "/a.png")]);
    let span = b.element("span", vec![], vec![b.html_text("caption")], false);
    let figure = b.element("figure", vec![], vec![img, span], false);
    let doc = b.document(vec![figure]);
    assert_idempotent(&doc, &FormatContext::new("t.erb", "", 2, 80));
}
