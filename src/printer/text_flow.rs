// Text-flow engine — §4.6. Word-wraps a body that mixes text with inline
// elements and ERB output, respecting the line-length budget and pinning
// herb-disable comments to the line they follow.

use crate::ast::{Node, NodeKind};

use crate::trace::trace_debug;

use super::{erb, helpers, Printer};

/// One flowable unit: a word of plain text, an ERB reconstruction, or an
/// entire inline element rendered as a single atomic string.
struct Word {
    text: String,
    is_disable: bool,
}

pub(crate) fn run<'a>(printer: &mut Printer<'a>, children: &'a [Node]) {
    let mut words: Vec<Word> = Vec::new();

    for child in children {
        match &child.kind {
            NodeKind::HtmlText(t) => {
                for w in t.content.split_ascii_whitespace() {
                    words.push(Word {
                        text: w.to_string(),
                        is_disable: false,
                    });
                }
            }
            NodeKind::Whitespace(_) => {}
            NodeKind::HtmlElement(e) if helpers::is_inline_element(&e.tag_name) => {
                let rendered = render_atomic(printer, child);
                words.push(Word {
                    text: rendered,
                    is_disable: false,
                });
            }
            NodeKind::ErbContent(c) => {
                words.push(Word {
                    text: erb::reconstruct(&c.tag_opening, &c.content, &c.tag_closing),
                    is_disable: helpers::herb_disable_comment(child),
                });
            }
            _ => {
                flush(printer, &mut words);
                printer.visit(child);
            }
        }
    }

    flush(printer, &mut words);
}

/// Renders a single inline element (or other node) speculatively as one
/// flowing unit, forcing everything it contains onto one line.
fn render_atomic<'a>(printer: &mut Printer<'a>, node: &'a Node) -> String {
    let captured = printer.with_inline_mode(|p| p.capture(|pp| pp.visit(node)));
    captured.concat()
}

/// Packs the accumulated words into lines within the budget, honoring
/// [`helpers::needs_space_between`] and never wrapping immediately before a
/// herb-disable unit.
fn flush(printer: &mut Printer<'_>, words: &mut Vec<Word>) {
    if words.is_empty() {
        return;
    }
    let indent_width = printer.buf.indent_level * printer.ctx.indent_width;
    let budget = printer.ctx.max_line_length.saturating_sub(indent_width);

    let mut current = String::new();
    for word in words.drain(..) {
        if current.is_empty() {
            current.push_str(&word.text);
            continue;
        }
        let needs_space = helpers::needs_space_between(&current, &word.text);
        let separator = usize::from(needs_space);
        let candidate_len = current.chars().count() + separator + word.text.chars().count();
        if candidate_len > budget && !word.is_disable {
            trace_debug!(budget, candidate_len, "text-flow wrap");
            printer.buf.push_with_indent(&current);
            current = word.text;
        } else {
            if needs_space {
                current.push(' ');
            }
            current.push_str(&word.text);
        }
    }
    if !current.is_empty() {
        printer.buf.push_with_indent(&current);
    }
}
