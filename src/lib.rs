// herb_printer — formatting printer for ERB+HTML syntax trees.
//
// Takes an AST produced by an upstream parser (out of scope here, see
// `ast::builder` for the shape a parser is expected to build) and returns
// canonical formatted source text. The printer is total: it never fails on
// a well-formed tree. The only fallible surface in the crate is
// configuration loading, in `config`.

pub mod ast;
pub mod config;
pub mod error;
pub mod printer;

mod trace;

pub use error::FormatError;
pub use printer::{format, FormatContext};

#[cfg(test)]
mod tests {
    use super::*;
    use ast::builder::TreeBuilder;

    #[test]
    fn formats_a_minimal_document_end_to_end() {
        let mut b = TreeBuilder::new();
        let attr = b.attr("class", "greeting");
        let text = b.html_text("Hello, world!");
        let div = b.element("div", vec![attr], vec![text], false);
        let doc = b.document(vec![div]);

        let ctx = FormatContext::new("greeting.html.erb", "", 2, 80);
        assert_eq!(format(&doc, &ctx), "<div class=\"greeting\">Hello, world!</div>");
    }
}
