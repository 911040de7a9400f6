// Benchmarks for the formatting printer.

use criterion::{criterion_group, criterion_main, Criterion};
use herb_printer::ast::builder::TreeBuilder;
use herb_printer::{format, FormatContext};

fn bench_small_document(c: &mut Criterion) {
    let mut b = TreeBuilder::new();
    let link = b.erb_output("link_to \"Admin\", admin_path");
    let p = b.element("p", vec![], vec![link], false);
    let if_node = b.erb_if("current_user.admin?", vec![p], None);
    let wrapper = b.element("div", vec![b.attr("class", "panel")], vec![if_node], false);
    let doc = b.document(vec![wrapper]);
    let ctx = FormatContext::new("bench.html.erb", "", 2, 80);

    c.bench_function("format_small_document", |bencher| {
        bencher.iter(|| format(&doc, &ctx));
    });
}

fn bench_text_flow_heavy_document(c: &mut Criterion) {
    let mut b = TreeBuilder::new();
    let mut children = Vec::new();
    for i in 0..40 {
        children.push(b.html_text(&format!("word{i} ")));
        children.push(b.element("em", vec![], vec![b.html_text("stress")], false));
    }
    let p = b.element("p", vec![], children, false);
    let doc = b.document(vec![p]);
    let ctx = FormatContext::new("bench.html.erb", "", 2, 80);

    c.bench_function("format_text_flow_heavy_document", |bencher| {
        bencher.iter(|| format(&doc, &ctx));
    });
}

criterion_group!(benches, bench_small_document, bench_text_flow_heavy_document);
criterion_main!(benches);
