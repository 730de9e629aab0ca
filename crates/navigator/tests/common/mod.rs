#![allow(dead_code)]

use domxpath_core::Node;
use domxpath_core::builder::{NodeBuilder, attr, comment, doc, doctype, elem_ns, pi, text};

pub const XHTML: &str = "http://www.w3.org/1999/xhtml";

fn h(name: &str) -> NodeBuilder {
    elem_ns(XHTML, name)
}

/// ```text
/// <!DOCTYPE html>
/// <html>
///   <head><title>Test</title></head>
///   <body>
///     <ol id="list"><li>First</li><li class="two" data-n="2">Second</li><li>Third</li></ol>
///     <span>s1</span>
///     <div id="box"><span>inner</span></div>
///     <!--note-->
///     <?render fast?>
///   </body>
/// </html>
/// ```
/// Elements carry the XHTML namespace, as an HTML parser assigns it.
pub fn page() -> Node {
    doc()
        .child(doctype("html"))
        .child(
            h("html")
                .child(h("head").child(h("title").child(text("Test"))))
                .child(
                    h("body")
                        .child(
                            h("ol")
                                .attr(attr("id", "list"))
                                .child(h("li").child(text("First")))
                                .child(
                                    h("li")
                                        .attr(attr("class", "two"))
                                        .attr(attr("data-n", "2"))
                                        .child(text("Second")),
                                )
                                .child(h("li").child(text("Third"))),
                        )
                        .child(h("span").child(text("s1")))
                        .child(h("div").attr(attr("id", "box")).child(h("span").child(text("inner"))))
                        .child(comment("note"))
                        .child(pi("render", "fast")),
                ),
        )
        .base_uri("http://example.com/page.html")
        .build()
}

pub fn texts(nodes: &[domxpath_navigator::XPathNode]) -> Vec<String> {
    nodes.iter().map(domxpath_navigator::XPathNode::text_content).collect()
}
