//! Runs a few queries against a small page.
//!
//! `RUST_LOG=domxpath_navigator=debug cargo run --example domxpath_query`
use domxpath_core::builder::{attr, doc, doctype, elem, text};
use domxpath_navigator::{NodeSelectExt, SelectorConfiguration, XPathNode, query_selector_all};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), domxpath_navigator::Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let document = doc()
        .child(doctype("html"))
        .child(
            elem("html").child(
                elem("body")
                    .child(
                        elem("ol")
                            .attr(attr("id", "list"))
                            .child(elem("li").child(text("First")))
                            .child(elem("li").attr(attr("class", "two")).child(text("Second")))
                            .child(elem("li").child(text("Third"))),
                    )
                    .child(elem("span").child(text("after"))),
            ),
        )
        .build();

    for xpath in ["//li", "//li/@class", "//ol/following::span", "id('list')/li[last()]"] {
        println!("{xpath}");
        for node in document.select_nodes(xpath)? {
            match node {
                XPathNode::Node(node) => println!("  element {node:?}"),
                XPathNode::Attribute(attr) => {
                    println!("  @{}={:?} on {:?}", attr.name(), attr.value(), attr.owner_element());
                }
            }
        }
    }

    let config = SelectorConfiguration::default().with_xpath();
    let matched = query_selector_all(&document, "*[xpath>'//li[2]']", &config)?;
    println!("*[xpath>'//li[2]'] matched {} element(s)", matched.len());
    Ok(())
}
