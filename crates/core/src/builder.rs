//! Builders for quick document construction in tests and prototypes.
//!
//! ```
//! use domxpath_core::builder::{attr, doc, elem, text};
//! use domxpath_core::DomNode;
//!
//! // <ol id="list"><li>First</li><li class="two">Second</li></ol>
//! let document = doc()
//!     .child(
//!         elem("ol")
//!             .attr(attr("id", "list"))
//!             .child(elem("li").child(text("First")))
//!             .child(elem("li").attr(attr("class", "two")).child(text("Second"))),
//!     )
//!     .build();
//!
//! let list = document.get_element_by_id("list").unwrap();
//! assert_eq!(list.text_content(), "FirstSecond");
//! assert_eq!(list.children().len(), 2);
//! ```
use crate::attr::Attr;
use crate::node::Node;

pub struct NodeBuilder {
    node: Node,
    pending_attrs: Vec<Attr>,
    pending_children: Vec<Node>,
}

pub enum NodeOrBuilder {
    Built(Node),
    Builder(NodeBuilder),
}

impl From<Node> for NodeOrBuilder {
    fn from(n: Node) -> Self {
        NodeOrBuilder::Built(n)
    }
}

impl From<NodeBuilder> for NodeOrBuilder {
    fn from(b: NodeBuilder) -> Self {
        NodeOrBuilder::Builder(b)
    }
}

impl NodeOrBuilder {
    fn into_node(self) -> Node {
        match self {
            NodeOrBuilder::Built(n) => n,
            NodeOrBuilder::Builder(b) => b.build(),
        }
    }
}

impl NodeBuilder {
    fn new(node: Node) -> Self {
        Self { node, pending_attrs: Vec::new(), pending_children: Vec::new() }
    }

    /// Adds an attribute. Ignored for nodes that cannot carry attributes.
    #[must_use]
    pub fn attr(mut self, attr: Attr) -> Self {
        self.pending_attrs.push(attr);
        self
    }

    #[must_use]
    pub fn attrs<I: IntoIterator<Item = Attr>>(mut self, attrs: I) -> Self {
        self.pending_attrs.extend(attrs);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<NodeOrBuilder>) -> Self {
        self.pending_children.push(child.into().into_node());
        self
    }

    #[must_use]
    pub fn children<I: IntoIterator<Item = NodeOrBuilder>>(mut self, it: I) -> Self {
        self.pending_children.extend(it.into_iter().map(NodeOrBuilder::into_node));
        self
    }

    /// Sets the base URI of a document builder.
    #[must_use]
    pub fn base_uri(self, uri: &str) -> Self {
        self.node.set_base_uri(Some(uri));
        self
    }

    pub fn build(self) -> Node {
        if self.node.is_element() {
            for a in &self.pending_attrs {
                // Fresh attributes only ever fail when already owned elsewhere.
                if let Err(err) = self.node.set_attribute_node(a) {
                    tracing::warn!(%err, attribute = a.name(), "skipping attribute");
                }
            }
        }
        for c in self.pending_children {
            self.node.push_child(c);
        }
        self.node
    }
}

pub fn doc() -> NodeBuilder {
    NodeBuilder::new(Node::document())
}

pub fn fragment() -> NodeBuilder {
    NodeBuilder::new(Node::fragment())
}

pub fn elem(name: &str) -> NodeBuilder {
    NodeBuilder::new(Node::element(name))
}

pub fn elem_ns(namespace_uri: &str, qualified: &str) -> NodeBuilder {
    NodeBuilder::new(Node::element_ns(namespace_uri, qualified))
}

pub fn attr(name: &str, value: &str) -> Attr {
    Attr::new(name, value)
}

pub fn attr_ns(namespace_uri: &str, qualified: &str, value: &str) -> Attr {
    Attr::new_ns(Some(namespace_uri), qualified, value)
}

pub fn text(data: &str) -> Node {
    Node::text(data)
}

pub fn cdata(data: &str) -> Node {
    Node::cdata(data)
}

pub fn comment(data: &str) -> Node {
    Node::comment(data)
}

pub fn pi(target: &str, data: &str) -> Node {
    Node::processing_instruction(target, data)
}

pub fn doctype(name: &str) -> Node {
    Node::doctype(name)
}
