use domxpath_core::{DomNode, Node, NodeType};

use crate::attr_node::AttrNode;
use crate::error::Error;

/// A query result: a tree node or an attribute pseudo-node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum XPathNode {
    Node(Node),
    Attribute(AttrNode),
}

impl XPathNode {
    pub fn node_type(&self) -> NodeType {
        match self {
            XPathNode::Node(node) => node.node_type(),
            XPathNode::Attribute(attr) => attr.node_type(),
        }
    }

    pub fn node_name(&self) -> &str {
        match self {
            XPathNode::Node(node) => node.node_name(),
            XPathNode::Attribute(attr) => attr.node_name(),
        }
    }

    /// The navigator's value for this node: the doctype name, the
    /// instruction target, character data, or text content otherwise.
    pub fn value(&self) -> String {
        let node = match self {
            XPathNode::Node(node) => node,
            XPathNode::Attribute(attr) => return attr.value(),
        };
        match node.node_type() {
            NodeType::CharacterData | NodeType::Comment => node.data().unwrap_or_default(),
            NodeType::DocumentType => node.doctype_name().unwrap_or_default().to_string(),
            NodeType::ProcessingInstruction => node.target().unwrap_or_default().to_string(),
            _ => node.text_content(),
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            XPathNode::Node(node) => node.text_content(),
            XPathNode::Attribute(attr) => attr.value(),
        }
    }

    pub fn set_text_content(&self, value: &str) -> Result<(), Error> {
        match self {
            XPathNode::Node(node) => node.set_text_content(value)?,
            XPathNode::Attribute(attr) => attr.set_text_content(value)?,
        }
        Ok(())
    }

    /// Tree parent, or the owning element for an attribute.
    pub fn parent(&self) -> Option<Node> {
        match self {
            XPathNode::Node(node) => node.parent(),
            XPathNode::Attribute(attr) => Some(attr.owner_element().clone()),
        }
    }

    /// The element carrying an attribute; `None` for tree nodes.
    pub fn owner(&self) -> Option<&Node> {
        self.as_attribute().map(AttrNode::owner_element)
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            XPathNode::Node(node) => Some(node),
            XPathNode::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttrNode> {
        match self {
            XPathNode::Attribute(attr) => Some(attr),
            XPathNode::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            XPathNode::Node(node) => Some(node),
            XPathNode::Attribute(_) => None,
        }
    }
}

impl From<Node> for XPathNode {
    fn from(node: Node) -> Self {
        XPathNode::Node(node)
    }
}

impl From<AttrNode> for XPathNode {
    fn from(attr: AttrNode) -> Self {
        XPathNode::Attribute(attr)
    }
}
