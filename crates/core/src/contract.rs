//! The node-access contract consumed by tree adapters.
//!
//! Everything a navigator needs from a host document is expressed here:
//! kind, names, tree links, text and the structural mutations a DOM node
//! offers. Implementors that cannot support an operation (attribute
//! pseudo-nodes, for instance) report [`DomError::NotSupported`].

use crate::error::DomError;
use crate::node::{Node, NodeType};

pub trait DomNode {
    fn node_type(&self) -> NodeType;
    /// DOM node name: qualified name for elements and attributes, `#text`,
    /// `#comment`, `#document`, ... for the other kinds.
    fn node_name(&self) -> &str;
    /// Local name of elements and attributes; `None` for other kinds.
    fn local_name(&self) -> Option<&str>;
    fn namespace_uri(&self) -> Option<&str>;
    fn prefix(&self) -> Option<&str>;
    fn base_uri(&self) -> Option<String>;

    fn parent(&self) -> Option<Node>;
    fn first_child(&self) -> Option<Node>;
    fn last_child(&self) -> Option<Node>;
    fn next_sibling(&self) -> Option<Node>;
    fn previous_sibling(&self) -> Option<Node>;
    fn has_child_nodes(&self) -> bool;

    fn text_content(&self) -> String;
    fn set_text_content(&self, value: &str) -> Result<(), DomError>;

    fn append_child(&self, child: &Node) -> Result<Node, DomError>;
    /// Inserts `child` before `reference`, or appends when `reference` is `None`.
    fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<Node, DomError>;
    fn remove_child(&self, child: &Node) -> Result<Node, DomError>;
    /// Replaces `old_child` with `new_child` and returns the removed node.
    fn replace_child(&self, new_child: &Node, old_child: &Node) -> Result<Node, DomError>;
    fn clone_node(&self, deep: bool) -> Result<Node, DomError>;
    /// Merges adjacent text nodes and drops empty ones throughout the subtree.
    fn normalize(&self) -> Result<(), DomError>;

    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Result<Option<String>, DomError>;
    fn lookup_prefix(&self, namespace_uri: &str) -> Result<Option<String>, DomError>;
    fn is_default_namespace(&self, namespace_uri: &str) -> Result<bool, DomError>;
}
