//! Cursor over a document for the XPath engine.
//!
//! The document keeps attributes off the tree, so the cursor carries an
//! optional attribute slot next to the current node. While the slot is set the
//! cursor stands on that attribute of the current element. The document node
//! and a document type node are reported as elements so that absolute paths
//! behave the way browsers' `document.evaluate` does.
use std::fmt;
use std::rc::Rc;

use domxpath_core::{Attr, DomNode, Node, NodeType};
use domxpath_xpath::{XPathNavigator, XPathNodeType};

use crate::attr_node::AttrNode;
use crate::error::Error;
use crate::name_table::{Atom, NameTable};
use crate::xpath_node::XPathNode;

/// Whether namespace URIs and prefixes are reported to the engine.
///
/// With [`NamespaceMode::Ignore`] every name reports an empty namespace, so
/// `//li` matches HTML elements regardless of the namespace the parser
/// assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamespaceMode {
    #[default]
    Ignore,
    Aware,
}

#[derive(Clone)]
pub struct DocumentNavigator {
    document: Node,
    current: Node,
    attr_index: Option<usize>,
    names: Rc<NameTable>,
    mode: NamespaceMode,
}

impl DocumentNavigator {
    pub fn new(document: &Node, start: &Node, mode: NamespaceMode) -> Result<Self, Error> {
        Self::with_name_table(document, start, mode, Rc::new(NameTable::new()))
    }

    pub fn with_name_table(
        document: &Node,
        start: &Node,
        mode: NamespaceMode,
        names: Rc<NameTable>,
    ) -> Result<Self, Error> {
        if !document.is_document() {
            return Err(Error::invalid_argument("navigation requires a document node"));
        }
        if start.owner_document().as_ref() != Some(document) {
            return Err(Error::invalid_argument("starting node does not belong to the document"));
        }
        Ok(Self::unchecked(document.clone(), start.clone(), mode, names))
    }

    pub(crate) fn unchecked(document: Node, start: Node, mode: NamespaceMode, names: Rc<NameTable>) -> Self {
        Self { document, current: start, attr_index: None, names, mode }
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    /// The tree node under the cursor; the owning element while on an attribute.
    pub fn current(&self) -> &Node {
        &self.current
    }

    /// The position as a result value: the attribute pseudo-node while the
    /// attribute slot is set, otherwise the tree node.
    pub fn current_node(&self) -> XPathNode {
        match self.current_attribute() {
            Some(attr) => XPathNode::Attribute(AttrNode::from_owner(attr, self.current.clone())),
            None => XPathNode::Node(self.current.clone()),
        }
    }

    pub fn attribute_index(&self) -> Option<usize> {
        self.attr_index
    }

    pub fn namespace_mode(&self) -> NamespaceMode {
        self.mode
    }

    pub fn name_table(&self) -> &Rc<NameTable> {
        &self.names
    }

    fn current_attribute(&self) -> Option<Attr> {
        self.attr_index.and_then(|index| self.current.attribute_at(index))
    }

    fn aware<'a>(&self, value: Option<&'a str>) -> &'a str {
        match self.mode {
            NamespaceMode::Ignore => "",
            NamespaceMode::Aware => value.unwrap_or_default(),
        }
    }

    fn jump(&mut self, node: Node) {
        self.current = node;
        self.attr_index = None;
    }
}

impl fmt::Debug for DocumentNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentNavigator")
            .field("current", &self.current)
            .field("attr_index", &self.attr_index)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl XPathNavigator for DocumentNavigator {
    type Name = Atom;
    type Error = Error;

    fn node_type(&self) -> Result<XPathNodeType, Error> {
        match self.current.node_type() {
            NodeType::Element if self.attr_index.is_some() => Ok(XPathNodeType::Attribute),
            NodeType::Document | NodeType::DocumentType | NodeType::Element => Ok(XPathNodeType::Element),
            NodeType::Text | NodeType::CharacterData => Ok(XPathNodeType::Text),
            NodeType::Comment => Ok(XPathNodeType::Comment),
            NodeType::ProcessingInstruction => Ok(XPathNodeType::ProcessingInstruction),
            kind @ (NodeType::Attribute
            | NodeType::Entity
            | NodeType::EntityReference
            | NodeType::Notation
            | NodeType::DocumentFragment) => Err(Error::UnsupportedNodeKind(kind)),
        }
    }

    fn local_name(&self) -> Atom {
        if let Some(attr) = self.current_attribute() {
            return self.atomize(attr.local_name());
        }
        match self.current.node_type() {
            NodeType::Element => self.atomize(self.current.local_name().unwrap_or_default()),
            _ => self.atomize(self.current.node_name()),
        }
    }

    fn name(&self) -> Atom {
        match self.current_attribute() {
            Some(attr) => self.atomize(attr.name()),
            None => self.atomize(self.current.node_name()),
        }
    }

    fn namespace_uri(&self) -> Atom {
        let uri = match self.current_attribute() {
            Some(attr) => self.aware(attr.namespace_uri()).to_string(),
            None => self.aware(self.current.namespace_uri()).to_string(),
        };
        self.atomize(&uri)
    }

    fn prefix(&self) -> Atom {
        let prefix = match self.current_attribute() {
            Some(attr) => self.aware(attr.prefix()).to_string(),
            None => self.aware(self.current.prefix()).to_string(),
        };
        self.atomize(&prefix)
    }

    fn value(&self) -> Result<String, Error> {
        if let Some(attr) = self.current_attribute() {
            return Ok(attr.value());
        }
        let node = &self.current;
        match node.node_type() {
            NodeType::CharacterData | NodeType::Comment => Ok(node.data().unwrap_or_default()),
            NodeType::Document
            | NodeType::DocumentFragment
            | NodeType::Entity
            | NodeType::EntityReference
            | NodeType::Notation
            | NodeType::Element
            | NodeType::Text => Ok(node.text_content()),
            NodeType::DocumentType => Ok(node.doctype_name().unwrap_or_default().to_string()),
            NodeType::ProcessingInstruction => Ok(node.target().unwrap_or_default().to_string()),
            NodeType::Attribute => Err(Error::UnsupportedNodeKind(NodeType::Attribute)),
        }
    }

    fn base_uri(&self) -> Option<String> {
        self.document.base_uri()
    }

    fn has_attributes(&self) -> bool {
        self.current.is_element() && self.current.attribute_count() > 0
    }

    fn is_empty_element(&self) -> bool {
        !self.current.has_child_nodes()
    }

    fn atomize(&self, s: &str) -> Atom {
        self.names.get_or_add(s)
    }

    fn move_to_first_child(&mut self) -> bool {
        if self.attr_index.is_some() {
            return false;
        }
        match self.current.first_child() {
            Some(child) => {
                self.jump(child);
                true
            }
            None => false,
        }
    }

    fn move_to_next(&mut self) -> bool {
        if self.attr_index.is_some() {
            return false;
        }
        match self.current.next_sibling() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    fn move_to_previous(&mut self) -> bool {
        if self.attr_index.is_some() {
            return false;
        }
        match self.current.previous_sibling() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    fn move_to_parent(&mut self) -> bool {
        if self.attr_index.take().is_some() {
            return true;
        }
        match self.current.parent() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    fn move_to_first_attribute(&mut self) -> bool {
        if !self.has_attributes() {
            return false;
        }
        self.attr_index = Some(0);
        true
    }

    fn move_to_next_attribute(&mut self) -> bool {
        match self.attr_index {
            Some(index) if self.current.is_element() && index + 1 < self.current.attribute_count() => {
                self.attr_index = Some(index + 1);
                true
            }
            _ => false,
        }
    }

    fn move_to_id(&mut self, id: &str) -> bool {
        match self.document.get_element_by_id(id) {
            Some(element) => {
                self.jump(element);
                true
            }
            None => {
                tracing::trace!(id, "no element with identifier");
                false
            }
        }
    }

    fn move_to_root(&mut self) {
        let document = self.document.clone();
        self.jump(document);
    }

    fn move_to(&mut self, other: &Self) -> bool {
        if self.document != other.document {
            tracing::trace!("refusing to move to a position in another document");
            return false;
        }
        self.current = other.current.clone();
        self.attr_index = other.attr_index;
        true
    }

    fn is_same_position(&self, other: &Self) -> bool {
        self.document == other.document && self.current == other.current
    }

    fn sibling_position(&self) -> usize {
        if self.attr_index.is_some() {
            return 0;
        }
        self.current.index_in_parent().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domxpath_core::builder::{attr, doc, elem, text};

    fn page() -> Node {
        doc().child(elem("p").attr(attr("id", "x")).attr(attr("lang", "en")).child(text("hi"))).build()
    }

    #[test]
    fn rejects_start_outside_document() {
        let document = page();
        let stray = elem("div").build();
        assert!(matches!(
            DocumentNavigator::new(&document, &stray, NamespaceMode::Ignore),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DocumentNavigator::new(&stray, &stray, NamespaceMode::Ignore),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn attribute_slot_blocks_tree_moves() {
        let document = page();
        let mut nav = DocumentNavigator::new(&document, &document, NamespaceMode::Ignore).unwrap();
        assert!(nav.move_to_first_child());
        assert!(nav.move_to_first_attribute());
        assert!(!nav.move_to_first_child());
        assert!(!nav.move_to_next());
        assert!(!nav.move_to_previous());
        assert_eq!(nav.attribute_index(), Some(0));
    }

    #[test]
    fn next_attribute_needs_an_attribute() {
        let document = page();
        let mut nav = DocumentNavigator::new(&document, &document, NamespaceMode::Ignore).unwrap();
        assert!(nav.move_to_first_child());
        assert!(!nav.move_to_next_attribute());
        assert!(nav.move_to_first_attribute());
        assert!(nav.move_to_next_attribute());
        assert!(!nav.move_to_next_attribute());
        assert_eq!(nav.name().as_str(), "lang");
    }

    #[test]
    fn names_come_from_the_shared_table() {
        let document = page();
        let nav = DocumentNavigator::new(&document, &document, NamespaceMode::Ignore).unwrap();
        let copy = nav.clone();
        assert_eq!(nav.atomize("p"), copy.atomize("p"));
        assert!(Rc::ptr_eq(nav.name_table(), copy.name_table()));
    }
}
