use std::hash::{Hash, Hasher};

use domxpath_core::{Attr, DomError, DomNode, Node, NodeType};

use crate::error::Error;

/// An attribute presented as a node.
///
/// The document does not treat attributes as tree members, so query results
/// carry this wrapper instead: it pairs the attribute with the element that
/// owns it and reports the owner as its parent. Anything that would change
/// the tree through the wrapper is refused with [`DomError::NotSupported`].
#[derive(Debug, Clone)]
pub struct AttrNode {
    attr: Attr,
    owner: Node,
}

impl AttrNode {
    pub fn new(attr: Attr, owner: Node) -> Result<Self, Error> {
        if attr.owner_element().as_ref() != Some(&owner) {
            return Err(Error::invalid_argument(format!(
                "attribute `{}` is not owned by the given element",
                attr.name()
            )));
        }
        Ok(Self { attr, owner })
    }

    /// Pairs an attribute read from `owner`'s own list.
    pub(crate) fn from_owner(attr: Attr, owner: Node) -> Self {
        Self { attr, owner }
    }

    pub fn attribute(&self) -> &Attr {
        &self.attr
    }

    pub fn owner_element(&self) -> &Node {
        &self.owner
    }

    pub fn name(&self) -> &str {
        self.attr.name()
    }

    pub fn local_name(&self) -> &str {
        self.attr.local_name()
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.attr.namespace_uri()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.attr.prefix()
    }

    pub fn value(&self) -> String {
        self.attr.value()
    }

    pub fn set_value(&self, value: &str) {
        self.attr.set_value(value);
    }
}

impl PartialEq for AttrNode {
    fn eq(&self, other: &Self) -> bool {
        self.attr == other.attr
    }
}

impl Eq for AttrNode {}

impl Hash for AttrNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attr.hash(state);
    }
}

impl DomNode for AttrNode {
    fn node_type(&self) -> NodeType {
        NodeType::Attribute
    }

    fn node_name(&self) -> &str {
        self.attr.name()
    }

    fn local_name(&self) -> Option<&str> {
        Some(self.attr.local_name())
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.attr.namespace_uri()
    }

    fn prefix(&self) -> Option<&str> {
        self.attr.prefix()
    }

    fn base_uri(&self) -> Option<String> {
        None
    }

    fn parent(&self) -> Option<Node> {
        Some(self.owner.clone())
    }

    fn first_child(&self) -> Option<Node> {
        None
    }

    fn last_child(&self) -> Option<Node> {
        None
    }

    fn next_sibling(&self) -> Option<Node> {
        None
    }

    fn previous_sibling(&self) -> Option<Node> {
        None
    }

    fn has_child_nodes(&self) -> bool {
        false
    }

    fn text_content(&self) -> String {
        self.attr.value()
    }

    fn set_text_content(&self, value: &str) -> Result<(), DomError> {
        self.attr.set_value(value);
        Ok(())
    }

    fn append_child(&self, _child: &Node) -> Result<Node, DomError> {
        Err(DomError::NotSupported("append_child"))
    }

    fn insert_before(&self, _child: &Node, _reference: Option<&Node>) -> Result<Node, DomError> {
        Err(DomError::NotSupported("insert_before"))
    }

    fn remove_child(&self, _child: &Node) -> Result<Node, DomError> {
        Err(DomError::NotSupported("remove_child"))
    }

    fn replace_child(&self, _new_child: &Node, _old_child: &Node) -> Result<Node, DomError> {
        Err(DomError::NotSupported("replace_child"))
    }

    fn clone_node(&self, _deep: bool) -> Result<Node, DomError> {
        Err(DomError::NotSupported("clone_node"))
    }

    fn normalize(&self) -> Result<(), DomError> {
        Err(DomError::NotSupported("normalize"))
    }

    fn lookup_namespace_uri(&self, _prefix: Option<&str>) -> Result<Option<String>, DomError> {
        Err(DomError::NotSupported("lookup_namespace_uri"))
    }

    fn lookup_prefix(&self, _namespace_uri: &str) -> Result<Option<String>, DomError> {
        Err(DomError::NotSupported("lookup_prefix"))
    }

    fn is_default_namespace(&self, _namespace_uri: &str) -> Result<bool, DomError> {
        Err(DomError::NotSupported("is_default_namespace"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domxpath_core::builder::{attr, elem};

    #[test]
    fn rejects_foreign_owner() {
        let a = elem("a").attr(attr("href", "#")).build();
        let b = elem("b").build();
        let href = a.attribute_at(0).unwrap();
        assert!(matches!(AttrNode::new(href.clone(), b), Err(Error::InvalidArgument(_))));
        assert!(matches!(AttrNode::new(attr("x", "y"), a.clone()), Err(Error::InvalidArgument(_))));
        assert_eq!(AttrNode::new(href, a.clone()).unwrap().parent(), Some(a));
    }

    #[test]
    fn mutations_are_refused() {
        let a = elem("a").attr(attr("href", "#")).build();
        let node = AttrNode::new(a.attribute_at(0).unwrap(), a.clone()).unwrap();
        let child = elem("span").build();
        assert_eq!(node.append_child(&child), Err(DomError::NotSupported("append_child")));
        assert_eq!(node.clone_node(true), Err(DomError::NotSupported("clone_node")));
        assert_eq!(node.normalize(), Err(DomError::NotSupported("normalize")));
        assert!(node.lookup_prefix("urn:x").is_err());
        assert!(a.children().is_empty());
    }

    #[test]
    fn text_content_writes_through() {
        let a = elem("a").attr(attr("href", "#")).build();
        let node = AttrNode::new(a.attribute_at(0).unwrap(), a.clone()).unwrap();
        node.set_text_content("/home").unwrap();
        assert_eq!(a.get_attribute("href").as_deref(), Some("/home"));
        assert_eq!(node.text_content(), "/home");
    }
}
