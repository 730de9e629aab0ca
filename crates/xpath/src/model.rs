use std::collections::HashMap;

/// Node kinds as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XPathNodeType {
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// Pull-based cursor protocol the evaluator runs on.
///
/// A navigator is a mutable position inside one tree. Movement methods return
/// `false` and leave the position untouched when the move is impossible.
/// Clones are independent positions over the same tree.
///
/// Attributes are reached only through [`move_to_first_attribute`] and
/// [`move_to_next_attribute`]; while positioned on an attribute,
/// [`move_to_parent`] returns to the owning element. [`is_same_position`]
/// compares the underlying tree nodes and may disregard attribute positions.
///
/// [`move_to_first_attribute`]: XPathNavigator::move_to_first_attribute
/// [`move_to_next_attribute`]: XPathNavigator::move_to_next_attribute
/// [`move_to_parent`]: XPathNavigator::move_to_parent
/// [`is_same_position`]: XPathNavigator::is_same_position
pub trait XPathNavigator: Clone {
    /// Interned name. Names obtained from the same navigator (or its clones)
    /// compare equal exactly when their text is equal.
    type Name: Clone + Eq + AsRef<str>;
    type Error: std::error::Error + Send + Sync + 'static;

    fn node_type(&self) -> Result<XPathNodeType, Self::Error>;
    fn local_name(&self) -> Self::Name;
    fn name(&self) -> Self::Name;
    fn namespace_uri(&self) -> Self::Name;
    fn prefix(&self) -> Self::Name;
    /// String value of the current position.
    fn value(&self) -> Result<String, Self::Error>;
    fn base_uri(&self) -> Option<String>;
    fn has_attributes(&self) -> bool;
    fn is_empty_element(&self) -> bool;

    /// Interns `s` in the navigator's name table.
    fn atomize(&self, s: &str) -> Self::Name;

    fn move_to_first_child(&mut self) -> bool;
    fn move_to_next(&mut self) -> bool;
    fn move_to_previous(&mut self) -> bool;
    fn move_to_parent(&mut self) -> bool;
    fn move_to_first_attribute(&mut self) -> bool;
    fn move_to_next_attribute(&mut self) -> bool;
    fn move_to_first_namespace(&mut self) -> bool {
        false
    }
    fn move_to_next_namespace(&mut self) -> bool {
        false
    }
    fn move_to_id(&mut self, id: &str) -> bool;
    fn move_to_root(&mut self);
    /// Copies the position of `other` when both navigate the same tree.
    fn move_to(&mut self, other: &Self) -> bool;
    fn is_same_position(&self, other: &Self) -> bool;

    /// Number of siblings before the current node, used to order results.
    /// The default walks [`move_to_previous`](XPathNavigator::move_to_previous);
    /// trees that know child positions should answer directly.
    fn sibling_position(&self) -> usize {
        let mut sibling = self.clone();
        let mut index = 0;
        while sibling.move_to_previous() {
            index += 1;
        }
        index
    }
}

/// Resolves namespace prefixes used in expressions.
pub trait NamespaceResolver {
    fn lookup_namespace(&self, prefix: &str) -> Option<String>;
}

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix to namespace-URI bindings. The `xml` prefix is always bound.
#[derive(Debug, Clone, Default)]
pub struct NamespaceManager {
    by_prefix: HashMap<String, String>,
}

impl NamespaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.add_namespace(prefix, uri);
        self
    }

    pub fn add_namespace(&mut self, prefix: &str, uri: &str) {
        self.by_prefix.insert(prefix.to_string(), uri.to_string());
    }
}

impl NamespaceResolver for NamespaceManager {
    fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        match self.by_prefix.get(prefix) {
            Some(uri) => Some(uri.clone()),
            None if prefix == "xml" => Some(XML_NAMESPACE.to_string()),
            None => None,
        }
    }
}

impl<F> NamespaceResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup_namespace(&self, prefix: &str) -> Option<String> {
        self(prefix)
    }
}
