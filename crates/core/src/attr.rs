use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, Weak};

use crate::node::{Inner, Node, read, write};

/// Name parts of an element or attribute.
///
/// The qualified form (`prefix:local`) is computed once so that node names can
/// be handed out as borrowed strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    prefix: Option<String>,
    local_name: String,
    namespace_uri: Option<String>,
    qualified: String,
}

impl QualifiedName {
    /// Splits `qualified` at the first `:` into prefix and local name; no namespace.
    pub fn new(qualified: &str) -> Self {
        Self::with_namespace(None, qualified)
    }

    pub fn with_namespace(namespace_uri: Option<&str>, qualified: &str) -> Self {
        let (prefix, local_name) = match qualified.split_once(':') {
            Some((p, l)) if !p.is_empty() && !l.is_empty() => (Some(p.to_string()), l.to_string()),
            _ => (None, qualified.to_string()),
        };
        Self {
            prefix,
            local_name,
            namespace_uri: namespace_uri.filter(|ns| !ns.is_empty()).map(str::to_string),
            qualified: qualified.to_string(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

pub(crate) struct AttrInner {
    name: QualifiedName,
    value: RwLock<String>,
    owner: RwLock<Weak<Inner>>,
}

/// An attribute stored on an element.
///
/// Attributes are not tree members: they have no parent, siblings or children,
/// only a non-owning back-reference to the element that carries them.
/// Equality is identity of the underlying attribute.
#[derive(Clone)]
pub struct Attr(Arc<AttrInner>);

impl Attr {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self::from_name(QualifiedName::new(name), value)
    }

    pub fn new_ns(namespace_uri: Option<&str>, qualified: &str, value: impl Into<String>) -> Self {
        Self::from_name(QualifiedName::with_namespace(namespace_uri, qualified), value)
    }

    pub fn from_name(name: QualifiedName, value: impl Into<String>) -> Self {
        Attr(Arc::new(AttrInner {
            name,
            value: RwLock::new(value.into()),
            owner: RwLock::new(Weak::new()),
        }))
    }

    pub fn qualified_name(&self) -> &QualifiedName {
        &self.0.name
    }

    /// Qualified name (`prefix:local` or `local`).
    pub fn name(&self) -> &str {
        self.0.name.qualified()
    }

    pub fn local_name(&self) -> &str {
        self.0.name.local_name()
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.0.name.namespace_uri()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.0.name.prefix()
    }

    pub fn value(&self) -> String {
        read(&self.0.value).clone()
    }

    /// Replaces the value. Changing an `id` attribute invalidates the owning
    /// document's identifier index.
    pub fn set_value(&self, value: impl Into<String>) {
        *write(&self.0.value) = value.into();
        if self.is_id()
            && let Some(owner) = self.owner_element()
        {
            owner.invalidate_ids();
        }
    }

    pub fn owner_element(&self) -> Option<Node> {
        read(&self.0.owner).upgrade().map(Node)
    }

    pub(crate) fn is_id(&self) -> bool {
        self.0.name.namespace_uri().is_none() && self.0.name.qualified() == "id"
    }

    pub(crate) fn set_owner(&self, owner: Option<&Node>) {
        *write(&self.0.owner) = owner.map_or_else(Weak::new, |n| Arc::downgrade(&n.0));
    }

    pub(crate) fn duplicate(&self) -> Attr {
        Attr::from_name(self.0.name.clone(), self.value())
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Attr {}

impl Hash for Attr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attr")
            .field("name", &self.name())
            .field("namespace_uri", &self.namespace_uri())
            .field("value", &self.value())
            .finish()
    }
}
