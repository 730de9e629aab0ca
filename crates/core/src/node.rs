use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use crate::attr::{Attr, QualifiedName};
use crate::contract::DomNode;
use crate::error::DomError;

const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// Kind of a node as reported by the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    /// Only reported by attribute pseudo-nodes; attributes are not tree members.
    Attribute,
    Text,
    /// CDATA section.
    CharacterData,
    EntityReference,
    Entity,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
    Notation,
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

type IdIndex = HashMap<String, Weak<Inner>>;

enum NodeData {
    Document { base_uri: RwLock<Option<String>>, ids: RwLock<Option<IdIndex>> },
    DocumentFragment,
    DocumentType { name: String },
    Element { name: QualifiedName, attributes: RwLock<Vec<Attr>> },
    Text(RwLock<String>),
    CData(RwLock<String>),
    Comment(RwLock<String>),
    ProcessingInstruction { target: String, data: RwLock<String> },
    Entity(String),
    EntityReference(String),
    Notation(String),
}

pub(crate) struct Inner {
    data: NodeData,
    parent: RwLock<Weak<Inner>>,
    children: RwLock<Vec<Node>>,
    /// Last known position in the parent's children; verified before use.
    slot: AtomicUsize,
}

/// Handle to a node of a document tree.
///
/// Cloning the handle is cheap and never copies the node; equality and hashing
/// use node identity. Parents are referenced weakly, so the tree is owned from
/// the root downwards.
#[derive(Clone)]
pub struct Node(pub(crate) Arc<Inner>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("type", &self.node_type())
            .field("name", &self.node_name())
            .finish()
    }
}

impl Node {
    fn new(data: NodeData) -> Self {
        Node(Arc::new(Inner {
            data,
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            slot: AtomicUsize::new(0),
        }))
    }

    pub fn document() -> Self {
        Self::new(NodeData::Document {
            base_uri: RwLock::new(None),
            ids: RwLock::new(None),
        })
    }

    pub fn fragment() -> Self {
        Self::new(NodeData::DocumentFragment)
    }

    pub fn doctype(name: &str) -> Self {
        Self::new(NodeData::DocumentType { name: name.to_string() })
    }

    pub fn element(qualified: &str) -> Self {
        Self::element_with_name(QualifiedName::new(qualified))
    }

    pub fn element_ns(namespace_uri: &str, qualified: &str) -> Self {
        Self::element_with_name(QualifiedName::with_namespace(Some(namespace_uri), qualified))
    }

    pub fn element_with_name(name: QualifiedName) -> Self {
        Self::new(NodeData::Element { name, attributes: RwLock::new(Vec::new()) })
    }

    pub fn text(data: &str) -> Self {
        Self::new(NodeData::Text(RwLock::new(data.to_string())))
    }

    pub fn cdata(data: &str) -> Self {
        Self::new(NodeData::CData(RwLock::new(data.to_string())))
    }

    pub fn comment(data: &str) -> Self {
        Self::new(NodeData::Comment(RwLock::new(data.to_string())))
    }

    pub fn processing_instruction(target: &str, data: &str) -> Self {
        Self::new(NodeData::ProcessingInstruction {
            target: target.to_string(),
            data: RwLock::new(data.to_string()),
        })
    }

    pub fn entity(name: &str) -> Self {
        Self::new(NodeData::Entity(name.to_string()))
    }

    pub fn entity_reference(name: &str) -> Self {
        Self::new(NodeData::EntityReference(name.to_string()))
    }

    pub fn notation(name: &str) -> Self {
        Self::new(NodeData::Notation(name.to_string()))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element { .. })
    }

    pub fn is_document(&self) -> bool {
        matches!(self.0.data, NodeData::Document { .. })
    }

    pub fn qualified_name(&self) -> Option<&QualifiedName> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<Node> {
        read(&self.0.children).clone()
    }

    /// Attributes in stored (insertion) order; empty for non-elements.
    pub fn attributes(&self) -> Vec<Attr> {
        match &self.0.data {
            NodeData::Element { attributes, .. } => read(attributes).clone(),
            _ => Vec::new(),
        }
    }

    pub fn attribute_count(&self) -> usize {
        match &self.0.data {
            NodeData::Element { attributes, .. } => read(attributes).len(),
            _ => 0,
        }
    }

    pub fn attribute_at(&self, index: usize) -> Option<Attr> {
        match &self.0.data {
            NodeData::Element { attributes, .. } => read(attributes).get(index).cloned(),
            _ => None,
        }
    }

    pub fn get_attribute(&self, qualified: &str) -> Option<String> {
        self.attributes().into_iter().find(|a| a.name() == qualified).map(|a| a.value())
    }

    /// Sets the value of the attribute with the given qualified name, appending
    /// a new attribute when none exists.
    pub fn set_attribute(&self, qualified: &str, value: &str) -> Result<(), DomError> {
        let NodeData::Element { attributes, .. } = &self.0.data else {
            return Err(DomError::InvalidArgument(format!(
                "{} nodes cannot carry attributes",
                self.node_name()
            )));
        };
        let existing = read(attributes).iter().find(|a| a.name() == qualified).cloned();
        match existing {
            Some(attr) => attr.set_value(value),
            None => {
                let attr = Attr::new(qualified, value);
                attr.set_owner(Some(self));
                let is_id = attr.is_id();
                write(attributes).push(attr);
                if is_id {
                    self.invalidate_ids();
                }
            }
        }
        Ok(())
    }

    /// Attaches `attr`, replacing an attribute with the same qualified name in
    /// place. Returns the replaced attribute.
    pub fn set_attribute_node(&self, attr: &Attr) -> Result<Option<Attr>, DomError> {
        let NodeData::Element { attributes, .. } = &self.0.data else {
            return Err(DomError::InvalidArgument(format!(
                "{} nodes cannot carry attributes",
                self.node_name()
            )));
        };
        if let Some(owner) = attr.owner_element() {
            if owner == *self {
                return Ok(None);
            }
            return Err(DomError::InvalidArgument(format!(
                "attribute '{}' is already in use by another element",
                attr.name()
            )));
        }
        attr.set_owner(Some(self));
        let replaced = {
            let mut attrs = write(attributes);
            match attrs.iter().position(|a| a.name() == attr.name()) {
                Some(i) => Some(std::mem::replace(&mut attrs[i], attr.clone())),
                None => {
                    attrs.push(attr.clone());
                    None
                }
            }
        };
        if let Some(old) = &replaced {
            old.set_owner(None);
        }
        self.invalidate_ids();
        Ok(replaced)
    }

    pub fn remove_attribute(&self, qualified: &str) -> Option<Attr> {
        let NodeData::Element { attributes, .. } = &self.0.data else {
            return None;
        };
        let removed = {
            let mut attrs = write(attributes);
            let index = attrs.iter().position(|a| a.name() == qualified)?;
            attrs.remove(index)
        };
        removed.set_owner(None);
        if removed.is_id() {
            self.invalidate_ids();
        }
        Some(removed)
    }

    /// Character data of text, CDATA, comment and processing-instruction nodes.
    pub fn data(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Text(d) | NodeData::CData(d) | NodeData::Comment(d) => Some(read(d).clone()),
            NodeData::ProcessingInstruction { data, .. } => Some(read(data).clone()),
            _ => None,
        }
    }

    pub fn set_data(&self, value: &str) -> Result<(), DomError> {
        match &self.0.data {
            NodeData::Text(d) | NodeData::CData(d) | NodeData::Comment(d) => {
                *write(d) = value.to_string();
                Ok(())
            }
            NodeData::ProcessingInstruction { data, .. } => {
                *write(data) = value.to_string();
                Ok(())
            }
            _ => Err(DomError::NotSupported("set_data")),
        }
    }

    /// Target of a processing instruction.
    pub fn target(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn doctype_name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::DocumentType { name } => Some(name),
            _ => None,
        }
    }

    pub fn set_base_uri(&self, uri: Option<&str>) {
        if let NodeData::Document { base_uri, .. } = &self.0.data {
            *write(base_uri) = uri.map(str::to_string);
        }
    }

    /// Topmost ancestor (or the node itself when detached).
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The document this node belongs to; a document is its own owner.
    pub fn owner_document(&self) -> Option<Node> {
        Some(self.root()).filter(Node::is_document)
    }

    /// First element child of the document.
    pub fn document_element(&self) -> Option<Node> {
        self.owner_document()?.children().into_iter().find(Node::is_element)
    }

    /// Looks up an element by its `id` attribute through the owning document's
    /// identifier index. The first element in tree order wins.
    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        let document = self.owner_document()?;
        let NodeData::Document { ids, .. } = &document.0.data else {
            return None;
        };
        if let Some(index) = read(ids).as_ref() {
            return index.get(id).and_then(Weak::upgrade).map(Node);
        }
        let mut index = IdIndex::new();
        document.collect_ids(&mut index);
        tracing::trace!(entries = index.len(), "built identifier index");
        let hit = index.get(id).and_then(Weak::upgrade).map(Node);
        *write(ids) = Some(index);
        hit
    }

    fn collect_ids(&self, index: &mut IdIndex) {
        for child in self.children() {
            if let NodeData::Element { attributes, .. } = &child.0.data {
                for attr in read(attributes).iter().filter(|a| a.is_id()) {
                    let value = attr.value();
                    if !value.is_empty() {
                        index.entry(value).or_insert_with(|| Arc::downgrade(&child.0));
                    }
                }
            }
            child.collect_ids(index);
        }
    }

    pub(crate) fn invalidate_ids(&self) {
        if let NodeData::Document { ids, .. } = &self.root().0.data {
            *write(ids) = None;
        }
    }

    fn can_have_children(&self) -> bool {
        matches!(
            self.0.data,
            NodeData::Document { .. } | NodeData::DocumentFragment | NodeData::Element { .. }
        )
    }

    fn is_inclusive_ancestor_of(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    fn ensure_insertable(&self, child: &Node) -> Result<(), DomError> {
        if !self.can_have_children() {
            return Err(DomError::HierarchyRequest(format!(
                "{} nodes cannot have children",
                self.node_name()
            )));
        }
        if child.is_document() {
            return Err(DomError::HierarchyRequest("a document cannot be a child".into()));
        }
        if child.is_inclusive_ancestor_of(self) {
            return Err(DomError::HierarchyRequest(
                "the new child is an ancestor of the parent".into(),
            ));
        }
        Ok(())
    }

    fn index_of(&self, child: &Node) -> Option<usize> {
        child.position_in(&read(&self.0.children))
    }

    /// Position among `siblings`, trying the cached slot before scanning.
    fn position_in(&self, siblings: &[Node]) -> Option<usize> {
        let slot = self.0.slot.load(Ordering::Relaxed);
        if siblings.get(slot).is_some_and(|c| c == self) {
            return Some(slot);
        }
        let index = siblings.iter().position(|c| c == self)?;
        self.0.slot.store(index, Ordering::Relaxed);
        Some(index)
    }

    /// Number of siblings before this node; `None` when detached.
    pub fn index_in_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        self.position_in(&read(&parent.0.children))
    }

    /// Removes the node from its parent, if any.
    fn detach(&self) {
        if let Some(parent) = self.parent() {
            write(&parent.0.children).retain(|c| c != self);
            *write(&self.0.parent) = Weak::new();
            parent.invalidate_ids();
        }
    }

    /// Appends without hierarchy checks; used by builders on fresh nodes.
    pub(crate) fn push_child(&self, child: Node) {
        debug_assert!(!child.is_document());
        child.detach();
        *write(&child.0.parent) = Arc::downgrade(&self.0);
        let mut children = write(&self.0.children);
        child.0.slot.store(children.len(), Ordering::Relaxed);
        children.push(child);
    }

    fn insert_at(&self, index: usize, child: &Node) -> Vec<Node> {
        let nodes = if matches!(child.0.data, NodeData::DocumentFragment) {
            let moved = std::mem::take(&mut *write(&child.0.children));
            for n in &moved {
                *write(&n.0.parent) = Weak::new();
            }
            moved
        } else {
            child.detach();
            vec![child.clone()]
        };
        {
            let mut children = write(&self.0.children);
            let at = index.min(children.len());
            for (offset, n) in nodes.iter().enumerate() {
                *write(&n.0.parent) = Arc::downgrade(&self.0);
                n.0.slot.store(at + offset, Ordering::Relaxed);
                children.insert(at + offset, n.clone());
            }
        }
        self.invalidate_ids();
        nodes
    }

    fn clone_data(&self) -> NodeData {
        match &self.0.data {
            NodeData::Document { base_uri, .. } => NodeData::Document {
                base_uri: RwLock::new(read(base_uri).clone()),
                ids: RwLock::new(None),
            },
            NodeData::DocumentFragment => NodeData::DocumentFragment,
            NodeData::DocumentType { name } => NodeData::DocumentType { name: name.clone() },
            NodeData::Element { name, .. } => {
                NodeData::Element { name: name.clone(), attributes: RwLock::new(Vec::new()) }
            }
            NodeData::Text(d) => NodeData::Text(RwLock::new(read(d).clone())),
            NodeData::CData(d) => NodeData::CData(RwLock::new(read(d).clone())),
            NodeData::Comment(d) => NodeData::Comment(RwLock::new(read(d).clone())),
            NodeData::ProcessingInstruction { target, data } => NodeData::ProcessingInstruction {
                target: target.clone(),
                data: RwLock::new(read(data).clone()),
            },
            NodeData::Entity(n) => NodeData::Entity(n.clone()),
            NodeData::EntityReference(n) => NodeData::EntityReference(n.clone()),
            NodeData::Notation(n) => NodeData::Notation(n.clone()),
        }
    }

    fn collect_text(&self, out: &mut String) {
        for child in read(&self.0.children).iter() {
            match &child.0.data {
                NodeData::Text(d) | NodeData::CData(d) => out.push_str(&read(d)),
                NodeData::Comment(_) | NodeData::ProcessingInstruction { .. } => {}
                _ => child.collect_text(out),
            }
        }
    }

    fn parent_element(&self) -> Option<Node> {
        self.parent().filter(Node::is_element)
    }

    fn namespace_lookup_start(&self) -> Option<Node> {
        match &self.0.data {
            NodeData::Element { .. } => Some(self.clone()),
            NodeData::Document { .. } => self.document_element(),
            NodeData::DocumentType { .. } | NodeData::DocumentFragment => None,
            _ => self.parent_element(),
        }
    }

    fn xmlns_declaration(attr: &Attr) -> Option<Option<&str>> {
        let declared_ns = attr.namespace_uri().is_none_or(|ns| ns == XMLNS_NS);
        if !declared_ns {
            return None;
        }
        match (attr.prefix(), attr.local_name()) {
            (Some("xmlns"), local) => Some(Some(local)),
            (None, "xmlns") => Some(None),
            _ => None,
        }
    }
}

impl DomNode for Node {
    fn node_type(&self) -> NodeType {
        match &self.0.data {
            NodeData::Document { .. } => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::DocumentType { .. } => NodeType::DocumentType,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::CData(_) => NodeType::CharacterData,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
            NodeData::Entity(_) => NodeType::Entity,
            NodeData::EntityReference(_) => NodeType::EntityReference,
            NodeData::Notation(_) => NodeType::Notation,
        }
    }

    fn node_name(&self) -> &str {
        match &self.0.data {
            NodeData::Document { .. } => "#document",
            NodeData::DocumentFragment => "#document-fragment",
            NodeData::DocumentType { name } => name,
            NodeData::Element { name, .. } => name.qualified(),
            NodeData::Text(_) => "#text",
            NodeData::CData(_) => "#cdata-section",
            NodeData::Comment(_) => "#comment",
            NodeData::ProcessingInstruction { target, .. } => target,
            NodeData::Entity(n) | NodeData::EntityReference(n) | NodeData::Notation(n) => n,
        }
    }

    fn local_name(&self) -> Option<&str> {
        self.qualified_name().map(QualifiedName::local_name)
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.qualified_name().and_then(QualifiedName::namespace_uri)
    }

    fn prefix(&self) -> Option<&str> {
        self.qualified_name().and_then(QualifiedName::prefix)
    }

    fn base_uri(&self) -> Option<String> {
        let document = self.owner_document()?;
        match &document.0.data {
            NodeData::Document { base_uri, .. } => read(base_uri).clone(),
            _ => None,
        }
    }

    fn parent(&self) -> Option<Node> {
        read(&self.0.parent).upgrade().map(Node)
    }

    fn first_child(&self) -> Option<Node> {
        read(&self.0.children).first().cloned()
    }

    fn last_child(&self) -> Option<Node> {
        read(&self.0.children).last().cloned()
    }

    fn next_sibling(&self) -> Option<Node> {
        let parent = self.parent()?;
        let siblings = read(&parent.0.children);
        let index = self.position_in(&siblings)?;
        siblings.get(index + 1).cloned()
    }

    fn previous_sibling(&self) -> Option<Node> {
        let parent = self.parent()?;
        let siblings = read(&parent.0.children);
        let index = self.position_in(&siblings)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).cloned())
    }

    fn has_child_nodes(&self) -> bool {
        !read(&self.0.children).is_empty()
    }

    fn text_content(&self) -> String {
        match &self.0.data {
            NodeData::Text(d) | NodeData::CData(d) | NodeData::Comment(d) => read(d).clone(),
            NodeData::ProcessingInstruction { data, .. } => read(data).clone(),
            NodeData::DocumentType { .. } => String::new(),
            _ => {
                let mut out = String::new();
                self.collect_text(&mut out);
                out
            }
        }
    }

    fn set_text_content(&self, value: &str) -> Result<(), DomError> {
        match &self.0.data {
            NodeData::Element { .. } | NodeData::DocumentFragment => {
                for child in std::mem::take(&mut *write(&self.0.children)) {
                    *write(&child.0.parent) = Weak::new();
                }
                if !value.is_empty() {
                    self.push_child(Node::text(value));
                }
                self.invalidate_ids();
                Ok(())
            }
            NodeData::Text(_)
            | NodeData::CData(_)
            | NodeData::Comment(_)
            | NodeData::ProcessingInstruction { .. } => self.set_data(value),
            _ => Ok(()),
        }
    }

    fn append_child(&self, child: &Node) -> Result<Node, DomError> {
        self.ensure_insertable(child)?;
        self.insert_at(usize::MAX, child);
        Ok(child.clone())
    }

    fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<Node, DomError> {
        self.ensure_insertable(child)?;
        let reference = match reference {
            Some(r) if r.parent().as_ref() != Some(self) => return Err(DomError::NotFound),
            Some(r) if r == child => child.next_sibling(),
            other => other.cloned(),
        };
        // Detach first so the index reflects the final sibling list.
        if !matches!(child.0.data, NodeData::DocumentFragment) {
            child.detach();
        }
        let index = match &reference {
            Some(r) => self.index_of(r).ok_or(DomError::NotFound)?,
            None => usize::MAX,
        };
        self.insert_at(index, child);
        Ok(child.clone())
    }

    fn remove_child(&self, child: &Node) -> Result<Node, DomError> {
        if child.parent().as_ref() != Some(self) {
            return Err(DomError::NotFound);
        }
        child.detach();
        Ok(child.clone())
    }

    fn replace_child(&self, new_child: &Node, old_child: &Node) -> Result<Node, DomError> {
        if old_child.parent().as_ref() != Some(self) {
            return Err(DomError::NotFound);
        }
        self.ensure_insertable(new_child)?;
        if new_child == old_child {
            return Ok(old_child.clone());
        }
        let reference = old_child.next_sibling().filter(|n| n != new_child);
        old_child.detach();
        if !matches!(new_child.0.data, NodeData::DocumentFragment) {
            new_child.detach();
        }
        let index = match &reference {
            Some(r) => self.index_of(r).ok_or(DomError::NotFound)?,
            None => usize::MAX,
        };
        self.insert_at(index, new_child);
        Ok(old_child.clone())
    }

    fn clone_node(&self, deep: bool) -> Result<Node, DomError> {
        let copy = Node::new(self.clone_data());
        if let (NodeData::Element { attributes, .. }, NodeData::Element { attributes: target, .. }) =
            (&self.0.data, &copy.0.data)
        {
            let cloned: Vec<Attr> = read(attributes).iter().map(Attr::duplicate).collect();
            for attr in &cloned {
                attr.set_owner(Some(&copy));
            }
            *write(target) = cloned;
        }
        if deep {
            for child in self.children() {
                copy.push_child(child.clone_node(true)?);
            }
        }
        Ok(copy)
    }

    fn normalize(&self) -> Result<(), DomError> {
        let mut pending: Option<Node> = None;
        for child in self.children() {
            if child.node_type() == NodeType::Text {
                let data = child.data().unwrap_or_default();
                if data.is_empty() {
                    self.remove_child(&child)?;
                    continue;
                }
                if let Some(previous) = &pending {
                    let merged = previous.data().unwrap_or_default() + &data;
                    previous.set_data(&merged)?;
                    self.remove_child(&child)?;
                } else {
                    pending = Some(child);
                }
            } else {
                pending = None;
                child.normalize()?;
            }
        }
        Ok(())
    }

    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Result<Option<String>, DomError> {
        let prefix = prefix.filter(|p| !p.is_empty());
        let mut current = self.namespace_lookup_start();
        while let Some(element) = current {
            if element.namespace_uri().is_some() && element.prefix() == prefix {
                return Ok(element.namespace_uri().map(str::to_string));
            }
            for attr in element.attributes() {
                if Self::xmlns_declaration(&attr) == Some(prefix) {
                    let value = attr.value();
                    return Ok(Some(value).filter(|v| !v.is_empty()));
                }
            }
            current = element.parent_element();
        }
        Ok(None)
    }

    fn lookup_prefix(&self, namespace_uri: &str) -> Result<Option<String>, DomError> {
        if namespace_uri.is_empty() {
            return Ok(None);
        }
        let mut current = self.namespace_lookup_start();
        while let Some(element) = current {
            if element.namespace_uri() == Some(namespace_uri)
                && let Some(prefix) = element.prefix()
            {
                return Ok(Some(prefix.to_string()));
            }
            for attr in element.attributes() {
                if let Some(Some(prefix)) = Self::xmlns_declaration(&attr)
                    && attr.value() == namespace_uri
                {
                    return Ok(Some(prefix.to_string()));
                }
            }
            current = element.parent_element();
        }
        Ok(None)
    }

    fn is_default_namespace(&self, namespace_uri: &str) -> Result<bool, DomError> {
        let default = self.lookup_namespace_uri(None)?;
        Ok(default.as_deref().unwrap_or_default() == namespace_uri)
    }
}
