use std::fmt;
use std::rc::Rc;

use domxpath_core::Node;
use domxpath_xpath::{NamespaceResolver, XPathExpression};

use crate::error::Error;
use crate::name_table::NameTable;
use crate::navigator::{DocumentNavigator, NamespaceMode};
use crate::xpath_node::XPathNode;

/// Options for [`select_single`] and [`select_all`].
///
/// ```
/// use domxpath_navigator::{NamespaceMode, SelectOptions};
/// use domxpath_xpath::NamespaceManager;
///
/// let namespaces = NamespaceManager::new().with_namespace("def", "http://www.w3.org/1999/xhtml");
/// let options = SelectOptions::new()
///     .with_namespace_mode(NamespaceMode::Aware)
///     .with_resolver(&namespaces);
/// assert_eq!(options.namespace_mode(), NamespaceMode::Aware);
/// ```
#[derive(Clone, Copy, Default)]
pub struct SelectOptions<'a> {
    namespace_mode: NamespaceMode,
    resolver: Option<&'a dyn NamespaceResolver>,
}

impl<'a> SelectOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_namespace_mode(mut self, mode: NamespaceMode) -> Self {
        self.namespace_mode = mode;
        self
    }

    /// Prefix bindings for prefixed names in the expression.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn NamespaceResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn namespace_mode(&self) -> NamespaceMode {
        self.namespace_mode
    }

    pub fn resolver(&self) -> Option<&'a dyn NamespaceResolver> {
        self.resolver
    }
}

impl fmt::Debug for SelectOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectOptions")
            .field("namespace_mode", &self.namespace_mode)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

pub(crate) fn compile_expression(xpath: &str, options: &SelectOptions<'_>) -> Result<XPathExpression, Error> {
    if xpath.trim().is_empty() {
        return Err(Error::invalid_argument("XPath expression must not be empty"));
    }
    let compiled = match options.resolver {
        Some(resolver) => XPathExpression::compile_with_resolver(xpath, resolver),
        None => XPathExpression::compile(xpath),
    };
    Ok(compiled?)
}

fn navigator_at(root: &Node, mode: NamespaceMode) -> Result<DocumentNavigator, Error> {
    let document = root
        .owner_document()
        .ok_or_else(|| Error::invalid_argument("node is not attached to a document"))?;
    Ok(DocumentNavigator::unchecked(document, root.clone(), mode, Rc::new(NameTable::new())))
}

pub(crate) fn select_compiled(
    root: &Node,
    expression: &XPathExpression,
    mode: NamespaceMode,
) -> Result<Vec<XPathNode>, Error> {
    let navigator = navigator_at(root, mode)?;
    let nodes: Vec<XPathNode> = expression
        .select(&navigator)
        .map_err(Error::from_engine)?
        .map(|nav| nav.current_node())
        .collect();
    tracing::debug!(expression = expression.source(), ?mode, results = nodes.len(), "selected nodes");
    Ok(nodes)
}

/// First match of `xpath` evaluated with `root` as the context node.
pub fn select_single(root: &Node, xpath: &str, options: &SelectOptions<'_>) -> Result<Option<XPathNode>, Error> {
    let expression = compile_expression(xpath, options)?;
    let navigator = navigator_at(root, options.namespace_mode)?;
    let first = expression
        .select(&navigator)
        .map_err(Error::from_engine)?
        .next()
        .map(|nav| nav.current_node());
    tracing::debug!(
        expression = expression.source(),
        mode = ?options.namespace_mode,
        found = first.is_some(),
        "selected single node"
    );
    Ok(first)
}

/// All matches of `xpath` in document order, with `root` as the context node.
///
/// Attribute matches come back as [`XPathNode::Attribute`] pseudo-nodes.
pub fn select_all(root: &Node, xpath: &str, options: &SelectOptions<'_>) -> Result<Vec<XPathNode>, Error> {
    let expression = compile_expression(xpath, options)?;
    select_compiled(root, &expression, options.namespace_mode)
}

/// Query methods on document nodes.
pub trait NodeSelectExt {
    fn select_single_node(&self, xpath: &str) -> Result<Option<XPathNode>, Error>;
    fn select_nodes(&self, xpath: &str) -> Result<Vec<XPathNode>, Error>;
    /// Namespace-aware variant; prefixes in `xpath` resolve through `resolver`.
    fn select_single_node_ns(
        &self,
        xpath: &str,
        resolver: &dyn NamespaceResolver,
    ) -> Result<Option<XPathNode>, Error>;
    fn select_nodes_ns(&self, xpath: &str, resolver: &dyn NamespaceResolver) -> Result<Vec<XPathNode>, Error>;
}

impl NodeSelectExt for Node {
    fn select_single_node(&self, xpath: &str) -> Result<Option<XPathNode>, Error> {
        select_single(self, xpath, &SelectOptions::new())
    }

    fn select_nodes(&self, xpath: &str) -> Result<Vec<XPathNode>, Error> {
        select_all(self, xpath, &SelectOptions::new())
    }

    fn select_single_node_ns(
        &self,
        xpath: &str,
        resolver: &dyn NamespaceResolver,
    ) -> Result<Option<XPathNode>, Error> {
        let options = SelectOptions::new().with_namespace_mode(NamespaceMode::Aware).with_resolver(resolver);
        select_single(self, xpath, &options)
    }

    fn select_nodes_ns(&self, xpath: &str, resolver: &dyn NamespaceResolver) -> Result<Vec<XPathNode>, Error> {
        let options = SelectOptions::new().with_namespace_mode(NamespaceMode::Aware).with_resolver(resolver);
        select_all(self, xpath, &options)
    }
}

/// A document that hands out navigators positioned at its document element.
#[derive(Debug, Clone)]
pub struct DocumentNavigable {
    document: Node,
    mode: NamespaceMode,
}

impl DocumentNavigable {
    pub fn new(document: Node) -> Result<Self, Error> {
        if !document.is_document() {
            return Err(Error::invalid_argument("navigable requires a document node"));
        }
        Ok(Self { document, mode: NamespaceMode::Ignore })
    }

    #[must_use]
    pub fn with_namespace_mode(mut self, mode: NamespaceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    /// Fresh navigator at the document element, or at the document when it
    /// has no element child.
    pub fn create_navigator(&self) -> DocumentNavigator {
        let start = self.document.document_element().unwrap_or_else(|| self.document.clone());
        DocumentNavigator::unchecked(self.document.clone(), start, self.mode, Rc::new(NameTable::new()))
    }
}
