//! XPath inside CSS selectors: `*[xpath>'//li[2]']`.
//!
//! The attribute selector name picks the namespace mode (`xpath` ignores
//! namespaces, `xpathns` reports them). A selector matches the elements its
//! expression selects from the scope the query runs against; the selection is
//! cached per scope.
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

use domxpath_core::Node;
use domxpath_xpath::XPathExpression;

use crate::error::Error;
use crate::navigator::NamespaceMode;
use crate::select::{SelectOptions, compile_expression, select_compiled};

/// CSS specificity as `(ids, classes, tags)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub tags: u32,
}

impl Specificity {
    /// What a single attribute selector contributes.
    pub const ONE_CLASS: Specificity = Specificity { ids: 0, classes: 1, tags: 0 };
}

struct ScopeCache {
    scope: Node,
    members: HashSet<Node>,
}

pub struct XPathSelector {
    name: String,
    expression: XPathExpression,
    mode: NamespaceMode,
    cache: RefCell<Option<ScopeCache>>,
}

impl XPathSelector {
    pub fn new(expression: &str, mode: NamespaceMode) -> Result<Self, Error> {
        let name = match mode {
            NamespaceMode::Ignore => "xpath",
            NamespaceMode::Aware => "xpathns",
        };
        Self::named(name, expression, mode)
    }

    fn named(name: &str, expression: &str, mode: NamespaceMode) -> Result<Self, Error> {
        let options = SelectOptions::new().with_namespace_mode(mode);
        Ok(Self {
            name: name.to_string(),
            expression: compile_expression(expression, &options)?,
            mode,
            cache: RefCell::new(None),
        })
    }

    pub fn expression(&self) -> &str {
        self.expression.source()
    }

    pub fn namespace_mode(&self) -> NamespaceMode {
        self.mode
    }

    /// Serialized form, e.g. `[xpath>'//li[2]']`.
    pub fn text(&self) -> String {
        format!("[{}>'{}']", self.name, escape(self.expression.source()))
    }

    pub fn specificity(&self) -> Specificity {
        Specificity::ONE_CLASS
    }

    /// Whether `element` is among the nodes the expression selects from `scope`.
    pub fn matches(&self, element: &Node, scope: &Node) -> Result<bool, Error> {
        let mut cache = self.cache.borrow_mut();
        if cache.as_ref().is_none_or(|cached| cached.scope != *scope) {
            let members: HashSet<Node> = select_compiled(scope, &self.expression, self.mode)?
                .into_iter()
                .filter_map(|node| node.into_node())
                .collect();
            tracing::debug!(selector = %self.text(), members = members.len(), "cached selector matches");
            *cache = Some(ScopeCache { scope: scope.clone(), members });
        }
        Ok(cache.as_ref().is_some_and(|cached| cached.members.contains(element)))
    }
}

impl fmt::Debug for XPathSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XPathSelector")
            .field("text", &self.text())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

fn escape(source: &str) -> String {
    source.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Registry of the attribute-selector names that carry XPath.
#[derive(Debug, Clone, Default)]
pub struct SelectorConfiguration {
    names: HashMap<String, NamespaceMode>,
}

impl SelectorConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `xpath` and `xpathns`.
    #[must_use]
    pub fn with_xpath(mut self) -> Self {
        self.register("xpath", NamespaceMode::Ignore);
        self.register("xpathns", NamespaceMode::Aware);
        self
    }

    /// Names are matched case-insensitively.
    pub fn register(&mut self, name: &str, mode: NamespaceMode) {
        self.names.insert(name.to_ascii_lowercase(), mode);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_ascii_lowercase())
    }

    /// Parses `[name>'expr']`, optionally preceded by the universal selector.
    pub fn parse(&self, selector: &str) -> Result<XPathSelector, Error> {
        let invalid = || Error::InvalidSelector(selector.to_string());
        let rest = selector.trim();
        let rest = rest.strip_prefix('*').unwrap_or(rest);
        let body = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')).ok_or_else(invalid)?;
        let (name, value) = body.split_once('>').ok_or_else(invalid)?;
        let name = name.trim();
        let mode = self.names.get(&name.to_ascii_lowercase()).copied().ok_or_else(|| {
            tracing::debug!(name, "attribute selector name is not registered for XPath");
            invalid()
        })?;
        let expression = unquote(value.trim()).ok_or_else(invalid)?;
        XPathSelector::named(&name.to_ascii_lowercase(), &expression, mode)
    }
}

/// Strips matching quotes and resolves backslash escapes.
fn unquote(quoted: &str) -> Option<String> {
    let mut chars = quoted.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            c if c == quote => return chars.next().is_none().then_some(out),
            c => out.push(c),
        }
    }
    None
}

/// Elements below `scope` matched by `selector`, in tree order.
pub fn query_selector_all(scope: &Node, selector: &str, config: &SelectorConfiguration) -> Result<Vec<Node>, Error> {
    let selector = config.parse(selector)?;
    let mut matched = Vec::new();
    for element in descendant_elements(scope) {
        if selector.matches(&element, scope)? {
            matched.push(element);
        }
    }
    tracing::debug!(selector = %selector.text(), matched = matched.len(), "queried selector");
    Ok(matched)
}

pub fn query_selector(scope: &Node, selector: &str, config: &SelectorConfiguration) -> Result<Option<Node>, Error> {
    let selector = config.parse(selector)?;
    for element in descendant_elements(scope) {
        if selector.matches(&element, scope)? {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

fn descendant_elements(scope: &Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut stack: Vec<Node> = scope.children().into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        stack.extend(node.children().into_iter().rev());
        if node.is_element() {
            out.push(node);
        }
    }
    out
}
