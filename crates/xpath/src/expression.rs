use crate::compiler::{Compiled, compile};
use crate::evaluator::{Evaluator, Value};
use crate::model::{NamespaceResolver, XPathNavigator};
use crate::parser::parse_xpath;
use crate::runtime::Error;

/// A compiled XPath 1.0 expression, reusable across navigators and trees.
#[derive(Debug, Clone)]
pub struct XPathExpression {
    source: String,
    compiled: Compiled,
}

impl XPathExpression {
    /// Compiles `expr`. Only the predeclared `xml` prefix is available.
    pub fn compile(expr: &str) -> Result<Self, Error> {
        Self::build(expr, None)
    }

    /// Compiles `expr`, resolving namespace prefixes through `resolver`.
    pub fn compile_with_resolver(expr: &str, resolver: &dyn NamespaceResolver) -> Result<Self, Error> {
        Self::build(expr, Some(resolver))
    }

    fn build(expr: &str, resolver: Option<&dyn NamespaceResolver>) -> Result<Self, Error> {
        let ast = parse_xpath(expr)?;
        let compiled = compile(&ast, resolver)?;
        tracing::trace!(expression = expr, "compiled XPath expression");
        Ok(Self { source: expr.to_string(), compiled })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the expression with `context` as the context node.
    pub fn evaluate<N: XPathNavigator>(&self, context: &N) -> Result<Value<N>, Error> {
        let value = Evaluator::new().run(&self.compiled, context)?;
        match &value {
            Value::NodeSet(nodes) => {
                tracing::trace!(expression = %self.source, nodes = nodes.len(), "evaluated node-set");
            }
            _ => tracing::trace!(expression = %self.source, "evaluated scalar"),
        }
        Ok(value)
    }

    /// Evaluates a node-set expression and iterates its nodes in document order.
    pub fn select<N: XPathNavigator>(&self, context: &N) -> Result<XPathNodeIterator<N>, Error> {
        match self.evaluate(context)? {
            Value::NodeSet(nodes) => Ok(XPathNodeIterator { inner: nodes.into_iter() }),
            _ => Err(Error::NotANodeSet),
        }
    }
}

impl std::str::FromStr for XPathExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Navigators positioned on each selected node.
#[derive(Debug)]
pub struct XPathNodeIterator<N> {
    inner: std::vec::IntoIter<N>,
}

impl<N> Iterator for XPathNodeIterator<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<N> ExactSizeIterator for XPathNodeIterator<N> {}
