//! XPath 1.0 engine that runs over any tree implementing [`XPathNavigator`].
//!
//! ```ignore
//! let expr = XPathExpression::compile("//li[@class = 'two']")?;
//! for node in expr.select(&navigator)? {
//!     println!("{}", node.value()?);
//! }
//! ```

mod compiler;
pub mod evaluator;
pub mod expression;
mod functions;
pub mod model;
pub mod parser;
pub mod runtime;

pub use evaluator::Value;
pub use expression::{XPathExpression, XPathNodeIterator};
pub use model::{NamespaceManager, NamespaceResolver, XML_NAMESPACE, XPathNavigator, XPathNodeType};
pub use parser::parse_xpath;
pub use runtime::{Error, ErrorCode};
