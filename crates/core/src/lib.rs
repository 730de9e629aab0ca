pub mod attr;
pub mod builder;
pub mod contract;
pub mod error;
pub mod node;

pub use attr::{Attr, QualifiedName};
pub use contract::DomNode;
pub use error::DomError;
pub use node::{Node, NodeType};
