//! XPath queries over documents whose attributes are not tree nodes.
//!
//! [`DocumentNavigator`] is the cursor the XPath engine walks. It stands on a
//! tree node or on one attribute of an element, so the attribute axis works
//! although the document never links attributes into the tree. Attribute
//! results are returned as [`AttrNode`] pseudo-nodes whose parent is the
//! owning element.
//!
//! ```
//! use domxpath_core::builder::{attr, doc, elem, text};
//! use domxpath_navigator::{NodeSelectExt, XPathNode};
//!
//! let document = doc()
//!     .child(
//!         elem("ol")
//!             .child(elem("li").child(text("First")))
//!             .child(elem("li").attr(attr("class", "two")).child(text("Second"))),
//!     )
//!     .build();
//!
//! let items = document.select_nodes("//li").unwrap();
//! assert_eq!(items.len(), 2);
//!
//! let class = document.select_single_node("//li/@class").unwrap().unwrap();
//! let XPathNode::Attribute(class) = class else { panic!("attribute expected") };
//! assert_eq!(class.value(), "two");
//! ```
pub mod attr_node;
pub mod error;
pub mod name_table;
pub mod navigator;
pub mod select;
pub mod selector;
pub mod xpath_node;

pub use attr_node::AttrNode;
pub use error::Error;
pub use name_table::{Atom, NameTable};
pub use navigator::{DocumentNavigator, NamespaceMode};
pub use select::{DocumentNavigable, NodeSelectExt, SelectOptions, select_all, select_single};
pub use selector::{SelectorConfiguration, Specificity, XPathSelector, query_selector, query_selector_all};
pub use xpath_node::XPathNode;
