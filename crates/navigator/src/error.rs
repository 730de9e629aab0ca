use domxpath_core::{DomError, NodeType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("node kind {0:?} is not supported by the navigator")]
    UnsupportedNodeKind(NodeType),
    #[error("XPath evaluation failed: {0}")]
    XPath(#[from] domxpath_xpath::Error),
    #[error("document operation failed: {0}")]
    Dom(#[from] DomError),
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Navigator failures raised inside the engine come back as our own error.
    pub(crate) fn from_engine(err: domxpath_xpath::Error) -> Self {
        match err {
            domxpath_xpath::Error::Navigation(source) => match source.downcast::<Error>() {
                Ok(inner) => *inner,
                Err(other) => Error::XPath(domxpath_xpath::Error::Navigation(other)),
            },
            other => Error::XPath(other),
        }
    }
}
