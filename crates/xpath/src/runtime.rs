use thiserror::Error;

/// The XPath/XQuery error codes this engine raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    XPST0003, // syntax error
    XPST0081, // undeclared namespace prefix
    XPST0017, // unknown function or wrong arity
    XPST0008, // undefined variable
    XPTY0004, // type error
    FOER0000, // navigator failure
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::XPST0003 => "err:XPST0003",
            ErrorCode::XPST0081 => "err:XPST0081",
            ErrorCode::XPST0017 => "err:XPST0017",
            ErrorCode::XPST0008 => "err:XPST0008",
            ErrorCode::XPTY0004 => "err:XPTY0004",
            ErrorCode::FOER0000 => "err:FOER0000",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid XPath expression: {0}")]
    Parse(String),
    #[error("namespace prefix '{0}' is not declared")]
    UndeclaredPrefix(String),
    #[error("unknown function {name}#{arity}")]
    UnknownFunction { name: String, arity: usize },
    #[error("variable ${0} is not defined")]
    UndefinedVariable(String),
    #[error("expression does not evaluate to a node-set")]
    NotANodeSet,
    #[error("type error: {0}")]
    Type(String),
    #[error("navigation failed: {0}")]
    Navigation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Parse(_) => ErrorCode::XPST0003,
            Error::UndeclaredPrefix(_) => ErrorCode::XPST0081,
            Error::UnknownFunction { .. } => ErrorCode::XPST0017,
            Error::UndefinedVariable(_) => ErrorCode::XPST0008,
            Error::NotANodeSet | Error::Type(_) => ErrorCode::XPTY0004,
            Error::Navigation(_) => ErrorCode::FOER0000,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    pub(crate) fn navigation<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Navigation(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_with_prefix() {
        assert_eq!(Error::NotANodeSet.code().as_str(), "err:XPTY0004");
        assert_eq!(Error::UndeclaredPrefix("x".into()).code().to_string(), "err:XPST0081");
    }
}
