//! Error types for the stylesheet bridge.

/// Failure reported by a helper runtime.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while calling a stylesheet function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// An argument had the wrong stylesheet type.
    #[error("${param}: {found} is not a {expected} for `{function}'")]
    ArgumentType {
        function: &'static str,
        param: &'static str,
        expected: &'static str,
        found: String,
    },
    /// A value has no counterpart on the other side of the bridge.
    #[error("cannot pass {0} across the helper bridge")]
    Unmarshallable(String),
    /// No function is declared under this name.
    #[error("undefined function `{0}'")]
    UnknownFunction(String),
    /// Wrong number of arguments.
    #[error("wrong number of arguments ({given} for {expected}) for `{function}'")]
    Arity {
        function: &'static str,
        expected: usize,
        given: usize,
    },
    /// The helper runtime itself failed.
    #[error("{method} failed: {source}")]
    Runtime {
        method: String,
        source: RuntimeError,
    },
}
