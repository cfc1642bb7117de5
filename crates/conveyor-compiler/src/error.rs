//! Error types for the transform invoker.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type for invoker operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// The only failure the invoker reports.
///
/// Displays as `"{source_name}: {message}"`. Anything else the external
/// compiler knew about the failure (positions, traces) has already been
/// dropped by the time this value exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_name}: {message}")]
pub struct CompileError {
    source_name: String,
    message: String,
}

impl CompileError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Logical name of the unit that failed.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The external compiler's message, without the name prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Position reported by an external compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// Failure raised by an [`ExternalCompiler`](crate::ExternalCompiler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCompileError {
    /// Human-readable message.
    pub message: String,
    /// Where the compiler says the problem is, if it says.
    pub location: Option<Location>,
}

impl ExternalCompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.location = Some(Location { line, column });
        self
    }
}

impl fmt::Display for ExternalCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(Location { line, column }) => {
                write!(f, "{} (line {}, column {})", self.message, line, column)
            }
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ExternalCompileError {}
