//! The seam between the invoker and whatever actually compiles the source.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ExternalCompileError;

/// Options handed verbatim to an external compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalOptions<'a> {
    /// Logical name of the source, for the compiler's own diagnostics.
    pub filename: &'a str,
    /// Omit module-wrapping boilerplate around the output.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bare: bool,
}

/// A source-to-source compiler supplied by the environment.
///
/// Implementations are shared across threads when units are compiled
/// concurrently, so `compile` must be reentrant. The invoker relies on this
/// but has no way to check it.
pub trait ExternalCompiler: Send + Sync {
    fn compile(
        &self,
        source: &str,
        options: &ExternalOptions<'_>,
    ) -> Result<String, ExternalCompileError>;
}

/// An [`ExternalCompiler`] backed by a closure.
#[derive(Debug, Clone)]
pub struct FnCompiler<F>(F);

/// Wrap a closure as an [`ExternalCompiler`].
pub fn from_fn<F>(f: F) -> FnCompiler<F>
where
    F: Fn(&str, &ExternalOptions<'_>) -> Result<String, ExternalCompileError> + Send + Sync,
{
    FnCompiler(f)
}

impl<F> ExternalCompiler for FnCompiler<F>
where
    F: Fn(&str, &ExternalOptions<'_>) -> Result<String, ExternalCompileError> + Send + Sync,
{
    fn compile(
        &self,
        source: &str,
        options: &ExternalOptions<'_>,
    ) -> Result<String, ExternalCompileError> {
        (self.0)(source, options)
    }
}

impl<T: ExternalCompiler + ?Sized> ExternalCompiler for Arc<T> {
    fn compile(
        &self,
        source: &str,
        options: &ExternalOptions<'_>,
    ) -> Result<String, ExternalCompileError> {
        (**self).compile(source, options)
    }
}

impl<T: ExternalCompiler + ?Sized> ExternalCompiler for Box<T> {
    fn compile(
        &self,
        source: &str,
        options: &ExternalOptions<'_>,
    ) -> Result<String, ExternalCompileError> {
        (**self).compile(source, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_flag_omitted_when_false() {
        let options = ExternalOptions { filename: "a.coffee", bare: false };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"filename":"a.coffee"}"#);
    }

    #[test]
    fn test_bare_flag_present_when_true() {
        let options = ExternalOptions { filename: "a.coffee", bare: true };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"filename":"a.coffee","bare":true}"#);
    }

    #[test]
    fn test_boxed_closure_is_a_compiler() {
        let compiler: Box<dyn ExternalCompiler> =
            Box::new(from_fn(|source, _| Ok(source.to_uppercase())));
        let options = ExternalOptions { filename: "x", bare: false };
        assert_eq!(compiler.compile("abc", &options).unwrap(), "ABC");
    }
}
