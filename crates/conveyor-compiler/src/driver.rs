//! The transform invoker.
//!
//! A [`Compiler`] owns one [`ExternalCompiler`] and forwards each
//! [`SourceUnit`] to it exactly once. Success passes the output through
//! untouched; failure is narrowed to a [`CompileError`] naming the unit.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::external::{ExternalCompiler, ExternalOptions};

/// Source text plus the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    name: String,
    text: String,
}

impl SourceUnit {
    /// Create a unit. The name should be non-empty; it is only used in
    /// diagnostics and is not checked here or in [`Compiler::compile_str`].
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Named option profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Strip the module wrapper from the output.
    Bare,
    /// Keep the compiler's default wrapper.
    #[default]
    Wrapped,
}

/// Caller-side options for a single compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(default)]
    bare: bool,
}

impl CompileOptions {
    /// Default options: wrapper preserved.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(preset: Preset) -> Self {
        Self::new().bare(preset == Preset::Bare)
    }

    /// Set whether the module wrapper is stripped.
    pub fn bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    pub fn is_bare(&self) -> bool {
        self.bare
    }
}

impl From<Preset> for CompileOptions {
    fn from(preset: Preset) -> Self {
        Self::preset(preset)
    }
}

/// Invokes an external compiler and normalizes its failures.
///
/// Holds no mutable state; sharing one behind an `Arc` is fine as long as
/// the wrapped compiler is reentrant.
#[derive(Debug, Clone)]
pub struct Compiler<E> {
    external: E,
}

impl<E: ExternalCompiler> Compiler<E> {
    pub fn new(external: E) -> Self {
        Self { external }
    }

    /// The wrapped external compiler.
    pub fn external(&self) -> &E {
        &self.external
    }

    /// Compile one unit.
    pub fn compile(&self, source: &SourceUnit, options: &CompileOptions) -> Result<String> {
        self.compile_str(source.text(), source.name(), options)
    }

    /// Compile raw text under the given name.
    pub fn compile_str(
        &self,
        text: &str,
        source_name: &str,
        options: &CompileOptions,
    ) -> Result<String> {
        let options = ExternalOptions {
            filename: source_name,
            bare: options.bare,
        };
        self.external
            .compile(text, &options)
            .map_err(|e| CompileError::new(source_name, e.message))
    }
}
