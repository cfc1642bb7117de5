//! Stylesheet functions backed by a helper runtime.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{BridgeError, RuntimeError};
use crate::marshal::call_across;
use crate::script::ScriptValue;
use crate::value::Value;

/// The runtime that actually implements helper methods.
///
/// A runtime is built once by the host and handed to
/// [`StylesheetFunctions::new`]; nothing here creates one lazily.
pub trait HelperRuntime: Send + Sync {
    fn call(&self, method: &str, arg: Value) -> Result<Value, RuntimeError>;
}

type Helper = Box<dyn Fn(Value) -> Result<Value, RuntimeError> + Send + Sync>;

/// An in-process [`HelperRuntime`] with methods registered by name.
#[derive(Default)]
pub struct HelperTable {
    helpers: HashMap<String, Helper>,
}

impl HelperTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `method`, replacing any earlier registration.
    pub fn register<F>(mut self, method: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.helpers.insert(method.into(), Box::new(f));
        self
    }
}

impl fmt::Debug for HelperTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.helpers.keys().collect();
        methods.sort();
        f.debug_struct("HelperTable").field("methods", &methods).finish()
    }
}

impl HelperRuntime for HelperTable {
    fn call(&self, method: &str, arg: Value) -> Result<Value, RuntimeError> {
        let helper = self
            .helpers
            .get(method)
            .ok_or_else(|| RuntimeError::new(format!("no helper named {}", method)))?;
        helper(arg)
    }
}

/// Declared signature of a stylesheet function, for host registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: &'static str,
    pub args: &'static [&'static str],
}

const DECLARATIONS: &[Declaration] = &[Declaration {
    name: "asset_url",
    args: &["string"],
}];

/// The functions exposed to stylesheets.
#[derive(Debug)]
pub struct StylesheetFunctions<R> {
    runtime: R,
}

impl<R: HelperRuntime> StylesheetFunctions<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Every function this bridge provides.
    pub fn declarations(&self) -> &'static [Declaration] {
        DECLARATIONS
    }

    /// `asset_url($string)`: ask the runtime for the asset's public path and
    /// wrap it as `url("...")`.
    pub fn asset_url(&self, path: &ScriptValue) -> Result<ScriptValue, BridgeError> {
        if path.as_str().is_none() {
            return Err(BridgeError::ArgumentType {
                function: "asset_url",
                param: "string",
                expected: "string",
                found: path.to_string(),
            });
        }
        let resolved = self.send_to_helpers("asset_url", path)?;
        match resolved.as_str() {
            Some(url) => Ok(ScriptValue::unquoted(format!("url(\"{}\")", url))),
            None => Err(BridgeError::Runtime {
                method: "asset_url".to_string(),
                source: RuntimeError::new(format!(
                    "expected a string, got {}",
                    resolved.type_name()
                )),
            }),
        }
    }

    /// Call a declared function by name.
    pub fn call(&self, name: &str, args: &[ScriptValue]) -> Result<ScriptValue, BridgeError> {
        let declaration = DECLARATIONS
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| BridgeError::UnknownFunction(name.to_string()))?;
        if args.len() != declaration.args.len() {
            return Err(BridgeError::Arity {
                function: declaration.name,
                expected: declaration.args.len(),
                given: args.len(),
            });
        }
        match declaration.name {
            "asset_url" => self.asset_url(&args[0]),
            _ => Err(BridgeError::UnknownFunction(name.to_string())),
        }
    }

    fn send_to_helpers(&self, method: &str, arg: &ScriptValue) -> Result<ScriptValue, BridgeError> {
        tracing::debug!(method, %arg, "calling helper runtime");
        call_across(arg, |value| {
            self.runtime
                .call(method, value)
                .map_err(|source| BridgeError::Runtime {
                    method: method.to_string(),
                    source,
                })
        })
    }
}
