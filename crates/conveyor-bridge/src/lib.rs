//! Stylesheet helper functions backed by an external helper runtime.
//!
//! Stylesheet code calls functions such as `asset_url("logo.png")`. The
//! argument is converted to the runtime's JSON-like [`Value`], the runtime
//! resolves it, and the answer is converted back into a [`ScriptValue`].
//! Conversions follow the table in [`marshal`].

mod error;
mod functions;
pub mod marshal;
mod script;
mod value;

pub use error::{BridgeError, RuntimeError};
pub use functions::{Declaration, HelperRuntime, HelperTable, StylesheetFunctions};
pub use script::ScriptValue;
pub use value::Value;
