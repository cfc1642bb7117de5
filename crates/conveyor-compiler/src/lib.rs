/// Conveyor compiler
///
/// Runs source through an external source-to-source compiler and reports
/// failures as a single `"name: message"` error.

pub mod driver;
pub mod error;
pub mod external;
pub mod process;
pub mod batch;
pub mod config;

pub use driver::{Compiler, CompileOptions, Preset, SourceUnit};
pub use error::{CompileError, ExternalCompileError, Location, Result};
pub use external::{from_fn, ExternalCompiler, ExternalOptions, FnCompiler};
pub use process::{CommandSpec, ProcessCompiler};
pub use batch::{compile_all, BuildOutput};
pub use config::{Config, ConfigError};
