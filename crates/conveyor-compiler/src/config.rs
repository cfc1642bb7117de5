//! `conveyorc` configuration file.
//!
//! ```json
//! {
//!   "compiler": { "program": "coffee-json", "args": ["--stdio"] },
//!   "preset": "bare",
//!   "output_dir": "public/js"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::driver::{CompileOptions, Preset};
use crate::process::CommandSpec;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Settings loaded from a JSON file. Every field is optional so command-line
/// flags can fill in the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub compiler: Option<CommandSpec>,
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Compile options implied by this file alone.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::preset(self.preset.unwrap_or_default())
    }
}
