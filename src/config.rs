use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{CslResult, Error};

/// Engine settings. Every field has a default, so a partial (or empty) JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of parsed listings kept by the
    /// [`AstRegistry`](crate::ast_registry::AstRegistry).
    #[serde(default = "default_ast_cache_capacity")]
    pub ast_cache_capacity: usize,

    /// Variables whose name starts with this prefix keep their per-question
    /// values when a question is re-evaluated.
    #[serde(default = "default_system_variable_prefix")]
    pub system_variable_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ast_cache_capacity: default_ast_cache_capacity(),
            system_variable_prefix: default_system_variable_prefix(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> CslResult<Self> {
        let file = File::open(path.as_ref())
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json(json: &str) -> CslResult<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

pub fn default_ast_cache_capacity() -> usize {
    1000
}

pub fn default_system_variable_prefix() -> String {
    "sys_".to_string()
}
