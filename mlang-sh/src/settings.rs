// RebelDB™ © 2025 Huly Labs • https://hulylabs.com • SPDX-License-Identifier: MIT

use config::{Config, ConfigError, Environment, File};
use mlang::module::DEFAULT_MAX_CALL_DEPTH;
use serde::Deserialize;
use std::path::Path;

pub const ENV_PREFIX: &str = "MLANG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_call_depth: usize,
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            log: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the settings file if given, then `MLANG_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
