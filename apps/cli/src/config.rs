//! Layered CLI configuration: defaults, then `weave.toml`, then
//! `WEAVE_CLI_*` environment variables, then command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use weave_canvas::config::CanvasConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub log: weave_log::Config,
    pub canvas: CanvasConfig,
}

impl CliConfig {
    /// Load configuration. A missing file is not an error.
    ///
    /// Nested keys use `__` in the environment, e.g.
    /// `WEAVE_CLI_CANVAS__PASTE_OFFSET=40`.
    pub fn load(path: &Path) -> Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("WEAVE_CLI_").split("__"))
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}
