//! Centralized effect, asset and lighting options with TOML preset support.
//!
//! Options serialize to/from TOML so a demo setup can be stored and
//! reloaded; every section falls back to its defaults when omitted.

mod assets;
mod god_rays;
mod lights;
mod prewarm;

use std::path::Path;

pub use assets::{AssetOptions, DEFAULT_LOCAL_BASE, DEFAULT_REMOTE_BASE};
pub use god_rays::GodRaysOptions;
pub use lights::LightOptions;
pub use prewarm::PrewarmOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LucentError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[god_rays]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// God rays effect parameters.
    pub god_rays: GodRaysOptions,
    /// Texture prewarming.
    pub prewarm: PrewarmOptions,
    /// Light rig toggles.
    pub lights: LightOptions,
    /// Model location.
    #[schemars(skip)]
    pub assets: AssetOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::Io`] if the file cannot be read and
    /// [`LucentError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, LucentError> {
        let content = std::fs::read_to_string(path).map_err(LucentError::Io)?;
        toml::from_str(&content)
            .map_err(|e| LucentError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`LucentError::OptionsParse`] if serialization fails and
    /// [`LucentError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LucentError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LucentError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LucentError::Io)?;
        }
        std::fs::write(path, content).map_err(LucentError::Io)
    }
}
