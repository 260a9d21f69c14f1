use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assets::{Environment, ModelSource};

/// Local directory models are served from.
pub const DEFAULT_LOCAL_BASE: &str = "models";
/// CDN models are fetched from when running remotely.
pub const DEFAULT_REMOTE_BASE: &str =
    "https://cdn.jsdelivr.net/gh/vanruesc/postprocessing@latest/public/models";

/// Where demo models come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct AssetOptions {
    /// Which base to resolve model paths against.
    pub environment: Environment,
    /// Base for [`Environment::Local`].
    pub local_base: String,
    /// Base for [`Environment::Remote`].
    pub remote_base: String,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            local_base: DEFAULT_LOCAL_BASE.to_owned(),
            remote_base: DEFAULT_REMOTE_BASE.to_owned(),
        }
    }
}

impl AssetOptions {
    /// Model source for these options.
    #[must_use]
    pub fn model_source(&self) -> ModelSource {
        ModelSource::new(
            self.environment,
            self.local_base.clone(),
            self.remote_base.clone(),
        )
    }
}
