use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::assets::DEFAULT_ANISOTROPY;

/// Load-time texture preparation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Textures", inline)]
#[serde(default)]
pub struct PrewarmOptions {
    /// Desired anisotropic filtering level, clamped to hardware support.
    #[schemars(title = "Anisotropy", range(min = 1, max = 16), extend("step" = 1))]
    pub anisotropy: u16,
}

impl Default for PrewarmOptions {
    fn default() -> Self {
        Self {
            anisotropy: DEFAULT_ANISOTROPY,
        }
    }
}
