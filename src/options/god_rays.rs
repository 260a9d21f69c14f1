use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::material::god_rays::DEFAULT_SAMPLES;

/// Crepuscular rays parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "God Rays", inline)]
#[serde(default)]
pub struct GodRaysOptions {
    /// Samples per pixel. Changing it recompiles the shader.
    #[schemars(title = "Samples", range(min = 1, max = 200), extend("step" = 1))]
    pub samples: u32,
    /// Ray length as a fraction of the light-to-pixel distance.
    #[schemars(title = "Density", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub density: f32,
    /// Per-sample illumination falloff.
    #[schemars(title = "Decay", range(min = 0.8, max = 1.0), extend("step" = 0.001))]
    pub decay: f32,
    /// Contribution of each sample.
    #[schemars(title = "Weight", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub weight: f32,
    /// Final brightness scale.
    #[schemars(title = "Exposure", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub exposure: f32,
    /// Upper bound of the output color.
    #[schemars(skip)]
    pub clamp_max: f32,
}

impl Default for GodRaysOptions {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            density: 1.0,
            decay: 1.0,
            weight: 1.0,
            exposure: 1.0,
            clamp_max: 1.0,
        }
    }
}
