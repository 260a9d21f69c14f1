use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Light rig toggles.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[schemars(title = "Lights", inline)]
#[serde(default)]
pub struct LightOptions {
    /// Add a debug helper showing the key light's shadow frustum.
    #[schemars(title = "Shadow Frustum Helper")]
    pub shadow_camera_helper: bool,
}
