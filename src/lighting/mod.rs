//! Fixed light rig for demo scenes.
//!
//! [`LightRig::create`] returns an ambient fill, a shadow-casting
//! directional key light and the key light's target node. The target must be
//! inserted into the scene alongside the light, since the shadow matrix is
//! computed from both positions. An optional [`CameraHelper`] exposes the
//! shadow frustum for debug drawing.

mod rig;
mod shadow;

pub use rig::{
    create_lights, rgb, AmbientLight, DirectionalLight, LightRig, LightTarget,
    RigObject,
};
pub use shadow::{CameraHelper, DirectionalShadow, OrthographicCamera};
