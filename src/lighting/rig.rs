use glam::{Mat4, UVec2, Vec3};

use super::shadow::{CameraHelper, DirectionalShadow, OrthographicCamera};
use crate::options::LightOptions;

const AMBIENT_COLOR: u32 = 0x0021_2121;
const KEY_COLOR: u32 = 0x00ff_ffff;
const KEY_INTENSITY: f32 = 1.0;
const KEY_POSITION: Vec3 = Vec3::new(4.0, 18.0, 3.0);
const KEY_TARGET: Vec3 = Vec3::new(0.0, 7.0, 0.0);
const SHADOW_MAP_SIZE: u32 = 2048;
const SHADOW_HALF_EXTENT: f32 = 20.0;
const SHADOW_NEAR: f32 = 0.5;
const SHADOW_FAR: f32 = 32.0;

/// Normalized RGB components of a `0xRRGGBB` color.
#[must_use]
pub fn rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Uniform light applied to every surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientLight {
    /// `0xRRGGBB` color.
    pub color: u32,
}

/// Scene node a directional light aims at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTarget {
    /// World-space position.
    pub position: Vec3,
}

/// Parallel light with an optional orthographic shadow map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// `0xRRGGBB` color.
    pub color: u32,
    /// Scalar intensity.
    pub intensity: f32,
    /// World-space position; the light shines from here toward its target.
    pub position: Vec3,
    /// Whether the light renders a shadow map.
    pub cast_shadow: bool,
    /// Shadow map setup.
    pub shadow: DirectionalShadow,
}

impl DirectionalLight {
    /// Light view matrix looking at `target`.
    #[must_use]
    pub fn view(&self, target: &LightTarget) -> Mat4 {
        Mat4::look_at_rh(self.position, target.position, Vec3::Y)
    }

    /// Matrix mapping world space into the shadow map's clip space.
    #[must_use]
    pub fn shadow_view_projection(&self, target: &LightTarget) -> Mat4 {
        self.shadow.camera.projection() * self.view(target)
    }
}

/// One object the caller inserts into its scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigObject {
    /// Ambient fill.
    Ambient(AmbientLight),
    /// Key light.
    Directional(DirectionalLight),
    /// Key light target.
    Target(LightTarget),
    /// Shadow frustum visualization.
    Helper(CameraHelper),
}

/// The fixed demo lighting configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    /// Ambient fill.
    pub ambient: AmbientLight,
    /// Shadow-casting key light.
    pub directional: DirectionalLight,
    /// What the key light looks at.
    pub target: LightTarget,
    /// Present when the shadow camera helper was requested.
    pub helper: Option<CameraHelper>,
}

impl LightRig {
    /// Build the rig. Output depends on `shadow_camera_helper` only.
    #[must_use]
    pub fn create(shadow_camera_helper: bool) -> Self {
        let directional = DirectionalLight {
            color: KEY_COLOR,
            intensity: KEY_INTENSITY,
            position: KEY_POSITION,
            cast_shadow: true,
            shadow: DirectionalShadow {
                map_size: UVec2::splat(SHADOW_MAP_SIZE),
                camera: OrthographicCamera::symmetric(
                    SHADOW_HALF_EXTENT,
                    SHADOW_NEAR,
                    SHADOW_FAR,
                ),
            },
        };
        let target = LightTarget {
            position: KEY_TARGET,
        };
        let helper = shadow_camera_helper.then(|| {
            CameraHelper::new(directional.shadow.camera, directional.view(&target))
        });

        Self {
            ambient: AmbientLight {
                color: AMBIENT_COLOR,
            },
            directional,
            target,
            helper,
        }
    }

    /// Build from options.
    #[must_use]
    pub fn from_options(options: &LightOptions) -> Self {
        Self::create(options.shadow_camera_helper)
    }

    /// Flatten into insertion order: ambient, key light, target, helper.
    #[must_use]
    pub fn into_objects(self) -> Vec<RigObject> {
        let mut objects = vec![
            RigObject::Ambient(self.ambient),
            RigObject::Directional(self.directional),
            RigObject::Target(self.target),
        ];
        objects.extend(self.helper.map(RigObject::Helper));
        objects
    }
}

/// Objects of the demo rig, ready for scene insertion.
#[must_use]
pub fn create_lights(shadow_camera_helper: bool) -> Vec<RigObject> {
    LightRig::create(shadow_camera_helper).into_objects()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_without_helper_has_three_objects() {
        let objects = create_lights(false);
        assert_eq!(objects.len(), 3);
        assert!(matches!(objects[0], RigObject::Ambient(_)));
        assert!(matches!(objects[1], RigObject::Directional(_)));
        assert!(matches!(objects[2], RigObject::Target(_)));
    }

    #[test]
    fn helper_is_bound_to_the_shadow_camera() {
        let objects = create_lights(true);
        assert_eq!(objects.len(), 4);

        let (RigObject::Directional(light), RigObject::Target(target)) =
            (objects[1], objects[2])
        else {
            panic!("unexpected rig order: {objects:?}");
        };
        let RigObject::Helper(helper) = objects[3] else {
            panic!("fourth object is not a helper");
        };
        assert_eq!(*helper.camera(), light.shadow.camera);
        assert_eq!(helper.view(), light.view(&target));
    }

    #[test]
    fn key_light_matches_the_fixed_configuration() {
        let rig = LightRig::create(false);
        assert_eq!(rig.ambient.color, 0x0021_2121);
        assert_eq!(rig.directional.color, 0x00ff_ffff);
        assert!(rig.directional.cast_shadow);
        assert_eq!(rig.directional.shadow.map_size, UVec2::new(2048, 2048));
        assert_eq!(rig.directional.shadow.camera.right, 20.0);
        assert_eq!(rig.directional.shadow.camera.bottom, -20.0);
        assert_eq!(rig.directional.shadow.camera.far, 32.0);
        assert_eq!(rig.target.position, Vec3::new(0.0, 7.0, 0.0));
        assert!(rig.helper.is_none());
    }

    #[test]
    fn target_projects_to_the_shadow_map_center() {
        let rig = LightRig::create(false);
        let clip = rig
            .directional
            .shadow_view_projection(&rig.target)
            .project_point3(rig.target.position);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn helper_corners_span_forty_units_in_light_space() {
        let rig = LightRig::create(true);
        let helper = rig.helper.unwrap();
        let view = helper.view();
        let local: Vec<Vec3> = helper
            .corners()
            .iter()
            .map(|c| view.transform_point3(*c))
            .collect();
        let min_x = local.iter().map(|c| c.x).fold(f32::MAX, f32::min);
        let max_x = local.iter().map(|c| c.x).fold(f32::MIN, f32::max);
        assert!((min_x + 20.0).abs() < 1e-3);
        assert!((max_x - 20.0).abs() < 1e-3);
    }

    #[test]
    fn hex_colors_split_into_channels() {
        assert_eq!(rgb(0x00ff_ffff), Vec3::ONE);
        assert!((rgb(0x0021_2121).x - 33.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn options_toggle_the_helper() {
        let options = LightOptions {
            shadow_camera_helper: true,
        };
        assert!(LightRig::from_options(&options).helper.is_some());
    }
}
