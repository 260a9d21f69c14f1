use glam::{Mat4, UVec2, Vec3};

/// Orthographic projection volume, in light view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    /// Left plane.
    pub left: f32,
    /// Right plane.
    pub right: f32,
    /// Top plane.
    pub top: f32,
    /// Bottom plane.
    pub bottom: f32,
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

impl OrthographicCamera {
    /// Symmetric box of half-extent `half` on both axes.
    #[must_use]
    pub fn symmetric(half: f32, near: f32, far: f32) -> Self {
        Self {
            left: -half,
            right: half,
            top: half,
            bottom: -half,
            near,
            far,
        }
    }

    /// Right-handed projection with [0, 1] depth.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }

    /// World-space frustum corners for the given view matrix.
    ///
    /// Near face first (counter-clockwise from bottom-left), then far face.
    #[must_use]
    pub fn corners(&self, view: Mat4) -> [Vec3; 8] {
        let inverse = (self.projection() * view).inverse();
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let z = if i < 4 { 0.0 } else { 1.0 };
            let (x, y) = match i % 4 {
                0 => (-1.0, -1.0),
                1 => (1.0, -1.0),
                2 => (1.0, 1.0),
                _ => (-1.0, 1.0),
            };
            *corner = inverse.project_point3(Vec3::new(x, y, z));
        }
        corners
    }
}

/// Shadow map configuration for a directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalShadow {
    /// Shadow map resolution in texels.
    pub map_size: UVec2,
    /// Projection used when rendering the shadow map.
    pub camera: OrthographicCamera,
}

/// Debug visualization bound to a shadow camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraHelper {
    camera: OrthographicCamera,
    view: Mat4,
}

impl CameraHelper {
    /// Bind to `camera` as seen through `view`.
    #[must_use]
    pub fn new(camera: OrthographicCamera, view: Mat4) -> Self {
        Self { camera, view }
    }

    /// The shadow camera this helper draws.
    #[must_use]
    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    /// View matrix of the light the camera belongs to.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// World-space corners to draw as frustum lines.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        self.camera.corners(self.view)
    }
}
