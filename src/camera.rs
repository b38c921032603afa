use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Perspective camera parked on the +Z axis, looking at the origin
///
/// Only the aspect ratio changes after construction. As with most scene
/// graphs, changing `aspect` does not touch the cached projection until
/// [`PerspectiveCamera::update_projection_matrix`] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            fov_degrees: config.fov_degrees,
            aspect,
            near: config.near,
            far: config.far,
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Rebuild the projection from fov, aspect and clip planes
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}
