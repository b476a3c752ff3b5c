//! Perspective camera looking at a target, with reverse-Z projection.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin with +Y up.
    #[must_use]
    pub fn looking_at_origin(eye: Vec3, fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_deg.to_radians(),
            aspect,
            near,
            far,
        }
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Near and far are swapped so depth runs 1.0 at near to 0.0 at far.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.far, self.near)
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
