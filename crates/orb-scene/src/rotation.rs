//! Per-frame spin of the Earth's body and cloud shell.

use glam::{EulerRot, Mat4, Vec3};

/// Radians per second added to the body's x and y angles.
pub const BODY_RATE: f64 = 0.1;
/// Radians per second added to the cloud shell's x and y angles.
pub const CLOUDS_RATE: f64 = 0.11;

/// Accumulated Euler angles in radians. Never wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationAngle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationAngle {
    /// Advances x and y by `delta * rate`; z is left alone.
    pub fn advance(&mut self, delta: f64, rate: f64) {
        self.x += delta * rate;
        self.y += delta * rate;
    }
}

/// A mounted mesh: its rotation and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub rotation: RotationAngle,
    pub radius: f32,
}

impl MeshTransform {
    #[must_use]
    pub fn new(radius: f32) -> Self {
        Self {
            rotation: RotationAngle::default(),
            radius,
        }
    }

    /// Model matrix with rotations applied in XYZ order.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_euler(EulerRot::XYZ, r.x as f32, r.y as f32, r.z as f32)
            * Mat4::from_scale(Vec3::splat(self.radius))
    }
}

/// The two Earth meshes. A layer is `None` until its mesh is mounted.
#[derive(Debug, Clone, Default)]
pub struct PlanetLayers {
    pub body: Option<MeshTransform>,
    pub clouds: Option<MeshTransform>,
}

impl PlanetLayers {
    /// Body step. Skipped without catch-up when the body is not mounted.
    pub fn advance_body(&mut self, delta: f64) {
        if let Some(body) = self.body.as_mut() {
            body.rotation.advance(delta, BODY_RATE);
        }
    }

    /// Cloud step. Skipped without catch-up when the clouds are not mounted.
    pub fn advance_clouds(&mut self, delta: f64) {
        if let Some(clouds) = self.clouds.as_mut() {
            clouds.rotation.advance(delta, CLOUDS_RATE);
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.body.is_some() && self.clouds.is_some()
    }
}
