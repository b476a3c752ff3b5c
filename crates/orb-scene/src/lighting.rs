//! The single point light that shades both scenes.

use glam::Vec3;

/// A point light with range falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    /// Distance at which the light reaches zero. 0 means unbounded.
    pub distance: f32,
    pub decay: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 10.0),
            intensity: 200.0,
            distance: 100.0,
            decay: 2.0,
        }
    }
}

impl PointLight {
    /// Falloff factor at distance `d`, matching the shader.
    #[must_use]
    pub fn attenuation(&self, d: f32) -> f32 {
        let inverse = 1.0 / d.powf(self.decay).max(0.01);
        if self.distance > 0.0 {
            let ratio = (d / self.distance).powi(4);
            let window = (1.0 - ratio).clamp(0.0, 1.0);
            inverse * window * window
        } else {
            inverse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_square_near_light() {
        let light = PointLight::default();
        let a = light.attenuation(2.0);
        assert!((a - 0.25).abs() < 1e-4, "a = {a}");
    }

    #[test]
    fn test_zero_beyond_cutoff() {
        let light = PointLight::default();
        assert_eq!(light.attenuation(100.0), 0.0);
        assert_eq!(light.attenuation(150.0), 0.0);
    }

    #[test]
    fn test_unbounded_light() {
        let light = PointLight {
            distance: 0.0,
            ..PointLight::default()
        };
        assert!((light.attenuation(200.0) - 1.0 / 40_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_range_capped() {
        let light = PointLight::default();
        assert!((light.attenuation(0.0) - 100.0).abs() < 1e-3);
    }
}
