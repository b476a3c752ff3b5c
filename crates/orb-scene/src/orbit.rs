//! Orbiting camera around the origin.
//!
//! Angles follow the usual spherical convention for a Y-up scene: `theta` is
//! the azimuth measured from +Z toward +X and `phi` the polar angle from +Y.
//! Dragging and auto-rotation queue angle deltas that [`OrbitController::update`]
//! applies once per frame, optionally damped.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use orb_input::{PointerEvent, PointerListener, Viewport};

/// Keeps the camera off the poles so the up vector stays defined.
const POLE_EPSILON: f32 = 1e-6;

/// Tunables for [`OrbitController`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSettings {
    /// Starting distance from the origin along +Z.
    pub distance: f32,
    pub rotate_speed: f32,
    pub auto_rotate: bool,
    /// Full turns per minute when auto-rotating.
    pub auto_rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    /// Fraction of the queued delta applied per frame when damping.
    pub damping_factor: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            distance: 4.0,
            rotate_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 5.0,
            enable_zoom: false,
            zoom_speed: 1.0,
            min_distance: 1.5,
            max_distance: 20.0,
            enable_damping: true,
            damping_factor: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrbitController {
    settings: OrbitSettings,
    radius: f32,
    theta: f32,
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    dragging: bool,
    last_pointer: Option<(f64, f64)>,
}

impl OrbitController {
    #[must_use]
    pub fn new(settings: OrbitSettings) -> Self {
        let radius = settings.distance.clamp(settings.min_distance, settings.max_distance);
        Self {
            settings,
            radius,
            theta: 0.0,
            phi: PI / 2.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            dragging: false,
            last_pointer: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    /// Swaps in new tunables, keeping the current angles. The distance is
    /// re-clamped to the new zoom range.
    pub fn set_settings(&mut self, settings: OrbitSettings) {
        self.radius = self.radius.clamp(settings.min_distance, settings.max_distance);
        self.settings = settings;
    }

    /// Changes the auto-rotation rate, e.g. when the scene switches.
    pub fn set_auto_rotate_speed(&mut self, speed: f32) {
        self.settings.auto_rotate_speed = speed;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    #[must_use]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    #[must_use]
    pub fn phi(&self) -> f32 {
        self.phi
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Eye position in world space. The camera always looks at the origin.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        )
    }

    /// Applies queued rotation and zoom, plus auto-rotation for `delta` seconds.
    pub fn update(&mut self, delta: f64) {
        if self.settings.auto_rotate && !self.dragging {
            self.pending_theta -= TAU / 60.0 * self.settings.auto_rotate_speed * delta as f32;
        }

        if self.settings.enable_damping {
            let f = self.settings.damping_factor;
            self.theta += self.pending_theta * f;
            self.phi += self.pending_phi * f;
            self.pending_theta *= 1.0 - f;
            self.pending_phi *= 1.0 - f;
        } else {
            self.theta += self.pending_theta;
            self.phi += self.pending_phi;
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.phi = self.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        self.radius = (self.radius * self.pending_scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.pending_scale = 1.0;
    }

    fn rotate_by_pixels(&mut self, dx: f64, dy: f64, viewport: Viewport) {
        if viewport.height == 0 {
            return;
        }
        let h = viewport.height as f32;
        let speed = self.settings.rotate_speed;
        self.pending_theta -= TAU * dx as f32 / h * speed;
        self.pending_phi -= TAU * dy as f32 / h * speed;
    }

    fn zoom_by_lines(&mut self, lines: f32) {
        if !self.settings.enable_zoom {
            return;
        }
        self.pending_scale *= 0.95_f32.powf(self.settings.zoom_speed * lines);
    }
}

impl PointerListener for OrbitController {
    fn on_pointer(&mut self, event: PointerEvent, viewport: Viewport) {
        match event {
            PointerEvent::DragStart { at } => {
                self.dragging = true;
                self.last_pointer = at;
            }
            PointerEvent::DragEnd => {
                self.dragging = false;
                self.last_pointer = None;
            }
            PointerEvent::Move { x, y } => {
                if self.dragging
                    && let Some((px, py)) = self.last_pointer
                {
                    self.rotate_by_pixels(x - px, y - py, viewport);
                }
                self.last_pointer = Some((x, y));
            }
            PointerEvent::Wheel(lines) => self.zoom_by_lines(lines),
        }
    }
}
