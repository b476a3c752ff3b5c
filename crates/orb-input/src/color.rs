//! Pointer-to-color mapping for the ball.

use tracing::trace;

use crate::dispatch::PointerListener;
use crate::event::{PointerEvent, Viewport};

/// An RGB triple on the 0..=255 scale.
///
/// Channels are signed and unclamped: a pointer dragged outside the window
/// produces values below 0 or above 255. Clamping happens when the color is
/// handed to the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl ColorValue {
    /// Blue channel held constant while dragging.
    pub const BLUE: i32 = 150;

    /// Color shown before the first drag.
    pub const INITIAL: Self = Self::new(80, 125, 150);

    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    /// Maps a viewport position to a color.
    #[must_use]
    pub fn from_pointer(x: f64, y: f64, viewport: Viewport) -> Self {
        Self {
            r: scale_channel(x, viewport.width),
            g: scale_channel(y, viewport.height),
            b: Self::BLUE,
        }
    }

    /// Channels clamped to `0..=255` as normalized sRGB floats.
    #[must_use]
    pub fn to_srgb_f32(self) -> [f32; 3] {
        let c = |v: i32| v.clamp(0, 255) as f32 / 255.0;
        [c(self.r), c(self.g), c(self.b)]
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// `round(coord / extent * 255)` with halves rounded up.
fn scale_channel(coord: f64, extent: u32) -> i32 {
    if extent == 0 {
        return 0;
    }
    let v = (coord / f64::from(extent)) * 255.0;
    (v + 0.5).floor() as i32
}

/// Tracks the drag flag and the ball color it drives.
#[derive(Debug, Clone, Default)]
pub struct PointerColorMapper {
    is_dragging: bool,
    color: ColorValue,
}

impl PointerColorMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    #[must_use]
    pub fn color(&self) -> ColorValue {
        self.color
    }

    /// Applies one pointer event. Only moves made during a drag recolor.
    pub fn handle(&mut self, event: PointerEvent, viewport: Viewport) {
        match event {
            PointerEvent::DragStart { .. } => self.is_dragging = true,
            PointerEvent::DragEnd => self.is_dragging = false,
            PointerEvent::Move { x, y } if self.is_dragging => {
                self.color = ColorValue::from_pointer(x, y, viewport);
                trace!(r = self.color.r, g = self.color.g, "ball recolored");
            }
            PointerEvent::Move { .. } | PointerEvent::Wheel(_) => {}
        }
    }
}

impl PointerListener for PointerColorMapper {
    fn on_pointer(&mut self, event: PointerEvent, viewport: Viewport) {
        self.handle(event, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport { width: 800, height: 600 };

    #[test]
    fn test_initial_color() {
        let m = PointerColorMapper::new();
        assert!(!m.is_dragging());
        assert_eq!(m.color(), ColorValue::new(80, 125, 150));
    }

    #[test]
    fn test_drag_recolors_from_position() {
        let mut m = PointerColorMapper::new();
        m.handle(PointerEvent::DragStart { at: None }, VP);
        m.handle(PointerEvent::Move { x: 200.0, y: 150.0 }, VP);
        // 200/800*255 = 63.75, 150/600*255 = 63.75
        assert_eq!(m.color(), ColorValue::new(64, 64, 150));
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut m = PointerColorMapper::new();
        m.handle(PointerEvent::Move { x: 800.0, y: 600.0 }, VP);
        assert_eq!(m.color(), ColorValue::INITIAL);
    }

    #[test]
    fn test_press_release_without_move_keeps_color() {
        let mut m = PointerColorMapper::new();
        m.handle(PointerEvent::DragStart { at: None }, VP);
        m.handle(PointerEvent::DragEnd, VP);
        assert_eq!(m.color(), ColorValue::INITIAL);
        assert!(!m.is_dragging());
    }

    #[test]
    fn test_color_persists_after_release() {
        let mut m = PointerColorMapper::new();
        m.handle(PointerEvent::DragStart { at: None }, VP);
        m.handle(PointerEvent::Move { x: 400.0, y: 300.0 }, VP);
        m.handle(PointerEvent::Move { x: 800.0, y: 600.0 }, VP);
        m.handle(PointerEvent::DragEnd, VP);
        m.handle(PointerEvent::Move { x: 0.0, y: 0.0 }, VP);
        assert_eq!(m.color(), ColorValue::new(255, 255, 150));
    }

    #[test]
    fn test_half_rounds_up() {
        // 0.5 * 255 = 127.5 exactly
        let c = ColorValue::from_pointer(1.0, 3.0, Viewport::new(2, 4));
        assert_eq!(c.r, 128, "127.5 rounds up");
        assert_eq!(c.g, 191, "191.25 rounds down");
    }

    #[test]
    fn test_outside_window_is_unclamped() {
        let mut m = PointerColorMapper::new();
        m.handle(PointerEvent::DragStart { at: None }, VP);
        m.handle(PointerEvent::Move { x: -80.0, y: 1200.0 }, VP);
        // -25.5 rounds toward +inf
        assert_eq!(m.color(), ColorValue::new(-25, 510, 150));
    }

    #[test]
    fn test_gpu_conversion_clamps() {
        let c = ColorValue::new(-25, 510, 150).to_srgb_f32();
        assert_eq!(c[0], 0.0);
        assert_eq!(c[1], 1.0);
        assert!((c[2] - 150.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_viewport_does_not_panic() {
        let c = ColorValue::from_pointer(10.0, 10.0, Viewport::new(0, 0));
        assert_eq!(c, ColorValue::new(0, 0, 150));
    }
}
