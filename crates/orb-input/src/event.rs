//! Logical pointer events and their translation from winit.
//!
//! Mouse buttons and touch points both collapse into the same drag/move
//! vocabulary. With several fingers down, only the oldest active touch
//! drives the pointer position.

use winit::event::{ElementState, MouseScrollDelta, TouchPhase};

/// Inner size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, or 1.0 for a degenerate viewport.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// A pointer event after translation from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed or a touch started. `at` is the pointer
    /// position the drag starts from, when known.
    DragStart { at: Option<(f64, f64)> },
    /// Mouse button released or a touch ended/cancelled.
    DragEnd,
    /// Pointer position in viewport pixels, origin top-left.
    Move { x: f64, y: f64 },
    /// Wheel movement in lines, positive away from the user.
    Wheel(f32),
}

/// Pixels treated as one wheel line for high-resolution scroll devices.
const PIXELS_PER_LINE: f64 = 40.0;

/// Converts raw winit pointer input into [`PointerEvent`]s.
#[derive(Debug, Default)]
pub struct PointerTranslator {
    /// Active touches in the order they started: `(id, x, y)`.
    touches: Vec<(u64, f64, f64)>,
    /// Last mouse cursor position.
    cursor: Option<(f64, f64)>,
}

impl PointerTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `WindowEvent::MouseInput`. Every button starts and ends a drag.
    pub fn on_mouse_button(&mut self, state: ElementState) -> PointerEvent {
        match state {
            ElementState::Pressed => PointerEvent::DragStart { at: self.cursor },
            ElementState::Released => PointerEvent::DragEnd,
        }
    }

    /// `WindowEvent::CursorMoved`.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> PointerEvent {
        self.cursor = Some((x, y));
        PointerEvent::Move { x, y }
    }

    /// `WindowEvent::MouseWheel`.
    pub fn on_wheel(&mut self, delta: MouseScrollDelta) -> PointerEvent {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        PointerEvent::Wheel(lines)
    }

    /// `WindowEvent::Touch`.
    ///
    /// Returns `None` when a touch moves but no tracked touch exists, which
    /// happens if the start event was delivered before the window had focus.
    pub fn on_touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                self.touches.retain(|(tid, _, _)| *tid != id);
                self.touches.push((id, x, y));
                // Moves report the primary touch, so the drag anchors there.
                Some(PointerEvent::DragStart {
                    at: self.primary_touch(),
                })
            }
            TouchPhase::Moved => {
                if let Some(entry) = self.touches.iter_mut().find(|(tid, _, _)| *tid == id) {
                    entry.1 = x;
                    entry.2 = y;
                }
                self.primary_touch()
                    .map(|(x, y)| PointerEvent::Move { x, y })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|(tid, _, _)| *tid != id);
                Some(PointerEvent::DragEnd)
            }
        }
    }

    /// Position of the oldest active touch.
    #[must_use]
    pub fn primary_touch(&self) -> Option<(f64, f64)> {
        self.touches.first().map(|&(_, x, y)| (x, y))
    }

    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_mouse_buttons_map_to_drag() {
        let mut t = PointerTranslator::new();
        assert_eq!(
            t.on_mouse_button(ElementState::Pressed),
            PointerEvent::DragStart { at: None }
        );
        assert_eq!(t.on_mouse_button(ElementState::Released), PointerEvent::DragEnd);
        t.on_cursor_moved(12.0, 34.0);
        assert_eq!(
            t.on_mouse_button(ElementState::Pressed),
            PointerEvent::DragStart { at: Some((12.0, 34.0)) }
        );
    }

    #[test]
    fn test_touch_start_carries_anchor() {
        let mut t = PointerTranslator::new();
        assert_eq!(
            t.on_touch(1, TouchPhase::Started, 100.0, 100.0),
            Some(PointerEvent::DragStart { at: Some((100.0, 100.0)) })
        );
        t.on_touch(1, TouchPhase::Ended, 100.0, 100.0);
        assert_eq!(
            t.on_touch(2, TouchPhase::Started, 700.0, 500.0),
            Some(PointerEvent::DragStart { at: Some((700.0, 500.0)) })
        );
        // A second finger keeps the first one as the anchor.
        assert_eq!(
            t.on_touch(3, TouchPhase::Started, 5.0, 5.0),
            Some(PointerEvent::DragStart { at: Some((700.0, 500.0)) })
        );
    }

    #[test]
    fn test_second_touch_does_not_steer() {
        let mut t = PointerTranslator::new();
        t.on_touch(1, TouchPhase::Started, 10.0, 20.0);
        t.on_touch(2, TouchPhase::Started, 500.0, 500.0);

        let ev = t.on_touch(2, TouchPhase::Moved, 600.0, 600.0);
        assert_eq!(ev, Some(PointerEvent::Move { x: 10.0, y: 20.0 }));

        let ev = t.on_touch(1, TouchPhase::Moved, 30.0, 40.0);
        assert_eq!(ev, Some(PointerEvent::Move { x: 30.0, y: 40.0 }));
    }

    #[test]
    fn test_primary_touch_promotes_after_release() {
        let mut t = PointerTranslator::new();
        t.on_touch(1, TouchPhase::Started, 10.0, 20.0);
        t.on_touch(2, TouchPhase::Started, 500.0, 500.0);
        assert_eq!(t.on_touch(1, TouchPhase::Ended, 10.0, 20.0), Some(PointerEvent::DragEnd));
        assert_eq!(t.active_touches(), 1);
        assert_eq!(t.primary_touch(), Some((500.0, 500.0)));
    }

    #[test]
    fn test_cancelled_touch_ends_drag() {
        let mut t = PointerTranslator::new();
        t.on_touch(7, TouchPhase::Started, 1.0, 1.0);
        assert_eq!(t.on_touch(7, TouchPhase::Cancelled, 1.0, 1.0), Some(PointerEvent::DragEnd));
        assert_eq!(t.active_touches(), 0);
        assert_eq!(t.on_touch(7, TouchPhase::Moved, 2.0, 2.0), None);
    }

    #[test]
    fn test_wheel_pixel_delta_normalized() {
        let mut t = PointerTranslator::new();
        let ev = t.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0)));
        assert_eq!(ev, PointerEvent::Wheel(2.0));
        let ev = t.on_wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert_eq!(ev, PointerEvent::Wheel(-1.0));
    }

    #[test]
    fn test_viewport_aspect() {
        assert!((Viewport::new(800, 600).aspect() - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(Viewport::new(800, 0).aspect(), 1.0);
    }
}
