//! Window, event loop, and key bindings for the sphere viewer.

pub mod controls;
pub mod frame_clock;
pub mod platform;
pub mod window;

pub use window::{App, AppError, run};
