//! Pointer input for the viewer: winit event translation, the drag-driven
//! color mapper, and scoped listener subscriptions.

pub mod color;
pub mod dispatch;
pub mod event;

pub use color::{ColorValue, PointerColorMapper};
pub use dispatch::{PointerDispatcher, PointerListener, PointerSubscription};
pub use event::{PointerEvent, PointerTranslator, Viewport};
