//! Scoped pointer listener registration.
//!
//! A [`PointerSubscription`] owns the registration: dropping it removes the
//! listener from the dispatcher, so a scene that goes away can never keep
//! receiving events and re-subscribing never delivers an event twice.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::event::{PointerEvent, Viewport};

/// Receiver of translated pointer events.
pub trait PointerListener {
    fn on_pointer(&mut self, event: PointerEvent, viewport: Viewport);
}

type SharedListener = Rc<RefCell<dyn PointerListener>>;

struct Registry {
    next_id: u64,
    listeners: Vec<(u64, SharedListener)>,
}

/// Fans pointer events out to subscribed listeners in subscription order.
pub struct PointerDispatcher {
    registry: Rc<RefCell<Registry>>,
    viewport: Viewport,
}

impl PointerDispatcher {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
            viewport,
        }
    }

    /// Registers `listener` until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe<L: PointerListener + 'static>(
        &self,
        listener: Rc<RefCell<L>>,
    ) -> PointerSubscription {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        let shared: SharedListener = listener;
        reg.listeners.push((id, shared));
        debug!(id, total = reg.listeners.len(), "pointer listener subscribed");
        PointerSubscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Delivers `event` to every live listener with the current viewport.
    pub fn dispatch(&self, event: PointerEvent) {
        // Snapshot so listeners may subscribe or unsubscribe while handling.
        let listeners: Vec<SharedListener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener.borrow_mut().on_pointer(event, self.viewport);
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Registration guard returned by [`PointerDispatcher::subscribe`].
#[derive(Debug)]
pub struct PointerSubscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut reg = registry.borrow_mut();
            reg.listeners.retain(|(id, _)| *id != self.id);
            debug!(id = self.id, total = reg.listeners.len(), "pointer listener released");
        }
    }
}
