//! Ordered per-frame callbacks.

use tracing::trace;

/// Handle returned by [`FrameScheduler::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u64);

type FrameCallback<C> = Box<dyn FnMut(&mut C, f64)>;

/// Runs registered callbacks once per frame, in registration order, against
/// a shared context `C`.
pub struct FrameScheduler<C> {
    next_id: u64,
    callbacks: Vec<(FrameCallbackId, &'static str, FrameCallback<C>)>,
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FrameScheduler<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    /// Appends a callback to the end of the run order.
    pub fn register(
        &mut self,
        label: &'static str,
        callback: impl FnMut(&mut C, f64) + 'static,
    ) -> FrameCallbackId {
        let id = FrameCallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, label, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was already gone.
    pub fn unregister(&mut self, id: FrameCallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cid, _, _)| *cid != id);
        self.callbacks.len() != before
    }

    /// Invokes every callback exactly once with the frame delta in seconds.
    pub fn run(&mut self, ctx: &mut C, delta: f64) {
        for (_, label, callback) in &mut self.callbacks {
            trace!(callback = *label, delta, "frame callback");
            callback(ctx, delta);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Callback labels in run order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.callbacks.iter().map(|(_, label, _)| *label)
    }
}
