//! Scroll event registration.
//!
//! Handlers are registered explicitly and addressed by stable tokens, so a
//! host can unsubscribe without holding weak references into the
//! controller. All channels share one slotmap, so a token is unique across
//! the whole registry and unsubscribing can never touch another channel's
//! handler. Events fire on the UI thread, inside the per-frame diff.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Subscription token returned by the `on_*` methods.
    pub struct HandlerId;
}

enum Handler {
    Scroll(Box<dyn FnMut(f32)>),
    Offset(Box<dyn FnMut(f32)>),
    ReachStart(Box<dyn FnMut()>),
    ReachEnd(Box<dyn FnMut()>),
    IndexChanged(Box<dyn FnMut(usize, usize)>),
    ScrollStop(Box<dyn FnMut()>),
}

#[derive(Default)]
pub struct ScrollEvents {
    handlers: SlotMap<HandlerId, Handler>,
}

impl ScrollEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame scroll delta, fired once per layout pass.
    pub fn on_scroll(&mut self, f: impl FnMut(f32) + 'static) -> HandlerId {
        self.handlers.insert(Handler::Scroll(Box::new(f)))
    }

    /// Raw offset change, fired whenever a delta is accepted.
    pub fn on_offset_changed(&mut self, f: impl FnMut(f32) + 'static) -> HandlerId {
        self.handlers.insert(Handler::Offset(Box::new(f)))
    }

    pub fn on_reach_start(&mut self, f: impl FnMut() + 'static) -> HandlerId {
        self.handlers.insert(Handler::ReachStart(Box::new(f)))
    }

    pub fn on_reach_end(&mut self, f: impl FnMut() + 'static) -> HandlerId {
        self.handlers.insert(Handler::ReachEnd(Box::new(f)))
    }

    /// Visible index window changed; fired with the new inclusive bounds.
    pub fn on_index_changed(&mut self, f: impl FnMut(usize, usize) + 'static) -> HandlerId {
        self.handlers.insert(Handler::IndexChanged(Box::new(f)))
    }

    pub fn on_scroll_stop(&mut self, f: impl FnMut() + 'static) -> HandlerId {
        self.handlers.insert(Handler::ScrollStop(Box::new(f)))
    }

    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        self.handlers.remove(id).is_some()
    }

    pub fn has_scroll_handlers(&self) -> bool {
        self.handlers
            .values()
            .any(|h| matches!(h, Handler::Scroll(_)))
    }

    pub(crate) fn fire_scroll(&mut self, delta: f32) {
        for h in self.handlers.values_mut() {
            if let Handler::Scroll(f) = h {
                f(delta);
            }
        }
    }

    pub(crate) fn fire_offset(&mut self, offset: f32) {
        for h in self.handlers.values_mut() {
            if let Handler::Offset(f) = h {
                f(offset);
            }
        }
    }

    pub(crate) fn fire_reach_start(&mut self) {
        for h in self.handlers.values_mut() {
            if let Handler::ReachStart(f) = h {
                f();
            }
        }
    }

    pub(crate) fn fire_reach_end(&mut self) {
        for h in self.handlers.values_mut() {
            if let Handler::ReachEnd(f) = h {
                f();
            }
        }
    }

    pub(crate) fn fire_index_changed(&mut self, start: usize, end: usize) {
        for h in self.handlers.values_mut() {
            if let Handler::IndexChanged(f) = h {
                f(start, end);
            }
        }
    }

    pub(crate) fn fire_scroll_stop(&mut self) {
        for h in self.handlers.values_mut() {
            if let Handler::ScrollStop(f) = h {
                f();
            }
        }
    }
}
