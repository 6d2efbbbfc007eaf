//! Owned DOM event listeners with explicit rebind.
//!
//! A [`ListenerSet`] keeps every closure it attached together with its target,
//! so [`ListenerSet::detach_all`] can remove exactly those callbacks by
//! identity. Rebinding is always detach-then-attach; handlers never stack.

use crate::utils;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

/// Boxed DOM event callback.
pub type EventCallback = Closure<dyn FnMut(Event)>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: EventCallback,
}

/// A group of listeners that are attached and detached together.
#[derive(Default)]
pub struct ListenerSet {
    bound: Vec<Listener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a Rust callback for use with [`attach`](Self::attach).
    pub fn callback(f: impl FnMut(Event) + 'static) -> EventCallback {
        Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>)
    }

    /// Attach `callback` for `event` on `target`. Returns false (and drops the
    /// callback) if the browser refused the listener.
    pub fn attach(&mut self, target: &EventTarget, event: &'static str, callback: EventCallback) -> bool {
        if target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_err()
        {
            utils::warn(&format!("paysheet: could not attach '{}' listener", event));
            return false;
        }
        self.bound.push(Listener {
            target: target.clone(),
            event,
            callback,
        });
        true
    }

    /// Remove every listener this set attached.
    pub fn detach_all(&mut self) {
        for listener in self.bound.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.detach_all();
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.bound.iter().map(|l| l.event))
            .finish()
    }
}
