// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forward one event to a list of callbacks

use crate::binding::Binding;
use eventful_core::{EventBus, Listener, TargetKey};
use std::cell::RefCell;
use std::rc::Rc;

type Callbacks = Rc<RefCell<Vec<Rc<dyn Fn()>>>>;

/// Invokes its callbacks whenever the configured event is sent
///
/// Relays start enabled. Callbacks run in the order they were added.
pub struct EventRelay {
    callbacks: Callbacks,
    binding: Binding,
}

impl EventRelay {
    pub fn new(bus: &EventBus, event: impl Into<String>) -> Self {
        let callbacks = Callbacks::default();
        let binding = Binding::new(bus, event, forwarder(&callbacks));
        Self::enabled(callbacks, binding)
    }

    pub fn targeted(bus: &EventBus, target: TargetKey, event: impl Into<String>) -> Self {
        let callbacks = Callbacks::default();
        let binding = Binding::targeted(bus, target, event, forwarder(&callbacks));
        Self::enabled(callbacks, binding)
    }

    fn enabled(callbacks: Callbacks, mut binding: Binding) -> Self {
        binding.enable();
        Self { callbacks, binding }
    }

    /// Add a callback to run when the event is sent
    pub fn on_event(&self, callback: impl Fn() + 'static) {
        self.callbacks.borrow_mut().push(Rc::new(callback));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.binding.enable();
        } else {
            self.binding.disable();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.binding.is_bound()
    }

    /// Listen for a global event instead of the current one
    pub fn listen_for(&mut self, event: impl Into<String>) {
        self.binding.rebind(None, event);
    }

    /// Listen for an event scoped to `target` instead of the current one
    pub fn listen_for_target(&mut self, target: TargetKey, event: impl Into<String>) {
        self.binding.rebind(Some(target), event);
    }

    pub fn event(&self) -> &str {
        self.binding.event()
    }

    pub fn target(&self) -> Option<TargetKey> {
        self.binding.target()
    }
}

fn forwarder(callbacks: &Callbacks) -> Listener {
    let callbacks = Rc::clone(callbacks);
    Listener::new(move || {
        // Callbacks may add more callbacks
        let snapshot = callbacks.borrow().clone();
        tracing::trace!(callbacks = snapshot.len(), "relaying event");
        for callback in snapshot {
            callback();
        }
    })
}

impl std::fmt::Debug for EventRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRelay")
            .field("binding", &self.binding)
            .field("callbacks", &self.callbacks.borrow().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
