// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped listener subscriptions
//!
//! A [`Binding`] ties one listener to one `(target, event)` pair and keeps
//! track of whether it is currently subscribed, so enable and disable can be
//! called any number of times without duplicating or over-removing the
//! registration. Dropping a binding unsubscribes it.

use eventful_core::{EventBus, Listener, MutationOutcome, TargetKey};

pub struct Binding {
    bus: EventBus,
    event: String,
    target: Option<TargetKey>,
    listener: Listener,
    bound: bool,
}

impl Binding {
    /// Create a disabled binding for a global event
    pub fn new(bus: &EventBus, event: impl Into<String>, listener: Listener) -> Self {
        Self {
            bus: bus.clone(),
            event: event.into(),
            target: None,
            listener,
            bound: false,
        }
    }

    /// Create a disabled binding for an event scoped to `target`
    pub fn targeted(
        bus: &EventBus,
        target: TargetKey,
        event: impl Into<String>,
        listener: Listener,
    ) -> Self {
        Self {
            bus: bus.clone(),
            event: event.into(),
            target: Some(target),
            listener,
            bound: false,
        }
    }

    /// Subscribe the listener unless it is already bound
    pub fn enable(&mut self) -> Option<MutationOutcome> {
        if self.bound {
            return None;
        }
        self.bound = true;
        tracing::debug!(
            event = %self.event,
            target = self.target.map(TargetKey::as_raw),
            "binding enabled"
        );
        Some(
            self.bus
                .subscribe_to(self.target, &self.event, self.listener.clone()),
        )
    }

    /// Unsubscribe the listener if it is bound
    pub fn disable(&mut self) -> Option<MutationOutcome> {
        if !self.bound {
            return None;
        }
        self.bound = false;
        tracing::debug!(
            event = %self.event,
            target = self.target.map(TargetKey::as_raw),
            "binding disabled"
        );
        Some(
            self.bus
                .unsubscribe_from(self.target, &self.event, &self.listener),
        )
    }

    /// Point the binding at a new `(target, event)` pair
    ///
    /// A bound binding is moved: it unsubscribes from the old pair and
    /// subscribes to the new one. A disabled binding stays disabled.
    pub fn rebind(&mut self, target: Option<TargetKey>, event: impl Into<String>) {
        let was_bound = self.bound;
        self.disable();
        self.target = target;
        self.event = event.into();
        if was_bound {
            self.enable();
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn target(&self) -> Option<TargetKey> {
        self.target
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.disable();
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("event", &self.event)
            .field("target", &self.target)
            .field("bound", &self.bound)
            .finish()
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
