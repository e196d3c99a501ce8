// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus: registry owner and reentrant dispatcher
//!
//! `send` walks a snapshot of the matching listener lists while an
//! invocation depth counter is raised. Any registry mutation requested while
//! the depth is non-zero (including from the listener being invoked) is
//! queued and replayed in FIFO order once the outermost `send` returns, so a
//! list is never modified while it is being dispatched.
//!
//! The bus is single-threaded: handles are `Rc`-based and cannot cross
//! threads.

use crate::config::BusConfig;
use crate::error::DispatchError;
use crate::listener::{InvokeError, Listener};
use crate::mutation::{Mutation, MutationOutcome, MutationQueue};
use crate::payload::{ArityClass, Payload, Signature};
use crate::registry::{Registry, RegistrySnapshot};
use crate::target::TargetKey;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

struct Inner {
    registry: RefCell<Registry>,
    queue: RefCell<MutationQueue>,
    depth: Cell<usize>,
    config: BusConfig,
}

/// In-process event bus
///
/// Clones share the same registry.
///
/// ```
/// use eventful_core::{EventBus, Listener};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let bus = EventBus::new();
/// let total = Rc::new(Cell::new(0));
///
/// let add = Listener::new({
///     let total = Rc::clone(&total);
///     move |n: i32| total.set(total.get() + n)
/// });
/// bus.subscribe("add", add.clone());
///
/// bus.send_with("add", (2,)).unwrap();
/// bus.send_with("add", (3,)).unwrap();
/// assert_eq!(total.get(), 5);
///
/// bus.unsubscribe("add", &add);
/// assert!(bus.is_empty());
/// ```
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<Inner>,
}

/// Non-owning handle to an [`EventBus`]
///
/// Listeners that need to reach the bus they are registered on should
/// capture one of these; a strong handle would keep the registry alive
/// through its own listeners.
#[derive(Clone)]
pub struct WeakEventBus {
    inner: Weak<Inner>,
}

impl WeakEventBus {
    pub fn upgrade(&self) -> Option<EventBus> {
        self.inner.upgrade().map(|inner| EventBus { inner })
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                registry: RefCell::new(Registry::new()),
                queue: RefCell::new(MutationQueue::new()),
                depth: Cell::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    pub fn downgrade(&self) -> WeakEventBus {
        WeakEventBus {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // -- Dispatch ------------------------------------------------------------

    /// Send `event` to global listeners without a payload
    pub fn send(&self, event: &str) -> Result<(), DispatchError> {
        self.send_to_with(None, event, ())
    }

    /// Send `event` to global listeners with a payload tuple
    pub fn send_with<P: Payload>(&self, event: &str, payload: P) -> Result<(), DispatchError> {
        self.send_to_with(None, event, payload)
    }

    /// Send `event` to listeners scoped to `target`
    ///
    /// A `None` target sends to the global listeners instead.
    pub fn send_to(
        &self,
        target: impl Into<Option<TargetKey>>,
        event: &str,
    ) -> Result<(), DispatchError> {
        self.send_to_with(target, event, ())
    }

    /// Send `event` with a payload to listeners scoped to `target`
    ///
    /// Payload listeners run first, in registration order, skipping any whose
    /// arity differs from the payload's. No-payload listeners run after them
    /// on every send. The first failing listener aborts the dispatch.
    pub fn send_to_with<P: Payload>(
        &self,
        target: impl Into<Option<TargetKey>>,
        event: &str,
        payload: P,
    ) -> Result<(), DispatchError> {
        let target = target.into();

        if let Some(limit) = self.inner.config.depth_limit() {
            if self.inner.depth.get() >= limit {
                tracing::warn!(event, limit, "dispatch depth limit reached");
                return Err(DispatchError::DepthExceeded {
                    event: event.to_string(),
                    limit,
                });
            }
        }

        let _guard = DepthGuard::enter(self);

        if P::ARITY > 0 {
            let signature = Signature::of::<P>();
            for listener in self.resolve(target, event, ArityClass::WithPayload) {
                if listener.arity() != P::ARITY {
                    tracing::trace!(
                        event,
                        expected = %listener.signature(),
                        actual = %signature,
                        "skipping listener with different arity"
                    );
                    continue;
                }
                self.invoke(&listener, event, &signature, &payload)?;
            }
        }

        let empty = Signature::of::<()>();
        for listener in self.resolve(target, event, ArityClass::NoPayload) {
            self.invoke(&listener, event, &empty, &())?;
        }

        Ok(())
    }

    fn resolve(&self, target: Option<TargetKey>, event: &str, class: ArityClass) -> Vec<Listener> {
        self.inner.registry.borrow().resolve(target, event, class)
    }

    fn invoke(
        &self,
        listener: &Listener,
        event: &str,
        signature: &Signature,
        payload: &dyn Any,
    ) -> Result<(), DispatchError> {
        if !listener.signature().accepts(signature) {
            return Err(self.mismatch(listener, event, signature));
        }

        tracing::trace!(event, depth = self.inner.depth.get(), "invoking listener");
        listener.invoke(payload).map_err(|err| match err {
            InvokeError::Mismatch => self.mismatch(listener, event, signature),
            InvokeError::Fault(source) => {
                tracing::warn!(event, error = %source, "listener failed");
                DispatchError::ListenerFault {
                    event: event.to_string(),
                    source,
                }
            }
        })
    }

    fn mismatch(&self, listener: &Listener, event: &str, actual: &Signature) -> DispatchError {
        tracing::warn!(
            event,
            expected = %listener.signature(),
            actual = %actual,
            "listener signature does not match payload"
        );
        DispatchError::SignatureMismatch {
            event: event.to_string(),
            expected: listener.signature().to_string(),
            actual: actual.to_string(),
        }
    }

    // -- Mutation ------------------------------------------------------------

    /// Register a global listener for `event`
    pub fn subscribe(&self, event: &str, listener: Listener) -> MutationOutcome {
        self.subscribe_to(None, event, listener)
    }

    /// Register a listener for `event` scoped to `target`
    pub fn subscribe_to(
        &self,
        target: impl Into<Option<TargetKey>>,
        event: &str,
        listener: Listener,
    ) -> MutationOutcome {
        self.mutate(Mutation::Subscribe {
            target: target.into(),
            event: event.to_string(),
            listener,
        })
    }

    /// Remove the first registration of `listener` for global `event`
    pub fn unsubscribe(&self, event: &str, listener: &Listener) -> MutationOutcome {
        self.unsubscribe_from(None, event, listener)
    }

    /// Remove the first registration of `listener` for `event` on `target`
    pub fn unsubscribe_from(
        &self,
        target: impl Into<Option<TargetKey>>,
        event: &str,
        listener: &Listener,
    ) -> MutationOutcome {
        self.mutate(Mutation::Unsubscribe {
            target: target.into(),
            event: event.to_string(),
            listener: listener.clone(),
        })
    }

    /// Remove every global listener for `event`
    pub fn remove_event(&self, event: &str) -> MutationOutcome {
        self.mutate(Mutation::RemoveEvent {
            event: event.to_string(),
        })
    }

    /// Remove every listener scoped to `target`
    pub fn remove_target(&self, target: TargetKey) -> MutationOutcome {
        self.mutate(Mutation::RemoveTarget { target })
    }

    /// Remove every listener for `event` scoped to `target`
    pub fn remove_target_event(&self, target: TargetKey, event: &str) -> MutationOutcome {
        self.mutate(Mutation::RemoveTargetEvent {
            target,
            event: event.to_string(),
        })
    }

    /// Remove every listener
    pub fn remove_all(&self) -> MutationOutcome {
        self.mutate(Mutation::RemoveAll)
    }

    fn mutate(&self, mutation: Mutation) -> MutationOutcome {
        let depth = self.inner.depth.get();
        if depth > 0 {
            tracing::debug!(
                op = mutation.name(),
                event = mutation.event(),
                depth,
                "deferring mutation until dispatch unwinds"
            );
            self.inner.queue.borrow_mut().push(mutation);
            return MutationOutcome::Deferred;
        }
        self.apply(mutation)
    }

    fn apply(&self, mutation: Mutation) -> MutationOutcome {
        let op = mutation.name();
        let event = mutation.event().map(str::to_string);
        let target = mutation.target();

        let (outcome, released) = {
            let mut registry = self.inner.registry.borrow_mut();
            mutation.apply(&mut registry)
        };
        drop(released);

        if outcome == MutationOutcome::NotRegistered {
            if self.inner.config.warn_on_unregistered {
                tracing::warn!(
                    event = event.as_deref(),
                    target = target.map(TargetKey::as_raw),
                    "could not remove listener because it is not registered"
                );
            } else {
                tracing::debug!(
                    event = event.as_deref(),
                    target = target.map(TargetKey::as_raw),
                    "could not remove listener because it is not registered"
                );
            }
        } else {
            tracing::trace!(op, event = event.as_deref(), "applied mutation");
        }
        outcome
    }

    fn drain(&self) {
        let pending = self.inner.queue.borrow().len();
        if pending == 0 {
            return;
        }
        tracing::debug!(pending, "applying deferred mutations");
        loop {
            let next = self.inner.queue.borrow_mut().pop();
            let Some(mutation) = next else {
                break;
            };
            self.apply(mutation);
        }
    }

    // -- Diagnostics ---------------------------------------------------------

    /// Number of `send` calls currently on the stack
    pub fn depth(&self) -> usize {
        self.inner.depth.get()
    }

    pub fn pending_mutations(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Total number of registrations
    pub fn listener_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.borrow().is_empty()
    }

    pub fn contains_target(&self, target: TargetKey) -> bool {
        self.inner.registry.borrow().contains_target(target)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut snapshot = self.inner.registry.borrow().snapshot();
        snapshot.pending_mutations = self.pending_mutations();
        snapshot
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .field("depth", &self.depth())
            .field("pending_mutations", &self.pending_mutations())
            .finish()
    }
}

/// Raises the dispatch depth for the lifetime of one `send`
///
/// Dropping the guard lowers the depth on every exit path, including a
/// listener error or a panic unwinding through `send`. The guard that brings
/// the depth back to zero replays the mutation queue until it is empty.
struct DepthGuard<'a> {
    bus: &'a EventBus,
}

impl<'a> DepthGuard<'a> {
    fn enter(bus: &'a EventBus) -> Self {
        bus.inner.depth.set(bus.inner.depth.get() + 1);
        Self { bus }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let depth = self.bus.inner.depth.get().saturating_sub(1);
        if depth > 0 {
            self.bus.inner.depth.set(depth);
            return;
        }
        // Depth stays raised while draining so mutations issued by released
        // listeners queue behind the older ones
        let _reset = ResetDepth(self.bus);
        self.bus.drain();
    }
}

/// Drops the depth to zero once the drain finishes, even if it panics
struct ResetDepth<'a>(&'a EventBus);

impl Drop for ResetDepth<'_> {
    fn drop(&mut self) {
        self.0.inner.depth.set(0);
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
