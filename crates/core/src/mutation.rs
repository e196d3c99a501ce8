// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry mutations and the deferred mutation queue
//!
//! Every registry change is expressed as a [`Mutation`]. Outside of a
//! dispatch the bus applies it right away; while a dispatch is running the
//! bus pushes it onto a [`MutationQueue`] and replays the queue in FIFO order
//! once the outermost `send` returns.

use crate::listener::Listener;
use crate::registry::Registry;
use crate::target::TargetKey;
use std::collections::VecDeque;

/// A registry change with its exact arguments
#[derive(Debug, Clone)]
pub enum Mutation {
    Subscribe {
        target: Option<TargetKey>,
        event: String,
        listener: Listener,
    },
    Unsubscribe {
        target: Option<TargetKey>,
        event: String,
        listener: Listener,
    },
    /// Drop an event from both global collections
    RemoveEvent { event: String },
    /// Drop every listener scoped to a target
    RemoveTarget { target: TargetKey },
    /// Drop one event under a target
    RemoveTargetEvent { target: TargetKey, event: String },
    /// Drop everything
    RemoveAll,
}

/// What happened to a mutation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The registry was updated
    Applied,
    /// A dispatch is running; the mutation will run once it unwinds
    Deferred,
    /// Unsubscribe found no matching listener; the registry is unchanged
    NotRegistered,
}

/// Listeners taken out of the registry by a mutation
///
/// Dropped by the caller once the registry is no longer borrowed.
pub type Released = Vec<Listener>;

impl Mutation {
    /// Short stable name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Subscribe { .. } => "subscribe",
            Mutation::Unsubscribe { .. } => "unsubscribe",
            Mutation::RemoveEvent { .. } => "remove_event",
            Mutation::RemoveTarget { .. } => "remove_target",
            Mutation::RemoveTargetEvent { .. } => "remove_target_event",
            Mutation::RemoveAll => "remove_all",
        }
    }

    pub fn event(&self) -> Option<&str> {
        match self {
            Mutation::Subscribe { event, .. }
            | Mutation::Unsubscribe { event, .. }
            | Mutation::RemoveEvent { event }
            | Mutation::RemoveTargetEvent { event, .. } => Some(event.as_str()),
            Mutation::RemoveTarget { .. } | Mutation::RemoveAll => None,
        }
    }

    pub fn target(&self) -> Option<TargetKey> {
        match self {
            Mutation::Subscribe { target, .. } | Mutation::Unsubscribe { target, .. } => *target,
            Mutation::RemoveTarget { target } | Mutation::RemoveTargetEvent { target, .. } => {
                Some(*target)
            }
            Mutation::RemoveEvent { .. } | Mutation::RemoveAll => None,
        }
    }

    /// Apply to `registry`, returning the outcome and whatever left the registry
    pub fn apply(self, registry: &mut Registry) -> (MutationOutcome, Released) {
        match self {
            Mutation::Subscribe {
                target,
                event,
                listener,
            } => {
                registry.insert(target, &event, listener);
                (MutationOutcome::Applied, Vec::new())
            }
            Mutation::Unsubscribe {
                target,
                event,
                listener,
            } => match registry.remove(target, &event, &listener) {
                Some(removed) => (MutationOutcome::Applied, vec![removed, listener]),
                None => (MutationOutcome::NotRegistered, vec![listener]),
            },
            Mutation::RemoveEvent { event } => {
                (MutationOutcome::Applied, registry.remove_event(&event))
            }
            Mutation::RemoveTarget { target } => {
                (MutationOutcome::Applied, registry.remove_target(target))
            }
            Mutation::RemoveTargetEvent { target, event } => (
                MutationOutcome::Applied,
                registry.remove_target_event(target, &event),
            ),
            Mutation::RemoveAll => {
                let previous = registry.clear();
                (MutationOutcome::Applied, previous.into_listeners())
            }
        }
    }
}

/// FIFO buffer of mutations issued during a dispatch
#[derive(Debug, Default)]
pub struct MutationQueue {
    pending: VecDeque<Mutation>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.pending.push_back(mutation);
    }

    /// Take the oldest queued mutation
    pub fn pop(&mut self) -> Option<Mutation> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
