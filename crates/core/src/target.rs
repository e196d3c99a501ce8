// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target keys for scoped events

use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Identity of a host object that scopes targeted events
///
/// Keys do not own anything. Whoever owns the host object must call
/// [`EventBus::remove_target`](crate::EventBus::remove_target) before the
/// object becomes invalid, otherwise its listeners stay registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TargetKey(u64);

impl TargetKey {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Issues unique target keys
///
/// Clones share the same counter.
#[derive(Clone)]
pub struct TargetKeys {
    counter: Rc<Cell<u64>>,
}

impl TargetKeys {
    pub fn new() -> Self {
        Self {
            counter: Rc::new(Cell::new(1)),
        }
    }

    pub fn next(&self) -> TargetKey {
        let raw = self.counter.get();
        self.counter.set(raw + 1);
        TargetKey(raw)
    }
}

impl Default for TargetKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
