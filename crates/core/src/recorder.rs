// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording listeners for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::listener::Listener;
use std::cell::RefCell;
use std::rc::Rc;

/// Collects the values its listeners receive
///
/// Clones share the same call log.
#[derive(Debug)]
pub struct CallRecorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> CallRecorder<T> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<T: Clone> CallRecorder<T> {
    /// Get all recorded calls
    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }
}

impl<T: Clone + 'static> CallRecorder<T> {
    /// Listener that records its single argument
    pub fn payload_listener(&self) -> Listener {
        let calls = Rc::clone(&self.calls);
        Listener::new(move |value: T| calls.borrow_mut().push(value))
    }
}

impl CallRecorder<()> {
    /// No-payload listener that records each invocation
    pub fn listener(&self) -> Listener {
        let calls = Rc::clone(&self.calls);
        Listener::new(move || calls.borrow_mut().push(()))
    }
}

impl<T> Clone for CallRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T> Default for CallRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
