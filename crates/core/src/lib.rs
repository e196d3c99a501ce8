// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! eventful-core: in-process publish/subscribe event bus
//!
//! This crate provides:
//! - A listener registry keyed by event name, optionally scoped to a target
//! - Typed listeners taking zero to five payload arguments
//! - A reentrant dispatcher that defers registry changes made during a send

pub mod bus;
pub mod config;
pub mod error;
pub mod listener;
pub mod mutation;
pub mod payload;
pub mod registry;
pub mod target;

#[cfg(any(test, feature = "test-support"))]
mod recorder;

pub use bus::{EventBus, WeakEventBus};
pub use config::{BusConfig, DEFAULT_MAX_DEPTH};
pub use error::{ConfigError, DispatchError};
pub use listener::{BoxError, IntoListener, Listener, ListenerOutcome};
pub use mutation::{Mutation, MutationOutcome, MutationQueue, Released};
pub use payload::{ArityClass, Payload, Signature, MAX_ARITY};
pub use registry::{Registry, RegistrySnapshot};
pub use target::{TargetKey, TargetKeys};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use recorder::CallRecorder;
