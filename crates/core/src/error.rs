// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for dispatch and configuration

use crate::listener::BoxError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single `send`
///
/// Registry bookkeeping is complete by the time the caller sees one of
/// these: the dispatch depth is back to where it was and, at the outermost
/// level, deferred mutations have been applied.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A listener with the payload's arity declared different slot types
    #[error("listener for '{event}' expects {expected} but the payload is {actual}")]
    SignatureMismatch {
        event: String,
        expected: String,
        actual: String,
    },
    /// A listener returned an error; later listeners were skipped
    #[error("listener for '{event}' failed: {source}")]
    ListenerFault {
        event: String,
        #[source]
        source: BoxError,
    },
    /// Sending would nest deeper than the configured limit
    #[error("sending '{event}' would exceed the maximum dispatch depth of {limit}")]
    DepthExceeded { event: String, limit: usize },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs
    ///
    /// # Example
    /// ```
    /// use eventful_core::DispatchError;
    ///
    /// let err = DispatchError::DepthExceeded { event: "tick".into(), limit: 8 };
    /// assert_eq!(err.as_label(), "dispatch_depth_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::SignatureMismatch { .. } => "dispatch_signature_mismatch",
            DispatchError::ListenerFault { .. } => "dispatch_listener_fault",
            DispatchError::DepthExceeded { .. } => "dispatch_depth_exceeded",
        }
    }

    /// The event whose dispatch failed
    pub fn event(&self) -> &str {
        match self {
            DispatchError::SignatureMismatch { event, .. }
            | DispatchError::ListenerFault { event, .. }
            | DispatchError::DepthExceeded { event, .. } => event.as_str(),
        }
    }
}

/// Errors loading a [`BusConfig`](crate::BusConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid bus config: {0}")]
    Parse(#[from] toml::de::Error),
}
