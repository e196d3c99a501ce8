// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener records
//!
//! A [`Listener`] wraps a closure taking zero to five owned arguments. The
//! closure is type-erased behind a call taking `&dyn Any`, and the argument
//! tuple it expects is kept as its [`Signature`].
//!
//! ```
//! use eventful_core::Listener;
//!
//! let ping = Listener::new(|| println!("ping"));
//! let scored = Listener::new(|player: String, points: u32| {
//!     println!("{player} scored {points}");
//! });
//!
//! assert_eq!(ping.arity(), 0);
//! assert_eq!(scored.arity(), 2);
//! ```

use crate::payload::{ArityClass, Signature};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Error type listener closures may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why an erased invocation did not complete
pub(crate) enum InvokeError {
    /// The payload was not the tuple the listener was built for
    Mismatch,
    Fault(BoxError),
}

type ErasedFn = dyn Fn(&dyn Any) -> Result<(), InvokeError>;

/// Values a listener closure may return
///
/// `()` always succeeds. `Result<(), E>` lets a listener abort the current
/// dispatch; the error reaches the caller of `send`.
pub trait ListenerOutcome {
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl ListenerOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> ListenerOutcome for Result<(), E> {
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

struct Record {
    signature: Signature,
    call: Box<ErasedFn>,
}

/// A callback plus its declared payload signature
///
/// Cloning is cheap and keeps identity: two listeners compare equal only when
/// one is a clone of the other. Removal from the registry uses this identity,
/// so keep a clone of every listener you intend to unsubscribe.
#[derive(Clone)]
pub struct Listener(Rc<Record>);

impl Listener {
    pub fn new<Args, F>(f: F) -> Self
    where
        F: IntoListener<Args>,
    {
        f.into_listener()
    }

    fn from_erased(
        signature: Signature,
        call: impl Fn(&dyn Any) -> Result<(), InvokeError> + 'static,
    ) -> Self {
        Self(Rc::new(Record {
            signature,
            call: Box::new(call),
        }))
    }

    pub fn signature(&self) -> &Signature {
        &self.0.signature
    }

    pub fn arity(&self) -> usize {
        self.0.signature.arity()
    }

    pub fn class(&self) -> ArityClass {
        self.0.signature.class()
    }

    pub(crate) fn invoke(&self, payload: &dyn Any) -> Result<(), InvokeError> {
        (self.0.call)(payload)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("signature", &self.0.signature)
            .field("id", &Rc::as_ptr(&self.0))
            .finish()
    }
}

/// Closures that can become a [`Listener`]
///
/// `Args` is the argument tuple, which lets one closure type map to exactly
/// one implementation.
pub trait IntoListener<Args> {
    fn into_listener(self) -> Listener;
}

macro_rules! impl_into_listener {
    ($($ty:ident),*) => {
        impl<F, R, $($ty),*> IntoListener<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R + 'static,
            R: ListenerOutcome,
            $($ty: Clone + 'static,)*
        {
            #[allow(non_snake_case, clippy::let_unit_value, clippy::unused_unit)]
            fn into_listener(self) -> Listener {
                Listener::from_erased(Signature::of::<($($ty,)*)>(), move |payload: &dyn Any| {
                    let ($($ty,)*) = payload
                        .downcast_ref::<($($ty,)*)>()
                        .ok_or(InvokeError::Mismatch)?
                        .clone();
                    self($($ty),*).into_outcome().map_err(InvokeError::Fault)
                })
            }
        }
    };
}

impl_into_listener!();
impl_into_listener!(A);
impl_into_listener!(A, B);
impl_into_listener!(A, B, C);
impl_into_listener!(A, B, C, D);
impl_into_listener!(A, B, C, D, E);

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
