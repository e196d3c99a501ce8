// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payload tuples and listener signatures
//!
//! A payload is a tuple of zero to [`MAX_ARITY`] owned values. Listeners
//! record the [`Signature`] of the tuple they accept, and the dispatcher
//! compares it against the signature of each payload it sends.

use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Maximum number of positional payload slots
pub const MAX_ARITY: usize = 5;

/// Which listener list a signature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArityClass {
    /// Listeners taking no arguments; invoked by every send of the event
    NoPayload,
    /// Listeners taking one or more arguments; checked against each payload
    WithPayload,
}

/// Declared argument types of a listener or payload
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    id: TypeId,
    slots: Vec<&'static str>,
}

impl Signature {
    pub fn of<P: Payload>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            slots: P::slot_types(),
        }
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Type names of each positional slot
    pub fn slots(&self) -> &[&'static str] {
        &self.slots
    }

    pub fn class(&self) -> ArityClass {
        if self.slots.is_empty() {
            ArityClass::NoPayload
        } else {
            ArityClass::WithPayload
        }
    }

    /// True when a payload with `other`'s signature can be passed to this one
    pub fn accepts(&self, other: &Signature) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.slots.join(", "))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature{}", self)
    }
}

/// A tuple of values sent with an event
///
/// Implemented for `()` and for tuples of one to five `Clone + 'static`
/// values.
pub trait Payload: Any {
    const ARITY: usize;

    fn slot_types() -> Vec<&'static str>;
}

macro_rules! impl_payload {
    (@count) => { 0 };
    (@count $head:ident $($tail:ident)*) => { 1 + impl_payload!(@count $($tail)*) };
    ($($ty:ident),*) => {
        impl<$($ty: Clone + 'static),*> Payload for ($($ty,)*) {
            const ARITY: usize = impl_payload!(@count $($ty)*);

            fn slot_types() -> Vec<&'static str> {
                vec![$(type_name::<$ty>()),*]
            }
        }
    };
}

impl_payload!();
impl_payload!(A);
impl_payload!(A, B);
impl_payload!(A, B, C);
impl_payload!(A, B, C, D);
impl_payload!(A, B, C, D, E);

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
