// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener registry
//!
//! Four collections keyed by event name:
//!
//! | collection       | scope  | listeners                |
//! |------------------|--------|--------------------------|
//! | `global`         | none   | no payload               |
//! | `global_param`   | none   | one or more payload args |
//! | `targeted`       | target | no payload               |
//! | `targeted_param` | target | one or more payload args |
//!
//! Empty lists and empty targets are always removed, so a target that lost
//! its last listener leaves no entry behind.
//!
//! Removal methods hand back the listeners they dropped out of the registry.
//! The bus releases them only after its registry borrow ends, since dropping
//! a listener may run arbitrary `Drop` code that calls back into the bus.

use crate::listener::Listener;
use crate::payload::ArityClass;
use crate::target::TargetKey;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

type ListenerMap = HashMap<String, Vec<Listener>>;

/// Storage for every registered listener
#[derive(Debug, Default)]
pub struct Registry {
    global: ListenerMap,
    global_param: ListenerMap,
    targeted: HashMap<TargetKey, ListenerMap>,
    targeted_param: HashMap<TargetKey, ListenerMap>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the list for `(target, event)` matching its arity class
    pub fn insert(&mut self, target: Option<TargetKey>, event: &str, listener: Listener) {
        let class = listener.class();
        let map = match target {
            None => self.globals_mut(class),
            Some(target) => self.targets_mut(class).entry(target).or_default(),
        };
        map.entry(event.to_string()).or_default().push(listener);
    }

    /// Remove the first listener equal to `listener`
    ///
    /// Returns the removed listener, or `None` when it was not registered.
    pub fn remove(
        &mut self,
        target: Option<TargetKey>,
        event: &str,
        listener: &Listener,
    ) -> Option<Listener> {
        let class = listener.class();
        match target {
            None => remove_first(self.globals_mut(class), event, listener),
            Some(target) => {
                let targets = self.targets_mut(class);
                let events = targets.get_mut(&target)?;
                let removed = remove_first(events, event, listener);
                if events.is_empty() {
                    targets.remove(&target);
                }
                removed
            }
        }
    }

    /// Delete `event` from both global collections
    pub fn remove_event(&mut self, event: &str) -> Vec<Listener> {
        let mut removed = Vec::new();
        removed.extend(self.global.remove(event).into_iter().flatten());
        removed.extend(self.global_param.remove(event).into_iter().flatten());
        removed
    }

    /// Delete every listener registered for `target`
    pub fn remove_target(&mut self, target: TargetKey) -> Vec<Listener> {
        let mut removed = Vec::new();
        for targets in [&mut self.targeted, &mut self.targeted_param] {
            if let Some(events) = targets.remove(&target) {
                removed.extend(events.into_values().flatten());
            }
        }
        removed
    }

    /// Delete `event` under `target`, dropping the target once it has no events
    pub fn remove_target_event(&mut self, target: TargetKey, event: &str) -> Vec<Listener> {
        let mut removed = Vec::new();
        for targets in [&mut self.targeted, &mut self.targeted_param] {
            let Some(events) = targets.get_mut(&target) else {
                continue;
            };
            removed.extend(events.remove(event).into_iter().flatten());
            if events.is_empty() {
                targets.remove(&target);
            }
        }
        removed
    }

    /// Empty all four collections
    pub fn clear(&mut self) -> Registry {
        std::mem::take(self)
    }

    /// Consume the registry, yielding every listener it held
    pub fn into_listeners(self) -> Vec<Listener> {
        let globals = [self.global, self.global_param]
            .into_iter()
            .flat_map(HashMap::into_values);
        let targeted = [self.targeted, self.targeted_param]
            .into_iter()
            .flat_map(HashMap::into_values)
            .flat_map(HashMap::into_values);
        globals.chain(targeted).flatten().collect()
    }

    /// Copy of the listener list for `(target, event, class)` in registration order
    ///
    /// A target with no entry yields an empty list; it never falls back to
    /// the global collections.
    pub fn resolve(
        &self,
        target: Option<TargetKey>,
        event: &str,
        class: ArityClass,
    ) -> Vec<Listener> {
        let list = match target {
            None => self.globals(class).get(event),
            Some(target) => self
                .targets(class)
                .get(&target)
                .and_then(|events| events.get(event)),
        };
        list.cloned().unwrap_or_default()
    }

    pub fn contains_target(&self, target: TargetKey) -> bool {
        self.targeted.contains_key(&target) || self.targeted_param.contains_key(&target)
    }

    /// Total number of registrations across all collections
    pub fn len(&self) -> usize {
        let globals = [&self.global, &self.global_param]
            .into_iter()
            .flat_map(|map| map.values())
            .map(Vec::len);
        let targeted = [&self.targeted, &self.targeted_param]
            .into_iter()
            .flat_map(|targets| targets.values())
            .flat_map(|map| map.values())
            .map(Vec::len);
        globals.chain(targeted).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
            && self.global_param.is_empty()
            && self.targeted.is_empty()
            && self.targeted_param.is_empty()
    }

    /// Listener counts per key, for diagnostics
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            global: counts(&self.global),
            global_param: counts(&self.global_param),
            targeted: target_counts(&self.targeted),
            targeted_param: target_counts(&self.targeted_param),
            pending_mutations: 0,
        }
    }

    fn globals(&self, class: ArityClass) -> &ListenerMap {
        match class {
            ArityClass::NoPayload => &self.global,
            ArityClass::WithPayload => &self.global_param,
        }
    }

    fn globals_mut(&mut self, class: ArityClass) -> &mut ListenerMap {
        match class {
            ArityClass::NoPayload => &mut self.global,
            ArityClass::WithPayload => &mut self.global_param,
        }
    }

    fn targets(&self, class: ArityClass) -> &HashMap<TargetKey, ListenerMap> {
        match class {
            ArityClass::NoPayload => &self.targeted,
            ArityClass::WithPayload => &self.targeted_param,
        }
    }

    fn targets_mut(&mut self, class: ArityClass) -> &mut HashMap<TargetKey, ListenerMap> {
        match class {
            ArityClass::NoPayload => &mut self.targeted,
            ArityClass::WithPayload => &mut self.targeted_param,
        }
    }
}

fn remove_first(map: &mut ListenerMap, event: &str, listener: &Listener) -> Option<Listener> {
    let list = map.get_mut(event)?;
    let index = list.iter().position(|l| l == listener)?;
    let removed = list.remove(index);
    if list.is_empty() {
        map.remove(event);
    }
    Some(removed)
}

fn counts(map: &ListenerMap) -> BTreeMap<String, usize> {
    map.iter()
        .map(|(event, list)| (event.clone(), list.len()))
        .collect()
}

fn target_counts(
    targets: &HashMap<TargetKey, ListenerMap>,
) -> BTreeMap<TargetKey, BTreeMap<String, usize>> {
    targets
        .iter()
        .map(|(target, map)| (*target, counts(map)))
        .collect()
}

/// Point-in-time view of registry contents
///
/// Maps are ordered so snapshots compare and serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub global: BTreeMap<String, usize>,
    pub global_param: BTreeMap<String, usize>,
    pub targeted: BTreeMap<TargetKey, BTreeMap<String, usize>>,
    pub targeted_param: BTreeMap<TargetKey, BTreeMap<String, usize>>,
    /// Mutations waiting for the current dispatch to unwind
    pub pending_mutations: usize,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
            && self.global_param.is_empty()
            && self.targeted.is_empty()
            && self.targeted_param.is_empty()
            && self.pending_mutations == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
