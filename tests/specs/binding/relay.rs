//! Relay and binding specs
//!
//! A relay forwards one event to its callbacks while enabled, and stops
//! listening once disabled or dropped.

use crate::prelude::*;

fn flag(relay: &EventRelay) -> Rc<Cell<bool>> {
    let called = Rc::new(Cell::new(false));
    relay.on_event({
        let called = Rc::clone(&called);
        move || called.set(true)
    });
    called
}

#[test]
fn listen_without_target() {
    let world = World::new();
    let mut relay = EventRelay::new(&world.bus, "unset");
    relay.listen_for("test");
    let called = flag(&relay);

    world.bus.send("test").unwrap();
    assert!(called.get(), "relay not called");

    called.set(false);
    world.bus.send("testBad").unwrap();
    assert!(!called.get(), "relay called on wrong event");

    relay.set_enabled(false);
    world.bus.send("test").unwrap();
    assert!(!called.get(), "relay called while disabled");

    drop(relay);
    world.bus.send("test").unwrap();
    assert!(!called.get(), "relay called after it was dropped");
    assert!(world.bus.is_empty());
}

#[test]
fn listen_with_target() {
    let world = World::new();
    let target = world.target();
    let bad_target = world.target();
    let mut relay = EventRelay::new(&world.bus, "unset");
    relay.listen_for_target(target, "test");
    let called = flag(&relay);

    world.bus.send_to(target, "test").unwrap();
    assert!(called.get(), "relay not called");

    called.set(false);
    world.bus.send_to(bad_target, "test").unwrap();
    assert!(!called.get(), "relay called on wrong target");

    world.bus.send_to(target, "testBad").unwrap();
    assert!(!called.get(), "relay called on wrong event");

    relay.set_enabled(false);
    world.bus.send_to(target, "test").unwrap();
    assert!(!called.get(), "relay called while disabled");
    relay.set_enabled(true);

    drop(relay);
    world.bus.send_to(target, "test").unwrap();
    assert!(!called.get(), "relay called after it was dropped");
    assert!(!world.bus.contains_target(target));
}

#[test]
fn repeated_toggles_never_duplicate() {
    let world = World::new();
    let recorder = CallRecorder::<()>::new();
    let mut binding = Binding::new(&world.bus, "test", recorder.listener());

    binding.enable();
    binding.enable();
    binding.disable();
    binding.disable();
    binding.enable();

    world.bus.send("test").unwrap();
    assert_eq!(recorder.count(), 1);
    assert_eq!(world.bus.listener_count(), 1);
}

#[test]
fn binding_dropped_during_dispatch_is_removed_afterwards() {
    let world = World::new();
    let recorder = CallRecorder::<()>::new();
    let holder = Rc::new(RefCell::new(Some({
        let mut binding = Binding::new(&world.bus, "test", recorder.listener());
        binding.enable();
        binding
    })));
    world.bus.subscribe("test", {
        let holder = Rc::clone(&holder);
        Listener::new(move || {
            holder.borrow_mut().take();
        })
    });

    world.bus.send("test").unwrap();
    assert_eq!(recorder.count(), 1);

    world.bus.send("test").unwrap();
    assert_eq!(recorder.count(), 1);
}

