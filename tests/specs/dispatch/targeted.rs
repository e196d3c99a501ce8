//! Targeted dispatch specs
//!
//! Sends to a target reach only listeners registered on that target.

use crate::prelude::*;

#[test]
fn send_to_target_invokes_listener() {
    let world = World::new();
    let target = world.target();
    let bad_target = world.target();
    let called = world.record_on(target, "test");

    world.bus.send_to(target, "test").unwrap();
    called.assert_calls(1);

    world.bus.send_to(bad_target, "test").unwrap();
    world.bus.send_to(target, "testBad").unwrap();
    world.bus.send("test").unwrap();
    called.assert_calls(1);
}

#[test]
fn global_listener_ignores_targeted_sends() {
    let world = World::new();
    let target = world.target();
    let called = world.record("test");

    world.bus.send_to(target, "test").unwrap();

    called.assert_calls(0);
}

#[test]
fn targeted_payload_listeners() {
    let world = World::new();
    let target = world.target();
    let plain = world.record_on(target, "test");
    let seen = Rc::new(RefCell::new(Vec::new()));
    world.bus.subscribe_to(target, "test", {
        let seen = Rc::clone(&seen);
        Listener::new(move |a: i32, b: bool| seen.borrow_mut().push((a, b)))
    });

    world.bus.send_to_with(target, "test", (3, true)).unwrap();
    world.bus.send_with("test", (4, false)).unwrap();

    plain.assert_calls(1);
    assert_eq!(*seen.borrow(), vec![(3, true)]);
}

#[test]
fn removing_a_target_keeps_other_targets() {
    let world = World::new();
    let first = world.target();
    let second = world.target();
    let a = world.record_on(first, "test");
    let b = world.record_on(second, "test");

    world.bus.remove_target(first);
    world.bus.send_to(first, "test").unwrap();
    world.bus.send_to(second, "test").unwrap();

    a.assert_calls(0);
    b.assert_calls(1);
    assert!(!world.bus.contains_target(first));
}

#[test]
fn unsubscribing_from_wrong_target_is_reported() {
    let world = World::new();
    let target = world.target();
    let other = world.target();
    let called = world.record_on(target, "test");

    let outcome = world
        .bus
        .unsubscribe_from(other, "test", &called.listener);

    assert_eq!(outcome, MutationOutcome::NotRegistered);
    world.bus.send_to(target, "test").unwrap();
    called.assert_calls(1);
}
