//! Reentrant mutation specs
//!
//! Registry changes requested while a send is running take effect once the
//! outermost send returns, in the order they were requested.

use crate::prelude::*;

/// Listener slot filled in after construction, for self-removal
type Slot = Rc<RefCell<Option<Listener>>>;

#[test]
fn listener_removes_itself_and_adds_another() {
    let world = World::new();
    let first_calls = Rc::new(Cell::new(0));
    let queued_calls = Rc::new(Cell::new(0));
    let slot: Slot = Rc::default();

    let queued = Listener::new({
        let bus = world.bus.downgrade();
        let queued_calls = Rc::clone(&queued_calls);
        move || {
            queued_calls.set(queued_calls.get() + 1);
            bus.upgrade().unwrap().remove_event("test");
        }
    });
    let first = Listener::new({
        let bus = world.bus.downgrade();
        let slot = Rc::clone(&slot);
        let first_calls = Rc::clone(&first_calls);
        move || {
            first_calls.set(first_calls.get() + 1);
            let bus = bus.upgrade().unwrap();
            let me = slot.borrow().clone().unwrap();
            bus.unsubscribe("test", &me);
            bus.subscribe("test", queued.clone());
        }
    });
    *slot.borrow_mut() = Some(first.clone());
    world.bus.subscribe("test", first);

    for _ in 0..3 {
        world.bus.send("test").unwrap();
    }

    assert_eq!(first_calls.get(), 1);
    assert_eq!(queued_calls.get(), 1);
    assert!(world.bus.is_empty());
}

#[test]
fn bulk_removal_silences_both_arity_classes() {
    let world = World::new();
    let plain = [world.record("event"), world.record("event")];
    let values = [CallRecorder::<i32>::new(), CallRecorder::<i32>::new()];
    for recorder in &values {
        world.bus.subscribe("event", recorder.payload_listener());
    }

    world.bus.send_with("event", (1,)).unwrap();
    world.bus.remove_event("event");
    world.bus.send_with("event", (2,)).unwrap();

    for recorded in &plain {
        recorded.assert_calls(1);
    }
    for recorder in &values {
        assert_eq!(recorder.calls(), vec![1]);
    }
}

#[test]
fn subscribe_during_send_reports_deferred() {
    let world = World::new();
    let late = CallRecorder::<()>::new();
    let outcome = Rc::new(Cell::new(None));
    world.bus.subscribe("test", {
        let bus = world.bus.downgrade();
        let late = late.listener();
        let outcome = Rc::clone(&outcome);
        Listener::new(move || {
            let bus = bus.upgrade().unwrap();
            outcome.set(Some(bus.subscribe("test", late.clone())));
        })
    });

    world.bus.send("test").unwrap();

    assert_eq!(outcome.get(), Some(MutationOutcome::Deferred));
    assert_eq!(late.count(), 0, "new listener ran in the send that added it");
    world.bus.send("test").unwrap();
    assert_eq!(late.count(), 1);
}

#[test]
fn nested_sends_defer_until_outermost_returns() {
    let world = World::new();
    let removed = world.record("inner");
    let seen_depths = Rc::new(RefCell::new(Vec::new()));

    world.bus.subscribe("inner", {
        let bus = world.bus.downgrade();
        let seen_depths = Rc::clone(&seen_depths);
        Listener::new(move || {
            let bus = bus.upgrade().unwrap();
            seen_depths.borrow_mut().push(bus.depth());
            bus.remove_event("inner");
        })
    });
    world.bus.subscribe("outer", {
        let bus = world.bus.downgrade();
        Listener::new(move || {
            let bus = bus.upgrade().unwrap();
            bus.send("inner").unwrap();
            bus.send("inner").unwrap();
        })
    });

    world.bus.send("outer").unwrap();

    // Both nested sends saw the listeners; removal waited for "outer"
    assert_eq!(*seen_depths.borrow(), vec![2, 2]);
    removed.assert_calls(2);
    assert_eq!(world.bus.pending_mutations(), 0);

    world.bus.send("inner").unwrap();
    removed.assert_calls(2);
}

#[test]
fn queued_changes_apply_in_request_order() {
    let world = World::new();
    let target = world.target();
    let tracked = CallRecorder::<()>::new();

    world.bus.subscribe("setup", {
        let bus = world.bus.downgrade();
        let tracked = tracked.listener();
        Listener::new(move || {
            let bus = bus.upgrade().unwrap();
            bus.subscribe_to(target, "a", tracked.clone());
            bus.remove_target(target);
            bus.subscribe_to(target, "b", tracked.clone());
        })
    });

    world.bus.send("setup").unwrap();
    world.bus.send_to(target, "a").unwrap();
    world.bus.send_to(target, "b").unwrap();

    assert_eq!(tracked.count(), 1);
    let snapshot = world.bus.snapshot();
    assert_eq!(snapshot.targeted[&target]["b"], 1);
    assert!(!snapshot.targeted[&target].contains_key("a"));
}

#[test]
fn failed_send_still_applies_queued_changes() {
    let world = World::new();
    let late = CallRecorder::<()>::new();
    world.bus.subscribe("test", {
        let bus = world.bus.downgrade();
        let late = late.listener();
        Listener::new(move || -> Result<(), String> {
            let bus = bus.upgrade().unwrap();
            bus.subscribe("after", late.clone());
            Err("rejected".to_string())
        })
    });

    assert!(world.bus.send("test").is_err());
    world.bus.send("after").unwrap();

    assert_eq!(late.count(), 1);
    assert_eq!(world.bus.depth(), 0);
}

#[test]
fn depth_limit_stops_runaway_recursion() {
    let world = World::with_config(BusConfig::default().with_max_depth(4));
    let hits = Rc::new(Cell::new(0));
    world.bus.subscribe("ping", {
        let bus = world.bus.downgrade();
        let hits = Rc::clone(&hits);
        Listener::new(move || -> Result<(), DispatchError> {
            hits.set(hits.get() + 1);
            bus.upgrade().unwrap().send("ping")
        })
    });

    let err = world.bus.send("ping").unwrap_err();

    assert_eq!(hits.get(), 4);
    assert!(err.to_string().contains("maximum dispatch depth of 4"));
    assert_eq!(world.bus.depth(), 0);
}
