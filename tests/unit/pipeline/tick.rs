use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;

#[test]
fn every_callback_runs_once_per_notify() {
    let obs = TickObservers::new();
    let a = Rc::new(Cell::new(0));
    let b = Rc::new(Cell::new(0));
    let (ca, cb) = (a.clone(), b.clone());
    let _sa = obs.add(move || ca.set(ca.get() + 1));
    let _sb = obs.add(move || cb.set(cb.get() + 1));
    obs.notify();
    obs.notify();
    assert_eq!((a.get(), b.get()), (2, 2));
}

#[test]
fn dropping_subscription_unregisters() {
    let obs = TickObservers::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let sub = obs.add(move || h.set(h.get() + 1));
    obs.notify();
    drop(sub);
    obs.notify();
    assert_eq!(hits.get(), 1);
    assert!(obs.is_empty());
}

#[test]
fn detached_subscription_stays_registered() {
    let obs = TickObservers::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    obs.add(move || h.set(h.get() + 1)).detach();
    obs.notify();
    assert_eq!(hits.get(), 1);
    assert_eq!(obs.len(), 1);
}

#[test]
fn callbacks_may_subscribe_and_unsubscribe_while_notified() {
    let obs = TickObservers::new();
    let held: Rc<RefCell<Vec<TickSubscription>>> = Rc::default();
    let late_hits = Rc::new(Cell::new(0));
    let subscribed = Rc::new(Cell::new(false));

    let first = {
        let obs2 = obs.clone();
        let held = held.clone();
        let late_hits = late_hits.clone();
        let subscribed = subscribed.clone();
        obs.add(move || {
            if !subscribed.replace(true) {
                let lh = late_hits.clone();
                held.borrow_mut().push(obs2.add(move || lh.set(lh.get() + 1)));
            }
        })
    };

    obs.notify();
    assert_eq!(late_hits.get(), 0);
    assert_eq!(obs.len(), 2);
    obs.notify();
    assert_eq!(late_hits.get(), 1);

    let victim = held.borrow_mut().pop();
    let dropper = {
        let slot = Rc::new(RefCell::new(victim));
        obs.add(move || {
            slot.borrow_mut().take();
        })
    };
    obs.notify();
    obs.notify();
    assert_eq!(obs.len(), 2);
    assert_eq!(late_hits.get(), 2);
    drop((first, dropper));
    assert!(obs.is_empty());
}
