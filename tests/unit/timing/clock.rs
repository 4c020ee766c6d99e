use super::*;

#[test]
fn manual_clock_clones_share_the_counter() {
    let a = ManualClock::new(1_000);
    let b = a.clone();
    a.advance(250);
    b.advance_refresh(4);
    assert_eq!(a.now(), 500);
    assert_eq!(b.now(), 500);
    assert_eq!(b.frequency(), 1_000);
}

#[test]
fn system_clock_is_monotonic() {
    let c = SystemClock::new();
    let t0 = c.now();
    let t1 = c.now();
    assert!(t1 >= t0);
    assert_eq!(c.frequency(), 1_000_000_000);
}
