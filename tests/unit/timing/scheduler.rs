use super::*;

const FREQ: u64 = 600_000;

#[test]
fn new_state_starts_at_unit_rate() {
    let s = FrameScheduler::new(42, FREQ, 60);
    let st = s.state();
    assert_eq!(st.last_tick, 42);
    assert_eq!(st.desired_interval, FREQ / 60);
    assert_eq!(st.smoothed_rate, 1.0);
    assert_eq!(st.accumulator, 0.0);
}

#[test]
fn desired_interval_never_zero() {
    let s = FrameScheduler::new(0, 10, 1000);
    assert_eq!(s.desired_interval(), 1);
    let s = FrameScheduler::new(0, FREQ, 0);
    assert_eq!(s.desired_interval(), FREQ);
}

#[test]
fn matched_rate_returns_one_every_call() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    let step = s.desired_interval();
    let mut now = 0;
    for _ in 0..500 {
        now += step;
        assert_eq!(s.tick(now), 1);
    }
}

#[test]
fn smoothed_rate_stays_bounded_for_arbitrary_sequences() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    let step = s.desired_interval();
    let mut now = 0u64;
    let deltas = [0, 1, step / 3, step, step * 7, 0, step * 1000, 5, step / 2, step * 2];
    for i in 0..2_000 {
        now += deltas[i % deltas.len()];
        let _ = s.tick(now);
        let st = s.state();
        assert!((0.0..=RATE_CLAMP).contains(&st.smoothed_rate), "{st:?}");
        assert!(st.accumulator >= 0.0, "{st:?}");
    }
}

#[test]
fn double_refresh_rate_alternates_and_averages_half() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    let half = s.desired_interval() / 2;
    let mut now = 0;
    let mut seq = Vec::new();
    for _ in 0..400 {
        now += half;
        seq.push(s.tick(now));
    }
    let tail = &seq[100..];
    let total: u32 = tail.iter().sum();
    let avg = f64::from(total) / tail.len() as f64;
    assert!((avg - 0.5).abs() < 0.01, "avg={avg}");
    assert!(tail.iter().all(|&r| r <= 1));
    for w in tail.windows(2) {
        assert_ne!(w[0], w[1], "expected alternating 0/1");
    }
}

#[test]
fn single_stall_yields_bounded_catch_up() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    let step = s.desired_interval();
    let mut now = 0;
    for _ in 0..50 {
        now += step;
        s.tick(now);
    }
    now += step * 10_000;
    let burst = s.tick(now);
    assert!(burst <= 2, "burst={burst}");
    now += step;
    assert!(s.tick(now) <= 2);
}

#[test]
fn stall_on_slow_path_keeps_owed_frames() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    for _ in 0..40 {
        s.repeat_for_rate(0.5);
    }
    assert!(s.state().smoothed_rate < CATCH_UP_THRESHOLD);

    let mut seq = vec![s.repeat_for_rate(5.0)];
    for _ in 0..8 {
        seq.push(s.repeat_for_rate(0.5));
    }
    assert_eq!(seq, vec![1; 9]);
    assert!(s.state().accumulator < 1.0);
}

#[test]
fn rate_ignores_non_finite_and_negative_inputs() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    s.repeat_for_rate(f64::NAN);
    s.repeat_for_rate(-3.0);
    s.repeat_for_rate(f64::INFINITY);
    let st = s.state();
    assert!(st.smoothed_rate.is_finite());
    assert!(st.smoothed_rate >= 0.0);
}

#[test]
fn clock_going_backwards_counts_as_zero_elapsed() {
    let mut s = FrameScheduler::new(1_000, FREQ, 60);
    let r = s.tick(10);
    assert_eq!(s.state().last_tick, 10);
    assert_eq!(r, 0);
    assert!((s.state().smoothed_rate - 0.8).abs() < 1e-12);
}

#[test]
fn reset_restores_initial_state() {
    let mut s = FrameScheduler::new(0, FREQ, 60);
    for i in 1..20 {
        s.tick(i * 3);
    }
    s.reset(777, FREQ, 40);
    let st = s.state();
    assert_eq!(st.last_tick, 777);
    assert_eq!(st.desired_interval, FREQ / 40);
    assert_eq!(st.smoothed_rate, 1.0);
    assert_eq!(st.accumulator, 0.0);
}
