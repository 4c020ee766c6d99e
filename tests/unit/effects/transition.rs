use super::*;

#[test]
fn vague_width_is_clamped_and_normalized() {
    assert_eq!(VagueWidth::from_raw(0).get(), 1.0 / 255.0);
    assert_eq!(VagueWidth::from_raw(255).get(), 1.0);
    assert_eq!(VagueWidth::from_raw(10_000).get(), 256.0 / 255.0);
    assert_eq!(VagueWidth::default().get(), 40.0 / 255.0);
}

#[test]
fn freeze_is_idempotent() {
    let mut e = TransitionEngine::new();
    assert!(e.freeze());
    assert!(!e.freeze());
    assert_eq!(e.phase(), TransitionPhase::Frozen);
}

#[test]
fn begin_requires_freeze() {
    let mut e = TransitionEngine::new();
    assert!(!e.begin(5, None, VagueWidth::default()));
    assert_eq!(e.phase(), TransitionPhase::Idle);
    assert!(e.active().is_none());
    assert_eq!(e.next_step(), None);
}

#[test]
fn progress_covers_half_open_range() {
    let mut e = TransitionEngine::new();
    e.freeze();
    assert!(e.begin(4, None, VagueWidth::default()));
    let steps: Vec<f32> = std::iter::from_fn(|| e.next_step()).collect();
    assert_eq!(steps, vec![0.0, 0.25, 0.5, 0.75]);
    assert!(e.is_frozen());
    assert_eq!(e.finish(), None);
    assert_eq!(e.phase(), TransitionPhase::Idle);
}

#[test]
fn zero_duration_has_no_steps() {
    let mut e = TransitionEngine::new();
    e.freeze();
    assert!(e.begin(0, None, VagueWidth::default()));
    assert_eq!(e.next_step(), None);
    e.finish();
    assert!(!e.is_frozen());
}

#[test]
fn begin_while_transitioning_is_ignored() {
    let mut e = TransitionEngine::new();
    e.freeze();
    e.begin(3, None, VagueWidth::default());
    e.next_step();
    assert!(!e.begin(9, None, VagueWidth::default()));
    assert_eq!(e.active().map(|s| s.duration), Some(3));
}
