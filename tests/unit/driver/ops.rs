use super::*;

#[test]
fn default_transition_forms() {
    let FrameOp::Transition(req) = FrameOp::transition() else {
        panic!("not a transition");
    };
    assert_eq!((req.duration, req.vague), (10, 40));
    assert_eq!(req.mask, MaskSource::None);

    let FrameOp::Transition(req) = FrameOp::transition_for(25) else {
        panic!("not a transition");
    };
    assert_eq!((req.duration, req.vague), (25, 40));
}

#[test]
fn empty_mask_path_means_plain_transition() {
    let FrameOp::Transition(req) = FrameOp::transition_with_mask(8, "", 12) else {
        panic!("not a transition");
    };
    assert_eq!(req.mask, MaskSource::None);
    assert_eq!(req.vague, 12);

    let FrameOp::Transition(req) = FrameOp::transition_with_mask(8, "wipe.png", 12) else {
        panic!("not a transition");
    };
    assert_eq!(req.mask, MaskSource::Path("wipe.png".into()));
}

#[test]
fn fade_levels_truncate_like_integer_assignment() {
    assert_eq!(fade_level(FadeDir::Out, 255, 0, 3).get(), 255);
    assert_eq!(fade_level(FadeDir::Out, 255, 1, 3).get(), 170);
    assert_eq!(fade_level(FadeDir::Out, 255, 2, 3).get(), 85);
    assert_eq!(fade_level(FadeDir::In, 0, 1, 3).get(), 85);
    assert_eq!(fade_level(FadeDir::In, 100, 1, 2).get(), 177);
}

#[test]
fn fade_duration_is_at_least_one() {
    let ActiveOp::Fade { duration, .. } = ActiveOp::new(FrameOp::FadeOut(0)) else {
        panic!("not a fade");
    };
    assert_eq!(duration, 1);
}
