use super::*;
use crate::present::window::HeadlessWindow;

#[test]
fn letterbox_adds_bars_on_wide_window() {
    let vp = letterbox(Resolution::new(1000, 480), Resolution::new(640, 480));
    assert_eq!(
        vp,
        IntRect {
            x: 180,
            y: 0,
            width: 640,
            height: 480
        }
    );
}

#[test]
fn letterbox_adds_bars_on_tall_window() {
    let vp = letterbox(Resolution::new(640, 1000), Resolution::new(640, 480));
    assert_eq!(
        vp,
        IntRect {
            x: 0,
            y: 260,
            width: 640,
            height: 480
        }
    );
}

#[test]
fn letterbox_matching_ratio_fills_window() {
    let vp = letterbox(Resolution::new(1280, 960), Resolution::new(640, 480));
    assert_eq!(vp, IntRect::from_resolution(Resolution::new(1280, 960)));
}

#[test]
fn letterbox_into_minimized_window_is_empty() {
    let minimized = Resolution {
        width: 0,
        height: 0,
    };
    assert_eq!(letterbox(minimized, Resolution::new(640, 480)), IntRect::default());
    let flat = Resolution {
        width: 800,
        height: 0,
    };
    assert_eq!(letterbox(flat, Resolution::new(640, 480)).height, 0);
}

#[test]
fn viewport_follows_window_and_ratio_flag() {
    let window = HeadlessWindow::new(Resolution::new(800, 400));
    let mut c = PresentCompositor::new(Arc::new(window.clone()));
    let logical = Resolution::new(400, 400);
    assert_eq!(c.viewport(logical, true).width, 400);
    assert_eq!(c.viewport(logical, false).width, 800);
    window.set_size(Resolution::new(400, 800));
    let vp = c.viewport(logical, true);
    assert_eq!((vp.x, vp.y, vp.width, vp.height), (0, 200, 400, 400));
}

#[test]
fn mapping_converts_window_points() {
    let m = SurfaceMapping {
        viewport: IntRect {
            x: 100,
            y: 0,
            width: 200,
            height: 100,
        },
        resolution: Resolution::new(400, 200),
    };
    assert_eq!(m.window_to_logical(Point::new(50.0, 10.0)), None);
    assert_eq!(
        m.window_to_logical(Point::new(200.0, 50.0)),
        Some(Point::new(200.0, 100.0))
    );
}
