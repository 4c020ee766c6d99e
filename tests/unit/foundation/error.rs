use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FramepaceError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        FramepaceError::resource("x")
            .to_string()
            .contains("resource error:")
    );
    assert!(
        FramepaceError::device("x")
            .to_string()
            .contains("device error:")
    );
    assert!(
        FramepaceError::worker("x")
            .to_string()
            .contains("worker error:")
    );
    assert!(
        FramepaceError::not_implemented("play_movie")
            .to_string()
            .contains("not implemented: play_movie")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FramepaceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
