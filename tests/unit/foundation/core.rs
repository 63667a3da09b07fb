use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(2)).is_err());
    assert!(FrameRange::full(0).is_empty());
}

#[test]
fn fps_doubling_keeps_denominator() {
    let fps = Fps::new(30000, 1001).unwrap().doubled().unwrap();
    assert_eq!(fps, Fps::new(60000, 1001).unwrap());
}

#[test]
fn fps_doubling_overflow_is_error() {
    let fps = Fps {
        num: u32::MAX,
        den: 1,
    };
    assert!(fps.doubled().is_err());
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(25, 0).is_err());
}
