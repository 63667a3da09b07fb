use super::*;
use crate::deint::parity::FieldOrder;

fn upstream() -> VideoInfo {
    VideoInfo {
        format: PixelFormat::Yuv420p,
        width: 720,
        height: 480,
        fps: Fps::new(24, 1).unwrap(),
        num_frames: 100,
    }
}

#[test]
fn double_rate_doubles_rate_and_count() {
    let params = BobParams {
        mode: Mode::DoubleRate,
        field_order: FieldOrder::TopFirst,
    };
    let out = derive_output_info(&upstream(), &params).unwrap();
    assert_eq!(out.num_frames, 200);
    assert_eq!(out.fps.num, 48);
    assert_eq!(out.fps.den, 1);
    assert_eq!(out.format, PixelFormat::Yuv420p);
    assert_eq!((out.width, out.height), (720, 480));
}

#[test]
fn single_rate_copies_descriptor() {
    let params = BobParams {
        mode: Mode::SingleRate,
        field_order: FieldOrder::BottomFirst,
    };
    let out = derive_output_info(&upstream(), &params).unwrap();
    assert_eq!(out, upstream());
}

#[test]
fn upstream_is_not_mutated() {
    let up = upstream();
    let _ = derive_output_info(&up, &BobParams::default()).unwrap();
    assert_eq!(up.num_frames, 100);
    assert_eq!(up.fps.num, 24);
}

#[test]
fn frame_count_overflow_is_rejected() {
    let mut up = upstream();
    up.num_frames = u64::MAX;
    assert!(derive_output_info(&up, &BobParams::default()).is_err());
}
