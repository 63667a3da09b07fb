use super::*;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "tapdeint_{name}_{}_{}.y4m",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// 4x2 4:2:0 stream, two frames; frame `k` has every luma sample `10 + k` and chroma `100 + k`.
fn small_stream(interlacing: &str) -> Vec<u8> {
    let header = format!("YUV4MPEG2 W4 H2 F30000:1001 I{interlacing} A1:1 C420jpeg\n");
    let mut out = header.into_bytes();
    for k in 0..2u8 {
        out.extend_from_slice(b"FRAME\n");
        out.extend(std::iter::repeat_n(10 + k, 8));
        out.extend(std::iter::repeat_n(100 + k, 2));
        out.extend(std::iter::repeat_n(100 + k, 2));
    }
    out
}

#[test]
fn header_parses_all_tags() {
    let h = parse_header("YUV4MPEG2 W720 H480 F30000:1001 It A10:11 C422 XYSCSS=422").unwrap();
    assert_eq!(h.width, 720);
    assert_eq!(h.height, 480);
    assert_eq!(h.fps, Fps::new(30000, 1001).unwrap());
    assert_eq!(h.format, PixelFormat::Yuv422p);
    assert_eq!(h.field_based, FieldBased::TopFirst);
    assert_eq!(h.frame_size().unwrap(), 720 * 480 * 2);
}

#[test]
fn header_defaults_to_progressive_420() {
    let h = parse_header("YUV4MPEG2 W3 H3 F25:1").unwrap();
    assert_eq!(h.format, PixelFormat::Yuv420p);
    assert_eq!(h.field_based, FieldBased::Progressive);
    // Odd sizes round chroma up.
    assert_eq!(h.frame_size().unwrap(), 9 + 4 + 4);
}

#[test]
fn colorspace_tags_map_to_formats() {
    for (tag, fmt) in [
        ("420paldv", PixelFormat::Yuv420p),
        ("420mpeg2", PixelFormat::Yuv420p),
        ("420", PixelFormat::Yuv420p),
        ("444", PixelFormat::Yuv444p),
        ("411", PixelFormat::Yuv411p),
        ("mono", PixelFormat::Gray8),
    ] {
        assert_eq!(parse_colorspace(tag).unwrap(), fmt, "{tag}");
    }
    assert!(parse_colorspace("420p10").is_err());
    assert!(parse_colorspace("444alpha").is_err());
}

#[test]
fn malformed_headers_are_rejected() {
    assert!(parse_header("YUV4MPEG W4 H4 F25:1").is_err());
    assert!(parse_header("YUV4MPEG2 H4 F25:1").is_err());
    assert!(parse_header("YUV4MPEG2 W4 H4").is_err());
    assert!(parse_header("YUV4MPEG2 W0 H4 F25:1").is_err());
    assert!(parse_header("YUV4MPEG2 W4 H4 F25").is_err());
    assert!(parse_header("YUV4MPEG2 W4 H4 F25:0").is_err());
    assert!(parse_header("YUV4MPEG2 W4 H4 F25:1 Ix").is_err());
}

#[test]
fn oversized_dimensions_are_rejected_at_open() {
    let h = parse_header("YUV4MPEG2 W4294967295 H4294967295 F25:1 C420").unwrap();
    assert!(matches!(h.frame_size(), Err(DeintError::Validation(_))));

    let path = temp_path("clip_oversized");
    let mut data = b"YUV4MPEG2 W4294967295 H4294967295 F25:1 C420\nFRAME\n".to_vec();
    data.push(0);
    std::fs::write(&path, data).unwrap();

    let err = Y4mClip::open(&path).err().unwrap();
    assert!(matches!(err, DeintError::Validation(_)));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn clip_indexes_and_reads_frames() {
    let path = temp_path("clip_read");
    std::fs::write(&path, small_stream("b")).unwrap();

    let clip = Y4mClip::open(&path).unwrap();
    assert_eq!(clip.info().num_frames, 2);
    assert_eq!(clip.field_based(), FieldBased::BottomFirst);

    let mut ctx = FrameContext::new();
    let f1 = clip
        .get_frame(FrameIndex(1), Activation::Initial, &mut ctx)
        .unwrap()
        .unwrap();
    assert_eq!(f1.plane(0).view().row(1), &[11, 11, 11, 11]);
    assert_eq!(f1.plane(2).view().row(0), &[101, 101]);
    assert_eq!(f1.props.field_based, FieldBased::BottomFirst);
    assert_eq!(f1.props.duration, Some((1001, 30000)));

    assert!(
        clip.get_frame(FrameIndex(2), Activation::Initial, &mut ctx)
            .is_err()
    );
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn truncated_frame_is_rejected() {
    let path = temp_path("clip_truncated");
    let mut data = small_stream("t");
    data.truncate(data.len() - 3);
    std::fs::write(&path, data).unwrap();

    let err = Y4mClip::open(&path).err().unwrap();
    assert!(err.to_string().contains("truncated"));
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn sink_writes_progressive_stream_without_padding() {
    let path = temp_path("sink_roundtrip_src");
    std::fs::write(&path, small_stream("t")).unwrap();
    let clip = Y4mClip::open(&path).unwrap();
    let mut ctx = FrameContext::new();
    let f0 = clip
        .get_frame(FrameIndex(0), Activation::Initial, &mut ctx)
        .unwrap()
        .unwrap();

    // Re-home the picture into aligned planes so the sink has padding to strip.
    let mut padded = crate::frame::frame::alloc_frame(PixelFormat::Yuv420p, 4, 2, Some(&f0));
    for i in 0..3 {
        let src = f0.plane(i).view();
        let mut dst = padded.plane_mut(i).view_mut();
        for y in 0..src.height() {
            dst.row_mut(y).copy_from_slice(src.row(y));
        }
    }
    assert!(padded.plane(0).stride() > 4);

    let mut sink = Y4mSink::new(Vec::new());
    sink.begin(SinkConfig { info: *clip.info() }).unwrap();
    sink.push_frame(FrameIndex(0), &padded.into_ref()).unwrap();
    sink.end().unwrap();
    let bytes = sink.into_inner();

    let expected_header = b"YUV4MPEG2 W4 H2 F30000:1001 Ip A1:1 C420\nFRAME\n";
    assert_eq!(&bytes[..expected_header.len()], expected_header);
    assert_eq!(bytes.len(), expected_header.len() + 12);
    assert_eq!(&bytes[expected_header.len()..][..8], &[10; 8]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn sink_rejects_frames_before_begin_or_with_wrong_geometry() {
    let frame = crate::frame::frame::alloc_frame(PixelFormat::Gray8, 2, 2, None).into_ref();
    let mut sink = Y4mSink::new(Vec::new());
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());

    let info = VideoInfo {
        format: PixelFormat::Gray8,
        width: 4,
        height: 2,
        fps: Fps::new(25, 1).unwrap(),
        num_frames: 1,
    };
    sink.begin(SinkConfig { info }).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}
