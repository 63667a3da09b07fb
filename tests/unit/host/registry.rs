use super::*;
use crate::backend::cpu::CpuKernel;
use crate::foundation::core::Fps;
use crate::frame::format::PixelFormat;
use crate::frame::frame::alloc_frame;
use crate::host::source::MemoryClip;
use crate::stream::VideoInfo;
use std::sync::Arc;

fn identity(args: &Args, _core: &Core) -> DeintResult<Clip> {
    args.get_clip("clip")?
        .cloned()
        .ok_or_else(|| DeintError::config("clip missing"))
}

fn core() -> Core {
    Core::new(Arc::new(CpuKernel))
}

fn clip() -> Clip {
    let info = VideoInfo {
        format: PixelFormat::Gray8,
        width: 2,
        height: 2,
        fps: Fps::new(24, 1).unwrap(),
        num_frames: 0,
    };
    let frame = alloc_frame(PixelFormat::Gray8, 2, 2, None).into_ref();
    Clip::new(MemoryClip::new("src", info, vec![frame]).unwrap())
}

fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.register("Identity", "clip:vnode;level:int:opt", identity)
        .unwrap();
    reg
}

#[test]
fn signature_parsing() {
    let params = parse_signature("clip:vnode;mode:int:opt;tff:int:opt").unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0].kind, ArgKind::Clip);
    assert!(!params[0].optional);
    assert_eq!(params[2].name, "tff");
    assert!(params[2].optional);

    assert!(parse_signature("clip:float").is_err());
    assert!(parse_signature("clip:vnode:maybe").is_err());
    assert!(parse_signature(":int").is_err());
}

#[test]
fn invoke_runs_constructor() {
    let src = clip();
    let mut args = Args::new();
    args.set_clip("clip", src.clone()).set_int("level", 3);
    let out = registry().invoke("Identity", &args, &core()).unwrap();
    assert_eq!(out.id(), src.id());
}

#[test]
fn missing_required_argument() {
    let err = registry()
        .invoke("Identity", &Args::new(), &core())
        .unwrap_err();
    assert!(matches!(err, DeintError::Config(_)));
    assert!(err.to_string().contains("argument 'clip' is required"));
}

#[test]
fn wrong_argument_type() {
    let mut args = Args::new();
    args.set_int("clip", 1);
    let err = registry().invoke("Identity", &args, &core()).unwrap_err();
    assert!(matches!(err, DeintError::Config(_)));
    assert!(args.get_clip("clip").is_err());
}

#[test]
fn unknown_argument() {
    let mut args = Args::new();
    args.set_clip("clip", clip()).set_int("bogus", 0);
    let err = registry().invoke("Identity", &args, &core()).unwrap_err();
    assert!(err.to_string().contains("unknown argument 'bogus'"));
}

#[test]
fn unknown_filter() {
    assert!(registry().invoke("Nope", &Args::new(), &core()).is_err());
}

#[test]
fn duplicate_registration() {
    let mut reg = registry();
    assert!(reg.register("Identity", "clip:vnode", identity).is_err());
    assert_eq!(reg.filter_names().collect::<Vec<_>>(), vec!["Identity"]);
}
