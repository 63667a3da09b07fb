use std::sync::Mutex;

use super::*;
use crate::backend::cpu::CpuKernel;
use crate::frame::format::PixelFormat;
use crate::frame::frame::alloc_frame;
use crate::frame::plane::{PlaneView, PlaneViewMut};

#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<(usize, usize, bool)>>,
}

impl PlaneKernel for Recording {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn interpolate(
        &self,
        src: PlaneView<'_>,
        _dst: PlaneViewMut<'_>,
        _missing: Parity,
        is_chroma: bool,
    ) -> DeintResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((src.width(), src.height(), is_chroma));
        Ok(())
    }
}

#[test]
fn visits_every_plane_in_order_with_chroma_flag() {
    let src = alloc_frame(PixelFormat::Yuv420p, 8, 6, None);
    let mut dst = alloc_frame(PixelFormat::Yuv420p, 8, 6, None);
    let k = Recording::default();
    process_planes(&k, &src, &mut dst, Parity::Odd).unwrap();
    assert_eq!(
        *k.calls.lock().unwrap(),
        vec![(8, 6, false), (4, 3, true), (4, 3, true)]
    );
}

#[test]
fn gray_frame_has_only_luma() {
    let src = alloc_frame(PixelFormat::Gray8, 3, 3, None);
    let mut dst = alloc_frame(PixelFormat::Gray8, 3, 3, None);
    let k = Recording::default();
    process_planes(&k, &src, &mut dst, Parity::Even).unwrap();
    assert_eq!(*k.calls.lock().unwrap(), vec![(3, 3, false)]);
}

#[test]
fn plane_count_mismatch_is_rejected() {
    let src = alloc_frame(PixelFormat::Yuv444p, 4, 4, None);
    let mut dst = alloc_frame(PixelFormat::Gray8, 4, 4, None);
    assert!(process_planes(&CpuKernel, &src, &mut dst, Parity::Odd).is_err());
}

#[test]
fn luma_and_chroma_use_their_own_taps() {
    // Rows 0..8 of value 20*y in every plane; rebuild odd rows.
    let mut src = alloc_frame(PixelFormat::Yuv444p, 2, 8, None);
    for p in 0..3 {
        let mut v = src.plane_mut(p).view_mut();
        for y in 0..8 {
            for x in 0..2 {
                v.set(x, y, (20 * y) as u8);
            }
        }
    }
    let mut dst = alloc_frame(PixelFormat::Yuv444p, 2, 8, None);
    process_planes(&CpuKernel, &src, &mut dst, Parity::Odd).unwrap();

    // y=1 luma: taps r0, r0, r2, r4 -> (0 + 0 + 160 + 80 + 5) / 10 = 24
    assert_eq!(dst.plane(0).view().get(0, 1), 24);
    // y=1 chroma: taps r0, r2 -> (0 + 40 + 1) / 2 = 20
    assert_eq!(dst.plane(1).view().get(0, 1), 20);
    assert_eq!(dst.plane(2).view().get(1, 1), 20);
}
