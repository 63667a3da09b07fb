use crate::backend::PlaneKernel;
use crate::deint::kernel::interpolate_plane;
use crate::deint::parity::Parity;
use crate::foundation::error::DeintResult;
use crate::frame::plane::{PlaneView, PlaneViewMut};

/// Row-parallel CPU implementation on the current rayon pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuKernel;

impl PlaneKernel for CpuKernel {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn interpolate(
        &self,
        src: PlaneView<'_>,
        dst: PlaneViewMut<'_>,
        missing: Parity,
        is_chroma: bool,
    ) -> DeintResult<()> {
        interpolate_plane(src, dst, missing, is_chroma)
    }
}
