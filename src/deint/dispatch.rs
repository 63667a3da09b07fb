use crate::backend::PlaneKernel;
use crate::deint::parity::Parity;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::VideoFrame;

/// Run `kernel` over every plane of `src` into the matching plane of `dst`, in format order.
///
/// Plane 0 is luma; every later plane is treated as chroma.
pub fn process_planes(
    kernel: &dyn PlaneKernel,
    src: &VideoFrame,
    dst: &mut VideoFrame,
    missing: Parity,
) -> DeintResult<()> {
    if src.num_planes() != dst.num_planes() {
        return Err(DeintError::validation(format!(
            "source has {} planes, destination has {}",
            src.num_planes(),
            dst.num_planes()
        )));
    }

    for idx in 0..src.num_planes() {
        let is_chroma = idx > 0;
        let src_plane = src.plane(idx);
        let dst_plane = dst.plane_mut(idx);
        tracing::trace!(
            plane = idx,
            width = src_plane.width(),
            height = src_plane.height(),
            stride = src_plane.stride(),
            is_chroma,
            "interpolate plane"
        );
        kernel.interpolate(src_plane.view(), dst_plane.view_mut(), missing, is_chroma)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/deint/dispatch.rs"]
mod tests;
