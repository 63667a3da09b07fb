//! Tap interpolation over one plane.
//!
//! Rows whose parity differs from the missing parity are copied untouched. Missing rows are
//! rebuilt from the same column of nearby rows of the same source plane:
//!
//! - luma: rows `y-3, y-1, y+1, y+3` with weights `1, 4, 4, 1`, rounded as `(sum + 5) / 10`
//! - chroma: rows `y-1, y+1`, rounded as `(a + b + 1) / 2`
//!
//! Every tap row is clamped into `[0, height - 1]` on its own. When clamping folds two taps onto
//! the same row, both still contribute at their full weight.

use rayon::prelude::*;

use crate::deint::parity::Parity;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::plane::{PlaneView, PlaneViewMut};

/// Weighted luma reconstruction of one sample.
#[inline]
pub fn luma_tap(m3: u8, m1: u8, p1: u8, p3: u8) -> u8 {
    let sum = u32::from(m3) + 4 * u32::from(m1) + 4 * u32::from(p1) + u32::from(p3);
    ((sum + 5) / 10) as u8
}

/// Averaged chroma reconstruction of one sample.
#[inline]
pub fn chroma_tap(m1: u8, p1: u8) -> u8 {
    ((u32::from(m1) + u32::from(p1) + 1) / 2) as u8
}

/// Produce row `y` of the output plane into `out` (exactly `src.width()` samples).
pub fn interpolate_row(
    src: &PlaneView<'_>,
    y: usize,
    missing: Parity,
    is_chroma: bool,
    out: &mut [u8],
) {
    debug_assert_eq!(out.len(), src.width());
    if Parity::of_row(y) != missing {
        out.copy_from_slice(src.row(y));
        return;
    }

    let yi = y as isize;
    if is_chroma {
        let m1 = src.row_clamped(yi - 1);
        let p1 = src.row_clamped(yi + 1);
        for (x, o) in out.iter_mut().enumerate() {
            *o = chroma_tap(m1[x], p1[x]);
        }
    } else {
        let m3 = src.row_clamped(yi - 3);
        let m1 = src.row_clamped(yi - 1);
        let p1 = src.row_clamped(yi + 1);
        let p3 = src.row_clamped(yi + 3);
        for (x, o) in out.iter_mut().enumerate() {
            *o = luma_tap(m3[x], m1[x], p1[x], p3[x]);
        }
    }
}

/// Fill `dst` from `src`, rebuilding rows of the `missing` parity.
///
/// Rows are processed in parallel; padding bytes of `dst` are left as they were.
pub fn interpolate_plane(
    src: PlaneView<'_>,
    mut dst: PlaneViewMut<'_>,
    missing: Parity,
    is_chroma: bool,
) -> DeintResult<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(DeintError::validation(format!(
            "plane geometry mismatch: src {}x{}, dst {}x{}",
            src.width(),
            src.height(),
            dst.width(),
            dst.height()
        )));
    }
    if src.width() == 0 || src.height() == 0 {
        return Ok(());
    }

    dst.rows_mut()
        .for_each(|(y, out)| interpolate_row(&src, y, missing, is_chroma, out));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/deint/kernel.rs"]
mod tests;
