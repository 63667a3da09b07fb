use super::*;
use crate::frame::plane::Plane;

const PAD: u8 = 0xEE;

/// Plane whose rows are given explicitly, with two padding bytes per row.
fn plane_from_rows(rows: &[Vec<u8>]) -> Plane {
    let width = rows[0].len();
    let stride = width + 2;
    let mut data = Vec::with_capacity(stride * rows.len());
    for r in rows {
        assert_eq!(r.len(), width);
        data.extend_from_slice(r);
        data.extend_from_slice(&[PAD, PAD]);
    }
    Plane::from_raw(width as u32, rows.len() as u32, stride, data).unwrap()
}

fn padded_like(src: &Plane) -> Plane {
    let data = vec![PAD; src.stride() * src.height() as usize];
    Plane::from_raw(src.width(), src.height(), src.stride(), data).unwrap()
}

fn noise_rows(w: usize, h: usize, seed: u32) -> Vec<Vec<u8>> {
    let mut s = seed;
    (0..h)
        .map(|_| {
            (0..w)
                .map(|_| {
                    s = s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    (s >> 24) as u8
                })
                .collect()
        })
        .collect()
}

fn run(src: &Plane, missing: Parity, is_chroma: bool) -> Plane {
    let mut dst = padded_like(src);
    interpolate_plane(src.view(), dst.view_mut(), missing, is_chroma).unwrap();
    dst
}

fn rows_of(p: &Plane) -> Vec<Vec<u8>> {
    let v = p.view();
    (0..v.height()).map(|y| v.row(y).to_vec()).collect()
}

#[test]
fn ramp_4x4_top_first_single_rate() {
    let rows: Vec<Vec<u8>> = (0..4u8).map(|y| vec![y; 4]).collect();
    let dst = run(&plane_from_rows(&rows), Parity::Odd, false);

    // row 1: taps 0,0,2,3 -> (0 + 0 + 8 + 3 + 5) / 10 = 1
    // row 3: taps 0,2,3,3 -> (0 + 8 + 12 + 3 + 5) / 10 = 2
    assert_eq!(
        rows_of(&dst),
        vec![vec![0; 4], vec![1; 4], vec![2; 4], vec![2; 4]]
    );
}

#[test]
fn present_rows_are_copied_exactly() {
    let rows = noise_rows(13, 11, 7);
    let src = plane_from_rows(&rows);
    for missing in [Parity::Even, Parity::Odd] {
        for chroma in [false, true] {
            let dst = run(&src, missing, chroma);
            let out = rows_of(&dst);
            for (y, row) in rows.iter().enumerate() {
                if Parity::of_row(y) != missing {
                    assert_eq!(&out[y], row, "row {y} missing={missing:?} chroma={chroma}");
                }
            }
        }
    }
}

#[test]
fn interior_luma_matches_weighted_formula() {
    let rows = noise_rows(9, 16, 42);
    let src = plane_from_rows(&rows);
    let dst = run(&src, Parity::Odd, false);
    let out = rows_of(&dst);
    let h = rows.len();
    for y in (3..=h - 4).filter(|y| y % 2 == 1) {
        for x in 0..9 {
            let s = |yy: usize| u32::from(rows[yy][x]);
            let expect = (4 * s(y - 1) + 4 * s(y + 1) + s(y - 3) + s(y + 3) + 5) / 10;
            assert_eq!(u32::from(out[y][x]), expect, "({x}, {y})");
        }
    }
}

#[test]
fn interior_chroma_matches_average() {
    let rows = noise_rows(5, 10, 3);
    let src = plane_from_rows(&rows);
    let dst = run(&src, Parity::Even, true);
    let out = rows_of(&dst);
    for y in (1..rows.len() - 1).filter(|y| y % 2 == 0) {
        for x in 0..5 {
            let expect = (u32::from(rows[y - 1][x]) + u32::from(rows[y + 1][x]) + 1) / 2;
            assert_eq!(u32::from(out[y][x]), expect);
        }
    }
}

#[test]
fn top_edge_reuses_row_zero() {
    let rows: Vec<Vec<u8>> = (0..6u8).map(|y| vec![10 * y + 5; 3]).collect();
    let src = plane_from_rows(&rows);

    // y=0 luma: taps r0, r0, r1, r3 -> (5 + 20 + 60 + 35 + 5) / 10 = 12
    let luma = run(&src, Parity::Even, false);
    assert_eq!(luma.view().row(0), &[12, 12, 12]);

    // y=0 chroma: taps r0, r1 -> (5 + 15 + 1) / 2 = 10
    let chroma = run(&src, Parity::Even, true);
    assert_eq!(chroma.view().row(0), &[10, 10, 10]);
}

#[test]
fn bottom_edge_reuses_last_row() {
    let rows: Vec<Vec<u8>> = (0..6u8).map(|y| vec![10 * y + 5; 2]).collect();
    let src = plane_from_rows(&rows);

    // y=5 luma: taps r2, r4, r5, r5 -> (25 + 180 + 220 + 55 + 5) / 10 = 48
    let luma = run(&src, Parity::Odd, false);
    assert_eq!(luma.view().row(5), &[48, 48]);

    // y=5 chroma: taps r4, r5 -> (45 + 55 + 1) / 2 = 50
    let chroma = run(&src, Parity::Odd, true);
    assert_eq!(chroma.view().row(5), &[50, 50]);
}

#[test]
fn single_row_plane_reconstructs_from_itself() {
    let src = plane_from_rows(&[vec![0, 1, 128, 255]]);
    for (missing, is_chroma) in [
        (Parity::Even, false),
        (Parity::Even, true),
        (Parity::Odd, false),
    ] {
        let out = run(&src, missing, is_chroma);
        assert_eq!(out.view().row(0), &[0, 1, 128, 255]);
    }
}

#[test]
fn padding_bytes_are_never_written() {
    let src = plane_from_rows(&noise_rows(4, 7, 11));
    let dst = run(&src, Parity::Odd, false);
    for y in 0..7 {
        let start = y * dst.stride();
        assert_eq!(&dst.data()[start + 4..start + 6], &[PAD, PAD]);
    }
}

#[test]
fn reruns_are_byte_identical() {
    let src = plane_from_rows(&noise_rows(17, 9, 5));
    let a = run(&src, Parity::Even, false);
    let b = run(&src, Parity::Even, false);
    assert_eq!(a, b);
}

#[test]
fn mismatched_geometry_is_rejected() {
    let src = plane_from_rows(&noise_rows(4, 4, 1));
    let mut dst = Plane::new(4, 3);
    let err = interpolate_plane(src.view(), dst.view_mut(), Parity::Odd, false).unwrap_err();
    assert!(err.to_string().contains("geometry mismatch"));
}

#[test]
fn rounding_is_half_up_without_overflow() {
    assert_eq!(luma_tap(0, 0, 0, 5), 1);
    assert_eq!(luma_tap(0, 0, 0, 4), 0);
    assert_eq!(luma_tap(255, 255, 255, 255), 255);
    assert_eq!(chroma_tap(0, 1), 1);
    assert_eq!(chroma_tap(254, 255), 255);
    assert_eq!(chroma_tap(255, 255), 255);
}
