use crate::foundation::error::{DeintError, DeintResult};

/// Row alignment used for freshly allocated planes.
pub const PLANE_ALIGN: usize = 32;

/// One owned 8-bit sample grid.
///
/// Rows start every `stride` bytes; bytes between `width` and `stride` are padding and carry no
/// picture data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Allocate a zeroed plane with a stride aligned to [`PLANE_ALIGN`].
    pub fn new(width: u32, height: u32) -> Self {
        let stride = align_to(width as usize, PLANE_ALIGN);
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Wrap an existing buffer. `data` must hold `height` rows of `stride` bytes.
    pub fn from_raw(width: u32, height: u32, stride: usize, data: Vec<u8>) -> DeintResult<Self> {
        if stride < width as usize {
            return Err(DeintError::validation(format!(
                "plane stride {stride} is smaller than width {width}"
            )));
        }
        let need = stride
            .checked_mul(height as usize)
            .ok_or_else(|| DeintError::validation("plane size overflow"))?;
        if data.len() < need {
            return Err(DeintError::validation(format!(
                "plane buffer holds {} bytes, {need} required",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw buffer including row padding.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only view.
    pub fn view(&self) -> PlaneView<'_> {
        PlaneView {
            width: self.width as usize,
            height: self.height as usize,
            stride: self.stride,
            data: &self.data,
        }
    }

    /// Borrow as a writable view.
    pub fn view_mut(&mut self) -> PlaneViewMut<'_> {
        PlaneViewMut {
            width: self.width as usize,
            height: self.height as usize,
            stride: self.stride,
            data: &mut self.data,
        }
    }
}

/// Read-only stride-addressed view of one plane.
#[derive(Clone, Copy, Debug)]
pub struct PlaneView<'a> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [u8],
}

impl<'a> PlaneView<'a> {
    /// Width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in bytes between consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible samples of row `y` (padding excluded).
    pub fn row(&self, y: usize) -> &'a [u8] {
        debug_assert!(y < self.height, "row {y} out of range 0..{}", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Visible samples of row `y` clamped into `[0, height - 1]`.
    pub fn row_clamped(&self, y: isize) -> &'a [u8] {
        self.row(clamp_row(y, self.height))
    }

    /// Sample at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width, "column {x} out of range 0..{}", self.width);
        self.row(y)[x]
    }
}

/// Writable stride-addressed view of one plane.
#[derive(Debug)]
pub struct PlaneViewMut<'a> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [u8],
}

impl PlaneViewMut<'_> {
    /// Width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance in bytes between consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Visible samples of row `y`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        debug_assert!(y < self.height, "row {y} out of range 0..{}", self.height);
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Write one sample.
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        debug_assert!(x < self.width, "column {x} out of range 0..{}", self.width);
        self.row_mut(y)[x] = v;
    }

    /// Mutable row slices `(y, visible samples)` for every row, suitable for parallel iteration.
    pub fn rows_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = (usize, &mut [u8])> {
        use rayon::prelude::*;

        let width = self.width;
        self.data
            .par_chunks_mut(self.stride.max(1))
            .take(self.height)
            .map(move |row| &mut row[..width])
            .enumerate()
    }
}

/// Clamp a possibly negative row index into `[0, height - 1]`.
///
/// Edge rows are reused, never mirrored or wrapped. `height` must be non-zero.
pub fn clamp_row(y: isize, height: usize) -> usize {
    debug_assert!(height > 0);
    y.clamp(0, height as isize - 1) as usize
}

pub(crate) fn align_to(value: usize, alignment: usize) -> usize {
    let mask = alignment - 1;
    (value + mask) & !mask
}
