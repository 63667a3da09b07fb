/// Planar 8-bit pixel formats understood by the deinterlacer.
///
/// Plane order is fixed: luma first, then Cb and Cr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Single luma plane.
    Gray8,
    /// 4:2:0, chroma halved both ways.
    Yuv420p,
    /// 4:2:2, chroma halved horizontally.
    Yuv422p,
    /// 4:4:4, full-resolution chroma.
    Yuv444p,
    /// 4:1:1, chroma quartered horizontally.
    Yuv411p,
}

impl PixelFormat {
    /// Number of planes stored for this format.
    pub fn num_planes(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            _ => 3,
        }
    }

    /// `(log2 horizontal, log2 vertical)` subsampling of chroma planes.
    pub fn chroma_subsampling(self) -> (u32, u32) {
        match self {
            PixelFormat::Gray8 | PixelFormat::Yuv444p => (0, 0),
            PixelFormat::Yuv420p => (1, 1),
            PixelFormat::Yuv422p => (1, 0),
            PixelFormat::Yuv411p => (2, 0),
        }
    }

    /// Dimensions of plane `idx` for a `width`x`height` frame.
    ///
    /// Subsampled sizes round up, so odd frame sizes keep their last column/row of chroma.
    pub fn plane_dimensions(self, idx: usize, width: u32, height: u32) -> (u32, u32) {
        if idx == 0 {
            return (width, height);
        }
        let (ssx, ssy) = self.chroma_subsampling();
        (ceil_shr(width, ssx), ceil_shr(height, ssy))
    }
}

fn ceil_shr(v: u32, shift: u32) -> u32 {
    if shift == 0 {
        return v;
    }
    let round = (1u32 << shift) - 1;
    v.saturating_add(round) >> shift
}
