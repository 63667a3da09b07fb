use std::sync::Arc;

use smallvec::SmallVec;

use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::format::PixelFormat;
use crate::frame::plane::Plane;

/// Shared, immutable frame handle.
///
/// Frames are frozen once wrapped; the last holder to drop the handle releases the pixels.
pub type FrameRef = Arc<VideoFrame>;

/// Field structure of the picture stored in a frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldBased {
    /// Progressive, or unknown.
    #[default]
    Progressive,
    /// Interlaced, bottom field first.
    BottomFirst,
    /// Interlaced, top field first.
    TopFirst,
}

/// Per-frame metadata carried alongside the pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameProps {
    /// Field structure.
    pub field_based: FieldBased,
    /// Display duration as `num/den` seconds, when known.
    pub duration: Option<(u64, u64)>,
}

/// A planar video frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    format: PixelFormat,
    width: u32,
    height: u32,
    planes: SmallVec<[Plane; 3]>,
    /// Frame metadata.
    pub props: FrameProps,
}

impl VideoFrame {
    /// Assemble a frame from already populated planes.
    ///
    /// Plane count and per-plane dimensions must match `format`.
    pub fn from_planes(
        format: PixelFormat,
        width: u32,
        height: u32,
        planes: Vec<Plane>,
        props: FrameProps,
    ) -> DeintResult<Self> {
        if planes.len() != format.num_planes() {
            return Err(DeintError::validation(format!(
                "{format:?} needs {} planes, got {}",
                format.num_planes(),
                planes.len()
            )));
        }
        for (i, p) in planes.iter().enumerate() {
            let (w, h) = format.plane_dimensions(i, width, height);
            if p.width() != w || p.height() != h {
                return Err(DeintError::validation(format!(
                    "plane {i} is {}x{}, expected {w}x{h}",
                    p.width(),
                    p.height()
                )));
            }
        }
        Ok(Self {
            format,
            width,
            height,
            planes: planes.into_iter().collect(),
            props,
        })
    }

    /// Pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Frame width in luma samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in luma rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of planes.
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Plane `idx`.
    ///
    /// Panics when `idx >= num_planes()`.
    pub fn plane(&self, idx: usize) -> &Plane {
        &self.planes[idx]
    }

    /// Mutable plane `idx`.
    ///
    /// Panics when `idx >= num_planes()`.
    pub fn plane_mut(&mut self, idx: usize) -> &mut Plane {
        &mut self.planes[idx]
    }

    /// Freeze into a shared handle.
    pub fn into_ref(self) -> FrameRef {
        Arc::new(self)
    }
}

/// Allocate a zeroed frame for `format` at `width`x`height`.
///
/// Only metadata is taken from `template`; pixel data always starts zeroed.
pub fn alloc_frame(
    format: PixelFormat,
    width: u32,
    height: u32,
    template: Option<&VideoFrame>,
) -> VideoFrame {
    let planes = (0..format.num_planes())
        .map(|i| {
            let (w, h) = format.plane_dimensions(i, width, height);
            Plane::new(w, h)
        })
        .collect();
    VideoFrame {
        format,
        width,
        height,
        planes,
        props: template.map(|t| t.props).unwrap_or_default(),
    }
}

/// Stable 64-bit fingerprint of the visible samples of every plane.
///
/// Row padding is excluded, so frames with different strides but equal pictures hash the same.
pub fn frame_fingerprint(frame: &VideoFrame) -> u64 {
    let mut h = xxhash_rust::xxh3::Xxh3::new();
    h.update(&frame.width.to_le_bytes());
    h.update(&frame.height.to_le_bytes());
    h.update(&(frame.num_planes() as u32).to_le_bytes());
    for plane in &frame.planes {
        let view = plane.view();
        for y in 0..view.height() {
            h.update(view.row(y));
        }
    }
    h.digest()
}

#[cfg(test)]
#[path = "../../tests/unit/frame/frame.rs"]
mod tests;
