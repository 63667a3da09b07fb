use crate::deint::parity::{BobParams, Mode};
use crate::foundation::core::Fps;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::format::PixelFormat;

/// Immutable description of a clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    /// Pixel format of every frame.
    pub format: PixelFormat,
    /// Frame width in luma samples.
    pub width: u32,
    /// Frame height in luma rows.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Total number of frames.
    pub num_frames: u64,
}

/// Describe the deinterlacer's output stream.
///
/// Everything is copied from `upstream`; double-rate output doubles the rate numerator and the
/// frame count.
pub fn derive_output_info(upstream: &VideoInfo, params: &BobParams) -> DeintResult<VideoInfo> {
    let mut out = *upstream;
    if params.mode == Mode::DoubleRate {
        out.fps = upstream.fps.doubled()?;
        out.num_frames = upstream
            .num_frames
            .checked_mul(2)
            .ok_or_else(|| DeintError::validation("frame count overflows when doubled"))?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/stream.rs"]
mod tests;
