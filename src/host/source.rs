use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::FrameRef;
use crate::host::node::{Activation, FrameContext, Node};
use crate::stream::VideoInfo;

/// Source node serving frames held in memory.
pub struct MemoryClip {
    name: String,
    info: VideoInfo,
    frames: Vec<FrameRef>,
}

impl MemoryClip {
    /// Build a clip from `frames`; every frame must match `info` in format and size.
    ///
    /// `info.num_frames` is overwritten with `frames.len()`.
    pub fn new(
        name: impl Into<String>,
        mut info: VideoInfo,
        frames: Vec<FrameRef>,
    ) -> DeintResult<Self> {
        for (i, f) in frames.iter().enumerate() {
            if f.format() != info.format || f.width() != info.width || f.height() != info.height {
                return Err(DeintError::validation(format!(
                    "frame {i} is {:?} {}x{}, clip is {:?} {}x{}",
                    f.format(),
                    f.width(),
                    f.height(),
                    info.format,
                    info.width,
                    info.height
                )));
            }
        }
        info.num_frames = frames.len() as u64;
        Ok(Self {
            name: name.into(),
            info,
            frames,
        })
    }
}

impl Node for MemoryClip {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(
        &self,
        n: FrameIndex,
        _activation: Activation,
        _ctx: &mut FrameContext,
    ) -> DeintResult<Option<FrameRef>> {
        let frame = self.frames.get(n.0 as usize).ok_or_else(|| {
            DeintError::validation(format!("frame {} out of range for '{}'", n.0, self.name))
        })?;
        Ok(Some(FrameRef::clone(frame)))
    }
}
