use crate::foundation::core::FrameIndex;
use crate::foundation::error::DeintResult;
use crate::frame::frame::FrameRef;
use crate::stream::VideoInfo;

/// Configuration provided to a [`FrameSink`] at the start of a range render.
#[derive(Debug, Clone, Copy)]
pub struct SinkConfig {
    /// Descriptor of the frames that will be pushed.
    pub info: VideoInfo,
}

/// Sink contract for consuming rendered frames in output order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order within the
/// requested render range.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> DeintResult<()>;
    /// Push one frame in strictly increasing output order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRef) -> DeintResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> DeintResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRef)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRef)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> DeintResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRef) -> DeintResult<()> {
        self.frames.push((idx, FrameRef::clone(frame)));
        Ok(())
    }

    fn end(&mut self) -> DeintResult<()> {
        self.ended = true;
        Ok(())
    }
}
