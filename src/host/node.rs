use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::FrameRef;
use crate::stream::VideoInfo;

/// Why a node is being asked for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// First call for this output frame. The node may request upstream frames and return `None`.
    Initial,
    /// Every frame requested during `Initial` is now available in the [`FrameContext`].
    AllFramesReady,
}

/// A frame producer in a pull-based graph.
///
/// Nodes may be activated concurrently for different output frames, so they hold no mutable
/// per-request state.
pub trait Node: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Descriptor of the frames this node produces.
    fn info(&self) -> &VideoInfo;

    /// Produce frame `n`, or request dependencies and return `Ok(None)`.
    ///
    /// A node that returns `None` from [`Activation::Initial`] is activated once more with
    /// [`Activation::AllFramesReady`] and must then return a frame.
    fn get_frame(
        &self,
        n: FrameIndex,
        activation: Activation,
        ctx: &mut FrameContext,
    ) -> DeintResult<Option<FrameRef>>;
}

static NEXT_CLIP_ID: AtomicU64 = AtomicU64::new(1);

/// Shared handle to a node.
#[derive(Clone)]
pub struct Clip {
    id: u64,
    node: Arc<dyn Node>,
}

impl Clip {
    /// Wrap a node in a new handle with a process-unique id.
    pub fn new(node: impl Node + 'static) -> Self {
        Self {
            id: NEXT_CLIP_ID.fetch_add(1, Ordering::Relaxed),
            node: Arc::new(node),
        }
    }

    /// Process-unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Descriptor of the frames this clip produces.
    pub fn info(&self) -> &VideoInfo {
        self.node.info()
    }

    /// Node name.
    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub(crate) fn node(&self) -> &dyn Node {
        self.node.as_ref()
    }
}

impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("id", &self.id)
            .field("name", &self.node.name())
            .field("info", self.node.info())
            .finish()
    }
}

/// Per-request exchange between a node and the host.
///
/// The node records upstream requests during [`Activation::Initial`]; the host delivers the frames
/// before the [`Activation::AllFramesReady`] call. Frames not taken by the node are released when
/// the context is dropped.
#[derive(Default)]
pub struct FrameContext {
    requested: Vec<(Clip, FrameIndex)>,
    ready: HashMap<(u64, FrameIndex), FrameRef>,
}

impl FrameContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the host to make frame `n` of `clip` available. Does not block.
    pub fn request_frame(&mut self, clip: &Clip, n: FrameIndex) {
        let dup = self
            .requested
            .iter()
            .any(|(c, i)| c.id == clip.id && *i == n);
        if !dup {
            self.requested.push((clip.clone(), n));
        }
    }

    /// Remove and return a delivered frame, transferring its reference to the caller.
    pub fn take_frame(&mut self, clip: &Clip, n: FrameIndex) -> DeintResult<FrameRef> {
        self.ready.remove(&(clip.id, n)).ok_or_else(|| {
            DeintError::validation(format!(
                "frame {} of clip '{}' was not requested or already taken",
                n.0,
                clip.name()
            ))
        })
    }

    pub(crate) fn take_requests(&mut self) -> Vec<(Clip, FrameIndex)> {
        std::mem::take(&mut self.requested)
    }

    pub(crate) fn deliver(&mut self, clip: &Clip, n: FrameIndex, frame: FrameRef) {
        self.ready.insert((clip.id, n), frame);
    }
}
