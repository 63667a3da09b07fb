use std::sync::Arc;

use crate::backend::{BackendKind, PlaneKernel, create_kernel};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::FrameRef;
use crate::host::node::{Activation, Clip, FrameContext};

/// Frame server: drives the two-phase activation protocol and owns the kernel backend.
///
/// `get_frame` is re-entrant and may be called from many threads at once.
#[derive(Clone)]
pub struct Core {
    kernel: Arc<dyn PlaneKernel>,
}

impl Core {
    /// Core using the given kernel backend.
    pub fn new(kernel: Arc<dyn PlaneKernel>) -> Self {
        Self { kernel }
    }

    /// Core with a freshly created backend of `kind`.
    pub fn with_backend(kind: BackendKind) -> DeintResult<Self> {
        Ok(Self::new(create_kernel(kind)?))
    }

    /// Kernel backend shared by filters created on this core.
    pub fn kernel(&self) -> Arc<dyn PlaneKernel> {
        Arc::clone(&self.kernel)
    }

    /// Produce frame `n` of `clip`, fetching whatever upstream frames it requests first.
    #[tracing::instrument(level = "debug", skip_all, fields(clip = clip.name(), n = n.0))]
    pub fn get_frame(&self, clip: &Clip, n: FrameIndex) -> DeintResult<FrameRef> {
        let num_frames = clip.info().num_frames;
        if n.0 >= num_frames {
            return Err(DeintError::validation(format!(
                "frame {} out of range for clip '{}' with {num_frames} frames",
                n.0,
                clip.name()
            )));
        }

        let mut ctx = FrameContext::new();
        if let Some(frame) = clip.node().get_frame(n, Activation::Initial, &mut ctx)? {
            return Ok(frame);
        }

        for (upstream, idx) in ctx.take_requests() {
            let frame = self.get_frame(&upstream, idx)?;
            ctx.deliver(&upstream, idx, frame);
        }

        clip.node()
            .get_frame(n, Activation::AllFramesReady, &mut ctx)?
            .ok_or_else(|| {
                DeintError::validation(format!(
                    "clip '{}' returned no frame {} after its requests were satisfied",
                    clip.name(),
                    n.0
                ))
            })
    }
}

impl std::fmt::Debug for Core {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Core")
            .field("kernel", &self.kernel.name())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/core.rs"]
mod tests;
