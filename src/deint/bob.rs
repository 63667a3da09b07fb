use std::sync::Arc;

use crate::backend::PlaneKernel;
use crate::deint::dispatch::process_planes;
use crate::deint::parity::{BobParams, Mode, resolve};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::{FieldBased, FrameRef, alloc_frame};
use crate::host::core::Core;
use crate::host::node::{Activation, Clip, FrameContext, Node};
use crate::host::registry::{Args, Registry};
use crate::stream::{VideoInfo, derive_output_info};

/// Registered filter name.
pub const BOB_FILTER: &str = "Bob";
/// Registered parameter signature.
pub const BOB_SIGNATURE: &str = "clip:vnode;mode:int:opt;tff:int:opt";

/// Field deinterlacer node.
///
/// Every output frame comes from exactly one source frame: rows of one field are copied and the
/// other field's rows are rebuilt by tap interpolation.
pub struct Bob {
    clip: Clip,
    params: BobParams,
    info: VideoInfo,
    kernel: Arc<dyn PlaneKernel>,
}

impl Bob {
    /// Create a deinterlacer over `clip`.
    pub fn new(clip: Clip, params: BobParams, kernel: Arc<dyn PlaneKernel>) -> DeintResult<Self> {
        let info = derive_output_info(clip.info(), &params)?;
        Ok(Self {
            clip,
            params,
            info,
            kernel,
        })
    }

    /// Instance configuration.
    pub fn params(&self) -> BobParams {
        self.params
    }
}

impl Node for Bob {
    fn name(&self) -> &str {
        BOB_FILTER
    }

    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn get_frame(
        &self,
        n: FrameIndex,
        activation: Activation,
        ctx: &mut FrameContext,
    ) -> DeintResult<Option<FrameRef>> {
        let field = resolve(n, self.params);
        match activation {
            Activation::Initial => {
                tracing::debug!(
                    n = n.0,
                    source = field.source.0,
                    missing = ?field.missing,
                    "request source frame"
                );
                ctx.request_frame(&self.clip, field.source);
                Ok(None)
            }
            Activation::AllFramesReady => {
                let src = ctx.take_frame(&self.clip, field.source)?;
                let mut dst = alloc_frame(
                    self.info.format,
                    self.info.width,
                    self.info.height,
                    Some(src.as_ref()),
                );
                process_planes(self.kernel.as_ref(), &src, &mut dst, field.missing)?;
                drop(src);

                dst.props.field_based = FieldBased::Progressive;
                if self.params.mode == Mode::DoubleRate
                    && let Some((num, den)) = dst.props.duration
                {
                    dst.props.duration = den.checked_mul(2).map(|den| (num, den));
                }
                Ok(Some(dst.into_ref()))
            }
        }
    }
}

fn create_bob(args: &Args, core: &Core) -> DeintResult<Clip> {
    let clip = args
        .get_clip("clip")?
        .cloned()
        .ok_or_else(|| DeintError::config("Bob: argument 'clip' is required"))?;
    let mode = args.get_int("mode")?.unwrap_or(0);
    let tff = args.get_int("tff")?.unwrap_or(1);
    let params = BobParams::from_ints(mode, tff)?;
    Ok(Clip::new(Bob::new(clip, params, core.kernel())?))
}

/// Register the deinterlacer with `registry`.
pub fn register(registry: &mut Registry) -> DeintResult<()> {
    registry.register(BOB_FILTER, BOB_SIGNATURE, create_bob)
}

#[cfg(test)]
#[path = "../../tests/unit/deint/bob.rs"]
mod tests;
