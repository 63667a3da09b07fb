use rayon::prelude::*;

use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::FrameRef;
use crate::host::core::Core;
use crate::host::node::Clip;
use crate::pipeline::sink::{FrameSink, SinkConfig};

/// Frame-level threading for [`render_range`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    /// Render the frames of a chunk concurrently.
    pub parallel: bool,
    /// Frames fetched per chunk; `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker count for the dedicated pool; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Counters reported by [`render_range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Chunks processed.
    pub chunks: u64,
}

/// Fetch `range` of `clip` through `core` and push every frame to `sink` in index order.
///
/// With `threading.parallel` the frames of each chunk are fetched on a rayon pool; results are
/// collected per chunk and pushed in order, so the sink sees the same sequence either way.
#[tracing::instrument(level = "debug", skip_all, fields(clip = clip.name(), start = range.start.0, end = range.end.0))]
pub fn render_range(
    core: &Core,
    clip: &Clip,
    range: FrameRange,
    threading: &RenderThreading,
    sink: &mut dyn FrameSink,
) -> DeintResult<RenderStats> {
    if range.is_empty() {
        return Err(DeintError::validation("render range must be non-empty"));
    }
    let num_frames = clip.info().num_frames;
    if range.end.0 > num_frames {
        return Err(DeintError::validation(format!(
            "render range end {} exceeds clip length {num_frames}",
            range.end.0
        )));
    }

    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig { info: *clip.info() })?;

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

        let frames = match pool.as_ref() {
            Some(pool) => render_chunk_parallel(core, clip, chunk, pool)?,
            None => render_chunk_sequential(core, clip, chunk)?,
        };
        for (i, frame) in frames.iter().enumerate() {
            sink.push_frame(FrameIndex(chunk_start + i as u64), frame)?;
        }

        stats.frames_total += frames.len() as u64;
        stats.chunks += 1;
        tracing::debug!(chunk_start, chunk_end, "chunk done");
        chunk_start = chunk_end;
    }

    sink.end()?;
    Ok(stats)
}

fn render_chunk_sequential(
    core: &Core,
    clip: &Clip,
    range: FrameRange,
) -> DeintResult<Vec<FrameRef>> {
    let mut out = Vec::with_capacity(range.len_frames() as usize);
    for f in range.start.0..range.end.0 {
        out.push(core.get_frame(clip, FrameIndex(f))?);
    }
    Ok(out)
}

fn render_chunk_parallel(
    core: &Core,
    clip: &Clip,
    range: FrameRange,
    pool: &rayon::ThreadPool,
) -> DeintResult<Vec<FrameRef>> {
    let indices: Vec<u64> = (range.start.0..range.end.0).collect();
    let rendered = pool.install(|| {
        indices
            .par_iter()
            .map(|&f| core.get_frame(clip, FrameIndex(f)))
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(rendered.len());
    for item in rendered {
        out.push(item?);
    }
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> DeintResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DeintError::config(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| DeintError::backend(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/render.rs"]
mod tests;
