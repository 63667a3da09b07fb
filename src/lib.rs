//! tapdeint is a field deinterlacer for pull-based planar video pipelines.
//!
//! Each output frame is built from one source frame: rows of the kept field are copied, rows of the
//! other field are rebuilt with a four-tap vertical filter on luma and a two-tap average on chroma.
//! Double-rate ("bob") mode emits one frame per field.
//!
//! - Build a [`Core`] with a kernel backend ([`BackendKind::Cpu`], or [`BackendKind::Gpu`] with the
//!   `gpu` feature)
//! - [`register`] the `Bob` filter in a [`Registry`] and invoke it over a source [`Clip`]
//! - Pull single frames with [`Core::get_frame`] or stream a range into a [`FrameSink`] with
//!   [`render_range`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod deint;
mod foundation;
mod frame;
mod host;
mod io;
mod pipeline;
mod stream;

/// Plane kernel backends.
pub mod backend;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{DeintError, DeintResult};

pub use crate::backend::{BackendKind, PlaneKernel, create_kernel};
pub use crate::config::JobConfig;
pub use crate::deint::bob::{BOB_FILTER, BOB_SIGNATURE, Bob, register};
pub use crate::deint::dispatch::process_planes;
pub use crate::deint::kernel::{chroma_tap, interpolate_plane, luma_tap};
pub use crate::deint::parity::{BobParams, FieldOrder, FieldSelect, Mode, Parity, resolve};
pub use crate::frame::format::PixelFormat;
pub use crate::frame::frame::{
    FieldBased, FrameProps, FrameRef, VideoFrame, alloc_frame, frame_fingerprint,
};
pub use crate::frame::plane::{PLANE_ALIGN, Plane, PlaneView, PlaneViewMut, clamp_row};
pub use crate::host::core::Core;
pub use crate::host::node::{Activation, Clip, FrameContext, Node};
pub use crate::host::registry::{ArgValue, Args, CreateFn, Registry};
pub use crate::host::source::MemoryClip;
pub use crate::io::y4m::{Y4mClip, Y4mHeader, Y4mSink, parse_header as parse_y4m_header};
pub use crate::pipeline::render::{RenderStats, RenderThreading, render_range};
pub use crate::pipeline::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::stream::{VideoInfo, derive_output_info};
