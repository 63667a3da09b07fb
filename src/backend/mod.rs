//! Parallel pixel transform backends.
//!
//! A backend runs the tap interpolation over one whole plane and returns only once every output
//! sample has been written.

use std::sync::Arc;

use crate::deint::parity::Parity;
use crate::foundation::error::DeintResult;
use crate::frame::plane::{PlaneView, PlaneViewMut};

/// CPU backend (rayon).
pub mod cpu;
/// GPU backend (wgpu compute).
#[cfg(feature = "gpu")]
pub mod gpu;

/// Executes the tap interpolation over one plane.
///
/// Implementations are shared across concurrent frame requests and must not keep per-request
/// state between calls. On error, nothing written into `dst` may be relied on.
pub trait PlaneKernel: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Fill `dst` from `src`, rebuilding rows of the `missing` parity.
    fn interpolate(
        &self,
        src: PlaneView<'_>,
        dst: PlaneViewMut<'_>,
        missing: Parity,
        is_chroma: bool,
    ) -> DeintResult<()>;
}

/// Available backend kinds.
///
/// - `Cpu` is always available.
/// - `Gpu` requires the `gpu` cargo feature and a usable adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Data-parallel CPU loop.
    #[default]
    Cpu,
    /// wgpu compute shader, one invocation per 4-byte output word.
    Gpu,
}

/// Create a kernel backend.
pub fn create_kernel(kind: BackendKind) -> DeintResult<Arc<dyn PlaneKernel>> {
    match kind {
        BackendKind::Cpu => Ok(Arc::new(cpu::CpuKernel)),
        #[cfg(feature = "gpu")]
        BackendKind::Gpu => Ok(Arc::new(gpu::GpuKernel::new()?)),
        #[cfg(not(feature = "gpu"))]
        BackendKind::Gpu => Err(crate::foundation::error::DeintError::config(
            "gpu backend requested but tapdeint was built without the `gpu` feature",
        )),
    }
}
