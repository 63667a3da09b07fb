use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::backend::BackendKind;
use crate::deint::parity::BobParams;
use crate::foundation::error::{DeintError, DeintResult};
use crate::frame::frame::FieldBased;
use crate::pipeline::render::RenderThreading;

/// Run configuration for a deinterlacing job, usually loaded from JSON.
///
/// Every field is optional in the file. `mode` and `tff` use the same integer encoding as the
/// filter arguments; an absent `tff` is resolved from the source stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// `0` for double-rate, `1` for single-rate.
    pub mode: Option<i64>,
    /// `1` for top field first, `0` for bottom field first.
    pub tff: Option<i64>,
    /// Kernel backend.
    pub backend: BackendKind,
    /// Frame-level threading.
    pub threading: RenderThreading,
}

impl JobConfig {
    /// Parse a job configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DeintResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DeintError::config(format!("parse job config JSON: {e}")))
    }

    /// Parse a job configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DeintResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DeintError::config(format!("open job config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Filter parameters, falling back to `source_order` when `tff` is unset.
    ///
    /// Streams not marked bottom-first are treated as top-first.
    pub fn bob_params(&self, source_order: FieldBased) -> DeintResult<BobParams> {
        let tff = match (self.tff, source_order) {
            (Some(v), _) => v,
            (None, FieldBased::BottomFirst) => 0,
            (None, _) => 1,
        };
        BobParams::from_ints(self.mode.unwrap_or(0), tff)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
