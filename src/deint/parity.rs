use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DeintError, DeintResult};

/// Output rate.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// One output frame per field ("bob"); doubles rate and frame count.
    #[default]
    DoubleRate,
    /// One output frame per source frame, always rebuilding the same field.
    SingleRate,
}

impl Mode {
    /// Parse the integer form used by filter arguments (`0` double-rate, `1` single-rate).
    pub fn from_int(v: i64) -> DeintResult<Self> {
        match v {
            0 => Ok(Mode::DoubleRate),
            1 => Ok(Mode::SingleRate),
            other => Err(DeintError::config(format!(
                "mode must be 0 (double-rate) or 1 (single-rate), got {other}"
            ))),
        }
    }
}

/// Which field of an interlaced frame was captured first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldOrder {
    /// Even rows are the first field.
    #[default]
    TopFirst,
    /// Odd rows are the first field.
    BottomFirst,
}

impl FieldOrder {
    /// Parse the integer `tff` argument (`1` top-first, `0` bottom-first).
    pub fn from_tff(v: i64) -> DeintResult<Self> {
        match v {
            1 => Ok(FieldOrder::TopFirst),
            0 => Ok(FieldOrder::BottomFirst),
            other => Err(DeintError::config(format!(
                "tff must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// Row parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Rows 0, 2, 4, ...
    Even,
    /// Rows 1, 3, 5, ...
    Odd,
}

impl Parity {
    /// Parity of row `y`.
    pub fn of_row(y: usize) -> Self {
        if y % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// The other parity.
    pub fn flipped(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }

    /// `0` for even, `1` for odd.
    pub fn as_u32(self) -> u32 {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }
}

/// Immutable per-instance configuration of the deinterlacer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BobParams {
    /// Output rate.
    pub mode: Mode,
    /// Source field order.
    pub field_order: FieldOrder,
}

impl BobParams {
    /// Build from the integer filter arguments.
    pub fn from_ints(mode: i64, tff: i64) -> DeintResult<Self> {
        Ok(Self {
            mode: Mode::from_int(mode)?,
            field_order: FieldOrder::from_tff(tff)?,
        })
    }
}

/// Source frame and missing row parity for one output frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSelect {
    /// Source frame to fetch.
    pub source: FrameIndex,
    /// Rows of this parity are rebuilt; the others are copied.
    pub missing: Parity,
}

/// Map output frame `n` to its source frame and missing parity.
///
/// `n` is not range-checked; the host only requests indices below the published frame count.
pub fn resolve(n: FrameIndex, params: BobParams) -> FieldSelect {
    let top_first = params.field_order == FieldOrder::TopFirst;
    let (source, first_field) = match params.mode {
        Mode::SingleRate => (n.0, true),
        Mode::DoubleRate => (n.0 / 2, n.0 % 2 == 0),
    };
    // The kept field is the top (even) one exactly when `first_field == top_first`.
    let missing = if first_field == top_first {
        Parity::Odd
    } else {
        Parity::Even
    };
    FieldSelect {
        source: FrameIndex(source),
        missing,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deint/parity.rs"]
mod tests;
