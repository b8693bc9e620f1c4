//! Errors produced while hinting a glyph.

use crate::axis::Dimension;
use std::collections::TryReserveError;

/// Reasons a glyph could not be hinted.
///
/// Allocation failures are fatal for the current glyph. The remaining
/// variants describe input the hinter refuses to process; callers
/// typically fall back to the unhinted outline.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum HintError {
    /// Growing a point, contour, segment or edge buffer failed.
    #[error("out of memory while growing hinting buffers")]
    OutOfMemory(#[from] TryReserveError),
    /// An axis produced more segments than the hinter supports.
    #[error("axis {dim} produced {count} segments (limit is 1000)")]
    TooManySegments { dim: Dimension, count: usize },
    /// Contour end points are out of order or out of range.
    #[error("contour end point {end} is invalid for an outline with {num_points} points")]
    InvalidContour { end: usize, num_points: usize },
}
