//! Latin writing system.

mod edges;
mod hint;
mod metrics;
pub(crate) mod segments;
mod stem;
mod widths;

pub(crate) use edges::compute_blue_edges;
pub(crate) use hint::hint_edges;
pub(crate) use metrics::scale_style_metrics;
pub use stem::QuantizeCache;
pub(crate) use stem::StemContext;
pub use widths::compute_widths;

use crate::{
    axis::Axis,
    error::HintError,
    metrics::{AxisMetrics, ScaledAxisMetrics},
    outline::Outline,
};

/// Computes segments, links them into stems and serifs and then groups
/// them into edges for a single axis.
///
/// Blue zones are matched separately with [`compute_blue_edges`] since
/// they only apply to the vertical axis of base glyphs.
pub(crate) fn detect_features(
    outline: &mut Outline,
    axis: &mut Axis,
    metrics: &AxisMetrics,
    scaled_metrics: &ScaledAxisMetrics,
    top_to_bottom_hinting: bool,
    y_scale: i32,
) -> Result<(), HintError> {
    segments::compute_segments(outline, axis)?;
    segments::link_segments(outline, axis, metrics.max_width());
    edges::compute_edges(axis, scaled_metrics, top_to_bottom_hinting, y_scale)
}
