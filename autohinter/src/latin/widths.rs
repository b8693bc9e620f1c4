//! Latin standard stem width computation.

use super::segments::{compute_segments, link_segments};
use crate::{
    axis::Axis,
    error::HintError,
    metrics::MAX_WIDTHS,
    outline::{Outline, UnscaledOutline},
};

/// Measures the stem widths of a reference glyph, usually the style's
/// standard character ("o" for Latin).
///
/// Returns the raw widths for the horizontal and vertical dimensions in
/// font units. They are sorted, merged and given a fallback by
/// [`StyleMetrics::new`](crate::metrics::StyleMetrics::new).
pub fn compute_widths(
    reference: &UnscaledOutline,
    units_per_em: i32,
) -> Result<[Vec<i32>; 2], HintError> {
    let mut result: [Vec<i32>; 2] = Default::default();
    let mut outline = Outline::default();
    outline.fill(reference, units_per_em)?;
    if outline.is_empty() {
        log::debug!("reference glyph is empty; using default widths");
        return Ok(result);
    }
    let mut axis = Axis::default();
    for (dim, widths) in result.iter_mut().enumerate() {
        axis.reset(dim, outline.orientation);
        if let Err(e) = compute_segments(&mut outline, &mut axis) {
            log::warn!("no widths measured for axis {dim}: {e}");
            continue;
        }
        link_segments(&outline, &mut axis, None);
        let segments = axis.segments.as_slice();
        for (segment_ix, segment) in segments.iter().enumerate() {
            let Some(link_ix) = segment.link_ix.map(usize::from) else {
                continue;
            };
            let link = &segments[link_ix];
            // Only count each mutual link once
            if link_ix > segment_ix && link.link_ix.map(usize::from) == Some(segment_ix) {
                if widths.len() == MAX_WIDTHS {
                    break;
                }
                widths.push((segment.pos - link.pos).abs());
            }
        }
        log::debug!("measured widths for axis {dim}: {widths:?}");
    }
    Ok(result)
}
