//! Stem width computation.
//!
//! Each stem (pair of linked edges) gets a fitted width before it is
//! positioned. The function used depends on the [`StemWidthMode`]
//! configured for the axis.

use crate::{
    axis::{Axis, Dimension, Edge},
    config::StemWidthMode,
    fixed::{pix_floor, pix_round},
    metrics::{Scale, ScaledAxisMetrics, ScaledWidth},
};

/// Widths closer than this to a previously computed width reuse its
/// result.
const QUANTIZE_THRESHOLD: i32 = 4;

/// Per glyph cache of computed stem widths for one axis.
///
/// Rounding noise in the outline can produce stems that differ by a
/// unit or two. These all resolve to the first width computed for the
/// group so equivalent stems get identical fitted widths.
#[derive(Clone, Default, Debug)]
pub struct QuantizeCache {
    /// Pairs of (input distance, fitted distance), both unsigned.
    entries: Vec<(i32, i32)>,
}

impl QuantizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, dist: i32) -> Option<i32> {
        self.entries
            .iter()
            .find(|(input, _)| (dist - input).abs() < QUANTIZE_THRESHOLD)
            .map(|(_, output)| *output)
    }

    fn insert(&mut self, dist: i32, fitted: i32) {
        self.entries.push((dist, fitted));
    }
}

/// Everything the stem width functions need besides the width itself.
#[derive(Copy, Clone, Debug)]
pub(crate) struct StemContext<'a> {
    pub dim: Dimension,
    pub metrics: &'a ScaledAxisMetrics,
    pub scale: &'a Scale,
    /// Glyph is a mark or other non-base glyph; the standard width is
    /// not used as an attractor.
    pub ignore_standard_width: bool,
}

/// Snaps a scaled width to the closest standard width if it lies within
/// 48 units of that width's rounded value.
pub(crate) fn snap_width(widths: &[ScaledWidth], width: i32) -> i32 {
    let (_, ref_width) =
        widths
            .iter()
            .fold((64 + 32 + 2, width), |(best_dist, ref_width), candidate| {
                let dist = (width - candidate.scaled).abs();
                if dist < best_dist {
                    (dist, candidate.scaled)
                } else {
                    (best_dist, ref_width)
                }
            });
    let scaled = pix_round(ref_width);
    if width >= ref_width {
        if width < scaled + 48 {
            ref_width
        } else {
            width
        }
    } else if width > scaled - 48 {
        ref_width
    } else {
        width
    }
}

/// Computes the fitted width of a stem.
///
/// `width` is signed; the result has the same sign. `base_delta` is the
/// distance the base edge has already moved and is only used by the
/// quantized function for wide stems.
pub(crate) fn stem_width(
    cx: &StemContext,
    cache: &mut QuantizeCache,
    width: i32,
    base_delta: i32,
    base_flags: u8,
    stem_flags: u8,
) -> i32 {
    let scale = cx.scale;
    if scale.flags & Scale::STEM_ADJUST == 0 || cx.metrics.is_extra_light {
        return width;
    }
    let mode = scale.stem_width_mode(cx.dim);
    if mode == StemWidthMode::Natural {
        return width;
    }
    // Only adjusted widths enter the cache. Identity results are exact
    // already, and caching them would pull later stems onto an unadjusted
    // neighbour.
    let sign = if width < 0 { -1 } else { 1 };
    let dist = width.abs();
    if let Some(cached) = cache.get(dist) {
        return cached * sign;
    }
    let fitted = match mode {
        StemWidthMode::Strong => strong_width(cx, dist),
        _ => {
            let Some(fitted) = quantized_width(cx, width, base_delta, base_flags, stem_flags)
            else {
                return width;
            };
            fitted
        }
    };
    cache.insert(dist, fitted);
    fitted * sign
}

/// Smooth hinting: pulls widths towards the standard width and rounds
/// with a non-linear table.
///
/// Returns `None` if the width should be left untouched.
fn quantized_width(
    cx: &StemContext,
    width: i32,
    base_delta: i32,
    base_flags: u8,
    stem_flags: u8,
) -> Option<i32> {
    let is_vertical = cx.dim == Axis::VERTICAL;
    let mut dist = width.abs();
    let std_width = if cx.ignore_standard_width {
        dist
    } else {
        cx.metrics.widths.first().map(|width| width.scaled)?
    };
    // Don't touch widths of serifs
    if (stem_flags & Edge::SERIF != 0 && is_vertical && dist < 3 * 64) || std_width < 40 {
        return None;
    }
    if base_flags & Edge::ROUND != 0 {
        if dist < 80 {
            dist = 64;
        }
    } else if dist < 56 {
        dist = 56;
    }
    if (dist - std_width).abs() < 40 {
        return Some(std_width.max(48));
    }
    if dist < 3 * 64 {
        let delta = dist & 63;
        dist = pix_floor(dist);
        if delta < 10 {
            dist += delta;
        } else if delta < 32 {
            dist += 10;
        } else if delta < 54 {
            dist += 54;
        } else {
            dist += delta;
        }
        Some(dist)
    } else {
        let mut new_base_delta = 0;
        if (width > 0 && base_delta > 0) || (width < 0 && base_delta < 0) {
            let ppem = cx.scale.ppem() as i32;
            if ppem < 10 {
                new_base_delta = base_delta;
            } else if ppem < 30 {
                new_base_delta = (base_delta * (30 - ppem)) / 20;
            }
        }
        Some(pix_round(dist - new_base_delta.abs()))
    }
}

/// Strong hinting: snap to a standard width, then to whole pixels.
///
/// Stem heights always become whole pixels. Horizontal stems do too
/// in monochrome mode; otherwise thin stems are strengthened and stems
/// between one and two pixels are rounded only when that moves them by
/// less than a quarter pixel.
fn strong_width(cx: &StemContext, org_dist: i32) -> i32 {
    let dist = if cx.ignore_standard_width {
        org_dist
    } else {
        snap_width(&cx.metrics.widths, org_dist)
    };
    if cx.dim == Axis::VERTICAL {
        if dist >= 64 {
            (dist + 16) & !63
        } else {
            64
        }
    } else if cx.scale.flags & Scale::MONO != 0 {
        if dist < 64 {
            64
        } else {
            pix_round(dist)
        }
    } else if dist < 48 {
        (dist + 64) >> 1
    } else if dist < 128 {
        let rounded = (dist + 22) & !63;
        if (rounded - org_dist).abs() < 16 {
            rounded
        } else if org_dist < 48 {
            (org_dist + 64) >> 1
        } else {
            org_dist
        }
    } else {
        pix_round(dist)
    }
}
