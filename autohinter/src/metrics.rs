//! Style metrics: standard widths, blue zones and scaling parameters.
//!
//! Unscaled metrics are computed once per style and face. Scaled metrics
//! depend on the size and are derived from the unscaled ones whenever the
//! scale changes.

use crate::{
    axis::{Axis, Dimension},
    config::{HintingConfig, StemWidthMode, StemWidthModes},
    fixed::derived_constant,
    style::WritingSystem,
};
use font_types::Fixed;
use std::sync::{Arc, PoisonError, RwLock};

/// Maximum number of standard widths per axis.
pub const MAX_WIDTHS: usize = 16;

/// Maximum number of blue zones per style, not counting the two zones
/// derived from the Windows metrics.
pub const MAX_BLUES: usize = 24;

/// Alignment zone in font units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlueZone {
    /// Flat position, e.g. the baseline or x-height.
    pub reference: i32,
    /// Position of round overshooting features.
    pub overshoot: i32,
    pub flags: u32,
}

/// Blue zone flags.
impl BlueZone {
    /// Zone height is at most 3/4 pixel at the current size.
    pub const ACTIVE: u32 = 1 << 0;
    /// Zone is at the top of a feature.
    pub const TOP: u32 = 1 << 1;
    /// Zone is at the top of a subscript or superscript feature.
    pub const SUB_TOP: u32 = 1 << 2;
    /// Zone matches edges of either direction.
    pub const NEUTRAL: u32 = 1 << 3;
    /// Zone drives the vertical scale correction (usually x-height).
    pub const ADJUSTMENT: u32 = 1 << 4;
}

impl BlueZone {
    pub fn new(reference: i32, overshoot: i32, flags: u32) -> Self {
        Self {
            reference,
            overshoot,
            flags,
        }
    }

    pub fn is_top(&self) -> bool {
        self.flags & Self::TOP != 0
    }
}

/// Unscaled metrics for a single axis.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct AxisMetrics {
    pub dim: Dimension,
    /// Standard widths in ascending order.
    pub widths: Vec<i32>,
    /// Default stem thickness.
    pub standard_width: i32,
    /// Used for creating edges.
    pub edge_distance_threshold: i32,
    /// Blue zones; only used for the vertical axis.
    pub blues: Vec<BlueZone>,
}

impl AxisMetrics {
    /// Creates axis metrics from measured stem widths.
    ///
    /// Widths are sorted and nearly identical values are merged. If no
    /// width was measured, a single fallback width is used.
    pub fn new(
        dim: Dimension,
        mut widths: Vec<i32>,
        blues: Vec<BlueZone>,
        units_per_em: i32,
        fallback_width: Option<i32>,
    ) -> Self {
        widths.truncate(MAX_WIDTHS);
        // The value 100 is heuristic
        sort_and_quantize_widths(&mut widths, units_per_em / 100);
        if widths.is_empty() {
            // Value 50 is heuristic
            let stdw = fallback_width
                .filter(|width| *width != 0)
                .unwrap_or_else(|| derived_constant(units_per_em, 50));
            widths.push(stdw);
        }
        let standard_width = widths[0];
        Self {
            dim,
            widths,
            standard_width,
            // Let's try 20% of the smallest width
            edge_distance_threshold: standard_width / 5,
            blues,
        }
    }

    pub fn max_width(&self) -> Option<i32> {
        self.widths.last().copied()
    }
}

/// Unscaled metrics for a single style.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct StyleMetrics {
    pub units_per_em: i32,
    pub writing_system: WritingSystem,
    /// The style's script is hinted from top to bottom.
    pub top_to_bottom: bool,
    /// Per-dimension unscaled metrics.
    pub axes: [AxisMetrics; 2],
    /// Windows ascender, positive.
    pub win_ascent: i32,
    /// Windows descender, positive.
    pub win_descent: i32,
}

impl StyleMetrics {
    /// Creates Latin style metrics from measured stem widths (horizontal,
    /// then vertical) and the style's blue zones.
    pub fn new(
        units_per_em: i32,
        widths: [Vec<i32>; 2],
        mut blues: Vec<BlueZone>,
        config: &HintingConfig,
    ) -> Self {
        if blues.len() > MAX_BLUES {
            log::warn!(
                "style has {} blue zones, keeping the first {MAX_BLUES}",
                blues.len()
            );
            blues.truncate(MAX_BLUES);
        }
        let [h_widths, v_widths] = widths;
        Self {
            units_per_em,
            writing_system: WritingSystem::Latin,
            top_to_bottom: false,
            axes: [
                AxisMetrics::new(Axis::HORIZONTAL, h_widths, Vec::new(), units_per_em, None),
                AxisMetrics::new(
                    Axis::VERTICAL,
                    v_widths,
                    blues,
                    units_per_em,
                    config.fallback_stem_width,
                ),
            ],
            win_ascent: 0,
            win_descent: 0,
        }
    }

    /// Metrics for styles that are scaled but not hinted.
    pub fn dummy(units_per_em: i32) -> Self {
        Self {
            units_per_em,
            writing_system: WritingSystem::Dummy,
            ..Default::default()
        }
    }

    pub fn with_top_to_bottom(mut self, top_to_bottom: bool) -> Self {
        self.top_to_bottom = top_to_bottom;
        self
    }

    /// Sets the Windows ascender and descender used for the synthetic
    /// blue zones.
    pub fn with_windows_metrics(mut self, win_ascent: i32, win_descent: i32) -> Self {
        self.win_ascent = win_ascent;
        self.win_descent = win_descent;
        self
    }
}

/// A width or position in font units together with its scaled and
/// grid-fitted values.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ScaledWidth {
    /// Value in font units.
    pub unscaled: i32,
    /// Width after applying scale.
    pub scaled: i32,
    /// Grid-fitted width.
    pub fitted: i32,
}

#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ScaledBlue {
    pub reference: ScaledWidth,
    pub overshoot: ScaledWidth,
    pub flags: u32,
}

impl ScaledBlue {
    pub fn is_active(&self) -> bool {
        self.flags & BlueZone::ACTIVE != 0
    }
}

/// Scaled metrics for a single axis.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct ScaledAxisMetrics {
    pub dim: Dimension,
    /// Font unit to 26.6 scale in the axis direction.
    pub scale: i32,
    /// 1/64 pixel delta in the axis direction.
    pub delta: i32,
    pub widths: Vec<ScaledWidth>,
    /// Unscaled standard width.
    pub standard_width: i32,
    /// Unscaled threshold for merging segments into edges.
    pub edge_distance_threshold: i32,
    /// Is standard width very light?
    pub is_extra_light: bool,
    /// Style blue zones followed by the synthetic Windows zones, if
    /// enabled.
    pub blues: Vec<ScaledBlue>,
    /// Number of blue zones that come from the style.
    pub blue_count: usize,
}

/// Scaled metrics for a single style.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct ScaledStyleMetrics {
    /// Multidimensional scaling factors and deltas.
    pub scale: Scale,
    /// Per-dimension scaled metrics.
    pub axes: [ScaledAxisMetrics; 2],
}

/// Captures scaling parameters which may be modified during metrics
/// computation.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Scale {
    /// Font unit to 26.6 scale in the X direction.
    pub x_scale: i32,
    /// Font unit to 26.6 scale in the Y direction.
    pub y_scale: i32,
    /// In 1/64 device pixels.
    pub x_delta: i32,
    /// In 1/64 device pixels.
    pub y_delta: i32,
    /// Font size in pixels per em.
    pub size: f32,
    /// From the source font.
    pub units_per_em: i32,
    /// Flags that determine hinting functionality.
    pub flags: u32,
    /// Stem width function for each axis.
    pub stem_width_modes: StemWidthModes,
}

impl Scale {
    /// Create initial scaling parameters from a size and hinting
    /// configuration.
    pub fn new(size: f32, units_per_em: i32, config: &HintingConfig) -> Self {
        let scale = if units_per_em > 0 {
            (Fixed::from_bits((size * 64.0) as i32) / Fixed::from_bits(units_per_em)).to_bits()
        } else {
            0
        };
        let modes = config.stem_width_modes;
        let mut flags = Self::STEM_ADJUST;
        if modes.horizontal == StemWidthMode::Strong {
            flags |= Self::HORIZONTAL_SNAP;
        }
        if modes.vertical == StemWidthMode::Strong {
            flags |= Self::VERTICAL_SNAP;
        }
        if config.mono {
            flags |= Self::MONO;
        }
        if !config.hint_horizontal {
            flags |= Self::NO_HORIZONTAL;
        }
        if !config.hint_vertical {
            flags |= Self::NO_VERTICAL;
        }
        Self {
            x_scale: scale,
            y_scale: scale,
            x_delta: 0,
            y_delta: 0,
            size,
            units_per_em,
            flags,
            stem_width_modes: modes,
        }
    }

    /// Sets the sub-pixel offsets applied after scaling.
    pub fn with_delta(mut self, x_delta: i32, y_delta: i32) -> Self {
        self.x_delta = x_delta;
        self.y_delta = y_delta;
        self
    }

    /// Returns the size in whole pixels per em.
    pub fn ppem(&self) -> u16 {
        (self.size + 0.5).clamp(0.0, u16::MAX as f32) as u16
    }

    pub fn stem_width_mode(&self, dim: Dimension) -> StemWidthMode {
        if dim == Axis::HORIZONTAL {
            self.stem_width_modes.horizontal
        } else {
            self.stem_width_modes.vertical
        }
    }
}

/// Scaler flags that determine hinting settings.
impl Scale {
    /// Stem width snapping.
    pub const HORIZONTAL_SNAP: u32 = 1 << 0;
    /// Stem height snapping.
    pub const VERTICAL_SNAP: u32 = 1 << 1;
    /// Stem width/height adjustment.
    pub const STEM_ADJUST: u32 = 1 << 2;
    /// Monochrome rendering.
    pub const MONO: u32 = 1 << 3;
    /// Disable horizontal hinting.
    pub const NO_HORIZONTAL: u32 = 1 << 4;
    /// Disable vertical hinting.
    pub const NO_VERTICAL: u32 = 1 << 5;
    /// Disable advance hinting.
    pub const NO_ADVANCE: u32 = 1 << 6;
}

/// Sorts the widths and replaces clusters of nearly identical values
/// (within `threshold`) with a single one.
///
/// The averaging follows FreeType's pass exactly, including its divisor,
/// so the result is not guaranteed to be in ascending order. The first
/// entry is always the smallest input and serves as the standard width.
pub fn sort_and_quantize_widths(widths: &mut Vec<i32>, threshold: i32) {
    if widths.len() <= 1 {
        return;
    }
    widths.sort_unstable();
    let table = widths.as_mut_slice();
    let mut cur_ix = 0;
    let mut cur_val = table[cur_ix];
    let last_ix = table.len() - 1;
    let mut ix = 1;
    // Compute and use mean values for clusters not larger than
    // `threshold`.
    while ix < table.len() {
        if (table[ix] - cur_val) > threshold || ix == last_ix {
            let mut sum = 0;
            // Fix loop for end of array?
            if (table[ix] - cur_val <= threshold) && ix == last_ix {
                ix += 1;
            }
            for val in &mut table[cur_ix..ix] {
                sum += *val;
                *val = 0;
            }
            table[cur_ix] = sum / ix as i32;
            if ix < last_ix {
                cur_ix = ix + 1;
                cur_val = table[cur_ix];
            }
        }
        ix += 1;
    }
    cur_ix = 1;
    // Compress array to remove zero values
    for ix in 1..table.len() {
        if table[ix] != 0 {
            table[cur_ix] = table[ix];
            cur_ix += 1;
        }
    }
    widths.truncate(cur_ix);
}

type ScaledEntry = Option<(Scale, Arc<ScaledStyleMetrics>)>;

/// Per-face registry of style metrics.
///
/// Unscaled metrics are computed lazily on first use of a style and kept
/// for the lifetime of the registry. Scaled metrics are cached per style
/// and only recomputed when the requested scale changes.
///
/// Once every style needed has been initialized, the registry can be
/// shared between threads hinting different glyphs.
#[derive(Debug)]
pub struct MetricsRegistry {
    config: HintingConfig,
    styles: RwLock<Vec<Option<Arc<StyleMetrics>>>>,
    scaled: RwLock<Vec<ScaledEntry>>,
}

impl MetricsRegistry {
    pub fn new(style_count: usize, config: HintingConfig) -> Self {
        Self {
            config,
            styles: RwLock::new(vec![None; style_count]),
            scaled: RwLock::new(vec![None; style_count]),
        }
    }

    pub fn config(&self) -> &HintingConfig {
        &self.config
    }

    /// Returns the unscaled metrics for the given style, computing them
    /// with `init` on first use.
    ///
    /// Returns `None` if the style index is out of range.
    pub fn get_or_init(
        &self,
        style_ix: usize,
        init: impl FnOnce(&HintingConfig) -> StyleMetrics,
    ) -> Option<Arc<StyleMetrics>> {
        if let Some(metrics) = self.get(style_ix) {
            return Some(metrics);
        }
        let mut styles = self.styles.write().unwrap_or_else(PoisonError::into_inner);
        let entry = styles.get_mut(style_ix)?;
        // Someone else may have won the race while we waited for the
        // write lock.
        if let Some(metrics) = entry {
            return Some(metrics.clone());
        }
        log::debug!("computing metrics for style {style_ix}");
        let metrics = Arc::new(init(&self.config));
        *entry = Some(metrics.clone());
        Some(metrics)
    }

    /// Returns the unscaled metrics for the given style if they have
    /// already been computed.
    pub fn get(&self, style_ix: usize) -> Option<Arc<StyleMetrics>> {
        let styles = self.styles.read().unwrap_or_else(PoisonError::into_inner);
        styles.get(style_ix)?.clone()
    }

    /// Returns scaled metrics for the given style, reusing the cached
    /// value when the scale matches the previous request.
    ///
    /// Returns `None` if the style has not been initialized.
    pub fn scaled(&self, style_ix: usize, scale: &Scale) -> Option<Arc<ScaledStyleMetrics>> {
        {
            let scaled = self.scaled.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((cached_scale, metrics)) = scaled.get(style_ix)? {
                if cached_scale == scale {
                    return Some(metrics.clone());
                }
            }
        }
        let metrics = self.get(style_ix)?;
        let scaled_metrics = Arc::new(crate::latin::scale_style_metrics(
            &metrics,
            *scale,
            &self.config,
        ));
        let mut scaled = self.scaled.write().unwrap_or_else(PoisonError::into_inner);
        *scaled.get_mut(style_ix)? = Some((*scale, scaled_metrics.clone()));
        Some(scaled_metrics)
    }

    #[cfg(test)]
    fn presence(&self) -> Vec<bool> {
        self.styles
            .read()
            .unwrap()
            .iter()
            .map(|entry| entry.is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_widths() {
        // We use 10 and 20 as thresholds because the computation used
        // is units_per_em / 100
        assert_eq!(sort_widths_helper(&[1], 10), &[1]);
        assert_eq!(sort_widths_helper(&[1], 20), &[1]);
        // The cluster mean divides by the end index, which can leave the
        // table out of order
        assert_eq!(sort_widths_helper(&[60, 20, 40, 35], 10), &[20, 35, 13, 60]);
        assert_eq!(sort_widths_helper(&[60, 20, 40, 35], 20), &[31, 60]);
    }

    fn sort_widths_helper(widths: &[i32], threshold: i32) -> Vec<i32> {
        let mut widths = widths.to_vec();
        sort_and_quantize_widths(&mut widths, threshold);
        widths
    }

    #[test]
    fn fallback_widths() {
        let config = HintingConfig {
            fallback_stem_width: Some(80),
            ..Default::default()
        };
        let metrics = StyleMetrics::new(1000, [vec![], vec![]], vec![], &config);
        let [h, v] = &metrics.axes;
        // Horizontal axis always uses the derived default
        assert_eq!(h.widths, [24]);
        assert_eq!((h.standard_width, h.edge_distance_threshold), (24, 4));
        assert_eq!(v.widths, [80]);
        assert_eq!((v.standard_width, v.edge_distance_threshold), (80, 16));
    }

    #[test]
    fn measured_widths() {
        let metrics = StyleMetrics::new(
            2048,
            [vec![180, 176, 240], vec![150]],
            vec![],
            &HintingConfig::default(),
        );
        // 176 and 180 are within 20 units and merge
        assert_eq!(metrics.axes[0].widths.len(), 2);
        assert_eq!(metrics.axes[0].max_width(), Some(240));
        assert_eq!(metrics.axes[1].standard_width, 150);
        assert_eq!(metrics.axes[1].edge_distance_threshold, 30);
    }

    #[test]
    fn too_many_blues() {
        let blues = vec![BlueZone::new(0, -10, 0); MAX_BLUES + 3];
        let metrics = StyleMetrics::new(1000, Default::default(), blues, &Default::default());
        assert_eq!(metrics.axes[Axis::VERTICAL].blues.len(), MAX_BLUES);
    }

    #[test]
    fn scale_flags() {
        let config = HintingConfig {
            stem_width_modes: StemWidthModes {
                horizontal: StemWidthMode::Natural,
                vertical: StemWidthMode::Strong,
            },
            hint_horizontal: false,
            ..Default::default()
        };
        let scale = Scale::new(16.0, 1000, &config);
        assert_eq!(
            scale.flags,
            Scale::STEM_ADJUST | Scale::VERTICAL_SNAP | Scale::NO_HORIZONTAL
        );
        // 16 * 64 / 1000 in 16.16
        assert!((scale.y_scale - 67109).abs() <= 1);
        assert_eq!(scale.ppem(), 16);
        assert_eq!(scale.stem_width_mode(Axis::HORIZONTAL), StemWidthMode::Natural);
    }

    #[test]
    fn lazy_registry() {
        let registry = MetricsRegistry::new(3, HintingConfig::default());
        assert_eq!(registry.presence(), [false; 3]);
        let metrics = registry
            .get_or_init(1, |config| {
                StyleMetrics::new(1000, [vec![90], vec![80]], vec![], config)
            })
            .unwrap();
        assert_eq!(metrics.axes[0].standard_width, 90);
        assert_eq!(registry.presence(), [false, true, false]);
        // Already initialized: the closure is not called again
        let again = registry
            .get_or_init(1, |_| panic!("metrics should be cached"))
            .unwrap();
        assert!(Arc::ptr_eq(&metrics, &again));
        assert!(registry.get_or_init(5, |_| StyleMetrics::dummy(1000)).is_none());
    }

    #[test]
    fn scaled_metrics_are_cached_per_scale() {
        let registry = MetricsRegistry::new(1, HintingConfig::default());
        let scale = Scale::new(16.0, 1000, registry.config());
        // Not initialized yet
        assert!(registry.scaled(0, &scale).is_none());
        registry.get_or_init(0, |config| {
            StyleMetrics::new(1000, [vec![90], vec![80]], vec![], config)
        });
        let first = registry.scaled(0, &scale).unwrap();
        let second = registry.scaled(0, &scale).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // A new delta invalidates the cached value
        let shifted = registry.scaled(0, &scale.with_delta(0, 16)).unwrap();
        assert!(!Arc::ptr_eq(&first, &shifted));
        assert_eq!(shifted.axes[Axis::VERTICAL].delta, 16);
    }
}
