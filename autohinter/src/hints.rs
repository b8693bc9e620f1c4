//! Per-glyph hinting state and driver.
//!
//! [`GlyphHints`] owns the point, segment and edge buffers for one glyph
//! at a time and runs the complete pipeline: feature detection on both
//! axes, blue zone matching, edge alignment and finally point alignment.
//! Buffers are reused from glyph to glyph.

use crate::{
    axis::{Axis, Dimension},
    dump::{EdgeTable, SegmentTable},
    error::HintError,
    hint::align_points,
    latin::{self, QuantizeCache, StemContext},
    metrics::{Scale, ScaledStyleMetrics, StyleMetrics},
    outline::{Outline, Point, UnscaledOutline},
    overrides::SegmentOverrides,
    recorder::HintRecorder,
    style::{GlyphStyle, WritingSystem},
};

/// Outcome of [`GlyphHints::apply`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HintStatus {
    /// At least one axis was grid-fitted.
    Hinted,
    /// Fitted coordinates are the scaled coordinates.
    Unhinted,
}

/// Hinting state for a single glyph.
#[derive(Clone, Default, Debug)]
pub struct GlyphHints {
    outline: Outline,
    axes: [Axis; 2],
    caches: [QuantizeCache; 2],
}

impl GlyphHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a new glyph outline, scales it with the given metrics and
    /// applies the segment overrides.
    ///
    /// After this call, [`points`](Self::points) returns the scaled but
    /// unhinted outline.
    pub fn reload(
        &mut self,
        outline: &UnscaledOutline,
        scaled_metrics: &ScaledStyleMetrics,
        overrides: &SegmentOverrides,
    ) -> Result<(), HintError> {
        for cache in &mut self.caches {
            cache.reset();
        }
        for axis in &mut self.axes {
            axis.segments.clear();
            axis.edges.clear();
        }
        self.outline
            .fill(outline, scaled_metrics.scale.units_per_em)?;
        self.outline.apply_overrides(overrides);
        self.rescale(&scaled_metrics.scale);
        Ok(())
    }

    /// Grid-fits the loaded glyph, reporting every alignment decision to
    /// `recorder`.
    ///
    /// Running this more than once for the same glyph and metrics
    /// produces the same result.
    pub fn apply(
        &mut self,
        metrics: &StyleMetrics,
        scaled_metrics: &ScaledStyleMetrics,
        style: GlyphStyle,
        recorder: &mut impl HintRecorder,
    ) -> Result<HintStatus, HintError> {
        let scale = &scaled_metrics.scale;
        self.rescale(scale);
        if self.outline.is_empty() || metrics.writing_system == WritingSystem::Dummy {
            return Ok(HintStatus::Unhinted);
        }
        let is_non_base = style.is_non_base();
        let dims = [Axis::HORIZONTAL, Axis::VERTICAL].map(|dim| is_hinted_dim(scale, dim));
        // Analyze the glyph outline
        for dim in [Axis::HORIZONTAL, Axis::VERTICAL] {
            let axis = &mut self.axes[dim];
            axis.reset(dim, self.outline.orientation);
            self.caches[dim].reset();
            if !dims[dim] {
                continue;
            }
            let result = latin::detect_features(
                &mut self.outline,
                axis,
                &metrics.axes[dim],
                &scaled_metrics.axes[dim],
                metrics.top_to_bottom,
                scale.y_scale,
            );
            match result {
                Ok(()) => {}
                Err(e @ HintError::TooManySegments { .. }) => {
                    log::warn!("glyph left unhinted: {e}");
                    for axis in &mut self.axes {
                        axis.segments.clear();
                        axis.edges.clear();
                    }
                    return Ok(HintStatus::Unhinted);
                }
                Err(e) => return Err(e),
            }
            if dim == Axis::VERTICAL && !is_non_base {
                latin::compute_blue_edges(
                    axis,
                    &scaled_metrics.axes[dim],
                    metrics.units_per_em,
                );
            }
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("{}", SegmentTable(axis));
                log::trace!("{}", EdgeTable(axis));
            }
        }
        // Grid-fit the outline
        for dim in [Axis::HORIZONTAL, Axis::VERTICAL] {
            if !dims[dim] {
                continue;
            }
            let axis = &mut self.axes[dim];
            let cx = StemContext {
                dim,
                metrics: &scaled_metrics.axes[dim],
                scale,
                ignore_standard_width: is_non_base,
            };
            latin::hint_edges(
                axis,
                &cx,
                metrics.top_to_bottom,
                is_non_base,
                &mut self.caches[dim],
                recorder,
            );
            if !align_points(&mut self.outline, axis, recorder) {
                log::warn!("point alignment on axis {dim} skipped points outside the outline");
            }
        }
        Ok(if dims.contains(&true) {
            HintStatus::Hinted
        } else {
            HintStatus::Unhinted
        })
    }

    /// Returns the points of the current glyph.
    ///
    /// The `x` and `y` fields hold the fitted coordinates in 26.6 format.
    pub fn points(&self) -> &[Point] {
        &self.outline.points
    }

    /// Returns an iterator over the fitted coordinates of the current
    /// glyph.
    pub fn fitted_coords(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.outline.points.iter().map(|point| (point.x, point.y))
    }

    /// Returns the segments and edges computed for the given dimension.
    pub fn axis(&self, dim: Dimension) -> Option<&Axis> {
        self.axes.get(dim)
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    fn rescale(&mut self, scale: &Scale) {
        self.outline
            .scale(scale.x_scale, scale.x_delta, scale.y_scale, scale.y_delta);
    }
}

fn is_hinted_dim(scale: &Scale, dim: Dimension) -> bool {
    let flag = if dim == Axis::HORIZONTAL {
        Scale::NO_HORIZONTAL
    } else {
        Scale::NO_VERTICAL
    };
    scale.flags & flag == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{HintingConfig, StemWidthMode, StemWidthModes},
        metrics::{BlueZone, MetricsRegistry},
        outline::UnscaledPoint,
        overrides::SegmentOverride,
        recorder::{Action, ActionLog},
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// A 60x500 rectangle at x = 100, wound counter-clockwise.
    fn rectangle() -> UnscaledOutline {
        let mut outline = UnscaledOutline::new();
        outline.push_contour([
            UnscaledPoint::on_curve(100, 0),
            UnscaledPoint::on_curve(160, 0),
            UnscaledPoint::on_curve(160, 500),
            UnscaledPoint::on_curve(100, 500),
        ]);
        outline
    }

    fn strong_config() -> HintingConfig {
        HintingConfig {
            stem_width_modes: StemWidthModes {
                horizontal: StemWidthMode::Strong,
                vertical: StemWidthMode::Strong,
            },
            ..Default::default()
        }
    }

    /// Builds metrics through the registry as a client would, at 16 ppem
    /// for a 1000 unit em.
    fn metrics(
        config: HintingConfig,
        blues: Vec<BlueZone>,
    ) -> (Arc<StyleMetrics>, Arc<ScaledStyleMetrics>) {
        let registry = MetricsRegistry::new(1, config);
        let metrics = registry
            .get_or_init(0, |config| {
                StyleMetrics::new(1000, [vec![60], vec![500]], blues, config)
            })
            .unwrap();
        let scale = Scale::new(16.0, 1000, registry.config());
        let scaled = registry.scaled(0, &scale).unwrap();
        (metrics, scaled)
    }

    fn hint(
        source: &UnscaledOutline,
        config: HintingConfig,
        blues: Vec<BlueZone>,
        style: GlyphStyle,
    ) -> (HintStatus, Vec<(i32, i32)>, ActionLog) {
        let _ = env_logger::builder().is_test(true).try_init();
        let (metrics, scaled) = metrics(config, blues);
        let mut hints = GlyphHints::new();
        hints
            .reload(source, &scaled, &SegmentOverrides::default())
            .unwrap();
        let mut log = ActionLog::new();
        let status = hints.apply(&metrics, &scaled, style, &mut log).unwrap();
        (status, hints.fitted_coords().collect(), log)
    }

    fn stem_actions() -> [Action; 3] {
        [
            Action::Anchor {
                edge_ix: 0,
                link_ix: 1,
            },
            Action::Link {
                base_ix: 0,
                stem_ix: 1,
            },
            Action::Adjust {
                edge_ix: 1,
                link_ix: 0,
                bound_ix: Some(0),
            },
        ]
    }

    #[test]
    fn rectangle_lands_on_pixels() {
        let (status, coords, log) = hint(
            &rectangle(),
            strong_config(),
            vec![],
            GlyphStyle::default(),
        );
        assert_eq!(status, HintStatus::Hinted);
        // The 61.44 pixel stem centered at 133 becomes a full pixel and
        // the 8 pixel height is kept
        assert_eq!(coords, [(128, 0), (192, 0), (192, 512), (128, 512)]);
        assert_eq!(log.horizontal().copied().collect::<Vec<_>>(), stem_actions());
        assert_eq!(log.vertical().copied().collect::<Vec<_>>(), stem_actions());
    }

    #[test]
    fn blue_zones_anchor_vertical_edges() {
        let blues = vec![
            BlueZone::new(0, -10, 0),
            BlueZone::new(500, 510, BlueZone::TOP),
        ];
        let (status, coords, log) =
            hint(&rectangle(), strong_config(), blues, GlyphStyle::default());
        assert_eq!(status, HintStatus::Hinted);
        assert_eq!(coords, [(128, 0), (192, 0), (192, 512), (128, 512)]);
        assert_eq!(
            log.vertical().copied().collect::<Vec<_>>(),
            [
                Action::BlueAnchor {
                    edge_ix: 0,
                    anchor_ix: 0
                },
                Action::Blue { edge_ix: 1 },
            ]
        );
    }

    #[test]
    fn non_base_glyphs_skip_blue_zones() {
        let blues = vec![
            BlueZone::new(0, -10, 0),
            BlueZone::new(500, 510, BlueZone::TOP),
        ];
        let (_, coords, log) = hint(
            &rectangle(),
            strong_config(),
            blues,
            GlyphStyle::non_base(0),
        );
        assert_eq!(coords, [(128, 0), (192, 0), (192, 512), (128, 512)]);
        assert_eq!(log.vertical().copied().collect::<Vec<_>>(), stem_actions());
    }

    #[test]
    fn disabled_axis_keeps_scaled_coords() {
        let config = HintingConfig {
            hint_horizontal: false,
            ..strong_config()
        };
        let (status, coords, log) = hint(&rectangle(), config, vec![], GlyphStyle::default());
        assert_eq!(status, HintStatus::Hinted);
        // 100 and 160 scaled by 1.024
        assert_eq!(coords, [(102, 0), (164, 0), (164, 512), (102, 512)]);
        assert_eq!(log.horizontal().count(), 0);
    }

    #[test]
    fn nothing_to_hint() {
        let config = HintingConfig {
            hint_horizontal: false,
            hint_vertical: false,
            ..Default::default()
        };
        let (status, coords, log) = hint(&rectangle(), config, vec![], GlyphStyle::default());
        assert_eq!(status, HintStatus::Unhinted);
        assert_eq!(coords, [(102, 0), (164, 0), (164, 512), (102, 512)]);
        assert!(log.is_empty());
        let (status, coords, _) = hint(
            &UnscaledOutline::new(),
            HintingConfig::default(),
            vec![],
            GlyphStyle::default(),
        );
        assert_eq!(status, HintStatus::Unhinted);
        assert!(coords.is_empty());
    }

    #[test]
    fn dummy_writing_system_only_scales() {
        let config = HintingConfig::default();
        let scale = Scale::new(16.0, 1000, &config);
        let metrics = StyleMetrics::dummy(1000);
        let scaled = latin::scale_style_metrics(&metrics, scale, &config);
        let mut hints = GlyphHints::new();
        hints
            .reload(&rectangle(), &scaled, &SegmentOverrides::default())
            .unwrap();
        let status = hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut ())
            .unwrap();
        assert_eq!(status, HintStatus::Unhinted);
        let coords = hints.fitted_coords().collect::<Vec<_>>();
        assert_eq!(coords, [(102, 0), (164, 0), (164, 512), (102, 512)]);
    }

    #[test]
    fn apply_is_idempotent() {
        let (metrics, scaled) = metrics(HintingConfig::default(), vec![]);
        let mut hints = GlyphHints::new();
        hints
            .reload(
                &crate::latin::segments::tests::two_stems(),
                &scaled,
                &SegmentOverrides::default(),
            )
            .unwrap();
        let mut first = ActionLog::new();
        hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut first)
            .unwrap();
        let coords = hints.fitted_coords().collect::<Vec<_>>();
        let mut second = ActionLog::new();
        hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut second)
            .unwrap();
        assert_eq!(hints.fitted_coords().collect::<Vec<_>>(), coords);
        assert_eq!(first, second);
        // Every point of both stems sits on an edge
        assert!(hints
            .points()
            .iter()
            .all(|point| point.flags & (Point::TOUCH_X | Point::TOUCH_Y)
                == Point::TOUCH_X | Point::TOUCH_Y));
    }

    #[test]
    fn fitted_outline_is_a_fixed_point() {
        let (_, coords, first) = hint(
            &rectangle(),
            strong_config(),
            vec![],
            GlyphStyle::default(),
        );
        // Feed the fitted outline back in at a 1:1 scale: 16 ppem for a
        // 1024 unit em, with the fitted widths as standard widths
        let mut fitted = UnscaledOutline::new();
        fitted.push_contour(coords.iter().map(|&(x, y)| UnscaledPoint::on_curve(x, y)));
        let registry = MetricsRegistry::new(1, strong_config());
        let metrics = registry
            .get_or_init(0, |config| {
                StyleMetrics::new(1024, [vec![64], vec![512]], vec![], config)
            })
            .unwrap();
        let scale = Scale::new(16.0, 1024, registry.config());
        assert_eq!(scale.x_scale, 0x10000);
        let scaled = registry.scaled(0, &scale).unwrap();
        let mut hints = GlyphHints::new();
        hints
            .reload(&fitted, &scaled, &SegmentOverrides::default())
            .unwrap();
        let mut second = ActionLog::new();
        let status = hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut second)
            .unwrap();
        assert_eq!(status, HintStatus::Hinted);
        assert_eq!(hints.fitted_coords().collect::<Vec<_>>(), coords);
        assert_eq!(second, first);
    }

    #[test]
    fn reload_replaces_glyph() {
        let (metrics, scaled) = metrics(strong_config(), vec![]);
        let mut hints = GlyphHints::new();
        hints
            .reload(
                &crate::latin::segments::tests::two_stems(),
                &scaled,
                &SegmentOverrides::default(),
            )
            .unwrap();
        hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut ())
            .unwrap();
        assert_eq!(hints.points().len(), 8);
        hints
            .reload(&rectangle(), &scaled, &SegmentOverrides::default())
            .unwrap();
        assert_eq!(hints.points().len(), 4);
        assert!(hints.axis(Axis::HORIZONTAL).unwrap().edges.is_empty());
        hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut ())
            .unwrap();
        assert_eq!(hints.axis(Axis::HORIZONTAL).unwrap().edges.len(), 2);
    }

    #[test]
    fn weak_override_point_is_interpolated() {
        // An extra point in the middle of the right side
        let mut source = UnscaledOutline::new();
        source.push_contour([
            UnscaledPoint::on_curve(100, 0),
            UnscaledPoint::on_curve(160, 0),
            UnscaledPoint::on_curve(160, 250),
            UnscaledPoint::on_curve(160, 500),
            UnscaledPoint::on_curve(100, 500),
        ]);
        let (metrics, scaled) = metrics(strong_config(), vec![]);
        let overrides = [SegmentOverride::new(2, crate::outline::Direction::None)]
            .into_iter()
            .collect();
        let mut hints = GlyphHints::new();
        hints.reload(&source, &scaled, &overrides).unwrap();
        assert!(hints.points()[2].is_weak());
        hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut ())
            .unwrap();
        // Halfway up the stem, on the right edge
        assert_eq!(hints.points()[2].y, 256);
        assert_eq!(hints.points()[2].x, 192);
    }

    #[test]
    fn too_many_segments_leaves_glyph_unhinted() {
        // Each tiny square contributes two segments per axis
        let mut source = UnscaledOutline::new();
        for i in 0..501 {
            let x = i * 100;
            source.push_contour([
                UnscaledPoint::on_curve(x, 0),
                UnscaledPoint::on_curve(x + 50, 0),
                UnscaledPoint::on_curve(x + 50, 50),
                UnscaledPoint::on_curve(x, 50),
            ]);
        }
        let (metrics, scaled) = metrics(strong_config(), vec![]);
        let mut hints = GlyphHints::new();
        hints
            .reload(&source, &scaled, &SegmentOverrides::default())
            .unwrap();
        let mut log = ActionLog::new();
        let status = hints
            .apply(&metrics, &scaled, GlyphStyle::default(), &mut log)
            .unwrap();
        assert_eq!(status, HintStatus::Unhinted);
        assert!(log.is_empty());
        assert!(hints
            .points()
            .iter()
            .all(|point| point.x == point.ox && point.y == point.oy));
    }
}
