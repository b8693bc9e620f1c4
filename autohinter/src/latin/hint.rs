//! Latin edge hinting.
//!
//! Let's actually do some grid fitting. Here we align edges to the pixel
//! grid. This is the final step before applying the edge adjustments to
//! the original outline points.
//!
//! Every decision is reported to a [`HintRecorder`] so that the same
//! alignment can be replayed elsewhere.

use super::stem::{stem_width, QuantizeCache, StemContext};
use crate::{
    axis::{Axis, Edge},
    fixed::{fixed_mul_div, pix_round},
    recorder::{Action, HintRecorder},
};

/// Main Latin grid-fitting routine.
///
/// Blue zone alignment only happens on the vertical axis and is skipped
/// when `skip_blues` is set (used for non-base glyphs).
pub(crate) fn hint_edges(
    axis: &mut Axis,
    cx: &StemContext,
    mut top_to_bottom_hinting: bool,
    skip_blues: bool,
    cache: &mut QuantizeCache,
    recorder: &mut impl HintRecorder,
) {
    if axis.dim != Axis::VERTICAL {
        top_to_bottom_hinting = false;
    }
    log::trace!(
        "{} edge hinting",
        if axis.dim == Axis::VERTICAL {
            "horizontal"
        } else {
            "vertical"
        }
    );
    let mut aligner = Aligner {
        cx,
        cache,
        recorder,
        top_to_bottom_hinting,
    };
    let edges = axis.edges.as_mut_slice();
    // First align horizontal edges to blue zones if needed
    let anchor_ix = if axis.dim == Axis::VERTICAL && !skip_blues {
        aligner.align_edges_to_blues(edges)
    } else {
        None
    };
    // Now align the stem edges
    let (serif_count, anchor_ix) = aligner.align_stem_edges(edges, anchor_ix);
    // Special case for lowercase m
    if axis.dim == Axis::HORIZONTAL && (edges.len() == 6 || edges.len() == 12) {
        hint_lowercase_m(edges);
    }
    // Handle serifs and single segment edges
    if serif_count > 0 || anchor_ix.is_none() {
        aligner.align_remaining_edges(edges, anchor_ix);
    }
}

struct Aligner<'a, R> {
    cx: &'a StemContext<'a>,
    cache: &'a mut QuantizeCache,
    recorder: &'a mut R,
    top_to_bottom_hinting: bool,
}

impl<R: HintRecorder> Aligner<'_, R> {
    fn record(&mut self, edges: &[Edge], action: Action) {
        if log::log_enabled!(log::Level::Trace) {
            match action.edge_ix().and_then(|ix| edges.get(ix)) {
                Some(edge) => log::trace!(
                    "  {}: edge (opos={:.2}) now at {:.2}: {action:?}",
                    action.name(),
                    edge.opos as f64 / 64.0,
                    edge.pos as f64 / 64.0
                ),
                None => log::trace!("  {}: {action:?}", action.name()),
            }
        }
        self.recorder.record(self.cx.dim, &action);
    }

    fn stem_width(&mut self, width: i32, base_delta: i32, base_flags: u8, stem_flags: u8) -> i32 {
        stem_width(
            self.cx,
            self.cache,
            width,
            base_delta,
            base_flags,
            stem_flags,
        )
    }

    /// Align horizontal edges to blue zones.
    ///
    /// Returns the index of the first edge aligned this way which serves
    /// as anchor for the remaining stems.
    fn align_edges_to_blues(&mut self, edges: &mut [Edge]) -> Option<usize> {
        let mut anchor_ix = None;
        for edge_ix in 0..edges.len() {
            if edges[edge_ix].is_done() {
                continue;
            }
            let mut edge2_ix = edges[edge_ix].link_ix.map(usize::from);
            // If a stem contains both a neutral and a non-neutral blue
            // zone, skip the neutral one. If both are neutral, skip the
            // second.
            if let Some(link_ix) = edge2_ix {
                if edges[edge_ix].blue_edge.is_some() && edges[link_ix].blue_edge.is_some() {
                    let neutral = edges[edge_ix].flags & Edge::NEUTRAL != 0;
                    let neutral2 = edges[link_ix].flags & Edge::NEUTRAL != 0;
                    let skip_ix = if neutral2 {
                        Some(link_ix)
                    } else if neutral {
                        Some(edge_ix)
                    } else {
                        None
                    };
                    if let Some(skip_ix) = skip_ix {
                        let skip_edge = &mut edges[skip_ix];
                        skip_edge.blue_edge = None;
                        skip_edge.flags &= !Edge::NEUTRAL;
                    }
                }
            }
            // Flip edges if the other is aligned to a blue zone
            let (edge1_ix, blue) = if let Some(blue) = edges[edge_ix].blue_edge {
                (edge_ix, blue)
            } else if let Some((link_ix, blue)) =
                edge2_ix.and_then(|ix| Some((ix, edges[ix].blue_edge?)))
            {
                edge2_ix = Some(edge_ix);
                (link_ix, blue)
            } else {
                continue;
            };
            let edge1 = &mut edges[edge1_ix];
            edge1.pos = blue.fitted;
            edge1.flags |= Edge::DONE;
            let action = if anchor_ix.is_none() {
                Action::BlueAnchor {
                    edge_ix: edge1_ix,
                    anchor_ix: edge_ix,
                }
            } else {
                Action::Blue { edge_ix: edge1_ix }
            };
            self.record(edges, action);
            if let Some(edge2_ix) = edge2_ix {
                if edges[edge2_ix].blue_edge.is_none() {
                    self.align_linked_edge(edges, edge1_ix, edge2_ix);
                    edges[edge2_ix].flags |= Edge::DONE;
                }
            }
            if anchor_ix.is_none() {
                anchor_ix = Some(edge_ix);
            }
        }
        anchor_ix
    }

    /// Align stem edges, trying to maintain the relative order of stems
    /// in the glyph.
    ///
    /// Returns the number of edges without a link and the updated
    /// anchor.
    fn align_stem_edges(
        &mut self,
        edges: &mut [Edge],
        mut anchor_ix: Option<usize>,
    ) -> (usize, Option<usize>) {
        let mut serif_count = 0;
        for edge_ix in 0..edges.len() {
            if edges[edge_ix].is_done() {
                continue;
            }
            // Skip all non-stem edges
            let Some(edge2_ix) = edges[edge_ix].link_ix.map(usize::from) else {
                serif_count += 1;
                continue;
            };
            if edges[edge2_ix].blue_edge.is_some() {
                // Only possible when blue alignment was skipped for this
                // edge pair
                log::warn!("edge {edge_ix} is linked to blue edge {edge2_ix} which was not aligned");
                self.align_linked_edge(edges, edge2_ix, edge_ix);
                edges[edge_ix].flags |= Edge::DONE;
                continue;
            }
            let edge = edges[edge_ix];
            let edge2 = edges[edge2_ix];
            let original_len = edge2.opos - edge.opos;
            let cur_len = self.stem_width(original_len, 0, edge.flags, edge2.flags);
            let Some(anchor_ix) = anchor_ix else {
                // No stem has been aligned yet
                if cur_len < 96 {
                    let original_center = edge.opos + (original_len >> 1);
                    let cur_pos1 = round_center(original_center, cur_len);
                    let edge_pos = cur_pos1 - cur_len / 2;
                    edges[edge_ix].pos = edge_pos;
                    edges[edge2_ix].pos = edge_pos + cur_len;
                } else {
                    edges[edge_ix].pos = pix_round(edge.opos);
                }
                anchor_ix = Some(edge_ix);
                edges[edge_ix].flags |= Edge::DONE;
                self.record(
                    edges,
                    Action::Anchor {
                        edge_ix,
                        link_ix: edge2_ix,
                    },
                );
                self.align_linked_edge(edges, edge_ix, edge2_ix);
                continue;
            };
            let anchor = edges[anchor_ix];
            let original_pos = anchor.pos + (edge.opos - anchor.opos);
            let original_center = original_pos + (original_len >> 1);
            let bound_ix = edge_ix.checked_sub(1);
            let action = if edge2.is_done() {
                edges[edge_ix].pos = edge2.pos - cur_len;
                Action::Adjust {
                    edge_ix,
                    link_ix: edge2_ix,
                    bound_ix,
                }
            } else {
                if cur_len < 96 {
                    let cur_pos1 = round_center(original_center, cur_len);
                    edges[edge_ix].pos = cur_pos1 - cur_len / 2;
                    edges[edge2_ix].pos = cur_pos1 + cur_len / 2;
                } else {
                    let cur_pos1 = pix_round(original_pos);
                    let delta1 = (cur_pos1 + (cur_len >> 1) - original_center).abs();
                    let cur_pos2 = pix_round(original_pos + original_len) - cur_len;
                    let delta2 = (cur_pos2 + (cur_len >> 1) - original_center).abs();
                    let new_pos = if delta1 < delta2 { cur_pos1 } else { cur_pos2 };
                    edges[edge_ix].pos = new_pos;
                    edges[edge2_ix].pos = new_pos + cur_len;
                }
                Action::Stem {
                    edge_ix,
                    link_ix: edge2_ix,
                    bound_ix,
                }
            };
            self.record(edges, action);
            edges[edge_ix].flags |= Edge::DONE;
            edges[edge2_ix].flags |= Edge::DONE;
            if let Some(bound_ix) = bound_ix {
                self.bound(edges, edge_ix, bound_ix);
            }
        }
        (serif_count, anchor_ix)
    }

    /// Align serif and single segment edges.
    fn align_remaining_edges(&mut self, edges: &mut [Edge], mut anchor_ix: Option<usize>) {
        for edge_ix in 0..edges.len() {
            let edge = edges[edge_ix];
            if edge.is_done() {
                continue;
            }
            let lower_bound_ix = edge_ix.checked_sub(1);
            let upper_bound_ix = Some(edge_ix + 1).filter(|&ix| ix < edges.len() && edges[ix].is_done());
            let serif_ix = edge
                .serif_ix
                .map(usize::from)
                .filter(|&ix| (edges[ix].opos - edge.opos).abs() < 64 + 16);
            let action = if let Some(serif_ix) = serif_ix {
                // Shift by the same amount as the base edge
                let base = edges[serif_ix];
                edges[edge_ix].pos = base.pos + (edge.opos - base.opos);
                Action::Serif {
                    edge_ix,
                    lower_bound_ix,
                    upper_bound_ix,
                }
            } else if let Some(anchor_ix) = anchor_ix {
                let before_ix = (0..edge_ix).rev().find(|&ix| edges[ix].is_done());
                let after_ix = (edge_ix + 1..edges.len()).find(|&ix| edges[ix].is_done());
                if let Some((before_ix, after_ix)) = before_ix.zip(after_ix) {
                    let before = &edges[before_ix];
                    let after = &edges[after_ix];
                    let new_pos = if after.opos == before.opos {
                        before.pos
                    } else {
                        before.pos
                            + fixed_mul_div(
                                edge.opos - before.opos,
                                after.pos - before.pos,
                                after.opos - before.opos,
                            )
                    };
                    edges[edge_ix].pos = new_pos;
                    Action::SerifLink1 {
                        edge_ix,
                        before_ix,
                        after_ix,
                        lower_bound_ix,
                        upper_bound_ix,
                    }
                } else {
                    let anchor = &edges[anchor_ix];
                    edges[edge_ix].pos = anchor.pos + ((edge.opos - anchor.opos + 16) & !31);
                    Action::SerifLink2 {
                        edge_ix,
                        lower_bound_ix,
                        upper_bound_ix,
                    }
                }
            } else {
                anchor_ix = Some(edge_ix);
                edges[edge_ix].pos = pix_round(edge.opos);
                Action::SerifAnchor {
                    edge_ix,
                    lower_bound_ix,
                    upper_bound_ix,
                }
            };
            self.record(edges, action);
            edges[edge_ix].flags |= Edge::DONE;
            if let Some(lower_bound_ix) = lower_bound_ix {
                self.bound(edges, edge_ix, lower_bound_ix);
            }
            if let Some(upper_bound_ix) = upper_bound_ix {
                self.bound(edges, edge_ix, upper_bound_ix);
            }
        }
    }

    /// Moves an edge onto a neighbour it has crossed.
    ///
    /// A linked edge whose partner sits within 16 units of the neighbour
    /// is left alone so the stem doesn't collapse.
    fn bound(&mut self, edges: &mut [Edge], edge_ix: usize, bound_ix: usize) {
        let pos = edges[edge_ix].pos;
        let bound_pos = edges[bound_ix].pos;
        let is_lower = bound_ix < edge_ix;
        let crosses = if is_lower != self.top_to_bottom_hinting {
            pos < bound_pos
        } else {
            pos > bound_pos
        };
        if !crosses {
            return;
        }
        if let Some(link) = edges[edge_ix].link(edges) {
            if (link.pos - bound_pos).abs() <= 16 {
                return;
            }
        }
        edges[edge_ix].pos = bound_pos;
        self.record(edges, Action::Bound { edge_ix, bound_ix });
    }

    /// Align one stem edge relative to previous stem edge.
    fn align_linked_edge(&mut self, edges: &mut [Edge], base_ix: usize, stem_ix: usize) {
        let base = edges[base_ix];
        let stem = edges[stem_ix];
        let width = stem.opos - base.opos;
        let base_delta = base.pos - base.opos;
        let fitted_width = self.stem_width(width, base_delta, base.flags, stem.flags);
        edges[stem_ix].pos = base.pos + fitted_width;
        self.record(edges, Action::Link { base_ix, stem_ix });
    }
}

/// Some "voodoo" to specially round edges for small stem widths: align
/// the center of the stem, then shift so the edges land at suitable
/// positions.
fn round_center(original_center: i32, cur_len: i32) -> i32 {
    let (u_off, d_off) = if cur_len <= 64 {
        // width <= 1px
        (32, 32)
    } else {
        // 1px < width < 1.5px
        (38, 26)
    };
    let cur_pos1 = pix_round(original_center);
    let error1 = (original_center - (cur_pos1 - u_off)).abs();
    let error2 = (original_center - (cur_pos1 + d_off)).abs();
    if error1 < error2 {
        cur_pos1 - u_off
    } else {
        cur_pos1 + d_off
    }
}

/// Make sure that lowercase m's maintain symmetry.
///
/// Sans serif m's have six vertical edges and serif ones have twelve.
/// Glyphs that don't fit the pattern are left alone, and the correction
/// only applies to symmetric stems anyway.
fn hint_lowercase_m(edges: &mut [Edge]) {
    let (edge1_ix, edge2_ix, edge3_ix) = if edges.len() == 6 {
        (0, 2, 4)
    } else {
        (1, 5, 9)
    };
    let edge1 = &edges[edge1_ix];
    let edge2 = &edges[edge2_ix];
    let edge3 = &edges[edge3_ix];
    let dist1 = edge2.opos - edge1.opos;
    let dist2 = edge3.opos - edge2.opos;
    let span = (dist1 - dist2).abs();
    if span >= 8 {
        return;
    }
    let delta = edge3.pos - (2 * edge2.pos - edge1.pos);
    log::trace!("  lowercase m symmetry: shifting edge {edge3_ix} by {delta}");
    let link_ix = edge3.link_ix.map(usize::from);
    let edge3 = &mut edges[edge3_ix];
    edge3.pos -= delta;
    edge3.flags |= Edge::DONE;
    if let Some(link_ix) = link_ix {
        let link = &mut edges[link_ix];
        link.pos -= delta;
        link.flags |= Edge::DONE;
    }
    // Move serifs along with the stem
    if edges.len() == 12 {
        edges[8].pos -= delta;
        edges[11].pos -= delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        axis::Dimension,
        config::{HintingConfig, StemWidthMode, StemWidthModes},
        fixed::fixed_mul,
        latin::edges::compute_blue_edges,
        metrics::{BlueZone, Scale, ScaledAxisMetrics, ScaledBlue, ScaledWidth},
        outline::{Direction, Orientation},
        recorder::ActionLog,
    };
    use pretty_assertions::assert_eq;

    /// Builds an axis from (opos, link, serif) triples with scale 1.
    fn axis(dim: Dimension, edges: &[(i32, Option<u16>, Option<u16>)]) -> Axis {
        let mut axis = Axis::new(dim, Some(Orientation::PostScript));
        for &(pos, link_ix, serif_ix) in edges {
            axis.edges.push(Edge {
                fpos: pos,
                opos: pos,
                pos,
                link_ix,
                serif_ix,
                dir: Direction::Right,
                ..Default::default()
            });
        }
        axis
    }

    fn scale(mode: StemWidthMode) -> Scale {
        let config = HintingConfig {
            stem_width_modes: StemWidthModes {
                horizontal: mode,
                vertical: mode,
            },
            ..Default::default()
        };
        Scale::new(16.0, 1000, &config)
    }

    fn metrics(dim: Dimension, std_width: i32) -> ScaledAxisMetrics {
        ScaledAxisMetrics {
            dim,
            scale: 0x10000,
            widths: vec![ScaledWidth {
                unscaled: std_width,
                scaled: std_width,
                fitted: std_width,
            }],
            ..Default::default()
        }
    }

    fn hint(
        axis: &mut Axis,
        metrics: &ScaledAxisMetrics,
        mode: StemWidthMode,
    ) -> (Vec<i32>, Vec<Action>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let scale = scale(mode);
        let cx = StemContext {
            dim: axis.dim,
            metrics,
            scale: &scale,
            ignore_standard_width: false,
        };
        let mut log = ActionLog::new();
        hint_edges(
            axis,
            &cx,
            false,
            false,
            &mut QuantizeCache::new(),
            &mut log,
        );
        assert!(axis.edges.iter().all(Edge::is_done));
        let positions = axis.edges.iter().map(|edge| edge.pos).collect();
        let actions = log.for_dim(axis.dim).copied().collect();
        (positions, actions)
    }

    fn baseline(reference: i32, overshoot: i32) -> ScaledBlue {
        let width = |unscaled| ScaledWidth {
            unscaled,
            scaled: fixed_mul(unscaled, 0x10000),
            fitted: pix_round(fixed_mul(unscaled, 0x10000)),
        };
        ScaledBlue {
            reference: width(reference),
            overshoot: width(overshoot),
            flags: BlueZone::ACTIVE,
        }
    }

    #[test]
    fn distant_blue_zone_falls_back_to_anchor() {
        let mut metrics = metrics(Axis::VERTICAL, 100);
        // 40 units away at scale 1 is more than the 25 unit threshold
        metrics.blues = vec![baseline(40, 30)];
        let mut axis = axis(Axis::VERTICAL, &[(0, Some(1), None), (100, Some(0), None)]);
        compute_blue_edges(&mut axis, &metrics, 1000);
        assert!(axis.edges.iter().all(|edge| edge.blue_edge.is_none()));
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Quantized);
        assert_eq!(positions, [0, 100]);
        assert_eq!(
            actions,
            [
                Action::Anchor {
                    edge_ix: 0,
                    link_ix: 1
                },
                Action::Link {
                    base_ix: 0,
                    stem_ix: 1
                },
                Action::Adjust {
                    edge_ix: 1,
                    link_ix: 0,
                    bound_ix: Some(0)
                },
            ]
        );
    }

    #[test]
    fn nearby_blue_zone_anchors() {
        let mut metrics = metrics(Axis::VERTICAL, 100);
        metrics.blues = vec![baseline(10, 0)];
        let mut axis = axis(Axis::VERTICAL, &[(0, Some(1), None), (100, Some(0), None)]);
        compute_blue_edges(&mut axis, &metrics, 1000);
        assert_eq!(axis.edges[0].best_blue_ix, Some(0));
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Quantized);
        assert_eq!(positions, [0, 100]);
        assert_eq!(
            actions,
            [
                Action::BlueAnchor {
                    edge_ix: 0,
                    anchor_ix: 0
                },
                Action::Link {
                    base_ix: 0,
                    stem_ix: 1
                },
            ]
        );
    }

    #[test]
    fn blue_on_linked_edge_flips_stem() {
        let mut metrics = metrics(Axis::VERTICAL, 100);
        metrics.blues = vec![baseline(100, 100)];
        // Second edge must be against the major direction for a bottom zone
        let mut axis = axis(Axis::VERTICAL, &[(0, Some(1), None), (100, Some(0), None)]);
        for edge in &mut axis.edges {
            edge.dir = Direction::Left;
        }
        axis.edges[1].dir = Direction::Right;
        compute_blue_edges(&mut axis, &metrics, 1000);
        assert!(axis.edges[0].blue_edge.is_none());
        assert!(axis.edges[1].blue_edge.is_some());
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Quantized);
        // Blue snaps 100 to 128, the linked edge follows at width 100
        assert_eq!(positions, [28, 128]);
        assert_eq!(
            actions,
            [
                Action::BlueAnchor {
                    edge_ix: 1,
                    anchor_ix: 0
                },
                Action::Link {
                    base_ix: 1,
                    stem_ix: 0
                },
            ]
        );
    }

    #[test]
    fn stems_relative_to_anchor() {
        let metrics = metrics(Axis::HORIZONTAL, 60);
        let mut axis = axis(
            Axis::HORIZONTAL,
            &[
                (100, Some(1), None),
                (160, Some(0), None),
                (400, Some(3), None),
                (460, Some(2), None),
            ],
        );
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Quantized);
        assert_eq!(positions, [130, 190, 450, 510]);
        assert_eq!(
            actions,
            [
                Action::Anchor {
                    edge_ix: 0,
                    link_ix: 1
                },
                Action::Link {
                    base_ix: 0,
                    stem_ix: 1
                },
                Action::Adjust {
                    edge_ix: 1,
                    link_ix: 0,
                    bound_ix: Some(0)
                },
                Action::Stem {
                    edge_ix: 2,
                    link_ix: 3,
                    bound_ix: Some(1)
                },
            ]
        );
    }

    #[test]
    fn crossing_stem_is_bounded() {
        let metrics = metrics(Axis::HORIZONTAL, 60);
        let mut axis = axis(
            Axis::HORIZONTAL,
            &[
                (0, Some(1), None),
                (80, Some(0), None),
                (90, Some(3), None),
                (180, Some(2), None),
            ],
        );
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Natural);
        assert_eq!(positions, [-14, 66, 66, 135]);
        assert_eq!(
            actions.iter().map(Action::name).collect::<Vec<_>>(),
            ["ANCHOR", "LINK", "ADJUST", "STEM", "BOUND"]
        );
        assert_eq!(
            actions[4],
            Action::Bound {
                edge_ix: 2,
                bound_ix: 1
            }
        );
    }

    #[test]
    fn serifs_and_lone_edges() {
        let metrics = metrics(Axis::VERTICAL, 100);
        let mut axis = axis(
            Axis::VERTICAL,
            &[
                (0, Some(1), None),
                (100, Some(0), None),
                (130, None, Some(1)),
                (400, None, None),
                (600, Some(5), None),
                (700, Some(4), None),
            ],
        );
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Natural);
        assert_eq!(positions, [0, 100, 130, 402, 604, 704]);
        assert_eq!(
            actions,
            [
                Action::Anchor {
                    edge_ix: 0,
                    link_ix: 1
                },
                Action::Link {
                    base_ix: 0,
                    stem_ix: 1
                },
                Action::Adjust {
                    edge_ix: 1,
                    link_ix: 0,
                    bound_ix: Some(0)
                },
                Action::Stem {
                    edge_ix: 4,
                    link_ix: 5,
                    bound_ix: Some(3)
                },
                Action::Serif {
                    edge_ix: 2,
                    lower_bound_ix: Some(1),
                    upper_bound_ix: None
                },
                Action::SerifLink1 {
                    edge_ix: 3,
                    before_ix: 2,
                    after_ix: 4,
                    lower_bound_ix: Some(2),
                    upper_bound_ix: Some(4)
                },
            ]
        );
    }

    #[test]
    fn lone_edges_without_stems() {
        let metrics = metrics(Axis::VERTICAL, 100);
        let mut axis = axis(
            Axis::VERTICAL,
            &[(0, None, None), (60, None, Some(0)), (400, None, None)],
        );
        let (positions, actions) = hint(&mut axis, &metrics, StemWidthMode::Natural);
        // 400 from the anchor rounds to a multiple of half a pixel
        assert_eq!(positions, [0, 60, 416]);
        assert_eq!(
            actions.iter().map(Action::name).collect::<Vec<_>>(),
            ["SERIF_ANCHOR", "SERIF", "SERIF_LINK2"]
        );
    }

    #[test]
    fn lowercase_m_symmetry() {
        let metrics = metrics(Axis::HORIZONTAL, 60);
        let mut axis = axis(
            Axis::HORIZONTAL,
            &[
                (0, Some(1), None),
                (50, Some(0), None),
                (212, Some(3), None),
                (262, Some(2), None),
                (420, Some(5), None),
                (470, Some(4), None),
            ],
        );
        let (positions, _) = hint(&mut axis, &metrics, StemWidthMode::Natural);
        // Without the correction the third stem would land at 455
        assert_eq!(positions, [7, 57, 199, 249, 391, 441]);
        assert_eq!(positions[4] - positions[2], positions[2] - positions[0]);
    }
}
