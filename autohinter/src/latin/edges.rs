//! Latin edge computations.
//!
//! Edges are sets of segments that all lie within a threshold based on
//! stem widths.
//!
//! Here we compute edges from the segment list, assign properties (round,
//! serif, links) and then associate them with blue zones.

use crate::{
    axis::{Axis, Edge, Segment},
    error::HintError,
    fixed::{fixed_div, fixed_mul},
    metrics::{BlueZone, ScaledAxisMetrics},
    outline::Direction,
};

/// Links segments to edges, using feature analysis for selection.
pub(crate) fn compute_edges(
    axis: &mut Axis,
    metrics: &ScaledAxisMetrics,
    top_to_bottom_hinting: bool,
    y_scale: i32,
) -> Result<(), HintError> {
    axis.edges.clear();
    let scale = metrics.scale;
    let top_to_bottom_hinting = axis.dim == Axis::VERTICAL && top_to_bottom_hinting;
    // Ignore horizontal segments less than 1 pixel in length
    let segment_length_threshold = if axis.dim == Axis::HORIZONTAL {
        fixed_div(64, y_scale)
    } else {
        0
    };
    // Also ignore segments with a width delta larger than 0.5 pixels
    let segment_width_threshold = fixed_div(32, scale);
    // Ensure that edge distance threshold is less than or equal to
    // 0.25 pixels
    let edge_distance_threshold = fixed_div(
        fixed_mul(metrics.edge_distance_threshold, scale).min(64 / 4),
        scale,
    );
    // Now build the sorted table of edges by looping over all segments
    // to find a matching edge, adding a new one if not found
    'segments1: for segment_ix in 0..axis.segments.len() {
        let segment = &axis.segments[segment_ix];
        // Ignore segments that are too short, too wide or direction-less
        if segment.height < segment_length_threshold
            || segment.delta > segment_width_threshold
            || segment.dir == Direction::None
        {
            continue;
        }
        // Ignore serif edges that are smaller than 1.5 pixels
        if segment.serif_ix.is_some() && (2 * segment.height) < (3 * segment_length_threshold) {
            continue;
        }
        // Look for a corresponding edge for this segment
        for edge_ix in 0..axis.edges.len() {
            let edge = &axis.edges[edge_ix];
            let dist = (segment.pos - edge.fpos).abs();
            if dist < edge_distance_threshold && edge.dir == segment.dir {
                axis.append_segment_to_edge(segment_ix, edge_ix);
                continue 'segments1;
            }
        }
        // We couldn't find an edge, so add a new one for this segment
        let opos = fixed_mul(segment.pos, scale);
        let edge = Edge {
            fpos: segment.pos,
            opos,
            pos: opos,
            dir: segment.dir,
            first_ix: segment_ix as u16,
            last_ix: segment_ix as u16,
            ..Default::default()
        };
        axis.insert_edge(edge, top_to_bottom_hinting)?;
        axis.segments[segment_ix].edge_next_ix = Some(segment_ix as u16);
    }
    // Loop again to find single point segments without a direction and
    // associate them with an existing edge if possible
    'segments2: for segment_ix in 0..axis.segments.len() {
        let segment = &axis.segments[segment_ix];
        if segment.dir != Direction::None {
            continue;
        }
        for edge_ix in 0..axis.edges.len() {
            let edge = &axis.edges[edge_ix];
            let dist = (segment.pos - edge.fpos).abs();
            if dist < edge_distance_threshold {
                axis.append_segment_to_edge(segment_ix, edge_ix);
                continue 'segments2;
            }
        }
    }
    link_segments_to_edges(axis);
    compute_edge_properties(axis);
    Ok(())
}

/// Edges get shifted and resorted as they're built so we need to assign
/// edge indices to segments in a second pass.
fn link_segments_to_edges(axis: &mut Axis) {
    let segments = axis.segments.as_mut_slice();
    for (edge_ix, edge) in axis.edges.iter().enumerate() {
        let mut ix = edge.first_ix as usize;
        let last_ix = edge.last_ix as usize;
        loop {
            let segment = &mut segments[ix];
            segment.edge_ix = Some(edge_ix as u16);
            if ix == last_ix {
                break;
            }
            ix = segment
                .edge_next_ix
                .map(|ix| ix as usize)
                .unwrap_or(last_ix);
        }
    }
}

/// Compute the edge properties based on the series of segments that make
/// up the edge.
fn compute_edge_properties(axis: &mut Axis) {
    let edges = axis.edges.as_mut_slice();
    let segments = axis.segments.as_slice();
    for edge_ix in 0..edges.len() {
        let mut roundness = 0;
        let mut straightness = 0;
        let edge = edges[edge_ix];
        let mut segment_ix = edge.first_ix as usize;
        let last_segment_ix = edge.last_ix as usize;
        loop {
            let segment = &segments[segment_ix];
            let next_segment_ix = segment.edge_next_ix;
            if segment.flags & Segment::ROUND != 0 {
                roundness += 1;
            } else {
                straightness += 1;
            }
            // Check for serifs
            let is_serif = segment
                .serif_ix
                .map(|serif_ix| {
                    let serif = &segments[serif_ix as usize];
                    serif.edge_ix.is_some() && serif.edge_ix != Some(edge_ix as u16)
                })
                .unwrap_or(false);
            let is_link = segment
                .link(segments)
                .map(|link| link.edge_ix.is_some())
                .unwrap_or(false);
            if is_serif || is_link {
                let current = edges[edge_ix];
                let (edge2_ix, segment2_ix) = if is_serif {
                    (current.serif_ix, segment.serif_ix)
                } else {
                    (current.link_ix, segment.link_ix)
                };
                // Prefer the relation whose segments are closer
                let edge2_ix = match (edge2_ix, segment2_ix) {
                    (Some(edge2_ix), Some(segment2_ix)) => {
                        let edge2 = &edges[edge2_ix as usize];
                        let edge_delta = (current.fpos - edge2.fpos).abs();
                        let segment2 = &segments[segment2_ix as usize];
                        let segment_delta = (segment.pos - segment2.pos).abs();
                        if segment_delta < edge_delta {
                            segment2.edge_ix
                        } else {
                            Some(edge2_ix)
                        }
                    }
                    (None, Some(segment2_ix)) => segments[segment2_ix as usize].edge_ix,
                    (edge2_ix, None) => edge2_ix,
                };
                if is_serif {
                    edges[edge_ix].serif_ix = edge2_ix;
                    if let Some(edge2_ix) = edge2_ix {
                        edges[edge2_ix as usize].flags |= Edge::SERIF;
                    }
                } else {
                    edges[edge_ix].link_ix = edge2_ix;
                }
            }
            if segment_ix == last_segment_ix {
                break;
            }
            segment_ix = next_segment_ix
                .map(|ix| ix as usize)
                .unwrap_or(last_segment_ix);
        }
        let edge = &mut edges[edge_ix];
        edge.flags = Edge::NORMAL;
        if roundness > 0 && roundness >= straightness {
            edge.flags |= Edge::ROUND;
        }
        // Drop serifs for linked edges
        if edge.serif_ix.is_some() && edge.link_ix.is_some() {
            edge.serif_ix = None;
        }
    }
}

/// Compute all edges which lie within blue zones.
///
/// For Latin, this is only done for the vertical axis. The zone list of
/// the scaled metrics already contains the Windows zones when they are
/// enabled.
pub(crate) fn compute_blue_edges(axis: &mut Axis, metrics: &ScaledAxisMetrics, units_per_em: i32) {
    if axis.dim != Axis::VERTICAL {
        return;
    }
    let scale = metrics.scale;
    for edge in &mut axis.edges {
        let mut best = None;
        // Initial threshold as a fraction of em size with a max distance
        // of 0.5 pixels
        let mut best_dist = fixed_mul(units_per_em / 40, scale).min(64 / 2);
        for (blue_ix, blue) in metrics.blues.iter().enumerate() {
            // Ignore inactive blue zones
            if !blue.is_active() {
                continue;
            }
            let is_top = blue.flags & BlueZone::TOP != 0;
            let is_neutral = blue.flags & BlueZone::NEUTRAL != 0;
            let is_major_dir = edge.dir == axis.major_dir;
            // Top zones take edges against the major direction, bottom
            // zones edges along it; neutral zones take both
            if !(is_top ^ is_major_dir || is_neutral) {
                continue;
            }
            // Compare to reference position
            let reference = blue.reference.unscaled;
            let dist = fixed_mul((edge.fpos - reference).abs(), scale);
            if dist < best_dist {
                best_dist = dist;
                best = Some((blue.reference, blue_ix, false, is_neutral));
            }
            // Now compare to overshoot position for round edges that are
            // on the overshoot side of the reference
            if edge.flags & Edge::ROUND != 0 && dist != 0 && !is_neutral {
                let is_under_ref = edge.fpos < reference;
                if is_top ^ is_under_ref {
                    let dist = fixed_mul((edge.fpos - blue.overshoot.unscaled).abs(), scale);
                    if dist < best_dist {
                        best_dist = dist;
                        best = Some((blue.overshoot, blue_ix, true, is_neutral));
                    }
                }
            }
        }
        if let Some((blue_edge, blue_ix, is_shoot, is_neutral)) = best {
            edge.blue_edge = Some(blue_edge);
            edge.best_blue_ix = Some(blue_ix as u16);
            edge.best_blue_is_shoot = is_shoot;
            if is_neutral {
                edge.flags |= Edge::NEUTRAL;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        latin::segments::{compute_segments, link_segments, tests::two_stems},
        metrics::{ScaledBlue, ScaledWidth},
        outline::{Orientation, Outline},
    };
    use pretty_assertions::assert_eq;

    fn axis_metrics(dim: usize, scale: i32, edge_distance_threshold: i32) -> ScaledAxisMetrics {
        ScaledAxisMetrics {
            dim,
            scale,
            edge_distance_threshold,
            ..Default::default()
        }
    }

    #[test]
    fn stem_edges() {
        let mut outline = Outline::default();
        outline.fill(&two_stems(), 1000).unwrap();
        let mut axis = Axis::new(Axis::HORIZONTAL, outline.orientation);
        compute_segments(&mut outline, &mut axis).unwrap();
        link_segments(&outline, &mut axis, Some(60));
        let metrics = axis_metrics(Axis::HORIZONTAL, 0x10000, 10);
        compute_edges(&mut axis, &metrics, false, 0x10000).unwrap();
        let edges = axis
            .edges
            .iter()
            .map(|edge| (edge.fpos, edge.opos, edge.dir, edge.link_ix, edge.flags))
            .collect::<Vec<_>>();
        use Direction::{Down, Up};
        assert_eq!(
            edges,
            [
                (100, 100, Down, Some(1), 0),
                (160, 160, Up, Some(0), 0),
                (400, 400, Down, Some(3), 0),
                (460, 460, Up, Some(2), 0),
            ]
        );
        // Each segment points back to its edge
        for (edge_ix, edge) in axis.edges.iter().enumerate() {
            for (_, segment) in axis.edge_segments(edge) {
                assert_eq!(segment.edge_ix, Some(edge_ix as u16));
            }
        }
    }

    fn segment(dir: Direction, pos: i32, link_ix: Option<u16>) -> Segment {
        Segment {
            dir,
            pos,
            min_coord: 0,
            max_coord: 500,
            height: 500,
            link_ix,
            ..Default::default()
        }
    }

    #[test]
    fn nearby_segments_share_an_edge() {
        let mut axis = Axis::new(Axis::HORIZONTAL, Some(Orientation::PostScript));
        for seg in [
            segment(Direction::Up, 100, None),
            segment(Direction::Up, 108, None),
            segment(Direction::Down, 104, None),
            segment(Direction::Up, 130, None),
        ] {
            axis.push_segment(seg).unwrap();
        }
        let metrics = axis_metrics(Axis::HORIZONTAL, 0x10000, 10);
        compute_edges(&mut axis, &metrics, false, 0x10000).unwrap();
        let edges = axis
            .edges
            .iter()
            .map(|edge| {
                let segments = axis
                    .edge_segments(edge)
                    .map(|(ix, _)| ix)
                    .collect::<Vec<_>>();
                (edge.fpos, edge.dir, segments)
            })
            .collect::<Vec<_>>();
        // Same direction within the threshold merges; opposite direction
        // does not.
        assert_eq!(
            edges,
            [
                (100, Direction::Up, vec![0, 1]),
                (104, Direction::Down, vec![2]),
                (130, Direction::Up, vec![3]),
            ]
        );
        // Every segment is within the threshold of its edge
        for edge in &axis.edges {
            for (_, segment) in axis.edge_segments(edge) {
                assert!((segment.pos - edge.fpos).abs() < 10);
            }
        }
    }

    #[test]
    fn ignored_segments() {
        let mut axis = Axis::new(Axis::HORIZONTAL, Some(Orientation::PostScript));
        let mut short = segment(Direction::Up, 100, None);
        short.height = 20;
        let mut wide = segment(Direction::Up, 200, None);
        wide.delta = 40;
        for seg in [short, wide, segment(Direction::None, 300, None)] {
            axis.push_segment(seg).unwrap();
        }
        let metrics = axis_metrics(Axis::HORIZONTAL, 0x10000, 10);
        compute_edges(&mut axis, &metrics, false, 0x10000).unwrap();
        assert!(axis.edges.is_empty());
        assert!(axis.segments.iter().all(|seg| seg.edge_ix.is_none()));
    }

    #[test]
    fn top_to_bottom_order() {
        let mut axis = Axis::new(Axis::VERTICAL, Some(Orientation::PostScript));
        for pos in [0, 500, 250] {
            axis.push_segment(segment(Direction::Right, pos, None))
                .unwrap();
        }
        let metrics = axis_metrics(Axis::VERTICAL, 0x10000, 10);
        compute_edges(&mut axis, &metrics, true, 0x10000).unwrap();
        let order = axis.edges.iter().map(|edge| edge.fpos).collect::<Vec<_>>();
        assert_eq!(order, [500, 250, 0]);
    }

    fn blue(reference: i32, overshoot: i32, flags: u32, scale: i32) -> ScaledBlue {
        let width = |unscaled| ScaledWidth {
            unscaled,
            scaled: fixed_mul(unscaled, scale),
            fitted: crate::fixed::pix_round(fixed_mul(unscaled, scale)),
        };
        ScaledBlue {
            reference: width(reference),
            overshoot: width(overshoot),
            flags: flags | BlueZone::ACTIVE,
        }
    }

    fn blue_axis(edges: &[(i32, Direction, u8)]) -> Axis {
        let mut axis = Axis::new(Axis::VERTICAL, Some(Orientation::PostScript));
        for &(fpos, dir, flags) in edges {
            axis.edges.push(Edge {
                fpos,
                dir,
                flags,
                ..Default::default()
            });
        }
        axis
    }

    #[test]
    fn blue_edges() {
        // Two pixels per 64 units: 0.5px is 16 font units
        let scale = 0x20000;
        let mut metrics = axis_metrics(Axis::VERTICAL, scale, 10);
        metrics.blues = vec![
            // Baseline
            blue(0, -10, 0, scale),
            // x-height
            blue(500, 510, BlueZone::TOP, scale),
        ];
        use Direction::{Left, Right};
        let mut axis = blue_axis(&[
            // Major direction: bottom zones
            (15, Right, 0),
            (-9, Right, Edge::ROUND),
            (17, Right, 0),
            // Against the major direction: top zones
            (507, Left, Edge::ROUND),
            (490, Left, 0),
            // Wrong polarity for the baseline
            (0, Left, 0),
        ]);
        compute_blue_edges(&mut axis, &metrics, 1000);
        let matches = axis
            .edges
            .iter()
            .map(|edge| {
                (
                    edge.best_blue_ix,
                    edge.best_blue_is_shoot,
                    edge.blue_edge.map(|blue| blue.unscaled),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            matches,
            [
                (Some(0), false, Some(0)),
                (Some(0), true, Some(-10)),
                // More than half a pixel away
                (None, false, None),
                (Some(1), true, Some(510)),
                (Some(1), false, Some(500)),
                (None, false, None),
            ]
        );
    }

    #[test]
    fn neutral_and_inactive_blues() {
        let scale = 0x10000;
        let mut metrics = axis_metrics(Axis::VERTICAL, scale, 10);
        let mut inactive = blue(0, -10, 0, scale);
        inactive.flags = 0;
        metrics.blues = vec![inactive, blue(300, 300, BlueZone::NEUTRAL, scale)];
        let mut axis = blue_axis(&[
            (2, Direction::Right, 0),
            (302, Direction::Right, Edge::ROUND),
            (298, Direction::Left, 0),
        ]);
        compute_blue_edges(&mut axis, &metrics, 1000);
        let edge = &axis.edges[0];
        assert_eq!(edge.blue_edge, None);
        for edge in &axis.edges[1..] {
            assert_eq!(edge.best_blue_ix, Some(1));
            assert!(!edge.best_blue_is_shoot);
            assert!(edge.flags & Edge::NEUTRAL != 0);
        }
    }
}
