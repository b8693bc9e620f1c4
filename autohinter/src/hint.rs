//! Apply edge hints to an outline.
//!
//! This happens in three passes:
//! 1. Align points that are directly attached to edges. These are the points
//!    which originally generated the edge and are coincident with the edge
//!    coordinate (within a threshold) for a given axis.
//! 2. Interpolate non-weak points that were not touched by the previous pass.
//!    This searches for the edges that enclose the point and interpolates the
//!    coordinate based on the adjustment applied to those edges.
//! 3. Interpolate remaining untouched points. These are generally the weak
//!    points: those that are very near other points or lacking a dominant
//!    inward or outward direction.
//!
//! The final result is a fully hinted outline.

use crate::{
    axis::{Axis, Dimension},
    fixed::{fixed_div, fixed_mul},
    outline::{Outline, Point},
    recorder::{Action, HintRecorder},
};
use core::cmp::Ordering;

fn touch_flag(dim: Dimension) -> u8 {
    if dim == Axis::HORIZONTAL {
        Point::TOUCH_X
    } else {
        Point::TOUCH_Y
    }
}

/// Align all points of an edge to the same coordinate value.
pub(crate) fn align_edge_points(outline: &mut Outline, axis: &Axis) -> Option<()> {
    let edges = axis.edges.as_slice();
    let points = outline.points.as_mut_slice();
    for segment in &axis.segments {
        let Some(edge) = segment.edge(edges) else {
            continue;
        };
        let mut point_ix = segment.first();
        let last_ix = segment.last();
        loop {
            let point = points.get_mut(point_ix)?;
            store_point(point, axis.dim, edge.pos);
            if point_ix == last_ix {
                break;
            }
            point_ix = point.next();
        }
    }
    Some(())
}

/// Align the strong points; equivalent to the TrueType `IP` instruction.
///
/// Each point that was not touched by an edge is either shifted along with
/// the first or last edge, placed on an edge with the same original
/// coordinate or interpolated between the two enclosing edges.
pub(crate) fn align_strong_points(
    outline: &mut Outline,
    axis: &mut Axis,
    recorder: &mut impl HintRecorder,
) -> Option<()> {
    if axis.edges.is_empty() {
        return Some(());
    }
    let dim = axis.dim;
    let touch_flag = touch_flag(dim);
    let points = outline.points.as_mut_slice();
    'points: for (point_ix, point) in points.iter_mut().enumerate() {
        // Skip points that are already touched; do weak interpolation in the
        // next pass
        if point.flags & (touch_flag | Point::WEAK_INTERPOLATION) != 0 {
            continue;
        }
        let (u, ou) = if dim == Axis::VERTICAL {
            (point.fy, point.oy)
        } else {
            (point.fx, point.ox)
        };
        let edges = axis.edges.as_mut_slice();
        // Is the point before the first edge?
        let edge = edges.first()?;
        if edge.fpos - u >= 0 {
            store_point(point, dim, edge.pos - (edge.opos - ou));
            recorder.record(dim, &Action::IpBefore { point_ix });
            continue;
        }
        // Is the point after the last edge?
        let edge = edges.last()?;
        if u - edge.fpos >= 0 {
            store_point(point, dim, edge.pos + (ou - edge.opos));
            recorder.record(dim, &Action::IpAfter { point_ix });
            continue;
        }
        // Find enclosing edges; for a small number of edges, use a linear
        // search.
        // Note: with more than one edge at the same fpos, the linear and
        // binary searches can pick different edges so the cutoff matters.
        let min_ix = if edges.len() <= 8 {
            let Some((edge_ix, edge)) = edges
                .iter()
                .enumerate()
                .find(|(_, edge)| edge.fpos >= u)
            else {
                continue;
            };
            if edge.fpos == u {
                store_point(point, dim, edge.pos);
                recorder.record(dim, &Action::IpOn { point_ix, edge_ix });
                continue 'points;
            }
            edge_ix
        } else {
            let mut min_ix = 0;
            let mut max_ix = edges.len();
            while min_ix < max_ix {
                let mid_ix = (min_ix + max_ix) >> 1;
                let edge = &edges[mid_ix];
                match u.cmp(&edge.fpos) {
                    Ordering::Less => max_ix = mid_ix,
                    Ordering::Greater => min_ix = mid_ix + 1,
                    Ordering::Equal => {
                        // We are on an edge
                        store_point(point, dim, edge.pos);
                        recorder.record(
                            dim,
                            &Action::IpOn {
                                point_ix,
                                edge_ix: mid_ix,
                            },
                        );
                        continue 'points;
                    }
                }
            }
            min_ix
        };
        // Point is not on an edge
        let Some(before_ix) = min_ix.checked_sub(1) else {
            continue;
        };
        let edge_before = edges.get(before_ix)?;
        let (before_pos, before_fpos) = (edge_before.pos, edge_before.fpos);
        let scale = if edge_before.scale == 0 {
            let edge_after = edges.get(min_ix)?;
            let scale = fixed_div(edge_after.pos - before_pos, edge_after.fpos - before_fpos);
            edges[before_ix].scale = scale;
            scale
        } else {
            edge_before.scale
        };
        store_point(point, dim, before_pos + fixed_mul(u - before_fpos, scale));
        recorder.record(
            dim,
            &Action::IpBetween {
                point_ix,
                before_ix,
                after_ix: min_ix,
            },
        );
    }
    Some(())
}

/// Runs the edge, strong and weak point passes for one axis.
///
/// Returns `false` if any pass stopped early on a point index outside
/// the outline. The remaining passes still run.
pub(crate) fn align_points(
    outline: &mut Outline,
    axis: &mut Axis,
    recorder: &mut impl HintRecorder,
) -> bool {
    let edge_points = align_edge_points(outline, axis).is_some();
    let strong_points = align_strong_points(outline, axis, recorder).is_some();
    let weak_points = align_weak_points(outline, axis.dim).is_some();
    edge_points && strong_points && weak_points
}

/// Align the weak points; equivalent to the TrueType `IUP` instruction.
///
/// Untouched points are shifted or interpolated per contour using the
/// nearest touched points on either side.
pub(crate) fn align_weak_points(outline: &mut Outline, dim: Dimension) -> Option<()> {
    let touch_flag = touch_flag(dim);
    for point in &mut outline.points {
        (point.u, point.v) = if dim == Axis::HORIZONTAL {
            (point.x, point.ox)
        } else {
            (point.y, point.oy)
        };
    }
    for contour in &outline.contours {
        let points = outline.points.get_mut(contour.range())?;
        // Find first touched point
        let Some(first_touched_ix) = points
            .iter()
            .position(|point| point.flags & touch_flag != 0)
        else {
            continue;
        };
        let last_ix = points.len() - 1;
        let mut point_ix = first_touched_ix;
        let mut last_touched_ix;
        'outer: loop {
            // Skip any touched neighbors
            while point_ix < last_ix && points.get(point_ix + 1)?.flags & touch_flag != 0 {
                point_ix += 1;
            }
            last_touched_ix = point_ix;
            // Find the next touched point
            point_ix += 1;
            loop {
                if point_ix > last_ix {
                    break 'outer;
                }
                if points[point_ix].flags & touch_flag != 0 {
                    break;
                }
                point_ix += 1;
            }
            iup_interpolate(
                points,
                last_touched_ix + 1,
                point_ix - 1,
                last_touched_ix,
                point_ix,
            );
        }
        if last_touched_ix == first_touched_ix {
            // Only one point was touched
            iup_shift(points, 0, last_ix, first_touched_ix);
        } else {
            // Interpolate the remainder, wrapping around the contour
            if last_touched_ix < last_ix {
                iup_interpolate(
                    points,
                    last_touched_ix + 1,
                    last_ix,
                    last_touched_ix,
                    first_touched_ix,
                );
            }
            if first_touched_ix > 0 {
                iup_interpolate(
                    points,
                    0,
                    first_touched_ix - 1,
                    last_touched_ix,
                    first_touched_ix,
                );
            }
        }
    }
    // Save interpolated values
    for point in &mut outline.points {
        if dim == Axis::HORIZONTAL {
            point.x = point.u;
        } else {
            point.y = point.u;
        }
    }
    Some(())
}

#[inline(always)]
fn store_point(point: &mut Point, dim: Dimension, u: i32) {
    if dim == Axis::HORIZONTAL {
        point.x = u;
    } else {
        point.y = u;
    }
    point.flags |= touch_flag(dim);
}

/// Shift original coordinates of all points between `p1_ix` and `p2_ix`
/// (inclusive) by the same amount as the point at `ref_ix`.
///
/// The `u` and `v` members are the current and original coordinate values,
/// respectively.
fn iup_shift(points: &mut [Point], p1_ix: usize, p2_ix: usize, ref_ix: usize) -> Option<()> {
    let ref_point = points.get(ref_ix)?;
    let delta = ref_point.u - ref_point.v;
    if delta == 0 {
        return Some(());
    }
    for point in points.get_mut(p1_ix..ref_ix)? {
        point.u = point.v + delta;
    }
    for point in points.get_mut(ref_ix + 1..=p2_ix)? {
        point.u = point.v + delta;
    }
    Some(())
}

/// Interpolate the original coordinates of all points between `p1_ix` and
/// `p2_ix` (inclusive) using the points at `ref1_ix` and `ref2_ix` as
/// reference.
///
/// Points outside the reference range are shifted with the nearer
/// reference. When the references share a current or original coordinate,
/// points inside the range collapse onto that value.
fn iup_interpolate(
    points: &mut [Point],
    p1_ix: usize,
    p2_ix: usize,
    ref1_ix: usize,
    ref2_ix: usize,
) -> Option<()> {
    if p1_ix > p2_ix {
        return Some(());
    }
    let mut ref_point1 = points.get(ref1_ix)?;
    let mut ref_point2 = points.get(ref2_ix)?;
    if ref_point1.v > ref_point2.v {
        core::mem::swap(&mut ref_point1, &mut ref_point2);
    }
    let (u1, v1) = (ref_point1.u, ref_point1.v);
    let (u2, v2) = (ref_point2.u, ref_point2.v);
    let d1 = u1 - v1;
    let d2 = u2 - v2;
    let scale = (u1 != u2 && v1 != v2).then(|| fixed_div(u2 - u1, v2 - v1));
    for point in points.get_mut(p1_ix..=p2_ix)? {
        point.u = if point.v <= v1 {
            point.v + d1
        } else if point.v >= v2 {
            point.v + d2
        } else if let Some(scale) = scale {
            u1 + fixed_mul(point.v - v1, scale)
        } else {
            u1
        };
    }
    Some(())
}
