//! Latin segment computation and linking.
//!
//! A segment is a series of consecutive points that are appropriately
//! aligned along a coordinate axis. A single point can also form a
//! segment when its outgoing direction was forced by an override.
//!
//! The linking stage associates pairs of segments to form stems and
//! identifies serifs with a post-process pass.

use crate::{
    axis::{Axis, Dimension, Segment},
    error::HintError,
    fixed::derived_constant,
    outline::{Outline, Point},
};

// Bounds for score, position and coordinate values.
const MAX_SCORE: i32 = 32000;
const MIN_SCORE: i32 = -32000;

/// Maximum number of segments per axis.
pub(crate) const MAX_SEGMENTS: usize = 1000;

/// Computes segments for the Latin writing system.
///
/// On [`HintError::TooManySegments`], the axis is left without segments.
pub(crate) fn compute_segments(outline: &mut Outline, axis: &mut Axis) -> Result<(), HintError> {
    assign_point_uvs(outline, axis.dim);
    if let Err(e) = build_segments(outline, axis) {
        axis.segments.clear();
        return Err(e);
    }
    adjust_segment_heights(outline, axis);
    Ok(())
}

/// Link segments to form stems and serifs.
///
/// If `max_width` is provided, use it to refine the scoring function.
pub(crate) fn link_segments(outline: &Outline, axis: &mut Axis, max_width: Option<i32>) {
    let max_width = max_width.unwrap_or_default();
    // Heuristic value to set up a minimum for overlapping
    let len_threshold = derived_constant(outline.units_per_em, 8).max(1);
    // Heuristic value to weight lengths
    let len_score = derived_constant(outline.units_per_em, 6000);
    // Heuristic value to weight distances (not a latin constant since
    // it works on multiples of stem width)
    let dist_score = 3000;
    // Compare each segment to the others.. O(n^2)
    let segments = axis.segments.as_mut_slice();
    for ix1 in 0..segments.len() {
        let seg1 = segments[ix1];
        if seg1.dir != axis.major_dir {
            continue;
        }
        let pos1 = seg1.pos;
        // Search for stems having opposite directions with seg1 to the
        // "left" of seg2
        for ix2 in 0..segments.len() {
            let seg1 = segments[ix1];
            let seg2 = segments[ix2];
            let pos2 = seg2.pos;
            if !seg1.dir.is_opposite(seg2.dir) || pos2 <= pos1 {
                continue;
            }
            // Note: the min/max functions chosen here are intentional
            let min = seg1.min_coord.max(seg2.min_coord);
            let max = seg1.max_coord.min(seg2.max_coord);
            // How much they overlap
            let mut len = max - min;
            // One-point segments touching the other segment have zero
            // overlap
            if len == 0 && (seg1.is_one_point() || seg2.is_one_point()) {
                len = len_threshold;
            }
            if len < len_threshold {
                continue;
            }
            // The score is the sum of two demerits: less overlap along the
            // main axis is worse and a distance further from the largest
            // stem width is worse.
            let dist = pos2 - pos1;
            let dist_demerit = if max_width != 0 {
                // Distance demerits are based on multiples of max_width
                let delta = (dist << 10) / max_width - (1 << 10);
                if delta > 10_000 {
                    MAX_SCORE
                } else if delta > 0 {
                    delta * delta / dist_score
                } else {
                    0
                }
            } else {
                dist
            };
            let score = dist_demerit + len_score / len;
            if score < seg1.score {
                let seg1 = &mut segments[ix1];
                seg1.score = score;
                seg1.link_ix = Some(ix2 as u16);
            }
            if score < seg2.score {
                let seg2 = &mut segments[ix2];
                seg2.score = score;
                seg2.link_ix = Some(ix1 as u16);
            }
        }
    }
    // Now compute "serif" segments
    for ix1 in 0..segments.len() {
        let Some(ix2) = segments[ix1].link_ix else {
            continue;
        };
        let seg2_link = segments[ix2 as usize].link_ix;
        if seg2_link != Some(ix1 as u16) {
            let seg1 = &mut segments[ix1];
            seg1.link_ix = None;
            seg1.serif_ix = seg2_link;
        }
    }
}

/// Set the (u, v) values to font unit coords for each point depending
/// on the axis dimension.
fn assign_point_uvs(outline: &mut Outline, dim: Dimension) {
    if dim == Axis::HORIZONTAL {
        for point in &mut outline.points {
            point.u = point.fx;
            point.v = point.fy;
        }
    } else {
        for point in &mut outline.points {
            point.u = point.fy;
            point.v = point.fx;
        }
    }
}

/// Build the set of segments for each contour.
fn build_segments(outline: &Outline, axis: &mut Axis) -> Result<(), HintError> {
    let flat_threshold = outline.units_per_em / 14;
    axis.segments.clear();
    let major_dir = axis.major_dir.normalize();
    let mut segment_dir = major_dir;
    let points = outline.points.as_slice();
    for contour in &outline.contours {
        let is_single_point_contour = contour.len() == 1;
        let mut point_ix = contour.first();
        let mut last_ix = contour.prev(point_ix);
        let mut state = State::default();
        let mut prev_state = state;
        let mut prev_segment_ix: Option<usize> = None;
        let mut segment_ix = 0;
        // Check if we're starting on an edge and if so, find
        // the starting point
        if points[point_ix].out_dir.is_same_axis(major_dir)
            && points[last_ix].out_dir.is_same_axis(major_dir)
        {
            last_ix = point_ix;
            loop {
                point_ix = contour.prev(point_ix);
                if !points[point_ix].out_dir.is_same_axis(major_dir) {
                    point_ix = contour.next(point_ix);
                    break;
                }
                if point_ix == last_ix {
                    break;
                }
            }
        }
        last_ix = point_ix;
        let mut on_edge = false;
        let mut passed = false;
        loop {
            if on_edge {
                let point = &points[point_ix];
                state.add_point(point);
                if point.out_dir != segment_dir || point_ix == last_ix {
                    match prev_segment_ix {
                        Some(prev_ix)
                            if axis.segments[segment_ix].first_ix
                                == axis.segments[prev_ix].last_ix =>
                        {
                            // The new segment starts where the previous
                            // one ended: a spike
                            merge_spike(
                                points,
                                axis,
                                point_ix,
                                (prev_ix, &mut prev_state),
                                (segment_ix, &mut state),
                                flat_threshold,
                            );
                        }
                        _ => {
                            // We are leaving an edge, so record a new
                            // segment
                            let segment = &mut axis.segments[segment_ix];
                            segment.last_ix = point_ix;
                            state.apply_to_segment(segment, flat_threshold);
                            prev_segment_ix = Some(segment_ix);
                            prev_state = state;
                        }
                    }
                    on_edge = false;
                }
            }
            if point_ix == last_ix {
                if passed {
                    break;
                }
                passed = true;
            }
            let point = &points[point_ix];
            if !on_edge && (point.out_dir.is_same_axis(major_dir) || is_single_point_contour) {
                if axis.segments.len() >= MAX_SEGMENTS {
                    log::warn!(
                        "too many segments on axis {}, giving up on this dimension",
                        axis.dim
                    );
                    return Err(HintError::TooManySegments {
                        dim: axis.dim,
                        count: axis.segments.len() + 1,
                    });
                }
                segment_ix = axis.segments.len();
                segment_dir = point.out_dir;
                let mut segment = Segment {
                    dir: segment_dir,
                    first_ix: point_ix,
                    last_ix: point_ix,
                    score: MAX_SCORE,
                    ..Default::default()
                };
                state.start(point);
                on_edge = true;
                if is_single_point_contour || point.out_dir != points[point.next()].in_dir {
                    // A one-point segment, optionally widened along the
                    // segment direction
                    segment.pos = point.u;
                    if !point.is_on_curve() {
                        segment.flags |= Segment::ROUND;
                    }
                    segment.min_coord = point.v + point.left_offset;
                    segment.max_coord = point.v + point.right_offset;
                    segment.height = 0;
                    on_edge = false;
                }
                axis.push_segment(segment)?;
            }
            point_ix = contour.next(point_ix);
        }
    }
    Ok(())
}

/// Merges the segment at `cur` into the one at `prev` when the former
/// starts on the last point of the latter.
fn merge_spike(
    points: &[Point],
    axis: &mut Axis,
    point_ix: usize,
    prev: (usize, &mut State),
    cur: (usize, &mut State),
    flat_threshold: i32,
) {
    let (prev_ix, prev_state) = prev;
    let (segment_ix, state) = cur;
    let point = &points[point_ix];
    if axis.segments[prev_ix].last_point(points).in_dir == point.in_dir {
        // We have identical directions; unify segments and update
        // constraints
        state.min_pos = prev_state.min_pos.min(state.min_pos);
        state.max_pos = prev_state.max_pos.max(state.max_pos);
        if prev_state.min_coord < state.min_coord {
            state.min_coord = prev_state.min_coord;
            state.min_flags = prev_state.min_flags;
        }
        if prev_state.max_coord > state.max_coord {
            state.max_coord = prev_state.max_coord;
            state.max_flags = prev_state.max_flags;
        }
        state.min_on_coord = prev_state.min_on_coord.min(state.min_on_coord);
        state.max_on_coord = prev_state.max_on_coord.max(state.max_on_coord);
        let prev_segment = &mut axis.segments[prev_ix];
        prev_segment.last_ix = point_ix;
        state.apply_to_segment(prev_segment, flat_threshold);
    } else if (prev_state.max_coord - prev_state.min_coord).abs()
        > (state.max_coord - state.min_coord).abs()
    {
        // Different directions: keep the longer segment, here the
        // previous one
        prev_state.min_pos = prev_state.min_pos.min(state.min_pos);
        prev_state.max_pos = prev_state.max_pos.max(state.max_pos);
        let prev_segment = &mut axis.segments[prev_ix];
        prev_segment.last_ix = point_ix;
        prev_segment.pos = (prev_state.min_pos + prev_state.max_pos) >> 1;
        prev_segment.delta = (prev_state.max_pos - prev_state.min_pos) >> 1;
    } else {
        // Discard previous segment
        state.min_pos = state.min_pos.min(prev_state.min_pos);
        state.max_pos = state.max_pos.max(prev_state.max_pos);
        let mut segment = axis.segments[segment_ix];
        segment.last_ix = point_ix;
        state.apply_to_segment(&mut segment, flat_threshold);
        axis.segments[prev_ix] = segment;
        *prev_state = *state;
    }
    axis.segments.pop();
}

/// Slightly increase the height of segments when it makes sense to better
/// detect and ignore serifs.
fn adjust_segment_heights(outline: &Outline, axis: &mut Axis) {
    let points = outline.points.as_slice();
    for segment in &mut axis.segments {
        let first = segment.first_point(points);
        let last = segment.last_point(points);
        let prev = &points[first.prev()];
        let next = &points[last.next()];
        if first.v < last.v {
            if prev.v < first.v {
                segment.height += (first.v - prev.v) >> 1;
            }
            if next.v > last.v {
                segment.height += (next.v - last.v) >> 1;
            }
        } else {
            if prev.v > first.v {
                segment.height += (prev.v - first.v) >> 1;
            }
            if next.v < last.v {
                segment.height += (last.v - next.v) >> 1;
            }
        }
    }
}

/// Capture current and previous state while computing segments.
///
/// Values measured along a segment (point.v) are called "coordinates" and
/// values orthogonal to it (point.u) are called "positions"
#[derive(Copy, Clone)]
struct State {
    min_pos: i32,
    max_pos: i32,
    min_coord: i32,
    max_coord: i32,
    min_flags: u8,
    max_flags: u8,
    min_on_coord: i32,
    max_on_coord: i32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            min_pos: MAX_SCORE,
            max_pos: MIN_SCORE,
            min_coord: MAX_SCORE,
            max_coord: MIN_SCORE,
            min_flags: 0,
            max_flags: 0,
            min_on_coord: MAX_SCORE,
            max_on_coord: MIN_SCORE,
        }
    }
}

impl State {
    fn start(&mut self, point: &Point) {
        self.min_pos = point.u;
        self.max_pos = point.u;
        self.min_coord = point.v;
        self.max_coord = point.v;
        self.min_flags = point.flags;
        self.max_flags = point.flags;
        if point.is_on_curve() {
            self.min_on_coord = point.v;
            self.max_on_coord = point.v;
        } else {
            self.min_on_coord = MAX_SCORE;
            self.max_on_coord = MIN_SCORE;
        }
    }

    fn add_point(&mut self, point: &Point) {
        self.min_pos = self.min_pos.min(point.u);
        self.max_pos = self.max_pos.max(point.u);
        let v = point.v;
        if v < self.min_coord {
            self.min_coord = v;
            self.min_flags = point.flags;
        }
        if v > self.max_coord {
            self.max_coord = v;
            self.max_flags = point.flags;
        }
        if point.is_on_curve() {
            self.min_on_coord = self.min_on_coord.min(v);
            self.max_on_coord = self.max_on_coord.max(v);
        }
    }

    fn apply_to_segment(&self, segment: &mut Segment, flat_threshold: i32) {
        segment.pos = (self.min_pos + self.max_pos) >> 1;
        segment.delta = (self.max_pos - self.min_pos) >> 1;
        // A segment is round if either end point is a control and the
        // length of the on points in between fits within a heuristic
        // limit.
        let is_control = |flags: u8| flags & Point::CONTROL != 0;
        if (is_control(self.min_flags) || is_control(self.max_flags))
            && (self.max_on_coord - self.min_on_coord) < flat_threshold
        {
            segment.flags |= Segment::ROUND;
        }
        segment.min_coord = self.min_coord;
        segment.max_coord = self.max_coord;
        segment.height = segment.max_coord - segment.min_coord;
    }
}
