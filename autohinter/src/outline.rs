//! Outline representation and helpers for hinting.
//!
//! The source outline is converted to a set of points that carry a lot of
//! context: original, scaled and fitted coordinates, the directions of
//! the incoming and outgoing vectors and the links to neighbouring
//! points. Directions are computed in font units so the analysis does not
//! depend on the current size.

use crate::{
    error::HintError,
    fixed::fixed_mul,
    overrides::SegmentOverrides,
};

/// Hinting directions.
///
/// The values are such that `dir1 + dir2 == 0` when the directions are
/// opposite.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum Direction {
    #[default]
    None = 4,
    Right = 1,
    Left = -1,
    Up = 2,
    Down = -2,
}

impl Direction {
    /// Computes a direction from a vector.
    pub fn new(dx: i32, dy: i32) -> Self {
        let (dir, long_arm, short_arm) = if dy >= dx {
            if dy >= -dx {
                (Direction::Up, dy, dx)
            } else {
                (Direction::Left, -dx, dy)
            }
        } else if dy >= -dx {
            (Direction::Right, dx, dy)
        } else {
            (Direction::Down, -dy, dx)
        };
        // Return no direction if arm lengths do not differ enough.
        if long_arm <= 14 * short_arm.abs() {
            Direction::None
        } else {
            dir
        }
    }

    pub fn is_opposite(self, other: Self) -> bool {
        self as i8 + other as i8 == 0
    }

    pub fn is_same_axis(self, other: Self) -> bool {
        (self as i8).abs() == (other as i8).abs()
    }

    pub fn normalize(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Down => Self::Up,
            _ => self,
        }
    }
}

/// Winding order of the outer contours.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Orientation {
    /// Outer contours are drawn clockwise (filled on the right).
    TrueType,
    /// Outer contours are drawn counter-clockwise (filled on the left).
    PostScript,
}

/// Type of a point in the source outline.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum PointKind {
    #[default]
    OnCurve,
    /// Off curve point of a quadratic spline.
    Quad,
    /// Off curve point of a cubic spline.
    Cubic,
}

/// Point of an unhinted outline in font units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct UnscaledPoint {
    pub x: i32,
    pub y: i32,
    pub kind: PointKind,
}

impl UnscaledPoint {
    pub fn on_curve(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: PointKind::OnCurve,
        }
    }

    pub fn quad(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: PointKind::Quad,
        }
    }

    pub fn cubic(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: PointKind::Cubic,
        }
    }
}

/// An unhinted glyph outline: a list of points and the (inclusive) index
/// of the last point of each contour.
#[derive(Clone, Default, Debug)]
pub struct UnscaledOutline {
    pub points: Vec<UnscaledPoint>,
    pub contour_ends: Vec<usize>,
}

impl UnscaledOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an outline from points and contour end indices, verifying
    /// that the contour ends are strictly increasing and in range.
    pub fn from_parts(
        points: Vec<UnscaledPoint>,
        contour_ends: Vec<usize>,
    ) -> Result<Self, HintError> {
        let outline = Self {
            points,
            contour_ends,
        };
        outline.validate()?;
        Ok(outline)
    }

    /// Appends a closed contour made of the given points.
    pub fn push_contour(&mut self, points: impl IntoIterator<Item = UnscaledPoint>) {
        let start = self.points.len();
        self.points.extend(points);
        if self.points.len() > start {
            self.contour_ends.push(self.points.len() - 1);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.contour_ends.is_empty()
    }

    fn validate(&self) -> Result<(), HintError> {
        let num_points = self.points.len();
        let mut next_start = 0;
        for &end in &self.contour_ends {
            if end < next_start || end >= num_points {
                return Err(HintError::InvalidContour { end, num_points });
            }
            next_start = end + 1;
        }
        Ok(())
    }
}

/// Outline point with a lot of context for hinting.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Point {
    /// Describes the type and hinting state of the point.
    pub flags: u8,
    /// X coordinate in font units.
    pub fx: i32,
    /// Y coordinate in font units.
    pub fy: i32,
    /// Scaled X coordinate.
    pub ox: i32,
    /// Scaled Y coordinate.
    pub oy: i32,
    /// Hinted X coordinate.
    pub x: i32,
    /// Hinted Y coordinate.
    pub y: i32,
    /// Direction of inwards vector.
    pub in_dir: Direction,
    /// Direction of outwards vector.
    pub out_dir: Direction,
    /// Context dependent coordinate.
    pub u: i32,
    /// Context dependent coordinate.
    pub v: i32,
    /// Index of next point in contour.
    pub next_ix: usize,
    /// Index of previous point in contour.
    pub prev_ix: usize,
    /// Extends the minimum coordinate of a one-point segment.
    pub left_offset: i32,
    /// Extends the maximum coordinate of a one-point segment.
    pub right_offset: i32,
}

/// Point type flags.
impl Point {
    /// Quadratic control point.
    pub const QUAD: u8 = 1 << 0;
    /// Cubic control point.
    pub const CUBIC: u8 = 1 << 1;
    /// Any control point.
    pub const CONTROL: u8 = Self::QUAD | Self::CUBIC;
    /// Touched in x direction.
    pub const TOUCH_X: u8 = 1 << 2;
    /// Touched in y direction.
    pub const TOUCH_Y: u8 = 1 << 3;
    /// Candidate for weak interpolation.
    pub const WEAK_INTERPOLATION: u8 = 1 << 4;
}

impl Point {
    pub fn is_on_curve(&self) -> bool {
        self.flags & Self::CONTROL == 0
    }

    pub fn is_weak(&self) -> bool {
        self.flags & Self::WEAK_INTERPOLATION != 0
    }

    /// Returns the index of the next point in the contour.
    pub fn next(&self) -> usize {
        self.next_ix
    }

    /// Returns the index of the previous point in the contour.
    pub fn prev(&self) -> usize {
        self.prev_ix
    }
}

/// Inclusive range of points forming a closed contour.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Contour {
    first_ix: usize,
    last_ix: usize,
}

impl Contour {
    pub fn first(self) -> usize {
        self.first_ix
    }

    pub fn last(self) -> usize {
        self.last_ix
    }

    pub fn len(self) -> usize {
        self.last_ix - self.first_ix + 1
    }

    pub fn next(self, index: usize) -> usize {
        if index >= self.last_ix {
            self.first_ix
        } else {
            index + 1
        }
    }

    pub fn prev(self, index: usize) -> usize {
        if index <= self.first_ix {
            self.last_ix
        } else {
            index - 1
        }
    }

    pub fn range(self) -> core::ops::RangeInclusive<usize> {
        self.first_ix..=self.last_ix
    }
}

/// Point and contour arena for a single glyph.
///
/// Buffers are reused between glyphs: [`Outline::fill`] clears the
/// contents but keeps the allocations.
#[derive(Clone, Default, Debug)]
pub struct Outline {
    pub units_per_em: i32,
    pub orientation: Option<Orientation>,
    pub points: Vec<Point>,
    pub contours: Vec<Contour>,
}

impl Outline {
    /// Fills the outline from the given source, computing point
    /// directions and weak points in font units.
    ///
    /// Scaled and fitted coordinates are zero until [`Outline::scale`] is
    /// called.
    pub fn fill(&mut self, source: &UnscaledOutline, units_per_em: i32) -> Result<(), HintError> {
        self.clear();
        source.validate()?;
        self.units_per_em = units_per_em;
        self.points.try_reserve(source.points.len())?;
        self.contours.try_reserve(source.contour_ends.len())?;
        let mut first_ix = 0;
        for &last_ix in &source.contour_ends {
            self.contours.push(Contour { first_ix, last_ix });
            first_ix = last_ix + 1;
        }
        // Points after the last contour end don't belong to the outline
        for point in source.points.iter().take(first_ix) {
            let flags = match point.kind {
                PointKind::OnCurve => 0,
                PointKind::Quad => Point::QUAD,
                PointKind::Cubic => Point::CUBIC,
            };
            self.points.push(Point {
                flags,
                fx: point.x,
                fy: point.y,
                ..Default::default()
            });
        }
        for contour in &self.contours {
            for ix in contour.range() {
                let point = &mut self.points[ix];
                point.next_ix = contour.next(ix);
                point.prev_ix = contour.prev(ix);
            }
        }
        self.orientation = self.compute_orientation();
        // Heuristic value
        let near_limit = 20 * units_per_em / 2048;
        self.compute_directions(near_limit);
        self.simplify_topology();
        self.check_remaining_weak_points();
        log::trace!(
            "outline: {} points, {} contours, orientation {:?}",
            self.points.len(),
            self.contours.len(),
            self.orientation
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.units_per_em = 0;
        self.orientation = None;
        self.points.clear();
        self.contours.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.contours.is_empty()
    }

    /// Computes scaled coordinates and resets the fitted coordinates and
    /// touch flags.
    pub fn scale(&mut self, x_scale: i32, x_delta: i32, y_scale: i32, y_delta: i32) {
        for point in &mut self.points {
            point.ox = fixed_mul(point.fx, x_scale) + x_delta;
            point.oy = fixed_mul(point.fy, y_scale) + y_delta;
            point.x = point.ox;
            point.y = point.oy;
            point.flags &= !(Point::TOUCH_X | Point::TOUCH_Y);
        }
    }

    /// Applies forced directions and one-point segment offsets.
    ///
    /// Entries with out of range point indices are skipped; validating
    /// them is the job of whoever produced the overrides.
    pub fn apply_overrides(&mut self, overrides: &SegmentOverrides) {
        for entry in overrides.iter() {
            let Some(point) = self.points.get_mut(entry.point_ix) else {
                log::warn!(
                    "ignoring segment override for point {} (outline has {} points)",
                    entry.point_ix,
                    self.points.len()
                );
                continue;
            };
            point.out_dir = entry.dir;
            if entry.dir == Direction::None {
                point.flags |= Point::WEAK_INTERPOLATION;
            } else {
                point.flags &= !Point::WEAK_INTERPOLATION;
            }
            point.left_offset = entry.left_offset;
            point.right_offset = entry.right_offset;
        }
    }
}

impl Outline {
    /// Determines the winding order from the sign of the enclosed area.
    fn compute_orientation(&self) -> Option<Orientation> {
        let first = self.points.first()?;
        let (mut x_min, mut x_max) = (first.fx, first.fx);
        let (mut y_min, mut y_max) = (first.fy, first.fy);
        for point in &self.points {
            x_min = x_min.min(point.fx);
            x_max = x_max.max(point.fx);
            y_min = y_min.min(point.fy);
            y_max = y_max.max(point.fy);
        }
        if x_min == x_max || y_min == y_max {
            return None;
        }
        // Reduce precision to avoid overflow in the area computation
        fn shift_for(min: i32, max: i32) -> u32 {
            let bits = min.unsigned_abs() | max.unsigned_abs();
            let msb = 31 - bits.leading_zeros() as i32;
            (msb - 14).max(0) as u32
        }
        let x_shift = shift_for(x_min, x_max);
        let y_shift = shift_for(y_min, y_max);
        let mut area = 0i64;
        for contour in &self.contours {
            let mut prev = self.points[contour.last()];
            for point in &self.points[contour.range()] {
                let dy = (point.fy - prev.fy) >> y_shift;
                let sx = (point.fx + prev.fx) >> x_shift;
                area += dy as i64 * sx as i64;
                prev = *point;
            }
        }
        match area {
            area if area > 0 => Some(Orientation::PostScript),
            area if area < 0 => Some(Orientation::TrueType),
            _ => None,
        }
    }

    /// Compute directions of in and out vectors.
    ///
    /// Distances between points that are very near to each other are
    /// accumulated and all intermediate points are tagged as weak.
    fn compute_directions(&mut self, near_limit: i32) {
        let near_limit2 = 2 * near_limit - 1;
        let points = self.points.as_mut_slice();
        for contour in &self.contours {
            // Walk backward to find the first non-near point.
            let mut first_ix = contour.first();
            let mut prev_ix = contour.prev(first_ix);
            let mut point = points[first_ix];
            while prev_ix != contour.first() {
                let prev = points[prev_ix];
                let out_x = point.fx - prev.fx;
                let out_y = point.fy - prev.fy;
                if out_x.abs() + out_y.abs() >= near_limit2 {
                    break;
                }
                point = prev;
                first_ix = prev_ix;
                prev_ix = contour.prev(prev_ix);
            }
            // Abuse u and v fields to store the indices of the next and
            // previous non-near points, respectively.
            let first = &mut points[first_ix];
            first.u = first_ix as i32;
            first.v = first_ix as i32;
            let mut next_ix = first_ix;
            let mut ix = first_ix;
            let mut out_x = 0;
            let mut out_y = 0;
            loop {
                let point_ix = next_ix;
                next_ix = contour.next(point_ix);
                let point = points[point_ix];
                let next = &mut points[next_ix];
                // Accumulate the deltas until we surpass near_limit
                out_x += next.fx - point.fx;
                out_y += next.fy - point.fy;
                if out_x.abs() + out_y.abs() < near_limit {
                    next.flags |= Point::WEAK_INTERPOLATION;
                    if next_ix == first_ix {
                        break;
                    }
                    continue;
                }
                let out_dir = Direction::new(out_x, out_y);
                next.in_dir = out_dir;
                next.v = ix as i32;
                let cur = &mut points[ix];
                cur.u = next_ix as i32;
                cur.out_dir = out_dir;
                // Adjust directions for all intermediate points
                let mut inter_ix = contour.next(ix);
                while inter_ix != next_ix {
                    let point = &mut points[inter_ix];
                    point.in_dir = out_dir;
                    point.out_dir = out_dir;
                    inter_ix = contour.next(inter_ix);
                }
                ix = next_ix;
                points[ix].u = first_ix as i32;
                points[first_ix].v = ix as i32;
                out_x = 0;
                out_y = 0;
                if next_ix == first_ix {
                    break;
                }
            }
        }
    }

    /// Simplify so that we can identify local extrema more reliably.
    ///
    /// A series of non-horizontal and non-vertical vectors pointing into
    /// the same quadrant is handled as a single long vector.
    fn simplify_topology(&mut self) {
        let points = self.points.as_mut_slice();
        for i in 0..points.len() {
            let point = points[i];
            if point.is_weak() {
                continue;
            }
            if point.in_dir == Direction::None && point.out_dir == Direction::None {
                let u_index = point.u as usize;
                let v_index = point.v as usize;
                let next_u = points[u_index];
                let prev_v = points[v_index];
                let in_x = point.fx - prev_v.fx;
                let in_y = point.fy - prev_v.fy;
                let out_x = next_u.fx - point.fx;
                let out_y = next_u.fy - point.fy;
                if (in_x ^ out_x) >= 0 && (in_y ^ out_y) >= 0 {
                    // Both vectors point into the same quadrant
                    points[i].flags |= Point::WEAK_INTERPOLATION;
                    points[v_index].u = u_index as i32;
                    points[u_index].v = v_index as i32;
                }
            }
        }
    }

    /// Check for remaining weak points.
    ///
    /// Everything not tagged here is implicitly a strong point.
    fn check_remaining_weak_points(&mut self) {
        let points = self.points.as_mut_slice();
        for i in 0..points.len() {
            let point = points[i];
            let mut make_weak = false;
            if point.is_weak() {
                continue;
            }
            if point.flags & Point::CONTROL != 0 {
                // Control points are always weak
                make_weak = true;
            } else if point.out_dir == point.in_dir {
                if point.out_dir != Direction::None {
                    // Point lies on a vertical or horizontal segment but
                    // not at start or end
                    make_weak = true;
                } else {
                    let u_index = point.u as usize;
                    let v_index = point.v as usize;
                    let next_u = points[u_index];
                    let prev_v = points[v_index];
                    if is_corner_flat(
                        point.fx - prev_v.fx,
                        point.fy - prev_v.fy,
                        next_u.fx - point.fx,
                        next_u.fy - point.fy,
                    ) {
                        // One of the vectors is more dominant
                        make_weak = true;
                        points[v_index].u = u_index as i32;
                        points[u_index].v = v_index as i32;
                    }
                }
            } else if point.in_dir.is_opposite(point.out_dir) {
                // Point forms a "spike"
                make_weak = true;
            }
            if make_weak {
                points[i].flags |= Point::WEAK_INTERPOLATION;
            }
        }
    }
}

/// Returns true if the corner formed by the two vectors is nearly flat,
/// using taxicab lengths.
fn is_corner_flat(in_x: i32, in_y: i32, out_x: i32, out_y: i32) -> bool {
    let d_in = in_x.abs() + in_y.abs();
    let d_out = out_x.abs() + out_y.abs();
    let d_corner = (in_x + out_x).abs() + (in_y + out_y).abs();
    (d_in + d_out - d_corner) < (d_corner >> 4)
}
