//! Segments and edges for one dimension of an outline.

use crate::{
    error::HintError,
    metrics::ScaledWidth,
    outline::{Direction, Orientation, Point},
};

/// Either horizontal or vertical.
///
/// A type alias because it's used as an index.
pub type Dimension = usize;

/// Segments and edges for one dimension of an outline.
#[derive(Clone, Default, Debug)]
pub struct Axis {
    /// Either horizontal or vertical.
    pub dim: Dimension,
    /// Depends on dimension and outline orientation.
    pub major_dir: Direction,
    /// Collection of segments for the axis.
    pub segments: Vec<Segment>,
    /// Collection of edges for the axis.
    pub edges: Vec<Edge>,
}

impl Axis {
    /// X coordinates, i.e. vertical segments and edges.
    pub const HORIZONTAL: Dimension = 0;
    /// Y coordinates, i.e. horizontal segments and edges.
    pub const VERTICAL: Dimension = 1;
}

impl Axis {
    pub fn new(dim: Dimension, orientation: Option<Orientation>) -> Self {
        let mut axis = Self::default();
        axis.reset(dim, orientation);
        axis
    }

    pub fn reset(&mut self, dim: Dimension, orientation: Option<Orientation>) {
        self.dim = dim;
        self.major_dir = match (dim, orientation) {
            (Self::HORIZONTAL, Some(Orientation::PostScript)) => Direction::Down,
            (Self::VERTICAL, Some(Orientation::PostScript)) => Direction::Right,
            (Self::HORIZONTAL, _) => Direction::Up,
            (Self::VERTICAL, _) => Direction::Left,
            _ => Direction::None,
        };
        self.segments.clear();
        self.edges.clear();
    }

    /// Appends a segment, growing the buffer fallibly.
    pub fn push_segment(&mut self, segment: Segment) -> Result<(), HintError> {
        self.segments.try_reserve(1)?;
        self.segments.push(segment);
        Ok(())
    }
}

impl Axis {
    /// Inserts the given edge into the sorted edge list.
    ///
    /// Edges are sorted by ascending position, or descending position for
    /// top to bottom hinting.
    pub fn insert_edge(&mut self, edge: Edge, top_to_bottom_hinting: bool) -> Result<(), HintError> {
        self.edges.try_reserve(1)?;
        self.edges.push(edge);
        let edges = self.edges.as_mut_slice();
        // If this is the first edge, we're done.
        if edges.len() == 1 {
            return Ok(());
        }
        // Now move it into place
        let mut ix = edges.len() - 1;
        while ix > 0 {
            let prev_ix = ix - 1;
            let prev_fpos = edges[prev_ix].fpos;
            if (top_to_bottom_hinting && prev_fpos > edge.fpos)
                || (!top_to_bottom_hinting && prev_fpos < edge.fpos)
            {
                break;
            }
            // Edges with the same position and minor direction should appear
            // before those with the major direction
            if prev_fpos == edge.fpos && edge.dir == self.major_dir {
                break;
            }
            edges[ix] = edges[prev_ix];
            ix -= 1;
        }
        edges[ix] = edge;
        Ok(())
    }

    /// Links the given segment and edge.
    pub fn append_segment_to_edge(&mut self, segment_ix: usize, edge_ix: usize) {
        let edge = &mut self.edges[edge_ix];
        let first_ix = edge.first_ix;
        let last_ix = edge.last_ix;
        edge.last_ix = segment_ix as u16;
        let segment = &mut self.segments[segment_ix];
        segment.edge_next_ix = Some(first_ix);
        self.segments[last_ix as usize].edge_next_ix = Some(segment_ix as u16);
    }

    /// Returns an iterator over the segments that belong to the given
    /// edge, in list order.
    pub fn edge_segments(&self, edge: &Edge) -> EdgeSegments<'_> {
        EdgeSegments {
            segments: &self.segments,
            next_ix: Some(edge.first_ix as usize),
            last_ix: edge.last_ix as usize,
        }
    }
}

/// Iterator over the segments of an edge.
pub struct EdgeSegments<'a> {
    segments: &'a [Segment],
    next_ix: Option<usize>,
    last_ix: usize,
}

impl<'a> Iterator for EdgeSegments<'a> {
    type Item = (usize, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let ix = self.next_ix?;
        let segment = self.segments.get(ix)?;
        self.next_ix = if ix == self.last_ix {
            None
        } else {
            Some(
                segment
                    .edge_next_ix
                    .map(|ix| ix as usize)
                    .unwrap_or(self.last_ix),
            )
        };
        Some((ix, segment))
    }
}

/// Sequence of points with a single dominant direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Segment {
    /// Flags describing the properties of the segment.
    pub flags: u8,
    /// Dominant direction of the segment.
    pub dir: Direction,
    /// Position of the segment.
    pub pos: i32,
    /// Deviation from segment position.
    pub delta: i32,
    /// Minimum coordinate of the segment.
    pub min_coord: i32,
    /// Maximum coordinate of the segment.
    pub max_coord: i32,
    /// Hinted segment height.
    pub height: i32,
    /// Used during stem matching.
    pub score: i32,
    /// Index of best candidate for a stem link.
    pub link_ix: Option<u16>,
    /// Index of best candidate for a serif link.
    pub serif_ix: Option<u16>,
    /// Index of first point in the outline.
    pub first_ix: usize,
    /// Index of last point in the outline.
    pub last_ix: usize,
    /// Index of edge that is associated with the segment.
    pub edge_ix: Option<u16>,
    /// Index of next segment in edge's segment list.
    pub edge_next_ix: Option<u16>,
}

/// Segment flags.
///
/// Note: these are the same as edge flags.
impl Segment {
    pub const NORMAL: u8 = 0;
    pub const ROUND: u8 = 1;
    pub const SERIF: u8 = 2;
    pub const DONE: u8 = 4;
    pub const NEUTRAL: u8 = 8;
}

impl Segment {
    pub fn first(&self) -> usize {
        self.first_ix
    }

    pub fn first_point<'a>(&self, points: &'a [Point]) -> &'a Point {
        &points[self.first()]
    }

    pub fn last(&self) -> usize {
        self.last_ix
    }

    pub fn last_point<'a>(&self, points: &'a [Point]) -> &'a Point {
        &points[self.last()]
    }

    /// A segment generated by a single point has no extent unless the
    /// point carries offsets.
    pub fn is_one_point(&self) -> bool {
        self.min_coord == self.max_coord
    }

    pub fn edge<'a>(&self, edges: &'a [Edge]) -> Option<&'a Edge> {
        edges.get(self.edge_ix.map(|ix| ix as usize)?)
    }

    pub fn link<'a>(&self, segments: &'a [Segment]) -> Option<&'a Segment> {
        segments.get(self.link_ix.map(|ix| ix as usize)?)
    }
}

/// Sequence of segments used for grid-fitting.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Edge {
    /// Original, unscaled position in font units.
    pub fpos: i32,
    /// Original, scaled position.
    pub opos: i32,
    /// Current position.
    pub pos: i32,
    /// Edge flags.
    pub flags: u8,
    /// Edge direction.
    pub dir: Direction,
    /// Present if this is a blue edge.
    pub blue_edge: Option<ScaledWidth>,
    /// Index of the matched blue zone.
    pub best_blue_ix: Option<u16>,
    /// True if the overshoot of the matched zone was closer than the
    /// reference.
    pub best_blue_is_shoot: bool,
    /// Index of linked edge.
    pub link_ix: Option<u16>,
    /// Index of primary edge for serif.
    pub serif_ix: Option<u16>,
    /// Used to speed up edge interpolation.
    pub scale: i32,
    /// Index of first segment in edge.
    pub first_ix: u16,
    /// Index of last segment in edge.
    pub last_ix: u16,
}

/// Edge flags.
///
/// Note: these are the same as segment flags.
impl Edge {
    pub const NORMAL: u8 = Segment::NORMAL;
    pub const ROUND: u8 = Segment::ROUND;
    pub const SERIF: u8 = Segment::SERIF;
    pub const DONE: u8 = Segment::DONE;
    pub const NEUTRAL: u8 = Segment::NEUTRAL;
}

impl Edge {
    pub fn link<'a>(&self, edges: &'a [Edge]) -> Option<&'a Edge> {
        edges.get(self.link_ix.map(|ix| ix as usize)?)
    }

    pub fn serif<'a>(&self, edges: &'a [Edge]) -> Option<&'a Edge> {
        edges.get(self.serif_ix.map(|ix| ix as usize)?)
    }

    pub fn is_done(&self) -> bool {
        self.flags & Self::DONE != 0
    }
}
