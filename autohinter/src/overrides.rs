//! Per-glyph segment overrides.
//!
//! These are pre-resolved control instructions: each entry forces the
//! outgoing direction of a point and can widen the one-point segment
//! that the point produces.

use crate::outline::Direction;

/// Forced direction for a single outline point.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentOverride {
    /// Index of the point in the glyph outline.
    pub point_ix: usize,
    /// New outgoing direction. [`Direction::None`] turns the point into a
    /// weak point, removing it from any segment.
    pub dir: Direction,
    /// Added to the minimum coordinate of a one-point segment, in font
    /// units.
    pub left_offset: i32,
    /// Added to the maximum coordinate of a one-point segment, in font
    /// units.
    pub right_offset: i32,
}

impl SegmentOverride {
    pub fn new(point_ix: usize, dir: Direction) -> Self {
        Self {
            point_ix,
            dir,
            left_offset: 0,
            right_offset: 0,
        }
    }

    /// Creates an override that produces a one-point segment extended by
    /// the given offsets.
    pub fn one_point(point_ix: usize, dir: Direction, left_offset: i32, right_offset: i32) -> Self {
        Self {
            point_ix,
            dir,
            left_offset,
            right_offset,
        }
    }
}

/// Overrides for one glyph, ordered by point index.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentOverrides {
    entries: Vec<SegmentOverride>,
}

impl SegmentOverrides {
    /// Creates the override set, ordering the entries by point index.
    ///
    /// Entries for the same point keep their relative order so the last
    /// one wins when applied.
    pub fn new(mut entries: Vec<SegmentOverride>) -> Self {
        entries.sort_by_key(|entry| entry.point_ix);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentOverride> + '_ {
        self.entries.iter()
    }
}

impl FromIterator<SegmentOverride> for SegmentOverrides {
    fn from_iter<T: IntoIterator<Item = SegmentOverride>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
