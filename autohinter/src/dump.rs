//! Debug tables for segments and edges.
//!
//! These are only formatted when trace logging is enabled.

use crate::{
    axis::{Axis, Segment},
    outline::Direction,
};
use core::fmt;

fn axis_name(axis: &Axis) -> &'static str {
    // The horizontal dimension holds vertical segments and edges
    if axis.dim == Axis::HORIZONTAL {
        "vertical"
    } else {
        "horizontal"
    }
}

fn dir_str(dir: Direction) -> &'static str {
    match dir {
        Direction::None => "none",
        Direction::Right => "right",
        Direction::Left => "left",
        Direction::Up => "up",
        Direction::Down => "down",
    }
}

fn index_str(ix: Option<u16>) -> String {
    ix.map(|ix| ix.to_string()).unwrap_or_else(|| "--".into())
}

struct Flags(u8);

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Segment::ROUND, "round"),
            (Segment::SERIF, "serif"),
            (Segment::DONE, "done"),
            (Segment::NEUTRAL, "neutral"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.0 & flag != 0 {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("normal")?;
        }
        Ok(())
    }
}

/// Formats the segments of an axis as a table, one row per segment.
pub struct SegmentTable<'a>(pub &'a Axis);

impl fmt::Display for SegmentTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = self.0;
        writeln!(f, "Table of {} segments:", axis_name(axis))?;
        if axis.segments.is_empty() {
            return writeln!(f, "  (none)");
        }
        writeln!(
            f,
            "  index   pos   delta    dir   from    to  link  serif  edge  height  extra  flags"
        )?;
        for (ix, segment) in axis.segments.iter().enumerate() {
            writeln!(
                f,
                "  {:5}  {:5}  {:5}  {:>5}  {:4}  {:4}  {:>4}  {:>5}  {:>4}  {:6}  {:5}  {}",
                ix,
                segment.pos,
                segment.delta,
                dir_str(segment.dir),
                segment.first(),
                segment.last(),
                index_str(segment.link_ix),
                index_str(segment.serif_ix),
                index_str(segment.edge_ix),
                segment.height,
                segment.height - (segment.max_coord - segment.min_coord),
                Flags(segment.flags)
            )?;
        }
        Ok(())
    }
}

/// Formats the edges of an axis as a table, one row per edge.
///
/// Positions are printed in pixels.
pub struct EdgeTable<'a>(pub &'a Axis);

impl fmt::Display for EdgeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = self.0;
        writeln!(f, "Table of {} edges:", axis_name(axis))?;
        if axis.edges.is_empty() {
            return writeln!(f, "  (none)");
        }
        writeln!(
            f,
            "  index    fpos     dir  link  serif  blue     opos      pos  flags"
        )?;
        for (ix, edge) in axis.edges.iter().enumerate() {
            writeln!(
                f,
                "  {:5}  {:6}  {:>5}  {:>4}  {:>5}  {:>4}  {:7.2}  {:7.2}  {}",
                ix,
                edge.fpos,
                dir_str(edge.dir),
                index_str(edge.link_ix),
                index_str(edge.serif_ix),
                if edge.blue_edge.is_some() { "y" } else { "n" },
                edge.opos as f64 / 64.0,
                edge.pos as f64 / 64.0,
                Flags(edge.flags)
            )?;
        }
        Ok(())
    }
}
