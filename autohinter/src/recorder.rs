//! Trace of alignment decisions.
//!
//! Every time the edge or point aligner fixes a position it reports what
//! it did and which edges took part. A bytecode generator consumes this
//! trace to reproduce the same decisions at render time.

use crate::axis::{Axis, Dimension};

/// A single alignment decision.
///
/// Edge indices refer to the edges of the axis passed alongside the
/// action; point indices refer to the glyph outline.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Strong point before the first edge, shifted with it.
    IpBefore { point_ix: usize },
    /// Strong point after the last edge, shifted with it.
    IpAfter { point_ix: usize },
    /// Strong point lying on an edge.
    IpOn { point_ix: usize, edge_ix: usize },
    /// Strong point interpolated between two edges.
    IpBetween {
        point_ix: usize,
        before_ix: usize,
        after_ix: usize,
    },
    /// First blue edge of the glyph, which also becomes the anchor.
    /// `anchor_ix` is the edge that started the stem, which differs from
    /// `edge_ix` when only the linked edge had a blue zone.
    BlueAnchor { edge_ix: usize, anchor_ix: usize },
    /// Edge snapped to a blue zone.
    Blue { edge_ix: usize },
    /// First stem of the glyph, rounded on its own.
    Anchor { edge_ix: usize, link_ix: usize },
    /// Edge placed at a fitted width from its already aligned partner.
    Adjust {
        edge_ix: usize,
        link_ix: usize,
        bound_ix: Option<usize>,
    },
    /// Stem placed relative to the anchor.
    Stem {
        edge_ix: usize,
        link_ix: usize,
        bound_ix: Option<usize>,
    },
    /// Stem edge placed at a fitted width from the base edge.
    Link { base_ix: usize, stem_ix: usize },
    /// Serif edge shifted along with its base edge.
    Serif {
        edge_ix: usize,
        lower_bound_ix: Option<usize>,
        upper_bound_ix: Option<usize>,
    },
    /// Lone edge rounded on its own, becoming the anchor.
    SerifAnchor {
        edge_ix: usize,
        lower_bound_ix: Option<usize>,
        upper_bound_ix: Option<usize>,
    },
    /// Lone edge interpolated between the nearest aligned edges.
    SerifLink1 {
        edge_ix: usize,
        before_ix: usize,
        after_ix: usize,
        lower_bound_ix: Option<usize>,
        upper_bound_ix: Option<usize>,
    },
    /// Lone edge placed relative to the anchor.
    SerifLink2 {
        edge_ix: usize,
        lower_bound_ix: Option<usize>,
        upper_bound_ix: Option<usize>,
    },
    /// Edge moved onto a neighbour it would otherwise cross.
    Bound { edge_ix: usize, bound_ix: usize },
}

impl Action {
    /// Returns the upper case name used in trace logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IpBefore { .. } => "IP_BEFORE",
            Self::IpAfter { .. } => "IP_AFTER",
            Self::IpOn { .. } => "IP_ON",
            Self::IpBetween { .. } => "IP_BETWEEN",
            Self::BlueAnchor { .. } => "BLUE_ANCHOR",
            Self::Blue { .. } => "BLUE",
            Self::Anchor { .. } => "ANCHOR",
            Self::Adjust { .. } => "ADJUST",
            Self::Stem { .. } => "STEM",
            Self::Link { .. } => "LINK",
            Self::Serif { .. } => "SERIF",
            Self::SerifAnchor { .. } => "SERIF_ANCHOR",
            Self::SerifLink1 { .. } => "SERIF_LINK1",
            Self::SerifLink2 { .. } => "SERIF_LINK2",
            Self::Bound { .. } => "BOUND",
        }
    }

    /// Returns the edge whose position this action determined, if any.
    pub fn edge_ix(&self) -> Option<usize> {
        match *self {
            Self::IpBefore { .. }
            | Self::IpAfter { .. }
            | Self::IpOn { .. }
            | Self::IpBetween { .. } => None,
            Self::BlueAnchor { edge_ix, .. }
            | Self::Blue { edge_ix }
            | Self::Anchor { edge_ix, .. }
            | Self::Adjust { edge_ix, .. }
            | Self::Stem { edge_ix, .. }
            | Self::Serif { edge_ix, .. }
            | Self::SerifAnchor { edge_ix, .. }
            | Self::SerifLink1 { edge_ix, .. }
            | Self::SerifLink2 { edge_ix, .. }
            | Self::Bound { edge_ix, .. } => Some(edge_ix),
            Self::Link { stem_ix, .. } => Some(stem_ix),
        }
    }
}

/// Receiver for alignment decisions.
pub trait HintRecorder {
    /// Called once for every decision, in the order they are made.
    fn record(&mut self, dim: Dimension, action: &Action);
}

/// Discards everything.
impl HintRecorder for () {
    fn record(&mut self, _dim: Dimension, _action: &Action) {}
}

impl<T: HintRecorder + ?Sized> HintRecorder for &mut T {
    fn record(&mut self, dim: Dimension, action: &Action) {
        (**self).record(dim, action);
    }
}

/// Recorder that keeps every action in memory.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionLog {
    actions: Vec<(Dimension, Action)>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[(Dimension, Action)] {
        &self.actions
    }

    /// Returns the actions recorded for the given dimension.
    pub fn for_dim(&self, dim: Dimension) -> impl Iterator<Item = &Action> + '_ {
        self.actions
            .iter()
            .filter(move |(action_dim, _)| *action_dim == dim)
            .map(|(_, action)| action)
    }

    /// Returns the actions recorded for vertical edges, which are the
    /// ones that set x coordinates.
    pub fn horizontal(&self) -> impl Iterator<Item = &Action> + '_ {
        self.for_dim(Axis::HORIZONTAL)
    }

    /// Returns the actions that set y coordinates.
    pub fn vertical(&self) -> impl Iterator<Item = &Action> + '_ {
        self.for_dim(Axis::VERTICAL)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

impl HintRecorder for ActionLog {
    fn record(&mut self, dim: Dimension, action: &Action) {
        self.actions.push((dim, *action));
    }
}
