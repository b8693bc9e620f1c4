//! Writing systems and per-glyph style information.
//!
//! Script classification and feature coverage happen outside of this
//! crate. The hinter only needs to know which algorithm to run for a
//! style and a couple of bits about each glyph.

/// Hinting algorithm associated with a style.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WritingSystem {
    /// Scales the outline without any grid fitting.
    Dummy,
    /// Segment, edge and blue zone based hinting.
    #[default]
    Latin,
}

/// Style information for a single glyph as supplied by the coverage
/// collaborator.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct GlyphStyle {
    /// Index of the style in the face's metrics registry.
    pub style_ix: u16,
    /// Combination of the flags defined below.
    pub flags: u8,
}

impl GlyphStyle {
    /// The glyph is not a base glyph (a combining mark, for example),
    /// so blue zones are not applied and the standard width is not
    /// enforced.
    pub const NON_BASE: u8 = 1 << 0;

    pub fn new(style_ix: u16) -> Self {
        Self { style_ix, flags: 0 }
    }

    pub fn non_base(style_ix: u16) -> Self {
        Self {
            style_ix,
            flags: Self::NON_BASE,
        }
    }

    pub fn is_non_base(self) -> bool {
        self.flags & Self::NON_BASE != 0
    }
}
