//! User facing hinting configuration.

/// Selects the function used to compute fitted stem widths.
///
/// The same stem can end up with quite different widths depending on the
/// mode, so this is chosen per axis to match the rendering target.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StemWidthMode {
    /// Scaled widths pass through unchanged.
    Natural,
    /// Widths are nudged towards the standard width and rounded with a
    /// non-linear table. Also known as "smooth" hinting.
    #[default]
    Quantized,
    /// Widths snap to standard widths and then to whole pixels.
    Strong,
}

/// Stem width modes for each axis.
///
/// The horizontal mode applies to stems measured along the x axis
/// (vertical strokes) and the vertical mode to stems measured along the
/// y axis (horizontal strokes).
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StemWidthModes {
    pub horizontal: StemWidthMode,
    pub vertical: StemWidthMode,
}

/// Settings that control the hinting process for a face.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HintingConfig {
    pub stem_width_modes: StemWidthModes,
    /// For sizes from 6 ppem up to and including this value, the x-height
    /// is rounded up more eagerly. Zero disables the adjustment.
    pub increase_x_height: u16,
    /// Sizes (in ppem) at which the x-height scale correction is skipped.
    pub x_height_snapping_exceptions: Vec<u16>,
    /// Adds blue zones derived from the Windows ascender and descender.
    pub windows_compatibility: bool,
    /// Standard width in font units for the vertical axis, used when no
    /// stem could be measured.
    pub fallback_stem_width: Option<i32>,
    pub hint_horizontal: bool,
    pub hint_vertical: bool,
    /// Target is a monochrome rasterizer.
    pub mono: bool,
}

impl Default for HintingConfig {
    fn default() -> Self {
        Self {
            stem_width_modes: StemWidthModes::default(),
            increase_x_height: 14,
            x_height_snapping_exceptions: Vec::new(),
            windows_compatibility: false,
            fallback_stem_width: None,
            hint_horizontal: true,
            hint_vertical: true,
            mono: false,
        }
    }
}

impl HintingConfig {
    /// Minimum size for which the increased x-height rounding applies.
    pub const INCREASE_X_HEIGHT_MIN: u16 = 6;

    /// Returns true if the x-height scale correction is disabled for the
    /// given size.
    pub fn is_x_height_exception(&self, ppem: u16) -> bool {
        self.x_height_snapping_exceptions.contains(&ppem)
    }

    /// Returns true if the x-height should be rounded up more eagerly at
    /// the given size.
    pub fn increases_x_height(&self, ppem: u16) -> bool {
        self.increase_x_height != 0
            && ppem >= Self::INCREASE_X_HEIGHT_MIN
            && ppem <= self.increase_x_height
    }
}
