//! Glyph outline analysis and grid-fitting for automatic hinting.
//!
//! Given an unhinted glyph outline and per-style global metrics (standard
//! stem widths and blue zones), this crate decides where stems, serifs and
//! round features of the glyph should land on the pixel grid at a given
//! size, and computes fitted positions for every outline point.
//!
//! The pipeline for a single axis is:
//! 1. Segment detection: runs of points with the same dominant direction.
//! 2. Segment linking: pairs of opposite segments forming stems, plus
//!    serifs.
//! 3. Edge construction: segments at nearly the same position are merged.
//! 4. Blue zone matching (vertical axis only).
//! 5. Edge alignment: stems, blue edges and serifs are fitted to the grid
//!    with every decision reported to a [`HintRecorder`].
//! 6. Point alignment: all points follow the edges they belong to or are
//!    interpolated between them.
//!
//! A typical client computes [`StyleMetrics`] once per style through a
//! [`MetricsRegistry`], then reuses a single [`GlyphHints`] for every
//! glyph:
//!
//! ```
//! use autohinter::{
//!     ActionLog, GlyphHints, GlyphStyle, HintingConfig, MetricsRegistry, Scale,
//!     SegmentOverrides, StyleMetrics, UnscaledOutline, UnscaledPoint,
//! };
//!
//! let mut glyph = UnscaledOutline::new();
//! glyph.push_contour([
//!     UnscaledPoint::on_curve(100, 0),
//!     UnscaledPoint::on_curve(160, 0),
//!     UnscaledPoint::on_curve(160, 500),
//!     UnscaledPoint::on_curve(100, 500),
//! ]);
//! let registry = MetricsRegistry::new(1, HintingConfig::default());
//! let metrics = registry
//!     .get_or_init(0, |config| {
//!         let widths = autohinter::compute_widths(&glyph, 1000).unwrap_or_default();
//!         StyleMetrics::new(1000, widths, vec![], config)
//!     })
//!     .unwrap();
//! let scale = Scale::new(16.0, 1000, registry.config());
//! let scaled = registry.scaled(0, &scale).unwrap();
//! let mut hints = GlyphHints::new();
//! hints.reload(&glyph, &scaled, &SegmentOverrides::default())?;
//! let mut log = ActionLog::new();
//! hints.apply(&metrics, &scaled, GlyphStyle::new(0), &mut log)?;
//! for (x, y) in hints.fitted_coords() {
//!     println!("{}, {}", x as f32 / 64.0, y as f32 / 64.0);
//! }
//! # Ok::<(), autohinter::HintError>(())
//! ```
//!
//! Fixed point conventions follow FreeType: positions are 26.6 values and
//! scales are 16.16 values, both carried as `i32`.

#![forbid(unsafe_code)]

mod axis;
mod config;
mod dump;
mod error;
mod fixed;
mod hint;
mod hints;
mod latin;
mod metrics;
mod outline;
mod overrides;
mod recorder;
mod style;

pub use axis::{Axis, Dimension, Edge, Segment};
pub use config::{HintingConfig, StemWidthMode, StemWidthModes};
pub use dump::{EdgeTable, SegmentTable};
pub use error::HintError;
pub use hints::{GlyphHints, HintStatus};
pub use latin::{compute_widths, QuantizeCache};
pub use metrics::{
    sort_and_quantize_widths, AxisMetrics, BlueZone, MetricsRegistry, Scale, ScaledAxisMetrics,
    ScaledBlue, ScaledStyleMetrics, ScaledWidth, StyleMetrics, MAX_BLUES, MAX_WIDTHS,
};
pub use outline::{
    Contour, Direction, Orientation, Outline, Point, PointKind, UnscaledOutline, UnscaledPoint,
};
pub use overrides::{SegmentOverride, SegmentOverrides};
pub use recorder::{Action, ActionLog, HintRecorder};
pub use style::{GlyphStyle, WritingSystem};
