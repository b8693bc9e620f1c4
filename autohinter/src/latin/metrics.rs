//! Latin metrics scaling.

use crate::{
    axis::{Axis, Dimension},
    config::HintingConfig,
    fixed::{fixed_mul, fixed_mul_div, pix_round},
    metrics::{
        AxisMetrics, BlueZone, Scale, ScaledAxisMetrics, ScaledBlue, ScaledStyleMetrics,
        ScaledWidth, StyleMetrics,
    },
};

/// Computes scaled metrics for the given style and scale.
///
/// The vertical scale may be adjusted so that the x-height lands on the
/// pixel grid; the returned metrics carry the adjusted scale.
pub(crate) fn scale_style_metrics(
    metrics: &StyleMetrics,
    mut scale: Scale,
    config: &HintingConfig,
) -> ScaledStyleMetrics {
    let axes = [
        scale_axis_metrics(Axis::HORIZONTAL, metrics, &mut scale, config),
        scale_axis_metrics(Axis::VERTICAL, metrics, &mut scale, config),
    ];
    ScaledStyleMetrics { scale, axes }
}

fn scale_axis_metrics(
    dim: Dimension,
    metrics: &StyleMetrics,
    scale: &mut Scale,
    config: &HintingConfig,
) -> ScaledAxisMetrics {
    let unscaled = &metrics.axes[dim];
    let (org_scale, delta) = if dim == Axis::HORIZONTAL {
        (scale.x_scale, scale.x_delta)
    } else {
        (scale.y_scale, scale.y_delta)
    };
    let mut axis = ScaledAxisMetrics {
        dim,
        scale: org_scale,
        delta,
        standard_width: unscaled.standard_width,
        edge_distance_threshold: unscaled.edge_distance_threshold,
        ..Default::default()
    };
    if dim == Axis::VERTICAL {
        if let Some(new_scale) = x_height_scale(metrics, scale, config) {
            log::debug!(
                "x-height alignment: vertical scale changed from {:.4} to {:.4}",
                org_scale as f64 / 65536.0,
                new_scale as f64 / 65536.0
            );
            axis.scale = new_scale;
            scale.y_scale = new_scale;
        }
    }
    // Now scale the widths
    axis.widths = unscaled
        .widths
        .iter()
        .map(|&width| {
            let scaled = fixed_mul(width, axis.scale);
            ScaledWidth {
                unscaled: width,
                scaled,
                fitted: scaled,
            }
        })
        .collect();
    log::debug!(
        "{} widths: {:?}",
        if dim == Axis::HORIZONTAL {
            "horizontal"
        } else {
            "vertical"
        },
        axis.widths.iter().map(|width| width.scaled).collect::<Vec<_>>()
    );
    // Compute extra light property: this is a standard width that is
    // less than 5/8 pixels
    axis.is_extra_light = fixed_mul(unscaled.standard_width, axis.scale) < 32 + 8;
    if dim == Axis::VERTICAL {
        scale_blues(&mut axis, unscaled);
        if config.windows_compatibility {
            // Scaled without the x-height correction and never rounded
            let windows_zone = |position: i32, flags: u32| {
                let scaled = fixed_mul(position, org_scale) + delta;
                let width = ScaledWidth {
                    unscaled: position,
                    scaled,
                    fitted: scaled,
                };
                ScaledBlue {
                    reference: width,
                    overshoot: width,
                    flags: flags | BlueZone::ACTIVE,
                }
            };
            axis.blues
                .push(windows_zone(metrics.win_ascent, BlueZone::TOP));
            axis.blues.push(windows_zone(-metrics.win_descent, 0));
        }
    }
    axis
}

/// Returns the corrected vertical scale that aligns the top of small
/// letters to the pixel grid, if any.
fn x_height_scale(metrics: &StyleMetrics, scale: &Scale, config: &HintingConfig) -> Option<i32> {
    let ppem = scale.ppem();
    if config.is_x_height_exception(ppem) {
        return None;
    }
    let blue = metrics.axes[Axis::VERTICAL]
        .blues
        .iter()
        .find(|blue| blue.flags & BlueZone::ADJUSTMENT != 0)?;
    let scaled = fixed_mul(blue.overshoot, scale.y_scale);
    // Round up much more often at small sizes if requested
    let threshold = if config.increases_x_height(ppem) {
        52
    } else {
        40
    };
    let fitted = (scaled + threshold) & !63;
    (scaled != fitted).then(|| fixed_mul_div(scale.y_scale, fitted, scaled))
}

fn scale_blues(axis: &mut ScaledAxisMetrics, unscaled: &AxisMetrics) {
    for (blue_ix, unscaled_blue) in unscaled.blues.iter().enumerate() {
        let scaled_width = |position: i32| {
            let scaled = fixed_mul(position, axis.scale) + axis.delta;
            ScaledWidth {
                unscaled: position,
                scaled,
                fitted: scaled,
            }
        };
        let mut blue = ScaledBlue {
            reference: scaled_width(unscaled_blue.reference),
            overshoot: scaled_width(unscaled_blue.overshoot),
            flags: unscaled_blue.flags & !BlueZone::ACTIVE,
        };
        // Only activate blue zones less than 3/4 pixel tall
        let dist = fixed_mul(unscaled_blue.reference - unscaled_blue.overshoot, axis.scale);
        if (-48..=48).contains(&dist) {
            // Use discrete values for blue zone widths
            let mut delta = dist.abs();
            if delta < 32 {
                delta = 0;
            } else if delta < 48 {
                delta = 32;
            } else {
                delta = 64;
            }
            if dist < 0 {
                delta = -delta;
            }
            blue.reference.fitted = pix_round(blue.reference.scaled);
            blue.overshoot.fitted = blue.reference.fitted - delta;
            blue.flags |= BlueZone::ACTIVE;
        }
        log::debug!(
            "blue zone {blue_ix}: reference {} -> {:.2}, overshoot {} -> {:.2}{}",
            unscaled_blue.reference,
            blue.reference.fitted as f64 / 64.0,
            unscaled_blue.overshoot,
            blue.overshoot.fitted as f64 / 64.0,
            if blue.is_active() { "" } else { " (inactive)" }
        );
        axis.blues.push(blue);
    }
    axis.blue_count = axis.blues.len();
    // Use sub-top blue zone if it doesn't overlap with another
    // non-sub-top blue zone
    const REQUIRED_FLAGS: u32 = BlueZone::SUB_TOP | BlueZone::ACTIVE;
    for blue_ix in 0..axis.blues.len() {
        let blue = axis.blues[blue_ix];
        if blue.flags & REQUIRED_FLAGS != REQUIRED_FLAGS {
            continue;
        }
        let overlaps = axis.blues.iter().any(|blue2| {
            blue2.flags & BlueZone::SUB_TOP == 0
                && blue2.is_active()
                && blue2.reference.fitted <= blue.overshoot.fitted
                && blue2.overshoot.fitted >= blue.reference.fitted
        });
        if overlaps {
            log::debug!("deactivating overlapping sub-top blue zone {blue_ix}");
            axis.blues[blue_ix].flags &= !BlueZone::ACTIVE;
        }
    }
}
