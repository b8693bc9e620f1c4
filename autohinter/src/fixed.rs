//! Fixed point helpers.
//!
//! Note: lots of bit fiddling based fixed point math in the hinter
//! so we're opting out of using the strongly typed variants because they
//! just add noise and reduce clarity. Scales are 16.16 values and
//! positions are 26.6 values; both are carried as plain `i32`.

use font_types::Fixed;

/// Multiplies a 26.6 (or font unit) value by a 16.16 scale with rounding.
pub(crate) fn fixed_mul(a: i32, b: i32) -> i32 {
    (Fixed::from_bits(a) * Fixed::from_bits(b)).to_bits()
}

/// Divides two values, producing a 16.16 result.
///
/// Returns the saturated value when `b` is zero, matching `FT_DivFix`.
pub(crate) fn fixed_div(a: i32, b: i32) -> i32 {
    if b == 0 {
        return if a < 0 { -0x7FFF_FFFF } else { 0x7FFF_FFFF };
    }
    (Fixed::from_bits(a) / Fixed::from_bits(b)).to_bits()
}

/// Computes `a * b / c` with a 64-bit intermediate and rounding.
pub(crate) fn fixed_mul_div(a: i32, b: i32, c: i32) -> i32 {
    if c == 0 {
        return if (a ^ b) < 0 { -0x7FFF_FFFF } else { 0x7FFF_FFFF };
    }
    Fixed::from_bits(a)
        .mul_div(Fixed::from_bits(b), Fixed::from_bits(c))
        .to_bits()
}

/// Rounds a 26.6 value to the nearest pixel.
pub(crate) fn pix_round(a: i32) -> i32 {
    (a + 32) & !63
}

pub(crate) fn pix_floor(a: i32) -> i32 {
    a & !63
}

/// All heuristic constants are defined based on a UPEM of 2048.
pub(crate) fn derived_constant(units_per_em: i32, value: i32) -> i32 {
    value * units_per_em / 2048
}
