//! Rounding and tolerance helpers
//!
//! Lengths derived from the bond pattern are rounded after every computation
//! so that binary floating point noise never decides whether a brick fits.

use num_traits::Float;

use crate::io::configuration::{LENGTH_EPSILON, ROUNDING_DECIMALS};

/// Round a value to the given number of decimal places
pub fn round_to<T: Float>(value: T, decimals: i32) -> T {
    let Some(ten) = T::from(10.0) else {
        return value;
    };
    let factor = ten.powi(decimals);
    (value * factor).round() / factor
}

/// Round a length using the layout precision
pub fn round_length(value: f64) -> f64 {
    let rounded = round_to(value, ROUNDING_DECIMALS);
    // Avoid negative zero leaking into exported coordinates
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Test two lengths for equality within the layout tolerance
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= LENGTH_EPSILON
}

/// Test whether a length is effectively zero
pub fn is_zero(value: f64) -> bool {
    value.abs() <= LENGTH_EPSILON
}

/// Normalize an angle in radians to `(-PI, PI]`
pub fn normalize_angle(angle: f64) -> f64 {
    let two_pi = std::f64::consts::TAU;
    let mut wrapped = angle % two_pi;
    if wrapped <= -std::f64::consts::PI {
        wrapped += two_pi;
    } else if wrapped > std::f64::consts::PI {
        wrapped -= two_pi;
    }
    wrapped
}

/// Snap an angle to the nearest quarter turn if it lies within tolerance
///
/// Returns the number of quarter turns in `0..4`.
pub fn quarter_turns(angle: f64, tolerance: f64) -> Option<u8> {
    let turns = angle / std::f64::consts::FRAC_PI_2;
    let nearest = turns.round();
    if (turns - nearest).abs() * std::f64::consts::FRAC_PI_2 > tolerance {
        return None;
    }
    Some(nearest.rem_euclid(4.0) as u8)
}
