//! Table-driven sine and cosine
//!
//! The angle is reduced to `[-pi/4, pi/4]` by subtracting the nearest
//! multiple of pi/2 (split into three parts to keep the subtraction exact),
//! then both polynomials run on the remainder and the quadrant picks which
//! result lands where.

use crate::lut::{COS_COEFFS, HALF_PI_PARTS, SIN_COEFFS, TWO_OVER_PI};

/// Sine and cosine of `angle` (radians), accurate to about 1e-7.
#[must_use]
pub fn sin_cos(angle: f32) -> (f32, f32) {
    let quadrant = (angle * TWO_OVER_PI).round();
    let [hi, mid, lo] = HALF_PI_PARTS;
    let r = ((angle - quadrant * hi) - quadrant * mid) - quadrant * lo;
    let r2 = r * r;

    let [s1, s2, s3] = SIN_COEFFS;
    let [c1, c2, c3] = COS_COEFFS;
    let sin = r + r * r2 * (s1 + r2 * (s2 + r2 * s3));
    let cos = 1.0 - 0.5 * r2 + r2 * r2 * (c1 + r2 * (c2 + r2 * c3));

    match (quadrant as i64) & 3 {
        0 => (sin, cos),
        1 => (cos, -sin),
        2 => (-sin, -cos),
        _ => (-cos, sin),
    }
}
