//! Packed rotation decoding
//!
//! A packed rotation is a 128-bit lane of four little-endian `u32` words.
//! Words 0-2 hold three quaternion components (in x, y, z, w order with the
//! omitted one skipped) quantized over `[-1/sqrt(2), 1/sqrt(2)]`; the low two
//! bits of word 3 name the omitted component, which is rebuilt from the unit
//! length constraint.

use byteorder::{ByteOrder, LittleEndian};
use glam::Quat;

use super::trig::sin_cos;

/// Largest magnitude a stored component can take.
const COMPONENT_RANGE: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// A raw 128-bit rotation lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedRotation(pub [u8; 16]);

impl PackedRotation {
    /// Decode as a smallest-three quaternion.
    #[must_use]
    pub fn decode(&self) -> Quat {
        decode_rotation(&self.0)
    }

    /// Decode as three Euler angles.
    #[must_use]
    pub fn decode_euler(&self) -> Quat {
        decode_euler_rotation(&self.0)
    }
}

fn dequantize_component(raw: u32) -> f64 {
    (f64::from(raw) / f64::from(u32::MAX) * 2.0 - 1.0) * COMPONENT_RANGE
}

/// Decode a packed quaternion lane into a unit quaternion.
///
/// Quantization noise can push the three stored components past unit length;
/// the omitted component is then clamped to zero before normalizing.
#[must_use]
pub fn decode_rotation(lane: &[u8; 16]) -> Quat {
    let mut words = [0u32; 4];
    LittleEndian::read_u32_into(lane, &mut words);
    let omitted = (words[3] & 0x3) as usize;

    let mut components = [0f64; 4];
    let mut stored = words[..3].iter();
    for (index, component) in components.iter_mut().enumerate() {
        if index == omitted {
            continue;
        }
        if let Some(&raw) = stored.next() {
            *component = dequantize_component(raw);
        }
    }

    let stored_sq: f64 = components.iter().map(|c| c * c).sum();
    components[omitted] = (1.0 - stored_sq).max(0.0).sqrt();

    let norm = components.iter().map(|c| c * c).sum::<f64>().sqrt();
    let [x, y, z, w] = components.map(|c| (c / norm) as f32);
    Quat::from_xyzw(x, y, z, w)
}

/// Build a quaternion from `[roll, pitch, yaw]` (radians), applied as
/// yaw about Z, then pitch about Y, then roll about X.
#[must_use]
pub fn euler_to_quat(angles: [f32; 3]) -> Quat {
    let [roll, pitch, yaw] = angles;
    let (sr, cr) = sin_cos(roll * 0.5);
    let (sp, cp) = sin_cos(pitch * 0.5);
    let (sy, cy) = sin_cos(yaw * 0.5);

    Quat::from_xyzw(
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
        cr * cp * cy + sr * sp * sy,
    )
}

/// Decode a lane holding three little-endian `f32` Euler angles
/// (roll, pitch, yaw). The fourth word is padding.
#[must_use]
pub fn decode_euler_rotation(lane: &[u8; 16]) -> Quat {
    let mut angles = [0f32; 4];
    LittleEndian::read_f32_into(lane, &mut angles);
    euler_to_quat([angles[0], angles[1], angles[2]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::EulerRot;
    use proptest::prelude::*;

    fn lane(words: [u32; 4]) -> [u8; 16] {
        let mut out = [0u8; 16];
        LittleEndian::write_u32_into(&words, &mut out);
        out
    }

    fn quantize(value: f64) -> u32 {
        ((value / COMPONENT_RANGE + 1.0) / 2.0 * f64::from(u32::MAX)).round() as u32
    }

    fn assert_unit(q: Quat) {
        assert!((q.length() - 1.0).abs() < 1e-4, "{q:?} is not unit length");
    }

    #[test]
    fn test_identity() {
        let mid = quantize(0.0);
        let q = decode_rotation(&lane([mid, mid, mid, 3]));
        assert!(q.abs_diff_eq(Quat::IDENTITY, 1e-6), "{q:?}");
    }

    #[test]
    fn test_omitted_index_places_component() {
        let mid = quantize(0.0);
        let q = decode_rotation(&lane([mid, mid, mid, 0]));
        assert!(q.abs_diff_eq(Quat::from_xyzw(1.0, 0.0, 0.0, 0.0), 1e-6));
        let q = decode_rotation(&lane([mid, mid, mid, 2]));
        assert!(q.abs_diff_eq(Quat::from_xyzw(0.0, 0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_round_trips_a_rotation() {
        let expected = Quat::from_euler(EulerRot::ZYX, 0.4, -0.3, 1.1);
        // The rebuilt component is always positive.
        let expected = if expected.w < 0.0 { -expected } else { expected };
        let q = decode_rotation(&lane([
            quantize(f64::from(expected.x)),
            quantize(f64::from(expected.y)),
            quantize(f64::from(expected.z)),
            3,
        ]));
        assert!(q.abs_diff_eq(expected, 1e-5), "{q:?} vs {expected:?}");
    }

    #[test]
    fn test_boundary_patterns_are_unit() {
        for index in 0..4 {
            assert_unit(decode_rotation(&lane([0, 0, 0, index])));
            assert_unit(decode_rotation(&lane([u32::MAX, u32::MAX, u32::MAX, index])));
        }
        assert_unit(decode_rotation(&[0u8; 16]));
        assert_unit(decode_rotation(&[0xFF; 16]));
    }

    #[test]
    fn test_euler_matches_glam() {
        for &(roll, pitch, yaw) in &[
            (0.0, 0.0, 0.0),
            (0.3, -1.2, 2.5),
            (-3.0, 0.7, -0.1),
            (1.5, 1.5, 1.5),
        ] {
            let ours = euler_to_quat([roll, pitch, yaw]);
            let reference = Quat::from_euler(EulerRot::ZYX, yaw, pitch, roll);
            assert!(ours.abs_diff_eq(reference, 1e-5), "{ours:?} vs {reference:?}");
        }
    }

    #[test]
    fn test_euler_lane() {
        let mut bytes = [0u8; 16];
        LittleEndian::write_f32_into(&[0.25, -0.5, 1.0, 0.0], &mut bytes);
        let q = PackedRotation(bytes).decode_euler();
        assert!(q.abs_diff_eq(euler_to_quat([0.25, -0.5, 1.0]), 1e-7));
        assert_unit(q);
    }

    proptest! {
        #[test]
        fn prop_decoded_rotation_is_unit(a in any::<u32>(), b in any::<u32>(), c in any::<u32>(), d in any::<u32>()) {
            let q = PackedRotation(lane([a, b, c, d])).decode();
            prop_assert!((q.length() - 1.0).abs() < 1e-4);
        }
    }
}
