//! Animation data: keyframe tracks and packed rotations
//!
//! - [`track`] - dynamic translation/scale curves
//! - [`rotation`] - 128-bit quaternion and Euler lanes

pub mod rotation;
pub mod track;
mod trig;

pub use rotation::{PackedRotation, decode_euler_rotation, decode_rotation, euler_to_quat};
pub use track::{AnimTrack, TrackKind, decode_track, peak_translation, quantize_unit};
pub use trig::sin_cos;
