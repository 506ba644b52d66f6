//! Animation track decoding
//!
//! A packed track starts with a 5-byte header:
//!
//! | Offset | Size | Field                                 |
//! |--------|------|---------------------------------------|
//! | 0      | 1    | control; bits 0-1 select speed class  |
//! | 1      | 2    | base value (`i16` LE)                 |
//! | 3      | 2    | range (`i16` LE)                      |
//!
//! The speed class decides how the frames are rebuilt:
//!
//! - `Static` - every frame is `base`
//! - `Coarse` / `Fine` - delta tracks; one 2- or 4-bit code per frame after
//!   the first, read LSB-first from byte 5. Each code dequantizes to a unit
//!   step in `[-1, 1]` that is scaled by `range` and the frame's time scale.
//! - `Ramp` - a straight line from `base` to `base + range`
//!
//! All values are multiplied by the track scale.
//!
//! Dequantization is exact: code `c` of a class with ceiling `M` maps to
//! `(2c - M) / M`. The reverse direction ([`quantize_unit`]) rounds to the
//! nearest code with ties away from zero.

use byteorder::{ByteOrder, LittleEndian};

use crate::compression::bit_reader::BitReader;
use crate::error::{Error, Result};
use crate::lut::{SpeedClass, TRACK_SPEED_CLASSES};

/// Size of the packed track header.
pub const TRACK_HEADER_SIZE: usize = 5;

/// How a track's frames are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Static,
    Coarse,
    Fine,
    Ramp,
}

impl TrackKind {
    fn from_control(control: u8) -> Self {
        match control & 0x3 {
            0 => Self::Static,
            1 => Self::Coarse,
            2 => Self::Fine,
            _ => Self::Ramp,
        }
    }

    /// Code width and quantiser ceiling for this kind.
    #[must_use]
    pub fn speed_class(self) -> SpeedClass {
        TRACK_SPEED_CLASSES[self as usize]
    }
}

struct TrackHeader {
    kind: TrackKind,
    base: f32,
    range: f32,
}

fn read_header(packed: &[u8]) -> Result<TrackHeader> {
    if packed.len() < TRACK_HEADER_SIZE {
        return Err(Error::malformed(
            packed.len() * 8,
            format!(
                "track header needs {TRACK_HEADER_SIZE} bytes, found {}",
                packed.len()
            ),
        ));
    }
    Ok(TrackHeader {
        kind: TrackKind::from_control(packed[0]),
        base: f32::from(LittleEndian::read_i16(&packed[1..3])),
        range: f32::from(LittleEndian::read_i16(&packed[3..5])),
    })
}

/// Map a code to its unit step in `[-1, 1]`.
///
/// Kinds without a coded body always yield zero.
#[must_use]
pub fn dequantize(code: u32, kind: TrackKind) -> f32 {
    let class = kind.speed_class();
    if class.code_bits == 0 {
        return 0.0;
    }
    (2.0 * code as f32 - class.ceiling) / class.ceiling
}

/// Map a unit step back to the nearest code (ties away from zero).
#[must_use]
pub fn quantize_unit(unit: f32, kind: TrackKind) -> u32 {
    let class = kind.speed_class();
    if class.code_bits == 0 {
        return 0;
    }
    ((unit.clamp(-1.0, 1.0) + 1.0) * class.ceiling / 2.0).round() as u32
}

/// Walk the frames of a track, handing each sample to `emit`.
fn for_each_sample(
    packed: &[u8],
    frame_count: usize,
    scale: f32,
    time_scale: &[f32],
    mut emit: impl FnMut(f32),
) -> Result<()> {
    if frame_count == 0 {
        return Ok(());
    }
    if !time_scale.is_empty() && time_scale.len() < frame_count {
        return Err(Error::malformed(
            0,
            format!(
                "time scale table covers {} of {frame_count} frames",
                time_scale.len()
            ),
        ));
    }

    let header = read_header(packed)?;
    let start = header.base * scale;
    match header.kind {
        TrackKind::Static => (0..frame_count).for_each(|_| emit(start)),
        TrackKind::Ramp => {
            let steps = (frame_count - 1).max(1) as f32;
            for i in 0..frame_count {
                emit((header.base + header.range * i as f32 / steps) * scale);
            }
        }
        kind @ (TrackKind::Coarse | TrackKind::Fine) => {
            let bits = u32::from(kind.speed_class().code_bits);
            let step = header.range * scale;
            let mut reader = BitReader::new(packed, TRACK_HEADER_SIZE * 8);
            let mut value = start;
            emit(value);
            for i in 1..frame_count {
                let code = reader.read(bits)?;
                let weight = time_scale.get(i).copied().unwrap_or(1.0);
                value += dequantize(code, kind) * step * weight;
                emit(value);
            }
        }
    }
    Ok(())
}

/// Rebuild `frame_count` samples from a packed track.
///
/// `time_scale` may be empty (every frame weighs 1.0); otherwise it must
/// have an entry for every frame.
///
/// # Errors
/// Returns [`Error::MalformedStream`] if the header or body is truncated or
/// the time scale table is too short.
pub fn decode_track(
    frame_count: usize,
    packed: &[u8],
    scale: f32,
    time_scale: &[f32],
) -> Result<Vec<f32>> {
    // Delta tracks hold at most one code per body bit after the first frame.
    let body_bits = packed.len().saturating_sub(TRACK_HEADER_SIZE) * 8;
    let mut samples = Vec::with_capacity(frame_count.min(body_bits + 1));
    for_each_sample(packed, frame_count, scale, time_scale, |v| samples.push(v))?;
    Ok(samples)
}

/// Largest absolute sample of a translation track, without building the
/// sample list. Zero frames give zero.
///
/// # Errors
/// Same as [`decode_track`].
pub fn peak_translation(packed: &[u8], frame_count: usize, scale: f32) -> Result<f32> {
    let mut peak = 0.0f32;
    for_each_sample(packed, frame_count, scale, &[], |v| peak = peak.max(v.abs()))?;
    Ok(peak)
}

/// A packed track together with its scale and optional time-scale table.
#[derive(Debug, Clone, Copy)]
pub struct AnimTrack<'a> {
    pub packed: &'a [u8],
    pub scale: f32,
    pub time_scale: &'a [f32],
}

impl<'a> AnimTrack<'a> {
    #[must_use]
    pub fn new(packed: &'a [u8], scale: f32) -> Self {
        Self {
            packed,
            scale,
            time_scale: &[],
        }
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: &'a [f32]) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// The encoding named by the control byte.
    ///
    /// # Errors
    /// Returns [`Error::MalformedStream`] if the header is truncated.
    pub fn kind(&self) -> Result<TrackKind> {
        Ok(read_header(self.packed)?.kind)
    }

    /// # Errors
    /// See [`decode_track`].
    pub fn decode(&self, frame_count: usize) -> Result<Vec<f32>> {
        decode_track(frame_count, self.packed, self.scale, self.time_scale)
    }

    /// Largest absolute sample, honouring the time-scale table.
    ///
    /// # Errors
    /// See [`decode_track`].
    pub fn peak(&self, frame_count: usize) -> Result<f32> {
        let mut peak = 0.0f32;
        for_each_sample(
            self.packed,
            frame_count,
            self.scale,
            self.time_scale,
            |v| peak = peak.max(v.abs()),
        )?;
        Ok(peak)
    }
}
