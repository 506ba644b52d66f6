//! Static lookup tables shared by the `RTech` decoders
//!
//! The stream decoder reads three prefix codes (token, distance width and
//! extended-length slot). Each code is listed once as `(symbol, code, bits)`
//! and expanded at compile time into a direct lookup table indexed by the
//! next 8 (or 6) stream bits, least significant bit first.
//!
//! The tables are immutable for the lifetime of the process and need no
//! synchronisation.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, DTZxPorter (`Legion`)
//!
//! SPDX-License-Identifier: MIT

// ============================================================================
// Token Code
// ============================================================================

/// What a decoded token asks the stream decoder to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeClass {
    /// Copy `n` raw bytes from the input (1..=16).
    Literal(u8),
    /// Copy an extended number of raw bytes from the input.
    LongLiteral,
    /// Repeat `n` bytes from earlier output (4..=16).
    Match(u8),
    /// Repeat an extended number of bytes from earlier output.
    LongMatch,
}

/// One slot of [`TOKEN_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    pub class: DecodeClass,
    /// Number of stream bits the token code occupies.
    pub code_bits: u8,
}

/// Token symbol used for both extended-length classes.
pub(crate) const EXTENDED_SYMBOL: i8 = 17;

/// Token prefix code as `(symbol, code, bits)`.
///
/// Negative symbols are literal runs, positive symbols are matches,
/// and `±17` selects the extended-length form of either.
pub(crate) const TOKEN_CODES: [(i8, u8, u8); 31] = [
    (4, 0, 2),
    (-2, 1, 4),
    (-4, 2, 3),
    (8, 3, 5),
    (-17, 5, 4),
    (17, 6, 4),
    (-7, 7, 6),
    (-3, 9, 4),
    (7, 11, 6),
    (5, 13, 5),
    (-1, 14, 4),
    (-12, 15, 6),
    (16, 19, 5),
    (-10, 23, 6),
    (-5, 27, 6),
    (6, 29, 5),
    (11, 31, 8),
    (-8, 39, 6),
    (12, 43, 6),
    (-9, 47, 7),
    (-11, 55, 6),
    (-6, 59, 6),
    (-13, 63, 8),
    (14, 95, 8),
    (9, 111, 8),
    (-15, 127, 8),
    (13, 159, 8),
    (-14, 191, 8),
    (15, 223, 8),
    (10, 239, 8),
    (-16, 255, 8),
];

const fn token_class(symbol: i8) -> DecodeClass {
    if symbol == EXTENDED_SYMBOL {
        DecodeClass::LongMatch
    } else if symbol == -EXTENDED_SYMBOL {
        DecodeClass::LongLiteral
    } else if symbol < 0 {
        DecodeClass::Literal(symbol.unsigned_abs())
    } else {
        DecodeClass::Match(symbol as u8)
    }
}

const fn build_token_table() -> [TokenEntry; 256] {
    let mut table = [TokenEntry {
        class: DecodeClass::Literal(0),
        code_bits: 0,
    }; 256];
    let mut k = 0;
    while k < TOKEN_CODES.len() {
        let (symbol, code, bits) = TOKEN_CODES[k];
        let mut i = code as usize;
        while i < 256 {
            table[i] = TokenEntry {
                class: token_class(symbol),
                code_bits: bits,
            };
            i += 1 << bits;
        }
        k += 1;
    }
    table
}

/// Token lookup indexed by the next 8 stream bits.
pub static TOKEN_TABLE: [TokenEntry; 256] = build_token_table();

// ============================================================================
// Distance Width Code
// ============================================================================

/// One slot of [`DISTANCE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceEntry {
    /// Number of raw distance bits that follow, `None` for the reserved code.
    pub width: Option<u8>,
    pub code_bits: u8,
}

/// Width value reserved as "undefined" in the distance code.
const UNDEFINED_WIDTH: u8 = 0xFF;

/// Distance width prefix code as `(width, code, bits)`.
pub(crate) const DISTANCE_CODES: [(u8, u8, u8); 15] = [
    (4, 0, 1),
    (5, 1, 2),
    (6, 3, 3),
    (7, 7, 5),
    (17, 15, 6),
    (8, 23, 5),
    (12, 31, 7),
    (9, 47, 7),
    (14, 63, 8),
    (11, 95, 8),
    (10, 111, 7),
    (16, 127, 8),
    (15, 191, 8),
    (13, 223, 8),
    (UNDEFINED_WIDTH, 255, 8),
];

/// Smallest raw distance width the code can express.
pub const MIN_DISTANCE_WIDTH: u8 = 4;

/// Largest raw distance width the code can express.
pub const MAX_DISTANCE_WIDTH: u8 = 17;

const fn build_distance_table() -> [DistanceEntry; 256] {
    let mut table = [DistanceEntry {
        width: None,
        code_bits: 0,
    }; 256];
    let mut k = 0;
    while k < DISTANCE_CODES.len() {
        let (width, code, bits) = DISTANCE_CODES[k];
        let width = if width == UNDEFINED_WIDTH {
            None
        } else {
            Some(width)
        };
        let mut i = code as usize;
        while i < 256 {
            table[i] = DistanceEntry {
                width,
                code_bits: bits,
            };
            i += 1 << bits;
        }
        k += 1;
    }
    table
}

/// Distance width lookup indexed by the next 8 stream bits.
pub static DISTANCE_TABLE: [DistanceEntry; 256] = build_distance_table();

// ============================================================================
// Extended Lengths
// ============================================================================

/// Base value plus a count of raw bits added on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthSlot {
    pub base: u32,
    pub extra_bits: u8,
}

const fn slot(base: u32, extra_bits: u8) -> LengthSlot {
    LengthSlot { base, extra_bits }
}

/// Added to every extended length; shorter runs have tokens of their own.
pub const EXTENDED_LENGTH_BIAS: usize = 17;

/// Short extension slots, selected by 3 raw bits.
pub static SHORT_LENGTH_SLOTS: [LengthSlot; 8] = [
    slot(0, 0),
    slot(0, 1),
    slot(2, 1),
    slot(4, 1),
    slot(6, 1),
    slot(8, 1),
    slot(10, 5),
    slot(42, 5),
];

/// Long extension slots, selected through [`LONG_SLOT_TABLE`].
pub static LONG_LENGTH_SLOTS: [LengthSlot; 16] = [
    slot(74, 5),
    slot(106, 5),
    slot(138, 5),
    slot(170, 5),
    slot(202, 5),
    slot(234, 5),
    slot(266, 5),
    slot(298, 5),
    slot(330, 5),
    slot(362, 5),
    slot(394, 5),
    slot(426, 9),
    slot(938, 9),
    slot(1450, 13),
    slot(9642, 17),
    slot(140714, 21),
];

/// One slot of [`LONG_SLOT_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotEntry {
    /// Index into [`LONG_LENGTH_SLOTS`].
    pub slot: u8,
    pub code_bits: u8,
}

/// Long slot prefix code as `(slot, code, bits)`.
pub(crate) const LONG_SLOT_CODES: [(u8, u8, u8); 16] = [
    (0, 0, 1),
    (8, 1, 2),
    (4, 3, 5),
    (6, 7, 6),
    (1, 11, 6),
    (11, 15, 6),
    (12, 19, 5),
    (9, 23, 6),
    (3, 27, 6),
    (14, 31, 6),
    (7, 39, 6),
    (2, 43, 6),
    (13, 47, 6),
    (10, 55, 6),
    (5, 59, 6),
    (15, 63, 6),
];

const fn build_long_slot_table() -> [SlotEntry; 64] {
    let mut table = [SlotEntry {
        slot: 0,
        code_bits: 0,
    }; 64];
    let mut k = 0;
    while k < LONG_SLOT_CODES.len() {
        let (slot, code, bits) = LONG_SLOT_CODES[k];
        let mut i = code as usize;
        while i < 64 {
            table[i] = SlotEntry {
                slot,
                code_bits: bits,
            };
            i += 1 << bits;
        }
        k += 1;
    }
    table
}

/// Long slot lookup indexed by the next 6 stream bits.
pub static LONG_SLOT_TABLE: [SlotEntry; 64] = build_long_slot_table();

// ============================================================================
// Auxiliary Stream Classes
// ============================================================================

/// Token classes of the auxiliary (snowflake) stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxClass {
    Literal,
    Substitute,
    Repeat,
    Run,
}

/// One slot of [`AUX_CLASS_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxEntry {
    pub class: AuxClass,
    /// Added to the 6-bit count carried by the token.
    pub length_bias: u8,
}

/// Auxiliary token classes indexed by the top two bits of a token byte.
pub static AUX_CLASS_TABLE: [AuxEntry; 4] = [
    AuxEntry {
        class: AuxClass::Literal,
        length_bias: 1,
    },
    AuxEntry {
        class: AuxClass::Substitute,
        length_bias: 1,
    },
    AuxEntry {
        class: AuxClass::Repeat,
        length_bias: 2,
    },
    AuxEntry {
        class: AuxClass::Run,
        length_bias: 3,
    },
];

// ============================================================================
// Animation Tracks
// ============================================================================

/// Code width and quantiser ceiling for one track speed class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedClass {
    pub code_bits: u8,
    /// Largest code value; zero for classes without a coded body.
    pub ceiling: f32,
}

/// Track speed classes indexed by the low two bits of the control byte.
pub static TRACK_SPEED_CLASSES: [SpeedClass; 4] = [
    SpeedClass {
        code_bits: 0,
        ceiling: 0.0,
    },
    SpeedClass {
        code_bits: 2,
        ceiling: 3.0,
    },
    SpeedClass {
        code_bits: 4,
        ceiling: 15.0,
    },
    SpeedClass {
        code_bits: 0,
        ceiling: 0.0,
    },
];

// ============================================================================
// Sine / Cosine Approximation
// ============================================================================

/// 2/pi, used to pick the quadrant of an angle.
pub const TWO_OVER_PI: f32 = f32::from_bits(0x3F22_F983);

/// pi/2 split into three parts so `x - q * pi/2` stays exact for small `q`.
pub const HALF_PI_PARTS: [f32; 3] = [
    f32::from_bits(0x3FC9_1000),
    f32::from_bits(0xB695_7000),
    f32::from_bits(0xB06F_4B9E),
];

/// Odd polynomial coefficients for sine on `[-pi/4, pi/4]`.
pub const SIN_COEFFS: [f32; 3] = [
    f32::from_bits(0xBE2A_AAA8),
    f32::from_bits(0x3C08_85D2),
    f32::from_bits(0xB94D_6102),
];

/// Even polynomial coefficients for cosine on `[-pi/4, pi/4]`.
pub const COS_COEFFS: [f32; 3] = [
    f32::from_bits(0x3D2A_AAA9),
    f32::from_bits(0xBAB6_0B22),
    f32::from_bits(0x37CF_14C2),
];
