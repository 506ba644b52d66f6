//! Asset path hashing
//!
//! Respawn paks identify assets by a 64-bit GUID derived from the asset
//! path. The hash folds ASCII case and treats `\` as `/`, so both spellings
//! of a path land on the same GUID.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, DTZxPorter (`Legion`)
//!
//! SPDX-License-Identifier: MIT

use std::fmt;

const MIX_WORD: u64 = 0xFB8C4D96501;
const MIX_STATE: u64 = 0x633D5F1;
const LENGTH_PENALTY: u64 = 0xAE502812AA7333;

/// Fold one little-endian word: `\` becomes `/`, lower case becomes upper.
fn fold_word(word: u32) -> u32 {
    let backslashes = word ^ 0x5C5C_5C5C;
    let flags = (!backslashes >> 7) & (backslashes.wrapping_sub(0x0101_0101) >> 7) & 0x0101_0101;
    word.wrapping_sub(flags.wrapping_mul(45)) & 0xDFDF_DFDF
}

/// High bit set in every zero byte of `word` (below the first zero byte).
fn zero_bytes(word: u32) -> u32 {
    !word & word.wrapping_sub(0x0101_0101) & 0x8080_8080
}

/// Compute the asset GUID of `path`.
///
/// Hashing stops at the end of the string or at the first NUL byte.
/// The empty path hashes to zero.
///
/// ```
/// use rtech::formats::common::asset_guid;
///
/// assert_eq!(asset_guid("ui/loadscreen.rpak"), 0x7c5898db16539223);
/// assert_eq!(asset_guid("UI\\LOADSCREEN.RPAK"), asset_guid("ui/loadscreen.rpak"));
/// ```
#[must_use]
pub fn asset_guid(path: &str) -> u64 {
    let bytes = path.as_bytes();
    let word_at = |pos: usize| {
        let mut word = [0u8; 4];
        for (dst, &src) in word.iter_mut().zip(bytes.iter().skip(pos)) {
            *dst = src;
        }
        u32::from_le_bytes(word)
    };

    let mut hash = 0u64;
    let mut consumed = 0u64;
    let mut pos = 0;
    let mut word = word_at(pos);
    let mut zeros = zero_bytes(word);
    while zeros == 0 {
        let mixed = MIX_WORD.wrapping_mul(u64::from(fold_word(word))) >> 24;
        hash = mixed.wrapping_add(MIX_STATE.wrapping_mul(hash));
        hash ^= hash >> 61;
        pos += 4;
        consumed += 4;
        word = word_at(pos);
        zeros = zero_bytes(word);
    }

    // Bytes in front of the terminator, as a mask and as a count.
    let tail_mask = (zeros & zeros.wrapping_neg()).wrapping_sub(1);
    let tail_len = u64::from((31 - tail_mask.leading_zeros()) / 8);
    let tail = MIX_WORD.wrapping_mul(u64::from(fold_word(word) & tail_mask)) >> 24;

    MIX_STATE
        .wrapping_mul(hash)
        .wrapping_add(tail)
        .wrapping_sub(LENGTH_PENALTY.wrapping_mul(consumed + tail_len))
}

/// A 64-bit asset GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AssetHash(pub u64);

impl AssetHash {
    /// Hash an asset path.
    #[must_use]
    pub fn of(path: &str) -> Self {
        Self(asset_guid(path))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<&str> for AssetHash {
    fn from(path: &str) -> Self {
        Self::of(path)
    }
}

impl fmt::Display for AssetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_guids() {
        let cases = [
            ("", 0x0),
            ("a", 0xff51afd7f15376c8),
            ("abc", 0xfdf50fa9352635dd),
            ("abcd", 0x4a706cf3235fd74e),
            ("material/models/test.rpak", 0x63beedb854f35177),
            ("texture/effects/smoke_01.rpak", 0x05e6df6f6093048c),
            ("ui/loadscreen.rpak", 0x7c5898db16539223),
        ];
        for (path, expected) in cases {
            assert_eq!(asset_guid(path), expected, "{path}");
        }
    }

    #[test]
    fn test_case_and_separator_folding() {
        assert_eq!(asset_guid("A"), asset_guid("a"));
        assert_eq!(
            asset_guid("MATERIAL\\MODELS\\TEST.RPAK"),
            asset_guid("material/models/test.rpak")
        );
    }

    #[test]
    fn test_stops_at_nul() {
        assert_eq!(asset_guid("abc\0ignored"), asset_guid("abc"));
        assert_eq!(asset_guid("\0abc"), 0);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(asset_guid("ab/cd"), asset_guid("cd/ab"));
        assert_ne!(asset_guid("ab"), asset_guid("ba"));
    }

    #[test]
    fn test_no_collisions_in_sample() {
        let mut seen = HashSet::new();
        for dir in ["models", "textures", "ui", "sound", "effects"] {
            for i in 0..400 {
                let path = format!("{dir}/asset_{i:04}.rpak");
                assert!(seen.insert(asset_guid(&path)), "collision on {path}");
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(AssetHash::of("abc").to_string(), "FDF50FA9352635DD");
        assert_eq!(AssetHash::from("").value(), 0);
    }
}
