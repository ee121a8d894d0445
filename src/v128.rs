//! A portable 128-bit lane-width word.
//!
//! Lane `i` is the byte at offset `i` from the load address (little-endian),
//! so bit `i` of [`V128::bitmask`] always refers to that byte. Comparisons
//! produce `0xff` in true lanes and `0x00` in false lanes, like `wasm_i8x16_eq`.
//!
//! Everything except [`V128::swizzle`] is done with SWAR arithmetic on a single
//! `u128`, which the compiler lowers to real vector instructions where it can.

use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Number of bytes per lane-width word.
pub const LANES: usize = 16;

const ONES: u128 = 0x0101_0101_0101_0101_0101_0101_0101_0101;
const LOW7: u128 = ONES * 0x7f;
const HIGH: u128 = ONES * 0x80;
const NIBBLE: u128 = ONES * 0x0f;

// Moves bit 0 of byte `i` to bit `56 + i` when multiplied into a u64.
const GATHER: u64 = 0x0102_0408_1020_4080;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct V128(u128);

impl V128 {
    pub const ZERO: V128 = V128(0);

    pub const fn from_bytes(bytes: [u8; LANES]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }

    pub const fn to_bytes(self) -> [u8; LANES] {
        self.0.to_le_bytes()
    }

    pub const fn splat(byte: u8) -> Self {
        Self(ONES * byte as u128)
    }

    /// `0x80` in every lane of `x` that is zero, `0x00` elsewhere. Exact, no
    /// false positives from borrows.
    const fn zero_lanes(x: u128) -> u128 {
        !(((x & LOW7) + LOW7) | x | LOW7)
    }

    /// Widen a `0x80`/`0x00` lane pattern to `0xff`/`0x00`.
    const fn widen(high_bits: u128) -> u128 {
        (high_bits >> 7) * 0xff
    }

    /// Lane-wise `==`.
    pub const fn cmpeq(self, other: V128) -> V128 {
        V128(Self::widen(Self::zero_lanes(self.0 ^ other.0)))
    }

    /// True if any bit is set.
    pub const fn any_true(self) -> bool {
        self.0 != 0
    }

    /// True if no lane is zero.
    pub const fn all_true(self) -> bool {
        Self::zero_lanes(self.0) == 0
    }

    /// One bit per lane, taken from the top bit of each lane.
    pub const fn bitmask(self) -> u32 {
        let bits = (self.0 & HIGH) >> 7;
        let lo = (bits as u64).wrapping_mul(GATHER) >> 56;
        let hi = ((bits >> 64) as u64).wrapping_mul(GATHER) >> 56;
        (lo | hi << 8) as u32
    }

    /// Lane-wise logical shift right by four, i.e. the high nibble of each byte.
    pub const fn high_nibbles(self) -> V128 {
        V128((self.0 >> 4) & NIBBLE)
    }

    /// Lane `i` of the result is `self[indices[i]]`, or zero when the index is
    /// out of range (>= 16), like `wasm_i8x16_swizzle`.
    pub fn swizzle(self, indices: V128) -> V128 {
        let table = self.to_bytes();
        let mut out = [0u8; LANES];
        for (dst, idx) in out.iter_mut().zip(indices.to_bytes()) {
            if let Some(&byte) = table.get(idx as usize) {
                *dst = byte;
            }
        }
        V128::from_bytes(out)
    }

    /// ASCII lower-casing of every lane.
    pub const fn to_ascii_lowercase(self) -> V128 {
        let x = self.0;
        // 0x80 where the lane is >= 'A'.
        let ge_a = ((x & LOW7) + ONES * (0x80 - b'A' as u128)) & !x & HIGH;
        // 0x80 where the lane is > 'Z'.
        let gt_z = ((x & LOW7) + ONES * (0x7f - b'Z' as u128)) & !x & HIGH;
        let upper = ge_a & !gt_z;
        V128(x | upper >> 2)
    }
}

impl BitAnd for V128 {
    type Output = V128;

    fn bitand(self, rhs: V128) -> V128 {
        V128(self.0 & rhs.0)
    }
}

impl BitOr for V128 {
    type Output = V128;

    fn bitor(self, rhs: V128) -> V128 {
        V128(self.0 | rhs.0)
    }
}

impl BitXor for V128 {
    type Output = V128;

    fn bitxor(self, rhs: V128) -> V128 {
        V128(self.0 ^ rhs.0)
    }
}

impl Not for V128 {
    type Output = V128;

    fn not(self) -> V128 {
        V128(!self.0)
    }
}
