//! Byte-set membership, one lane at a time.
//!
//! The 256 bits are packed into two 16-byte rows indexed by the low nibble of
//! a byte. Row `lo` holds bytes with a high nibble of 0..=7, row `hi` those
//! with 8..=15, and inside a row the bit is `1 << (high_nibble & 7)`. A lane is
//! classified with two table lookups, one per row, so bytes with the top bit
//! set pick `hi` and the rest pick `lo`.

use crate::memory::{Memory, Ptr};
use crate::v128::{V128, LANES};

// The byte `1 << (i & 7)` in lane `i`.
const BIT_LOOKUP: V128 = V128::from_bytes([1, 2, 4, 8, 16, 32, 64, 128, 1, 2, 4, 8, 16, 32, 64, 128]);

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Bitmap256 {
    lo: [u8; LANES],
    hi: [u8; LANES],
}

impl Bitmap256 {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set of bytes in the NUL-terminated string at `set`, plus the
    /// terminator itself when `with_terminator` is true.
    pub fn from_cstr<M: Memory + ?Sized>(mem: &M, set: Ptr, with_terminator: bool) -> Self {
        let mut bitmap = Self::new();
        for b in (set..).map(|p| mem.load8(p)).take_while(|&b| b != 0) {
            bitmap.set(b);
        }
        if with_terminator {
            bitmap.set(0);
        }
        bitmap
    }

    pub fn set(&mut self, byte: u8) {
        let row = if byte < 0x80 { &mut self.lo } else { &mut self.hi };
        row[(byte & 0xf) as usize] |= 1 << (byte >> 4 & 7);
    }

    pub fn contains(&self, byte: u8) -> bool {
        let row = if byte < 0x80 { &self.lo } else { &self.hi };
        row[(byte & 0xf) as usize] & 1 << (byte >> 4 & 7) != 0
    }

    /// Nonzero lanes are the members of the set.
    pub fn classify(&self, v: V128) -> V128 {
        let bit = BIT_LOOKUP.swizzle(v.high_nibbles());

        // Out of range indices (top bit set) select zero.
        let lo_indices = v & V128::splat(0x8f);
        let hi_indices = lo_indices ^ V128::splat(0x80);

        let lo = V128::from_bytes(self.lo).swizzle(lo_indices);
        let hi = V128::from_bytes(self.hi).swizzle(hi_indices);

        (lo | hi) & bit
    }
}
