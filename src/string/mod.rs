//! `string.h` and `strings.h`.
//!
//! Every function takes the memory it runs against plus C-style arguments and
//! returns what the C function would: a [`Ptr`] (or [`NULL`]), a byte count,
//! or a `c_int` difference.
//!
//! [`Ptr`]: crate::memory::Ptr
//! [`NULL`]: crate::memory::NULL

mod bitmap;
mod compare;
mod copy;
mod scan;
mod search;
mod span;

pub use bitmap::Bitmap256;
pub use compare::{bcmp, memcmp, strcasecmp, strcmp, strncasecmp, strncmp};
pub use copy::{
    memccpy, memcpy, memmove, memset, stpcpy, stpncpy, strcpy, strncat, strncpy,
};
pub use scan::{memchr, memrchr, strchr, strchrnul, strlen, strnlen, strrchr};
pub use search::{memmem, strcasestr, strstr};
pub use span::{strcspn, strspn};

use crate::memory::{Memory, Ptr};
use crate::v128::{V128, LANES};

/// Offset from `s` of the first set lane at or after `s`, scanning aligned
/// lanes. `hits` maps a lane to its 16-bit lane mask.
///
/// Reads the whole lane containing `s` and every lane up to the hit, so it
/// must only be used with [`Strategy::Simd128`](crate::memory::Strategy).
fn scan_aligned<M, F>(mem: &M, s: Ptr, mut hits: F) -> usize
where
    M: Memory + ?Sized,
    F: FnMut(V128) -> u32,
{
    let align = s % LANES;
    let mut addr = s - align;
    let mut align = align as u32;
    loop {
        // Lanes below `s` are cleared.
        let mask = hits(mem.load128(addr)) >> align << align;
        if mask != 0 {
            return addr + mask.trailing_zeros() as usize - s;
        }
        align = 0;
        addr += LANES;
    }
}

/// The last address at which a full lane can be loaded.
fn lane_limit<M: Memory + ?Sized>(mem: &M) -> Option<Ptr> {
    mem.size().checked_sub(LANES)
}
