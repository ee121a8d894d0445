use super::{scan_aligned, strchrnul, Bitmap256};
use crate::memory::{Memory, Ptr, Strategy};
use crate::v128::V128;
use std::ffi::c_int;

/// Length of the prefix of `s` made only of bytes in `set`.
pub fn strspn<M: Memory + ?Sized>(mem: &M, s: Ptr, set: Ptr) -> usize {
    let c = mem.load8(set);
    if c == 0 {
        return 0;
    }

    if mem.load8(set + 1) == 0 {
        return match mem.strategy() {
            Strategy::Simd128 => {
                let vc = V128::splat(c);
                scan_aligned(mem, s, |v| {
                    let cmp = v.cmpeq(vc);
                    if cmp.all_true() {
                        0
                    } else {
                        !cmp.bitmask() & 0xffff
                    }
                })
            }
            Strategy::Scalar => (s..).take_while(|&p| mem.load8(p) == c).count(),
        };
    }

    // The terminator is never in the span.
    let bitmap = Bitmap256::from_cstr(mem, set, false);
    span_bitmap(mem, s, &bitmap, true)
}

/// Length of the prefix of `s` made only of bytes not in `set`.
pub fn strcspn<M: Memory + ?Sized>(mem: &M, s: Ptr, set: Ptr) -> usize {
    let c = mem.load8(set);
    if c == 0 || mem.load8(set + 1) == 0 {
        return strchrnul(mem, s, c as c_int) - s;
    }

    // The terminator always ends the span.
    let bitmap = Bitmap256::from_cstr(mem, set, true);
    span_bitmap(mem, s, &bitmap, false)
}

/// Length of the prefix of `s` whose bytes are (`member`) or are not in
/// `bitmap`. The caller guarantees the terminator ends the prefix.
pub(crate) fn span_bitmap<M: Memory + ?Sized>(
    mem: &M,
    s: Ptr,
    bitmap: &Bitmap256,
    member: bool,
) -> usize {
    match mem.strategy() {
        Strategy::Simd128 => scan_aligned(mem, s, |v| {
            let outside = bitmap.classify(v).cmpeq(V128::ZERO).bitmask();
            if member {
                outside
            } else {
                !outside & 0xffff
            }
        }),
        Strategy::Scalar => (s..)
            .take_while(|&p| bitmap.contains(mem.load8(p)) == member)
            .count(),
    }
}
