//! Substring search.
//!
//! All three searches share one shape: find the first byte of the needle with
//! the scan primitives, then walk the haystack a lane at a time keeping only
//! the positions where both the first byte and an anchor byte match, and
//! verify those in full. Long needles also get a bad-character table that
//! lets a failed lane skip ahead.

use super::span::span_bitmap;
use super::{bcmp, lane_limit, memchr, strchr, strncasecmp, strncmp, strnlen, Bitmap256};
use crate::memory::{Memory, Ptr, Strategy, NULL};
use crate::v128::{V128, LANES};
use std::ffi::c_int;

/// Shift for every byte value after a failed lane, Quick Search style.
///
/// Entry `b` is how far the window may move when `b` is the first byte past
/// it: `nn - 1 - i` for the last `i` with `needle[i] == b`. Only the last 255
/// needle bytes are recorded, others default to `min(nn, 255)`.
struct BadCharTable([u8; 256]);

impl BadCharTable {
    fn new<M: Memory + ?Sized>(mem: &M, needle: Ptr, nn: usize, fold: bool) -> Self {
        let mut table = [nn.min(255) as u8; 256];
        for i in nn.saturating_sub(255)..nn {
            let b = mem.load8(needle + i);
            let shift = (nn - 1 - i) as u8;
            if fold {
                table[b.to_ascii_lowercase() as usize] = shift;
                table[b.to_ascii_uppercase() as usize] = shift;
            } else {
                table[b as usize] = shift;
            }
        }
        Self(table)
    }

    fn shift(&self, b: u8) -> usize {
        self.0[b as usize] as usize
    }
}

/// Index of the rightmost needle byte that differs from the first one, or
/// the last index when they are all the same.
fn anchor<M, F>(mem: &M, needle: Ptr, nn: usize, byte: F) -> usize
where
    M: Memory + ?Sized,
    F: Fn(u8) -> u8,
{
    let first = byte(mem.load8(needle));
    (1..nn)
        .rev()
        .find(|&i| byte(mem.load8(needle + i)) != first)
        .unwrap_or(nn - 1)
}

/// Lane mask of the positions in `[p, p + 16)` where the first byte and the
/// anchor byte of the needle both match.
fn candidates<M, F>(mem: &M, p: Ptr, anchor: usize, first: V128, last: V128, lane: F) -> u32
where
    M: Memory + ?Sized,
    F: Fn(V128) -> V128,
{
    let cmp = lane(mem.load128(p)).cmpeq(first) & lane(mem.load128(p + anchor)).cmpeq(last);
    if cmp.any_true() {
        cmp.bitmask()
    } else {
        0
    }
}

/// First occurrence of the `nn` bytes at `needle` in the `hn` bytes at
/// `haystack`.
///
/// Only reads inside both objects, whatever the strategy.
pub fn memmem<M: Memory + ?Sized>(
    mem: &M,
    haystack: Ptr,
    hn: usize,
    needle: Ptr,
    nn: usize,
) -> Ptr {
    if nn == 0 {
        return haystack;
    }
    if nn > hn {
        return NULL;
    }

    // A match can only start in the first `hn - nn + 1` bytes.
    let mut p = memchr(mem, haystack, mem.load8(needle) as c_int, hn - nn + 1);
    if p == NULL || nn == 1 {
        return p;
    }

    let end = haystack + hn;
    let a = anchor(mem, needle, nn, |b| b);
    let first = V128::splat(mem.load8(needle));
    let last = V128::splat(mem.load8(needle + a));
    let table = (nn > LANES).then(|| BadCharTable::new(mem, needle, nn, false));

    // All 16 positions of the lane are possible starts.
    while p + LANES + nn - 1 <= end {
        let mut mask = candidates(mem, p, a, first, last, |v| v);
        while mask != 0 {
            let c = p + mask.trailing_zeros() as usize;
            if bcmp(mem, c, needle, nn) == 0 {
                return c;
            }
            mask &= mask - 1;
        }

        // The first byte past the window of the last position tried.
        let next = p + LANES - 1 + nn;
        p += LANES;
        if let Some(table) = &table {
            if next < end {
                p += table.shift(mem.load8(next));
            }
        }
    }

    let n0 = mem.load8(needle);
    while p + nn <= end {
        if mem.load8(p) == n0 && bcmp(mem, p, needle, nn) == 0 {
            return p;
        }
        p += 1;
    }
    NULL
}

/// First occurrence of the string `needle` in the string `haystack`.
pub fn strstr<M: Memory + ?Sized>(mem: &M, haystack: Ptr, needle: Ptr) -> Ptr {
    str_search(mem, haystack, needle, false)
}

/// [`strstr`] under ASCII case folding.
pub fn strcasestr<M: Memory + ?Sized>(mem: &M, haystack: Ptr, needle: Ptr) -> Ptr {
    str_search(mem, haystack, needle, true)
}

/// First byte of `s` that equals `c` in either case, or `NULL`.
fn strchr_fold<M: Memory + ?Sized>(mem: &M, s: Ptr, c: u8) -> Ptr {
    if !c.is_ascii_alphabetic() {
        return strchr(mem, s, c as c_int);
    }
    let mut bitmap = Bitmap256::new();
    bitmap.set(c.to_ascii_lowercase());
    bitmap.set(c.to_ascii_uppercase());
    bitmap.set(0);
    let p = s + span_bitmap(mem, s, &bitmap, false);
    if mem.load8(p) == 0 {
        NULL
    } else {
        p
    }
}

fn str_search<M: Memory + ?Sized>(mem: &M, haystack: Ptr, needle: Ptr, fold: bool) -> Ptr {
    let n0 = mem.load8(needle);
    if n0 == 0 {
        return haystack;
    }

    let mut p = if fold {
        strchr_fold(mem, haystack, n0)
    } else {
        strchr(mem, haystack, n0 as c_int)
    };
    let nn = super::strlen(mem, needle);
    if p == NULL || nn == 1 {
        return p;
    }

    let byte = |b: u8| if fold { b.to_ascii_lowercase() } else { b };
    let lane = |v: V128| if fold { v.to_ascii_lowercase() } else { v };
    let verify = |c: Ptr| {
        if fold {
            strncasecmp(mem, c, needle, nn) == 0
        } else {
            strncmp(mem, c, needle, nn) == 0
        }
    };

    if mem.strategy() == Strategy::Simd128 {
        let a = anchor(mem, needle, nn, byte);
        let first = V128::splat(byte(n0));
        let last = V128::splat(byte(mem.load8(needle + a)));
        let table = (nn > LANES).then(|| BadCharTable::new(mem, needle, nn, fold));
        let limit = lane_limit(mem).unwrap_or(0);
        // Every byte from `p` up to here is known not to be the terminator.
        let mut frontier = p;

        // Lanes may run past the terminator. Candidates are cut at it.
        while p + a <= limit {
            let head = mem.load128(p);
            let term = head.cmpeq(V128::ZERO).bitmask();
            let before_term = if term == 0 {
                0xffff
            } else {
                (1 << term.trailing_zeros()) - 1
            };

            let mut mask = candidates(mem, p, a, first, last, lane) & before_term;
            while mask != 0 {
                let c = p + mask.trailing_zeros() as usize;
                if verify(c) {
                    return c;
                }
                mask &= mask - 1;
            }
            if term != 0 {
                return NULL;
            }

            p += LANES;
            frontier = frontier.max(p);
            if let Some(table) = &table {
                // The window of any later match covers all `nn` bytes at
                // `p`, so they must be in the string.
                let want = p + nn;
                if frontier < want {
                    if strnlen(mem, frontier, want - frontier) < want - frontier {
                        return NULL;
                    }
                    frontier = want;
                }
                p += table.shift(mem.load8(p + nn - 1));
            }
        }
    }

    let n0 = byte(n0);
    loop {
        let b = mem.load8(p);
        if b == 0 {
            return NULL;
        }
        if byte(b) == n0 && verify(p) {
            return p;
        }
        p += 1;
    }
}
