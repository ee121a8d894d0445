use super::lane_limit;
use crate::memory::{Memory, Ptr, Strategy};
use crate::v128::{V128, LANES};
use std::ffi::c_int;

fn diff(a: u8, b: u8) -> c_int {
    a as c_int - b as c_int
}

fn fold(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

/// Difference of the first mismatching bytes in the `n` bytes at `a` and `b`.
///
/// Only reads inside both objects, whatever the strategy.
pub fn memcmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr, n: usize) -> c_int {
    if n < LANES {
        for i in 0..n {
            let (x, y) = (mem.load8(a + i), mem.load8(b + i));
            if x != y {
                return diff(x, y);
            }
        }
        return 0;
    }

    let (mut a, mut b, mut n) = (a, b, n);
    while n > 0 {
        let cmp = mem.load128(a).cmpeq(mem.load128(b));
        if !cmp.all_true() {
            let ctz = (!cmp.bitmask() & 0xffff).trailing_zeros() as usize;
            return diff(mem.load8(a + ctz), mem.load8(b + ctz));
        }
        // Every step after the first is a full lane.
        let step = (n - 1) % LANES + 1;
        a += step;
        b += step;
        n -= step;
    }
    0
}

/// `0` if the `n` bytes at `a` and `b` are equal, `1` otherwise.
pub fn bcmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr, n: usize) -> c_int {
    let (mut a, mut b, mut n) = (a, b, n);
    while n >= LANES {
        if (mem.load128(a) ^ mem.load128(b)).any_true() {
            return 1;
        }
        a += LANES;
        b += LANES;
        n -= LANES;
    }
    for i in 0..n {
        if mem.load8(a + i) != mem.load8(b + i) {
            return 1;
        }
    }
    0
}

/// Skip the lanes at `a` and `b` that are equal and hold no terminator.
///
/// Returns the addresses to continue from and the bytes left of `n`, or `None`
/// when a shared terminator proves the strings equal.
fn skip_equal_lanes<M, F>(
    mem: &M,
    mut a: Ptr,
    mut b: Ptr,
    mut n: usize,
    lane: F,
) -> Option<(Ptr, Ptr, usize)>
where
    M: Memory + ?Sized,
    F: Fn(V128) -> V128,
{
    if mem.strategy() == Strategy::Scalar {
        return Some((a, b, n));
    }
    let Some(limit) = lane_limit(mem) else {
        return Some((a, b, n));
    };
    while a <= limit && b <= limit && n >= LANES {
        let va = lane(mem.load128(a));
        if (va ^ lane(mem.load128(b))).any_true() {
            // The strings may still be equal before the difference.
            break;
        }
        if !va.all_true() {
            return None;
        }
        a += LANES;
        b += LANES;
        n -= LANES;
    }
    Some((a, b, n))
}

fn compare_tail<M, F>(mem: &M, a: Ptr, b: Ptr, n: usize, byte: F) -> c_int
where
    M: Memory + ?Sized,
    F: Fn(u8) -> u8,
{
    for i in 0..n {
        let (x, y) = (byte(mem.load8(a + i)), byte(mem.load8(b + i)));
        if x != y {
            return diff(x, y);
        }
        if x == 0 {
            break;
        }
    }
    0
}

pub fn strcmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr) -> c_int {
    strncmp(mem, a, b, usize::MAX)
}

pub fn strncmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr, n: usize) -> c_int {
    match skip_equal_lanes(mem, a, b, n, |v| v) {
        Some((a, b, n)) => compare_tail(mem, a, b, n, |x| x),
        None => 0,
    }
}

/// `strcmp` under ASCII case folding.
pub fn strcasecmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr) -> c_int {
    strncasecmp(mem, a, b, usize::MAX)
}

pub fn strncasecmp<M: Memory + ?Sized>(mem: &M, a: Ptr, b: Ptr, n: usize) -> c_int {
    match skip_equal_lanes(mem, a, b, n, V128::to_ascii_lowercase) {
        Some((a, b, n)) => compare_tail(mem, a, b, n, fold),
        None => 0,
    }
}
