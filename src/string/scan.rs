use super::scan_aligned;
use crate::memory::{Memory, Ptr, Strategy, NULL};
use crate::v128::{V128, LANES};
use std::ffi::c_int;

/// First `c` in the `n` bytes at `s`.
pub fn memchr<M: Memory + ?Sized>(mem: &M, s: Ptr, c: c_int, n: usize) -> Ptr {
    let c = c as u8;
    match mem.strategy() {
        Strategy::Simd128 => memchr_simd(mem, s, c, n),
        Strategy::Scalar => (s..s.saturating_add(n))
            .find(|&p| mem.load8(p) == c)
            .unwrap_or(NULL),
    }
}

fn memchr_simd<M: Memory + ?Sized>(mem: &M, s: Ptr, c: u8, n: usize) -> Ptr {
    // `n` counts the bytes left after the current one, so running out is an
    // underflow.
    let Some(mut n) = n.checked_sub(1) else {
        return NULL;
    };

    let align = s % LANES;
    let mut addr = s - align;
    let mut align = align;
    let vc = V128::splat(c);

    loop {
        let cmp = mem.load128(addr).cmpeq(vc);
        if cmp.any_true() {
            let mask = cmp.bitmask() >> align << align;
            if mask != 0 {
                let ctz = mask.trailing_zeros() as usize;
                return if ctz - align <= n { addr + ctz } else { NULL };
            }
        }
        n = match n.checked_sub(LANES - align) {
            Some(n) => n,
            None => return NULL,
        };
        align = 0;
        addr += LANES;
    }
}

/// Last `c` in the `n` bytes at `s`. Never reads below `s`.
pub fn memrchr<M: Memory + ?Sized>(mem: &M, s: Ptr, c: c_int, n: usize) -> Ptr {
    let c = c as u8;
    let vc = V128::splat(c);
    let mut end = s + n;
    let mut n = n;
    while n >= LANES {
        end -= LANES;
        n -= LANES;
        let cmp = mem.load128(end).cmpeq(vc);
        if cmp.any_true() {
            let last = 31 - cmp.bitmask().leading_zeros() as usize;
            return end + last;
        }
    }
    while n > 0 {
        end -= 1;
        n -= 1;
        if mem.load8(end) == c {
            return end;
        }
    }
    NULL
}

pub fn strlen<M: Memory + ?Sized>(mem: &M, s: Ptr) -> usize {
    match mem.strategy() {
        Strategy::Simd128 => scan_aligned(mem, s, |v| {
            if v.all_true() {
                0
            } else {
                v.cmpeq(V128::ZERO).bitmask()
            }
        }),
        Strategy::Scalar => (s..).take_while(|&p| mem.load8(p) != 0).count(),
    }
}

/// `strlen`, reading at most `n` bytes.
pub fn strnlen<M: Memory + ?Sized>(mem: &M, s: Ptr, n: usize) -> usize {
    match memchr(mem, s, 0, n) {
        NULL => n,
        p => p - s,
    }
}

/// First `c` in the string at `s`, or its terminator.
pub fn strchrnul<M: Memory + ?Sized>(mem: &M, s: Ptr, c: c_int) -> Ptr {
    let c = c as u8;
    if c == 0 {
        return s + strlen(mem, s);
    }
    match mem.strategy() {
        Strategy::Simd128 => {
            let vc = V128::splat(c);
            s + scan_aligned(mem, s, |v| (v.cmpeq(V128::ZERO) | v.cmpeq(vc)).bitmask())
        }
        Strategy::Scalar => (s..)
            .find(|&p| {
                let b = mem.load8(p);
                b == 0 || b == c
            })
            .unwrap_or(NULL),
    }
}

pub fn strchr<M: Memory + ?Sized>(mem: &M, s: Ptr, c: c_int) -> Ptr {
    let r = strchrnul(mem, s, c);
    if mem.load8(r) == c as u8 {
        r
    } else {
        NULL
    }
}

pub fn strrchr<M: Memory + ?Sized>(mem: &M, s: Ptr, c: c_int) -> Ptr {
    memrchr(mem, s, c, strlen(mem, s) + 1)
}
