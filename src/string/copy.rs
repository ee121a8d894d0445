//! Copies, built on the scan primitives and the memory's bulk operations.

use super::{memchr, strlen, strnlen};
use crate::memory::{MemoryMut, Ptr, NULL};
use std::ffi::c_int;

pub fn memset<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, c: c_int, n: usize) -> Ptr {
    mem.fill(dest, c as u8, n);
    dest
}

/// The objects must not overlap.
pub fn memcpy<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr, n: usize) -> Ptr {
    mem.copy_within(dest, src, n);
    dest
}

pub fn memmove<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr, n: usize) -> Ptr {
    mem.copy_within(dest, src, n);
    dest
}

/// Copy up to and including the first `c` in the `n` bytes at `src`.
/// Returns the byte after the copied `c` in `dest`, or `NULL` if there was
/// none and all `n` bytes were copied.
pub fn memccpy<M: MemoryMut + ?Sized>(
    mem: &mut M,
    dest: Ptr,
    src: Ptr,
    c: c_int,
    n: usize,
) -> Ptr {
    match memchr(mem, src, c, n) {
        NULL => {
            mem.copy_within(dest, src, n);
            NULL
        }
        m => {
            let n = m - src + 1;
            mem.copy_within(dest, src, n);
            dest + n
        }
    }
}

/// Append at most `n` bytes of `src` to `dest`, always terminating it.
pub fn strncat<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr, n: usize) -> Ptr {
    let dlen = strlen(mem, dest);
    let slen = strnlen(mem, src, n);
    mem.copy_within(dest + dlen, src, slen);
    mem.store8(dest + dlen + slen, 0);
    dest
}

/// `strcpy` returning the terminator written to `dest`.
pub fn stpcpy<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr) -> Ptr {
    let slen = strlen(mem, src);
    mem.copy_within(dest, src, slen + 1);
    dest + slen
}

pub fn strcpy<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr) -> Ptr {
    stpcpy(mem, dest, src);
    dest
}

/// Copy at most `n` bytes of `src` and zero the rest of the `n` bytes at
/// `dest`. Returns the first zeroed byte, or `dest + n`.
pub fn stpncpy<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr, n: usize) -> Ptr {
    let slen = strnlen(mem, src, n);
    mem.copy_within(dest, src, slen);
    mem.fill(dest + slen, 0, n - slen);
    dest + slen
}

pub fn strncpy<M: MemoryMut + ?Sized>(mem: &mut M, dest: Ptr, src: Ptr, n: usize) -> Ptr {
    stpncpy(mem, dest, src, n);
    dest
}
