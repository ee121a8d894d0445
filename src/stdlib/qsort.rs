use crate::memory::{MemoryMut, Ptr};
use std::ffi::c_int;

/// Sort `nelem` elements of `width` bytes at `base` in place.
///
/// Shellsort with the Gonnet and Baeza-Yates gap sequence: no recursion and
/// no scratch buffer. Not stable. `compare` gets the memory and the addresses
/// of two elements and returns a positive value when the first sorts after
/// the second.
pub fn qsort<M, F>(mem: &mut M, base: Ptr, nelem: usize, width: usize, mut compare: F)
where
    M: MemoryMut + ?Sized,
    F: FnMut(&M, Ptr, Ptr) -> c_int,
{
    if width == 0 {
        return;
    }
    let Some(wnel) = width.checked_mul(nelem) else {
        return;
    };

    let mut gap = nelem;
    while gap > 1 {
        // Computed in 64 bits so `5 * gap` cannot overflow.
        gap = ((5 * gap as u64 - 1) / 11).max(1) as usize;

        let wgap = width * gap;
        for i in (wgap..wnel).step_by(width) {
            let mut j = i;
            while let Some(k) = j.checked_sub(wgap) {
                j = k;
                let a = base + j;
                let b = a + wgap;
                if compare(&*mem, a, b) <= 0 {
                    break;
                }
                swap(mem, a, b, width);
            }
        }
    }
}

fn swap<M: MemoryMut + ?Sized>(mem: &mut M, a: Ptr, b: Ptr, width: usize) {
    for k in 0..width {
        let x = mem.load8(a + k);
        let y = mem.load8(b + k);
        mem.store8(a + k, y);
        mem.store8(b + k, x);
    }
}
