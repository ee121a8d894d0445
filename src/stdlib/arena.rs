//! A bump allocator that never frees.
//!
//! Allocations are carved from the current chunk in 16 byte units and no
//! size is recorded anywhere. When a chunk runs out the memory is grown by
//! whole pages. Pages that land right after the chunk extend it, anything
//! else starts a new chunk and the rest of the old one is abandoned.

use crate::error::{LibcError, Result};
use crate::memory::{MemoryMut, Ptr, NULL, PAGESIZE};

const QUANTUM: usize = 16;

#[derive(Clone, Copy, Debug)]
struct Chunk {
    start: Ptr,
    /// End of the allocated part. Stale for the current chunk, whose
    /// allocated part ends at the cursor.
    used: Ptr,
}

/// The cursor only moves forward inside a chunk. A new chunk starts wherever
/// the memory put the new pages, which on a wasm memory is always above the
/// old one. Natively, [`HostMemory`](crate::memory::HostMemory) pages come
/// from the system allocator and may land lower, so `cursor` can go down
/// when a chunk is abandoned.
#[derive(Debug, Default)]
pub struct Arena {
    beg: Ptr,
    end: Ptr,
    chunks: Vec<Chunk>,
}

impl Arena {
    /// An arena that first hands out `[beg, end)`, usually the
    /// `__heap_base`..`__heap_end` of a module. `beg` must be 16 byte aligned.
    pub fn new(beg: Ptr, end: Ptr) -> Self {
        let chunks = if beg < end {
            vec![Chunk { start: beg, used: beg }]
        } else {
            Vec::new()
        };
        Self { beg, end, chunks }
    }

    /// Next address `malloc` would return.
    pub fn cursor(&self) -> Ptr {
        self.beg
    }

    /// End of the current chunk.
    pub fn end(&self) -> Ptr {
        self.end
    }

    /// Bytes left in the current chunk.
    pub fn remaining(&self) -> usize {
        self.end - self.beg
    }

    /// # Errors
    ///
    /// `LibcError::SizeOverflow`: `size` cannot be rounded up
    ///
    /// `LibcError::OutOfMemory`: the memory could not grow
    pub fn malloc<M: MemoryMut + ?Sized>(&mut self, mem: &mut M, size: usize) -> Result<Ptr> {
        if size == 0 {
            return Ok(NULL);
        }
        let size = round_up(size)?;
        self.reserve(mem, size)?;
        let res = self.beg;
        self.beg += size;
        Ok(res)
    }

    /// `malloc` of `nelem * elsize` zeroed bytes.
    pub fn calloc<M: MemoryMut + ?Sized>(
        &mut self,
        mem: &mut M,
        nelem: usize,
        elsize: usize,
    ) -> Result<Ptr> {
        let size = nelem.checked_mul(elsize).ok_or(LibcError::SizeOverflow)?;
        let res = self.malloc(mem, size)?;
        if res != NULL {
            mem.fill(res, 0, size);
        }
        Ok(res)
    }

    /// # Errors
    ///
    /// `LibcError::InvalidAlignment`: `align` is not a power of two
    pub fn aligned_alloc<M: MemoryMut + ?Sized>(
        &mut self,
        mem: &mut M,
        align: usize,
        size: usize,
    ) -> Result<Ptr> {
        if !align.is_power_of_two() {
            return Err(LibcError::InvalidAlignment(align));
        }
        if size == 0 {
            return Ok(NULL);
        }

        // Room for any padding, so the cursor no longer moves to a new chunk.
        let worst = size
            .checked_add(align - 1)
            .ok_or(LibcError::SizeOverflow)?;
        self.reserve(mem, round_up(worst)?)?;

        let pad = align.wrapping_sub(self.beg & (align - 1)) & (align - 1);
        Ok(self.malloc(mem, size + pad)? + pad)
    }

    /// Move the block at `ptr` into a fresh `size` byte allocation.
    ///
    /// No sizes are kept, so everything from `ptr` to the end of what was
    /// allocated in its chunk is copied, capped at `size`. Only the most
    /// recent block keeps exactly its own bytes.
    ///
    /// # Errors
    ///
    /// `LibcError::ForeignPointer`: `ptr` was not allocated by this arena
    pub fn realloc<M: MemoryMut + ?Sized>(
        &mut self,
        mem: &mut M,
        ptr: Ptr,
        size: usize,
    ) -> Result<Ptr> {
        if ptr == NULL {
            return self.malloc(mem, size);
        }
        let used = self.used_end(ptr).ok_or(LibcError::ForeignPointer(ptr))?;
        let res = self.malloc(mem, size)?;
        if res != NULL {
            mem.copy_within(res, ptr, size.min(used - ptr));
        }
        Ok(res)
    }

    /// Memory is never reused.
    pub fn free(&mut self, _ptr: Ptr) {}

    /// End of the allocated part of the chunk holding `ptr`.
    fn used_end(&self, ptr: Ptr) -> Option<Ptr> {
        let (last, older) = self.chunks.split_last()?;
        if (last.start..self.beg).contains(&ptr) {
            return Some(self.beg);
        }
        older
            .iter()
            .find(|chunk| (chunk.start..chunk.used).contains(&ptr))
            .map(|chunk| chunk.used)
    }

    /// Make room for `size` bytes at the cursor.
    fn reserve<M: MemoryMut + ?Sized>(&mut self, mem: &mut M, size: usize) -> Result<()> {
        let avail = self.remaining();
        if size <= avail {
            return Ok(());
        }

        let npages = (size - avail).div_ceil(PAGESIZE);
        self.grow(mem, npages, size)?;
        if self.remaining() < size {
            // The pages started a new chunk, which must hold it all.
            self.grow(mem, size.div_ceil(PAGESIZE), size)?;
        }
        Ok(())
    }

    fn grow<M: MemoryMut + ?Sized>(&mut self, mem: &mut M, npages: usize, size: usize) -> Result<()> {
        let oom = || LibcError::OutOfMemory { requested: size };
        let len = npages.checked_mul(PAGESIZE).ok_or_else(oom)?;
        let start = mem.grow(npages).ok_or_else(oom)?;

        if start == self.end && !self.chunks.is_empty() {
            self.end += len;
        } else {
            if let Some(chunk) = self.chunks.last_mut() {
                chunk.used = self.beg;
            }
            self.chunks.push(Chunk { start, used: start });
            self.beg = start;
            self.end = start + len;
        }
        log::debug!(
            "arena grew by {npages} pages at {start:#x}, chunk is now {:#x}..{:#x}",
            self.beg,
            self.end
        );
        Ok(())
    }
}

fn round_up(size: usize) -> Result<usize> {
    size.checked_add(QUANTUM - 1)
        .map(|size| size & !(QUANTUM - 1))
        .ok_or(LibcError::SizeOverflow)
}

/// Grow the memory by `increment` bytes and return the start of the new
/// pages, or the current end of memory for a zero increment.
///
/// # Errors
///
/// `LibcError::InvalidIncrement`: `increment` is negative or not a whole
/// number of pages
///
/// `LibcError::OutOfMemory`: the memory could not grow
pub fn sbrk<M: MemoryMut + ?Sized>(mem: &mut M, increment: isize) -> Result<Ptr> {
    if increment == 0 {
        return Ok(mem.size());
    }
    if increment < 0 || increment as usize % PAGESIZE != 0 {
        return Err(LibcError::InvalidIncrement(increment));
    }
    mem.grow(increment as usize / PAGESIZE)
        .ok_or(LibcError::OutOfMemory {
            requested: increment as usize,
        })
}
