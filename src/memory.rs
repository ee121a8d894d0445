//! The address space the primitives run against.
//!
//! Every primitive takes a [`Memory`] and plain integer addresses ([`Ptr`]),
//! exactly like C code compiled to a wasm linear memory. Address `0` is the
//! null pointer.
//!
//! The vectorized algorithms load whole 16-byte lanes and may touch up to one
//! lane past the bytes they logically need. That is only sound when the memory
//! guarantees such loads cannot fault, so each memory reports a [`Strategy`]
//! and the primitives fall back to byte-at-a-time loops when it is
//! [`Strategy::Scalar`].

use crate::error::{LibcError, Result};
use crate::v128::{V128, LANES};

/// An address in a [`Memory`].
pub type Ptr = usize;

/// The null pointer.
pub const NULL: Ptr = 0;

/// wasm page size.
pub const PAGESIZE: usize = 65536;

/// How the primitives scan a memory.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Lane-width loads, including aligned loads below the start of an object
    /// and past its end.
    Simd128,
    /// Never read a byte the C contract does not allow.
    Scalar,
}

impl Strategy {
    /// Pick the best strategy for a memory that does (or does not) guarantee
    /// that any aligned 16-byte load starting below `size` succeeds.
    pub fn probe(lane_loads_safe: bool) -> Strategy {
        let strategy = if lane_loads_safe {
            Strategy::Simd128
        } else {
            Strategy::Scalar
        };
        log::debug!("libc strategy: {strategy:?}");
        strategy
    }
}

/// Read access to an address space.
pub trait Memory {
    /// Number of addressable bytes, the first invalid address.
    fn size(&self) -> usize;

    fn strategy(&self) -> Strategy;

    fn load8(&self, addr: Ptr) -> u8;

    /// Unaligned 16-byte load.
    fn load128(&self, addr: Ptr) -> V128;
}

/// Write access to an address space.
pub trait MemoryMut: Memory {
    fn store8(&mut self, addr: Ptr, value: u8);

    /// `memmove` semantics: the ranges may overlap.
    fn copy_within(&mut self, dst: Ptr, src: Ptr, n: usize);

    fn fill(&mut self, dst: Ptr, value: u8, n: usize);

    /// Obtain `npages` fresh, zeroed pages and return the address of the
    /// first one. `None` when the memory cannot grow.
    fn grow(&mut self, npages: usize) -> Option<Ptr>;
}

/// [`LinearMemory`] options
#[derive(Clone, Debug)]
pub struct MemoryCfg {
    /// Pages available when the memory is created.
    pub initial_pages: usize,
    /// The memory never grows beyond this many pages.
    pub maximum_pages: usize,
    /// First address the allocator may hand out, the `__heap_base` of the
    /// module. Everything below it is static data and stack.
    pub heap_base: Ptr,
    /// Force a strategy instead of probing.
    pub strategy: Option<Strategy>,
}

impl Default for MemoryCfg {
    fn default() -> Self {
        Self {
            initial_pages: 16,
            maximum_pages: 32768,
            heap_base: 1024,
            strategy: None,
        }
    }
}

/// Build `MemoryCfg`
pub struct MemoryCfgBuilder(MemoryCfg);

impl MemoryCfgBuilder {
    pub fn new() -> Self {
        Self(MemoryCfg::default())
    }

    /// Pages available when the memory is created.
    pub fn initial_pages(mut self, pages: usize) -> Self {
        self.0.initial_pages = pages;
        self
    }

    /// The memory never grows beyond this many pages.
    pub fn maximum_pages(mut self, pages: usize) -> Self {
        self.0.maximum_pages = pages;
        self
    }

    /// First address the allocator may hand out.
    pub fn heap_base(mut self, base: Ptr) -> Self {
        self.0.heap_base = base;
        self
    }

    /// Force a strategy instead of probing.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.0.strategy = Some(strategy);
        self
    }

    /// Build MemoryCfg
    pub fn build(self) -> MemoryCfg {
        self.0
    }
}

impl Default for MemoryCfgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An owned, growable, page-granular memory: the wasm sandbox.
///
/// Its size is always a whole number of pages, so an aligned lane load that
/// starts inside it is always fully inside it. Any access outside it panics,
/// which is this memory's trap.
pub struct LinearMemory {
    bytes: Vec<u8>,
    maximum_pages: usize,
    heap_base: Ptr,
    heap_end: Ptr,
    strategy: Strategy,
}

impl LinearMemory {
    /// # Errors
    ///
    /// `LibcError::InvalidConfig`: the page counts or heap base are inconsistent
    pub fn new(cfg: MemoryCfg) -> Result<Self> {
        if cfg.initial_pages == 0 {
            return Err(LibcError::InvalidConfig("initial_pages must be positive"));
        }
        if cfg.initial_pages > cfg.maximum_pages {
            return Err(LibcError::InvalidConfig(
                "initial_pages must not exceed maximum_pages",
            ));
        }
        let size = cfg
            .initial_pages
            .checked_mul(PAGESIZE)
            .ok_or(LibcError::InvalidConfig("initial_pages is too large"))?;
        if cfg.heap_base == NULL || cfg.heap_base % LANES != 0 || cfg.heap_base > size {
            return Err(LibcError::InvalidConfig(
                "heap_base must be a non-null, 16 byte aligned address inside the memory",
            ));
        }

        let strategy = cfg.strategy.unwrap_or_else(|| Strategy::probe(true));

        Ok(Self {
            bytes: vec![0; size],
            maximum_pages: cfg.maximum_pages,
            heap_base: cfg.heap_base,
            heap_end: size,
            strategy,
        })
    }

    /// Current size in pages.
    pub fn pages(&self) -> usize {
        self.bytes.len() / PAGESIZE
    }

    /// The `__heap_base` of this memory.
    pub fn heap_base(&self) -> Ptr {
        self.heap_base
    }

    /// The `__heap_end` of this memory: the size it was created with.
    pub fn heap_end(&self) -> Ptr {
        self.heap_end
    }

    /// Borrow `len` bytes starting at `addr`.
    pub fn read(&self, addr: Ptr, len: usize) -> &[u8] {
        &self.bytes[addr..addr + len]
    }

    /// Copy `data` to `addr`.
    pub fn write(&mut self, addr: Ptr, data: &[u8]) {
        self.bytes[addr..addr + data.len()].copy_from_slice(data);
    }

    /// Copy `data` to `addr` and append a terminator.
    pub fn write_cstr(&mut self, addr: Ptr, data: &[u8]) {
        self.write(addr, data);
        self.bytes[addr + data.len()] = 0;
    }

    /// The NUL-terminated string at `addr`, without its terminator.
    pub fn read_cstr(&self, addr: Ptr) -> &[u8] {
        let tail = &self.bytes[addr..];
        let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        &tail[..len]
    }

    /// Zero the whole memory.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

impl Memory for LinearMemory {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn load8(&self, addr: Ptr) -> u8 {
        self.bytes[addr]
    }

    fn load128(&self, addr: Ptr) -> V128 {
        let mut lane = [0u8; LANES];
        lane.copy_from_slice(&self.bytes[addr..addr + LANES]);
        V128::from_bytes(lane)
    }
}

impl MemoryMut for LinearMemory {
    fn store8(&mut self, addr: Ptr, value: u8) {
        self.bytes[addr] = value;
    }

    fn copy_within(&mut self, dst: Ptr, src: Ptr, n: usize) {
        self.bytes.copy_within(src..src + n, dst);
    }

    fn fill(&mut self, dst: Ptr, value: u8, n: usize) {
        self.bytes[dst..dst + n].fill(value);
    }

    fn grow(&mut self, npages: usize) -> Option<Ptr> {
        let old = self.pages();
        let new = old.checked_add(npages)?;
        if new > self.maximum_pages {
            return None;
        }
        self.bytes.resize(new * PAGESIZE, 0);
        log::debug!("linear memory grew from {old} to {new} pages");
        Some(old * PAGESIZE)
    }
}

/// The address space of the running process.
///
/// On wasm32 this is the module's own linear memory, so lane over-reads are
/// safe and the vector strategy is used. Anywhere else there is no such
/// guarantee and every primitive runs its scalar path, except the bounded
/// ones whose lane loads never leave the object.
pub struct HostMemory {
    _private: (),
}

impl HostMemory {
    /// # Safety
    ///
    /// Every address passed to a primitive together with this memory must be a
    /// valid pointer for the reads and writes that primitive's C contract
    /// allows.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Memory for HostMemory {
    #[cfg(target_arch = "wasm32")]
    fn size(&self) -> usize {
        core::arch::wasm32::memory_size(0) * PAGESIZE
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn size(&self) -> usize {
        usize::MAX
    }

    fn strategy(&self) -> Strategy {
        if cfg!(target_arch = "wasm32") {
            Strategy::Simd128
        } else {
            Strategy::Scalar
        }
    }

    fn load8(&self, addr: Ptr) -> u8 {
        unsafe { *(addr as *const u8) }
    }

    fn load128(&self, addr: Ptr) -> V128 {
        V128::from_bytes(unsafe { std::ptr::read_unaligned(addr as *const [u8; LANES]) })
    }
}

impl MemoryMut for HostMemory {
    fn store8(&mut self, addr: Ptr, value: u8) {
        unsafe { *(addr as *mut u8) = value };
    }

    fn copy_within(&mut self, dst: Ptr, src: Ptr, n: usize) {
        unsafe { std::ptr::copy(src as *const u8, dst as *mut u8, n) };
    }

    fn fill(&mut self, dst: Ptr, value: u8, n: usize) {
        unsafe { std::ptr::write_bytes(dst as *mut u8, value, n) };
    }

    #[cfg(target_arch = "wasm32")]
    fn grow(&mut self, npages: usize) -> Option<Ptr> {
        let old = core::arch::wasm32::memory_grow(0, npages);
        if old == usize::MAX {
            return None;
        }
        Some(old * PAGESIZE)
    }

    /// Pages come from the system allocator, at no particular address
    /// relative to earlier ones.
    #[cfg(not(target_arch = "wasm32"))]
    fn grow(&mut self, npages: usize) -> Option<Ptr> {
        let size = npages.checked_mul(PAGESIZE)?;
        let layout = std::alloc::Layout::from_size_align(size, PAGESIZE).ok()?;
        // Arena pages are never returned.
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            return None;
        }
        Some(ptr as Ptr)
    }
}
