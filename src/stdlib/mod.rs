//! `stdlib.h`: the arena allocator and `qsort`.

mod arena;
mod qsort;

pub use arena::{sbrk, Arena};
pub use qsort::qsort;
