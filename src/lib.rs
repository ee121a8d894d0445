#![doc = include_str!("../README.md")]

pub mod ctype;
pub mod error;
pub mod memory;
pub mod stdlib;
pub mod string;
pub mod v128;

mod lock_api;

#[allow(non_camel_case_types)]
#[allow(clippy::missing_safety_doc)]
mod shim;

pub use error::{LibcError, Result};
pub use memory::{
    HostMemory, LinearMemory, Memory, MemoryCfg, MemoryCfgBuilder, MemoryMut, Ptr, Strategy,
    NULL, PAGESIZE,
};
