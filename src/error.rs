use crate::memory::Ptr;

pub type Result<T> = std::result::Result<T, LibcError>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LibcError {
    #[error("out of memory: cannot grow the heap for {requested} bytes")]
    OutOfMemory { requested: usize },
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),
    #[error("allocation size overflows")]
    SizeOverflow,
    #[error("pointer {0:#x} was not allocated by this arena")]
    ForeignPointer(Ptr),
    #[error("sbrk increment {0} is not a non-negative multiple of the page size")]
    InvalidIncrement(isize),
    #[error("invalid memory config: {0}")]
    InvalidConfig(&'static str),
}
