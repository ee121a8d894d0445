//! `ctype.h` for the C locale.
//!
//! Arguments outside `0..=255` are never members of any class.

use std::ffi::c_int;

fn in_range(c: c_int, lo: u8, len: u32) -> c_int {
    ((c as u32).wrapping_sub(lo as u32) < len) as c_int
}

pub fn isalnum(c: c_int) -> c_int {
    (isalpha(c) != 0 || isdigit(c) != 0) as c_int
}

pub fn isalpha(c: c_int) -> c_int {
    in_range(c | 32, b'a', 26)
}

pub fn isascii(c: c_int) -> c_int {
    (c & !0x7f == 0) as c_int
}

pub fn isblank(c: c_int) -> c_int {
    (c == b' ' as c_int || c == b'\t' as c_int) as c_int
}

pub fn iscntrl(c: c_int) -> c_int {
    ((c as u32) < 0x20 || c == 0x7f) as c_int
}

pub fn isdigit(c: c_int) -> c_int {
    in_range(c, b'0', 10)
}

pub fn isgraph(c: c_int) -> c_int {
    in_range(c, 0x21, 0x5e)
}

pub fn islower(c: c_int) -> c_int {
    in_range(c, b'a', 26)
}

pub fn isprint(c: c_int) -> c_int {
    in_range(c, 0x20, 0x5f)
}

pub fn ispunct(c: c_int) -> c_int {
    (isgraph(c) != 0 && isalnum(c) == 0) as c_int
}

pub fn isspace(c: c_int) -> c_int {
    (c == b' ' as c_int || in_range(c, b'\t', 5) != 0) as c_int
}

pub fn isupper(c: c_int) -> c_int {
    in_range(c, b'A', 26)
}

pub fn isxdigit(c: c_int) -> c_int {
    (isdigit(c) != 0 || in_range(c | 32, b'a', 6) != 0) as c_int
}

pub fn tolower(c: c_int) -> c_int {
    if isupper(c) != 0 {
        c | 32
    } else {
        c
    }
}

pub fn toupper(c: c_int) -> c_int {
    if islower(c) != 0 {
        c & 0x5f
    } else {
        c
    }
}
