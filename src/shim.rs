//! This module exports the C library functions `sqlite.o` links against.
//!
//! Everything runs on the process's own memory. Allocations come from one
//! process-wide arena, and an allocator error aborts: C callers have no way to
//! recover from it.

use std::ffi::{c_char, c_int, c_void};

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::lock_api::Mutex;
use crate::memory::{HostMemory, Ptr};
use crate::stdlib::Arena;
use crate::{stdlib, string};

type c_size_t = usize;

static ARENA: Lazy<Mutex<Arena>> = Lazy::new(|| Mutex::new(Arena::default()));

fn host() -> HostMemory {
    // Every pointer crossing this module is valid for its C contract.
    unsafe { HostMemory::new() }
}

fn trap<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::error!("libc trap: {e}");
            std::process::abort();
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_memcmp(
    s1: *const c_void,
    s2: *const c_void,
    n: c_size_t,
) -> c_int {
    string::memcmp(&host(), s1 as Ptr, s2 as Ptr, n)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_bcmp(
    s1: *const c_void,
    s2: *const c_void,
    n: c_size_t,
) -> c_int {
    string::bcmp(&host(), s1 as Ptr, s2 as Ptr, n)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_memchr(
    s: *const c_void,
    c: c_int,
    n: c_size_t,
) -> *mut c_void {
    string::memchr(&host(), s as Ptr, c, n) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_memrchr(
    s: *const c_void,
    c: c_int,
    n: c_size_t,
) -> *mut c_void {
    string::memrchr(&host(), s as Ptr, c, n) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strlen(s: *const c_char) -> c_size_t {
    string::strlen(&host(), s as Ptr)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strnlen(s: *const c_char, n: c_size_t) -> c_size_t {
    string::strnlen(&host(), s as Ptr, n)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strcmp(s1: *const c_char, s2: *const c_char) -> c_int {
    string::strcmp(&host(), s1 as Ptr, s2 as Ptr)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strncmp(
    s1: *const c_char,
    s2: *const c_char,
    n: c_size_t,
) -> c_int {
    string::strncmp(&host(), s1 as Ptr, s2 as Ptr, n)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strcasecmp(
    s1: *const c_char,
    s2: *const c_char,
) -> c_int {
    string::strcasecmp(&host(), s1 as Ptr, s2 as Ptr)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strncasecmp(
    s1: *const c_char,
    s2: *const c_char,
    n: c_size_t,
) -> c_int {
    string::strncasecmp(&host(), s1 as Ptr, s2 as Ptr, n)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strchr(s: *const c_char, c: c_int) -> *mut c_char {
    string::strchr(&host(), s as Ptr, c) as *mut c_char
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strchrnul(s: *const c_char, c: c_int) -> *mut c_char {
    string::strchrnul(&host(), s as Ptr, c) as *mut c_char
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strrchr(s: *const c_char, c: c_int) -> *mut c_char {
    string::strrchr(&host(), s as Ptr, c) as *mut c_char
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strspn(s: *const c_char, set: *const c_char) -> c_size_t {
    string::strspn(&host(), s as Ptr, set as Ptr)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strcspn(
    s: *const c_char,
    set: *const c_char,
) -> c_size_t {
    string::strcspn(&host(), s as Ptr, set as Ptr)
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_memmem(
    haystack: *const c_void,
    hn: c_size_t,
    needle: *const c_void,
    nn: c_size_t,
) -> *mut c_void {
    string::memmem(&host(), haystack as Ptr, hn, needle as Ptr, nn) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strstr(
    haystack: *const c_char,
    needle: *const c_char,
) -> *mut c_char {
    string::strstr(&host(), haystack as Ptr, needle as Ptr) as *mut c_char
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_strcasestr(
    haystack: *const c_char,
    needle: *const c_char,
) -> *mut c_char {
    string::strcasestr(&host(), haystack as Ptr, needle as Ptr) as *mut c_char
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_qsort(
    base: *mut c_void,
    nelem: c_size_t,
    width: c_size_t,
    compare: unsafe extern "C" fn(*const c_void, *const c_void) -> c_int,
) {
    stdlib::qsort(&mut host(), base as Ptr, nelem, width, |_, a, b| unsafe {
        compare(a as *const c_void, b as *const c_void)
    });
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_malloc(size: c_size_t) -> *mut c_void {
    trap(ARENA.lock().malloc(&mut host(), size)) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_calloc(nelem: c_size_t, elsize: c_size_t) -> *mut c_void {
    trap(ARENA.lock().calloc(&mut host(), nelem, elsize)) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_realloc(ptr: *mut c_void, size: c_size_t) -> *mut c_void {
    trap(ARENA.lock().realloc(&mut host(), ptr as Ptr, size)) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_aligned_alloc(
    align: c_size_t,
    size: c_size_t,
) -> *mut c_void {
    trap(ARENA.lock().aligned_alloc(&mut host(), align, size)) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_free(ptr: *mut c_void) {
    ARENA.lock().free(ptr as Ptr);
}

#[no_mangle]
pub unsafe extern "C" fn rust_sqlite_wasm_libc_abort() {
    std::process::abort();
}
