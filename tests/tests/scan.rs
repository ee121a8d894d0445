use super::{memories, random_bytes, random_nonzero, rng, write_cstr_with_garbage};
use sqlite_wasm_libc::string::{
    memchr, memrchr, strchr, strchrnul, strcspn, strlen, strnlen, strrchr, strspn,
};
use sqlite_wasm_libc::{Memory, MemoryMut, NULL};
use std::ffi::c_int;

#[cfg(target_family = "wasm")]
use wasm_bindgen_test::wasm_bindgen_test as test;

const BASE: usize = 4096;

#[test]
fn test_strlen_lane_boundaries() {
    let mut rng = rng(1);
    for mut mem in memories() {
        for align in 0..16 {
            for len in 0..=65 {
                let s = random_nonzero(&mut rng, len);
                write_cstr_with_garbage(&mut mem, &mut rng, BASE + align, &s);
                let p = BASE + align;
                assert_eq!(strlen(&mem, p), len, "align={align} len={len}");
                assert_eq!(strnlen(&mem, p, len / 2), len / 2);
                assert_eq!(strnlen(&mem, p, len + 3), len);
                assert_eq!(strchrnul(&mem, p, 0), p + len);
            }
        }
    }
}

#[test]
fn test_memchr_exact_boundary() {
    for mut mem in memories() {
        for align in 0..16 {
            let p = BASE + align;
            for k in 0..48 {
                mem.fill(BASE, b'.', 96);
                mem.store8(p + k, b'#');
                for n in 0..48 {
                    let want = if k < n { p + k } else { NULL };
                    assert_eq!(
                        memchr(&mem, p, b'#' as c_int, n),
                        want,
                        "align={align} k={k} n={n}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_memchr_memrchr_random() {
    let mut rng = rng(2);
    for mut mem in memories() {
        for align in 0..16 {
            for len in 0..=65 {
                let s = random_bytes(&mut rng, b"abcd\0\xff", len);
                let p = BASE + align;
                mem.fill(BASE - 32, b'a', 128);
                mem.write(p, &s);
                for c in [b'a', b'd', 0, 0xff, b'z'] {
                    let first = s.iter().position(|&b| b == c).map_or(NULL, |i| p + i);
                    let last = s.iter().rposition(|&b| b == c).map_or(NULL, |i| p + i);
                    assert_eq!(memchr(&mem, p, c as c_int, len), first, "{s:?} {c}");
                    assert_eq!(memrchr(&mem, p, c as c_int, len), last, "{s:?} {c}");
                }
            }
        }
    }
}

#[test]
fn test_strchr_random() {
    let mut rng = rng(3);
    for mut mem in memories() {
        for align in 0..16 {
            for len in 0..=65 {
                let s = random_bytes(&mut rng, b"xyz/.", len);
                let p = BASE + align;
                write_cstr_with_garbage(&mut mem, &mut rng, p, &s);
                for c in [b'/', b'.', b'q'] {
                    let first = s.iter().position(|&b| b == c);
                    let last = s.iter().rposition(|&b| b == c);
                    assert_eq!(strchr(&mem, p, c as c_int), first.map_or(NULL, |i| p + i));
                    assert_eq!(strrchr(&mem, p, c as c_int), last.map_or(NULL, |i| p + i));
                    assert_eq!(strchrnul(&mem, p, c as c_int), p + first.unwrap_or(len));
                }
            }
        }
    }
}

#[test]
fn test_span_membership() {
    let mut rng = rng(4);
    let sets: [&[u8]; 5] = [b"a", b"ab", b"abc\x80", b"\xff\x01 ", b"0123456789abcdef"];
    for mut mem in memories() {
        for set in sets {
            mem.write_cstr(1024, set);
            for align in 0..16 {
                for len in 0..=65 {
                    let s = random_bytes(&mut rng, b"aabbc\x80\xff\x01 5", len);
                    let p = BASE + align;
                    write_cstr_with_garbage(&mut mem, &mut rng, p, &s);

                    let span = strspn(&mem, p, 1024);
                    assert!(s[..span].iter().all(|b| set.contains(b)));
                    assert!(span == len || !set.contains(&s[span]));

                    let cspan = strcspn(&mem, p, 1024);
                    assert!(s[..cspan].iter().all(|b| !set.contains(b)));
                    assert!(cspan == len || set.contains(&s[cspan]));
                }
            }
        }
    }
}

#[test]
fn test_empty_set() {
    for mut mem in memories() {
        mem.write_cstr(1024, b"");
        mem.write_cstr(BASE, b"anything");
        assert_eq!(strspn(&mem, BASE, 1024), 0);
        assert_eq!(strcspn(&mem, BASE, 1024), 8);
    }
}

#[test]
fn test_strings_at_end_of_memory() {
    let mut rng = rng(5);
    for mut mem in memories() {
        let end = mem.size();
        mem.write_cstr(1024, b"xy");
        for len in 0..40 {
            let s = random_bytes(&mut rng, b"wxyz", len);
            let p = end - len - 1;
            mem.write_cstr(p, &s);

            assert_eq!(strlen(&mem, p), len);
            let x = s.iter().position(|&b| b == b'x');
            assert_eq!(strchr(&mem, p, b'x' as c_int), x.map_or(NULL, |i| p + i));
            let z = s.iter().rposition(|&b| b == b'z');
            assert_eq!(strrchr(&mem, p, b'z' as c_int), z.map_or(NULL, |i| p + i));
            let span = s.iter().take_while(|&&b| b"xy".contains(&b)).count();
            assert_eq!(strspn(&mem, p, 1024), span);
            let cspan = s.iter().take_while(|&&b| !b"xy".contains(&b)).count();
            assert_eq!(strcspn(&mem, p, 1024), cspan);
            assert_eq!(memchr(&mem, p, 0, len + 1), end - 1);
        }
    }
}
