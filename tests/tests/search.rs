use super::{find, find_ignore_case, memories, random_bytes, rng, write_cstr_with_garbage};
use rand::Rng;
use sqlite_wasm_libc::string::{memmem, strcasestr, strstr};
use sqlite_wasm_libc::{Memory, NULL};

#[cfg(target_family = "wasm")]
use wasm_bindgen_test::wasm_bindgen_test as test;

const NEEDLE: usize = 1024;
const HAYSTACK: usize = 8192;

const SEARCH_TESTS: &[(&[u8], &[u8], Option<usize>)] = &[
    (b"", b"", Some(0)),
    (b"", b"a", None),
    (b"", b"foo", None),
    (b"fo", b"foo", None),
    (b"foo", b"baz", None),
    (b"foo", b"foo", Some(0)),
    (b"oofofoofooo", b"f", Some(2)),
    (b"oofofoofooo", b"foo", Some(4)),
    (b"barfoobarfoo", b"foo", Some(3)),
    (b"foo", b"", Some(0)),
    (b"foo", b"o", Some(1)),
    (b"abcABCabc", b"A", Some(3)),
    (b"jrzm6jjhorimglljrea4w3rlgosts0w2gia17hno2td4qd1jz", b"jz", Some(47)),
    (b"ekkuk5oft4eq0ocpacknhwouic1uua46unx12l37nioq9wbpnocqks6", b"ks6", Some(52)),
    (b"999f2xmimunbuyew5vrkla9cpwhmxan8o98ec", b"98ec", Some(33)),
    (b"9lpt9r98i04k8bz6c6dsrthb96bhi", b"96bhi", Some(24)),
    (b"55u558eqfaod2r2gu42xxsu631xf0zobs5840vl", b"5840vl", Some(33)),
    (b"x", b"a", None),
    (b"x", b"x", Some(0)),
    (b"abc", b"c", Some(2)),
    (b"xab", b"ab", Some(1)),
    (b"xa", b"ab", None),
    (b"xbc", b"abc", None),
    (b"fofofofofofofoffofoobarfoo", b"foffof", Some(12)),
    (b"fofofofofofo\0foffofoobar", b"foffof", Some(13)),
    (
        b"0000000000000000\x000123456789012345678901234567890",
        b"0123456789012345",
        Some(17),
    ),
];

#[test]
fn test_memmem_vectors_at_end_of_memory() {
    for mut mem in memories() {
        for &(haystack, needle, want) in SEARCH_TESTS {
            mem.clear();
            let h = mem.size() - haystack.len();
            mem.write(h, haystack);
            mem.write(NEEDLE, needle);
            assert_eq!(
                memmem(&mem, h, haystack.len(), NEEDLE, needle.len()),
                want.map_or(NULL, |i| h + i),
                "{:?} {:?}",
                String::from_utf8_lossy(haystack),
                String::from_utf8_lossy(needle)
            );
        }
    }
}

#[test]
fn test_strstr_vectors_at_end_of_memory() {
    for mut mem in memories() {
        for &(haystack, needle, _) in SEARCH_TESTS {
            mem.clear();
            let h = mem.size() - haystack.len() - 1;
            mem.write_cstr(h, haystack);
            mem.write_cstr(NEEDLE, needle);

            // Only what comes before the first terminator is searched.
            let terminated = &haystack[..haystack.iter().position(|&b| b == 0).unwrap_or(haystack.len())];
            let want = find(terminated, needle).map_or(NULL, |i| h + i);
            assert_eq!(strstr(&mem, h, NEEDLE), want, "{haystack:?} {needle:?}");

            let want = find_ignore_case(terminated, needle).map_or(NULL, |i| h + i);
            assert_eq!(strcasestr(&mem, h, NEEDLE), want, "{haystack:?} {needle:?}");
        }
    }
}

#[test]
fn test_strcasestr_vectors() {
    let tests: &[(&[u8], &[u8], Option<usize>)] = &[
        (b"A", b"a", Some(0)),
        (b"a", b"A", Some(0)),
        (b"Z", b"z", Some(0)),
        (b"z", b"Z", Some(0)),
        (b"@", b"`", None),
        (b"`", b"@", None),
        (b"[", b"{", None),
        (b"{", b"[", None),
        (b"abcABCabc", b"A", Some(0)),
        (b"fofofofofofofoffofoobarfoo", b"FoFFoF", Some(12)),
        (b"fofofofofofofOffOfoobarfoo", b"FoFFoF", Some(12)),
    ];
    for mut mem in memories() {
        for &(haystack, needle, want) in tests {
            let h = mem.size() - haystack.len() - 1;
            mem.write_cstr(h, haystack);
            mem.write_cstr(NEEDLE, needle);
            assert_eq!(strcasestr(&mem, h, NEEDLE), want.map_or(NULL, |i| h + i));
        }
    }
}

#[test]
fn test_search_random() {
    let mut rng = rng(20);
    for mut mem in memories() {
        for round in 0..3000 {
            let alphabet: &[u8] = if round % 2 == 0 { b"ab" } else { b"abcdefgh" };
            let hn = rng.random_range(0..200);
            let nn = match round % 3 {
                0 => rng.random_range(0..4),
                1 => rng.random_range(0..20),
                _ => rng.random_range(16..40),
            };
            let haystack = random_bytes(&mut rng, alphabet, hn);
            let needle = if hn >= nn && rng.random_bool(0.5) {
                let at = rng.random_range(0..=hn - nn);
                haystack[at..at + nn].to_vec()
            } else {
                random_bytes(&mut rng, alphabet, nn)
            };
            let h = HAYSTACK + rng.random_range(0..16);

            mem.write(h, &haystack);
            mem.write(NEEDLE, &needle);
            let want = find(&haystack, &needle).map_or(NULL, |i| h + i);
            assert_eq!(
                memmem(&mem, h, hn, NEEDLE, nn),
                want,
                "{:?} {:?}",
                String::from_utf8_lossy(&haystack),
                String::from_utf8_lossy(&needle)
            );

            write_cstr_with_garbage(&mut mem, &mut rng, h, &haystack);
            mem.write_cstr(NEEDLE, &needle);
            assert_eq!(strstr(&mem, h, NEEDLE), want);
        }
    }
}

#[test]
fn test_strcasestr_random() {
    let mut rng = rng(21);
    for mut mem in memories() {
        for round in 0..2000 {
            let hn = rng.random_range(0..150);
            let nn = if round % 2 == 0 {
                rng.random_range(1..6)
            } else {
                rng.random_range(14..36)
            };
            let haystack = random_bytes(&mut rng, b"aAbB@`", hn);
            let needle = if hn >= nn && rng.random_bool(0.5) {
                let at = rng.random_range(0..=hn - nn);
                haystack[at..at + nn]
                    .iter()
                    .map(|b| b.to_ascii_uppercase())
                    .collect()
            } else {
                random_bytes(&mut rng, b"aAbB@`", nn)
            };
            let h = HAYSTACK + rng.random_range(0..16);
            write_cstr_with_garbage(&mut mem, &mut rng, h, &haystack);
            mem.write_cstr(NEEDLE, &needle);

            let want = find_ignore_case(&haystack, &needle).map_or(NULL, |i| h + i);
            assert_eq!(
                strcasestr(&mem, h, NEEDLE),
                want,
                "{:?} {:?}",
                String::from_utf8_lossy(&haystack),
                String::from_utf8_lossy(&needle)
            );
        }
    }
}

#[test]
fn test_long_needle_skips() {
    for mut mem in memories() {
        // 'z' is not in the needle, so most lanes skip a full 255 bytes.
        let mut haystack: Vec<u8> = (0..3000)
            .map(|i| if i % 7 == 0 { b'a' } else { b'z' })
            .collect();
        let needle: Vec<u8> = (0..300).map(|i| b'a' + (i % 25) as u8).collect();
        haystack.extend_from_slice(&needle);
        haystack.extend_from_slice(b"tail");
        mem.write(HAYSTACK, &haystack);
        mem.write(NEEDLE, &needle);
        assert_eq!(
            memmem(&mem, HAYSTACK, haystack.len(), NEEDLE, needle.len()),
            HAYSTACK + 3000
        );

        mem.write_cstr(HAYSTACK, &haystack);
        mem.write_cstr(NEEDLE, &needle);
        assert_eq!(strstr(&mem, HAYSTACK, NEEDLE), HAYSTACK + 3000);
        assert_eq!(strcasestr(&mem, HAYSTACK, NEEDLE), HAYSTACK + 3000);
    }
}
