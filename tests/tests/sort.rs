use super::rng;
use rand::Rng;
use sqlite_wasm_libc::stdlib::qsort;
use sqlite_wasm_libc::{LinearMemory, MemoryCfg, Ptr};
use std::ffi::c_int;

#[cfg(target_family = "wasm")]
use wasm_bindgen_test::wasm_bindgen_test as test;

const BASE: Ptr = 4096;

fn write_u32s(mem: &mut LinearMemory, values: &[u32]) {
    for (i, v) in values.iter().enumerate() {
        mem.write(BASE + 4 * i, &v.to_le_bytes());
    }
}

fn read_u32(mem: &LinearMemory, p: Ptr) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(mem.read(p, 4));
    u32::from_le_bytes(bytes)
}

fn read_u32s(mem: &LinearMemory, n: usize) -> Vec<u32> {
    (0..n).map(|i| read_u32(mem, BASE + 4 * i)).collect()
}

fn ascending(mem: &LinearMemory, a: Ptr, b: Ptr) -> c_int {
    read_u32(mem, a).cmp(&read_u32(mem, b)) as c_int
}

#[test]
fn test_qsort_scenario() {
    let mut mem = LinearMemory::new(MemoryCfg::default()).unwrap();
    write_u32s(&mut mem, &[5, 3, 1, 4, 1, 5, 9, 2, 6]);
    qsort(&mut mem, BASE, 9, 4, ascending);
    assert_eq!(read_u32s(&mem, 9), [1, 1, 2, 3, 4, 5, 5, 6, 9]);
}

#[test]
fn test_qsort_sorts_and_is_idempotent() {
    let mut rng = rng(30);
    let mut mem = LinearMemory::new(MemoryCfg::default()).unwrap();
    for _ in 0..200 {
        let n = rng.random_range(0..300);
        let values: Vec<u32> = (0..n).map(|_| rng.random_range(0..64)).collect();
        write_u32s(&mut mem, &values);

        qsort(&mut mem, BASE, n, 4, ascending);
        let mut want = values.clone();
        want.sort_unstable();
        let sorted = read_u32s(&mem, n);
        assert_eq!(sorted, want);

        qsort(&mut mem, BASE, n, 4, ascending);
        assert_eq!(read_u32s(&mem, n), sorted);
    }
}

#[test]
fn test_qsort_descending_comparator() {
    let mut mem = LinearMemory::new(MemoryCfg::default()).unwrap();
    let values: Vec<u32> = (0..1000).collect();
    write_u32s(&mut mem, &values);
    qsort(&mut mem, BASE, values.len(), 4, |mem, a, b| -ascending(mem, a, b));
    let want: Vec<u32> = (0..1000).rev().collect();
    assert_eq!(read_u32s(&mem, 1000), want);
}

#[test]
fn test_qsort_only_touches_its_elements() {
    let mut mem = LinearMemory::new(MemoryCfg::default()).unwrap();
    mem.write(BASE - 4, &[0xee; 4]);
    write_u32s(&mut mem, &[3, 1, 2]);
    mem.write(BASE + 12, &[0xee; 4]);
    qsort(&mut mem, BASE, 3, 4, ascending);
    assert_eq!(read_u32s(&mem, 3), [1, 2, 3]);
    assert_eq!(mem.read(BASE - 4, 4), [0xee; 4]);
    assert_eq!(mem.read(BASE + 12, 4), [0xee; 4]);
}
