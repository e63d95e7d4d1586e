use array::RaidArray;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sector::{FileName, MetaSector, MAX_FILES};

const N_DISKS: usize = 8;
const BLOCKS_PER_DISK: u64 = 1 << 20;

fn name(s: &str) -> FileName {
    FileName::new(s.as_bytes()).unwrap()
}

/// An array with every directory slot on every disk occupied — the
/// worst case for the linear lookup scan.
fn full_array() -> RaidArray {
    let sectors = vec![MetaSector::zeroed(); N_DISKS];
    let mut array = RaidArray::assemble(sectors, N_DISKS as u64 * BLOCKS_PER_DISK).unwrap();
    for i in 0..N_DISKS * MAX_FILES {
        array.insert(name(&format!("capture-{:04}", i)), 16).unwrap();
    }
    array
}

fn locate_first_benchmark(c: &mut Criterion) {
    let array = full_array();
    let target = name("capture-0000");
    c.bench_function("locate_first_entry", |b| {
        b.iter(|| black_box(&array).locate(black_box(&target)))
    });
}

fn locate_last_benchmark(c: &mut Criterion) {
    let array = full_array();
    let target = name(&format!("capture-{:04}", N_DISKS * MAX_FILES - 1));
    c.bench_function("locate_last_entry", |b| {
        b.iter(|| black_box(&array).locate(black_box(&target)))
    });
}

fn locate_miss_benchmark(c: &mut Criterion) {
    let array = full_array();
    let target = name("no-such-capture");
    c.bench_function("locate_miss_full_scan", |b| {
        b.iter(|| black_box(&array).locate(black_box(&target)))
    });
}

criterion_group!(
    benches,
    locate_first_benchmark,
    locate_last_benchmark,
    locate_miss_benchmark
);
criterion_main!(benches);
