use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fsindex::bootstrap;
use fsindex::storage::LocalStorage;
use fsindex::{FsIndex, SledNodeStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Build a tree of `width` directories under the root, each holding `width` files.
fn build_index(width: usize) -> (TempDir, FsIndex) {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SledNodeStore::temporary().unwrap());
    bootstrap::ensure_root(store.as_ref()).unwrap();
    let index = FsIndex::new(store, Arc::new(LocalStorage::new(temp.path())));
    for d in 0..width {
        let dir = index.create_directory("/", &format!("dir{}", d)).unwrap();
        for f in 0..width {
            index
                .create_file(&dir.path, &format!("file{}.txt", f), b"x")
                .unwrap();
        }
    }
    (temp, index)
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_lookup");
    group.sample_size(20);

    for &width in &[8usize, 32] {
        let (_temp, index) = build_index(width);
        let target = format!("/dir{}/file{}.txt", width / 2, width / 2);

        group.bench_with_input(BenchmarkId::new("stat", width), &target, |b, path| {
            b.iter(|| black_box(index.stat(path).unwrap()));
        });

        let dir = format!("/dir{}", width / 2);
        group.bench_with_input(BenchmarkId::new("list", width), &dir, |b, path| {
            b.iter(|| black_box(index.list(path, true).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
