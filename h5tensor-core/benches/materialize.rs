use criterion::{criterion_group, criterion_main, Criterion};
use h5tensor_core::{
    mem::{MemDataset, MemGroup},
    Device, Materializer,
};

fn bench_dense_flattened(c: &mut Criterion) {
    const N: usize = 1024;
    let ds = MemDataset::new("x", [N * N], vec![1f32; N * N])
        .with_attr("original_shape", &[N as i64, N as i64]);
    let m = Materializer::new().on(Device::Cpu);
    c.bench_function("dense_flattened_1024x1024_f32", |bencher| {
        bencher.iter(|| m.make_dense(&ds).unwrap());
    });
}

fn bench_dense_empty(c: &mut Criterion) {
    let ds = MemDataset::new("e", [0], Vec::<f64>::new()).with_attr("original_shape", &[256, 256]);
    let m = Materializer::new().on(Device::Cpu);
    c.bench_function("dense_empty_256x256_f64", |bencher| {
        bencher.iter(|| m.make_dense(&ds).unwrap());
    });
}

fn bench_sparse(c: &mut Criterion) {
    const NNZ: usize = 100_000;
    let indices: Vec<i64> = (0..NNZ as i64).flat_map(|i| [i % 1000, i / 1000]).collect();
    let group = MemGroup::new("hist")
        .with_dataset("indices", MemDataset::new("indices", [NNZ, 2], indices))
        .with_dataset("values", MemDataset::new("values", [NNZ], vec![0.5f64; NNZ]))
        .with_attr("dense_shape", &[1000, 1000]);
    let m = Materializer::new().on(Device::Cpu);
    c.bench_function("sparse_100k_nnz", |bencher| {
        bencher.iter(|| m.make_sparse(&group).unwrap());
    });
}

criterion_group!(benches, bench_dense_flattened, bench_dense_empty, bench_sparse);
criterion_main!(benches);
