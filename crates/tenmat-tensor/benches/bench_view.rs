use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tenmat_tensor::{Array, ArrayView, CpuAllocator};

fn sample_array() -> Array<u8> {
    Array::from_shape_val(&[512, 512, 3], 0_u8, CpuAllocator).unwrap()
}

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("View");

    group.bench_function("permuted_to_owned", |b| {
        b.iter_batched(
            sample_array,
            |a| {
                let owned = black_box(&a).permute_axes(&[2, 0, 1]).unwrap().to_owned().unwrap();
                owned
            },
            criterion::BatchSize::LargeInput,
        )
    });

    let buffer = vec![1.0f64; 256 * 256];
    group.bench_function("wrap_contiguous", |b| {
        b.iter(|| ArrayView::<f64>::from_shape(&[256, 256], black_box(&buffer)).unwrap())
    });

    group.bench_function("iterate_strided", |b| {
        let view = ArrayView::<f64>::from_shape_strides(&[256, 256], &[1, 256], &buffer).unwrap();
        b.iter(|| black_box(&view).iter().sum::<f64>())
    });

    group.bench_function("iterate_broadcast", |b| {
        let row = ArrayView::<f64>::from_shape(&[256], &buffer[..256]).unwrap();
        b.iter(|| {
            black_box(&row)
                .broadcast(&[256, 256])
                .unwrap()
                .iter()
                .sum::<f64>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_view);
criterion_main!(benches);
