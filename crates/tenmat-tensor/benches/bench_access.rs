use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tenmat_tensor::{Array, CpuAllocator, PeriodicArray};

fn bench_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("Access");

    let regular = Array::<f64>::arange(&[64, 64], CpuAllocator).unwrap();
    let periodic = PeriodicArray::<f64>::arange(&[64, 64], CpuAllocator).unwrap();

    group.bench_function("regular_get", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..64 {
                for j in 0..64 {
                    acc += *black_box(&regular).get(&[i, j]).unwrap();
                }
            }
            acc
        })
    });

    group.bench_function("periodic_get", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in -32isize..32 {
                for j in -32isize..32 {
                    acc += *black_box(&periodic).get(&[i, j]).unwrap();
                }
            }
            acc
        })
    });

    group.bench_function("periodic_stencil", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..64isize {
                for j in 0..64isize {
                    acc += periodic[[i - 1, j]] + periodic[[i + 1, j]] + periodic[[i, j - 1]]
                        + periodic[[i, j + 1]]
                        - 4.0 * periodic[[i, j]];
                }
            }
            black_box(acc)
        })
    });

    group.finish();
}

fn bench_element_wise(c: &mut Criterion) {
    let lhs = Array::<f32>::from_shape_val(&[100, 100], 1.0, CpuAllocator).unwrap();
    let rhs = Array::<f32>::from_shape_val(&[100, 100], 2.0, CpuAllocator).unwrap();

    c.bench_function("add", |b| {
        b.iter(|| black_box(&lhs).add(black_box(&rhs)).unwrap())
    });

    c.bench_function("add_inplace", |b| {
        b.iter(|| {
            let mut t = black_box(&lhs).clone();
            t.add_inplace(black_box(&rhs)).unwrap();
        })
    });

    c.bench_function("sum", |b| b.iter(|| black_box(&lhs).sum()));
}

criterion_group!(benches, bench_access, bench_element_wise);
criterion_main!(benches);
