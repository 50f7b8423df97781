//! # Copy Benchmarks
//!
//! Performance benchmarks for replica-core deep copies.
//!
//! Run with: `cargo bench -p replica-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use replica_core::{
    ArrayRef, ClassBuilder, CopyConfig, DeepCopier, ObjRef, PlanCache, Type, Value,
    structurally_equal,
};
use std::hint::black_box;

/// Create a circular chain of `size` cars.
fn create_ring(size: usize) -> ObjRef {
    let car = ClassBuilder::new("Car")
        .field("id", Type::INT)
        .field("next", Type::class("Car"))
        .constructor(vec![Type::INT, Type::class("Car")], |this, args| {
            this.set("id", args[0].clone())?;
            this.set("next", args[1].clone())
        })
        .build();

    let head = car
        .construct(vec![Value::Int(0), Value::Null])
        .expect("head");
    let mut tail = head.clone();
    for id in 1..size {
        let next = car
            .construct(vec![Value::Int(id as i32), Value::Null])
            .expect("car");
        tail.set("next", next.clone()).expect("link");
        tail = next;
    }
    tail.set("next", head.clone()).expect("close");
    head
}

/// Create an object with `width` string fields and one int array.
fn create_wide_object(width: usize) -> ObjRef {
    let mut builder = ClassBuilder::new("Wide").field("numbers", Type::array(Type::INT));
    for i in 0..width {
        builder = builder.field(format!("field_{}", i), Type::Str);
    }
    let wide = builder.constructor(vec![], |_, _| Ok(())).build();

    let object = wide.instantiate(0, &[]).expect("wide");
    for i in 0..width {
        object
            .set(&format!("field_{}", i), format!("value {}", i))
            .expect("field");
    }
    let numbers = ArrayRef::from_values(Type::INT, (0..64).map(Value::Int).collect())
        .expect("numbers");
    object.set("numbers", numbers).expect("numbers");
    object
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_ring_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_copy");
    let cache = PlanCache::new();
    let copier = DeepCopier::with_cache(&cache).with_config(CopyConfig::with_max_graph_size(50_000));

    for size in [100, 1000, 10000].iter() {
        let ring = create_ring(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &ring, |b, ring| {
            b.iter(|| black_box(copier.copy(ring)));
        });
    }

    group.finish();
}

fn bench_wide_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_copy");
    let cache = PlanCache::new();
    let copier = DeepCopier::with_cache(&cache);

    for width in [8, 64, 512].iter() {
        let object = create_wide_object(*width);

        group.bench_with_input(BenchmarkId::from_parameter(width), &object, |b, object| {
            b.iter(|| black_box(copier.copy(object)));
        });
    }

    group.finish();
}

fn bench_structural_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural_compare");
    let cache = PlanCache::new();
    let copier = DeepCopier::with_cache(&cache);

    for size in [100, 1000].iter() {
        let ring = create_ring(*size);
        let copy = copier.copy(&ring).expect("copy");
        let pair = (Value::Object(ring), Value::Object(copy));

        group.bench_with_input(BenchmarkId::from_parameter(size), &pair, |b, (left, right)| {
            b.iter(|| black_box(structurally_equal(left, right)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ring_copy,
    bench_wide_copy,
    bench_structural_compare
);
criterion_main!(benches);
