// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec Throughput Benchmark
//!
//! Measures envelope encode/decode for scalar lists, raw bytes and nested
//! messages, plus instance path resolution.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tagwire::{
    Decoder, Encoder, Instance, Introspector, ListValue, Message, MessageDescriptorBuilder,
    Registry, TypeRegistry, Value, ValueType,
};

fn registry() -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    registry.register(
        MessageDescriptorBuilder::new("Sample")
            .string_field("Topic")
            .int64_field("Stamp")
            .float64_field("Reading")
            .build(),
    );
    registry.register(
        MessageDescriptorBuilder::new("Frame")
            .uint32_field("Seq")
            .list_field("Samples", ValueType::message("Sample"))
            .build(),
    );
    registry
}

fn frame(registry: &TypeRegistry, samples: usize) -> Message {
    let items = (0..samples)
        .map(|i| {
            let mut sample = registry.new_instance("Sample").expect("sample");
            sample.set("Topic", format!("sensors/{}", i)).expect("topic");
            sample.set("Stamp", i as i64).expect("stamp");
            sample.set("Reading", i as f64 * 0.5).expect("reading");
            Value::from(sample)
        })
        .collect();
    let mut frame = registry.new_instance("Frame").expect("frame");
    frame.set("Seq", 1u32).expect("seq");
    frame
        .set("Samples", ListValue::from_items(ValueType::message("Sample"), items))
        .expect("samples");
    frame
}

fn encode(value: &Value) -> Vec<u8> {
    let mut enc = Encoder::new();
    enc.add(value).expect("encode");
    enc.into_bytes()
}

fn bench_scalar_list(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("int32_list");
    for size in [64usize, 1024, 16_384] {
        let value = Value::from((0..size as i32).collect::<Vec<_>>());
        let bytes = encode(&value);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &value, |b, value| {
            b.iter(|| encode(black_box(value)));
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| {
                Decoder::new(black_box(bytes), 0, registry.as_ref())
                    .get()
                    .expect("decode")
            });
        });
    }
    group.finish();
}

fn bench_raw_bytes(c: &mut Criterion) {
    let registry = registry();
    let value = Value::from(vec![0xA5u8; 64 * 1024]);
    let bytes = encode(&value);
    let mut group = c.benchmark_group("bytes_64k");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&value))));
    group.bench_function("decode", |b| {
        b.iter(|| {
            Decoder::new(black_box(&bytes), 0, registry.as_ref())
                .get()
                .expect("decode")
        });
    });
    group.finish();
}

fn bench_messages(c: &mut Criterion) {
    let registry = registry();
    let value = Value::from(frame(&registry, 256));
    let bytes = encode(&value);
    let mut group = c.benchmark_group("frame_256");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&value))));
    group.bench_function("decode", |b| {
        b.iter(|| {
            Decoder::new(black_box(&bytes), 0, registry.as_ref())
                .get()
                .expect("decode")
        });
    });
    group.finish();
}

fn bench_instance_paths(c: &mut Criterion) {
    let registry = registry();
    let frame_desc = registry.info("Frame").expect("frame").descriptor().clone();
    let introspector = Introspector::new(registry.clone());
    introspector.inspect_descriptor(&frame_desc).expect("inspect");
    let value = Value::from(frame(&registry, 256));

    c.bench_function("instance_resolve_and_get", |b| {
        b.iter(|| {
            let inst = Instance::of(black_box("frame.samples<{i32}200>.reading"), &introspector)
                .expect("resolve");
            inst.get(Some(&value)).expect("get")
        });
    });
}

criterion_group!(
    benches,
    bench_scalar_list,
    bench_raw_bytes,
    bench_messages,
    bench_instance_paths
);
criterion_main!(benches);
