//! Performance benchmarks for the tag payload decoders.
//!
//! Inventory on NFC readers decodes one NDEF image per tag entering the
//! field; bulk reads decode the whole logger sample area at once.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench decode_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use senseid_parsers::{Endianness, UintWidth, decode_ndef, decode_uints, rain_tag};

/// Build a sensor-tag memory image with a URI body of the given length.
fn sensor_memory(host_len: usize) -> Vec<u8> {
    let body = format!("{}/2350,4500", "a".repeat(host_len));
    let payload_length = body.len() + 1;
    let mut memory = vec![
        0xE1,
        0x40,
        0x40,
        0x00,
        0x03,
        (payload_length + 4) as u8,
        0x91,
        0x01,
        payload_length as u8,
        0x55,
        0x01,
    ];
    memory.extend_from_slice(body.as_bytes());
    memory.push(0xFE);
    memory
}

/// Benchmark decoding a typical sensor tag.
fn bench_decode_sensor(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_ndef");
    group.throughput(Throughput::Elements(1));

    let memory = sensor_memory(12);
    group.bench_function("sensor_tag", |b| {
        b.iter(|| black_box(decode_ndef(black_box(&memory), Some("E0040150A1B2C3D4"))));
    });

    let invalid = [0u8; 11];
    group.bench_function("invalid_magic", |b| {
        b.iter(|| black_box(decode_ndef(black_box(&invalid), None)));
    });

    group.finish();
}

/// Benchmark decoding across URI body sizes.
fn bench_decode_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_ndef_sizes");

    for host_len in [8usize, 64, 200] {
        let memory = sensor_memory(host_len);
        group.throughput(Throughput::Bytes(memory.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(host_len), &memory, |b, memory| {
            b.iter(|| black_box(decode_ndef(black_box(memory), None)));
        });
    }

    group.finish();
}

/// Benchmark decoding the bulk logger area (50 blocks of 4 bytes).
fn bench_decode_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_uints");
    let bytes: Vec<u8> = (0..200u8).collect();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("u16_le_bulk", |b| {
        b.iter(|| black_box(decode_uints(black_box(&bytes), UintWidth::U16, Endianness::Little)));
    });
    group.bench_function("u32_be_bulk", |b| {
        b.iter(|| black_box(decode_uints(black_box(&bytes), UintWidth::U32, Endianness::Big)));
    });

    group.finish();
}

/// Benchmark building UHF inventory records.
fn bench_rain_tag(c: &mut Criterion) {
    let epc = [0x30, 0x08, 0x33, 0xB2, 0xDD, 0xD9, 0x01, 0x40, 0x00, 0x00, 0x00, 0x0A];
    c.bench_function("rain_tag", |b| {
        b.iter(|| black_box(rain_tag(black_box(&epc))));
    });
}

criterion_group!(
    benches,
    bench_decode_sensor,
    bench_decode_sizes,
    bench_decode_bulk,
    bench_rain_tag,
);

criterion_main!(benches);
