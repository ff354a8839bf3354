//! # Ledger-Link Client Benchmarks
//!
//! Hot paths of a busy session:
//!
//! | Path | Crate |
//! |------|-------|
//! | Address derivation and validation | ll-01 |
//! | Inbound frame decode | ll-02 |
//! | Delivery queue push/drain, with and without overflow | ll-02 |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ll_01_address::{decode, encode_bytes, NetworkType};
use ll_02_realtime::{DeliveryQueue, InboundFrame};
use serde_json::json;
use shared_types::PublicKey;

// ============================================================================
// LL-01: Address Codec
// ============================================================================

fn bench_address_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("ll-01-address");
    let key = PublicKey([0x5A; 32]);
    let text = encode_bytes(&key, NetworkType::MijinTest).to_string();

    group.bench_function("encode", |b| {
        b.iter(|| black_box(encode_bytes(black_box(&key), NetworkType::MijinTest)))
    });
    group.bench_function("decode_validate", |b| {
        b.iter(|| black_box(decode(black_box(&text)).is_ok()))
    });

    group.finish();
}

// ============================================================================
// LL-02: Frame Decode
// ============================================================================

fn bench_frame_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ll-02-frame-decode");
    let address = encode_bytes(&PublicKey([0x5A; 32]), NetworkType::MijinTest);

    let frames = [
        ("block", json!({ "topic": "block", "data": { "height": 1200, "numTransactions": 3 } })),
        (
            "confirmed",
            json!({
                "topic": format!("confirmedAdded/{}", address),
                "data": {
                    "hash": "0D4EB3C1B8A6D7E5F40B8E2B6D8A3C7F9E1D2C3B4A5968778695A4B3C2D1E0F1",
                    "type": 16724,
                    "height": 1200,
                    "recipient": address.to_string(),
                    "mosaics": [{ "id": "85BBEA6CC462B244", "amount": 10 }],
                },
            }),
        ),
    ];

    for (name, frame) in frames {
        let bytes = frame.to_string().into_bytes();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &bytes, |b, bytes| {
            b.iter(|| black_box(InboundFrame::decode(black_box(bytes), 1024 * 1024).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// LL-02: Delivery Queue
// ============================================================================

fn bench_delivery_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("ll-02-delivery-queue");

    for capacity in [16usize, 1024] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::new("push_drain", capacity),
            &capacity,
            |b, &capacity| {
                let queue = DeliveryQueue::new(capacity);
                b.iter(|| {
                    for i in 0..capacity as u64 {
                        queue.push(i);
                    }
                    while let Ok(Some(item)) = queue.try_recv() {
                        black_box(item);
                    }
                })
            },
        );
    }

    // Producer outpacing the reader: every push evicts.
    let queue = DeliveryQueue::new(64);
    for i in 0..64u64 {
        queue.push(i);
    }
    group.bench_function("push_overflow", |b| {
        b.iter(|| black_box(queue.push(black_box(7u64))))
    });

    group.finish();
}

criterion_group!(benches, bench_address_codec, bench_frame_decode, bench_delivery_queue);
criterion_main!(benches);
