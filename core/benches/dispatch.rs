//! Throughput of box and secretbox on 100-byte payloads: sync, and async
//! batches of 200 in flight through the worker pool.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use naclbox_core::prelude::*;

const PAYLOAD: usize = 100;
const BATCH: usize = 200;

fn bench_box(c: &mut Criterion) {
    let d = Dispatcher::new(&DispatcherConfig::default()).unwrap();
    let kp = box_keypair();
    let data = [0u8; PAYLOAD];
    let nonce = [0u8; BOX_NONCEBYTES];

    let mut group = c.benchmark_group("box");
    group.bench_function("sync", |b| {
        b.iter(|| d.box_seal_sync(black_box(&data), &nonce, &kp.public_key, &kp.secret_key))
    });

    group.throughput(Throughput::Elements(BATCH as u64));
    group.bench_function("async_batch", |b| {
        b.iter(|| {
            for _ in 0..BATCH {
                d.box_seal_async(&data, &nonce, &kp.public_key, &kp.secret_key, |_, value| {
                    black_box(value);
                })
                .unwrap();
            }
            d.wait_all(Duration::from_secs(30)).unwrap()
        })
    });
    group.finish();
}

fn bench_secretbox(c: &mut Criterion) {
    let d = Dispatcher::new(&DispatcherConfig::default()).unwrap();
    let data = [0u8; PAYLOAD];
    let nonce = [0u8; SECRETBOX_NONCEBYTES];
    let key = [0u8; SECRETBOX_KEYBYTES];

    let mut group = c.benchmark_group("secretbox");
    group.bench_function("sync", |b| b.iter(|| d.secretbox_sync(black_box(&data), &nonce, &key)));

    group.throughput(Throughput::Elements(BATCH as u64));
    group.bench_function("async_batch", |b| {
        b.iter(|| {
            for _ in 0..BATCH {
                d.secretbox_async(&data, &nonce, &key, |_, value| {
                    black_box(value);
                })
                .unwrap();
            }
            d.wait_all(Duration::from_secs(30)).unwrap()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_box, bench_secretbox);
criterion_main!(benches);
