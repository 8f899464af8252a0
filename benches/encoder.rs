#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use smile::prelude::*;

fn ascii_key(i: usize) -> Bytes { Bytes::from(format!("k{:04}", i)) }

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Smile {
    let v: Vec<Smile> = (0..N_BIG_ARR).map(|i| Smile::from(i as i64)).collect();
    Smile::from(v)
}

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_k() -> Smile {
    let v0: Vec<Smile> = (0..N_ARR).map(|i| Smile::from(i as i64)).collect();
    let m = FieldMap::from_entries(
        (0..N_MAP)
            .map(|i| (ascii_key(i), Smile::from(v0.clone())))
            .collect(),
    );
    let v: Vec<Smile> = std::iter::repeat(m).map(Smile::from).take(N_ARR).collect();
    Smile::from(v)
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!(
            "Creating a Smile object of size {}",
            encode_full(&big_k()).len()
        ),
        |b| b.iter(|| black_box(big_k())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_k = big_k();
    let enc_len = encode_full(&big_k).len();
    c.bench_function(
        &format!("Encoding a nested Smile object, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_k))),
    );
}

fn bench_enc_shared(c: &mut Criterion) {
    let big_k = big_k();
    let conf = EncodeConfig {
        shared_strings: true,
        shared_names: true,
        ..EncodeConfig::default()
    };
    let enc_len = encode_config(&big_k, conf).len();
    c.bench_function(
        &format!(
            "Encoding a nested Smile object with shared tables, output size of {} bytes",
            enc_len
        ),
        move |b| b.iter(|| encode_config(black_box(&big_k), conf)),
    );
}

fn bench_dec(c: &mut Criterion) {
    let enc = encode_full(&big_k());
    c.bench_function(
        &format!("Decoding a nested Smile object of {} bytes", enc.len()),
        move |b| b.iter(|| decode_full(black_box(&enc)).unwrap()),
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_arr = big_arr();
    let enc_len = encode_full(&big_arr).len();
    c.bench_function(
        &format!("Encoding a Smile vector, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_arr))),
    );
}

fn bench_dec_flat(c: &mut Criterion) {
    let enc = encode_full(&big_arr());
    c.bench_function(
        &format!("Decoding a Smile vector of length {}", enc.len()),
        move |b| b.iter(|| decode_full(black_box(&enc)).unwrap()),
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_shared,
    bench_dec,
    bench_enc_flat,
    bench_dec_flat
);
criterion_main!(benches);
