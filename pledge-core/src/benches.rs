//! Ciphersuite-generic benchmark functions.
#![allow(clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput};
use rand_core::{CryptoRng, RngCore};

use crate::{
    tests::helpers::{corrupt_share, promise_setup},
    Ciphersuite, Promise, PromiseState,
};

/// Benchmark promise construction with the specified ciphersuite.
pub fn bench_promise_construction<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("Promise construction {name}"));
    for &n in [10u16, 20, 40].iter() {
        group.throughput(Throughput::Elements(n as u64));

        let t = n / 2;
        let setup = promise_setup::<C, R>(t, t, n, rng);
        let mut rng = rng.clone();

        group.bench_with_input(BenchmarkId::new("Construct", n), &setup, |b, setup| {
            b.iter(|| {
                Promise::<C>::new(
                    &setup.secret,
                    &setup.promiser,
                    t,
                    t,
                    &setup.insurers,
                    &mut rng,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

/// Benchmark share verification and endorsement with the specified ciphersuite.
pub fn bench_share_verification<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("Share verification {name}"));
    let setup = promise_setup::<C, R>(10, 15, 20, rng);

    group.bench_function("Verify share", |b| {
        b.iter(|| setup.promise.verify_share(0, &setup.insurer_keys[0]).unwrap())
    });

    let mut sign_rng = rng.clone();
    group.bench_function("Sign", |b| {
        b.iter(|| {
            setup
                .promise
                .sign(0, &setup.insurer_keys[0], &mut sign_rng)
                .unwrap()
        })
    });

    let signature = setup.promise.sign(0, &setup.insurer_keys[0], rng).unwrap();
    group.bench_function("Verify signature", |b| {
        b.iter(|| setup.promise.verify_signature(0, &signature).unwrap())
    });
    group.finish();
}

/// Benchmark blame proof production and verification with the specified ciphersuite.
pub fn bench_blame<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("Blame {name}"));
    let mut setup = promise_setup::<C, R>(10, 15, 20, rng);
    corrupt_share(&mut setup, 0);

    let mut blame_rng = rng.clone();
    group.bench_function("Blame", |b| {
        b.iter(|| {
            setup
                .promise
                .blame(0, &setup.insurer_keys[0], &mut blame_rng)
                .unwrap()
        })
    });

    let proof = setup.promise.blame(0, &setup.insurer_keys[0], rng).unwrap();
    group.bench_function("Verify blame", |b| {
        b.iter(|| setup.promise.verify_blame(0, &proof).unwrap())
    });
    group.finish();
}

/// Benchmark certification of a fully endorsed promise with the specified ciphersuite.
pub fn bench_certification<C: Ciphersuite, R: RngCore + CryptoRng + Clone>(
    c: &mut Criterion,
    name: &str,
    rng: &mut R,
) {
    let mut group = c.benchmark_group(format!("Certification {name}"));
    let setup = promise_setup::<C, R>(10, 15, 20, rng);
    let mut state = PromiseState::new(setup.promise.clone());
    for i in 0..setup.promise.n() {
        let signature = setup
            .promise
            .sign(i, &setup.insurer_keys[i as usize], rng)
            .unwrap();
        state.add_signature(i, signature).unwrap();
    }

    group.bench_function("Certify", |b| {
        b.iter(|| state.certified(&setup.promiser_key).unwrap())
    });
    group.finish();
}
