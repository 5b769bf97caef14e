//! Ciphersuite-generic checks for promise construction, shares, endorsements and blame.
#![allow(clippy::unwrap_used)]

use std::panic::{catch_unwind, AssertUnwindSafe};

use rand_core::{CryptoRng, RngCore};

use crate::{
    tests::helpers::{corrupt_share, generate_element, promise_setup},
    Ciphersuite, Error, Promise, ShareSet, SigningKey, VerifyingKey,
};

/// Test promise construction and share verification with a Ciphersuite.
pub fn check_promise_construction<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    assert_eq!(promise.n(), 20);
    assert_eq!(*promise.t(), 10);
    assert_eq!(*promise.r(), 15);
    assert!(promise.verify_promise(&setup.promiser_key).is_ok());

    // Every insurer can verify its own share in isolation
    for (i, key_pair) in setup.insurer_keys.iter().enumerate() {
        assert!(promise.verify_share(i as u16, key_pair).is_ok());
    }

    // Error cases

    let stranger = VerifyingKey::from(&SigningKey::<C>::new(&mut rng));
    assert_eq!(
        promise.verify_promise(&stranger).unwrap_err(),
        Error::WrongPromiserKey
    );
    assert_eq!(
        promise.verify_share(20, &setup.insurer_keys[0]).unwrap_err(),
        Error::UnknownIndex
    );
    assert_eq!(
        promise.verify_share(0, &setup.insurer_keys[1]).unwrap_err(),
        Error::WrongInsurerKey
    );
}

/// Test that the endorsement threshold is clamped into `[t, n]` during construction.
pub fn check_r_clamping<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let low = promise_setup::<C, R>(10, 5, 20, &mut rng);
    assert_eq!(*low.promise.r(), 10);

    let high = promise_setup::<C, R>(10, 50, 20, &mut rng);
    assert_eq!(*high.promise.r(), 20);
}

/// Test that constructing a promise with fewer insurers than the threshold panics.
pub fn check_construction_panics_without_enough_insurers<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let secret = SigningKey::<C>::new(&mut rng);
    let promiser = SigningKey::<C>::new(&mut rng);
    let insurers: Vec<VerifyingKey<C>> = (0..3)
        .map(|_| VerifyingKey::from(&SigningKey::<C>::new(&mut rng)))
        .collect();

    let result = catch_unwind(AssertUnwindSafe(|| {
        Promise::new(&secret, &promiser, 5, 5, &insurers, &mut rng)
    }));
    assert!(result.is_err());
}

/// Test endorsement signing and verification for every index.
pub fn check_endorsements<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    for (i, key_pair) in setup.insurer_keys.iter().enumerate() {
        let signature = promise.sign(i as u16, key_pair, &mut rng).unwrap();
        assert!(promise.verify_signature(i as u16, &signature).is_ok());
    }

    // A signature made for one index never verifies at another; the ring differs
    let signature = promise.sign(0, &setup.insurer_keys[0], &mut rng).unwrap();
    assert_eq!(
        promise.verify_signature(1, &signature).unwrap_err(),
        Error::InvalidSignature
    );
    assert_eq!(
        promise.verify_signature(20, &signature).unwrap_err(),
        Error::UnknownIndex
    );
    assert_eq!(
        promise.sign(0, &setup.insurer_keys[1], &mut rng).unwrap_err(),
        Error::WrongInsurerKey
    );
}

/// Test revealing shares and reconstructing the secret from `t` of them.
pub fn check_reveal_shares<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    let mut shares = ShareSet::<C>::empty(*promise.t(), promise.n());
    for (i, key_pair) in setup.insurer_keys.iter().enumerate() {
        let share = promise.reveal_share(i as u16, key_pair).unwrap();
        assert!(promise.verify_revealed_share(i as u16, &share).is_ok());
        if (i as u16) < *promise.t() {
            shares.insert(i as u16, share).unwrap();
        }
    }

    // Any t shares interpolate back to the promised secret
    assert_eq!(shares.count(), *promise.t() as usize);
    let reconstructed = shares.reconstruct().unwrap();
    assert_eq!(reconstructed.serialize(), setup.secret.serialize());

    // Error cases

    let mut partial = ShareSet::<C>::empty(*promise.t(), promise.n());
    partial
        .insert(0, promise.reveal_share(0, &setup.insurer_keys[0]).unwrap())
        .unwrap();
    assert_eq!(
        partial.reconstruct().unwrap_err(),
        Error::IncorrectNumberOfShares
    );

    assert_eq!(
        promise
            .reveal_share(0, &setup.insurer_keys[1])
            .unwrap_err(),
        Error::WrongInsurerKey
    );
    let share = promise.reveal_share(0, &setup.insurer_keys[0]).unwrap();
    assert_eq!(
        promise.verify_revealed_share(20, &share).unwrap_err(),
        Error::UnknownIndex
    );
    assert_eq!(
        promise.verify_revealed_share(1, &share).unwrap_err(),
        Error::InvalidSecretShare
    );
}

/// Test that a blame against a corrupted share verifies as justified.
pub fn check_blame_justified<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let mut setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    corrupt_share(&mut setup, 0);
    let promise = &setup.promise;

    // The insurer notices the bad share...
    assert_eq!(
        promise.verify_share(0, &setup.insurer_keys[0]).unwrap_err(),
        Error::InvalidSecretShare
    );

    // ...and anyone holding the published proof can convict the promiser
    let proof = promise.blame(0, &setup.insurer_keys[0], &mut rng).unwrap();
    assert!(promise.verify_blame(0, &proof).is_ok());

    // The proof binds to its index; at any other index the blame signature fails
    assert_eq!(
        promise.verify_blame(1, &proof).unwrap_err(),
        Error::InvalidSignature
    );
    assert_eq!(
        promise.verify_blame(20, &proof).unwrap_err(),
        Error::UnknownIndex
    );
}

/// Test that blaming an honest promise is reported as slander.
pub fn check_blame_unjustified<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    let proof = promise.blame(0, &setup.insurer_keys[0], &mut rng).unwrap();
    assert_eq!(
        promise.verify_blame(0, &proof).unwrap_err(),
        Error::UnjustifiedBlame
    );
}

/// Test that a tampered blame proof fails the proof-of-knowledge check.
pub fn check_blame_tampered<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let mut setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    corrupt_share(&mut setup, 0);
    let promise = &setup.promise;

    // Swapping the disclosed Diffie-Hellman key invalidates the equality proof: an insurer
    // cannot frame the promiser by decrypting with a key it cannot prove ownership of.
    let mut forged = promise.blame(0, &setup.insurer_keys[0], &mut rng).unwrap();
    forged.diffie_key = crate::serialization::SerializableElement(generate_element::<C, R>(
        &mut rng,
    ));
    assert_eq!(
        promise.verify_blame(0, &forged).unwrap_err(),
        Error::InvalidProofOfKnowledge
    );
}
