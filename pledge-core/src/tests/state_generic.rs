//! Ciphersuite-generic checks for promise state accumulation and certification.
#![allow(clippy::unwrap_used)]

use rand_core::{CryptoRng, RngCore};

use crate::{
    tests::helpers::{corrupt_share, promise_setup},
    Ciphersuite, Error, PromiseState,
};

/// Test that certification flips from insufficient to certified at exactly the r-th valid
/// endorsement.
pub fn check_certification_threshold<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let r = *setup.promise.r();
    let mut state = PromiseState::new(setup.promise.clone());

    for i in 0..r {
        assert_eq!(
            state.certified(&setup.promiser_key).unwrap_err(),
            Error::InsufficientSignatures
        );
        let signature = setup
            .promise
            .sign(i, &setup.insurer_keys[i as usize], &mut rng)
            .unwrap();
        state.add_signature(i, signature).unwrap();
    }
    assert!(state.certified(&setup.promiser_key).is_ok());
}

/// Test that slots holding invalid signatures count neither for nor against certification.
pub fn check_certification_skips_invalid_signatures<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let r = *setup.promise.r();
    let mut state = PromiseState::new(setup.promise.clone());

    // r - 1 valid endorsements, plus one slot holding a signature made for a different index
    for i in 0..r - 1 {
        let signature = setup
            .promise
            .sign(i, &setup.insurer_keys[i as usize], &mut rng)
            .unwrap();
        state.add_signature(i, signature).unwrap();
    }
    let misplaced = setup
        .promise
        .sign(0, &setup.insurer_keys[0], &mut rng)
        .unwrap();
    state.add_signature(r - 1, misplaced).unwrap();
    assert_eq!(
        state.certified(&setup.promiser_key).unwrap_err(),
        Error::InsufficientSignatures
    );

    // Replacing the bad slot with a real endorsement certifies
    let signature = setup
        .promise
        .sign(r - 1, &setup.insurer_keys[r as usize - 1], &mut rng)
        .unwrap();
    state.add_signature(r - 1, signature).unwrap();
    assert!(state.certified(&setup.promiser_key).is_ok());

    let extra = setup
        .promise
        .sign(0, &setup.insurer_keys[0], &mut rng)
        .unwrap();
    assert_eq!(
        state.add_signature(20, extra).unwrap_err(),
        Error::UnknownIndex
    );
}

/// Test that one valid blame proof repudiates the promise no matter how many endorsements
/// accumulate.
pub fn check_blame_overrides_certification<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let mut setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    corrupt_share(&mut setup, 0);
    let r = *setup.promise.r();
    let mut state = PromiseState::new(setup.promise.clone());

    let blame = setup
        .promise
        .blame(0, &setup.insurer_keys[0], &mut rng)
        .unwrap();
    state.add_blame_proof(0, blame).unwrap();

    for i in 0..r {
        assert_eq!(
            state.certified(&setup.promiser_key).unwrap_err(),
            Error::PromiseRepudiated
        );
        let signature = setup
            .promise
            .sign(i, &setup.insurer_keys[i as usize], &mut rng)
            .unwrap();
        state.add_signature(i, signature).unwrap();
    }
    assert_eq!(
        state.certified(&setup.promiser_key).unwrap_err(),
        Error::PromiseRepudiated
    );
}

/// Test that a slanderous blame in a slot does not block certification.
pub fn check_certification_skips_slanderous_blame<C: Ciphersuite, R: RngCore + CryptoRng>(
    mut rng: R,
) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let r = *setup.promise.r();
    let mut state = PromiseState::new(setup.promise.clone());

    // The promise is honest, so this blame is slander and must not count against it
    let blame = setup
        .promise
        .blame(0, &setup.insurer_keys[0], &mut rng)
        .unwrap();
    state.add_blame_proof(0, blame).unwrap();

    for i in 0..r {
        let signature = setup
            .promise
            .sign(i, &setup.insurer_keys[i as usize], &mut rng)
            .unwrap();
        state.add_signature(i, signature).unwrap();
    }
    assert!(state.certified(&setup.promiser_key).is_ok());
}

/// Test accumulating revealed shares in a state and reconstructing the promised secret.
pub fn check_state_reconstruction<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let t = *setup.promise.t();
    let mut state = PromiseState::new(setup.promise.clone());

    assert_eq!(
        state.reconstruct_secret().unwrap_err(),
        Error::IncorrectNumberOfShares
    );

    for i in 0..t {
        let share = setup
            .promise
            .reveal_share(i, &setup.insurer_keys[i as usize])
            .unwrap();
        setup.promise.verify_revealed_share(i, &share).unwrap();
        state.add_revealed_share(i, share).unwrap();
    }

    let reconstructed = state.reconstruct_secret().unwrap();
    assert_eq!(reconstructed.serialize(), setup.secret.serialize());
}
