#![allow(non_snake_case)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use rand_core::{CryptoRng, RngCore};

pub mod benches;
mod dleq;
mod error;
mod identifier;
mod polynomial;
mod promise;
mod ring;
pub(crate) mod serialization;
mod signing_key;
mod state;
pub mod tests;
mod traits;
mod verifying_key;

pub use dleq::DleqProof;
pub use error::{Error, FieldError, GroupError};
pub use identifier::Identifier;
pub use polynomial::{CoefficientCommitment, PolynomialCommitment, SecretShare, ShareSet};
pub use promise::{BlameProof, InsuredShare, MaskedShare, Promise, PromiseSignature};
pub use ring::RingSignature;
pub use signing_key::SigningKey;
pub use state::PromiseState;
pub use traits::{Ciphersuite, Element, Field, Group, Scalar};
pub use verifying_key::VerifyingKey;

// The three tags below are wire-visible protocol constants: endorsement and blame signatures
// are made over them, and the DLEQ domain separates blame-proof challenges from every other
// use of the suite hash. Changing any of them is a protocol version bump that invalidates all
// previously issued artifacts.

/// The message signed by an insurer endorsing a promise.
pub const ENDORSEMENT_TAG: &[u8] = b"Promise Signature";

/// The message signed by an insurer certifying a blame against a promise.
pub const BLAME_TAG: &[u8] = b"Promise Blame Signature";

/// Domain tag of the discrete-log-equality proofs carried by blame proofs.
pub const DLEQ_DOMAIN: &[u8] = b"Promise Protocol";

/// Generates a random nonzero scalar.
pub(crate) fn random_nonzero<C: Ciphersuite, R: RngCore + CryptoRng>(rng: &mut R) -> Scalar<C> {
    loop {
        let scalar = <<C::Group as Group>::Field>::random(rng);

        // This impl of `Eq` calls to `ConstantTimeEq` under the hood
        if scalar != <<C::Group as Group>::Field>::zero() {
            return scalar;
        }
    }
}
