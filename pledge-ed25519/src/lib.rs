#![allow(non_snake_case)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use curve25519_dalek::{
    constants::ED25519_BASEPOINT_POINT,
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
    traits::Identity,
};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use pledge_core as pledge;


// Re-exports in our public API
pub use pledge_core::{
    Ciphersuite, Error, Field, FieldError, Group, GroupError, BLAME_TAG, DLEQ_DOMAIN,
    ENDORSEMENT_TAG,
};
pub use rand_core;

/// An implementation of the promise ciphersuite scalar field for Ed25519.
#[derive(Clone, Copy)]
pub struct Ed25519ScalarField;

impl Field for Ed25519ScalarField {
    type Scalar = Scalar;

    type Serialization = [u8; 32];

    fn zero() -> Self::Scalar {
        Scalar::ZERO
    }

    fn one() -> Self::Scalar {
        Scalar::ONE
    }

    fn invert(scalar: &Self::Scalar) -> Result<Self::Scalar, FieldError> {
        // [`curve25519_dalek::scalar::Scalar`]'s Eq/PartialEq does a constant-time comparison
        // using `ConstantTimeEq`
        if *scalar == <Self as Field>::zero() {
            Err(FieldError::InvalidZeroScalar)
        } else {
            Ok(scalar.invert())
        }
    }

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Scalar {
        Scalar::random(rng)
    }

    fn serialize(scalar: &Self::Scalar) -> Self::Serialization {
        scalar.to_bytes()
    }

    fn deserialize(buf: &Self::Serialization) -> Result<Self::Scalar, FieldError> {
        match Scalar::from_canonical_bytes(*buf).into() {
            Some(s) => Ok(s),
            None => Err(FieldError::MalformedScalar),
        }
    }
}

/// An implementation of the promise ciphersuite group for the Ed25519 prime-order subgroup.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Group;

impl Group for Ed25519Group {
    type Field = Ed25519ScalarField;

    type Element = EdwardsPoint;

    type Serialization = [u8; 32];

    fn identity() -> Self::Element {
        EdwardsPoint::identity()
    }

    fn generator() -> Self::Element {
        ED25519_BASEPOINT_POINT
    }

    fn serialize(element: &Self::Element) -> Result<Self::Serialization, GroupError> {
        if *element == Self::identity() {
            return Err(GroupError::InvalidIdentityElement);
        }
        Ok(element.compress().to_bytes())
    }

    fn deserialize(buf: &Self::Serialization) -> Result<Self::Element, GroupError> {
        match CompressedEdwardsY::from_slice(buf.as_ref())
            .map_err(|_| GroupError::MalformedElement)?
            .decompress()
        {
            Some(point) => {
                if point == Self::identity() {
                    Err(GroupError::InvalidIdentityElement)
                } else if point.is_torsion_free() {
                    // At this point we should reject points which were not
                    // encoded canonically (i.e. Y coordinate >= p).
                    // However, we don't allow non-prime order elements,
                    // and that suffices to also reject non-canonical encodings
                    // per https://eprint.iacr.org/2020/1244.pdf:
                    //
                    // > There are 19 elliptic curve points that can be encoded in a non-canonical form.
                    // > (...) Among these points there are 2 points of small order and from the
                    // > remaining 17 y-coordinates only 10 decode to valid curve points all of mixed order.
                    Ok(point)
                } else {
                    Err(GroupError::InvalidNonPrimeOrderElement)
                }
            }
            None => Err(GroupError::MalformedElement),
        }
    }
}

fn hash_to_array(inputs: &[&[u8]]) -> [u8; 64] {
    let mut h = Sha512::new();
    for i in inputs {
        h.update(i);
    }
    let mut output = [0u8; 64];
    output.copy_from_slice(h.finalize().as_slice());
    output
}

fn hash_to_scalar(inputs: &[&[u8]]) -> Scalar {
    let output = hash_to_array(inputs);
    Scalar::from_bytes_mod_order_wide(&output)
}

/// Context string that domain-separates this ciphersuite's hash functions.
const CONTEXT_STRING: &str = "PLEDGE-ED25519-SHA512-v1";

/// An implementation of the promise ciphersuite over Ed25519 with SHA-512.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ed25519Sha512;

impl Ciphersuite for Ed25519Sha512 {
    const ID: &'static str = CONTEXT_STRING;

    type Group = Ed25519Group;

    /// H1 for promises over Ed25519 with SHA-512: ring-signature challenges.
    fn H1(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar {
        hash_to_scalar(&[CONTEXT_STRING.as_bytes(), b"ring", m])
    }

    /// H2 for promises over Ed25519 with SHA-512: proof-of-knowledge challenges.
    fn H2(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar {
        hash_to_scalar(&[CONTEXT_STRING.as_bytes(), b"dleq", m])
    }

    /// H3 for promises over Ed25519 with SHA-512: share-mask derivation.
    fn H3(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar {
        hash_to_scalar(&[CONTEXT_STRING.as_bytes(), b"mask", m])
    }
}

type E = Ed25519Sha512;

/// A share evaluation point on Ed25519.
pub type Identifier = pledge::Identifier<E>;

/// A long-term private key on Ed25519: a promised secret, or a promiser's or insurer's key.
pub type SigningKey = pledge::SigningKey<E>;

/// A long-term public key on Ed25519.
pub type VerifyingKey = pledge::VerifyingKey<E>;

/// A promise escrowing a secret with `n` insurers over Ed25519.
pub type Promise = pledge::Promise<E>;

/// One insurer's row of a promise: its key and its masked share.
pub type InsuredShare = pledge::InsuredShare<E>;

/// A masked (transport-form) share.
pub type MaskedShare = pledge::MaskedShare<E>;

/// An insurer's endorsement or blame-certification signature.
pub type PromiseSignature = pledge::PromiseSignature<E>;

/// A publicly verifiable proof that the promiser issued a malformed share.
pub type BlameProof = pledge::BlameProof<E>;

/// Accumulator for endorsements, blames and revealed shares of one promise.
pub type PromiseState = pledge::PromiseState<E>;

/// A plain (decrypted or revealed) secret share.
pub type SecretShare = pledge::SecretShare<E>;

/// A set of revealed shares, reconstructible once `t` are present.
pub type ShareSet = pledge::ShareSet<E>;

/// The public commitment to a secret polynomial.
pub type PolynomialCommitment = pledge::PolynomialCommitment<E>;

/// A commitment to a single polynomial coefficient.
pub type CoefficientCommitment = pledge::CoefficientCommitment<E>;

/// An anonymous-set signature over Ed25519.
pub type RingSignature = pledge::RingSignature<E>;

/// A discrete-log-equality proof over Ed25519.
pub type DleqProof = pledge::DleqProof<E>;
