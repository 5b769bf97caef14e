//! Traits used to abstract Ciphersuites.

use core::{
    fmt::Debug,
    ops::{Add, Mul, Sub},
};

use rand_core::{CryptoRng, RngCore};

use crate::{FieldError, GroupError};

/// A prime order finite field GF(q) over which all scalar values for our prime order group are
/// defined.
///
/// This trait does not have to be implemented for a finite field scalar itself, it can be a
/// pass-through, implemented for a type just for the ciphersuite, and calls through to another
/// implementation underneath, so that this trait does not have to be implemented for types you
/// don't own.
pub trait Field: Copy + Clone {
    /// An element of the scalar field GF(p).
    /// The Eq/PartialEq implementation MUST be constant-time.
    type Scalar: Add<Output = Self::Scalar>
        + Copy
        + Clone
        + Eq
        + Mul<Output = Self::Scalar>
        + PartialEq
        + Sub<Output = Self::Scalar>;

    /// A unique byte array buf of fixed length N.
    type Serialization: AsRef<[u8]> + Debug + TryFrom<Vec<u8>>;

    /// Returns the zero element of the field, the additive identity.
    fn zero() -> Self::Scalar;

    /// Returns the one element of the field, the multiplicative identity.
    fn one() -> Self::Scalar;

    /// Computes the multiplicative inverse of an element of the scalar field, failing if the
    /// element is zero.
    fn invert(scalar: &Self::Scalar) -> Result<Self::Scalar, FieldError>;

    /// Generate a random scalar from the entire space [0, l-1].
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Scalar;

    /// A member function of a [`Field`] that maps a [`Scalar`] to a unique byte array buf of
    /// fixed length Ne.
    fn serialize(scalar: &Self::Scalar) -> Self::Serialization;

    /// A member function of a [`Field`] that attempts to map a byte array `buf` to a [`Scalar`].
    ///
    /// Fails if the input is not a valid byte representation of a [`Scalar`] of the
    /// [`Field`]. This function can raise an [`Error`](crate::Error) if deserialization fails.
    fn deserialize(buf: &Self::Serialization) -> Result<Self::Scalar, FieldError>;
}

/// An element of the [`Ciphersuite`] `C`'s [`Group`]'s scalar [`Field`].
pub type Scalar<C> = <<<C as Ciphersuite>::Group as Group>::Field as Field>::Scalar;

/// A prime-order group (or subgroup) that provides everything we need to build promises and
/// verify the proofs attached to them.
///
/// This trait does not have to be implemented for the curve/element/point itself, it can be a
/// pass-through, implemented for a type just for the ciphersuite, and calls through to another
/// implementation underneath, so that this trait does not have to be implemented for types you
/// don't own.
pub trait Group: Copy + Clone + PartialEq {
    /// A prime order finite field GF(q) over which all scalar values for our prime order group
    /// are defined.
    type Field: Field;

    /// An element of our group that we will be computing over.
    type Element: Add<Output = Self::Element>
        + Copy
        + Clone
        + Eq
        + Mul<<Self::Field as Field>::Scalar, Output = Self::Element>
        + PartialEq
        + Sub<Output = Self::Element>;

    /// A unique byte array buf of fixed length N.
    type Serialization: AsRef<[u8]> + Debug + TryFrom<Vec<u8>>;

    /// Additive identity of the prime order group.
    fn identity() -> Self::Element;

    /// The fixed generator element of the prime order group.
    fn generator() -> Self::Element;

    /// A member function of a group _G_ that maps an [`Element`](Group::Element) to a unique
    /// byte array buf of fixed length Ne. This function raises an error if the element is the
    /// identity element of the group.
    fn serialize(element: &Self::Element) -> Result<Self::Serialization, GroupError>;

    /// A member function of a [`Group`] that attempts to map a byte array `buf` to an
    /// [`Element`](Group::Element).
    ///
    /// Fails if the input is not a valid byte representation of an element, if the resulting
    /// element is the identity, or if it does not have (large) prime order. Rejecting small
    /// order and mixed order elements here means no consumer of this trait needs to clear
    /// cofactors.
    fn deserialize(buf: &Self::Serialization) -> Result<Self::Element, GroupError>;
}

/// An element of the [`Ciphersuite`] `C`'s [`Group`].
pub type Element<C> = <<C as Ciphersuite>::Group as Group>::Element;

/// A ciphersuite specifies the underlying prime-order group details and the cryptographic hash
/// functions used by the promise protocol.
///
/// Each hash function must map arbitrary input to scalars with a domain separator unique to its
/// role, so that ring-signature challenges, proof challenges and share masks can never collide.
pub trait Ciphersuite: Copy + Clone + PartialEq + Debug + 'static {
    /// The ciphersuite ID string, used as the context string of the hash functions. It should
    /// identify both the group and the hash, e.g. "PLEDGE-ED25519-SHA512-v1".
    const ID: &'static str;

    /// The prime order group (or subgroup) that this ciphersuite operates over.
    type Group: Group;

    /// [`H1`](Ciphersuite::H1) for a ciphersuite.
    ///
    /// Maps arbitrary inputs to `Self::Scalar` elements. Used to derive the challenge chain of
    /// anonymous-set (ring) signatures.
    fn H1(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar;

    /// [`H2`](Ciphersuite::H2) for a ciphersuite.
    ///
    /// Maps arbitrary inputs to `Self::Scalar` elements. Used as the Fiat-Shamir challenge of
    /// the discrete-log-equality proof carried by blame proofs.
    fn H2(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar;

    /// [`H3`](Ciphersuite::H3) for a ciphersuite.
    ///
    /// Maps arbitrary inputs to `Self::Scalar` elements. Used to derive the additive mask of a
    /// secret share from the canonical encoding of a Diffie-Hellman point; both endpoints of
    /// the exchange must compute the same mask from the same point.
    fn H3(m: &[u8]) -> <<Self::Group as Group>::Field as Field>::Scalar;
}
