//! Promise protocol error types.

use thiserror::Error;

/// An error related to a secret promise.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// The promise thresholds are inconsistent.
    #[error("thresholds must satisfy 1 <= t <= r <= n")]
    InvalidThresholds,
    /// The promiser key recorded in the promise is not the expected one.
    #[error("promiser public key differs from what is expected")]
    WrongPromiserKey,
    /// A share index outside `[0, n)` was used.
    #[error("share index out of range; expected 0 <= i < n")]
    UnknownIndex,
    /// The key pair presented for an index does not match the insurer key recorded there.
    #[error("insurer key differs from the key recorded at this index")]
    WrongInsurerKey,
    /// A share does not lie on the committed polynomial.
    #[error("share failed the public polynomial check")]
    InvalidSecretShare,
    /// The encoding of a signing key was malformed.
    #[error("malformed signing key encoding")]
    MalformedSigningKey,
    /// The encoding of a signature was malformed.
    #[error("malformed signature encoding")]
    MalformedSignature,
    /// Signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,
    /// The proof of knowledge of the Diffie-Hellman key is not valid.
    #[error("the proof of knowledge is not valid")]
    InvalidProofOfKnowledge,
    /// All parts of a blame proof verified but the disputed share checks out.
    #[error("unjustified blame; the share checks out okay")]
    UnjustifiedBlame,
    /// A valid blame proof exists for a promise being asked to certify.
    #[error("a valid blame proof repudiates this promise")]
    PromiseRepudiated,
    /// Fewer than `r` valid endorsement signatures are present.
    #[error("not enough valid signatures to certify the promise")]
    InsufficientSignatures,
    /// Too few shares to reconstruct, or share bookkeeping of the wrong size.
    #[error("incorrect number of shares")]
    IncorrectNumberOfShares,
    /// A buffer did not contain enough bytes for the declared length prefixes.
    #[error("buffer too small")]
    BufferTooSmall,
    /// Error deserializing value.
    #[error("error deserializing value")]
    DeserializationError,
    /// Error serializing value.
    #[error("error serializing value")]
    SerializationError,
    /// Error in scalar Field.
    #[error("error in scalar field")]
    FieldError(#[from] FieldError),
    /// Error in elliptic curve Group.
    #[error("error in elliptic curve group")]
    GroupError(#[from] GroupError),
}

/// An error related to a scalar Field.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldError {
    /// The encoding of a group scalar was malformed.
    #[error("malformed scalar encoding")]
    MalformedScalar,
    /// This scalar MUST NOT be zero.
    #[error("invalid for this scalar to be zero")]
    InvalidZeroScalar,
}

/// An error related to a Group (usually an elliptic curve or constructed from one) or one of its
/// Elements.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum GroupError {
    /// The encoding of a group element was malformed.
    #[error("malformed group element encoding")]
    MalformedElement,
    /// This element MUST NOT be the identity.
    #[error("invalid for this element to be the identity")]
    InvalidIdentityElement,
    /// This element MUST have (large) prime order.
    #[error("invalid for this element to not have large prime order")]
    InvalidNonPrimeOrderElement,
}
