//! Long-term signing (private) keys.

use rand_core::{CryptoRng, RngCore};

use crate::{random_nonzero, Ciphersuite, Error, Field, Group, Scalar, VerifyingKey};

/// A long-term private key over a [`Ciphersuite::Group`].
///
/// Both the secret being promised and the promiser's and insurers' long-term keys are values of
/// this type; the corresponding public key is derived with [`VerifyingKey::from`].
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct SigningKey<C>
where
    C: Ciphersuite,
{
    pub(crate) scalar: Scalar<C>,
}

impl<C> SigningKey<C>
where
    C: Ciphersuite,
{
    /// Generate a new signing key.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> SigningKey<C> {
        let scalar = random_nonzero::<C, R>(rng);

        SigningKey { scalar }
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<SigningKey<C>, Error> {
        let serialized: <<C::Group as Group>::Field as Field>::Serialization = bytes
            .to_vec()
            .try_into()
            .map_err(|_| Error::MalformedSigningKey)?;
        let scalar = <<C::Group as Group>::Field as Field>::deserialize(&serialized)?;

        if scalar == <<C::Group as Group>::Field as Field>::zero() {
            return Err(Error::MalformedSigningKey);
        }

        Ok(Self { scalar })
    }

    /// Serialize `SigningKey` to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        <<C::Group as Group>::Field as Field>::serialize(&self.scalar)
            .as_ref()
            .to_vec()
    }

    /// Creates a SigningKey from a scalar.
    pub fn from_scalar(scalar: Scalar<C>) -> Self {
        Self { scalar }
    }

    /// Return the underlying scalar.
    pub fn to_scalar(self) -> Scalar<C> {
        self.scalar
    }
}

impl<C> std::fmt::Debug for SigningKey<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningKey").field(&"<redacted>").finish()
    }
}

impl<C> From<&SigningKey<C>> for VerifyingKey<C>
where
    C: Ciphersuite,
{
    fn from(signing_key: &SigningKey<C>) -> Self {
        VerifyingKey::new(C::Group::generator() * signing_key.scalar)
    }
}

impl<C> From<SigningKey<C>> for VerifyingKey<C>
where
    C: Ciphersuite,
{
    fn from(signing_key: SigningKey<C>) -> Self {
        VerifyingKey::<C>::from(&signing_key)
    }
}
