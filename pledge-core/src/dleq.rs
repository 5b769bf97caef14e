//! Non-interactive proofs of discrete-logarithm equality.
//!
//! A Chaum-Pedersen proof shows knowledge of a witness `x` such that `public = g * x` and
//! `image = base * x` for a second base point, i.e. that two points share one discrete log with
//! respect to their respective bases. A blame proof uses it to disclose the Diffie-Hellman key
//! an insurer shares with the promiser (`image`, under `base` = the promiser key) while binding
//! it to the insurer's own public key (`public`, under the group generator) without revealing
//! the insurer's private key.
//!
//! The proof is made non-interactive with the Fiat-Shamir transform: both nonce commitments,
//! both statements and the caller's domain tag feed the challenge hash.

use rand_core::{CryptoRng, RngCore};

use crate::{
    random_nonzero,
    serialization::{scalar_size, SerializableScalar},
    Ciphersuite, Element, Error, Group, Scalar,
};

/// A compact discrete-log-equality proof: the Fiat-Shamir challenge and the single response.
///
/// The verifier recomputes both nonce commitments from the challenge and response, so they need
/// not travel with the proof.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DleqProof<C: Ciphersuite> {
    pub(crate) challenge: SerializableScalar<C>,
    pub(crate) response: SerializableScalar<C>,
}

impl<C> DleqProof<C>
where
    C: Ciphersuite,
{
    /// Proves knowledge of `witness` with `g * witness` and `base * witness` sharing the
    /// discrete log `witness`. Returns the proof together with `base * witness` (the image the
    /// proof speaks about), which the caller usually needs to publish alongside it.
    pub fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        domain: &[u8],
        base: &Element<C>,
        witness: &Scalar<C>,
    ) -> Result<(Self, Element<C>), Error> {
        let generator = <C::Group as Group>::generator();
        let public = generator * *witness;
        let image = *base * *witness;

        let nonce = random_nonzero::<C, R>(rng);
        let commitment_g = generator * nonce;
        let commitment_base = *base * nonce;

        let challenge = challenge::<C>(
            domain,
            base,
            &public,
            &image,
            &commitment_g,
            &commitment_base,
        )?;
        let response = nonce + challenge * *witness;

        Ok((
            Self {
                challenge: SerializableScalar(challenge),
                response: SerializableScalar(response),
            },
            image,
        ))
    }

    /// Verifies the proof for the statement `public = g * x` and `image = base * x`.
    pub fn verify(
        &self,
        domain: &[u8],
        base: &Element<C>,
        public: &Element<C>,
        image: &Element<C>,
    ) -> Result<(), Error> {
        let generator = <C::Group as Group>::generator();
        let challenge_in = self.challenge.0;
        let response = self.response.0;

        // commitment = base * nonce = base * response - image * challenge, and likewise for g
        let commitment_g = generator * response - *public * challenge_in;
        let commitment_base = *base * response - *image * challenge_in;

        let expected = challenge::<C>(domain, base, public, image, &commitment_g, &commitment_base)
            .map_err(|_| Error::InvalidProofOfKnowledge)?;

        if expected == challenge_in {
            Ok(())
        } else {
            Err(Error::InvalidProofOfKnowledge)
        }
    }

    /// The encoded length: challenge plus response.
    pub fn serialized_size(&self) -> usize {
        2 * scalar_size::<C>()
    }

    /// Serialize as `challenge || response`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        out.extend_from_slice(&self.challenge.serialize());
        out.extend_from_slice(&self.response.serialize());
        out
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let scalar_size = scalar_size::<C>();
        if bytes.len() != 2 * scalar_size {
            return Err(Error::DeserializationError);
        }
        Ok(Self {
            challenge: SerializableScalar::deserialize(&bytes[..scalar_size])?,
            response: SerializableScalar::deserialize(&bytes[scalar_size..])?,
        })
    }
}

impl<C: Ciphersuite> std::fmt::Debug for DleqProof<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DleqProof")
            .field("challenge", &hex::encode(self.challenge.serialize()))
            .field("response", &hex::encode(self.response.serialize()))
            .finish()
    }
}

/// The Fiat-Shamir challenge: both statements and both nonce commitments bound under the
/// caller's domain tag.
fn challenge<C: Ciphersuite>(
    domain: &[u8],
    base: &Element<C>,
    public: &Element<C>,
    image: &Element<C>,
    commitment_g: &Element<C>,
    commitment_base: &Element<C>,
) -> Result<Scalar<C>, Error> {
    let mut preimage = Vec::new();
    preimage.extend_from_slice(domain);
    preimage.extend_from_slice(<C::Group>::serialize(base)?.as_ref());
    preimage.extend_from_slice(<C::Group>::serialize(public)?.as_ref());
    preimage.extend_from_slice(<C::Group>::serialize(image)?.as_ref());
    preimage.extend_from_slice(<C::Group>::serialize(commitment_g)?.as_ref());
    preimage.extend_from_slice(<C::Group>::serialize(commitment_base)?.as_ref());
    Ok(C::H2(&preimage))
}
