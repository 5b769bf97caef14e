//! Anonymous-set (ring) signatures over prime order groups.
//!
//! A ring signature proves that *some* member of a set of public keys signed a message without
//! revealing which one. The promise protocol always signs with one-element rings, where the
//! construction degenerates to a Schnorr signature over the single member's key; using the ring
//! primitive for both endorsements and blames keeps one signing code path for everything.
//!
//! The construction chains challenges through the ring: starting from the signer with a fresh
//! nonce commitment, each member's challenge is the hash of the previous member's commitment,
//! and the signer's response closes the cycle with its private key.

use rand_core::{CryptoRng, RngCore};

use crate::{
    random_nonzero,
    serialization::{scalar_size, SerializableScalar},
    Ciphersuite, Element, Error, Field, Group, Scalar, SigningKey, VerifyingKey,
};

/// An anonymous-set signature: the challenge of ring member 0 plus one response per member.
#[derive(Clone, PartialEq, Eq)]
pub struct RingSignature<C: Ciphersuite> {
    pub(crate) challenge: SerializableScalar<C>,
    pub(crate) responses: Vec<SerializableScalar<C>>,
}

impl<C> RingSignature<C>
where
    C: Ciphersuite,
{
    /// Signs `message` as the ring member at position `signer`, whose public key must be
    /// `ring[signer]`.
    pub fn sign<R: RngCore + CryptoRng>(
        rng: &mut R,
        message: &[u8],
        ring: &[VerifyingKey<C>],
        signer: usize,
        signing_key: &SigningKey<C>,
    ) -> Result<RingSignature<C>, Error> {
        let members = ring.len();
        if members == 0 || signer >= members {
            return Err(Error::UnknownIndex);
        }

        let ring_bytes = encode_ring(ring)?;
        let generator = <C::Group as Group>::generator();

        let nonce = random_nonzero::<C, R>(rng);
        let mut challenges = vec![<<C::Group as Group>::Field>::zero(); members];
        let mut responses: Vec<Scalar<C>> = (0..members)
            .map(|_| <<C::Group as Group>::Field>::random(rng))
            .collect();

        // Walk the ring starting after the signer; each member's commitment is forced by its
        // random response and the challenge inherited from the previous member.
        let mut challenge = chain_challenge::<C>(&(generator * nonce), &ring_bytes, message)?;
        for step in 1..members {
            let j = (signer + step) % members;
            challenges[j] = challenge;
            let commitment = generator * responses[j] + ring[j].to_element() * challenge;
            challenge = chain_challenge::<C>(&commitment, &ring_bytes, message)?;
        }
        challenges[signer] = challenge;
        responses[signer] = nonce - challenge * signing_key.to_scalar();

        Ok(RingSignature {
            challenge: SerializableScalar(challenges[0]),
            responses: responses.into_iter().map(SerializableScalar).collect(),
        })
    }

    /// Verifies the signature over `message` against the given ring.
    ///
    /// Recomputes the challenge chain across the whole ring; the signature is valid iff the
    /// chain closes back on the stored challenge.
    pub fn verify(&self, message: &[u8], ring: &[VerifyingKey<C>]) -> Result<(), Error> {
        let members = ring.len();
        if members == 0 || self.responses.len() != members {
            return Err(Error::InvalidSignature);
        }

        let ring_bytes = encode_ring(ring).map_err(|_| Error::InvalidSignature)?;
        let generator = <C::Group as Group>::generator();

        let mut challenge = self.challenge.0;
        for (response, member) in self.responses.iter().zip(ring.iter()) {
            let commitment = generator * response.0 + member.to_element() * challenge;
            challenge = chain_challenge::<C>(&commitment, &ring_bytes, message)
                .map_err(|_| Error::InvalidSignature)?;
        }

        if challenge == self.challenge.0 {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// The number of responses carried, i.e. the ring size this signature was made for.
    pub fn ring_size(&self) -> usize {
        self.responses.len()
    }

    /// The encoded length: one challenge plus one response per ring member.
    pub fn serialized_size(&self) -> usize {
        (1 + self.responses.len()) * scalar_size::<C>()
    }

    /// Serialize as `challenge || response_0 || ... || response_{m-1}`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        out.extend_from_slice(&self.challenge.serialize());
        for response in &self.responses {
            out.extend_from_slice(&response.serialize());
        }
        out
    }

    /// Deserialize from bytes; the ring size is implied by the input length.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let scalar_size = scalar_size::<C>();
        if bytes.len() < 2 * scalar_size || bytes.len() % scalar_size != 0 {
            return Err(Error::MalformedSignature);
        }

        let mut chunks = bytes.chunks_exact(scalar_size);
        let challenge = SerializableScalar::deserialize(
            chunks.next().expect("length checked above"),
        )?;
        let responses = chunks
            .map(SerializableScalar::deserialize)
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            challenge,
            responses,
        })
    }
}

impl<C: Ciphersuite> std::fmt::Debug for RingSignature<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("RingSignature")
            .field("challenge", &hex::encode(self.challenge.serialize()))
            .field("ring_size", &self.responses.len())
            .finish()
    }
}

/// The fixed encoding of the ring bound into every challenge.
fn encode_ring<C: Ciphersuite>(ring: &[VerifyingKey<C>]) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    for member in ring {
        bytes.extend_from_slice(&member.serialize()?);
    }
    Ok(bytes)
}

/// One link of the challenge chain: hash a nonce commitment, the ring, and the message.
fn chain_challenge<C: Ciphersuite>(
    commitment: &Element<C>,
    ring_bytes: &[u8],
    message: &[u8],
) -> Result<Scalar<C>, Error> {
    let mut preimage = Vec::new();
    preimage.extend_from_slice(<C::Group>::serialize(commitment)?.as_ref());
    preimage.extend_from_slice(ring_bytes);
    preimage.extend_from_slice(message);
    Ok(C::H1(&preimage))
}
