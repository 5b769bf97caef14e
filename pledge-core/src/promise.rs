//! Secret promises: construction, per-share verification, endorsement and blame.
//!
//! A [`Promise`] escrows a secret key with `n` insurers. The secret is Shamir-split with
//! threshold `t`, each share is additively masked with the Diffie-Hellman key shared between
//! the promiser and the share's insurer, and the polynomial commitment published inside the
//! promise lets each insurer check its own share in isolation. Insurers react to a promise by
//! endorsing it ([`Promise::sign`]) or, when their share is malformed, by publishing a
//! [`BlameProof`] that convicts the promiser publicly without exposing the insurer's own key.

use derive_getters::Getters;
use rand_core::{CryptoRng, RngCore};

use std::io::{self, Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    dleq::DleqProof,
    polynomial::{PolynomialCommitment, SecretPolynomial, SecretShare},
    ring::RingSignature,
    serialization::{
        element_size, invalid_data, read_exact_vec, scalar_size, write_u32, ByteReader,
        SerializableElement, SerializableScalar, PREFIX_SIZE,
    },
    traits::Group,
    Ciphersuite, Element, Error, Identifier, Scalar, SigningKey, VerifyingKey, BLAME_TAG,
    DLEQ_DOMAIN, ENDORSEMENT_TAG,
};

/// Derives the additive share mask from the canonical encoding of a Diffie-Hellman point.
fn share_mask<C: Ciphersuite>(diffie_key: &Element<C>) -> Result<Scalar<C>, Error> {
    Ok(C::H3(<C::Group>::serialize(diffie_key)?.as_ref()))
}

/// Masks a share with the mask derived from `diffie_key`.
pub(crate) fn diffie_hellman_encrypt<C: Ciphersuite>(
    share: Scalar<C>,
    diffie_key: &Element<C>,
) -> Result<Scalar<C>, Error> {
    Ok(share + share_mask::<C>(diffie_key)?)
}

/// Removes the mask derived from `diffie_key` from a masked share.
pub(crate) fn diffie_hellman_decrypt<C: Ciphersuite>(
    masked: Scalar<C>,
    diffie_key: &Element<C>,
) -> Result<Scalar<C>, Error> {
    Ok(masked - share_mask::<C>(diffie_key)?)
}

/// A share in its transport form: masked with the Diffie-Hellman key shared between the
/// promiser and the insurer of the share's index. Public on the wire; only the intended insurer
/// can remove the mask.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MaskedShare<C: Ciphersuite>(pub(crate) SerializableScalar<C>);

impl<C> MaskedShare<C>
where
    C: Ciphersuite,
{
    pub(crate) fn new(scalar: Scalar<C>) -> Self {
        Self(SerializableScalar(scalar))
    }

    pub(crate) fn to_scalar(&self) -> Scalar<C> {
        self.0 .0
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(SerializableScalar::deserialize(bytes)?))
    }

    /// Serialize to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize()
    }
}

impl<C: Ciphersuite> std::fmt::Debug for MaskedShare<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("MaskedShare")
            .field(&hex::encode(self.serialize()))
            .finish()
    }
}

/// One insurer's row of a promise: its public key and the masked share allotted to it.
///
/// Keeping key and share in one record makes "one share per insurer" a structural fact rather
/// than a bookkeeping invariant between parallel arrays.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
pub struct InsuredShare<C: Ciphersuite> {
    /// The public key identifying the insurer of this share.
    pub(crate) insurer: VerifyingKey<C>,
    /// The share allotted to this insurer, masked with their Diffie-Hellman key.
    pub(crate) masked_share: MaskedShare<C>,
}

/// A signature by which an insurer either endorses a promise or certifies a blame against it.
///
/// Produced with a one-element anonymous-set signature over the insurer's key; which message
/// tag was signed (endorsement or blame) is not recorded here, so a signature is only
/// meaningful next to a promise, a share index, and the context it was made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromiseSignature<C: Ciphersuite> {
    pub(crate) signature: RingSignature<C>,
}

impl<C> PromiseSignature<C>
where
    C: Ciphersuite,
{
    /// The number of bytes this signature occupies on the wire.
    pub fn serialized_size(&self) -> usize {
        PREFIX_SIZE + self.signature.serialized_size()
    }

    /// Serialize as `[len: u32 le][signature bytes]`.
    pub fn serialize(&self) -> Vec<u8> {
        let encoded = self.signature.serialize();
        let mut out = Vec::with_capacity(PREFIX_SIZE + encoded.len());
        write_u32(&mut out, encoded.len() as u32);
        out.extend_from_slice(&encoded);
        out
    }

    /// Deserialize from a buffer. Trailing bytes after the declared length are ignored.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let length = reader.read_u32()? as usize;
        let signature = RingSignature::deserialize(reader.read_exact(length)?)?;
        Ok(Self { signature })
    }

    /// Serialize into a writer, returning the number of bytes written.
    pub fn serialize_into<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let buf = self.serialize();
        writer.write_all(&buf)?;
        Ok(buf.len())
    }

    /// Deserialize from a reader, returning the value and the number of bytes read.
    ///
    /// Reads the length prefix first to size the remainder; short reads are errors.
    pub fn deserialize_from<R: Read>(reader: &mut R) -> io::Result<(Self, usize)> {
        let mut buf = read_exact_vec(reader, PREFIX_SIZE)?;
        let length = LittleEndian::read_u32(&buf) as usize;
        buf.extend_from_slice(&read_exact_vec(reader, length)?);
        let decoded = Self::deserialize(&buf).map_err(invalid_data)?;
        Ok((decoded, buf.len()))
    }
}

/// Proof that the promiser handed a specific insurer a malformed share.
///
/// The insurer discloses the Diffie-Hellman key it shares with the promiser so anyone can
/// decrypt the disputed share, proves in zero knowledge that the disclosed key really is the
/// shared key (without exposing the insurer's private key), and signs the blame. The blame is
/// justified iff the decrypted share fails the promise's polynomial check.
#[derive(Clone, PartialEq, Eq)]
pub struct BlameProof<C: Ciphersuite> {
    /// The Diffie-Hellman key shared between the insurer and the promiser.
    pub(crate) diffie_key: SerializableElement<C>,
    /// Proof that `diffie_key` was derived from the insurer's private key.
    pub(crate) diffie_key_proof: DleqProof<C>,
    /// The insurer's signature over the blame tag.
    pub(crate) signature: PromiseSignature<C>,
}

impl<C> BlameProof<C>
where
    C: Ciphersuite,
{
    /// The disclosed Diffie-Hellman key.
    pub fn diffie_key(&self) -> Element<C> {
        self.diffie_key.0
    }

    /// The discrete-log-equality proof covering the disclosed key.
    pub fn diffie_key_proof(&self) -> &DleqProof<C> {
        &self.diffie_key_proof
    }

    /// The signature with which the insurer certifies the blame.
    pub fn signature(&self) -> &PromiseSignature<C> {
        &self.signature
    }

    /// The number of bytes this proof occupies on the wire.
    pub fn serialized_size(&self) -> usize {
        2 * PREFIX_SIZE
            + element_size::<C>()
            + self.diffie_key_proof.serialized_size()
            + self.signature.serialized_size()
    }

    /// Serialize as `[proof len][signature len][diffie key][proof][signature]`, where the
    /// signature length counts the signature's own length prefix.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let proof = self.diffie_key_proof.serialize();
        let signature = self.signature.serialize();

        let mut out = Vec::with_capacity(self.serialized_size());
        write_u32(&mut out, proof.len() as u32);
        write_u32(&mut out, signature.len() as u32);
        out.extend_from_slice(&self.diffie_key.serialize()?);
        out.extend_from_slice(&proof);
        out.extend_from_slice(&signature);
        Ok(out)
    }

    /// Deserialize from a buffer. Trailing bytes after the declared lengths are ignored.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ByteReader::new(bytes);
        let proof_length = reader.read_u32()? as usize;
        let signature_length = reader.read_u32()? as usize;

        let diffie_key = SerializableElement::deserialize(reader.read_exact(element_size::<C>())?)?;
        let diffie_key_proof = DleqProof::deserialize(reader.read_exact(proof_length)?)?;
        let signature = PromiseSignature::deserialize(reader.read_exact(signature_length)?)?;

        Ok(Self {
            diffie_key,
            diffie_key_proof,
            signature,
        })
    }

    /// Serialize into a writer, returning the number of bytes written.
    pub fn serialize_into<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let buf = self.serialize().map_err(invalid_data)?;
        writer.write_all(&buf)?;
        Ok(buf.len())
    }

    /// Deserialize from a reader, returning the value and the number of bytes read.
    pub fn deserialize_from<R: Read>(reader: &mut R) -> io::Result<(Self, usize)> {
        let mut buf = read_exact_vec(reader, 2 * PREFIX_SIZE)?;
        let proof_length = LittleEndian::read_u32(&buf[..PREFIX_SIZE]) as usize;
        let signature_length = LittleEndian::read_u32(&buf[PREFIX_SIZE..]) as usize;

        let remainder = element_size::<C>() + proof_length + signature_length;
        buf.extend_from_slice(&read_exact_vec(reader, remainder)?);
        let decoded = Self::deserialize(&buf).map_err(invalid_data)?;
        Ok((decoded, buf.len()))
    }
}

impl<C: Ciphersuite> std::fmt::Debug for BlameProof<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("BlameProof")
            .field(
                "diffie_key",
                &self
                    .diffie_key
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .field("diffie_key_proof", &self.diffie_key_proof)
            .field("signature", &self.signature)
            .finish()
    }
}

/// A promise by which a secret key is escrowed with `n` insurers so that any `t` of them can
/// reconstruct it, and at least `r` endorsements certify it.
///
/// Immutable once constructed; insurers and observers treat a received promise as read-only.
/// The promise retains only public material: the promiser's long-term public key, the
/// polynomial commitment, and one [`InsuredShare`] record per insurer.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
pub struct Promise<C: Ciphersuite> {
    /// Minimum number of shares needed to reconstruct the secret.
    pub(crate) t: u16,
    /// Minimum number of endorsement signatures needed for certification; `t <= r <= n`.
    pub(crate) r: u16,
    /// The long-term public key of the promiser.
    pub(crate) promiser_key: VerifyingKey<C>,
    /// Commitment to the secret polynomial, used to verify single shares.
    pub(crate) commitment: PolynomialCommitment<C>,
    /// One record per insurer, in share-index order.
    pub(crate) shares: Vec<InsuredShare<C>>,
}

impl<C> Promise<C>
where
    C: Ciphersuite,
{
    /// Constructs a promise escrowing `secret` with the given insurers.
    ///
    /// `promiser` is the long-term key of the party making the promise; its public half is
    /// recorded in the promise and its private half derives the per-insurer Diffie-Hellman
    /// masks. `r` is clamped into `[t, n]`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is zero or there are fewer than `t` insurers; both are contract
    /// violations at the call site, not runtime conditions.
    pub fn new<R: RngCore + CryptoRng>(
        secret: &SigningKey<C>,
        promiser: &SigningKey<C>,
        t: u16,
        r: u16,
        insurers: &[VerifyingKey<C>],
        rng: &mut R,
    ) -> Result<Self, Error> {
        let n = u16::try_from(insurers.len()).expect("too many insurers for a single promise");
        assert!(
            t >= 1 && n >= t,
            "not enough insurers for the requested threshold"
        );
        let r = r.clamp(t, n);

        let polynomial = SecretPolynomial::new(secret.to_scalar(), t, rng);
        let commitment = polynomial.commit();

        let mut shares = Vec::with_capacity(n as usize);
        for (i, insurer) in insurers.iter().enumerate() {
            let diffie_key = insurer.to_element() * promiser.to_scalar();
            let value = polynomial.evaluate(Identifier::from_share_index(i as u16));
            shares.push(InsuredShare {
                insurer: *insurer,
                masked_share: MaskedShare::new(diffie_hellman_encrypt::<C>(value, &diffie_key)?),
            });
        }

        Ok(Self {
            t,
            r,
            promiser_key: VerifyingKey::from(promiser),
            commitment,
            shares,
        })
    }

    /// The total number of insurers (and shares) of this promise.
    pub fn n(&self) -> u16 {
        self.shares.len() as u16
    }

    fn record(&self, index: u16) -> Result<&InsuredShare<C>, Error> {
        self.shares.get(index as usize).ok_or(Error::UnknownIndex)
    }

    fn expect_insurer(&self, index: u16, key_pair: &SigningKey<C>) -> Result<(), Error> {
        if self.record(index)?.insurer != VerifyingKey::from(key_pair) {
            return Err(Error::WrongInsurerKey);
        }
        Ok(())
    }

    /// Verifies at a structural level that the promise is well formed: consistent thresholds
    /// and the expected promiser key. Does not touch the shares.
    pub fn verify_promise(&self, promiser_key: &VerifyingKey<C>) -> Result<(), Error> {
        let n = self.n();
        if self.t == 0 || self.t > n || self.t > self.r || self.r > n {
            return Err(Error::InvalidThresholds);
        }
        if *promiser_key != self.promiser_key {
            return Err(Error::WrongPromiserKey);
        }
        Ok(())
    }

    /// Verifies that the share at `index` was properly constructed. Called by the insurer of
    /// that share, whose key pair is needed to derive the Diffie-Hellman mask.
    ///
    /// Fails with [`Error::WrongInsurerKey`] when the key pair is not the one the promise
    /// records at `index`: decrypting with a foreign key would produce garbage that says
    /// nothing about the promiser's honesty.
    pub fn verify_share(&self, index: u16, key_pair: &SigningKey<C>) -> Result<(), Error> {
        self.expect_insurer(index, key_pair)?;
        let record = self.record(index)?;

        let diffie_key = self.promiser_key.to_element() * key_pair.to_scalar();
        let share = diffie_hellman_decrypt::<C>(record.masked_share.to_scalar(), &diffie_key)?;
        if self.commitment.check(index, &SecretShare::new(share)) {
            Ok(())
        } else {
            Err(Error::InvalidSecretShare)
        }
    }

    fn sign_tagged<R: RngCore + CryptoRng>(
        &self,
        index: u16,
        key_pair: &SigningKey<C>,
        tag: &[u8],
        rng: &mut R,
    ) -> Result<PromiseSignature<C>, Error> {
        let ring = [self.record(index)?.insurer];
        Ok(PromiseSignature {
            signature: RingSignature::sign(rng, tag, &ring, 0, key_pair)?,
        })
    }

    fn verify_signature_tagged(
        &self,
        index: u16,
        signature: &PromiseSignature<C>,
        tag: &[u8],
    ) -> Result<(), Error> {
        let ring = [self.record(index)?.insurer];
        signature.signature.verify(tag, &ring)
    }

    /// Produces the endorsement signature for the insurer at `index`, who is expected to have
    /// verified its share first.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        index: u16,
        key_pair: &SigningKey<C>,
        rng: &mut R,
    ) -> Result<PromiseSignature<C>, Error> {
        self.expect_insurer(index, key_pair)?;
        self.sign_tagged(index, key_pair, ENDORSEMENT_TAG, rng)
    }

    /// Verifies an endorsement signature for the insurer at `index`.
    ///
    /// An endorsement made for one index never verifies at another (the signing ring differs),
    /// and never verifies as a blame signature (the signed tag differs).
    pub fn verify_signature(
        &self,
        index: u16,
        signature: &PromiseSignature<C>,
    ) -> Result<(), Error> {
        self.verify_signature_tagged(index, signature, ENDORSEMENT_TAG)
    }

    /// Decrypts and returns the share at `index`. Requires the insurer's own key pair; an
    /// insurer cannot reveal another insurer's share.
    ///
    /// No proof accompanies the returned value; receivers must check it with
    /// [`Promise::verify_revealed_share`].
    pub fn reveal_share(
        &self,
        index: u16,
        key_pair: &SigningKey<C>,
    ) -> Result<SecretShare<C>, Error> {
        self.expect_insurer(index, key_pair)?;
        let record = self.record(index)?;

        let diffie_key = self.promiser_key.to_element() * key_pair.to_scalar();
        let share = diffie_hellman_decrypt::<C>(record.masked_share.to_scalar(), &diffie_key)?;
        Ok(SecretShare::new(share))
    }

    /// Verifies that a revealed share is consistent with the committed polynomial at `index`.
    pub fn verify_revealed_share(&self, index: u16, share: &SecretShare<C>) -> Result<(), Error> {
        if index >= self.n() {
            return Err(Error::UnknownIndex);
        }
        if self.commitment.check(index, share) {
            Ok(())
        } else {
            Err(Error::InvalidSecretShare)
        }
    }

    /// Produces a proof that the promiser handed the insurer at `index` a malformed share.
    ///
    /// The proof can be verified by anyone holding the promise; see [`Promise::verify_blame`].
    pub fn blame<R: RngCore + CryptoRng>(
        &self,
        index: u16,
        key_pair: &SigningKey<C>,
        rng: &mut R,
    ) -> Result<BlameProof<C>, Error> {
        self.expect_insurer(index, key_pair)?;

        let signature = self.sign_tagged(index, key_pair, BLAME_TAG, rng)?;
        let (diffie_key_proof, diffie_key) = DleqProof::prove(
            rng,
            DLEQ_DOMAIN,
            &self.promiser_key.to_element(),
            &key_pair.to_scalar(),
        )?;

        Ok(BlameProof {
            diffie_key: SerializableElement(diffie_key),
            diffie_key_proof,
            signature,
        })
    }

    /// Verifies a blame proof against the share at `index`.
    ///
    /// Checks, in order: the blame signature over the blame tag; the discrete-log-equality
    /// proof binding the disclosed Diffie-Hellman key to the insurer's public key; and finally
    /// that the share, decrypted with the disclosed key, fails the polynomial check. A share
    /// that checks out means the accuser is slanderous, reported as
    /// [`Error::UnjustifiedBlame`].
    pub fn verify_blame(&self, index: u16, proof: &BlameProof<C>) -> Result<(), Error> {
        let record = self.record(index)?;
        self.verify_signature_tagged(index, &proof.signature, BLAME_TAG)?;

        proof.diffie_key_proof.verify(
            DLEQ_DOMAIN,
            &self.promiser_key.to_element(),
            &record.insurer.to_element(),
            &proof.diffie_key.0,
        )?;

        let share =
            diffie_hellman_decrypt::<C>(record.masked_share.to_scalar(), &proof.diffie_key.0)?;
        if self.commitment.check(index, &SecretShare::new(share)) {
            Err(Error::UnjustifiedBlame)
        } else {
            Ok(())
        }
    }

    /// The number of bytes this promise occupies on the wire.
    pub fn serialized_size(&self) -> usize {
        let element_size = element_size::<C>();
        3 * PREFIX_SIZE
            + element_size
            + PolynomialCommitment::<C>::size_for(self.t)
            + self.shares.len() * (element_size + scalar_size::<C>())
    }

    /// Serialize as `[n][t][r][promiser key][commitment][insurer keys][masked shares]`.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(self.serialized_size());
        write_u32(&mut out, self.shares.len() as u32);
        write_u32(&mut out, self.t as u32);
        write_u32(&mut out, self.r as u32);
        out.extend_from_slice(&self.promiser_key.serialize()?);
        out.extend_from_slice(&self.commitment.serialize()?);
        for record in &self.shares {
            out.extend_from_slice(&record.insurer.serialize()?);
        }
        for record in &self.shares {
            out.extend_from_slice(&record.masked_share.serialize());
        }
        Ok(out)
    }

    /// Deserialize from a buffer. Trailing bytes after the declared sizes are ignored.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let element_size = element_size::<C>();
        let scalar_size = scalar_size::<C>();

        let mut reader = ByteReader::new(bytes);
        let n = reader.read_count()?;
        let t = reader.read_count()?;
        let r = reader.read_count()?;

        let promiser_key = VerifyingKey::deserialize(reader.read_exact(element_size)?)?;
        let commitment = PolynomialCommitment::deserialize_from_reader(&mut reader, t)?;

        let mut insurers = Vec::with_capacity(n as usize);
        for _ in 0..n {
            insurers.push(VerifyingKey::deserialize(reader.read_exact(element_size)?)?);
        }
        let mut shares = Vec::with_capacity(n as usize);
        for insurer in insurers {
            shares.push(InsuredShare {
                insurer,
                masked_share: MaskedShare::deserialize(reader.read_exact(scalar_size)?)?,
            });
        }

        Ok(Self {
            t,
            r,
            promiser_key,
            commitment,
            shares,
        })
    }

    /// Serialize into a writer, returning the number of bytes written.
    pub fn serialize_into<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let buf = self.serialize().map_err(invalid_data)?;
        writer.write_all(&buf)?;
        Ok(buf.len())
    }

    /// Deserialize from a reader, returning the value and the number of bytes read.
    ///
    /// Reads `n` and `t` first; together with the suite they determine the full size, which is
    /// then read with read-full semantics and decoded as a buffer.
    pub fn deserialize_from<R: Read>(reader: &mut R) -> io::Result<(Self, usize)> {
        let mut buf = read_exact_vec(reader, 2 * PREFIX_SIZE)?;
        let n = LittleEndian::read_u32(&buf[..PREFIX_SIZE]) as usize;
        let t = LittleEndian::read_u32(&buf[PREFIX_SIZE..]) as usize;

        let element_size = element_size::<C>();
        let total = 3 * PREFIX_SIZE
            + element_size
            + t * element_size
            + n * (element_size + scalar_size::<C>());
        buf.extend_from_slice(&read_exact_vec(reader, total - buf.len())?);
        let decoded = Self::deserialize(&buf).map_err(invalid_data)?;
        Ok((decoded, buf.len()))
    }
}
