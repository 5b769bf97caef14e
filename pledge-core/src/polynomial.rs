//! Secret polynomials, their public commitments, and share reconstruction.
//!
//! A promise splits its secret with Shamir secret sharing: the secret is the constant term of a
//! random degree-(t-1) polynomial, share `i` is the evaluation at the nonzero identifier
//! derived from `i + 1`, and the vector of coefficient commitments `g * a_k` lets anyone check
//! a single share against the polynomial without learning anything else about it.

use core::fmt::{self, Debug};
use core::iter;

use rand_core::{CryptoRng, RngCore};
use zeroize::DefaultIsZeroes;

use crate::{
    serialization::{element_size, ByteReader, SerializableElement, SerializableScalar},
    Ciphersuite, Element, Error, Field, Group, Identifier, Scalar, SigningKey,
};

/// A secret polynomial with the promised secret as its constant term.
///
/// Lives only for the duration of promise construction; it is never serialized.
pub(crate) struct SecretPolynomial<C: Ciphersuite> {
    coefficients: Vec<Scalar<C>>,
}

impl<C> SecretPolynomial<C>
where
    C: Ciphersuite,
{
    /// Pick a random polynomial of degree `threshold - 1` whose constant term is `secret`.
    pub(crate) fn new<R: RngCore + CryptoRng>(
        secret: Scalar<C>,
        threshold: u16,
        rng: &mut R,
    ) -> Self {
        debug_assert!(threshold >= 1);
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(secret);
        coefficients.extend(
            iter::repeat_with(|| <<C::Group as Group>::Field>::random(rng))
                .take(threshold as usize - 1),
        );
        Self { coefficients }
    }

    /// Evaluate the polynomial at the point `x` using Horner's method.
    pub(crate) fn evaluate(&self, x: Identifier<C>) -> Scalar<C> {
        let mut value = <<C::Group as Group>::Field>::zero();

        let ell = x.to_scalar();
        for coeff in self.coefficients.iter().skip(1).rev() {
            value = value + *coeff;
            value = value * ell;
        }
        value
            + *self
                .coefficients
                .first()
                .expect("coefficients have at least the constant term")
    }

    /// Commit to every coefficient with the group generator.
    pub(crate) fn commit(&self) -> PolynomialCommitment<C> {
        PolynomialCommitment(
            self.coefficients
                .iter()
                .map(|c| CoefficientCommitment::new(<C::Group as Group>::generator() * *c))
                .collect(),
        )
    }
}

/// A [`Group::Element`] newtype that is a commitment to one coefficient of a secret polynomial.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CoefficientCommitment<C: Ciphersuite>(pub(crate) SerializableElement<C>);

impl<C> CoefficientCommitment<C>
where
    C: Ciphersuite,
{
    pub(crate) fn new(value: Element<C>) -> Self {
        Self(SerializableElement(value))
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(SerializableElement::deserialize(bytes)?))
    }

    /// Serialize to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.0.serialize()
    }

    /// Returns the inner element value.
    pub fn value(&self) -> Element<C> {
        self.0 .0
    }
}

impl<C> Debug for CoefficientCommitment<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("CoefficientCommitment")
            .field(
                &self
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .finish()
    }
}

/// The public commitment to a secret polynomial: the vector `g * a_0, ..., g * a_{t-1}`.
///
/// Enables index-wise share verification: share `s_i` is consistent with the polynomial iff
/// `g * s_i` equals the committed polynomial evaluated at the share's identifier. All insurers
/// of a promise must be assured they hold the *same* commitment, which the promise's own wire
/// encoding guarantees by embedding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialCommitment<C: Ciphersuite>(pub(crate) Vec<CoefficientCommitment<C>>);

impl<C> PolynomialCommitment<C>
where
    C: Ciphersuite,
{
    /// The sharing threshold `t` this commitment was built for.
    pub fn threshold(&self) -> u16 {
        self.0.len() as u16
    }

    /// Returns the coefficient commitments.
    pub fn coefficients(&self) -> &[CoefficientCommitment<C>] {
        &self.0
    }

    /// Evaluates the committed polynomial at `x` in the exponent, namely
    /// `sum_k x^k * (g * a_k)`.
    pub(crate) fn evaluate(&self, x: Identifier<C>) -> Element<C> {
        let i = x.to_scalar();

        let (_, result) = self.0.iter().fold(
            (
                <<C::Group as Group>::Field>::one(),
                <C::Group as Group>::identity(),
            ),
            |(i_to_the_k, sum_so_far), comm_k| {
                (i * i_to_the_k, sum_so_far + comm_k.value() * i_to_the_k)
            },
        );
        result
    }

    /// Checks a share against the commitment: does `g * share` equal the committed polynomial
    /// at the identifier assigned to `index`?
    pub fn check(&self, index: u16, share: &SecretShare<C>) -> bool {
        let expected = self.evaluate(Identifier::from_share_index(index));
        <C::Group as Group>::generator() * share.to_scalar() == expected
    }

    /// The encoded length of a commitment with the given threshold.
    pub(crate) fn size_for(threshold: u16) -> usize {
        threshold as usize * element_size::<C>()
    }

    /// Serialize as the concatenation of the coefficient encodings. The length is fixed given
    /// the threshold and the suite, so no prefix is needed.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(Self::size_for(self.threshold()));
        for commitment in &self.0 {
            out.extend_from_slice(&commitment.serialize()?);
        }
        Ok(out)
    }

    /// Deserialize a commitment of `threshold` coefficients from a cursor.
    pub(crate) fn deserialize_from_reader(
        reader: &mut ByteReader<'_>,
        threshold: u16,
    ) -> Result<Self, Error> {
        let element_size = element_size::<C>();
        let mut coefficients = Vec::with_capacity(threshold as usize);
        for _ in 0..threshold {
            coefficients.push(CoefficientCommitment::deserialize(
                reader.read_exact(element_size)?,
            )?);
        }
        Ok(Self(coefficients))
    }

    /// Deserialize a commitment of `threshold` coefficients from a buffer.
    pub fn deserialize(bytes: &[u8], threshold: u16) -> Result<Self, Error> {
        Self::deserialize_from_reader(&mut ByteReader::new(bytes), threshold)
    }
}

/// A plain (unmasked) secret share: one evaluation of the secret polynomial.
///
/// Obtained by an insurer decrypting its masked share, or by anyone receiving a revealed share.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretShare<C: Ciphersuite>(pub(crate) SerializableScalar<C>);

impl<C> SecretShare<C>
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

impl<C> Debug for SecretShare<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SecretShare").field(&"<redacted>").finish()
    }
}

impl<C> Default for SecretShare<C>
where
    C: Ciphersuite,
{
    fn default() -> Self {
        Self::new(<<C::Group as Group>::Field>::zero())
    }
}

// Implements [`Zeroize`] by overwriting a value with the [`Default::default()`] value
impl<C> DefaultIsZeroes for SecretShare<C> where C: Ciphersuite {}

/// Accumulates revealed shares of one promise until enough are present to reconstruct.
///
/// Slot `i` holds the share revealed by insurer `i`; the threshold is the promise's `t`.
#[derive(Clone)]
pub struct ShareSet<C: Ciphersuite> {
    threshold: u16,
    shares: Vec<Option<SecretShare<C>>>,
}

impl<C> ShareSet<C>
where
    C: Ciphersuite,
{
    /// An empty set ready to receive up to `n` shares, `threshold` of which reconstruct.
    pub fn empty(threshold: u16, n: u16) -> Self {
        Self {
            threshold,
            shares: vec![None; n as usize],
        }
    }

    /// Stores the share revealed for `index`, replacing any share already there.
    pub fn insert(&mut self, index: u16, share: SecretShare<C>) -> Result<(), Error> {
        *self
            .shares
            .get_mut(index as usize)
            .ok_or(Error::UnknownIndex)? = Some(share);
        Ok(())
    }

    /// Number of shares currently present.
    pub fn count(&self) -> usize {
        self.shares.iter().filter(|s| s.is_some()).count()
    }

    /// Recompute the secret from the accumulated shares using Lagrange interpolation.
    ///
    /// Fails with [`Error::IncorrectNumberOfShares`] when fewer than `threshold` shares are
    /// present. The caller is responsible for having verified the shares first; interpolating
    /// unverified shares yields an unrelated key.
    pub fn reconstruct(&self) -> Result<SigningKey<C>, Error> {
        let present: Vec<(Identifier<C>, &SecretShare<C>)> = self
            .shares
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.as_ref()
                    .map(|share| (Identifier::from_share_index(i as u16), share))
            })
            .collect();
        if present.len() < self.threshold as usize {
            return Err(Error::IncorrectNumberOfShares);
        }

        let points: Vec<Scalar<C>> = present.iter().map(|(id, _)| id.to_scalar()).collect();

        // Compute y = f(0) via polynomial interpolation of these t-of-n solutions ('points') of f
        let mut secret = <<C::Group as Group>::Field>::zero();
        for (x_i, share) in &present {
            let coefficient = lagrange_coefficient::<C>(&points, &x_i.to_scalar())?;
            secret = secret + coefficient * share.to_scalar();
        }

        Ok(SigningKey::from_scalar(secret))
    }
}

/// Generates the Lagrange coefficient evaluated at zero for the point `x_i` within `points`.
fn lagrange_coefficient<C: Ciphersuite>(
    points: &[Scalar<C>],
    x_i: &Scalar<C>,
) -> Result<Scalar<C>, Error> {
    let mut numerator = <<C::Group as Group>::Field>::one();
    let mut denominator = <<C::Group as Group>::Field>::one();

    for x_j in points {
        if *x_j == *x_i {
            continue;
        }
        numerator = numerator * *x_j;
        denominator = denominator * (*x_j - *x_i);
    }

    Ok(numerator * <<C::Group as Group>::Field>::invert(&denominator)?)
}
