//! Share evaluation points.

use core::fmt::{self, Debug};

use crate::{Ciphersuite, Error, Field, FieldError, Group, Scalar};

/// The x-coordinate at which the secret polynomial is evaluated for one share.
///
/// An identifier is a nonzero element of the scalar field: f(0) is the promised secret, so zero
/// must never be used as an evaluation point. Share index `i` (0-based) always evaluates at the
/// identifier derived from `i + 1`; keeping that mapping in one place means splitting, checking
/// and revealing shares can never disagree about the abscissa convention.
#[derive(Copy, Clone, PartialEq)]
pub struct Identifier<C: Ciphersuite>(Scalar<C>);

impl<C> Identifier<C>
where
    C: Ciphersuite,
{
    /// Create a new Identifier from a scalar.
    pub(crate) fn new(scalar: Scalar<C>) -> Result<Self, Error> {
        if scalar == <<C::Group as Group>::Field>::zero() {
            Err(FieldError::InvalidZeroScalar.into())
        } else {
            Ok(Self(scalar))
        }
    }

    /// Get the inner scalar.
    pub(crate) fn to_scalar(&self) -> Scalar<C> {
        self.0
    }

    /// The evaluation point assigned to the 0-based share index `index`.
    pub(crate) fn from_share_index(index: u16) -> Self {
        // index + 1 is nonzero for any u16 index below the participant bound
        Self::try_from(index.checked_add(1).expect("share index overflows u16")).expect("nonzero")
    }

    /// Serialize the identifier using the ciphersuite encoding.
    pub fn serialize(&self) -> Vec<u8> {
        <<C::Group as Group>::Field>::serialize(&self.0).as_ref().to_vec()
    }
}

impl<C> Eq for Identifier<C> where C: Ciphersuite {}

impl<C> Debug for Identifier<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Identifier")
            .field(&hex::encode(self.serialize()))
            .finish()
    }
}

impl<C> TryFrom<u16> for Identifier<C>
where
    C: Ciphersuite,
{
    type Error = Error;

    fn try_from(n: u16) -> Result<Identifier<C>, Self::Error> {
        if n == 0 {
            Err(FieldError::InvalidZeroScalar.into())
        } else {
            // Classic left-to-right double-and-add algorithm that skips the first bit 1 (since
            // identifiers are never zero, there is always a bit 1), thus `sum` starts with 1 too.
            let one = <<C::Group as Group>::Field>::one();
            let mut sum = <<C::Group as Group>::Field>::one();

            let bits = (n.to_be_bytes().len() as u32) * 8;
            for i in (0..(bits - n.leading_zeros() - 1)).rev() {
                sum = sum + sum;
                if n & (1 << i) != 0 {
                    sum = sum + one;
                }
            }
            Self::new(sum)
        }
    }
}
