//! Long-term verifying (public) keys.

use core::fmt::{self, Debug};

use crate::{serialization::SerializableElement, Ciphersuite, Element, Error};

/// A public key over a [`Ciphersuite::Group`].
///
/// Identifies the promiser of a promise and each insurer; also the ring members of
/// endorsement and blame signatures.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct VerifyingKey<C>
where
    C: Ciphersuite,
{
    pub(crate) element: SerializableElement<C>,
}

impl<C> VerifyingKey<C>
where
    C: Ciphersuite,
{
    /// Create a new VerifyingKey from the given element.
    pub(crate) fn new(element: Element<C>) -> Self {
        Self {
            element: SerializableElement(element),
        }
    }

    /// Return the underlying element.
    pub(crate) fn to_element(self) -> Element<C> {
        self.element.0
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<VerifyingKey<C>, Error> {
        Ok(Self::new(SerializableElement::<C>::deserialize(bytes)?.0))
    }

    /// Serialize `VerifyingKey` to bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.element.serialize()
    }
}

impl<C> Debug for VerifyingKey<C>
where
    C: Ciphersuite,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("VerifyingKey")
            .field(
                &self
                    .serialize()
                    .map(hex::encode)
                    .unwrap_or("<invalid>".to_string()),
            )
            .finish()
    }
}
