//! Tracking endorsements, blames and revealed shares for one promise.

use crate::{
    polynomial::{SecretShare, ShareSet},
    promise::{BlameProof, Promise, PromiseSignature},
    Ciphersuite, Error, SigningKey, VerifyingKey,
};

/// Mutable companion to an immutable [`Promise`]: collects endorsement signatures, blame
/// proofs, and revealed shares, and decides certification.
///
/// Any party wishing to track a promise keeps one state per promise. Insertion does not verify
/// the inserted artifact beyond index bounds; callers verify before inserting, and
/// [`PromiseState::certified`] re-verifies everything defensively anyway. Single-writer by
/// contract; wrap in a mutex to share between writers.
#[derive(Clone)]
pub struct PromiseState<C: Ciphersuite> {
    promise: Promise<C>,
    shares: ShareSet<C>,
    signatures: Vec<Option<PromiseSignature<C>>>,
    blames: Vec<Option<BlameProof<C>>>,
}

impl<C> PromiseState<C>
where
    C: Ciphersuite,
{
    /// Creates a state tracking `promise`, with empty per-index slots for signatures and
    /// blames and an empty share set.
    pub fn new(promise: Promise<C>) -> Self {
        let n = promise.n() as usize;
        Self {
            shares: ShareSet::empty(*promise.t(), promise.n()),
            signatures: vec![None; n],
            blames: vec![None; n],
            promise,
        }
    }

    /// The promise being tracked.
    pub fn promise(&self) -> &Promise<C> {
        &self.promise
    }

    /// Records the endorsement signature of insurer `index`, replacing any previous one.
    ///
    /// Verify with [`Promise::verify_signature`] before inserting; an invalid signature is not
    /// rejected here but will never count towards certification.
    pub fn add_signature(
        &mut self,
        index: u16,
        signature: PromiseSignature<C>,
    ) -> Result<(), Error> {
        *self
            .signatures
            .get_mut(index as usize)
            .ok_or(Error::UnknownIndex)? = Some(signature);
        Ok(())
    }

    /// Records a blame proof against the share at `index`, replacing any previous one.
    ///
    /// Verify with [`Promise::verify_blame`] before inserting; an invalid or slanderous blame
    /// is not rejected here but will never repudiate the promise.
    pub fn add_blame_proof(&mut self, index: u16, proof: BlameProof<C>) -> Result<(), Error> {
        *self
            .blames
            .get_mut(index as usize)
            .ok_or(Error::UnknownIndex)? = Some(proof);
        Ok(())
    }

    /// Records the share revealed by insurer `index` for later reconstruction.
    ///
    /// Verify with [`Promise::verify_revealed_share`] before inserting; reconstruction does not
    /// check shares and interpolating a bad one yields an unrelated secret.
    pub fn add_revealed_share(&mut self, index: u16, share: SecretShare<C>) -> Result<(), Error> {
        self.shares.insert(index, share)
    }

    /// Recomputes the promised secret from the revealed shares collected so far.
    pub fn reconstruct_secret(&self) -> Result<SigningKey<C>, Error> {
        self.shares.reconstruct()
    }

    /// Decides whether the promise is certified.
    ///
    /// Certification requires the promise itself to be well formed for `promiser_key`, no
    /// currently-valid blame proof in any slot, and at least `r` slots holding signatures that
    /// currently verify. A single valid blame is terminal and reported as
    /// [`Error::PromiseRepudiated`]; slots holding invalid signatures or invalid blames are
    /// skipped, counting neither for nor against.
    pub fn certified(&self, promiser_key: &VerifyingKey<C>) -> Result<(), Error> {
        self.promise.verify_promise(promiser_key)?;

        for (index, blame) in self.blames.iter().enumerate() {
            if let Some(proof) = blame {
                if self.promise.verify_blame(index as u16, proof).is_ok() {
                    return Err(Error::PromiseRepudiated);
                }
            }
        }

        let valid = self
            .signatures
            .iter()
            .enumerate()
            .filter(|(index, signature)| match signature {
                Some(signature) => self
                    .promise
                    .verify_signature(*index as u16, signature)
                    .is_ok(),
                None => false,
            })
            .count();
        if valid < *self.promise.r() as usize {
            return Err(Error::InsufficientSignatures);
        }
        Ok(())
    }
}
