//! Helper functions for testing.

use rand_core::{CryptoRng, RngCore};

use crate::{
    promise::{diffie_hellman_encrypt, MaskedShare},
    Ciphersuite, Element, Field, Group, Promise, SigningKey, VerifyingKey,
};

/// Helper function for randomly generating an element.
pub fn generate_element<C: Ciphersuite, R: RngCore + CryptoRng>(rng: &mut R) -> Element<C> {
    let scalar = <<C::Group as Group>::Field>::random(rng);
    <C::Group>::generator() * scalar
}

/// Key material and a freshly constructed promise, shared by most checks.
pub struct PromiseSetup<C: Ciphersuite> {
    /// The secret key being promised.
    pub secret: SigningKey<C>,
    /// The promiser's long-term key.
    pub promiser: SigningKey<C>,
    /// The promiser's long-term public key.
    pub promiser_key: VerifyingKey<C>,
    /// Each insurer's long-term private key, in index order.
    pub insurer_keys: Vec<SigningKey<C>>,
    /// Each insurer's public key, in index order.
    pub insurers: Vec<VerifyingKey<C>>,
    /// The constructed promise.
    pub promise: Promise<C>,
}

/// Draws fresh key material and constructs a promise with the given parameters.
pub fn promise_setup<C: Ciphersuite, R: RngCore + CryptoRng>(
    t: u16,
    r: u16,
    n: u16,
    rng: &mut R,
) -> PromiseSetup<C> {
    let secret = SigningKey::new(rng);
    let promiser = SigningKey::new(rng);
    let promiser_key = VerifyingKey::from(&promiser);
    let insurer_keys: Vec<SigningKey<C>> = (0..n).map(|_| SigningKey::new(rng)).collect();
    let insurers: Vec<VerifyingKey<C>> = insurer_keys.iter().map(VerifyingKey::from).collect();
    let promise =
        Promise::new(&secret, &promiser, t, r, &insurers, rng).expect("promise construction");

    PromiseSetup {
        secret,
        promiser,
        promiser_key,
        insurer_keys,
        insurers,
        promise,
    }
}

/// Overwrites the masked share at `index` the way a dishonest promiser would: with an
/// arbitrary scalar encrypted under the Diffie-Hellman key of the *last* insurer instead of
/// the share's rightful owner.
pub fn corrupt_share<C: Ciphersuite>(setup: &mut PromiseSetup<C>, index: u16) {
    let wrong = setup
        .insurer_keys
        .last()
        .expect("setup has at least one insurer");
    let diffie_key = VerifyingKey::from(wrong).to_element() * setup.promiser.to_scalar();
    let garbage =
        diffie_hellman_encrypt::<C>(wrong.to_scalar(), &diffie_key).expect("masking works");
    setup.promise.shares[index as usize].masked_share = MaskedShare::new(garbage);
}
