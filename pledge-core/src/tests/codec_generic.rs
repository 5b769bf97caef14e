//! Ciphersuite-generic checks for the length-prefixed wire codec.
#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use rand_core::{CryptoRng, RngCore};

use crate::{
    tests::helpers::{corrupt_share, promise_setup},
    BlameProof, Ciphersuite, Error, Promise, PromiseSignature,
};

/// Test encoding and decoding a promise signature, through buffers and streams.
pub fn check_signature_codec<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    let signature = promise.sign(1, &setup.insurer_keys[1], &mut rng).unwrap();
    let encoded = signature.serialize();
    assert_eq!(encoded.len(), signature.serialized_size());

    let decoded = PromiseSignature::<C>::deserialize(&encoded).unwrap();
    assert_eq!(decoded, signature);
    assert!(promise.verify_signature(1, &decoded).is_ok());

    // Stream round-trip reports the same byte counts
    let mut buf = Vec::new();
    let written = signature.serialize_into(&mut buf).unwrap();
    assert_eq!(written, encoded.len());
    let (streamed, read) = PromiseSignature::<C>::deserialize_from(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(read, written);
    assert_eq!(streamed, signature);

    // Short input is an error, never a partial decode
    assert_eq!(
        PromiseSignature::<C>::deserialize(&encoded[..encoded.len() - 1]).unwrap_err(),
        Error::BufferTooSmall
    );
    assert_eq!(
        PromiseSignature::<C>::deserialize(&[]).unwrap_err(),
        Error::BufferTooSmall
    );
    let err = PromiseSignature::<C>::deserialize_from(&mut Cursor::new(&buf[..buf.len() - 1]))
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

/// Test encoding and decoding a blame proof, through buffers and streams.
pub fn check_blame_codec<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let mut setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    corrupt_share(&mut setup, 0);
    let promise = &setup.promise;

    let proof = promise.blame(0, &setup.insurer_keys[0], &mut rng).unwrap();
    let encoded = proof.serialize().unwrap();
    assert_eq!(encoded.len(), proof.serialized_size());

    let decoded = BlameProof::<C>::deserialize(&encoded).unwrap();
    assert_eq!(decoded, proof);
    assert!(promise.verify_blame(0, &decoded).is_ok());

    let mut buf = Vec::new();
    let written = proof.serialize_into(&mut buf).unwrap();
    assert_eq!(written, encoded.len());
    let (streamed, read) = BlameProof::<C>::deserialize_from(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(read, written);
    assert_eq!(streamed, proof);

    assert_eq!(
        BlameProof::<C>::deserialize(&encoded[..encoded.len() - 1]).unwrap_err(),
        Error::BufferTooSmall
    );
    let err =
        BlameProof::<C>::deserialize_from(&mut Cursor::new(&buf[..buf.len() - 1])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

/// Test encoding and decoding a whole promise, through buffers and streams.
pub fn check_promise_codec<C: Ciphersuite, R: RngCore + CryptoRng>(mut rng: R) {
    let setup = promise_setup::<C, R>(10, 15, 20, &mut rng);
    let promise = &setup.promise;

    let encoded = promise.serialize().unwrap();
    assert_eq!(encoded.len(), promise.serialized_size());

    let decoded = Promise::<C>::deserialize(&encoded).unwrap();
    assert_eq!(&decoded, promise);

    // Everything that verified against the original still verifies against the decoded copy
    assert!(decoded.verify_promise(&setup.promiser_key).is_ok());
    for (i, key_pair) in setup.insurer_keys.iter().enumerate() {
        assert!(decoded.verify_share(i as u16, key_pair).is_ok());
    }
    let signature = promise.sign(3, &setup.insurer_keys[3], &mut rng).unwrap();
    assert!(decoded.verify_signature(3, &signature).is_ok());

    let mut buf = Vec::new();
    let written = promise.serialize_into(&mut buf).unwrap();
    assert_eq!(written, encoded.len());
    let (streamed, read) = Promise::<C>::deserialize_from(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(read, written);
    assert_eq!(&streamed, promise);

    // Truncations and oversized participant counts are rejected
    assert_eq!(
        Promise::<C>::deserialize(&encoded[..encoded.len() - 1]).unwrap_err(),
        Error::BufferTooSmall
    );
    let mut oversized = encoded.clone();
    oversized[..4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert_eq!(
        Promise::<C>::deserialize(&oversized).unwrap_err(),
        Error::DeserializationError
    );
    let err =
        Promise::<C>::deserialize_from(&mut Cursor::new(&buf[..buf.len() - 1])).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}
