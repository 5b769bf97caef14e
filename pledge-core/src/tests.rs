//! Ciphersuite-generic test functions.
//!
//! Ciphersuite crates drive these checks from their own integration tests, so every suite
//! exercises the same protocol properties.

pub mod codec_generic;
pub mod helpers;
pub mod promise_generic;
pub mod state_generic;
