//! Failure surface: fatal derivation errors vs exhausted probing
//!
//! Two classes, deliberately separate: a [`DerivationError`] stops the whole
//! recovery run (no keys exist to try), while every per-attempt failure is
//! recorded and probing continues until [`ProbeError::Exhausted`].

use thiserror::Error;

use crate::probe::Rejection;

/// The seed phrase (or a derivation path) is unusable, so no candidate keys
/// can be produced at all.
#[derive(Debug, Error)]
pub enum DerivationError {
    #[error("invalid BIP-39 mnemonic: {0}")]
    Mnemonic(#[from] bip39::Error),

    #[error("invalid derivation path {path:?}: {reason}")]
    Path { path: String, reason: &'static str },
}

/// Every candidate × mode combination was tried and rejected.
///
/// Carries the ordered per-attempt rejection records so callers can surface
/// why each attempt failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("all decryption attempts failed ({} rejected)", .rejections.len())]
    Exhausted { rejections: Vec<Rejection> },
}
