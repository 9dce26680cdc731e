//! anyrec-crypto: seed-phrase decryption recovery engine
//!
//! Recovers plaintext from an encrypted storage artifact when only the
//! account seed phrase is known: the exact key and cipher mode used by the
//! producing application are reconstructed by trial.
//!
//! Pipeline: seed phrase → account root keys → candidate symmetric keys →
//! decryption probing → plausibility sniff per attempt, first accepted
//! result wins.
//!
//! Key hierarchy:
//! ```text
//! BIP-39 seed (12-word phrase, empty passphrase)
//!   └── SLIP-0010 Ed25519 master node
//!         ├── identity root (hardened child at ACCOUNT_INDEX)
//!         │     └── candidate key 1 (SLIP-0021, METADATA_KEY_PATH)
//!         └── master root (the node itself)
//!               └── candidate key 2 (SLIP-0021, METADATA_KEY_PATH)
//! ```
//!
//! Probing is sequential and deterministic: candidates in list order, modes
//! in `MODE_ORDER`, stop at the first accepted plaintext. Which candidate
//! wins is observable behavior, so the engine never reorders or parallelizes
//! attempts.

pub mod derive;
pub mod error;
pub mod keys;
pub mod mnemonic;
pub mod probe;
pub mod slip21;
pub mod validate;

pub use derive::derive_candidates;
pub use error::{DerivationError, ProbeError};
pub use keys::SymmetricKey;
pub use mnemonic::{derive_account_keys, AccountKeys, RootKey};
pub use probe::{attempt, CipherMode, Rejection, MODE_ORDER};
pub use validate::{validate, RejectReason, Verdict};

/// Size of a candidate symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce prepended to direct-mode ciphertexts (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Account index used when expanding the seed phrase
pub const ACCOUNT_INDEX: u32 = 0;

/// SLIP-0021 path of the account metadata key, the node the producing
/// application encrypts its artifacts under
pub const METADATA_KEY_PATH: &str = "m/SLIP-0021/anytype/account/metadata";
