//! Seed phrase expansion: BIP-39 mnemonic → SLIP-0010 Ed25519 account roots
//!
//! The producing application derives two root private keys per account from
//! one phrase: the account *identity* key and the *master* key it descends
//! from. Either root may have been used to derive the symmetric key that
//! encrypted an artifact, so both are surfaced.

use bip39::Mnemonic;
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::error::DerivationError;

type HmacSha512 = Hmac<Sha512>;

/// SLIP-0010 master-node HMAC key for the Ed25519 curve
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Ed25519 nodes support hardened derivation only
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Well-formed 12-word phrase used by recovery tests across the crate
#[cfg(test)]
pub(crate) const TEST_PHRASE: &str =
    "mean bike country rigid place inherit fiber panel hire rapid board move";

pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> [u8; 64] {
    let Ok(mut mac) = HmacSha512::new_from_slice(key) else {
        unreachable!("HMAC-SHA512 accepts keys of any length");
    };
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// A SLIP-0010 node: private key half plus chain code.
struct Node {
    key: [u8; 32],
    chain: [u8; 32],
}

impl Node {
    fn from_seed(seed: &[u8]) -> Self {
        let mut digest = hmac_sha512(ED25519_SEED_KEY, &[seed]);
        let node = Self::split(&digest);
        digest.zeroize();
        node
    }

    /// Hardened child node; the hardened bit is applied here.
    fn child(&self, index: u32) -> Self {
        let hardened = (HARDENED_OFFSET | index).to_be_bytes();
        let mut digest = hmac_sha512(
            &self.chain,
            &[[0u8].as_slice(), self.key.as_slice(), hardened.as_slice()],
        );
        let node = Self::split(&digest);
        digest.zeroize();
        node
    }

    fn split(digest: &[u8; 64]) -> Self {
        let mut key = [0u8; 32];
        let mut chain = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain.copy_from_slice(&digest[32..]);
        Self { key, chain }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.key.zeroize();
        self.chain.zeroize();
    }
}

/// An account root private key (Ed25519).
pub struct RootKey {
    signing: SigningKey,
}

impl RootKey {
    fn from_node(node: &Node) -> Self {
        Self {
            signing: SigningKey::from_bytes(&node.key),
        }
    }

    /// Raw 64-byte encoding: secret seed followed by the public key, the
    /// layout the producing application feeds into symmetric derivation.
    pub fn to_raw_bytes(&self) -> [u8; 64] {
        self.signing.to_keypair_bytes()
    }
}

impl std::fmt::Debug for RootKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// The two independently usable roots expanded from one seed phrase.
#[derive(Debug)]
pub struct AccountKeys {
    /// Hardened child at the account index; tried first
    pub identity: RootKey,
    /// The SLIP-0010 master node itself; tried second
    pub master: RootKey,
}

/// Expand a seed phrase into its account roots at the given index.
///
/// A malformed phrase (unknown word, bad checksum, wrong length) is fatal:
/// no keys can be derived from it at all.
pub fn derive_account_keys(phrase: &str, account_index: u32) -> Result<AccountKeys, DerivationError> {
    let mnemonic: Mnemonic = phrase.trim().parse()?;
    let mut seed = mnemonic.to_seed("");

    let master_node = Node::from_seed(&seed);
    seed.zeroize();
    let identity_node = master_node.child(account_index);

    Ok(AccountKeys {
        identity: RootKey::from_node(&identity_node),
        master: RootKey::from_node(&master_node),
    })
}
