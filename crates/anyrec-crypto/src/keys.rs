//! Candidate symmetric keys and their native AEAD container format
//!
//! Direct-mode artifact layout (binary):
//! ```text
//! [12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```

use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use zeroize::Zeroize;

use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// A candidate symmetric key, nominally 256-bit. Zeroized on drop.
///
/// The raw length is not enforced by the type: derivation always yields
/// 32 bytes, but probing checks eligibility per cipher mode, so malformed
/// lengths must be representable.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decrypt a direct-mode artifact: AES-256-GCM with the nonce embedded
    /// in the leading 12 bytes.
    ///
    /// Fails on short input, a non-256-bit key, or tag mismatch. Cipher
    /// success authenticates the plaintext, so callers need no further
    /// validation.
    pub fn decrypt(&self, ciphertext: &[u8]) -> anyhow::Result<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            anyhow::bail!(
                "ciphertext too short for direct decryption: {} bytes (minimum {})",
                ciphertext.len(),
                NONCE_SIZE + TAG_SIZE
            );
        }

        let cipher = Aes256Gcm::new_from_slice(&self.bytes).map_err(|_| {
            anyhow::anyhow!(
                "invalid key length for AES-256-GCM: {} bytes (expected {})",
                self.bytes.len(),
                KEY_SIZE
            )
        })?;

        let (nonce_bytes, ciphertext) = ciphertext.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| anyhow::anyhow!("AES-256-GCM decryption failed: wrong key or corrupted data"))
    }

    /// Encrypt into the direct-mode container with a random nonce.
    ///
    /// Output: `[12-byte nonce][ciphertext + 16-byte tag]`
    pub fn encrypt(&self, plaintext: &[u8]) -> anyhow::Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(&self.bytes).map_err(|_| {
            anyhow::anyhow!(
                "invalid key length for AES-256-GCM: {} bytes (expected {})",
                self.bytes.len(),
                KEY_SIZE
            )
        })?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| anyhow::anyhow!("AES-256-GCM encryption failed: {e}"))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
