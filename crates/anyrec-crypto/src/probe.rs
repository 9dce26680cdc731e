//! Decryption probing: try every candidate key under every cipher mode
//!
//! The artifact's exact scheme is unknown, so the prober walks a small fixed
//! trial space: candidates in list order, modes in [`MODE_ORDER`], stopping
//! at the first plausible plaintext. The walk is sequential and
//! deterministic on purpose: which candidate wins is observable behavior,
//! and no (candidate, mode) pair is ever tried twice.

use std::fmt;

use aes::Aes256;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};

use crate::error::ProbeError;
use crate::keys::SymmetricKey;
use crate::validate::{validate, Verdict};
use crate::KEY_SIZE;

type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// AES block size, which is also the CFB IV size
const BLOCK_SIZE: usize = 16;

/// One of the fixed decryption strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    /// AES-256-CFB with an all-zero IV. Requires a 32-byte key; never fails
    /// at the cipher level, so its output is gated by the validator.
    CfbZeroIv,
    /// The key's native AEAD container (GCM, embedded nonce). Attempted for
    /// any key length; trusted without re-validation once the tag checks out.
    DirectAead,
}

/// Trial order within each candidate.
pub const MODE_ORDER: [CipherMode; 2] = [CipherMode::CfbZeroIv, CipherMode::DirectAead];

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CfbZeroIv => f.write_str("CFB, zero IV"),
            Self::DirectAead => f.write_str("direct AEAD"),
        }
    }
}

/// Record of one rejected (candidate, mode) attempt.
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Zero-based index into the candidate list
    pub candidate: usize,
    pub mode: CipherMode,
    pub reason: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {} ({}): {}", self.candidate + 1, self.mode, self.reason)
    }
}

/// Probe the ciphertext with every candidate key and cipher mode.
///
/// Returns the first accepted plaintext; no later pair is evaluated once one
/// attempt succeeds. With no candidates, returns [`ProbeError::Exhausted`]
/// with zero recorded rejections without touching any cipher.
pub fn attempt(ciphertext: &[u8], candidates: &[SymmetricKey]) -> Result<Vec<u8>, ProbeError> {
    attempt_with(ciphertext, candidates, validate)
}

/// Probe loop with an injectable validator, the seam the short-circuit
/// tests instrument.
fn attempt_with<F>(
    ciphertext: &[u8],
    candidates: &[SymmetricKey],
    mut validate: F,
) -> Result<Vec<u8>, ProbeError>
where
    F: FnMut(&[u8]) -> Verdict,
{
    let mut rejections = Vec::new();

    for (candidate, key) in candidates.iter().enumerate() {
        for mode in MODE_ORDER {
            match try_mode(ciphertext, key, mode, &mut validate) {
                Ok(plaintext) => {
                    tracing::debug!(candidate, %mode, "decryption accepted");
                    return Ok(plaintext);
                }
                Err(reason) => {
                    tracing::debug!(candidate, %mode, %reason, "attempt rejected");
                    rejections.push(Rejection { candidate, mode, reason });
                }
            }
        }
    }

    Err(ProbeError::Exhausted { rejections })
}

/// One (candidate, mode) attempt; the error is the recorded rejection reason.
fn try_mode<F>(
    ciphertext: &[u8],
    key: &SymmetricKey,
    mode: CipherMode,
    validate: &mut F,
) -> Result<Vec<u8>, String>
where
    F: FnMut(&[u8]) -> Verdict,
{
    match mode {
        CipherMode::CfbZeroIv => {
            let Ok(key_bytes) = <&[u8; KEY_SIZE]>::try_from(key.as_bytes()) else {
                return Err(format!(
                    "key is {} bytes, CFB needs exactly {}",
                    key.as_bytes().len(),
                    KEY_SIZE
                ));
            };
            let plaintext = decrypt_cfb_zero_iv(key_bytes, ciphertext);
            match validate(&plaintext) {
                Verdict::Accepted => Ok(plaintext),
                Verdict::Rejected(reason) => Err(reason.to_string()),
            }
        }
        CipherMode::DirectAead => key.decrypt(ciphertext).map_err(|err| err.to_string()),
    }
}

/// CFB stream decryption under a zero IV. Output length equals input length.
fn decrypt_cfb_zero_iv(key: &[u8; KEY_SIZE], ciphertext: &[u8]) -> Vec<u8> {
    let iv = [0u8; BLOCK_SIZE];
    let mut buf = ciphertext.to_vec();
    Aes256CfbDec::new(key.into(), (&iv).into()).decrypt(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_candidates;
    use crate::mnemonic::TEST_PHRASE;
    use crate::validate::RejectReason;
    use proptest::prelude::*;

    type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;

    /// 10-byte protobuf-shaped payload: `field 1, length-delimited, "recovery"`
    const PAYLOAD: &[u8] = b"\x0a\x08recovery";

    fn cfb_encrypt(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Vec<u8> {
        let iv = [0u8; BLOCK_SIZE];
        let mut buf = plaintext.to_vec();
        Aes256CfbEnc::new(key.into(), (&iv).into()).encrypt(&mut buf);
        buf
    }

    /// First keystream byte of CFB under a zero IV: AES(key, 0-block)[0]
    fn first_keystream_byte(key: &[u8; KEY_SIZE]) -> u8 {
        use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};

        let cipher = Aes256::new_from_slice(key).expect("32-byte AES key");
        let mut block = GenericArray::from([0u8; BLOCK_SIZE]);
        cipher.encrypt_block(&mut block);
        block[0]
    }

    #[test]
    fn test_cfb_roundtrip() {
        let key_bytes = [0x11u8; KEY_SIZE];
        let key = SymmetricKey::from_bytes(key_bytes);
        let ciphertext = cfb_encrypt(&key_bytes, PAYLOAD);

        let recovered = attempt(&ciphertext, std::slice::from_ref(&key)).unwrap();
        assert_eq!(recovered, PAYLOAD);
    }

    #[test]
    fn test_empty_candidate_list_is_exhausted_with_no_reasons() {
        let ProbeError::Exhausted { rejections } = attempt(b"anything", &[]).unwrap_err();
        assert!(rejections.is_empty(), "nothing was attempted, nothing was rejected");
    }

    #[test]
    fn test_exhaustion_records_every_attempt_in_order() {
        let keys = [
            SymmetricKey::from_bytes([1u8; KEY_SIZE]),
            SymmetricKey::from_bytes([2u8; KEY_SIZE]),
        ];
        // 4 bytes: too short for the AEAD container, and the injected
        // validator rejects every CFB attempt
        let err = attempt_with(&[0u8; 4], &keys, |_| {
            Verdict::Rejected(RejectReason::RandomBytes)
        })
        .unwrap_err();

        let ProbeError::Exhausted { rejections } = err;
        assert_eq!(rejections.len(), 4, "two candidates x two modes");

        let order: Vec<(usize, CipherMode)> =
            rejections.iter().map(|r| (r.candidate, r.mode)).collect();
        assert_eq!(
            order,
            vec![
                (0, CipherMode::CfbZeroIv),
                (0, CipherMode::DirectAead),
                (1, CipherMode::CfbZeroIv),
                (1, CipherMode::DirectAead),
            ],
            "candidate-outer, mode-inner, fixed order"
        );
    }

    #[test]
    fn test_short_circuit_after_first_acceptance() {
        let key_bytes = [0x33u8; KEY_SIZE];
        let candidates = [
            SymmetricKey::from_bytes(key_bytes),
            SymmetricKey::from_bytes([0x44u8; KEY_SIZE]),
        ];
        let ciphertext = cfb_encrypt(&key_bytes, PAYLOAD);

        let mut calls = 0;
        let recovered = attempt_with(&ciphertext, &candidates, |data| {
            calls += 1;
            validate(data)
        })
        .unwrap();

        assert_eq!(recovered, PAYLOAD);
        assert_eq!(calls, 1, "no attempt may run after the first acceptance");
    }

    #[test]
    fn test_cfb_skipped_for_wrong_key_length_but_direct_still_tried() {
        let key = SymmetricKey::from_bytes(vec![9u8; 31]);

        let ProbeError::Exhausted { rejections } =
            attempt(&[0u8; 64], std::slice::from_ref(&key)).unwrap_err();

        assert_eq!(rejections.len(), 2);
        assert_eq!(rejections[0].mode, CipherMode::CfbZeroIv);
        assert!(
            rejections[0].reason.contains("needs exactly 32"),
            "CFB ineligibility must name the length requirement: {}",
            rejections[0].reason
        );
        assert_eq!(
            rejections[1].mode,
            CipherMode::DirectAead,
            "direct mode is attempted regardless of key length"
        );
    }

    #[test]
    fn test_direct_mode_output_is_trusted_without_validation() {
        // a payload the validator would reject outright (wire type 7)
        let payload = [0xffu8; 20];
        let key_bytes = [0x55u8; KEY_SIZE];
        let key = SymmetricKey::from_bytes(key_bytes);

        // force the preceding CFB attempt to be rejected deterministically:
        // pick the GCM nonce so the first CFB-decrypted byte carries wire
        // type 7
        let mut nonce = [0x99u8; crate::NONCE_SIZE];
        nonce[0] = first_keystream_byte(&key_bytes) ^ 0x07;
        let ciphertext = encrypt_with_nonce(&key_bytes, &nonce, &payload);

        let recovered = attempt(&ciphertext, std::slice::from_ref(&key)).unwrap();
        assert_eq!(
            recovered,
            payload.to_vec(),
            "authenticated direct decryption is returned as-is"
        );
    }

    /// GCM-encrypt into the direct container with a chosen nonce.
    fn encrypt_with_nonce(
        key: &[u8; KEY_SIZE],
        nonce: &[u8; crate::NONCE_SIZE],
        plaintext: &[u8],
    ) -> Vec<u8> {
        use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};

        let cipher = Aes256Gcm::new_from_slice(key).unwrap();
        let ct = cipher.encrypt(Nonce::from_slice(nonce), plaintext).unwrap();

        let mut blob = nonce.to_vec();
        blob.extend_from_slice(&ct);
        blob
    }

    #[test]
    fn test_rejection_reasons_surface_validator_verdicts() {
        // the injected validator rejects the CFB output; the direct attempt
        // fails at the cipher level (8 bytes is shorter than the container)
        let key = SymmetricKey::from_bytes([0x66u8; KEY_SIZE]);
        let err = attempt_with(&[0u8; 8], std::slice::from_ref(&key), |_| {
            Verdict::Rejected(RejectReason::FieldNumber)
        })
        .unwrap_err();

        let ProbeError::Exhausted { rejections } = err;
        assert_eq!(rejections[0].reason, "invalid protobuf field number: 0");
        assert!(
            rejections[1].reason.contains("too short"),
            "direct-mode cipher failure is recorded verbatim: {}",
            rejections[1].reason
        );
    }

    #[test]
    fn test_end_to_end_recovery_with_the_identity_candidate() {
        let candidates = derive_candidates(TEST_PHRASE).unwrap();
        assert_eq!(candidates.len(), 2);

        let identity_key: &[u8; KEY_SIZE] = candidates[0].as_bytes().try_into().unwrap();
        let ciphertext = cfb_encrypt(identity_key, PAYLOAD);

        let mut calls = 0;
        let recovered = attempt_with(&ciphertext, &candidates, |data| {
            calls += 1;
            validate(data)
        })
        .unwrap();

        assert_eq!(recovered, PAYLOAD);
        assert_eq!(
            calls, 1,
            "the identity candidate wins on its first attempt; the master candidate is never tried"
        );
    }

    #[test]
    fn test_rejection_display_is_one_based() {
        let rejection = Rejection {
            candidate: 0,
            mode: CipherMode::CfbZeroIv,
            reason: "empty data".to_string(),
        };
        assert_eq!(rejection.to_string(), "key 1 (CFB, zero IV): empty data");
    }

    proptest! {
        #[test]
        fn cfb_roundtrip_recovers_validating_payloads(
            key_bytes in proptest::array::uniform32(any::<u8>()),
            body in proptest::collection::vec(0x20u8..=0x7e, 0..64),
        ) {
            // leading tag byte: field 1, length-delimited — always validates
            let mut payload = vec![0x0a];
            payload.extend_from_slice(&body);

            let ciphertext = cfb_encrypt(&key_bytes, &payload);
            let key = SymmetricKey::from_bytes(key_bytes);

            let recovered = attempt(&ciphertext, std::slice::from_ref(&key))
                .expect("a validating payload must round-trip");
            prop_assert_eq!(recovered, payload);
        }
    }
}
