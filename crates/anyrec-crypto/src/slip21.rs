//! SLIP-0021 hierarchical symmetric key derivation
//!
//! Node tree keyed by HMAC-SHA512: the master node is
//! `HMAC-SHA512(key = "Symmetric key seed", msg = ikm)`, each child is
//! `HMAC-SHA512(key = parent[0..32], msg = 0x00 || label)`, and the
//! symmetric key of a node is its right half. Path labels are the
//! `/`-separated segments after the leading `m`.

use zeroize::Zeroize;

use crate::error::DerivationError;
use crate::keys::SymmetricKey;
use crate::mnemonic::hmac_sha512;

/// HMAC key of the SLIP-0021 master node
const MASTER_NODE_KEY: &[u8] = b"Symmetric key seed";

/// Derive the symmetric key at `path` from input key material.
///
/// `path` must be rooted at `m`; `"m"` alone addresses the master node.
/// Deterministic: same ikm and path always yield the same key.
pub fn derive_symmetric_key(ikm: &[u8], path: &str) -> Result<SymmetricKey, DerivationError> {
    let mut labels = path.split('/');
    if labels.next() != Some("m") {
        return Err(DerivationError::Path {
            path: path.to_string(),
            reason: "must be rooted at \"m\"",
        });
    }

    let mut node = hmac_sha512(MASTER_NODE_KEY, &[ikm]);
    for label in labels {
        if label.is_empty() {
            node.zeroize();
            return Err(DerivationError::Path {
                path: path.to_string(),
                reason: "empty path label",
            });
        }
        let next = hmac_sha512(&node[..32], &[[0u8].as_slice(), label.as_bytes()]);
        node.zeroize();
        node = next;
    }

    let key = SymmetricKey::from_bytes(&node[32..]);
    node.zeroize();
    Ok(key)
}
