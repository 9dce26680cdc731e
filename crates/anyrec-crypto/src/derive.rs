//! Candidate key derivation: seed phrase → ordered symmetric key candidates

use zeroize::Zeroize;

use crate::error::DerivationError;
use crate::keys::SymmetricKey;
use crate::mnemonic::{derive_account_keys, RootKey};
use crate::slip21;
use crate::{ACCOUNT_INDEX, METADATA_KEY_PATH};

/// Derive the ordered candidate key list for a seed phrase.
///
/// Expands the phrase at the fixed account index, then derives the
/// metadata-path symmetric key from each root: identity first, master
/// second. The ordering defines probe order and must stay stable. A root
/// whose symmetric derivation fails is skipped, so the list may be shorter
/// than two; an empty list is a valid result meaning no candidates are
/// available.
pub fn derive_candidates(phrase: &str) -> Result<Vec<SymmetricKey>, DerivationError> {
    let account = derive_account_keys(phrase, ACCOUNT_INDEX)?;

    let mut candidates = Vec::with_capacity(2);
    for (root_name, root) in [("identity", &account.identity), ("master", &account.master)] {
        match metadata_key(root) {
            Ok(key) => candidates.push(key),
            Err(err) => {
                tracing::debug!(root = root_name, %err, "skipping root: symmetric derivation failed");
            }
        }
    }
    Ok(candidates)
}

/// Symmetric key at the fixed metadata path, from a root's raw bytes.
fn metadata_key(root: &RootKey) -> Result<SymmetricKey, DerivationError> {
    let mut raw = root.to_raw_bytes();
    let derived = slip21::derive_symmetric_key(&raw, METADATA_KEY_PATH);
    raw.zeroize();
    derived
}
