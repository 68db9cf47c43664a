//! Domain-separated message signing/verification, and the
//! vin-associated-with-pubkey check that proves a queue announcement comes
//! from a real masternode.
//!
//! The host cryptocurrency's signature primitive is Ed25519 (see
//! `rusty_crypto::keypair::RustyKeyPair`), which has no public-key-recovery
//! operation. `verify` therefore checks the signature directly against the
//! claimed public key rather than recovering a key from the signature and
//! comparing identifiers — an equivalent check for this protocol's
//! purposes, and one that stays inside the crypto primitives this codebase
//! already uses elsewhere.

use ed25519_dalek::{PublicKey, Signature, Verifier};
use rusty_crypto::keypair::RustyKeyPair;

use super::constants::SIGNING_DOMAIN_MAGIC;
use super::host::ChainView;
use super::types::In;

/// Hashes `domain_magic || msg` with blake3 before signing, so a signature
/// over this protocol's messages can never be replayed as a signature for
/// some other protocol's identically-shaped bytes.
fn domain_digest(msg: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SIGNING_DOMAIN_MAGIC);
    hasher.update(msg);
    hasher.finalize().into()
}

pub fn sign(priv_key: &RustyKeyPair, msg: &[u8]) -> Signature {
    priv_key.sign(&domain_digest(msg))
}

pub fn verify(pub_key: &PublicKey, sig: &Signature, msg: &[u8]) -> bool {
    pub_key.verify(&domain_digest(msg), sig).is_ok()
}

/// Returns true iff the transaction referenced by `vin.prev_txid` has *any*
/// output carrying exactly `masternode_collateral` and a P2PKH script paying
/// `pub_key` — scanning every output, not just the one at `vin.prev_index`,
/// since a masternode's collateral output need not sit at the index this
/// particular vin happens to reference.
pub fn vin_associates_pubkey(
    chain: &impl ChainView,
    vin: &In,
    pub_key: &PublicKey,
    masternode_collateral: u64,
) -> bool {
    let tx = match chain.lookup_tx(&vin.prev_txid) {
        Some(tx) => tx,
        None => return false,
    };
    let target_hash = p2pkh_hash(pub_key);
    tx.outputs
        .iter()
        .any(|output| output.value == masternode_collateral && extract_p2pkh_hash(&output.script_pubkey) == Some(target_hash))
}

fn extract_p2pkh_hash(script_pubkey: &[u8]) -> Option<[u8; 20]> {
    if script_pubkey.len() == 25
        && script_pubkey[0] == 0x76
        && script_pubkey[1] == 0xA9
        && script_pubkey[2] == 0x14
        && script_pubkey[23] == 0x88
        && script_pubkey[24] == 0xAC
    {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&script_pubkey[3..23]);
        Some(hash)
    } else {
        None
    }
}

fn p2pkh_hash(pub_key: &PublicKey) -> [u8; 20] {
    let digest = blake3::hash(pub_key.as_bytes());
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&digest.as_bytes()[..20]);
    hash
}
