//! Remembers signed final-transaction announcements so re-gossip of a
//! completed round is idempotent.

use std::collections::HashMap;

use ed25519_dalek::Signature;
use log::debug;

use super::types::PoolTx;

#[derive(Debug, Clone)]
pub struct BroadcastJournalEntry {
    pub tx: PoolTx,
    pub coordinator_vin: [u8; 32],
    pub sig: Signature,
    pub sig_time: u64,
}

/// The preimage a coordinator signs to authorize a broadcast journal entry:
/// `H(merged) || sig_time`, hex/decimal-joined the same way `QueueAnnouncement`
/// joins its own fields. Committing `sig_time` into the signature (rather
/// than signing the txid alone) means the authorization can't be replayed
/// with a different timestamp.
pub fn sign_preimage(txid: &[u8; 32], sig_time: u64) -> Vec<u8> {
    format!("{}{}", hex::encode(txid), sig_time).into_bytes()
}

#[derive(Default)]
pub struct BroadcastJournal {
    entries: HashMap<[u8; 32], BroadcastJournalEntry>,
}

impl BroadcastJournal {
    pub fn new() -> Self {
        BroadcastJournal { entries: HashMap::new() }
    }

    /// Inserts the entry keyed by `H(tx)` unless one is already present.
    /// Returns true iff a new entry was inserted.
    pub fn insert_if_absent(&mut self, entry: BroadcastJournalEntry) -> bool {
        let key = entry.tx.txid();
        if self.entries.contains_key(&key) {
            debug!("broadcast journal: duplicate entry for {:?}, ignoring", key);
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    pub fn get(&self, txid: &[u8; 32]) -> Option<&BroadcastJournalEntry> {
        self.entries.get(txid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_crypto::keypair::RustyKeyPair;

    fn sample_entry() -> BroadcastJournalEntry {
        let keypair = RustyKeyPair::generate();
        let tx = PoolTx { version: 1, inputs: vec![], outputs: vec![], lock_time: 0 };
        let sig = keypair.sign(&tx.txid());
        BroadcastJournalEntry { tx, coordinator_vin: [1u8; 32], sig, sig_time: 42 }
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut journal = BroadcastJournal::new();
        assert!(journal.insert_if_absent(sample_entry()));
        assert!(!journal.insert_if_absent(sample_entry()));
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn inserted_entry_is_retrievable_by_txid() {
        let mut journal = BroadcastJournal::new();
        let entry = sample_entry();
        let txid = entry.tx.txid();
        journal.insert_if_absent(entry);
        assert!(journal.get(&txid).is_some());
    }

    #[test]
    fn sign_preimage_commits_to_both_txid_and_sig_time() {
        let txid = [7u8; 32];
        let a = sign_preimage(&txid, 100);
        let b = sign_preimage(&txid, 200);
        assert_ne!(a, b, "two different sig_time values must not sign the same preimage");
        assert!(a.starts_with(hex::encode(txid).as_bytes()));
    }
}
