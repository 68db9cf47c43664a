//! Signed coordinator-availability beacon.

use ed25519_dalek::{PublicKey, Signature};
use rusty_crypto::keypair::RustyKeyPair;

use super::host::NetView;
use super::signer;
use super::types::{Denom, In};
use super::wire;

/// `{collateral_vin, denom, timestamp, ready, sig}`. Broadcast via the
/// `dsq` wire command; expires `QUEUE_ANNOUNCE_TTL` seconds after `time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueAnnouncement {
    pub vin: In,
    pub denom: Denom,
    pub time: u64,
    pub ready: bool,
    pub sig: Option<Signature>,
}

impl QueueAnnouncement {
    pub fn new(vin: In, denom: Denom, time: u64, ready: bool) -> Self {
        QueueAnnouncement { vin, denom, time, ready, sig: None }
    }

    /// Serializes `vin || denom || time || ready` as UTF-8 decimal-joined
    /// fields. This exact format is wire-compatible and must not change.
    fn preimage(&self) -> Vec<u8> {
        let vin_str = format!("{}:{}", hex::encode(self.vin.prev_txid), self.vin.prev_index);
        format!("{}{}{}{}", vin_str, self.denom.0, self.time, self.ready as u8).into_bytes()
    }

    pub fn sign(&mut self, priv_key: &RustyKeyPair) {
        self.sig = Some(signer::sign(priv_key, &self.preimage()));
    }

    pub fn verify(&self, pub_key: &PublicKey) -> bool {
        match &self.sig {
            Some(sig) => signer::verify(pub_key, sig, &self.preimage()),
            None => false,
        }
    }

    pub fn is_expired(&self, now: u64, ttl_secs: u64) -> bool {
        now.saturating_sub(self.time) > ttl_secs
    }

    pub fn relay(&self, net: &mut impl NetView) {
        let payload = self.preimage();
        net.broadcast(wire::CMD_DSQ, &payload);
    }
}

#[cfg(test)]
mod tests {
    use super::super::host::test_support::FakeNet;
    use super::*;

    fn sample_in() -> In {
        In { prev_txid: [3u8; 32], prev_index: 0, sequence: 0, script_sig: vec![], prev_pubkey: vec![] }
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let keypair = RustyKeyPair::generate();
        let mut announcement = QueueAnnouncement::new(sample_in(), Denom(1000), 1_000, true);
        announcement.sign(&keypair);
        assert!(announcement.verify(&keypair.public_key()));
    }

    #[test]
    fn unsigned_announcement_fails_verification() {
        let keypair = RustyKeyPair::generate();
        let announcement = QueueAnnouncement::new(sample_in(), Denom(1000), 1_000, true);
        assert!(!announcement.verify(&keypair.public_key()));
    }

    #[test]
    fn expiry_is_relative_to_announcement_time() {
        let announcement = QueueAnnouncement::new(sample_in(), Denom(1000), 1_000, true);
        assert!(!announcement.is_expired(1_020, 30));
        assert!(announcement.is_expired(1_031, 30));
    }

    #[test]
    fn relay_broadcasts_the_dsq_command() {
        let mut net = FakeNet::default();
        let announcement = QueueAnnouncement::new(sample_in(), Denom(1000), 1_000, true);
        announcement.relay(&mut net);
        assert_eq!(net.broadcasts.len(), 1);
        assert_eq!(net.broadcasts[0].0, "dsq");
    }
}
