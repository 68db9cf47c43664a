//! Host-capability seams.
//!
//! The pool never touches a concrete blockchain, mempool, wallet, or
//! network type directly — it is generic over these traits instead, so
//! there is no hidden global/static state and no single "the blockchain"
//! object the state machine secretly depends on. A production node wires
//! concrete implementations in once, at the process entry point, and
//! hands the coordinator a `&mut` reference to itself.

use rusty_shared_types::{OutPoint, TxOutput};

use super::types::{Out, PoolTx};

/// Opaque identifier for a connected network peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

pub trait TimeSource {
    fn unix_time(&self) -> u64;
    fn unix_time_ms(&self) -> u64;
    fn adjusted_time(&self) -> u64 {
        self.unix_time()
    }
}

pub trait ChainView {
    /// Resolve the whole transaction referenced by `txid`, outputs and all.
    /// Used by `vin_associates_pubkey`, which must scan every output rather
    /// than a single one.
    fn lookup_tx(&self, txid: &[u8; 32]) -> Option<PoolTx>;
    fn tip_height(&self) -> u32;
    fn is_synced(&self) -> bool;
    /// Resolve a single previous output directly, without reconstructing the
    /// whole transaction. Used by the collateral validator.
    fn resolve_output(&self, outpoint: &OutPoint) -> Option<TxOutput>;
}

/// Stands in for the underlying script interpreter (out of scope per
/// §1): the pool needs to know whether a submitted `script_sig` is a valid
/// spend of `prev_pubkey` under the merged transaction's
/// `SIGHASH_ALL | SIGHASH_ANYONECANPAY` sighash, without implementing a
/// general script language itself.
pub trait ScriptVerifier {
    fn verify_input_signature(
        &self,
        merged: &PoolTx,
        input_index: usize,
        script_sig: &[u8],
        prev_pubkey: &[u8],
    ) -> bool;
}

pub trait MempoolView {
    /// Accept-check predicate. `Ok(())` means the transaction would be
    /// accepted; `Err` carries a host-specific rejection reason that the
    /// caller is free to log but must not leak to the wire beyond the
    /// generic `INVALID_TX`/`INVALID_COLLATERAL` codes.
    fn accept(&self, tx: &PoolTx) -> Result<(), String>;
}

pub trait WalletView {
    fn unlock_coin(&mut self, outpoint: &OutPoint);
    fn lock_coin(&mut self, outpoint: &OutPoint);
    fn relay(&mut self, tx: &PoolTx);
}

pub trait NetView {
    fn broadcast(&mut self, cmd: &'static str, payload: &[u8]);
    fn send(&mut self, peer: PeerId, cmd: &'static str, payload: &[u8]);
    fn connected_peers(&self) -> Vec<PeerId>;
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeClock {
        pub now_secs: Cell<u64>,
    }

    impl FakeClock {
        pub fn new(now_secs: u64) -> Self {
            FakeClock { now_secs: Cell::new(now_secs) }
        }

        pub fn advance(&self, secs: u64) {
            self.now_secs.set(self.now_secs.get() + secs);
        }

        pub fn advance_ms(&self, ms: u64) {
            self.advance(ms / 1000 + if ms % 1000 != 0 { 1 } else { 0 });
        }
    }

    impl TimeSource for FakeClock {
        fn unix_time(&self) -> u64 {
            self.now_secs.get()
        }
        fn unix_time_ms(&self) -> u64 {
            self.now_secs.get() * 1000
        }
    }

    #[derive(Default)]
    pub struct FakeChain {
        pub outputs: HashMap<(([u8; 32]), u32), TxOutput>,
        pub synced: bool,
        pub tip: u32,
    }

    impl FakeChain {
        pub fn new() -> Self {
            FakeChain { outputs: HashMap::new(), synced: true, tip: 100 }
        }

        pub fn insert_output(&mut self, outpoint: OutPoint, output: TxOutput) {
            self.outputs.insert((outpoint.txid, outpoint.vout), output);
        }
    }

    impl ChainView for FakeChain {
        /// Synthesizes a `PoolTx` out of every output this fake was told
        /// belongs to `txid`, in `vout` order. Gaps (a `vout` never
        /// inserted) become zero-value empty-script placeholders so later
        /// indices still land at the right offset.
        fn lookup_tx(&self, txid: &[u8; 32]) -> Option<PoolTx> {
            let mut by_vout: Vec<(u32, TxOutput)> =
                self.outputs.iter().filter(|((t, _), _)| t == txid).map(|((_, vout), out)| (*vout, out.clone())).collect();
            if by_vout.is_empty() {
                return None;
            }
            by_vout.sort_by_key(|(vout, _)| *vout);
            let highest_vout = by_vout.iter().map(|(vout, _)| *vout).max().unwrap();
            let mut outputs = vec![Out { value: 0, script_pubkey: vec![] }; highest_vout as usize + 1];
            for (vout, out) in by_vout {
                outputs[vout as usize] = Out { value: out.value, script_pubkey: out.script_pubkey };
            }
            Some(PoolTx { version: 1, inputs: vec![], outputs, lock_time: 0 })
        }
        fn tip_height(&self) -> u32 {
            self.tip
        }
        fn is_synced(&self) -> bool {
            self.synced
        }
        fn resolve_output(&self, outpoint: &OutPoint) -> Option<TxOutput> {
            self.outputs.get(&(outpoint.txid, outpoint.vout)).cloned()
        }
    }

    #[derive(Default)]
    pub struct FakeMempool {
        pub accept_result: Result<(), String>,
        pub accept_calls: Cell<u32>,
    }

    impl FakeMempool {
        pub fn accepting() -> Self {
            FakeMempool { accept_result: Ok(()), accept_calls: Cell::new(0) }
        }

        pub fn rejecting(reason: &str) -> Self {
            FakeMempool { accept_result: Err(reason.to_string()), accept_calls: Cell::new(0) }
        }
    }

    impl MempoolView for FakeMempool {
        fn accept(&self, _tx: &PoolTx) -> Result<(), String> {
            self.accept_calls.set(self.accept_calls.get() + 1);
            self.accept_result.clone()
        }
    }

    #[derive(Default)]
    pub struct FakeWallet {
        pub locked: Vec<OutPoint>,
        pub relayed: Vec<[u8; 32]>,
    }

    impl WalletView for FakeWallet {
        fn unlock_coin(&mut self, outpoint: &OutPoint) {
            self.locked.retain(|o| o != outpoint);
        }
        fn lock_coin(&mut self, outpoint: &OutPoint) {
            self.locked.push(outpoint.clone());
        }
        fn relay(&mut self, tx: &PoolTx) {
            self.relayed.push(tx.txid());
        }
    }

    #[derive(Default)]
    pub struct FakeNet {
        pub broadcasts: Vec<(&'static str, Vec<u8>)>,
        pub sends: Vec<(PeerId, &'static str, Vec<u8>)>,
        pub peers: Vec<PeerId>,
    }

    impl NetView for FakeNet {
        fn broadcast(&mut self, cmd: &'static str, payload: &[u8]) {
            self.broadcasts.push((cmd, payload.to_vec()));
        }
        fn send(&mut self, peer: PeerId, cmd: &'static str, payload: &[u8]) {
            self.sends.push((peer, cmd, payload.to_vec()));
        }
        fn connected_peers(&self) -> Vec<PeerId> {
            self.peers.clone()
        }
    }

    /// Treats `script_sig` as a raw Ed25519 signature over this input's
    /// `SIGHASH_ALL | SIGHASH_ANYONECANPAY` digest and `prev_pubkey` as a
    /// raw Ed25519 public key — the simplest possible stand-in for a
    /// script interpreter, matching how this codebase's own
    /// standard-script checks are stubbed.
    pub struct FakeScriptVerifier;

    impl ScriptVerifier for FakeScriptVerifier {
        fn verify_input_signature(
            &self,
            merged: &PoolTx,
            input_index: usize,
            script_sig: &[u8],
            prev_pubkey: &[u8],
        ) -> bool {
            use ed25519_dalek::{PublicKey, Signature, Verifier};
            let pubkey = match PublicKey::from_bytes(prev_pubkey) {
                Ok(k) => k,
                Err(_) => return false,
            };
            let sig = match Signature::from_bytes(script_sig) {
                Ok(s) => s,
                Err(_) => return false,
            };
            pubkey.verify(&merged.anyonecanpay_all_digest(input_index), &sig).is_ok()
        }
    }
}
