//! Drives timeouts and periodic checks, relays messages, and owns the
//! single active `PoolSession`.
//!
//! Every piece of state the original implementation kept as a process-wide
//! singleton — the pool, the signer key, the announcement list, the
//! broadcast map, the "am I the active masternode" flag — lives here as a
//! field of one object instead, constructed once by the process entry
//! point and passed around by reference.

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rusty_crypto::keypair::RustyKeyPair;

use super::constants::PoolParams;
use super::error::{PoolError, PoolErrorKind};
use super::host::{ChainView, MempoolView, NetView, ScriptVerifier, TimeSource, WalletView};
use super::journal;
use super::journal::{BroadcastJournal, BroadcastJournalEntry};
use super::queue::QueueAnnouncement;
use super::session::PoolSession;
use super::signer;
use super::types::{Denom, Entry, SessionState, StatusSnapshot};
use super::wire;

pub struct Coordinator {
    pub params: PoolParams,
    pub keypair: RustyKeyPair,
    pub collateral_vin: super::types::In,

    session: Option<PoolSession>,
    next_session_id: u32,
    journal: BroadcastJournal,
    announcements: Vec<QueueAnnouncement>,
    last_success_block: Option<u32>,

    /// Cryptographically-secure, OS-seeded: drives the merge shuffle and
    /// session ids. Never shares a seed or stream with `policy_rng`.
    shuffle_rng: ChaCha20Rng,
    /// Coarser: drives the fee/punishment dice rolls only.
    policy_rng: ChaCha20Rng,

    ticks_since_start: u64,
}

impl Coordinator {
    pub fn new(params: PoolParams, keypair: RustyKeyPair, collateral_vin: super::types::In) -> Self {
        Coordinator {
            params,
            keypair,
            collateral_vin,
            session: None,
            next_session_id: 1,
            journal: BroadcastJournal::new(),
            announcements: Vec::new(),
            last_success_block: None,
            shuffle_rng: ChaCha20Rng::from_entropy(),
            policy_rng: ChaCha20Rng::from_entropy(),
            ticks_since_start: 0,
        }
    }

    pub fn status_snapshot(&self) -> Option<StatusSnapshot> {
        self.session.as_ref().map(|s| s.status_snapshot())
    }

    pub fn state(&self) -> SessionState {
        self.session.as_ref().map(|s| s.state()).unwrap_or(SessionState::Idle)
    }

    fn start_session(&mut self, denom: Denom, now: u64) -> &mut PoolSession {
        let id = self.next_session_id;
        self.next_session_id = self.next_session_id.wrapping_add(1);
        self.session = Some(PoolSession::new(id, denom, now, self.params));
        self.session.as_mut().unwrap()
    }

    /// `dsa`/`dsi` handling: admits a client's entry, starting a new
    /// session (`Idle → Queue`) on the first admission. `now_ms` stamps
    /// `last_transition_at`, which lives in the milliseconds domain
    /// exclusively — callers must pass `TimeSource::unix_time_ms()`, not
    /// `unix_time()`.
    pub fn handle_entry(
        &mut self,
        entry: Entry,
        now_ms: u64,
        chain: &impl ChainView,
        mempool: &impl MempoolView,
    ) -> Result<(), PoolError> {
        if self.session.as_ref().map(|s| s.state()) != Some(SessionState::Queue)
            && self.session.as_ref().map(|s| s.state()) != Some(SessionState::Accepting)
        {
            if self.session.as_ref().map(|s| s.state()).unwrap_or(SessionState::Idle) != SessionState::Idle {
                return Err(PoolErrorKind::ExistingTx.into());
            }
            let denom = entry.amount;
            let pool = self.start_session(denom, now_ms);
            pool.session.transition(SessionState::Queue, now_ms, "Pool started.");
        }
        let pool = self.session.as_mut().expect("session was just ensured to exist");
        pool.admit(entry, now_ms, chain, mempool)
    }

    /// One call per second from the outer timer thread (out of this
    /// module's scope per its own host capability): runs sync checks,
    /// periodic maintenance, and the pool's own timeout/quorum checks.
    pub fn tick(
        &mut self,
        time: &impl TimeSource,
        chain: &impl ChainView,
        mempool: &impl MempoolView,
        wallet: &mut impl WalletView,
        net: &mut impl NetView,
    ) {
        if !chain.is_synced() {
            debug!("coordinator: chain not synced, skipping tick");
            return;
        }
        self.ticks_since_start += 1;

        if self.ticks_since_start % self.params.masternode_ping_secs == 1 {
            debug!("coordinator: refreshing masternode status");
        }
        if self.ticks_since_start % 60 == 0 {
            self.prune_expired_announcements(time.unix_time());
        }

        let now_secs = time.unix_time();
        let now_ms = time.unix_time_ms();
        if let Some(pool) = self.session.as_mut() {
            pool.prune_expired_entries(now_secs, now_ms, wallet);
        }
        if let Some(pool) = self.session.as_mut() {
            pool.check_timeouts(now_ms, 0, &mut self.policy_rng, wallet);
        }
        self.check_quorum_with_anti_spam(now_secs, now_ms, chain, net);
    }

    /// `now_secs` stamps the `QueueAnnouncement` (its TTL and wire format are
    /// specified in seconds); `now_ms` stamps the session's own
    /// `Queue → Accepting` transition, which must stay in the milliseconds
    /// domain like every other `last_transition_at` write.
    fn check_quorum_with_anti_spam(&mut self, now_secs: u64, now_ms: u64, chain: &impl ChainView, net: &mut impl NetView) {
        let Some(pool) = self.session.as_mut() else { return };
        if pool.state() != SessionState::Queue {
            return;
        }
        if let Some(last_block) = self.last_success_block {
            if chain.tip_height() <= last_block {
                debug!("coordinator: refusing quorum, chain tip hasn't advanced since last success");
                return;
            }
        }
        if pool.check_quorum(now_ms) {
            let mut announcement =
                QueueAnnouncement::new(self.collateral_vin.clone(), pool.session.denom, now_secs, true);
            announcement.sign(&self.keypair);
            announcement.relay(net);
            self.announcements.push(announcement);
        }
    }

    fn prune_expired_announcements(&mut self, now: u64) {
        let ttl = self.params.queue_announce_ttl_secs;
        self.announcements.retain(|a| !a.is_expired(now, ttl));
    }

    /// `dsf` is sent as part of `build_and_shuffle`, exactly once per
    /// `Finalize → Signing` transition. `now_ms` per the milliseconds-domain
    /// rule on `last_transition_at`.
    pub fn build_and_shuffle(&mut self, now_ms: u64, net: &mut impl NetView) -> Result<(), PoolError> {
        let pool = self.session.as_mut().ok_or(PoolError::from(PoolErrorKind::Session))?;
        if pool.check_full(now_ms) {
            pool.build_merged(now_ms, &mut self.shuffle_rng);
            let merged = pool.session.merged.clone().expect("build_merged just set it");
            let payload = bincode::serialize(&wire::SignatureRequest { session_id: pool.session.id, merged_tx: merged })
                .expect("SignatureRequest fields are all plain");
            net.broadcast(wire::CMD_DSF, &payload);
        }
        Ok(())
    }

    /// `dss` handling: accept one signed input. `now_ms` per the
    /// milliseconds-domain rule on `last_transition_at`.
    pub fn handle_script_sig(
        &mut self,
        input_index: usize,
        script_sig: Vec<u8>,
        now_ms: u64,
        verifier: &impl ScriptVerifier,
        chain: &impl ChainView,
        mempool: &impl MempoolView,
        wallet: &mut impl WalletView,
    ) -> Result<(), PoolError> {
        let pool = self.session.as_mut().ok_or(PoolError::from(PoolErrorKind::Session))?;
        pool.add_script_sig(input_index, script_sig, verifier)?;
        if pool.check_signatures_complete(now_ms) {
            self.finish_round(now_ms, chain, mempool, wallet);
        }
        Ok(())
    }

    fn finish_round(&mut self, now_ms: u64, chain: &impl ChainView, mempool: &impl MempoolView, wallet: &mut impl WalletView) {
        let Some(pool) = self.session.as_mut() else { return };
        // `broadcast`'s success path resets the session, clearing `session.merged` — the
        // transaction must be captured here, before the call, to still have it for the journal.
        let Some(pre_broadcast_tx) = pool.session.merged.clone() else { return };
        match pool.broadcast(now_ms, mempool, wallet, &mut self.policy_rng) {
            Ok(txid) => {
                // §4.4: sign `H(merged) || sig_time`, not the txid alone, so the
                // journal's authorization commits to when it was issued.
                let sig = signer::sign(&self.keypair, &journal::sign_preimage(&txid, now_ms));
                self.journal.insert_if_absent(BroadcastJournalEntry {
                    tx: pre_broadcast_tx,
                    coordinator_vin: self.collateral_vin.prev_txid,
                    sig,
                    sig_time: now_ms,
                });
                self.note_success_block(chain.tip_height());
                info!("coordinator: session {} completed successfully", self.next_session_id.wrapping_sub(1));
            }
            Err(_) => {
                info!("coordinator: session merged transaction rejected, reopened for retry");
            }
        }
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    pub fn note_success_block(&mut self, height: u32) {
        self.last_success_block = Some(height);
    }
}
