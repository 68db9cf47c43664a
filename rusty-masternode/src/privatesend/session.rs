//! The pool state machine: accepting entries, shuffling, finalizing,
//! collecting signatures, broadcasting, and charging fees.
//!
//! `PoolSession` wraps a `Session` (the plain data record, `types.rs`) with
//! the operations that are allowed to mutate it. Every mutating method
//! takes the host capabilities it needs as parameters rather than storing
//! them, so the same session can be driven by tests with fakes and by a
//! production `Coordinator` with real ones.

use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::constants::PoolParams;
use super::error::{PoolError, PoolErrorKind};
use super::fees;
use super::fees::TimeoutPath;
use super::host::{ChainView, MempoolView, ScriptVerifier, WalletView};
use super::types::{Entry, Out, PoolTx, Session, SessionState};

pub struct PoolSession {
    pub session: Session,
    pub params: PoolParams,
}

impl PoolSession {
    pub fn new(id: u32, denom: super::types::Denom, now: u64, params: PoolParams) -> Self {
        PoolSession { session: Session::new(id, denom, now), params }
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Admits a client's entry into the current round.
    ///
    /// Preconditions checked, in the order the protocol reports them:
    /// state, collateral validity, pool capacity, per-input well-formedness,
    /// denomination match, then global input-uniqueness.
    pub fn admit(
        &mut self,
        entry: Entry,
        now: u64,
        chain: &impl ChainView,
        mempool: &impl MempoolView,
    ) -> Result<(), PoolError> {
        let result = self.try_admit(entry, now, chain, mempool);
        if result.is_err() {
            self.session.user_count = self.session.user_count.saturating_sub(1);
        }
        result
    }

    fn try_admit(
        &mut self,
        entry: Entry,
        now: u64,
        chain: &impl ChainView,
        mempool: &impl MempoolView,
    ) -> Result<(), PoolError> {
        self.session.user_count = self.session.user_count.saturating_add(1);

        if !matches!(self.session.state, SessionState::Queue | SessionState::Accepting) {
            return Err(PoolErrorKind::Mode.into());
        }
        if self.session.entries.len() as u32 >= self.params.max_pool_entries {
            return Err(PoolErrorKind::EntriesFull.into());
        }
        for sin in &entry.inputs {
            let is_null = sin.input.prev_txid == [0u8; 32];
            if is_null {
                return Err(PoolErrorKind::InvalidInput.into());
            }
        }
        if entry.amount != self.session.denom {
            return Err(PoolErrorKind::Denom.into());
        }
        super::collateral::is_valid(&entry.collateral, chain, mempool, self.params.collateral_fee)?;

        for sin in &entry.inputs {
            let outpoint = sin.input.outpoint();
            let duplicate = self.session.entries.iter().any(|existing| {
                existing.inputs.iter().any(|existing_sin| existing_sin.input.outpoint() == outpoint)
            });
            if duplicate {
                return Err(PoolErrorKind::AlreadyHave.into());
            }
        }

        self.session.collateral_pool.push(entry.collateral.clone());
        self.session.entries.push(entry);
        self.session.transition(self.session.state, now, "Entry accepted.");
        info!("session {}: admitted entry, now {} of {}", self.session.id, self.session.entries.len(), self.params.max_pool_entries);
        Ok(())
    }

    /// `Queue → Accepting` once enough clients have queued up.
    pub fn check_quorum(&mut self, now: u64) -> bool {
        if self.session.state == SessionState::Queue && self.session.user_count >= self.params.max_pool_entries {
            self.session.transition(SessionState::Accepting, now, "Pool quorum reached.");
            info!("session {}: quorum reached, moving to Accepting", self.session.id);
            true
        } else {
            false
        }
    }

    /// `Accepting → Finalize` once every slot has an entry.
    pub fn check_full(&mut self, now: u64) -> bool {
        if self.session.state == SessionState::Accepting
            && self.session.entries.len() as u32 == self.params.max_pool_entries
        {
            self.session.transition(SessionState::Finalize, now, "Pool entries full, finalizing.");
            true
        } else {
            false
        }
    }

    /// Builds the merged transaction: concatenates every entry's outputs
    /// then inputs, and independently shuffles each vector with a
    /// cryptographically-secure, freshly-seeded RNG. Must never be called
    /// with a deterministic/seedable generator in production — that would
    /// destroy the protocol's sole privacy property.
    pub fn build_merged(&mut self, now: u64, shuffle_rng: &mut impl Rng) {
        let mut outputs: Vec<Out> = Vec::new();
        let mut inputs: Vec<super::types::In> = Vec::new();
        for entry in &self.session.entries {
            outputs.extend(entry.outputs.iter().cloned());
            inputs.extend(entry.inputs.iter().map(|sin| sin.input.clone()));
        }
        inputs.shuffle(shuffle_rng);
        outputs.shuffle(shuffle_rng);

        self.session.merged = Some(PoolTx { version: 1, inputs, outputs, lock_time: 0 });
        self.session.transition(SessionState::Signing, now, "Requesting signatures.");
        info!("session {}: merged transaction built and shuffled, requesting signatures", self.session.id);
    }

    /// Accepts a signed input into the merged transaction and the owning
    /// entry, iff the signature is new and verifies under the merged
    /// transaction's sighash.
    pub fn add_script_sig(
        &mut self,
        input_index: usize,
        script_sig: Vec<u8>,
        verifier: &impl ScriptVerifier,
    ) -> Result<(), PoolError> {
        let merged = self.session.merged.as_ref().ok_or(PoolError::from(PoolErrorKind::Session))?;
        if input_index >= merged.inputs.len() {
            return Err(PoolErrorKind::InvalidInput.into());
        }
        if merged.inputs[input_index].script_sig == script_sig {
            return Err(PoolErrorKind::AlreadyHave.into());
        }

        let prev_pubkey = self.find_prev_pubkey(input_index).ok_or(PoolError::from(PoolErrorKind::InvalidInput))?;
        if !verifier.verify_input_signature(merged, input_index, &script_sig, &prev_pubkey) {
            return Err(PoolErrorKind::InvalidScript.into());
        }

        let outpoint = self.session.merged.as_ref().unwrap().inputs[input_index].outpoint();
        let merged = self.session.merged.as_mut().unwrap();
        merged.inputs[input_index].script_sig = script_sig.clone();
        merged.inputs[input_index].prev_pubkey = prev_pubkey;

        for entry in &mut self.session.entries {
            for sin in &mut entry.inputs {
                if sin.input.outpoint() == outpoint {
                    sin.input.script_sig = script_sig.clone();
                    sin.has_sig = true;
                }
            }
        }
        Ok(())
    }

    fn find_prev_pubkey(&self, input_index: usize) -> Option<Vec<u8>> {
        let merged = self.session.merged.as_ref()?;
        let outpoint = merged.inputs[input_index].outpoint();
        for entry in &self.session.entries {
            for sin in &entry.inputs {
                if sin.input.outpoint() == outpoint {
                    return Some(sin.input.prev_pubkey.clone());
                }
            }
        }
        None
    }

    /// `Signing → Transmission` once every entry's every input is signed.
    pub fn check_signatures_complete(&mut self, now: u64) -> bool {
        if self.session.state == SessionState::Signing && self.session.signatures_complete() {
            self.session.transition(SessionState::Transmission, now, "Signing complete, transmitting.");
            true
        } else {
            false
        }
    }

    /// Submits the merged transaction to the mempool. On acceptance,
    /// records the broadcast journal entry, runs `ChargeRandomFees`, and
    /// resets to `Idle`. On rejection, clears the round and reopens
    /// `Accepting` for a retry.
    pub fn broadcast(
        &mut self,
        now: u64,
        mempool: &impl MempoolView,
        wallet: &mut impl WalletView,
        policy_rng: &mut impl Rng,
    ) -> Result<[u8; 32], PoolError> {
        let merged = self.session.merged.clone().ok_or(PoolError::from(PoolErrorKind::Session))?;
        match mempool.accept(&merged) {
            Ok(()) => {
                let txid = merged.txid();
                fees::charge_random_fees(&self.session, policy_rng, wallet);
                self.session.transition(SessionState::Success, now, "Transaction created successfully.");
                info!("session {}: merged transaction {:?} accepted, success", self.session.id, txid);
                self.reset(now, wallet);
                Ok(txid)
            }
            Err(reason) => {
                warn!("session {}: merged transaction rejected by mempool: {reason}", self.session.id);
                self.session.merged = None;
                self.session.transition(SessionState::Accepting, now, "Transaction not valid.");
                Err(PoolErrorKind::InvalidTx.into())
            }
        }
    }

    /// Drives the timeout table (§4.7). Runs `ChargeFees` when signing
    /// times out. `lag_ms` is `0` for the coordinator itself and `10_000`
    /// for a non-coordinating client evaluating the same table.
    ///
    /// `last_transition_at` lives in the milliseconds domain exclusively —
    /// every call below that moves the session (`reset`/`transition`) is
    /// therefore passed `now_ms`, never a seconds value. Mixing the two here
    /// previously made a fresh `Success`/`Error` session's `last_transition_at`
    /// read as seconds, so the very next tick's `delta_ms` came out three
    /// orders of magnitude too large and reset the session immediately
    /// instead of after the `TERMINAL_STATE_LINGER_MS` linger.
    pub fn check_timeouts(
        &mut self,
        now_ms: u64,
        lag_ms: u64,
        policy_rng: &mut impl Rng,
        wallet: &mut impl WalletView,
    ) {
        let delta_ms = now_ms.saturating_sub(self.session.last_transition_at);
        match self.session.state {
            SessionState::Queue | SessionState::Accepting => {
                if delta_ms >= self.params.queue_timeout_ms + lag_ms {
                    info!("session {}: queue/accepting timed out, resetting", self.session.id);
                    self.reset(now_ms, wallet);
                }
            }
            SessionState::Signing => {
                if delta_ms >= self.params.signing_timeout_ms + lag_ms {
                    fees::charge_fees(&self.session, TimeoutPath::Signing, self.params.max_pool_entries, policy_rng, wallet);
                    self.session.transition(SessionState::Error, now_ms, "Signing timed out.");
                    warn!("session {}: signing timed out", self.session.id);
                }
            }
            SessionState::Success | SessionState::Error => {
                if delta_ms >= super::constants::TERMINAL_STATE_LINGER_MS {
                    self.reset(now_ms, wallet);
                }
            }
            SessionState::Idle | SessionState::Finalize | SessionState::Transmission => {}
        }
    }

    /// Prunes individually-expired entries. If that drains the session,
    /// resets to `Idle`. `now_secs` is compared against `Entry::submitted_at`
    /// (the entry TTL is specified in seconds); `now_ms` is only used to
    /// stamp the resulting `reset`, which otherwise must move
    /// `last_transition_at` in the milliseconds domain.
    pub fn prune_expired_entries(&mut self, now_secs: u64, now_ms: u64, wallet: &mut impl WalletView) {
        if self.session.entries.is_empty() {
            return;
        }
        let ttl = self.params.entry_ttl_secs;
        self.session.entries.retain(|entry| !entry.is_expired(now_secs, ttl));
        if self.session.entries.is_empty() && !matches!(self.session.state, SessionState::Idle) {
            self.reset(now_ms, wallet);
        }
    }

    /// Forces the session to `Idle`, unlocking every coin the session had
    /// locked and clearing all round state. Idempotent: calling this twice
    /// in a row leaves identical state and never double-unlocks a coin.
    /// `now` is milliseconds, matching every other `last_transition_at` write.
    pub fn reset(&mut self, now: u64, wallet: &mut impl WalletView) {
        for entry in &self.session.entries {
            for sin in &entry.inputs {
                wallet.unlock_coin(&sin.input.outpoint());
            }
        }
        self.session.entries.clear();
        self.session.collateral_pool.clear();
        self.session.merged = None;
        self.session.user_count = 0;
        self.session.transition(SessionState::Idle, now, "Pool reset.");
    }

    pub fn status_snapshot(&self) -> super::types::StatusSnapshot {
        self.session.status_snapshot(self.params.max_pool_entries)
    }
}
