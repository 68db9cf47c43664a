//! Core data model: denominations, inputs/outputs, entries, sessions.

use rusty_shared_types::OutPoint;
use serde::{Deserialize, Serialize};

/// An opaque denomination tag. The pool only ever checks equality against
/// it; no arithmetic is ever performed on a `Denom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Denom(pub u64);

/// Reference to a prior output, carried through the pool unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct In {
    pub prev_txid: [u8; 32],
    pub prev_index: u32,
    pub sequence: u32,
    pub script_sig: Vec<u8>,
    pub prev_pubkey: Vec<u8>,
}

impl In {
    pub fn outpoint(&self) -> OutPoint {
        OutPoint { txid: self.prev_txid, vout: self.prev_index }
    }
}

/// `In` plus whether its `script_sig` has been verified against the merged
/// transaction's sighash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SIn {
    pub input: In,
    pub has_sig: bool,
}

impl SIn {
    pub fn new(input: In) -> Self {
        SIn { input, has_sig: false }
    }
}

/// A pool output: value plus locking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Out {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// A minimal standard transaction used both for client collateral and for
/// the coordinator's merged transaction. Kept deliberately narrow — the
/// pool never needs coinbase, governance, ticket, or slashing transaction
/// variants, only plain inputs-and-outputs-with-a-locktime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTx {
    pub version: u32,
    pub inputs: Vec<In>,
    pub outputs: Vec<Out>,
    pub lock_time: u32,
}

impl PoolTx {
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("PoolTx fields are all plain, serialization cannot fail")
    }

    pub fn txid(&self) -> [u8; 32] {
        blake3::hash(&self.to_bytes()).into()
    }

    /// The preimage a `SIGHASH_ALL | SIGHASH_ANYONECANPAY` signature over
    /// input `input_index` commits to: that one input's outpoint and
    /// sequence, plus every output, plus the locktime — deliberately
    /// excluding every other input and any `script_sig` bytes, so the
    /// digest never changes as other inputs are signed one at a time.
    /// The real per-network sighash algorithm (incorporating prevout
    /// scripts, SegWit rules, etc.) lives behind `ScriptVerifier`; this is
    /// the shape the pool itself reasons about.
    pub fn anyonecanpay_all_digest(&self, input_index: usize) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        let input = &self.inputs[input_index];
        hasher.update(&input.prev_txid);
        hasher.update(&input.prev_index.to_le_bytes());
        hasher.update(&input.sequence.to_le_bytes());
        for output in &self.outputs {
            hasher.update(&output.value.to_le_bytes());
            hasher.update(&output.script_pubkey);
        }
        hasher.update(&self.lock_time.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A client's submission to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub inputs: Vec<SIn>,
    pub outputs: Vec<Out>,
    pub amount: Denom,
    pub collateral: PoolTx,
    pub submitted_at: u64,
}

impl Entry {
    pub fn is_expired(&self, now: u64, entry_ttl_secs: u64) -> bool {
        now.saturating_sub(self.submitted_at) > entry_ttl_secs
    }

    pub fn signatures_complete(&self) -> bool {
        self.inputs.iter().all(|sin| sin.has_sig)
    }
}

/// The pool's state machine states (coordinator viewpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Queue,
    Accepting,
    Finalize,
    Signing,
    Transmission,
    Success,
    Error,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Queue => "Queue",
            SessionState::Accepting => "Accepting",
            SessionState::Finalize => "Finalize",
            SessionState::Signing => "Signing",
            SessionState::Transmission => "Transmission",
            SessionState::Success => "Success",
            SessionState::Error => "Error",
        }
    }
}

/// The coordinator's current round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: u32,
    pub denom: Denom,
    pub state: SessionState,
    pub entries: Vec<Entry>,
    pub collateral_pool: Vec<PoolTx>,
    pub merged: Option<PoolTx>,
    pub user_count: u32,
    pub last_transition_at: u64,
    pub last_message: String,
}

impl Session {
    pub fn new(id: u32, denom: Denom, now: u64) -> Self {
        Session {
            id,
            denom,
            state: SessionState::Idle,
            entries: Vec::new(),
            collateral_pool: Vec::new(),
            merged: None,
            user_count: 0,
            last_transition_at: now,
            last_message: String::new(),
        }
    }

    pub fn transition(&mut self, state: SessionState, now: u64, message: impl Into<String>) {
        self.state = state;
        self.last_transition_at = now;
        self.last_message = message.into();
    }

    pub fn signatures_complete(&self) -> bool {
        self.entries.iter().all(Entry::signatures_complete)
    }
}

/// Human-readable rendering of a session, for logging and for the `dssu`
/// payload. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub state_name: &'static str,
    pub entries_count: usize,
    pub max_entries: u32,
    pub last_message: String,
}

impl Session {
    pub fn status_snapshot(&self, max_entries: u32) -> StatusSnapshot {
        StatusSnapshot {
            state_name: self.state.name(),
            entries_count: self.entries.len(),
            max_entries,
            last_message: self.last_message.clone(),
        }
    }
}
