//! Single-coordinator coin-mixing protocol: clients submit equal-value
//! inputs/outputs to a masternode, which shuffles and merges them into one
//! transaction and collects a per-input signature from each participant
//! before broadcasting.
//!
//! See the `coordinator` module for the driving loop and the `session`
//! module for the state machine itself.

pub mod collateral;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod fees;
pub mod host;
pub mod journal;
pub mod queue;
pub mod session;
pub mod signer;
pub mod types;
pub mod wire;

pub use constants::{Network, PoolParams};
pub use coordinator::Coordinator;
pub use error::{PoolError, PoolErrorKind, PoolResult};
pub use host::{ChainView, MempoolView, NetView, PeerId, ScriptVerifier, TimeSource, WalletView};
pub use queue::QueueAnnouncement;
pub use session::PoolSession;
pub use types::{Denom, Entry, In, Out, PoolTx, SIn, Session, SessionState, StatusSnapshot};
