//! Probabilistic fee/punishment policy: two independent mechanisms, one
//! for timeouts (punitive) and one for successful rounds (funds miners).
//!
//! Both rolls use the *policy* RNG, which is deliberately a different
//! instance — and may be a coarser generator — than the cryptographic RNG
//! used for the merge shuffle (`session::shuffle`). They must never share
//! a seed or a stream: see `Coordinator`'s two separate RNG fields.

use log::info;
use rand::Rng;

use super::host::WalletView;
use super::types::{PoolTx, Session};

/// Which timeout path triggered `charge_fees`, since the offender
/// definition differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPath {
    Accepting,
    Signing,
}

fn accepting_offenders(session: &Session) -> Vec<PoolTx> {
    session
        .collateral_pool
        .iter()
        .filter(|collateral| !session.entries.iter().any(|entry| &entry.collateral == *collateral))
        .cloned()
        .collect()
}

fn signing_offenders(session: &Session) -> Vec<PoolTx> {
    session
        .entries
        .iter()
        .filter(|entry| !entry.signatures_complete())
        .map(|entry| entry.collateral.clone())
        .collect()
}

/// Roll, count offenders, and — at most — publish exactly one offending
/// collateral as punishment. Returns the txid charged, if any.
pub fn charge_fees(
    session: &Session,
    path: TimeoutPath,
    max_pool_entries: u32,
    policy_rng: &mut impl Rng,
    wallet: &mut impl WalletView,
) -> Option<[u8; 32]> {
    let r: u32 = policy_rng.gen_range(0..100);
    if r <= 33 {
        return None;
    }

    let offenders = match path {
        TimeoutPath::Accepting => accepting_offenders(session),
        TimeoutPath::Signing => signing_offenders(session),
    };
    let k = offenders.len() as u32;

    if k >= max_pool_entries {
        return None;
    }
    if k >= max_pool_entries.saturating_sub(1) {
        let r2: u32 = policy_rng.gen_range(0..100);
        if r2 > 33 {
            return None;
        }
    }

    let target = if k > 1 { 50 } else { 0 };
    let r3: u32 = policy_rng.gen_range(0..100);
    for offender in &offenders {
        if r3 > target {
            wallet.relay(offender);
            let txid = offender.txid();
            info!("charged collateral {:?} for session {}", txid, session.id);
            return Some(txid);
        }
    }
    None
}

/// "10% random fee" that funds miners: for each collateral, independently
/// publish with probability 10/100.
pub fn charge_random_fees(session: &Session, policy_rng: &mut impl Rng, wallet: &mut impl WalletView) -> Vec<[u8; 32]> {
    let mut charged = Vec::new();
    for collateral in &session.collateral_pool {
        let r: u32 = policy_rng.gen_range(0..100);
        if r <= 10 {
            wallet.relay(collateral);
            let txid = collateral.txid();
            info!("randomly charged collateral {:?} for session {}", txid, session.id);
            charged.push(txid);
        }
    }
    charged
}

#[cfg(test)]
mod tests {
    use super::super::host::test_support::FakeWallet;
    use super::super::types::{Denom, Entry, PoolTx, SessionState};
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn collateral(tag: u8) -> PoolTx {
        PoolTx { version: 1, inputs: vec![], outputs: vec![], lock_time: tag as u32 }
    }

    fn session_with(collaterals: Vec<PoolTx>, unsigned_entries: usize) -> Session {
        use super::super::types::{In, SIn};

        let mut session = Session::new(1, Denom(1), 0);
        session.state = SessionState::Signing;
        session.collateral_pool = collaterals.clone();
        session.entries = collaterals
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let has_sig = i >= unsigned_entries;
                let input = In {
                    prev_txid: [i as u8; 32],
                    prev_index: 0,
                    sequence: 0,
                    script_sig: vec![],
                    prev_pubkey: vec![],
                };
                Entry {
                    inputs: vec![SIn { input, has_sig }],
                    outputs: vec![],
                    amount: Denom(1),
                    collateral: c,
                    submitted_at: 0,
                }
            })
            .collect();
        session
    }

    #[test]
    fn charge_fees_never_charges_when_every_participant_is_an_offender() {
        let session = session_with(vec![collateral(1), collateral(2), collateral(3)], 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut wallet = FakeWallet::default();
        // k == max_pool_entries(3) must always skip regardless of rolls.
        for seed in 0..50 {
            rng = ChaCha8Rng::seed_from_u64(seed);
            let charged = charge_fees(&session, TimeoutPath::Signing, 3, &mut rng, &mut wallet);
            assert!(charged.is_none());
        }
    }

    #[test]
    fn charge_random_fees_only_touches_existing_collateral() {
        let session = session_with(vec![collateral(1), collateral(2)], 0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut wallet = FakeWallet::default();
        let charged = charge_random_fees(&session, &mut rng, &mut wallet);
        for txid in &charged {
            assert!(session.collateral_pool.iter().any(|c| &c.txid() == txid));
        }
    }

    #[test]
    fn charge_random_fees_rate_is_close_to_ten_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut wallet = FakeWallet::default();
        let mut publishes = 0u32;
        let total_rounds = 10_000u32;
        for _ in 0..total_rounds {
            let session = session_with(vec![collateral(1), collateral(2), collateral(3)], 0);
            publishes += charge_random_fees(&session, &mut rng, &mut wallet).len() as u32;
        }
        let rate = publishes as f64 / (total_rounds as f64 * 3.0);
        assert!((0.085..=0.115).contains(&rate), "observed rate {rate}");
    }
}
