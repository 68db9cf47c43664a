//! Tagged network configuration for the mixing pool.
//!
//! Replaces a deep chain-parameter inheritance hierarchy with a single
//! tagged enum and a lookup table, following the pattern already used by
//! `rusty_shared_types::ConsensusParams`.

/// Which parameter set a coordinator (or a test) is running under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Main,
    Test,
    Reg,
    Unit,
}

impl Default for Network {
    fn default() -> Self {
        Network::Main
    }
}

/// Every constant the pool protocol needs, grouped by network.
///
/// Concrete values for the timeout/fee constants are not recoverable from
/// the retained original source (they were referenced by name only); the
/// one concrete figure the original does carry is `nPoolMaxTransactions`
/// (3 on main/regtest/unittest, 2 on testnet), which is reproduced exactly
/// below. The remaining figures are reasonable implementation defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolParams {
    pub network: Network,
    /// Minimum miner fee a collateral transaction must pay.
    pub collateral_fee: u64,
    /// Output value required to "associate" with a masternode pubkey.
    pub masternode_collateral: u64,
    /// Maximum number of entries (and therefore participants) per session.
    pub max_pool_entries: u32,
    /// `Queue`/`Accepting` inactivity timeout, milliseconds.
    pub queue_timeout_ms: u64,
    /// `Signing` timeout, milliseconds.
    pub signing_timeout_ms: u64,
    /// How long an admitted entry may sit unconsumed, seconds.
    pub entry_ttl_secs: u64,
    /// How long a queue announcement stays valid, seconds.
    pub queue_announce_ttl_secs: u64,
    /// Masternode ping refresh interval, seconds.
    pub masternode_ping_secs: u64,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self::for_network(Network::Main)
    }
}

impl PoolParams {
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Main => PoolParams {
                network,
                collateral_fee: 10_000,
                masternode_collateral: 1_000_000 * 100_000_000,
                max_pool_entries: 3,
                queue_timeout_ms: 30_000,
                signing_timeout_ms: 15_000,
                entry_ttl_secs: 120,
                queue_announce_ttl_secs: 30,
                masternode_ping_secs: 60,
            },
            Network::Test => PoolParams {
                network,
                collateral_fee: 10_000,
                masternode_collateral: 10_000 * 100_000_000,
                max_pool_entries: 2,
                queue_timeout_ms: 30_000,
                signing_timeout_ms: 15_000,
                entry_ttl_secs: 120,
                queue_announce_ttl_secs: 30,
                masternode_ping_secs: 60,
            },
            Network::Reg => PoolParams {
                network,
                collateral_fee: 10_000,
                masternode_collateral: 10_000 * 100_000_000,
                max_pool_entries: 3,
                queue_timeout_ms: 5_000,
                signing_timeout_ms: 5_000,
                entry_ttl_secs: 15,
                queue_announce_ttl_secs: 10,
                masternode_ping_secs: 5,
            },
            Network::Unit => PoolParams {
                network,
                collateral_fee: 10_000,
                masternode_collateral: 10_000 * 100_000_000,
                max_pool_entries: 3,
                queue_timeout_ms: 30_000,
                signing_timeout_ms: 15_000,
                entry_ttl_secs: 120,
                queue_announce_ttl_secs: 30,
                masternode_ping_secs: 60,
            },
        }
    }

    #[cfg(test)]
    pub fn test_fast() -> Self {
        Self::for_network(Network::Reg)
    }
}

/// Fixed sighash mode for per-input signing: each participant signs only
/// their own input(s) while committing to every output.
pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;
pub const MIXING_SIGHASH: u32 = SIGHASH_ALL | SIGHASH_ANYONECANPAY;

/// How long a `Success`/`Error` session lingers before the next `reset()`.
pub const TERMINAL_STATE_LINGER_MS: u64 = 10_000;

/// Domain separation tag mixed into every signed message so that mixing
/// signatures can never be replayed as a signature over some other
/// protocol's message of the same bytes.
pub const SIGNING_DOMAIN_MAGIC: &[u8] = b"rusty-coin/privatesend/v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_and_test_pool_sizes_match_original_chain_params() {
        assert_eq!(PoolParams::for_network(Network::Main).max_pool_entries, 3);
        assert_eq!(PoolParams::for_network(Network::Test).max_pool_entries, 2);
    }

    #[test]
    fn default_is_main() {
        assert_eq!(PoolParams::default().network, Network::Main);
    }
}
