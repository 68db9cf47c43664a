//! Collateral transaction validation: the anti-abuse economic guard every
//! pool participant must pass before being admitted.

use log::debug;

use super::error::{PoolError, PoolErrorKind};
use super::host::{ChainView, MempoolView};
use super::types::PoolTx;

/// Returns `Ok(())` iff every collateral requirement holds; otherwise
/// `Err(PoolErrorKind::InvalidCollateral)`. The specific internal reason is
/// logged at `debug` level but never reported to the client beyond the one
/// generic error code.
pub fn is_valid(
    tx: &PoolTx,
    chain: &impl ChainView,
    mempool: &impl MempoolView,
    collateral_fee: u64,
) -> Result<(), PoolError> {
    if tx.outputs.is_empty() {
        debug!("collateral rejected: no outputs");
        return Err(PoolErrorKind::InvalidCollateral.into());
    }
    if tx.lock_time != 0 {
        debug!("collateral rejected: non-zero locktime {}", tx.lock_time);
        return Err(PoolErrorKind::InvalidCollateral.into());
    }
    for output in &tx.outputs {
        if !is_normal_payment_script(&output.script_pubkey) {
            debug!("collateral rejected: non-standard output script");
            return Err(PoolErrorKind::InvalidCollateral.into());
        }
    }

    let mut input_total: u64 = 0;
    for input in &tx.inputs {
        let outpoint = input.outpoint();
        match chain.resolve_output(&outpoint) {
            Some(output) => input_total = input_total.saturating_add(output.value),
            None => {
                debug!("collateral rejected: missing prevout {:?}", outpoint);
                return Err(PoolErrorKind::InvalidCollateral.into());
            }
        }
    }
    let output_total: u64 = tx.outputs.iter().map(|o| o.value).sum();
    if input_total < output_total || input_total - output_total < collateral_fee {
        debug!("collateral rejected: fee below minimum ({} < {})", input_total.saturating_sub(output_total), collateral_fee);
        return Err(PoolErrorKind::InvalidCollateral.into());
    }

    if let Err(reason) = mempool.accept(tx) {
        debug!("collateral rejected: mempool would not accept it ({reason})");
        return Err(PoolErrorKind::InvalidCollateral.into());
    }

    Ok(())
}

/// Standard-payment-script check: P2PKH only, matching
/// `TxOutput::extract_public_key_hash`'s accepted shape.
fn is_normal_payment_script(script_pubkey: &[u8]) -> bool {
    script_pubkey.len() == 25
        && script_pubkey[0] == 0x76
        && script_pubkey[1] == 0xA9
        && script_pubkey[2] == 0x14
        && script_pubkey[23] == 0x88
        && script_pubkey[24] == 0xAC
}
