//! Wire message payloads for the seven mixing commands. Command strings
//! are preserved exactly for protocol compatibility.

use serde::{Deserialize, Serialize};

use super::types::{Denom, In, Out, PoolTx};

pub const CMD_DSA: &str = "dsa";
pub const CMD_DSQ: &str = "dsq";
pub const CMD_DSI: &str = "dsi";
pub const CMD_DSF: &str = "dsf";
pub const CMD_DSS: &str = "dss";
pub const CMD_DSSU: &str = "dssu";
pub const CMD_DSC: &str = "dsc";

/// `dsa`: client → coordinator, request admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionRequest {
    pub denom: Denom,
    pub collateral_tx: PoolTx,
}

/// `dsi`: client → coordinator, submit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySubmission {
    pub inputs: Vec<In>,
    pub amount: Denom,
    pub collateral_tx: PoolTx,
    pub outputs: Vec<Out>,
}

/// `dsf`: coordinator → client, request signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub session_id: u32,
    pub merged_tx: PoolTx,
}

/// `dss`: client → coordinator, deliver signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureDelivery {
    pub session_id: u32,
    pub signed_inputs: Vec<In>,
}

/// `dssu`: coordinator → client, status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub session_id: u32,
    pub state_name: String,
    pub entries_count: u32,
    pub accepted: i32,
    pub error_id: i32,
}

/// `dsc`: coordinator → client, round completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundCompleted {
    pub session_id: u32,
    pub error: bool,
    pub error_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_update_round_trips_through_bincode() {
        let update = StatusUpdate {
            session_id: 7,
            state_name: "Accepting".to_string(),
            entries_count: 2,
            accepted: 1,
            error_id: 0,
        };
        let bytes = bincode::serialize(&update).unwrap();
        let decoded: StatusUpdate = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.session_id, 7);
        assert_eq!(decoded.entries_count, 2);
    }
}
