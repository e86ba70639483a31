use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Sequential transaction identifier, allocated from 0 and never reused.
pub type TxId = u64;

/// Read-only view of a proposed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub id: TxId,
    pub target: Address,
    pub amount: U256,
    pub payload: Bytes,
    /// Approving owners, in the order their approvals were recorded.
    pub approvals: Vec<Address>,
    pub executed: bool,
}

impl TransactionDetails {
    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }
}
