use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::transaction::TxId;

/// The value/payload delivery requested by an execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransfer {
    pub id: TxId,
    pub target: Address,
    pub amount: U256,
    pub payload: Bytes,
}

/// Failure reported by the transfer collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient refused the delivery.
    Rejected { reason: String },
    /// Crediting the recipient would overflow its balance.
    Overflow { target: Address },
}
