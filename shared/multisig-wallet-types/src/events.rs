//! Notification model for proposals, approvals, executions and deposits.
//!
//! Notifications are observability only; the engine never reads them back.

use std::sync::{Arc, Mutex, PoisonError};

use alloy_primitives::{Address, Bytes, LogData, U256};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};

use crate::transaction::TxId;

/// Solidity event declarations used for log encoding.
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        event Deposit(address indexed sender, uint256 amount, uint256 balance);
        event TransactionProposed(uint256 indexed txId, address indexed proposer, uint256 value, bytes data);
        event TransactionApproved(uint256 indexed txId, address indexed approver);
        event TransactionExecuted(uint256 indexed txId, address indexed to, uint256 value, bytes data);
    }
}

/// A committed wallet notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WalletEvent {
    Deposit {
        sender: Address,
        amount: U256,
        balance: U256,
    },
    TransactionProposed {
        id: TxId,
        proposer: Address,
        amount: U256,
        payload: Bytes,
    },
    TransactionApproved {
        id: TxId,
        approver: Address,
    },
    TransactionExecuted {
        id: TxId,
        target: Address,
        amount: U256,
        payload: Bytes,
    },
}

impl WalletEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WalletEvent::Deposit { .. } => "Deposit",
            WalletEvent::TransactionProposed { .. } => "TransactionProposed",
            WalletEvent::TransactionApproved { .. } => "TransactionApproved",
            WalletEvent::TransactionExecuted { .. } => "TransactionExecuted",
        }
    }

    /// Transaction id the notification refers to, if any.
    pub fn tx_id(&self) -> Option<TxId> {
        match self {
            WalletEvent::Deposit { .. } => None,
            WalletEvent::TransactionProposed { id, .. }
            | WalletEvent::TransactionApproved { id, .. }
            | WalletEvent::TransactionExecuted { id, .. } => Some(*id),
        }
    }

    /// Encode as an EVM log (topics + data) using the Solidity event layout.
    pub fn to_log_data(&self) -> LogData {
        match self {
            WalletEvent::Deposit {
                sender,
                amount,
                balance,
            } => abi::Deposit {
                sender: *sender,
                amount: *amount,
                balance: *balance,
            }
            .encode_log_data(),
            WalletEvent::TransactionProposed {
                id,
                proposer,
                amount,
                payload,
            } => abi::TransactionProposed {
                txId: U256::from(*id),
                proposer: *proposer,
                value: *amount,
                data: payload.clone(),
            }
            .encode_log_data(),
            WalletEvent::TransactionApproved { id, approver } => abi::TransactionApproved {
                txId: U256::from(*id),
                approver: *approver,
            }
            .encode_log_data(),
            WalletEvent::TransactionExecuted {
                id,
                target,
                amount,
                payload,
            } => abi::TransactionExecuted {
                txId: U256::from(*id),
                to: *target,
                value: *amount,
                data: payload.clone(),
            }
            .encode_log_data(),
        }
    }
}

/// Receiver of committed notifications.
pub trait EventSink {
    fn emit(&mut self, event: &WalletEvent);
}

/// In-memory recorder. Clones share the same buffer, so a handle can be kept while another
/// clone is installed as a wallet's sink.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<WalletEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot copy of everything recorded so far.
    pub fn events(&self) -> Vec<WalletEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<WalletEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &WalletEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
