//! Shared types for the multisig wallet engine and its tooling.
//!
//! Identities are 20-byte addresses, amounts are 256-bit unsigned integers and payloads are
//! opaque byte strings, so the same values can be handed to an EVM host without conversion.

pub mod config;
pub mod events;
pub mod transaction;
pub mod transfer;

pub use alloy_primitives::{Address, Bytes, U256};

pub use config::WalletConfig;
pub use events::{EventLog, EventSink, WalletEvent};
pub use transaction::{TransactionDetails, TxId};
pub use transfer::{OutgoingTransfer, TransferError};
