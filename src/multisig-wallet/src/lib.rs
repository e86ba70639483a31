//! Owner-quorum transaction authorisation engine.
//!
//! A fixed set of owners proposes transfers of value and payload; each transfer executes exactly
//! once after a threshold of distinct owners approve it.
//!
//! Design notes:
//! - All state lives in one owned [`WalletState`] aggregate; there are no globals.
//! - Every mutating call runs inside a journal frame. A failure anywhere in the call undoes every
//!   mutation and drops every notification made since the frame began. Calls that re-enter the
//!   wallet from a transfer are frames of their own and are final once they return `Ok`.
//! - Execution marks the transaction executed before any external effect, so a transfer
//!   collaborator that re-enters the wallet cannot execute the same transaction twice.

pub mod approvals;
pub mod engine;
pub mod errors;
pub mod journal;
pub mod ledger;
pub mod registry;
pub mod sink;
pub mod transfer;
pub mod wallet;

pub use errors::{ConfigViolation, WalletError};
pub use registry::OwnerRegistry;
pub use sink::TracingSink;
pub use transfer::{AccountBook, ValueTransfer};
pub use wallet::{MultiSigWallet, WalletState};

pub use multisig_wallet_types::{
    Address, Bytes, EventLog, EventSink, OutgoingTransfer, TransactionDetails, TransferError,
    TxId, WalletConfig, WalletEvent, U256,
};
