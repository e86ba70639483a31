use alloy_primitives::{Address, U256};
use alloy_sol_types::SolError;
use multisig_wallet_types::{TransferError, TxId};
use thiserror::Error;

/// Solidity custom errors, for hosts that surface failures as ABI revert data.
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        error InvalidConfiguration(string reason);
        error NotAnOwner(address caller);
        error TransactionNotFound(uint256 txId);
        error AlreadyApproved(uint256 txId, address owner);
        error AlreadyExecuted(uint256 txId);
        error NotEnoughApprovals(uint256 txId, uint256 approvals, uint256 required);
        error InsufficientBalance(uint256 txId, uint256 required, uint256 available);
        error TransferFailed(uint256 txId, address to);
        error BalanceOverflow(uint256 amount);
    }
}

/// Construction-time owner/threshold violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("owner list is empty")]
    NoOwners,

    #[error("owner at index {index} is the zero address")]
    ZeroOwner { index: usize },

    #[error("owner {owner} is listed more than once")]
    DuplicateOwner { owner: Address },

    #[error("required approvals must be at least 1")]
    ZeroThreshold,

    #[error("{owners} owners is less than {threshold} required approvals")]
    ThresholdExceedsOwners { threshold: u64, owners: usize },
}

/// Every way a wallet operation can fail. No partial mutation survives any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ConfigViolation),

    #[error("{caller} is not an owner")]
    Unauthorized { caller: Address },

    #[error("transaction {id} not found")]
    NotFound { id: TxId },

    #[error("transaction {id} already approved by {owner}")]
    DuplicateApproval { id: TxId, owner: Address },

    #[error("transaction {id} already executed")]
    AlreadyExecuted { id: TxId },

    #[error("transaction {id} has {approvals} of {required} required approvals")]
    QuorumNotMet {
        id: TxId,
        approvals: usize,
        required: u64,
    },

    #[error("transaction {id} needs {required} but wallet holds {available}")]
    InsufficientBalance {
        id: TxId,
        required: U256,
        available: U256,
    },

    #[error("transfer for transaction {id} to {target} failed: {reason:?}")]
    TransferFailed {
        id: TxId,
        target: Address,
        reason: TransferError,
    },

    #[error("deposit of {amount} overflows the wallet balance")]
    BalanceOverflow { amount: U256 },
}

impl From<ConfigViolation> for WalletError {
    fn from(violation: ConfigViolation) -> Self {
        WalletError::InvalidConfiguration(violation)
    }
}

impl WalletError {
    /// ABI-encoded custom error (selector + arguments).
    pub fn revert_data(&self) -> Vec<u8> {
        match self {
            WalletError::InvalidConfiguration(violation) => abi::InvalidConfiguration {
                reason: violation.to_string(),
            }
            .abi_encode(),
            WalletError::Unauthorized { caller } => {
                abi::NotAnOwner { caller: *caller }.abi_encode()
            }
            WalletError::NotFound { id } => abi::TransactionNotFound {
                txId: U256::from(*id),
            }
            .abi_encode(),
            WalletError::DuplicateApproval { id, owner } => abi::AlreadyApproved {
                txId: U256::from(*id),
                owner: *owner,
            }
            .abi_encode(),
            WalletError::AlreadyExecuted { id } => abi::AlreadyExecuted {
                txId: U256::from(*id),
            }
            .abi_encode(),
            WalletError::QuorumNotMet {
                id,
                approvals,
                required,
            } => abi::NotEnoughApprovals {
                txId: U256::from(*id),
                approvals: U256::from(*approvals),
                required: U256::from(*required),
            }
            .abi_encode(),
            WalletError::InsufficientBalance {
                id,
                required,
                available,
            } => abi::InsufficientBalance {
                txId: U256::from(*id),
                required: *required,
                available: *available,
            }
            .abi_encode(),
            WalletError::TransferFailed { id, target, .. } => abi::TransferFailed {
                txId: U256::from(*id),
                to: *target,
            }
            .abi_encode(),
            WalletError::BalanceOverflow { amount } => {
                abi::BalanceOverflow { amount: *amount }.abi_encode()
            }
        }
    }

    /// True for failures the caller can resolve by waiting or acting (more approvals, more
    /// funds). Configuration errors are fatal to the construction attempt.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, WalletError::InvalidConfiguration(_))
    }
}
