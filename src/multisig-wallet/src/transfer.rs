//! The external value/payload transfer performed by an execution.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, U256};
use multisig_wallet_types::{OutgoingTransfer, TransferError};

use crate::wallet::MultiSigWallet;

/// Delivers an executed transaction's value and payload to its target.
///
/// Implementations receive the executing wallet and may call back into it before returning.
/// By the time `transfer` runs the transaction is already marked executed and the balance
/// already debited; returning an error unwinds both. Calls made through `wallet` that succeeded
/// are committed on return and stay in effect either way, so an implementation should only
/// report failure for value it did not deliver.
pub trait ValueTransfer {
    fn transfer(
        &mut self,
        wallet: &mut MultiSigWallet,
        call: &OutgoingTransfer,
    ) -> Result<(), TransferError>;
}

/// In-memory recipient accounts.
#[derive(Clone, Debug, Default)]
pub struct AccountBook {
    balances: BTreeMap<Address, U256>,
    deliveries: Vec<OutgoingTransfer>,
    rejected: BTreeSet<Address>,
}

impl AccountBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries to `target` fail.
    pub fn rejecting(mut self, target: Address) -> Self {
        self.rejected.insert(target);
        self
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Successful deliveries, oldest first.
    pub fn deliveries(&self) -> &[OutgoingTransfer] {
        &self.deliveries
    }
}

impl ValueTransfer for AccountBook {
    fn transfer(
        &mut self,
        _wallet: &mut MultiSigWallet,
        call: &OutgoingTransfer,
    ) -> Result<(), TransferError> {
        if self.rejected.contains(&call.target) {
            return Err(TransferError::Rejected {
                reason: format!("{} does not accept transfers", call.target),
            });
        }

        let balance = self.balances.entry(call.target).or_default();
        *balance = balance
            .checked_add(call.amount)
            .ok_or(TransferError::Overflow {
                target: call.target,
            })?;
        self.deliveries.push(call.clone());
        Ok(())
    }
}
