//! Per-transaction approval sets.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use multisig_wallet_types::TxId;

use crate::{errors::WalletError, ledger::TransactionLedger, registry::OwnerRegistry};

/// Which owners approved which transaction. Each owner approves a transaction at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApprovalTracker {
    approvals: BTreeMap<TxId, Vec<Address>>,
}

impl ApprovalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `approver`'s approval of `id` and return the new approval count.
    ///
    /// Checks run in order: owner membership, id allocated, not yet executed, not already
    /// approved by this owner. A repeated approval is an error, not a no-op.
    pub fn approve(
        &mut self,
        registry: &OwnerRegistry,
        ledger: &TransactionLedger,
        approver: Address,
        id: TxId,
    ) -> Result<usize, WalletError> {
        registry.ensure_owner(approver)?;
        if ledger.get(id)?.is_executed() {
            return Err(WalletError::AlreadyExecuted { id });
        }

        if self.has_approved(id, approver) {
            return Err(WalletError::DuplicateApproval {
                id,
                owner: approver,
            });
        }
        let approvers = self.approvals.entry(id).or_default();
        approvers.push(approver);
        Ok(approvers.len())
    }

    pub fn count(&self, id: TxId) -> usize {
        self.approvals.get(&id).map_or(0, Vec::len)
    }

    pub fn has_approved(&self, id: TxId, owner: Address) -> bool {
        self.approvals
            .get(&id)
            .is_some_and(|approvers| approvers.contains(&owner))
    }

    /// Approvers of `id` in the order they approved.
    pub fn approvers(&self, id: TxId) -> &[Address] {
        self.approvals.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Journal undo of `approve`.
    pub(crate) fn retract(&mut self, id: TxId, owner: Address) {
        if let Some(approvers) = self.approvals.get_mut(&id) {
            approvers.retain(|approver| *approver != owner);
            if approvers.is_empty() {
                self.approvals.remove(&id);
            }
        }
    }

    /// Journal undo of a proposal: drop anything recorded against the id.
    pub(crate) fn forget(&mut self, id: TxId) {
        self.approvals.remove(&id);
    }
}
