//! Append-only record of proposed transactions.

use alloy_primitives::{Address, Bytes, U256};
use multisig_wallet_types::TxId;

use crate::{errors::WalletError, registry::OwnerRegistry};

/// One proposed transfer. `target`, `amount` and `payload` never change after proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub target: Address,
    pub amount: U256,
    pub payload: Bytes,
    executed: bool,
}

impl Proposal {
    pub fn is_executed(&self) -> bool {
        self.executed
    }
}

/// Proposals indexed by their sequential id (the id is the slot position).
///
/// A slot is emptied only when the proposal that filled it is undone; the id stays allocated
/// and is never handed out again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionLedger {
    slots: Vec<Option<Proposal>>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new proposal from an owner and return its id.
    pub fn propose(
        &mut self,
        registry: &OwnerRegistry,
        proposer: Address,
        target: Address,
        amount: U256,
        payload: Bytes,
    ) -> Result<TxId, WalletError> {
        registry.ensure_owner(proposer)?;

        let id = self.next_id();
        self.slots.push(Some(Proposal {
            target,
            amount,
            payload,
            executed: false,
        }));
        Ok(id)
    }

    pub fn get(&self, id: TxId) -> Result<&Proposal, WalletError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.slots.get(index))
            .and_then(Option::as_ref)
            .ok_or(WalletError::NotFound { id })
    }

    /// Id the next proposal will receive. Never decreases.
    pub fn next_id(&self) -> TxId {
        self.slots.len() as TxId
    }

    /// Flip `executed`; fails if the proposal is missing or already executed.
    pub(crate) fn mark_executed(&mut self, id: TxId) -> Result<(), WalletError> {
        let proposal = self.get_mut(id)?;
        if proposal.executed {
            return Err(WalletError::AlreadyExecuted { id });
        }
        proposal.executed = true;
        Ok(())
    }

    /// Journal undo of `mark_executed`.
    pub(crate) fn clear_executed(&mut self, id: TxId) {
        if let Ok(proposal) = self.get_mut(id) {
            proposal.executed = false;
        }
    }

    /// Journal undo of `propose`. The id stays allocated and reads as `NotFound`.
    pub(crate) fn discard(&mut self, id: TxId) {
        if let Some(slot) = usize::try_from(id)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
        {
            *slot = None;
        }
    }

    fn get_mut(&mut self, id: TxId) -> Result<&mut Proposal, WalletError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(WalletError::NotFound { id })
    }
}
