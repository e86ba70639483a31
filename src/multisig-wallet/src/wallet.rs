//! Wallet aggregate and its proposal/approval entry points.
//!
//! Execution and balance handling live in [`crate::engine`].

use std::fmt;

use alloy_primitives::{Address, Bytes, U256};
use multisig_wallet_types::{EventSink, TransactionDetails, TxId, WalletConfig, WalletEvent};
use tracing::{debug, trace};

use crate::{
    approvals::ApprovalTracker,
    errors::WalletError,
    journal::{Journal, Undo},
    ledger::TransactionLedger,
    registry::OwnerRegistry,
    sink::TracingSink,
};

/// All mutable state of one wallet instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletState {
    pub(crate) registry: OwnerRegistry,
    pub(crate) ledger: TransactionLedger,
    pub(crate) approvals: ApprovalTracker,
    pub(crate) balance: U256,
}

impl WalletState {
    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn approvals(&self) -> &ApprovalTracker {
        &self.approvals
    }

    pub fn balance(&self) -> U256 {
        self.balance
    }

    fn revert(&mut self, undo: Undo) {
        match undo {
            Undo::Proposed(id) => {
                self.approvals.forget(id);
                self.ledger.discard(id);
            }
            Undo::Approved { id, owner } => self.approvals.retract(id, owner),
            Undo::Executed(id) => self.ledger.clear_executed(id),
            Undo::Debited(amount) => self.balance = self.balance.saturating_add(amount),
            Undo::Credited(amount) => self.balance = self.balance.saturating_sub(amount),
        }
    }
}

/// A multisig wallet: owner registry, ledger, approvals and balance behind an undo journal.
pub struct MultiSigWallet {
    pub(crate) state: WalletState,
    pub(crate) journal: Journal,
    sink: Box<dyn EventSink + Send>,
}

impl fmt::Debug for MultiSigWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSigWallet")
            .field("state", &self.state)
            .field("depth", &self.journal.depth())
            .finish_non_exhaustive()
    }
}

impl MultiSigWallet {
    /// Create a wallet holding `initial_funding`. Notifications go to [`TracingSink`] until
    /// [`with_sink`](Self::with_sink) replaces it.
    pub fn new(
        owners: Vec<Address>,
        required_approvals: u64,
        initial_funding: U256,
    ) -> Result<Self, WalletError> {
        let registry = OwnerRegistry::new(owners, required_approvals)?;
        debug!(
            owners = registry.len(),
            required_approvals,
            %initial_funding,
            "wallet created"
        );

        Ok(Self {
            state: WalletState {
                registry,
                ledger: TransactionLedger::new(),
                approvals: ApprovalTracker::new(),
                balance: initial_funding,
            },
            journal: Journal::new(),
            sink: Box::new(TracingSink),
        })
    }

    pub fn from_config(config: &WalletConfig) -> Result<Self, WalletError> {
        Self::new(
            config.owners.clone(),
            config.required_approvals,
            config.initial_funding,
        )
    }

    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: EventSink + Send + 'static,
    {
        self.sink = Box::new(sink);
        self
    }

    /// Register a new transfer proposed by an owner. Returns the allocated id.
    pub fn propose_transaction(
        &mut self,
        proposer: Address,
        target: Address,
        amount: U256,
        payload: Bytes,
    ) -> Result<TxId, WalletError> {
        self.atomic(|wallet| {
            let state = &mut wallet.state;
            let id = state
                .ledger
                .propose(&state.registry, proposer, target, amount, payload.clone())?;
            wallet.journal.record(Undo::Proposed(id));
            wallet.journal.record_event(WalletEvent::TransactionProposed {
                id,
                proposer,
                amount,
                payload,
            });

            debug!(id, %proposer, %target, %amount, "transaction proposed");
            Ok(id)
        })
    }

    /// Record an owner's approval. Returns the approval count after this approval.
    pub fn approve_transaction(&mut self, approver: Address, id: TxId) -> Result<usize, WalletError> {
        self.atomic(|wallet| {
            let state = &mut wallet.state;
            let count = state
                .approvals
                .approve(&state.registry, &state.ledger, approver, id)?;
            wallet.journal.record(Undo::Approved {
                id,
                owner: approver,
            });
            wallet
                .journal
                .record_event(WalletEvent::TransactionApproved { id, approver });

            debug!(id, %approver, approvals = count, "transaction approved");
            Ok(count)
        })
    }

    pub fn get_transaction_details(&self, id: TxId) -> Result<TransactionDetails, WalletError> {
        let proposal = self.state.ledger.get(id)?;
        Ok(TransactionDetails {
            id,
            target: proposal.target,
            amount: proposal.amount,
            payload: proposal.payload.clone(),
            approvals: self.state.approvals.approvers(id).to_vec(),
            executed: proposal.is_executed(),
        })
    }

    pub fn owners(&self) -> &[Address] {
        self.state.registry.owners()
    }

    pub fn required_approvals(&self) -> u64 {
        self.state.registry.required_approvals()
    }

    pub fn is_owner(&self, identity: Address) -> bool {
        self.state.registry.is_owner(identity)
    }

    /// Number of ids allocated so far.
    pub fn transaction_count(&self) -> u64 {
        self.state.ledger.next_id()
    }

    pub fn approval_count(&self, id: TxId) -> Result<usize, WalletError> {
        self.state.ledger.get(id)?;
        Ok(self.state.approvals.count(id))
    }

    /// Whether `id` has reached quorum.
    pub fn is_confirmed(&self, id: TxId) -> Result<bool, WalletError> {
        let count = self.approval_count(id)?;
        Ok((count as u64) >= self.required_approvals())
    }

    pub fn state(&self) -> &WalletState {
        &self.state
    }

    /// Run `op` as one journal frame: commit on success, unwind on failure.
    pub(crate) fn atomic<T, F>(&mut self, op: F) -> Result<T, WalletError>
    where
        F: FnOnce(&mut Self) -> Result<T, WalletError>,
    {
        let checkpoint = self.journal.begin();
        match op(self) {
            Ok(value) => {
                for event in self.journal.commit(checkpoint) {
                    self.sink.emit(&event);
                }
                Ok(value)
            }
            Err(err) => {
                let undone = self.journal.rollback(checkpoint);
                trace!(
                    depth = self.journal.depth(),
                    undone = undone.len(),
                    error = %err,
                    "operation rolled back"
                );
                for undo in undone {
                    self.state.revert(undo);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multisig_wallet_types::EventLog;

    fn owner(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn wallet() -> (MultiSigWallet, EventLog) {
        let log = EventLog::new();
        let wallet = MultiSigWallet::new(vec![owner(1), owner(2), owner(3)], 2, U256::from(10u64))
            .unwrap()
            .with_sink(log.clone());
        (wallet, log)
    }

    #[test]
    fn test_construction_views() {
        let (wallet, log) = wallet();

        assert_eq!(wallet.owners(), &[owner(1), owner(2), owner(3)]);
        assert_eq!(wallet.required_approvals(), 2);
        assert_eq!(wallet.transaction_count(), 0);
        assert_eq!(wallet.state().balance(), U256::from(10u64));
        assert!(log.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = WalletConfig {
            owners: vec![owner(1)],
            required_approvals: 1,
            initial_funding: U256::from(3u64),
        };
        let wallet = MultiSigWallet::from_config(&config).unwrap();
        assert_eq!(wallet.owners(), &[owner(1)]);
        assert_eq!(wallet.state().balance(), U256::from(3u64));
    }

    #[test]
    fn test_propose_emits_notification() {
        let (mut wallet, log) = wallet();
        let payload = Bytes::from_static(b"Test transaction");

        let id = wallet
            .propose_transaction(owner(1), owner(1), U256::from(1u64), payload.clone())
            .unwrap();

        assert_eq!(id, 0);
        assert_eq!(
            log.events(),
            vec![WalletEvent::TransactionProposed {
                id: 0,
                proposer: owner(1),
                amount: U256::from(1u64),
                payload,
            }]
        );
        assert!(wallet.journal.is_idle());
    }

    #[test]
    fn test_details_reflect_approvals() {
        let (mut wallet, _log) = wallet();
        let id = wallet
            .propose_transaction(owner(1), owner(7), U256::from(4u64), Bytes::new())
            .unwrap();
        wallet.approve_transaction(owner(3), id).unwrap();
        wallet.approve_transaction(owner(2), id).unwrap();

        let details = wallet.get_transaction_details(id).unwrap();
        assert_eq!(details.target, owner(7));
        assert_eq!(details.amount, U256::from(4u64));
        assert_eq!(details.approvals, vec![owner(3), owner(2)]);
        assert!(!details.executed);
        assert!(wallet.is_confirmed(id).unwrap());
    }

    #[test]
    fn test_rejected_calls_leave_no_trace() {
        let (mut wallet, log) = wallet();
        let before = wallet.state().clone();

        assert!(wallet
            .propose_transaction(owner(9), owner(9), U256::from(1u64), Bytes::new())
            .is_err());
        assert!(wallet.approve_transaction(owner(1), 0).is_err());

        assert_eq!(wallet.state(), &before);
        assert!(log.is_empty());
        assert!(wallet.journal.is_idle());
    }

    #[test]
    fn test_undone_proposal_keeps_id_allocated() {
        let (mut wallet, log) = wallet();

        let err = wallet
            .atomic(|wallet| {
                let state = &mut wallet.state;
                let id = state
                    .ledger
                    .propose(&state.registry, owner(1), owner(1), U256::ZERO, Bytes::new())?;
                wallet.journal.record(Undo::Proposed(id));
                state.approvals.approve(&state.registry, &state.ledger, owner(2), id)?;
                wallet.journal.record(Undo::Approved { id, owner: owner(2) });
                Err::<(), _>(WalletError::QuorumNotMet {
                    id,
                    approvals: 1,
                    required: 2,
                })
            })
            .unwrap_err();
        assert!(matches!(err, WalletError::QuorumNotMet { id: 0, .. }));

        assert_eq!(
            wallet.get_transaction_details(0).unwrap_err(),
            WalletError::NotFound { id: 0 }
        );
        assert_eq!(wallet.state().approvals().count(0), 0);
        assert_eq!(wallet.transaction_count(), 1);
        assert!(log.is_empty());

        let id = wallet
            .propose_transaction(owner(3), owner(3), U256::ZERO, Bytes::new())
            .unwrap();
        assert_eq!(id, 1);
        assert!(wallet.journal.is_idle());
    }

    #[test]
    fn test_queries_on_unknown_id() {
        let (wallet, _log) = wallet();
        assert_eq!(
            wallet.get_transaction_details(3).unwrap_err(),
            WalletError::NotFound { id: 3 }
        );
        assert_eq!(wallet.approval_count(3).unwrap_err(), WalletError::NotFound { id: 3 });
        assert_eq!(wallet.is_confirmed(3).unwrap_err(), WalletError::NotFound { id: 3 });
    }
}
