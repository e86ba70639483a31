//! Quorum-gated execution and the wallet balance.
//!
//! Execution order is fixed: mark executed, debit, transfer, notify. The flag is set before the
//! transfer collaborator runs, so a reentrant `execute_transaction` for the same id fails with
//! `AlreadyExecuted`. Any failure after the flag is set unwinds this execution's own frame;
//! executions of other ids committed from inside the transfer are left in place.

use alloy_primitives::{Address, U256};
use multisig_wallet_types::{OutgoingTransfer, TxId, WalletEvent};
use tracing::{debug, warn};

use crate::{errors::WalletError, journal::Undo, transfer::ValueTransfer, wallet::MultiSigWallet};

impl MultiSigWallet {
    /// Execute a quorum-approved transaction exactly once, delivering through `transport`.
    ///
    /// Any owner may execute, not only the proposer.
    pub fn execute_transaction<T>(
        &mut self,
        caller: Address,
        id: TxId,
        transport: &mut T,
    ) -> Result<(), WalletError>
    where
        T: ValueTransfer + ?Sized,
    {
        let result = self.atomic(|wallet| wallet.execute_in_frame(caller, id, transport));
        if let Err(
            err @ (WalletError::InsufficientBalance { .. } | WalletError::TransferFailed { .. }),
        ) = &result
        {
            warn!(id, %caller, error = %err, "execution rolled back");
        }
        result
    }

    fn execute_in_frame<T>(
        &mut self,
        caller: Address,
        id: TxId,
        transport: &mut T,
    ) -> Result<(), WalletError>
    where
        T: ValueTransfer + ?Sized,
    {
        self.state.registry.ensure_owner(caller)?;
        let proposal = self.state.ledger.get(id)?;
        if proposal.is_executed() {
            return Err(WalletError::AlreadyExecuted { id });
        }

        let approvals = self.state.approvals.count(id);
        let required = self.state.registry.required_approvals();
        if (approvals as u64) < required {
            return Err(WalletError::QuorumNotMet {
                id,
                approvals,
                required,
            });
        }

        let call = OutgoingTransfer {
            id,
            target: proposal.target,
            amount: proposal.amount,
            payload: proposal.payload.clone(),
        };

        // 1. mark
        self.state.ledger.mark_executed(id)?;
        self.journal.record(Undo::Executed(id));

        // 2. debit
        let available = self.state.balance;
        let remaining = available
            .checked_sub(call.amount)
            .ok_or(WalletError::InsufficientBalance {
                id,
                required: call.amount,
                available,
            })?;
        self.state.balance = remaining;
        self.journal.record(Undo::Debited(call.amount));

        // 3. transfer (may re-enter)
        transport
            .transfer(self, &call)
            .map_err(|reason| WalletError::TransferFailed {
                id,
                target: call.target,
                reason,
            })?;

        // 4. notify
        debug!(id, %caller, target = %call.target, amount = %call.amount, "transaction executed");
        self.journal.record_event(WalletEvent::TransactionExecuted {
            id,
            target: call.target,
            amount: call.amount,
            payload: call.payload,
        });
        Ok(())
    }

    /// Accept an incoming transfer. Anyone may fund the wallet. Returns the new balance.
    pub fn deposit(&mut self, sender: Address, amount: U256) -> Result<U256, WalletError> {
        self.atomic(|wallet| {
            let balance = wallet
                .state
                .balance
                .checked_add(amount)
                .ok_or(WalletError::BalanceOverflow { amount })?;
            wallet.state.balance = balance;
            wallet.journal.record(Undo::Credited(amount));
            wallet.journal.record_event(WalletEvent::Deposit {
                sender,
                amount,
                balance,
            });

            debug!(%sender, %amount, %balance, "deposit received");
            Ok(balance)
        })
    }

    pub fn balance(&self) -> U256 {
        self.state.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::AccountBook;
    use alloy_primitives::Bytes;
    use multisig_wallet_types::EventLog;

    fn owner(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn funded(amount: u64) -> (MultiSigWallet, EventLog) {
        let log = EventLog::new();
        let wallet =
            MultiSigWallet::new(vec![owner(1), owner(2), owner(3)], 2, U256::from(amount))
                .unwrap()
                .with_sink(log.clone());
        (wallet, log)
    }

    fn approved_proposal(wallet: &mut MultiSigWallet, amount: u64) -> TxId {
        let id = wallet
            .propose_transaction(owner(1), owner(8), U256::from(amount), Bytes::new())
            .unwrap();
        wallet.approve_transaction(owner(2), id).unwrap();
        wallet.approve_transaction(owner(3), id).unwrap();
        id
    }

    #[test]
    fn test_execute_debits_and_delivers() {
        let (mut wallet, log) = funded(10);
        let mut book = AccountBook::new();
        let id = approved_proposal(&mut wallet, 4);
        log.take();

        wallet.execute_transaction(owner(2), id, &mut book).unwrap();

        assert_eq!(wallet.balance(), U256::from(6u64));
        assert_eq!(book.balance_of(owner(8)), U256::from(4u64));
        assert!(wallet.get_transaction_details(id).unwrap().executed);
        assert_eq!(
            log.events(),
            vec![WalletEvent::TransactionExecuted {
                id,
                target: owner(8),
                amount: U256::from(4u64),
                payload: Bytes::new(),
            }]
        );
    }

    #[test]
    fn test_quorum_not_met() {
        let (mut wallet, _log) = funded(10);
        let mut book = AccountBook::new();
        let id = wallet
            .propose_transaction(owner(1), owner(8), U256::from(1u64), Bytes::new())
            .unwrap();
        wallet.approve_transaction(owner(2), id).unwrap();

        let err = wallet.execute_transaction(owner(1), id, &mut book).unwrap_err();
        assert_eq!(
            err,
            WalletError::QuorumNotMet {
                id,
                approvals: 1,
                required: 2
            }
        );
        assert!(!wallet.get_transaction_details(id).unwrap().executed);
    }

    #[test]
    fn test_insufficient_balance_reverts_flag() {
        let (mut wallet, log) = funded(3);
        let mut book = AccountBook::new();
        let id = approved_proposal(&mut wallet, 5);
        log.take();

        let err = wallet.execute_transaction(owner(1), id, &mut book).unwrap_err();
        assert_eq!(
            err,
            WalletError::InsufficientBalance {
                id,
                required: U256::from(5u64),
                available: U256::from(3u64),
            }
        );
        assert!(!wallet.get_transaction_details(id).unwrap().executed);
        assert_eq!(wallet.balance(), U256::from(3u64));
        assert!(book.deliveries().is_empty());
        assert!(log.is_empty());

        // Topping up makes the same transaction executable.
        wallet.deposit(owner(9), U256::from(2u64)).unwrap();
        wallet.execute_transaction(owner(1), id, &mut book).unwrap();
        assert_eq!(wallet.balance(), U256::ZERO);
    }

    #[test]
    fn test_rejected_transfer_rolls_back() {
        let (mut wallet, log) = funded(10);
        let mut book = AccountBook::new().rejecting(owner(8));
        let id = approved_proposal(&mut wallet, 4);
        log.take();

        let err = wallet.execute_transaction(owner(1), id, &mut book).unwrap_err();
        assert!(matches!(err, WalletError::TransferFailed { id: 0, .. }));
        assert_eq!(wallet.balance(), U256::from(10u64));
        assert!(!wallet.get_transaction_details(id).unwrap().executed);
        assert!(log.is_empty());
    }

    #[test]
    fn test_zero_amount_execution() {
        let (mut wallet, _log) = funded(0);
        let mut book = AccountBook::new();
        let id = approved_proposal(&mut wallet, 0);

        wallet.execute_transaction(owner(3), id, &mut book).unwrap();
        assert_eq!(wallet.balance(), U256::ZERO);
        assert_eq!(book.deliveries().len(), 1);
    }

    #[test]
    fn test_deposit() {
        let (mut wallet, log) = funded(1);

        let balance = wallet.deposit(owner(42), U256::from(2u64)).unwrap();
        assert_eq!(balance, U256::from(3u64));
        assert_eq!(
            log.events(),
            vec![WalletEvent::Deposit {
                sender: owner(42),
                amount: U256::from(2u64),
                balance: U256::from(3u64),
            }]
        );
    }

    #[test]
    fn test_deposit_overflow() {
        let (mut wallet, log) = funded(1);

        let err = wallet.deposit(owner(42), U256::MAX).unwrap_err();
        assert_eq!(err, WalletError::BalanceOverflow { amount: U256::MAX });
        assert_eq!(wallet.balance(), U256::from(1u64));
        assert!(log.is_empty());
    }
}
