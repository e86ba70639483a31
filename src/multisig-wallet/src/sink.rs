use multisig_wallet_types::{EventSink, WalletEvent};
use tracing::info;

/// Default sink: logs every committed notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &WalletEvent) {
        match event {
            WalletEvent::Deposit {
                sender,
                amount,
                balance,
            } => info!(%sender, %amount, %balance, "Deposit"),
            WalletEvent::TransactionProposed {
                id,
                proposer,
                amount,
                payload,
            } => info!(
                id,
                %proposer,
                %amount,
                payload = %hex::encode(payload),
                "TransactionProposed"
            ),
            WalletEvent::TransactionApproved { id, approver } => {
                info!(id, %approver, "TransactionApproved")
            }
            WalletEvent::TransactionExecuted {
                id,
                target,
                amount,
                payload,
            } => info!(
                id,
                %target,
                %amount,
                payload = %hex::encode(payload),
                "TransactionExecuted"
            ),
        }
    }
}
