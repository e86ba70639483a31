//! Scripted calls against an in-memory wallet.

use alloy_primitives::{Address, Bytes, U256};
use anyhow::{Context, Result};
use multisig_wallet::{AccountBook, EventLog, MultiSigWallet, TxId, WalletConfig, WalletEvent};
use serde::{Deserialize, Serialize};

/// One call in a replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Deposit {
        from: Address,
        amount: U256,
    },
    Propose {
        caller: Address,
        target: Address,
        amount: U256,
        #[serde(default)]
        payload: Bytes,
    },
    Approve {
        caller: Address,
        id: TxId,
    },
    Execute {
        caller: Address,
        id: TxId,
    },
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::Deposit { .. } => "deposit",
            Step::Propose { .. } => "propose",
            Step::Approve { .. } => "approve",
            Step::Execute { .. } => "execute",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TxId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<WalletEvent>,
}

#[derive(Debug)]
pub struct Report {
    pub outcomes: Vec<StepOutcome>,
    pub balance: U256,
}

/// Run every step in order. Failed steps are reported, not fatal.
pub fn run(config: &WalletConfig, steps: &[Step]) -> Result<Report> {
    let log = EventLog::new();
    let mut wallet = MultiSigWallet::from_config(config)
        .context("invalid wallet configuration")?
        .with_sink(log.clone());
    let mut book = AccountBook::new();

    let mut outcomes = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let result = match step {
            Step::Deposit { from, amount } => wallet.deposit(*from, *amount).map(|_| None),
            Step::Propose {
                caller,
                target,
                amount,
                payload,
            } => wallet
                .propose_transaction(*caller, *target, *amount, payload.clone())
                .map(Some),
            Step::Approve { caller, id } => {
                wallet.approve_transaction(*caller, *id).map(|_| Some(*id))
            }
            Step::Execute { caller, id } => wallet
                .execute_transaction(*caller, *id, &mut book)
                .map(|()| Some(*id)),
        };

        let (ok, id, error) = match result {
            Ok(id) => (true, id, None),
            Err(err) => (false, None, Some(err.to_string())),
        };
        outcomes.push(StepOutcome {
            step: index,
            op: step.name(),
            ok,
            id,
            error,
            events: log.take(),
        });
    }

    Ok(Report {
        outcomes,
        balance: wallet.balance(),
    })
}
