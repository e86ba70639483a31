//! Prints the wallet's ABI surface: event topics and custom-error selectors.

use alloy_sol_types::{SolError, SolEvent};
use multisig_wallet::errors::abi as errors;
use multisig_wallet_types::events::abi as events;

fn main() {
    println!("// events (topic0  signature)");
    print_event::<events::Deposit>();
    print_event::<events::TransactionProposed>();
    print_event::<events::TransactionApproved>();
    print_event::<events::TransactionExecuted>();

    println!("// errors (selector  signature)");
    print_error::<errors::InvalidConfiguration>();
    print_error::<errors::NotAnOwner>();
    print_error::<errors::TransactionNotFound>();
    print_error::<errors::AlreadyApproved>();
    print_error::<errors::AlreadyExecuted>();
    print_error::<errors::NotEnoughApprovals>();
    print_error::<errors::InsufficientBalance>();
    print_error::<errors::TransferFailed>();
    print_error::<errors::BalanceOverflow>();
}

fn print_event<E: SolEvent>() {
    println!("{}  {}", E::SIGNATURE_HASH, E::SIGNATURE);
}

fn print_error<E: SolError>() {
    println!("0x{}  {}", hex::encode(E::SELECTOR), E::SIGNATURE);
}
