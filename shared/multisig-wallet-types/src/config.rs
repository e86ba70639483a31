use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// Construction arguments for a wallet instance.
///
/// Addresses are hex strings; `initialFunding` is a quantity string (`"0x..."` or decimal).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub owners: Vec<Address>,
    pub required_approvals: u64,
    #[serde(default)]
    pub initial_funding: U256,
}

impl WalletConfig {
    /// ABI encoding of `(address[] owners, uint256 requiredApprovals, uint256 initialFunding)`.
    pub fn constructor_args(&self) -> Vec<u8> {
        (
            self.owners.clone(),
            U256::from(self.required_approvals),
            self.initial_funding,
        )
            .abi_encode_params()
    }
}
