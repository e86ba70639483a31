//! Fixed owner set and approval threshold.

use alloy_primitives::Address;

use crate::errors::{ConfigViolation, WalletError};

/// Owners and threshold, validated once and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnerRegistry {
    owners: Vec<Address>,
    required_approvals: u64,
}

impl OwnerRegistry {
    /// Validate and store the owner set.
    ///
    /// Rejects an empty list, a zero threshold, fewer owners than the threshold, the zero
    /// address, and repeated owners.
    pub fn new(owners: Vec<Address>, required_approvals: u64) -> Result<Self, WalletError> {
        if owners.is_empty() {
            return Err(ConfigViolation::NoOwners.into());
        }
        if required_approvals == 0 {
            return Err(ConfigViolation::ZeroThreshold.into());
        }
        if (owners.len() as u64) < required_approvals {
            return Err(ConfigViolation::ThresholdExceedsOwners {
                threshold: required_approvals,
                owners: owners.len(),
            }
            .into());
        }

        for (index, owner) in owners.iter().enumerate() {
            if *owner == Address::ZERO {
                return Err(ConfigViolation::ZeroOwner { index }.into());
            }
            if owners[..index].contains(owner) {
                return Err(ConfigViolation::DuplicateOwner { owner: *owner }.into());
            }
        }

        Ok(Self {
            owners,
            required_approvals,
        })
    }

    pub fn is_owner(&self, identity: Address) -> bool {
        self.owners.contains(&identity)
    }

    /// Gate for every owner-only entry point.
    pub fn ensure_owner(&self, caller: Address) -> Result<(), WalletError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(WalletError::Unauthorized { caller })
        }
    }

    pub fn required_approvals(&self) -> u64 {
        self.required_approvals
    }

    /// Owners in construction order.
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
