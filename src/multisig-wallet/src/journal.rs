//! Undo journal providing all-or-nothing wallet operations.
//!
//! Each public mutating call opens a frame. Mutations append undo records and notifications are
//! buffered; on failure the frame's records are unwound newest-first and its notifications are
//! dropped. Frames nest when a transfer collaborator re-enters the wallet.
//!
//! A committed frame is final at any depth: its undo records are discarded and its notifications
//! released, even while an enclosing frame is still open. A nested execution has already handed
//! value to its target by the time it commits, and an enclosing failure cannot take that back.
//! Undo records only ever describe relative changes (`Debited`, `Credited`) or per-id flags, so
//! unwinding an outer frame stays correct around the committed inner effects.

use alloy_primitives::{Address, U256};
use multisig_wallet_types::{TxId, WalletEvent};

/// Inverse of one state mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Undo {
    Proposed(TxId),
    Approved { id: TxId, owner: Address },
    Executed(TxId),
    Debited(U256),
    Credited(U256),
}

/// Position of the journal when a frame opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint {
    undo_len: usize,
    events_len: usize,
    depth: usize,
}

#[derive(Debug, Default)]
pub struct Journal {
    undo: Vec<Undo>,
    pending: Vec<WalletEvent>,
    depth: usize,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            undo_len: self.undo.len(),
            events_len: self.pending.len(),
            depth: self.depth,
        }
    }

    pub fn record(&mut self, undo: Undo) {
        self.undo.push(undo);
    }

    pub fn record_event(&mut self, event: WalletEvent) {
        self.pending.push(event);
    }

    /// Close a frame successfully. Its undo records are dropped and the notifications it
    /// buffered are returned for delivery.
    pub fn commit(&mut self, checkpoint: Checkpoint) -> Vec<WalletEvent> {
        debug_assert_eq!(checkpoint.depth, self.depth, "journal frames closed out of order");
        self.depth -= 1;
        self.undo.truncate(checkpoint.undo_len);
        self.pending.split_off(checkpoint.events_len)
    }

    /// Close a frame after a failure. Returns its undo records newest-first.
    pub fn rollback(&mut self, checkpoint: Checkpoint) -> Vec<Undo> {
        debug_assert_eq!(checkpoint.depth, self.depth, "journal frames closed out of order");
        self.depth -= 1;
        self.pending.truncate(checkpoint.events_len);
        let mut undone = self.undo.split_off(checkpoint.undo_len);
        undone.reverse();
        undone
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_idle(&self) -> bool {
        self.depth == 0 && self.undo.is_empty() && self.pending.is_empty()
    }
}
