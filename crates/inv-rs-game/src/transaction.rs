//! Batched inventory transactions: validate every action, then commit
//! them all, or reject the batch and resync the initiating client.
//!
//! One transaction runs synchronously, end to end, on the simulation
//! step of the initiating player. Shared containers may still be
//! touched by other transactions in the same tick pass; the per-action
//! revalidation immediately before commit is the only guard, so a
//! drifted slot rejects the batch instead of corrupting state.

use tracing::debug;

use crate::action::SlotChangeAction;
use crate::container::ContainerSet;
use crate::error::TransactionError;
use crate::player::PlayerSession;

/// An ordered batch of slot changes that must all validate for any of
/// them to commit.
#[derive(Debug, Default)]
pub struct InventoryTransaction {
    actions: Vec<SlotChangeAction>,
}

impl InventoryTransaction {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Append a proposed slot change to the batch.
    pub fn add_action(&mut self, action: SlotChangeAction) {
        self.actions.push(action);
    }

    /// The proposed slot changes, in submission order.
    pub fn actions(&self) -> &[SlotChangeAction] {
        &self.actions
    }

    /// Run the batch to completion for `player`.
    ///
    /// Returns `Ok(true)` if every action validated and committed, and
    /// `Ok(false)` if the batch was rejected; in that case the
    /// initiator has been queued an authoritative resync for every
    /// touched slot and no success broadcasts go out. `Err` means an
    /// action referenced a window the player does not have open; that
    /// is fatal and nothing is written or queued.
    pub fn execute(
        mut self,
        player: &PlayerSession,
        containers: &mut ContainerSet,
    ) -> Result<bool, TransactionError> {
        for action in &mut self.actions {
            action.resolve(player)?;
        }

        // Validation pass. An action whose target is already in place
        // is a duplicate resend: trivially satisfied, skipped below.
        let mut pending = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            if action.is_already_done(containers) {
                debug!(
                    "slot {} of window {} already matches the target, skipping",
                    action.slot(),
                    action.window_id()
                );
                continue;
            }
            if !action.is_valid(containers) {
                debug!(
                    "rejecting transaction from {}: slot {} of window {} drifted",
                    player.name(),
                    action.slot(),
                    action.window_id()
                );
                self.fail(player, containers);
                return Ok(false);
            }
            pending.push(index);
        }

        // Commit pass. A container can still refuse a write that passed
        // validation; that takes the same path as a validation failure.
        for &index in &pending {
            let action = &self.actions[index];
            if !action.execute(containers) {
                debug!(
                    "rejecting transaction from {}: container refused write to slot {} of window {}",
                    player.name(),
                    action.slot(),
                    action.window_id()
                );
                self.fail(player, containers);
                return Ok(false);
            }
        }

        for &index in &pending {
            self.actions[index].on_execute_success(containers, player.session_id());
        }
        Ok(true)
    }

    /// Queue the authoritative contents of every touched slot back to
    /// the initiator so its speculative local changes revert.
    fn fail(&self, player: &PlayerSession, containers: &mut ContainerSet) {
        for action in &self.actions {
            action.on_execute_fail(containers, player.session_id());
        }
    }
}
