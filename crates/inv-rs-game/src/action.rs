//! Slot change actions: the unit of work inside an inventory
//! transaction.

use inv_rs_item::ItemStack;

use crate::broadcast;
use crate::container::{Container, ContainerId, ContainerSet};
use crate::error::TransactionError;
use crate::player::{PlayerSession, SessionId, WindowId};

/// A proposed change to one slot of one open container.
///
/// Carries the client's view of the slot (`source_item`) and the value
/// it wants stored there (`target_item`). The server re-checks the live
/// slot against `source_item` before committing, so anything that
/// mutated the slot after the client formed its proposal is detected
/// and the whole transaction rejected. The expectation fields are never
/// mutated; validity is always decided from server state.
///
/// An action is consumed by a single transaction attempt. The container
/// reference starts out unresolved; calling any operation other than
/// [`resolve`](Self::resolve) first is a caller bug and panics.
#[derive(Debug)]
pub struct SlotChangeAction {
    window_id: WindowId,
    slot: usize,
    source_item: ItemStack,
    target_item: ItemStack,
    container: Option<ContainerId>,
}

impl SlotChangeAction {
    /// Create an action changing `source_item` into `target_item` in
    /// slot `slot` of the container open under `window_id`.
    pub fn new(
        source_item: ItemStack,
        target_item: ItemStack,
        window_id: WindowId,
        slot: usize,
    ) -> Self {
        Self {
            window_id,
            slot,
            source_item,
            target_item,
            container: None,
        }
    }

    /// The window ID this action targets.
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    /// The slot this action modifies.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The item the client believes currently occupies the slot.
    pub fn source_item(&self) -> &ItemStack {
        &self.source_item
    }

    /// The item the action will place into the slot.
    pub fn target_item(&self) -> &ItemStack {
        &self.target_item
    }

    /// The resolved container, or None before [`resolve`](Self::resolve)
    /// has run.
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Look up the container `player` has open under this action's
    /// window ID. Must be called once, before any other operation.
    ///
    /// Failure means the client referenced a window it does not have
    /// open (desynced or malicious); the enclosing transaction must be
    /// aborted without touching any container.
    pub fn resolve(&mut self, player: &PlayerSession) -> Result<ContainerId, TransactionError> {
        let container =
            player
                .window(self.window_id)
                .ok_or_else(|| TransactionError::NoSuchContainer {
                    player: player.name().to_string(),
                    window_id: self.window_id,
                })?;
        self.container = Some(container);
        Ok(container)
    }

    fn resolved<'a>(&self, containers: &'a ContainerSet) -> &'a dyn Container {
        let id = self
            .container
            .expect("slot change action used before resolve()");
        containers
            .get(id)
            .expect("resolved container is no longer registered")
    }

    fn resolved_mut<'a>(&self, containers: &'a mut ContainerSet) -> &'a mut dyn Container {
        let id = self
            .container
            .expect("slot change action used before resolve()");
        containers
            .get_mut(id)
            .expect("resolved container is no longer registered")
    }

    /// Whether the live slot still matches `source_item` exactly (same
    /// item and same count).
    ///
    /// This is the optimistic-concurrency check run in place of any
    /// locking. Read-only; repeated calls without an intervening
    /// mutation return the same answer.
    pub fn is_valid(&self, containers: &ContainerSet) -> bool {
        self.resolved(containers)
            .item(self.slot)
            .same_item_and_count(&self.source_item)
    }

    /// Whether the live slot already holds `target_item`.
    ///
    /// Used to short-circuit duplicate resends: such actions are
    /// trivially satisfied and skipped instead of re-executed.
    pub fn is_already_done(&self, containers: &ContainerSet) -> bool {
        self.resolved(containers)
            .item(self.slot)
            .same_item_and_count(&self.target_item)
    }

    /// Write `target_item` into the slot, suppressing the container's
    /// own viewer notification; the notify step broadcasts explicitly.
    /// Returns false if the container refused the write.
    pub fn execute(&self, containers: &mut ContainerSet) -> bool {
        let slot = self.slot;
        let item = self.target_item.clone();
        self.resolved_mut(containers).set_item(slot, item, false)
    }

    /// Queue the new slot contents to every viewer except the
    /// initiator, which already holds the correct state having proposed
    /// it.
    pub fn on_execute_success(&self, containers: &mut ContainerSet, source: SessionId) {
        broadcast::send_slot_to_others(self.resolved_mut(containers), self.slot, source);
    }

    /// Queue the authoritative slot contents to the initiator only,
    /// forcing its speculative local change to revert. Other viewers
    /// never saw the proposed value, so they are left alone.
    pub fn on_execute_fail(&self, containers: &mut ContainerSet, source: SessionId) {
        broadcast::send_slot_to(self.resolved_mut(containers), self.slot, source);
    }
}
