//! Containers: slot-indexed item stores with viewer tracking.
//!
//! Containers queue outbound slot updates instead of sending them;
//! the connection layer drains the queue and encodes the packets.

use std::collections::{BTreeSet, HashMap};

use inv_rs_item::ItemStack;

use crate::player::SessionId;

/// Number of slots in a single chest.
pub const CHEST_SLOTS: usize = 27;
/// Number of slots in the player's main inventory.
pub const PLAYER_INVENTORY_SLOTS: usize = 36;
/// Default maximum stack size accepted by a container slot.
pub const MAX_STACK_SIZE: u16 = 64;

/// Stable ID of a container registered in a [`ContainerSet`].
pub type ContainerId = u32;

/// Authoritative slot contents queued for delivery to one session.
#[derive(Debug, Clone)]
pub struct SlotUpdate {
    /// Session the update is addressed to.
    pub recipient: SessionId,
    /// Slot index within the container.
    pub slot: usize,
    /// The slot's contents at the time the update was queued.
    pub item: ItemStack,
}

/// A slot-indexed item store with a set of viewing sessions.
///
/// Base abstraction for anything that holds items: chests, player
/// inventories, crafting grids.
pub trait Container {
    /// Number of slots.
    fn size(&self) -> usize;

    /// The item in `slot`.
    ///
    /// Panics if `slot` is out of range: an invalid index is a caller
    /// bug, not a recoverable condition.
    fn item(&self, slot: usize) -> &ItemStack;

    /// Write `item` into `slot`. Returns false and leaves the slot
    /// unchanged if the container refuses the item.
    ///
    /// When `notify` is true the new contents are queued to every
    /// current viewer. Callers that broadcast explicitly afterwards
    /// (the transaction commit path) pass false.
    fn set_item(&mut self, slot: usize, item: ItemStack, notify: bool) -> bool;

    /// Whether `item` may be stored in `slot`.
    fn can_place_item(&self, _slot: usize, _item: &ItemStack) -> bool {
        true
    }

    /// Sessions currently viewing this container.
    fn viewers(&self) -> &BTreeSet<SessionId>;

    /// Start tracking `session` as a viewer.
    fn add_viewer(&mut self, session: SessionId);

    /// Stop tracking `session` as a viewer.
    fn remove_viewer(&mut self, session: SessionId);

    /// Queue the current contents of `slot` to each recipient.
    fn send_slot_update(&mut self, slot: usize, recipients: &[SessionId]);

    /// Take all queued slot updates for delivery.
    fn drain_updates(&mut self) -> Vec<SlotUpdate>;

    /// True if every slot is empty.
    fn is_empty(&self) -> bool {
        (0..self.size()).all(|slot| self.item(slot).is_empty())
    }
}

/// A Vec-backed container with a fixed slot count.
#[derive(Debug)]
pub struct SimpleContainer {
    items: Vec<ItemStack>,
    viewers: BTreeSet<SessionId>,
    max_stack_size: u16,
    updates: Vec<SlotUpdate>,
}

impl SimpleContainer {
    /// Create an empty container with `size` slots.
    pub fn new(size: usize) -> Self {
        Self::with_max_stack_size(size, MAX_STACK_SIZE)
    }

    /// Create an empty container that refuses stacks larger than
    /// `max_stack_size`.
    pub fn with_max_stack_size(size: usize, max_stack_size: u16) -> Self {
        Self {
            items: (0..size).map(|_| ItemStack::empty()).collect(),
            viewers: BTreeSet::new(),
            max_stack_size,
            updates: Vec::new(),
        }
    }
}

impl Container for SimpleContainer {
    fn size(&self) -> usize {
        self.items.len()
    }

    fn item(&self, slot: usize) -> &ItemStack {
        &self.items[slot]
    }

    fn set_item(&mut self, slot: usize, item: ItemStack, notify: bool) -> bool {
        if !self.can_place_item(slot, &item) {
            return false;
        }
        self.items[slot] = item;
        if notify {
            let viewers: Vec<SessionId> = self.viewers.iter().copied().collect();
            self.send_slot_update(slot, &viewers);
        }
        true
    }

    fn can_place_item(&self, _slot: usize, item: &ItemStack) -> bool {
        item.count <= self.max_stack_size
    }

    fn viewers(&self) -> &BTreeSet<SessionId> {
        &self.viewers
    }

    fn add_viewer(&mut self, session: SessionId) {
        self.viewers.insert(session);
    }

    fn remove_viewer(&mut self, session: SessionId) {
        self.viewers.remove(&session);
    }

    fn send_slot_update(&mut self, slot: usize, recipients: &[SessionId]) {
        for &recipient in recipients {
            self.updates.push(SlotUpdate {
                recipient,
                slot,
                item: self.items[slot].clone(),
            });
        }
    }

    fn drain_updates(&mut self) -> Vec<SlotUpdate> {
        std::mem::take(&mut self.updates)
    }
}

/// All live containers, keyed by a stable ID.
///
/// Shared containers (a chest viewed by several players) are owned here
/// and addressed by ID from each player's window table.
pub struct ContainerSet {
    containers: HashMap<ContainerId, Box<dyn Container>>,
    next_id: ContainerId,
}

impl Default for ContainerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerSet {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a container and return its assigned ID.
    pub fn insert(&mut self, container: Box<dyn Container>) -> ContainerId {
        let id = self.next_id;
        self.next_id += 1;
        self.containers.insert(id, container);
        id
    }

    pub fn get(&self, id: ContainerId) -> Option<&dyn Container> {
        self.containers.get(&id).map(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut (dyn Container + '_)> {
        self.containers
            .get_mut(&id)
            .map(|c| -> &mut (dyn Container + '_) { c.as_mut() })
    }

    /// Unregister a container (e.g. its block was destroyed).
    pub fn remove(&mut self, id: ContainerId) -> Option<Box<dyn Container>> {
        self.containers.remove(&id)
    }

    /// Take the queued slot updates of every container, tagged with the
    /// container they belong to.
    pub fn drain_updates(&mut self) -> Vec<(ContainerId, SlotUpdate)> {
        let mut all = Vec::new();
        for (&id, container) in &mut self.containers {
            for update in container.drain_updates() {
                all.push((id, update));
            }
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_container_is_empty() {
        let chest = SimpleContainer::new(CHEST_SLOTS);
        assert_eq!(chest.size(), CHEST_SLOTS);
        assert!(chest.is_empty());
    }

    #[test]
    fn set_item_stores_and_reads_back() {
        let mut chest = SimpleContainer::new(CHEST_SLOTS);
        assert!(chest.set_item(3, ItemStack::new(1, 12), false)); // stone
        assert_eq!(chest.item(3).runtime_id, 1);
        assert_eq!(chest.item(3).count, 12);
        assert!(!chest.is_empty());
    }

    #[test]
    fn set_item_without_notify_queues_nothing() {
        let mut chest = SimpleContainer::new(CHEST_SLOTS);
        chest.add_viewer(1);
        chest.set_item(0, ItemStack::new(1, 4), false);
        assert!(chest.drain_updates().is_empty());
    }

    #[test]
    fn set_item_with_notify_queues_to_all_viewers() {
        let mut chest = SimpleContainer::new(CHEST_SLOTS);
        chest.add_viewer(1);
        chest.add_viewer(2);
        chest.set_item(5, ItemStack::new(3, 8), true); // dirt

        let updates = chest.drain_updates();
        assert_eq!(updates.len(), 2);
        let recipients: Vec<_> = updates.iter().map(|u| u.recipient).collect();
        assert_eq!(recipients, vec![1, 2]);
        for update in &updates {
            assert_eq!(update.slot, 5);
            assert_eq!(update.item.runtime_id, 3);
            assert_eq!(update.item.count, 8);
        }
    }

    #[test]
    fn oversized_stack_is_refused() {
        let mut hopper = SimpleContainer::with_max_stack_size(5, 16);
        assert!(!hopper.set_item(0, ItemStack::new(1, 17), false));
        assert!(hopper.item(0).is_empty());
        assert!(hopper.set_item(0, ItemStack::new(1, 16), false));
        assert_eq!(hopper.item(0).count, 16);
    }

    #[test]
    fn viewers_can_be_added_and_removed() {
        let mut chest = SimpleContainer::new(CHEST_SLOTS);
        chest.add_viewer(7);
        chest.add_viewer(8);
        assert_eq!(chest.viewers().len(), 2);
        chest.remove_viewer(7);
        assert!(!chest.viewers().contains(&7));
        assert!(chest.viewers().contains(&8));
    }

    #[test]
    fn send_slot_update_reads_current_contents() {
        let mut chest = SimpleContainer::new(CHEST_SLOTS);
        chest.set_item(2, ItemStack::new(5, 3), false); // planks
        chest.send_slot_update(2, &[9]);

        let updates = chest.drain_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].recipient, 9);
        assert_eq!(updates[0].item.runtime_id, 5);
        assert!(chest.drain_updates().is_empty());
    }

    #[test]
    fn container_set_assigns_distinct_ids() {
        let mut containers = ContainerSet::new();
        let a = containers.insert(Box::new(SimpleContainer::new(CHEST_SLOTS)));
        let b = containers.insert(Box::new(SimpleContainer::new(PLAYER_INVENTORY_SLOTS)));
        assert_ne!(a, b);
        assert_eq!(containers.get(a).map(|c| c.size()), Some(CHEST_SLOTS));
        assert_eq!(
            containers.get(b).map(|c| c.size()),
            Some(PLAYER_INVENTORY_SLOTS)
        );
    }

    #[test]
    fn container_set_remove_unregisters() {
        let mut containers = ContainerSet::new();
        let id = containers.insert(Box::new(SimpleContainer::new(1)));
        assert!(containers.remove(id).is_some());
        assert!(containers.get(id).is_none());
        assert!(containers.remove(id).is_none());
    }

    #[test]
    fn container_set_drains_updates_with_ids() {
        let mut containers = ContainerSet::new();
        let id = containers.insert(Box::new(SimpleContainer::new(1)));
        let chest = containers.get_mut(id).unwrap();
        chest.set_item(0, ItemStack::new(1, 1), false);
        chest.send_slot_update(0, &[4]);

        let updates = containers.drain_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, id);
        assert_eq!(updates[0].1.recipient, 4);
        assert!(containers.drain_updates().is_empty());
    }
}
