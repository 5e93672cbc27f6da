//! ItemStack type and the slot-level equality checks.
//!
//! Represents an item in a container slot. Equality is split into two
//! independent checks: item identity (`same_item`) and identity plus
//! count (`same_item_and_count`), because transaction validation needs
//! both separately.

/// A single item stack stored in a container slot.
///
/// `runtime_id == 0` means the slot is empty (air).
#[derive(Debug, Clone)]
pub struct ItemStack {
    /// Item runtime ID from the server's item table. 0 = air/empty.
    pub runtime_id: i32,
    /// Number of items in this stack.
    pub count: u16,
    /// Item damage/variant metadata.
    pub metadata: u16,
    /// Raw NBT data (if any). Used for enchantments, custom names, etc.
    pub nbt_data: Vec<u8>,
    /// Server-assigned unique ID for inventory tracking. 0 = no ID.
    ///
    /// Ignored by `same_item`/`same_item_and_count`: two stacks with
    /// different tracking IDs are still the same item.
    pub stack_network_id: i32,
}

impl ItemStack {
    /// An empty slot (air).
    pub fn empty() -> Self {
        Self {
            runtime_id: 0,
            count: 0,
            metadata: 0,
            nbt_data: Vec::new(),
            stack_network_id: 0,
        }
    }

    /// Create a simple item stack with no NBT or special data.
    pub fn new(runtime_id: i32, count: u16) -> Self {
        Self {
            runtime_id,
            count,
            metadata: 0,
            nbt_data: Vec::new(),
            stack_network_id: 0,
        }
    }

    /// Create an item stack with metadata and a stack network ID.
    pub fn new_with_meta(
        runtime_id: i32,
        count: u16,
        metadata: u16,
        stack_network_id: i32,
    ) -> Self {
        Self {
            runtime_id,
            count,
            metadata,
            nbt_data: Vec::new(),
            stack_network_id,
        }
    }

    /// Whether this slot is empty.
    pub fn is_empty(&self) -> bool {
        self.runtime_id == 0 || self.count == 0
    }

    /// Whether `other` is the same item: runtime ID, metadata and NBT
    /// all match. Count and stack network ID are not compared.
    pub fn same_item(&self, other: &ItemStack) -> bool {
        self.runtime_id == other.runtime_id
            && self.metadata == other.metadata
            && self.nbt_data == other.nbt_data
    }

    /// Whether `other` is the same item with the same count.
    pub fn same_item_and_count(&self, other: &ItemStack) -> bool {
        self.same_item(other) && self.count == other.count
    }
}
