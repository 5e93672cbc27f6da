//! Player sessions and their open container windows.
//!
//! Window IDs are scoped to one session: two players looking at the
//! same chest each address it through their own window ID.

use std::collections::HashMap;

use crate::container::ContainerId;

/// Stable identity of one connected client session.
pub type SessionId = u64;

/// Client-facing ID of an open container window.
pub type WindowId = u8;

/// Window ID of the player's own inventory, open for the whole session.
pub const WINDOW_INVENTORY: WindowId = 0;

/// One connected player and the containers it currently has open.
#[derive(Debug)]
pub struct PlayerSession {
    session_id: SessionId,
    name: String,
    windows: HashMap<WindowId, ContainerId>,
    /// Next window ID to assign when opening a container.
    next_window_id: WindowId,
}

impl PlayerSession {
    pub fn new(session_id: SessionId, name: impl Into<String>) -> Self {
        Self {
            session_id,
            name: name.into(),
            windows: HashMap::new(),
            next_window_id: 1,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record `container` as open under a freshly assigned window ID.
    pub fn open_window(&mut self, container: ContainerId) -> WindowId {
        let window_id = self.next_window_id;
        // Window 0 is reserved for the player's own inventory.
        self.next_window_id = self.next_window_id.checked_add(1).unwrap_or(1);
        self.windows.insert(window_id, container);
        window_id
    }

    /// Record `container` as open under a fixed window ID. Used for the
    /// always-open windows such as [`WINDOW_INVENTORY`].
    pub fn set_window(&mut self, window_id: WindowId, container: ContainerId) {
        self.windows.insert(window_id, container);
    }

    /// The container open under `window_id`, if any.
    pub fn window(&self, window_id: WindowId) -> Option<ContainerId> {
        self.windows.get(&window_id).copied()
    }

    /// Forget a window, returning the container that was open under it.
    pub fn close_window(&mut self, window_id: WindowId) -> Option<ContainerId> {
        self.windows.remove(&window_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_window_assigns_sequential_ids() {
        let mut player = PlayerSession::new(1, "Steve");
        let a = player.open_window(10);
        let b = player.open_window(11);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(player.window(a), Some(10));
        assert_eq!(player.window(b), Some(11));
    }

    #[test]
    fn window_zero_is_reserved_for_inventory() {
        let mut player = PlayerSession::new(1, "Steve");
        player.set_window(WINDOW_INVENTORY, 42);
        assert_eq!(player.window(WINDOW_INVENTORY), Some(42));

        // Dynamic allocation never hands out window 0, even after the
        // u8 counter wraps.
        for _ in 0..300 {
            assert_ne!(player.open_window(5), WINDOW_INVENTORY);
        }
    }

    #[test]
    fn unknown_window_is_none() {
        let player = PlayerSession::new(1, "Steve");
        assert_eq!(player.window(99), None);
    }

    #[test]
    fn close_window_forgets_the_mapping() {
        let mut player = PlayerSession::new(1, "Steve");
        let id = player.open_window(7);
        assert_eq!(player.close_window(id), Some(7));
        assert_eq!(player.window(id), None);
        assert_eq!(player.close_window(id), None);
    }

    #[test]
    fn session_identity() {
        let player = PlayerSession::new(123, "Alex");
        assert_eq!(player.session_id(), 123);
        assert_eq!(player.name(), "Alex");
    }
}
