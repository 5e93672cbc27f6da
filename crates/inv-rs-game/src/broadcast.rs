//! Pushing authoritative slot contents to container viewers.

use crate::container::Container;
use crate::player::SessionId;

/// Queue the current contents of `slot` to every viewer of `container`
/// except `except`. A container with no other viewers is a no-op.
pub fn send_slot_to_others(container: &mut dyn Container, slot: usize, except: SessionId) {
    let recipients: Vec<SessionId> = container
        .viewers()
        .iter()
        .copied()
        .filter(|&session| session != except)
        .collect();
    if recipients.is_empty() {
        return;
    }
    container.send_slot_update(slot, &recipients);
}

/// Queue the current contents of `slot` to exactly one session.
pub fn send_slot_to(container: &mut dyn Container, slot: usize, target: SessionId) {
    container.send_slot_update(slot, &[target]);
}
