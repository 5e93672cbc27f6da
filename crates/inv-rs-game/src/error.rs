//! Transaction-level errors.

use thiserror::Error;

use crate::player::WindowId;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("player {player} has no open container with window ID {window_id}")]
    NoSuchContainer { player: String, window_id: WindowId },
}
