use kanban_domain::BoardId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// One async mutex per board, created on first use. Entries live until the
/// board is deleted, so the map holds one small entry per board touched.
#[derive(Debug, Default)]
pub struct BoardLocks {
    enabled: bool,
    locks: Mutex<HashMap<BoardId, Arc<tokio::sync::Mutex<()>>>>,
}

impl BoardLocks {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `board_id`. Returns `None` when locking is
    /// disabled.
    pub async fn acquire(&self, board_id: BoardId) -> Option<OwnedMutexGuard<()>> {
        if !self.enabled {
            return None;
        }
        let lock = self.locks.lock().entry(board_id).or_default().clone();
        Some(lock.lock_owned().await)
    }

    pub fn forget(&self, board_id: BoardId) {
        self.locks.lock().remove(&board_id);
    }
}
