use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::scheduling::SlotLocks;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // In-process booking locks, shared by every handler
    pub slot_locks: SlotLocks,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self {
            db,
            config,
            slot_locks: SlotLocks::default(),
        }
    }
}
