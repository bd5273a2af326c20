//! In-process serialization of the check-then-insert step.
//!
//! The remote calendar offers no compare-and-swap on a window, so two
//! concurrent bookings for the same slot can both see "available" and
//! both insert. Holding a per-(calendar, slot-start) mutex across the
//! free/busy check and the event insert closes that window within one
//! process. Requests racing from separate instances are still exposed;
//! see DESIGN.md.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct SlotLocks {
    // One entry per (calendar, slot-start) ever contested; entries are
    // tiny and never evicted for the process lifetime.
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl SlotLocks {
    /// Take the lock for one calendar window. The guard releases on
    /// drop; a second caller for the same window waits rather than
    /// failing.
    pub async fn acquire(
        &self,
        calendar_key: &str,
        slot_start: DateTime<FixedOffset>,
    ) -> OwnedMutexGuard<()> {
        let key = format!("{}:{}", calendar_key, slot_start.timestamp());
        let cell = {
            let mut map = self.inner.lock().unwrap();
            map.entry(key)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        cell.lock_owned().await
    }
}
