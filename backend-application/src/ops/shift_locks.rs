use std::collections::HashMap;
use std::sync::Arc;

use backend_domain::ShiftId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes classification and fine generation per shift. Locks for
/// different shifts never contend.
#[derive(Default)]
pub struct ShiftLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ShiftLocks {
    pub async fn acquire(&self, shift_id: &ShiftId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Only the map holds idle entries.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(shift_id.as_str().to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
