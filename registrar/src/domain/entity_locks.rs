//! Keyed async locks serialising read-validate-write cycles per entity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per key, created on first use.
///
/// Guards are owned so they can be held across `.await` points. Entries are
/// never evicted; the key space is bounded by the catalogue and student
/// roster.
#[derive(Debug, Default)]
pub struct EntityLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl EntityLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_owned()).or_default())
        };
        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn distinct_keys_do_not_block_each_other() {
        let locks = EntityLocks::new();
        let _first = locks.acquire("KRIP101").await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire("MATH101"))
            .await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn same_key_waits_for_release() {
        let locks = EntityLocks::new();
        let guard = locks.acquire("KRIP101").await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(20), locks.acquire("KRIP101")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("KRIP101")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn guarded_sections_never_overlap() {
        let locks = Arc::new(EntityLocks::new());
        let inside = Arc::new(AtomicU32::new(0));
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let locks = Arc::clone(&locks);
            let inside = Arc::clone(&inside);
            tasks.push(tokio::spawn(async move {
                let _guard = locks.acquire("KRIP101").await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for task in tasks {
            task.await.expect("task completes");
        }
    }
}
