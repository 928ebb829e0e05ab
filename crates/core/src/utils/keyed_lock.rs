use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per key, created on first use and dropped with its last holder.
///
/// Used to serialize read-modify-write sequences that target the same record
/// (a loan's status cascade, an owner's breakdown resync) while letting
/// different keys proceed concurrently. The map only holds keys that are
/// locked or awaited right now.
#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyedLockGuard<'_> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        KeyedLockGuard {
            guard: Some(lock.lock_owned().await),
            locks: &self.locks,
            key: key.to_string(),
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Holds one key's lock; releasing the last reference evicts the key.
pub struct KeyedLockGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
}

impl Drop for KeyedLockGuard<'_> {
    fn drop(&mut self) {
        // Release first so the guard's own reference is gone before the count check.
        drop(self.guard.take());
        // Waiters hold a clone, so a count of one means nobody else wants the key.
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock("loan-1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("loan-1").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _first = locks.lock("owner-1").await;
        let _second = locks.lock("owner-2").await;
    }

    #[tokio::test]
    async fn test_released_keys_are_evicted() {
        let locks = KeyedLocks::new();
        for i in 0..100 {
            let _guard = locks.lock(&format!("loan-{}", i)).await;
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_key_with_waiter_survives_release() {
        let locks = Arc::new(KeyedLocks::new());
        let guard = locks.lock("owner-1").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("owner-1").await;
                locks.len()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);

        assert_eq!(waiter.await.unwrap(), 1);
        assert!(locks.is_empty());
    }
}
