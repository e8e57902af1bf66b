//! Per-bucket mutual exclusion for position maintenance.

use crate::task::domain::BucketKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async locks keyed by bucket.
///
/// Every read-plan-write sequence over a bucket runs while holding that
/// bucket's lock, so two moves can never plan against the same snapshot.
#[derive(Debug, Default)]
pub(crate) struct BucketLocks {
    locks: Mutex<HashMap<BucketKey, Arc<AsyncMutex<()>>>>,
}

/// Held bucket locks; released on drop.
#[derive(Debug)]
pub(crate) struct BucketGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl BucketLocks {
    /// Returns the lock for `key`, dropping entries nobody holds or waits on.
    fn handle(&self, key: BucketKey) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|bucket, lock| *bucket == key || Arc::strong_count(lock) > 1);
        Arc::clone(locks.entry(key).or_default())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Locks a single bucket.
    pub(crate) async fn lock(&self, key: BucketKey) -> BucketGuard {
        let guard = self.handle(key).lock_owned().await;
        BucketGuard {
            _guards: vec![guard],
        }
    }

    /// Locks two buckets in ascending key order.
    ///
    /// Locking the same key twice takes it once.
    pub(crate) async fn lock_pair(&self, first: BucketKey, second: BucketKey) -> BucketGuard {
        if first == second {
            return self.lock(first).await;
        }
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let low_guard = self.handle(low).lock_owned().await;
        let high_guard = self.handle(high).lock_owned().await;
        BucketGuard {
            _guards: vec![low_guard, high_guard],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BucketLocks;
    use crate::task::domain::{BucketKey, TaskStatus, UserId};
    use rstest::rstest;

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn released_buckets_are_forgotten() {
        let locks = BucketLocks::default();
        let owner = UserId::new();

        for status in TaskStatus::ALL {
            drop(locks.lock(BucketKey::new(owner, status)).await);
        }
        let _held = locks.lock(BucketKey::new(UserId::new(), TaskStatus::Done)).await;

        assert_eq!(locks.tracked(), 1);
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread")]
    async fn held_buckets_survive_pruning() {
        let locks = BucketLocks::default();
        let owner = UserId::new();

        let _first = locks
            .lock_pair(
                BucketKey::new(owner, TaskStatus::Backlog),
                BucketKey::new(owner, TaskStatus::Done),
            )
            .await;
        let _second = locks.lock(BucketKey::new(owner, TaskStatus::InProgress)).await;

        assert_eq!(locks.tracked(), 3);
    }
}
