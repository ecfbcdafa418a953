//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// This is the eager half of the dual expiration scheme: entries nobody
/// reads again are reclaimed here, independent of the lazy removal
/// performed on access. The task takes the write lock only for the
/// duration of a single sweep, so concurrent operations wait at most one
/// lock acquisition.
///
/// The returned JoinHandle is used to cancel the task, either on shutdown
/// or when the sweep interval changes.
pub fn spawn_cleanup_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval {:?}", interval);

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Acquire the write lock and sweep expired entries
            let removed = {
                let mut store = store.write().await;
                store.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL sweep removed {} expired entries", removed);
            } else {
                debug!("TTL sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;

    fn test_store() -> Arc<RwLock<CacheStore<String>>> {
        Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = test_store();

        {
            let mut store = store.write().await;
            store
                .set(
                    "expire_soon".to_string(),
                    "value".to_string(),
                    Some(Duration::from_millis(10)),
                )
                .unwrap();
        }

        let handle = spawn_cleanup_task(Arc::clone(&store), Duration::from_millis(20));

        // Wait for the entry to expire and the sweep to run
        tokio::time::sleep(Duration::from_millis(100)).await;

        // No read touched the entry; only the sweep can have reclaimed it
        assert_eq!(store.read().await.len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = test_store();

        {
            let mut store = store.write().await;
            store
                .set(
                    "long_lived".to_string(),
                    "value".to_string(),
                    Some(Duration::from_secs(3600)),
                )
                .unwrap();
        }

        let handle = spawn_cleanup_task(Arc::clone(&store), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.write().await.get("long_lived"), Some("value".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = test_store();

        let handle = spawn_cleanup_task(Arc::clone(&store), Duration::from_millis(20));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");

        // With no sweep, an expired entry stays until something reads it
        {
            let mut store = store.write().await;
            store
                .set(
                    "lingering".to_string(),
                    "value".to_string(),
                    Some(Duration::from_millis(10)),
                )
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.read().await.len(), 1);
    }
}
