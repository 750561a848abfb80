//! Read-through cache with single-flight fetches.
//!
//! The page keeps its fetched profile under one logical key and invalidates
//! it after every successful write, so the next read observes the stored
//! value. Concurrent reads of the same key share one in-flight request
//! instead of stacking duplicates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

use crate::repositories::profile_supabase_repo::StoreError;

type Flight<T> = Shared<BoxFuture<'static, Result<T, StoreError>>>;

enum Entry<T: Clone> {
    Ready(T),
    InFlight(u64, Flight<T>),
}

pub struct QueryCache<T: Clone + Send + Sync + 'static> {
    next_flight: AtomicU64,
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            next_flight: AtomicU64::new(0),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or runs `fetch` to produce one.
    /// If a fetch for the key is already running, the caller awaits that
    /// same fetch. Failed fetches are not cached; the next call tries again.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, StoreError>>,
    {
        let (flight_id, flight) = {
            let mut entries = self.entries.lock().await;
            match entries.get(key) {
                Some(Entry::Ready(value)) => return Ok(value.clone()),
                Some(Entry::InFlight(id, flight)) => (*id, flight.clone()),
                None => {
                    let id = self.next_flight.fetch_add(1, Ordering::Relaxed);
                    let flight = fetch().shared();
                    entries.insert(key.to_string(), Entry::InFlight(id, flight.clone()));
                    (id, flight)
                }
            }
        };

        let result = flight.await;

        // Store the outcome only if this flight still owns the slot; an
        // invalidation that raced the fetch wins over the late result.
        let mut entries = self.entries.lock().await;
        if let Some(Entry::InFlight(id, _)) = entries.get(key) {
            if *id == flight_id {
                match &result {
                    Ok(value) => {
                        entries.insert(key.to_string(), Entry::Ready(value.clone()));
                    }
                    Err(_) => {
                        entries.remove(key);
                    }
                }
            }
        }

        result
    }

    /// Drops the cached value (or in-flight claim) for `key`, so the next
    /// read fetches fresh.
    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

impl<T: Clone + Send + Sync + 'static> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: &str,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<String, StoreError>> {
        let calls = Arc::clone(calls);
        let value = value.to_string();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_fetch("profile", counting_fetch(&calls, "a"))
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("profile", counting_fetch(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(first, "a");
        assert_eq!(second, "a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_flight() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.get_or_fetch("profile", counting_fetch(&calls, "a")),
            cache.get_or_fetch("profile", counting_fetch(&calls, "a")),
        );

        assert_eq!(a.unwrap(), "a");
        assert_eq!(b.unwrap(), "a");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(StoreError::Query("offline".into())) }.boxed()
            }
        };
        let err = cache.get_or_fetch("profile", failing).await.unwrap_err();
        assert_eq!(err, StoreError::Query("offline".into()));

        let value = cache
            .get_or_fetch("profile", counting_fetch(&calls, "a"))
            .await
            .unwrap();
        assert_eq!(value, "a");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch("profile", counting_fetch(&calls, "a"))
            .await
            .unwrap();
        cache.invalidate("profile").await;
        let value = cache
            .get_or_fetch("profile", counting_fetch(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(value, "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_during_a_flight_discards_the_late_result() {
        let cache = Arc::new(QueryCache::new());
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let reader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_fetch("profile", move || {
                        async move {
                            let _ = release_rx.await;
                            Ok::<_, StoreError>("stale".to_string())
                        }
                        .boxed()
                    })
                    .await
            })
        };

        // Let the flight register before invalidating it.
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.invalidate("profile").await;
        release_tx.send(()).unwrap();

        // The waiting caller still gets the value it asked for...
        assert_eq!(reader.await.unwrap().unwrap(), "stale");

        // ...but the cache does not resurrect it.
        let calls = Arc::new(AtomicUsize::new(0));
        let fresh = cache
            .get_or_fetch("profile", counting_fetch(&calls, "fresh"))
            .await
            .unwrap();
        assert_eq!(fresh, "fresh");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
