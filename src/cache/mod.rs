//! TTL-bounded snapshot cache over a history fetcher.
//!
//! The helper protocol has no request ids, so at most one fetch may run at a
//! time; the cache guarantees that with a single async mutex around the
//! fetcher. Concurrent callers past the TTL all wait on the same refresh
//! instead of issuing their own, and callers inside the TTL never touch the
//! fetcher at all.

use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::SessionError;
use crate::models::HistoryItem;
use crate::session::ClipboardSession;

/// Matches the refresh interval of the upstream clipboard viewer.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(3000);

/// Source of history snapshots. Implemented by the live session; tests
/// substitute mocks to exercise cache behavior without a process.
pub trait HistoryFetcher {
    fn fetch(
        &mut self,
    ) -> impl Future<Output = Result<Vec<HistoryItem>, SessionError>> + Send;
}

impl HistoryFetcher for ClipboardSession {
    async fn fetch(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
        ClipboardSession::fetch(self).await
    }
}

/// One cached snapshot. Replaced wholesale on every successful refresh,
/// never mutated in place.
#[derive(Debug, Clone)]
struct CacheEntry {
    updated_at: Instant,
    items: Vec<HistoryItem>,
}

pub struct HistoryCache<F> {
    fetcher: Mutex<F>,
    entry: Mutex<Option<CacheEntry>>,
    ttl: Duration,
}

impl<F: HistoryFetcher> HistoryCache<F> {
    pub fn new(fetcher: F, ttl: Duration) -> Self {
        Self { fetcher: Mutex::new(fetcher), entry: Mutex::new(None), ttl }
    }

    /// Cache that starts out fresh with `items`, as produced by the
    /// session's initial round trip.
    pub fn primed(fetcher: F, ttl: Duration, items: Vec<HistoryItem>) -> Self {
        let entry = CacheEntry { updated_at: Instant::now(), items };
        Self { fetcher: Mutex::new(fetcher), entry: Mutex::new(Some(entry)), ttl }
    }

    /// Current history, refreshed through the fetcher when the cached
    /// snapshot is older than the TTL.
    ///
    /// Returns at most `max_items` entries but always at least one when any
    /// exist. The returned vector is a fresh copy every call; mutating it
    /// cannot corrupt the cache.
    ///
    /// A failed refresh propagates its error to the caller that ran it and
    /// leaves the previous (stale) snapshot in place, since replacement only
    /// happens on success.
    pub async fn get_history(&self, max_items: usize) -> Result<Vec<HistoryItem>, SessionError> {
        if let Some(items) = self.fresh_snapshot(max_items).await {
            return Ok(items);
        }

        let mut fetcher = self.fetcher.lock().await;
        // Another caller may have finished the refresh while this one waited
        // on the lock; their result serves this call too.
        if let Some(items) = self.fresh_snapshot(max_items).await {
            return Ok(items);
        }

        debug!("history cache expired, fetching");
        let items = fetcher.fetch().await?;
        let snapshot = clamp_items(&items, max_items);
        *self.entry.lock().await = Some(CacheEntry { updated_at: Instant::now(), items });
        Ok(snapshot)
    }

    /// Exclusive access to the underlying fetcher, e.g. for disposal. Waits
    /// for any in-flight refresh to finish first.
    pub async fn fetcher(&self) -> MutexGuard<'_, F> {
        self.fetcher.lock().await
    }

    async fn fresh_snapshot(&self, max_items: usize) -> Option<Vec<HistoryItem>> {
        let entry = self.entry.lock().await;
        let entry = entry.as_ref()?;
        (entry.updated_at.elapsed() < self.ttl).then(|| clamp_items(&entry.items, max_items))
    }
}

fn clamp_items(items: &[HistoryItem], max_items: usize) -> Vec<HistoryItem> {
    items.iter().take(max_items.max(1)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;

    fn item(n: usize) -> HistoryItem {
        HistoryItem {
            id: format!("550e8400-e29b-41d4-a716-4466554400{:02}", n),
            text: format!("entry {}", n),
            captured_at: Utc.timestamp_millis_opt(1_700_000_000_000 + n as i64).unwrap(),
        }
    }

    /// Counts fetches; optionally delays so tests can overlap callers.
    struct MockFetcher {
        items: Vec<HistoryItem>,
        calls: Arc<AtomicUsize>,
        delay: Duration,
        fail: bool,
    }

    impl MockFetcher {
        fn new(items: Vec<HistoryItem>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { items, calls: Arc::clone(&calls), delay: Duration::ZERO, fail: false }, calls)
        }
    }

    impl HistoryFetcher for MockFetcher {
        async fn fetch(&mut self) -> Result<Vec<HistoryItem>, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(SessionError::UnexpectedEof);
            }
            Ok(self.items.clone())
        }
    }

    #[tokio::test]
    async fn test_calls_within_ttl_hit_the_cache() {
        let (fetcher, calls) = MockFetcher::new(vec![item(1)]);
        let cache = HistoryCache::new(fetcher, Duration::from_secs(60));

        let first = cache.get_history(10).await.unwrap();
        let second = cache.get_history(10).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_ttl_triggers_exactly_one_more_fetch() {
        let (fetcher, calls) = MockFetcher::new(vec![item(1)]);
        let cache = HistoryCache::new(fetcher, Duration::from_millis(30));

        cache.get_history(10).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.get_history(10).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_primed_cache_serves_without_fetching() {
        let (fetcher, calls) = MockFetcher::new(vec![item(2)]);
        let cache = HistoryCache::primed(fetcher, Duration::from_secs(60), vec![item(1)]);

        let items = cache.get_history(10).await.unwrap();

        assert_eq!(items, vec![item(1)]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let (mut fetcher, calls) = MockFetcher::new(vec![item(1), item(2)]);
        fetcher.delay = Duration::from_millis(30);
        let cache = HistoryCache::new(fetcher, Duration::from_secs(60));

        let (a, b, c) =
            tokio::join!(cache.get_history(10), cache.get_history(10), cache.get_history(10));

        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_returned_snapshot_is_isolated_from_the_cache() {
        let (fetcher, _) = MockFetcher::new(vec![item(1)]);
        let cache = HistoryCache::new(fetcher, Duration::from_secs(60));

        let mut first = cache.get_history(10).await.unwrap();
        first[0].text = "mutated".to_string();
        first.clear();

        let second = cache.get_history(10).await.unwrap();
        assert_eq!(second, vec![item(1)]);
    }

    #[tokio::test]
    async fn test_max_items_clamps_but_never_to_zero() {
        let (fetcher, _) = MockFetcher::new(vec![item(1), item(2), item(3)]);
        let cache = HistoryCache::new(fetcher, Duration::from_secs(60));

        assert_eq!(cache.get_history(2).await.unwrap().len(), 2);
        // at least one entry comes back even for a zero budget
        assert_eq!(cache.get_history(0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_snapshot() {
        let (mut fetcher, _) = MockFetcher::new(vec![item(9)]);
        fetcher.fail = true;
        let cache = HistoryCache::primed(fetcher, Duration::from_millis(10), vec![item(1)]);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let err = cache.get_history(10).await.unwrap_err();
        assert!(matches!(err, SessionError::UnexpectedEof));

        // the stale entry is still there for the next refresh attempt to fall
        // back on; nothing was cleared
        let entry = cache.entry.lock().await;
        assert_eq!(entry.as_ref().map(|e| e.items.clone()), Some(vec![item(1)]));
    }

    #[tokio::test]
    async fn test_empty_history_stays_empty() {
        let (fetcher, _) = MockFetcher::new(Vec::new());
        let cache = HistoryCache::new(fetcher, Duration::from_secs(60));
        assert!(cache.get_history(10).await.unwrap().is_empty());
    }
}
