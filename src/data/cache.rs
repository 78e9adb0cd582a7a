use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use super::error::FetchError;
use super::loader::ImageFetcher;

/// Thumbnail bytes shared between every requester of the same URL.
pub type CachedBytes = Arc<[u8]>;

pub type CacheCallback = Box<dyn FnOnce(Result<CachedBytes, FetchError>) + Send + 'static>;

// ---------------------------------------------------------------------------
// ThumbnailCache – in-flight deduplication + bounded LRU
// ---------------------------------------------------------------------------

struct Inner {
    /// Callbacks waiting on a running fetch, by URL.
    pending: HashMap<String, Vec<CacheCallback>>,
    /// Completed downloads; `None` when the capacity is zero.
    ready: Option<LruCache<String, CachedBytes>>,
}

impl Inner {
    fn new(capacity: usize) -> Self {
        Self {
            pending: HashMap::new(),
            ready: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    /// Settle the pending fetch for `key` and hand back its waiters.
    fn complete(
        &mut self,
        key: &str,
        result: &Result<CachedBytes, FetchError>,
    ) -> Vec<CacheCallback> {
        let waiters = self.pending.remove(key).unwrap_or_default();

        if let (Ok(bytes), Some(ready)) = (result, self.ready.as_mut()) {
            if let Some((evicted, _)) = ready.push(key.to_string(), Arc::clone(bytes)) {
                if evicted != key {
                    log::debug!("Evicting cached thumbnail {evicted}");
                }
            }
        }
        waiters
    }
}

/// Shares thumbnail downloads between requesters.
///
/// Concurrent requests for one URL attach to a single fetch. Successful
/// downloads are kept, up to `capacity` entries, evicting the least recently
/// used. Failures are never kept, so the next request fetches again.
#[derive(Clone)]
pub struct ThumbnailCache {
    fetcher: Arc<dyn ImageFetcher>,
    inner: Arc<Mutex<Inner>>,
}

impl ThumbnailCache {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, capacity: usize) -> Self {
        Self {
            fetcher,
            inner: Arc::new(Mutex::new(Inner::new(capacity))),
        }
    }

    /// Deliver the bytes at `url` to `on_complete`, exactly once.
    ///
    /// A cached entry is delivered on the calling thread; otherwise the
    /// callback fires on the fetcher's worker thread.
    pub fn request(&self, url: &str, on_complete: CacheCallback) {
        let mut inner = lock(&self.inner);

        let hit = inner
            .ready
            .as_mut()
            .and_then(|ready| ready.get(url).map(Arc::clone));
        if let Some(bytes) = hit {
            drop(inner);
            log::trace!("Thumbnail cache hit for {url}");
            on_complete(Ok(bytes));
            return;
        }

        if let Some(waiters) = inner.pending.get_mut(url) {
            waiters.push(on_complete);
            return;
        }
        inner.pending.insert(url.to_string(), vec![on_complete]);
        drop(inner);

        let shared = Arc::clone(&self.inner);
        let key = url.to_string();
        self.fetcher.fetch_thumbnail(
            url,
            Box::new(move |result| {
                let result = result.map(CachedBytes::from);
                let waiters = lock(&shared).complete(&key, &result);
                for waiter in waiters {
                    waiter(result.clone());
                }
            }),
        );
    }

    /// Drop the completed entry for `url`, if any, so the next request
    /// downloads it again. Used when the stored bytes turn out to be unusable.
    pub fn forget(&self, url: &str) {
        if let Some(ready) = lock(&self.inner).ready.as_mut() {
            if ready.pop(url).is_some() {
                log::debug!("Forgetting cached thumbnail {url}");
            }
        }
    }

    #[cfg(test)]
    fn stored(&self) -> Vec<String> {
        lock(&self.inner)
            .ready
            .as_ref()
            .map(|ready| ready.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
