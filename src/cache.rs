//! Bounded cache of analyzed repository contexts
//!
//! Repeated classification calls against the same repository reuse the
//! extracted feature bag and concatenated text instead of rescanning.
//! Capacity-bounded with least-recently-used eviction; stale entries can be
//! dropped per key or wholesale.

use crate::models::RepoFeatures;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Default number of cached repository contexts
pub const DEFAULT_CAPACITY: usize = 32;

/// Process-wide context cache instance
static GLOBAL_CONTEXTS: OnceLock<RepoContextCache> = OnceLock::new();

/// Get or initialize the global repo-context cache
pub fn global_contexts() -> &'static RepoContextCache {
    GLOBAL_CONTEXTS.get_or_init(|| RepoContextCache::new(DEFAULT_CAPACITY))
}

/// Everything derived once from a repository snapshot
#[derive(Debug, Clone)]
pub struct RepoContext {
    pub features: RepoFeatures,
    pub full_text: String,
}

/// Thread-safe LRU cache keyed by repository identifier
pub struct RepoContextCache {
    inner: Mutex<LruCache<String, Arc<RepoContext>>>,
}

impl RepoContextCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Arc<RepoContext>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a context, marking it most-recently-used
    pub fn get(&self, key: &str) -> Option<Arc<RepoContext>> {
        self.lock().get(key).cloned()
    }

    /// Insert a context, evicting the least-recently-used entry when full
    pub fn insert(&self, key: impl Into<String>, context: RepoContext) -> Arc<RepoContext> {
        let context = Arc::new(context);
        self.lock().put(key.into(), Arc::clone(&context));
        context
    }

    /// Drop one entry; returns whether it was present
    pub fn clear_key(&self, key: &str) -> bool {
        self.lock().pop(key).is_some()
    }

    /// Drop every entry
    pub fn clear_all(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(lines: u32) -> RepoContext {
        RepoContext {
            features: RepoFeatures {
                total_lines: lines,
                ..Default::default()
            },
            full_text: format!("text {lines}"),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = RepoContextCache::new(4);
        cache.insert("repo-a", context(10));
        let hit = cache.get("repo-a").expect("cached");
        assert_eq!(hit.features.total_lines, 10);
        assert!(cache.get("repo-b").is_none());
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = RepoContextCache::new(2);
        cache.insert("a", context(1));
        cache.insert("b", context(2));
        cache.get("a"); // touch a, so b is now the eviction candidate
        cache.insert("c", context(3));

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_operations() {
        let cache = RepoContextCache::new(4);
        cache.insert("a", context(1));
        cache.insert("b", context(2));

        assert!(cache.clear_key("a"));
        assert!(!cache.clear_key("a"));
        assert_eq!(cache.len(), 1);

        cache.clear_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = RepoContextCache::new(0);
        cache.insert("a", context(1));
        assert!(cache.get("a").is_some());
    }
}
