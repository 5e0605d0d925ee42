//! Memoizing caches used by the renderer.
//!
//! Keys are content (template text, locale + options) so a cached value is
//! always identical to a freshly built one. The default policy never evicts;
//! an LRU policy can be injected for large or dynamic catalogs.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Storage behind a [`MemoCache`].
pub trait CacheStore<K, V> {
    /// Takes `&mut self` so that recency-based stores can update on reads.
    fn get(&mut self, key: &K) -> Option<V>;
    fn insert(&mut self, key: K, value: V);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct UnboundedStore<K, V>(HashMap<K, V>);

impl<K, V> Default for UnboundedStore<K, V> {
    fn default() -> Self {
        UnboundedStore(HashMap::new())
    }
}

impl<K: Hash + Eq, V: Clone> CacheStore<K, V> for UnboundedStore<K, V> {
    fn get(&mut self, key: &K) -> Option<V> {
        self.0.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        self.0.insert(key, value);
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug)]
pub struct LruStore<K: Hash + Eq, V>(LruCache<K, V>);

impl<K: Hash + Eq, V> LruStore<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruStore(LruCache::new(capacity))
    }
}

impl<K: Hash + Eq, V: Clone> CacheStore<K, V> for LruStore<K, V> {
    fn get(&mut self, key: &K) -> Option<V> {
        self.0.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        self.0.put(key, value);
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Which store a cache is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Unbounded,
    Lru(NonZeroUsize),
}

impl CachePolicy {
    fn build<K, V>(self) -> Box<dyn CacheStore<K, V>>
    where
        K: Hash + Eq + 'static,
        V: Clone + 'static,
    {
        match self {
            CachePolicy::Unbounded => Box::new(UnboundedStore::default()),
            CachePolicy::Lru(capacity) => Box::new(LruStore::new(capacity)),
        }
    }
}

/// A single-threaded memoizing cache.
///
/// The store is only borrowed for the lookup and the insert, never while the
/// value is being built, so builders may recurse into the same cache.
pub struct MemoCache<K, V> {
    store: RefCell<Box<dyn CacheStore<K, V>>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone + 'static,
    V: Clone + 'static,
{
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_store(policy.build())
    }

    pub fn with_store(store: Box<dyn CacheStore<K, V>>) -> Self {
        MemoCache {
            store: RefCell::new(store),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        build: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.store.borrow_mut().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Ok(value);
        }
        self.misses.set(self.misses.get() + 1);
        let value = build()?;
        self.store.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    pub fn get_or_insert_with(&self, key: K, build: impl FnOnce() -> V) -> V {
        match self.get_or_try_insert_with::<std::convert::Infallible>(key, || Ok(build())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}

impl<K, V> std::fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("len", &self.store.borrow().len())
            .field("hits", &self.hits.get())
            .field("misses", &self.misses.get())
            .finish()
    }
}
