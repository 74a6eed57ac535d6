use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use serde::Serialize;

use crate::{
    analyzer::{parse_script, SyntaxError},
    ast::Script,
    config::default_ast_cache_capacity,
};

/// Parsed listings keyed by their exact composed text.
///
/// Bounded, with first-in-first-out eviction: once `capacity` listings are
/// cached, inserting a new one drops the oldest *inserted* entry, however
/// recently it was read. One registry is shared by every execution context.
#[derive(Debug)]
pub struct AstRegistry {
    capacity: usize,
    entries: Mutex<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug, Default)]
struct Entries {
    scripts: HashMap<String, Arc<Script>>,
    order: VecDeque<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

impl Default for AstRegistry {
    fn default() -> Self {
        Self::new(default_ast_cache_capacity())
    }
}

impl AstRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the cached listing for `text`, parsing and caching it on a miss.
    ///
    /// Blank text yields an empty listing and is never cached.
    pub fn get_or_parse(&self, text: &str) -> Result<Arc<Script>, SyntaxError> {
        if text.trim().is_empty() {
            return Ok(Arc::new(Script::new()));
        }
        if let Some(script) = self.get(text) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("listing cache hit");
            return Ok(script);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("listing cache miss, parsing {} bytes", text.len());
        let script = Arc::new(parse_script(text)?);
        Ok(self.insert(text.to_string(), script))
    }

    pub fn get(&self, text: &str) -> Option<Arc<Script>> {
        self.lock().scripts.get(text).cloned()
    }

    /// Inserts a listing, evicting the oldest entries while over capacity.
    ///
    /// If another thread cached the same text first, that listing is kept and
    /// returned.
    pub fn insert(&self, text: String, script: Arc<Script>) -> Arc<Script> {
        let mut entries = self.lock();
        if let Some(existing) = entries.scripts.get(&text) {
            return existing.clone();
        }
        while entries.order.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.scripts.remove(&oldest);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
        entries.order.push_back(text.clone());
        entries.scripts.insert(text, script.clone());
        script
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lock().scripts.contains_key(text)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.scripts.clear();
        entries.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
