//! Process-wide memoized navigation index.
//!
//! # Thread Safety
//!
//! - `get()` on a warm cache is an atomic load plus an `Arc` clone under a read lock
//! - a cold or invalidated cache is rebuilt under double-checked locking, so
//!   concurrent callers trigger exactly one build and all observe its result
//! - `invalidate()` is lock-free (atomic flag); readers keep the `Arc` they hold
//! - an `invalidate()` that lands while a build is scanning leaves the cache
//!   invalid, so the next `get()` rebuilds again

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use kb_source::ContentSource;

use crate::error::IndexError;
use crate::options::IndexOptions;
use crate::scanner::DocumentScanner;
use crate::tree::{NavigationIndex, NavigationTreeBuilder};

/// Rebuild policy of an [`IndexCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Built once per process; invalidation is ignored.
    #[default]
    Static,
    /// Content may change; `invalidate()` schedules a rebuild.
    Watch,
}

/// Memoized build of the navigation index.
pub struct IndexCache {
    source: Arc<dyn ContentSource>,
    options: IndexOptions,
    mode: CacheMode,
    /// Serializes builds.
    build_lock: Mutex<()>,
    current: RwLock<Option<Arc<NavigationIndex>>>,
    valid: AtomicBool,
    /// Bumped by every effective `invalidate()`.
    epoch: AtomicU64,
    generation: AtomicU64,
}

impl IndexCache {
    /// Create an empty cache. Nothing is scanned until the first `get()`.
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, options: IndexOptions, mode: CacheMode) -> Self {
        Self {
            source,
            options,
            mode,
            build_lock: Mutex::new(()),
            current: RwLock::new(None),
            valid: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// Rebuild policy.
    #[must_use]
    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Content source the index is built from.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    /// Generation of the last published index (0 before the first build).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Get the current index, building it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::RootUnreadable`] if a build was needed and the
    /// content root cannot be listed. The cache stays unpopulated and the
    /// next call retries.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn get(&self) -> Result<Arc<NavigationIndex>, IndexError> {
        // Fast path
        if self.valid.load(Ordering::Acquire)
            && let Some(index) = self.current.read().unwrap().clone()
        {
            tracing::debug!(generation = index.generation(), "Index cache hit");
            return Ok(index);
        }

        let _guard = self.build_lock.lock().unwrap();

        // Another caller may have finished the build while we waited.
        if self.valid.load(Ordering::Acquire)
            && let Some(index) = self.current.read().unwrap().clone()
        {
            return Ok(index);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let generation = self.generation.load(Ordering::Acquire) + 1;
        let index = Arc::new(self.build(generation)?);

        *self.current.write().unwrap() = Some(Arc::clone(&index));
        self.generation.store(generation, Ordering::Release);

        // Mark valid first, then re-check: an invalidation after the check
        // clears the flag itself.
        self.valid.store(true, Ordering::SeqCst);
        if self.epoch.load(Ordering::SeqCst) != epoch {
            self.valid.store(false, Ordering::SeqCst);
            tracing::debug!(generation, "Index invalidated during build");
        }

        Ok(index)
    }

    /// Mark the index stale so the next `get()` rebuilds.
    ///
    /// Returns `false` (and does nothing) in [`CacheMode::Static`].
    pub fn invalidate(&self) -> bool {
        match self.mode {
            CacheMode::Static => {
                tracing::debug!("Ignoring invalidation of static index cache");
                false
            }
            CacheMode::Watch => {
                self.epoch.fetch_add(1, Ordering::SeqCst);
                self.valid.store(false, Ordering::SeqCst);
                true
            }
        }
    }

    fn build(&self, generation: u64) -> Result<NavigationIndex, IndexError> {
        let start = Instant::now();

        let report = DocumentScanner::new(self.source.as_ref(), &self.options).scan()?;
        let index = NavigationTreeBuilder::new(&self.options.root_title).build(report, generation);

        tracing::info!(
            nodes = index.len(),
            topics = index.topics().count(),
            diagnostics = index.diagnostics().len(),
            generation,
            elapsed_ms = start.elapsed().as_millis(),
            "Built navigation index"
        );

        Ok(index)
    }
}
