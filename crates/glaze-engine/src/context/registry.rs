use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use state::InitCell;

use crate::egl::{Config, Context, Display};
use crate::paint::PaintContext;

/// The three platform handles a thread renders through.
///
/// Grouped so the cache is either fully initialized or not at all; there is
/// no state in which only some of the handles are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlContextBundle {
    pub display: Display,
    pub config: Config,
    pub context: Context,
}

/// Cached, thread-affine drawing state.
///
/// Every renderer running on a thread shares this instance. It is created on
/// first access by that thread and never removed.
pub struct ThreadDrawingContext {
    id: u64,
    pub gl: Option<GlContextBundle>,
    pub paint: Option<Box<dyn PaintContext>>,
}

impl ThreadDrawingContext {
    fn new(id: u64) -> Self {
        Self {
            id,
            gl: None,
            paint: None,
        }
    }

    /// Process-unique identity of this cache entry.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Map from rendering-thread identity to its drawing context.
///
/// The outer lock guards insertion and lookup only. Each entry carries its
/// own lock, which is uncontended: the owning thread is the entry's key, so
/// no other thread ever reaches it through [`with_current`].
///
/// [`with_current`]: ThreadContextRegistry::with_current
pub struct ThreadContextRegistry {
    entries: Mutex<HashMap<ThreadId, Arc<Mutex<ThreadDrawingContext>>>>,
    next_id: AtomicU64,
}

impl ThreadContextRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn entry(&self, thread: ThreadId) -> Arc<Mutex<ThreadDrawingContext>> {
        let mut entries = lock(&self.entries);
        entries
            .entry(thread)
            .or_insert_with(|| {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                Arc::new(Mutex::new(ThreadDrawingContext::new(id)))
            })
            .clone()
    }

    /// Runs `f` with exclusive access to the calling thread's context,
    /// inserting a fresh unset entry on first use.
    pub fn with_current<R>(&self, f: impl FnOnce(&mut ThreadDrawingContext) -> R) -> R {
        let entry = self.entry(thread::current().id());
        let mut context = lock(&entry);
        f(&mut context)
    }

    /// Number of threads that have rendered so far.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ThreadContextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Poison-tolerant lock: a panicking draw callback must not disable
/// rendering for the rest of the process.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

static REGISTRY: InitCell<ThreadContextRegistry> = InitCell::new();

/// Process-wide registry instance.
pub fn registry() -> &'static ThreadContextRegistry {
    if REGISTRY.try_get().is_none() {
        let _ = REGISTRY.set(ThreadContextRegistry::new());
    }
    REGISTRY.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn same_thread_shares_one_context() {
        let registry = ThreadContextRegistry::new();
        let first = registry.with_current(|ctx| ctx.id());
        let second = registry.with_current(|ctx| ctx.id());
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn different_threads_get_distinct_contexts() {
        let registry = ThreadContextRegistry::new();
        let local = registry.with_current(|ctx| ctx.id());

        let remote = thread::scope(|scope| {
            scope
                .spawn(|| registry.with_current(|ctx| ctx.id()))
                .join()
                .unwrap()
        });

        assert_ne!(local, remote);
        assert_eq!(registry.len(), 2);
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn fresh_entries_are_unset() {
        let registry = ThreadContextRegistry::new();
        registry.with_current(|ctx| {
            assert!(ctx.gl.is_none());
            assert!(ctx.paint.is_none());
        });
    }

    #[test]
    fn entries_persist_between_accesses() {
        let registry = ThreadContextRegistry::new();
        registry.with_current(|ctx| {
            ctx.gl = Some(GlContextBundle {
                display: Display::from_raw(1),
                config: Config::from_raw(2),
                context: Context::from_raw(3),
            });
        });
        registry.with_current(|ctx| {
            assert_eq!(ctx.gl.map(|gl| gl.display), Some(Display::from_raw(1)));
        });
    }

    // ── global instance ───────────────────────────────────────────────────

    #[test]
    fn global_registry_is_a_singleton() {
        assert!(std::ptr::eq(registry(), registry()));
    }
}
