//! The cache store: keyed entries, subscribers, staleness, undo handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::key::QueryKey;
use crate::patch::{self, Inverse, Patch};
use crate::value::CachedValue;

/// Identifier of a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&QueryKey) + Send + Sync>;

struct Entry {
    value: CachedValue,
    stale: bool,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener: u64,
}

/// In-memory store of query results with subscriber notification.
///
/// Cloning yields another handle to the same store. All mutation of cached
/// entries goes through [`CacheStore::put`], [`CacheStore::apply`], and the
/// [`UndoHandle`]s that `apply` returns; there is no other write path.
///
/// Subscribers are notified synchronously on every write, patch, undo, and
/// invalidation, after the store lock has been released.
#[derive(Clone, Default)]
pub struct CacheStore {
    inner: Arc<Mutex<Inner>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panicked writer, not corrupt data: every
        // write section leaves the map in a consistent state before any
        // call that could panic. Undo in particular must never fail.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the cached value for a key, if any.
    pub fn read(&self, key: &QueryKey) -> Option<CachedValue> {
        self.lock().entries.get(key).map(|entry| entry.value.clone())
    }

    /// Whether the key is present but marked stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.lock().entries.get(key).is_some_and(|entry| entry.stale)
    }

    /// Replace the entry for a key wholesale and clear its staleness.
    ///
    /// This is the read side's population path after a fetch.
    pub fn put(&self, key: QueryKey, value: impl Into<CachedValue>) {
        {
            let mut inner = self.lock();
            inner.entries.insert(
                key.clone(),
                Entry {
                    value: value.into(),
                    stale: false,
                },
            );
        }
        debug!(key = %key, "cache entry replaced");
        self.notify(&key);
    }

    /// Apply a forward patch to the entry for `key`.
    ///
    /// The returned handle replays the recorded inverse on
    /// [`UndoHandle::undo`]. If the key has no entry the patch is a
    /// recorded no-op and so is its undo.
    pub fn apply(&self, key: QueryKey, patch: Patch) -> UndoHandle {
        let inverse = {
            let mut inner = self.lock();
            match inner.entries.get_mut(&key) {
                Some(entry) => patch::apply(&mut entry.value, &patch),
                None => Inverse::Noop,
            }
        };
        debug!(key = %key, noop = inverse.is_noop(), "cache patch applied");
        self.notify(&key);
        UndoHandle {
            store: self.clone(),
            key,
            inverse: Some(inverse),
        }
    }

    /// Drop the entry for a key entirely.
    pub fn remove(&self, key: &QueryKey) -> Option<CachedValue> {
        let removed = self.lock().entries.remove(key).map(|entry| entry.value);
        if removed.is_some() {
            debug!(key = %key, "cache entry dropped");
            self.notify(key);
        }
        removed
    }

    /// Mark a key stale and notify subscribers.
    ///
    /// This is a hand-off: the store prompts a refresh but does not perform
    /// one. Keys without an entry still notify, so a refresh policy can
    /// choose to populate them.
    pub fn invalidate(&self, key: &QueryKey) {
        {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.get_mut(key) {
                entry.stale = true;
            }
        }
        debug!(key = %key, "cache key invalidated");
        self.notify(key);
    }

    /// Register a listener invoked synchronously with the key of every
    /// write, patch, undo, and invalidation.
    pub fn subscribe(&self, listener: impl Fn(&QueryKey) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        inner.next_listener += 1;
        let id = SubscriptionId(inner.next_listener);
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self, key: &QueryKey) {
        // Snapshot under the lock, invoke outside it, so listeners may
        // read the store without deadlocking.
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(key);
        }
    }

    fn revert(&self, key: &QueryKey, inverse: Inverse) {
        {
            let mut inner = self.lock();
            if let Some(entry) = inner.entries.get_mut(key) {
                patch::revert(&mut entry.value, inverse);
            }
            // Entry gone entirely: nothing left to revert.
        }
        debug!(key = %key, "cache patch undone");
        self.notify(key);
    }
}

/// A recorded, reversible cache edit tied to one in-flight mutation.
///
/// `undo` reverts exactly that edit the first time it is called; later
/// calls are no-ops. Undo never fails: if the edited element was removed
/// by another operation in the meantime, it degrades to a no-op.
pub struct UndoHandle {
    store: CacheStore,
    key: QueryKey,
    inverse: Option<Inverse>,
}

impl UndoHandle {
    /// Revert the recorded edit if not already reverted.
    pub fn undo(&mut self) {
        if let Some(inverse) = self.inverse.take() {
            self.store.revert(&self.key, inverse);
        }
    }

    /// Whether `undo` has already run.
    pub fn is_undone(&self) -> bool {
        self.inverse.is_none()
    }
}
