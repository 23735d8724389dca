//! Per-key cancellable debounce timers
//!
//! `schedule(key, delay, action)` replaces whatever is pending for `key`: the
//! superseded task is aborted before the new one is registered, so only the
//! most recent schedule for a key can ever run its action.
//!
//! Abort alone cannot stop a task that has already woken on another worker
//! thread, so every schedule also carries a generation number. A fired task
//! re-checks its [`DebounceTicket`] before running, and callers applying a
//! result check it again under their own lock.
//!
//! On a multi-threaded runtime a task can pass its ticket check just before a
//! newer `schedule` for the same key, so its action may still start once.
//! Only single-threaded use (one sequential execution context) guarantees a
//! superseded action never starts; under either runtime its result is
//! rejected by the caller's ticket check.
//!
//! Separate scheduler instances are separate keyspaces: the validation and
//! suggestion timers of the same field never cancel each other.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

struct Pending {
    generation: u64,
    handle: JoinHandle<()>,
}

struct Slots<K> {
    next_generation: u64,
    pending: HashMap<K, Pending>,
}

type SharedSlots<K> = Arc<Mutex<Slots<K>>>;

fn lock<K>(slots: &Mutex<Slots<K>>) -> MutexGuard<'_, Slots<K>> {
    // Slots hold no invariants a panicking holder could break halfway
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Identifies one scheduled action
///
/// Handed to the action when its timer fires.
#[derive(Clone)]
pub struct DebounceTicket<K> {
    key: K,
    generation: u64,
    slots: Weak<Mutex<Slots<K>>>,
}

impl<K> DebounceTicket<K>
where
    K: Eq + Hash,
{
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no newer schedule or cancel has happened for this key
    pub fn is_current(&self) -> bool {
        let Some(slots) = self.slots.upgrade() else {
            return false;
        };
        let guard = lock(&slots);
        guard
            .pending
            .get(&self.key)
            .is_some_and(|p| p.generation == self.generation)
    }

    /// Drop the pending entry once the action has run, unless superseded
    fn finish(&self) {
        let Some(slots) = self.slots.upgrade() else {
            return;
        };
        let mut guard = lock(&slots);
        if guard
            .pending
            .get(&self.key)
            .is_some_and(|p| p.generation == self.generation)
        {
            guard.pending.remove(&self.key);
        }
    }
}

/// Keyed debounce timers
///
/// Requires a Tokio runtime. Dropping the scheduler aborts everything still
/// pending.
pub struct DebounceScheduler<K> {
    name: &'static str,
    slots: SharedSlots<K>,
}

impl<K> DebounceScheduler<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    /// Create a scheduler; `name` tags its log lines
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Arc::new(Mutex::new(Slots {
                next_generation: 0,
                pending: HashMap::new(),
            })),
        }
    }

    /// Run `action` once `delay` passes without another schedule for `key`
    ///
    /// Any pending action for `key` is cancelled first and will never run.
    /// Returns the generation assigned to this schedule.
    pub fn schedule<F, Fut>(&self, key: K, delay: Duration, action: F) -> u64
    where
        F: FnOnce(DebounceTicket<K>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slots = lock(&self.slots);

        slots.next_generation += 1;
        let generation = slots.next_generation;

        if let Some(previous) = slots.pending.remove(&key) {
            previous.handle.abort();
            trace!(
                scheduler = self.name,
                key = ?key,
                superseded = previous.generation,
                "Debounce superseded"
            );
        }

        let ticket = DebounceTicket {
            key: key.clone(),
            generation,
            slots: Arc::downgrade(&self.slots),
        };
        let name = self.name;

        // The task cannot observe the slot table until this lock is released,
        // by which time its own entry is registered.
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !ticket.is_current() {
                trace!(scheduler = name, key = ?ticket.key, "Stale debounce woke, skipping");
                return;
            }
            debug!(scheduler = name, key = ?ticket.key, generation, "Debounce fired");
            action(ticket.clone()).await;
            ticket.finish();
        });

        slots.pending.insert(key, Pending { generation, handle });
        generation
    }

    /// Cancel the pending action for `key`; returns whether one existed
    ///
    /// Also aborts an action that fired but is still awaiting.
    pub fn cancel(&self, key: &K) -> bool {
        let removed = lock(&self.slots).pending.remove(key);
        match removed {
            Some(pending) => {
                pending.handle.abort();
                trace!(scheduler = self.name, key = ?key, "Debounce cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel everything pending
    pub fn cancel_all(&self) {
        let drained: Vec<(K, Pending)> = lock(&self.slots).pending.drain().collect();
        for (key, pending) in drained {
            pending.handle.abort();
            trace!(scheduler = self.name, key = ?key, "Debounce cancelled");
        }
    }

    /// Whether an action for `key` is waiting or still running
    pub fn is_pending(&self, key: &K) -> bool {
        lock(&self.slots).pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.slots).pending.len()
    }
}

impl<K> Drop for DebounceScheduler<K> {
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        for (_, pending) in slots.pending.drain() {
            pending.handle.abort();
        }
    }
}
