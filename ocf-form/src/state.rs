//! Observable form state
//!
//! Single writer for [`FormUiState`]. Every mutation goes through
//! [`FormStateStore::update`] or [`FormStateStore::try_update`], which
//! recompute the derived flags and publish a snapshot while still holding the
//! lock, so subscribers observe transitions in the order they happened.

use ocf_common::events::{EventBus, FormEvent};
use ocf_common::FormUiState;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use uuid::Uuid;

pub struct FormStateStore {
    form_id: Uuid,
    state: Mutex<FormUiState>,
    events: EventBus,
}

impl FormStateStore {
    /// Empty input, no errors, no suggestions, submit disabled
    pub fn new(form_id: Uuid, events: EventBus) -> Self {
        let mut state = FormUiState::default();
        state.recompute_derived();
        Self {
            form_id,
            state: Mutex::new(state),
            events,
        }
    }

    pub fn form_id(&self) -> Uuid {
        self.form_id
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> FormUiState {
        self.lock().clone()
    }

    /// Mutate, recompute derived state, publish
    pub fn update<R>(&self, mutate: impl FnOnce(&mut FormUiState) -> R) -> R {
        let mut state = self.lock();
        let result = mutate(&mut state);
        self.commit(&mut state);
        result
    }

    /// Like [`update`](Self::update), but publishes only when `mutate`
    /// reports that it changed something
    pub fn try_update(&self, mutate: impl FnOnce(&mut FormUiState) -> bool) -> bool {
        let mut state = self.lock();
        let applied = mutate(&mut state);
        if applied {
            self.commit(&mut state);
        }
        applied
    }

    fn commit(&self, state: &mut FormUiState) {
        state.recompute_derived();
        self.events.emit_lossy(FormEvent::StateChanged {
            form_id: self.form_id,
            state: Box::new(state.clone()),
            timestamp: chrono::Utc::now(),
        });
    }

    fn lock(&self) -> MutexGuard<'_, FormUiState> {
        // Derived flags are rebuilt on every commit, so a poisoned state is
        // still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
