//! Event types for the OCF event system
//!
//! Provides the shared event definitions and the EventBus the form controller
//! publishes on.

use crate::model::{FormInput, FormUiState};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;
use uuid::Uuid;

/// Events published by a form controller
///
/// Serialized with a `type` tag so consumers outside the process (the driver
/// binary prints them as JSON lines) can dispatch on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FormEvent {
    /// The observable form state changed
    ///
    /// Emitted once per mutation, in mutation order. No coalescing.
    StateChanged {
        /// Controller that owns the state
        form_id: Uuid,
        /// Full snapshot after the mutation
        state: Box<FormUiState>,
        /// When the mutation happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Submit validated the whole form without errors
    ///
    /// The next step (navigation, persistence) belongs to whoever listens.
    SubmitAccepted {
        form_id: Uuid,
        /// Input that passed validation
        input: FormInput,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl FormEvent {
    pub fn form_id(&self) -> Uuid {
        match self {
            FormEvent::StateChanged { form_id, .. } | FormEvent::SubmitAccepted { form_id, .. } => {
                *form_id
            }
        }
    }

    /// Snapshot carried by a `StateChanged` event
    pub fn state(&self) -> Option<&FormUiState> {
        match self {
            FormEvent::StateChanged { state, .. } => Some(state),
            FormEvent::SubmitAccepted { .. } => None,
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Event distribution bus for form events
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block the controller)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use ocf_common::events::{EventBus, FormEvent};
/// use ocf_common::FormUiState;
///
/// let event_bus = EventBus::new(16);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(FormEvent::StateChanged {
///     form_id: uuid::Uuid::new_v4(),
///     state: Box::new(FormUiState::default()),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FormEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: FormEvent) -> Result<usize, broadcast::error::SendError<FormEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: FormEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Subscribe as a stream
    ///
    /// Lagged receivers skip the dropped events with a warning instead of
    /// ending the stream.
    pub fn stream(&self) -> impl Stream<Item = FormEvent> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|result| async move {
            match result {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("Form event subscriber lagged: {:?}", e);
                    None
                }
            }
        })
    }
}
