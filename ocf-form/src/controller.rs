//! Form controller
//!
//! Receives raw UI events and owns the form state:
//! - Raw values are normalized and stored synchronously
//! - Each field is validated after its own debounce (default 300ms)
//! - Company name additionally drives a debounced lookup (default 500ms)
//! - Derived flags are recomputed on every mutation
//!
//! All public operations are synchronous and must be called from inside a
//! Tokio runtime, since they spawn the debounce timers.
//!
//! # Cancellation
//!
//! Timer tasks keep only a weak reference to the controller. Dropping the
//! last [`FormController`] handle drops both schedulers, which aborts every
//! pending validation and any lookup still in flight.

use crate::debounce::{DebounceScheduler, DebounceTicket};
use crate::state::FormStateStore;
use crate::suggestion::SuggestionProvider;
use crate::validation::{digits_only, normalize_npwp, FormValidator};
use futures::stream::Stream;
use ocf_common::config::FormConfig;
use ocf_common::events::{EventBus, FormEvent};
use ocf_common::{FieldName, FormErrors, FormInput, FormUiState, Suggestion};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Controller timings and thresholds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub validation_debounce: Duration,
    pub suggestion_debounce: Duration,
    /// Company name must be strictly longer than this to trigger a lookup
    pub suggestion_min_chars: usize,
    pub event_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from(&FormConfig::default())
    }
}

impl From<&FormConfig> for ControllerConfig {
    fn from(config: &FormConfig) -> Self {
        Self {
            validation_debounce: config.validation_debounce(),
            suggestion_debounce: config.suggestion_debounce(),
            suggestion_min_chars: config.suggestion_min_chars,
            event_capacity: config.event_capacity,
        }
    }
}

/// Result of [`FormController::on_submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every field passed; the next step belongs to the caller
    Accepted { input: FormInput },
    /// At least one field failed; all errors are now in the state
    Rejected { errors: FormErrors },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

struct Inner {
    config: ControllerConfig,
    validator: FormValidator,
    provider: Arc<dyn SuggestionProvider>,
    store: FormStateStore,
    validation: DebounceScheduler<FieldName>,
    suggestions: DebounceScheduler<FieldName>,
}

/// Reactive controller for the occupation form
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct FormController {
    inner: Arc<Inner>,
}

impl FormController {
    /// Controller with default timings
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self::with_config(provider, FormValidator::new(), ControllerConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn SuggestionProvider>,
        validator: FormValidator,
        config: ControllerConfig,
    ) -> Self {
        let form_id = Uuid::new_v4();
        let events = EventBus::new(config.event_capacity);
        info!(
            %form_id,
            provider = provider.name(),
            validation_debounce_ms = config.validation_debounce.as_millis() as u64,
            suggestion_debounce_ms = config.suggestion_debounce.as_millis() as u64,
            event_capacity = events.capacity(),
            "Form controller created"
        );
        Self {
            inner: Arc::new(Inner {
                config,
                validator,
                provider,
                store: FormStateStore::new(form_id, events),
                validation: DebounceScheduler::new("validation"),
                suggestions: DebounceScheduler::new("suggestion"),
            }),
        }
    }

    pub fn form_id(&self) -> Uuid {
        self.inner.store.form_id()
    }

    /// Current state
    pub fn snapshot(&self) -> FormUiState {
        self.inner.store.snapshot()
    }

    /// Receive every future event
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.inner.store.subscribe()
    }

    /// Every future event as a lag-tolerant stream
    pub fn event_stream(&self) -> impl Stream<Item = FormEvent> {
        self.inner.store.events().stream()
    }

    pub fn is_validation_pending(&self, field: FieldName) -> bool {
        self.inner.validation.is_pending(&field)
    }

    pub fn is_suggestion_pending(&self) -> bool {
        self.inner.suggestions.is_pending(&FieldName::CompanyName)
    }

    /// A field's text changed
    ///
    /// Phone and NPWP values keep digits only; NPWP is also capped at
    /// [`NPWP_LENGTH`](crate::validation::NPWP_LENGTH). The value is stored
    /// immediately and validated once the field's debounce settles.
    pub fn on_field_changed(&self, field: FieldName, raw: &str) {
        let value = match field {
            FieldName::PhoneNumber => digits_only(raw),
            FieldName::Npwp => normalize_npwp(raw),
            _ => raw.to_string(),
        };
        debug!(field = %field, len = value.chars().count(), "Field changed");

        self.inner.store.update(|state| {
            state.input.set(field, value.clone());
            self.schedule_validation(field, value.clone());
            if field == FieldName::CompanyName {
                self.refresh_suggestions(state, value);
            }
        });
    }

    /// User picked a suggestion
    ///
    /// The selected name is trusted: its error is cleared and no validation
    /// is scheduled. Pending company name timers are cancelled so text typed
    /// before the selection cannot overwrite it.
    pub fn on_suggestion_selected(&self, suggestion: &Suggestion) {
        debug!(id = suggestion.id, "Suggestion selected");
        self.inner.store.update(|state| {
            self.inner.validation.cancel(&FieldName::CompanyName);
            self.inner.suggestions.cancel(&FieldName::CompanyName);
            state.input.set(FieldName::CompanyName, suggestion.name.clone());
            state.clear_suggestions();
            state.errors.set(FieldName::CompanyName, None);
        });
    }

    /// Hide the suggestion list; the list itself and the text are kept
    pub fn on_dismiss_suggestions(&self) {
        self.inner.store.update(|state| {
            state.suggestions_visible = false;
        });
    }

    /// Validate every field now
    ///
    /// Supersedes any pending per-field validation. The full error set is
    /// written to the state either way, so untouched fields surface their
    /// errors too.
    pub fn on_submit(&self) -> SubmitOutcome {
        let outcome = self.inner.store.update(|state| {
            self.inner.validation.cancel_all();
            let errors = self.inner.validator.validate_all(&state.input);
            state.errors = errors.clone();
            if errors.has_errors() {
                SubmitOutcome::Rejected { errors }
            } else {
                SubmitOutcome::Accepted {
                    input: state.input.clone(),
                }
            }
        });

        match &outcome {
            SubmitOutcome::Accepted { input } => {
                info!(form_id = %self.form_id(), "Form submitted");
                self.inner.store.events().emit_lossy(FormEvent::SubmitAccepted {
                    form_id: self.form_id(),
                    input: input.clone(),
                    timestamp: chrono::Utc::now(),
                });
            }
            SubmitOutcome::Rejected { errors } => {
                info!(
                    form_id = %self.form_id(),
                    error_count = errors.error_count(),
                    "Submit rejected"
                );
            }
        }
        outcome
    }

    fn weak(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn schedule_validation(&self, field: FieldName, value: String) {
        let weak = self.weak();
        self.inner.validation.schedule(
            field,
            self.inner.config.validation_debounce,
            move |ticket| async move {
                if let Some(inner) = weak.upgrade() {
                    inner.apply_validation(&ticket, field, &value);
                }
            },
        );
    }

    /// Called with the state lock held, after the company name was stored
    fn refresh_suggestions(&self, state: &mut FormUiState, query: String) {
        if query.chars().count() <= self.inner.config.suggestion_min_chars {
            self.inner.suggestions.cancel(&FieldName::CompanyName);
            state.clear_suggestions();
            return;
        }

        let weak = self.weak();
        self.inner.suggestions.schedule(
            FieldName::CompanyName,
            self.inner.config.suggestion_debounce,
            move |ticket| async move {
                // Hold only the provider across the await so dropping the
                // controller still cancels this task
                let Some(provider) = weak.upgrade().map(|inner| Arc::clone(&inner.provider))
                else {
                    return;
                };
                let suggestions = match provider.query(&query).await {
                    Ok(suggestions) => suggestions,
                    Err(e) => {
                        warn!(provider = provider.name(), "Suggestion lookup failed: {}", e);
                        Vec::new()
                    }
                };
                if let Some(inner) = weak.upgrade() {
                    inner.apply_suggestions(&ticket, suggestions);
                }
            },
        );
    }
}

impl Inner {
    fn apply_validation(&self, ticket: &DebounceTicket<FieldName>, field: FieldName, value: &str) {
        let error = self.validator.validate_field(field, value);
        let applied = self.store.try_update(|state| {
            if !ticket.is_current() {
                return false;
            }
            state.errors.set(field, error.clone());
            true
        });
        if applied {
            debug!(field = %field, has_error = error.is_some(), "Field validated");
        }
    }

    fn apply_suggestions(&self, ticket: &DebounceTicket<FieldName>, suggestions: Vec<Suggestion>) {
        let count = suggestions.len();
        let applied = self.store.try_update(|state| {
            if !ticket.is_current() {
                return false;
            }
            state.show_suggestions(suggestions);
            true
        });
        if applied {
            debug!(count, "Suggestions updated");
        }
    }
}
