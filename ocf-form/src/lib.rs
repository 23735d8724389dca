//! ocf-form library interface
//!
//! Reactive form-state controller for the occupation form: per-field
//! debounced validation, debounced company lookup, and the derived
//! submit-enabled signal.

pub mod controller;
pub mod debounce;
pub mod state;
pub mod suggestion;
pub mod validation;

pub use controller::{ControllerConfig, FormController, SubmitOutcome};
pub use debounce::{DebounceScheduler, DebounceTicket};
pub use suggestion::{CatalogSuggestionProvider, ProviderError, SuggestionProvider};
pub use validation::{FormValidator, NPWP_LENGTH};
