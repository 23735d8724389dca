//! # OCF Common Library
//!
//! Shared code for the occupation form controller and its consumers:
//! - Form data model (field names, input, errors, validity, suggestions)
//! - Event types (FormEvent enum) and the broadcast EventBus
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod model;

pub use error::{Error, Result};
pub use model::{FieldName, FieldValidity, FormErrors, FormInput, FormUiState, Suggestion};
