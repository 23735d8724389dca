//! Form data model
//!
//! Plain data shared between the controller and whatever renders it.
//! [`FormUiState`] is the aggregate snapshot subscribers observe; its
//! `field_validity` and `submit_enabled` members are derived and must only be
//! refreshed through [`FormUiState::recompute_derived`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fields of the occupation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    CompanyName,
    CompanyAddress,
    CityName,
    PhoneNumber,
    /// Tax identifier (optional)
    Npwp,
}

impl FieldName {
    /// All fields in form order
    pub const ALL: [FieldName; 5] = [
        FieldName::CompanyName,
        FieldName::CompanyAddress,
        FieldName::CityName,
        FieldName::PhoneNumber,
        FieldName::Npwp,
    ];

    /// Whether a non-blank value is required before the form can be submitted
    pub fn is_mandatory(self) -> bool {
        !matches!(self, FieldName::Npwp)
    }

    /// Stable snake_case key, matching the serialized form
    pub fn key(self) -> &'static str {
        match self {
            FieldName::CompanyName => "company_name",
            FieldName::CompanyAddress => "company_address",
            FieldName::CityName => "city_name",
            FieldName::PhoneNumber => "phone_number",
            FieldName::Npwp => "npwp",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown field '{}'", s)))
    }
}

/// True when the value is empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Current text of every field. All fields start empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub company_name: String,
    pub company_address: String,
    pub city_name: String,
    pub phone_number: String,
    /// Optional
    pub npwp: String,
}

impl FormInput {
    pub fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::CompanyName => &self.company_name,
            FieldName::CompanyAddress => &self.company_address,
            FieldName::CityName => &self.city_name,
            FieldName::PhoneNumber => &self.phone_number,
            FieldName::Npwp => &self.npwp,
        }
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::CompanyName => &mut self.company_name,
            FieldName::CompanyAddress => &mut self.company_address,
            FieldName::CityName => &mut self.city_name,
            FieldName::PhoneNumber => &mut self.phone_number,
            FieldName::Npwp => &mut self.npwp,
        };
        *slot = value.into();
    }

    /// True when every mandatory field holds a non-blank value
    pub fn mandatory_filled(&self) -> bool {
        FieldName::ALL
            .into_iter()
            .filter(|field| field.is_mandatory())
            .all(|field| !is_blank(self.get(field)))
    }
}

/// Per-field error message; `None` means no error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub city_name: Option<String>,
    pub phone_number: Option<String>,
    pub npwp: Option<String>,
}

impl FormErrors {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        match field {
            FieldName::CompanyName => self.company_name.as_deref(),
            FieldName::CompanyAddress => self.company_address.as_deref(),
            FieldName::CityName => self.city_name.as_deref(),
            FieldName::PhoneNumber => self.phone_number.as_deref(),
            FieldName::Npwp => self.npwp.as_deref(),
        }
    }

    pub fn set(&mut self, field: FieldName, error: Option<String>) {
        let slot = match field {
            FieldName::CompanyName => &mut self.company_name,
            FieldName::CompanyAddress => &mut self.company_address,
            FieldName::CityName => &mut self.city_name,
            FieldName::PhoneNumber => &mut self.phone_number,
            FieldName::Npwp => &mut self.npwp,
        };
        *slot = error;
    }

    /// True iff any field carries an error, the optional field included
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        FieldName::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some())
            .count()
    }
}

/// Display validity per field: non-blank and error-free
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidity {
    pub company_name: bool,
    pub company_address: bool,
    pub city_name: bool,
    pub phone_number: bool,
    pub npwp: bool,
}

impl FieldValidity {
    pub fn get(&self, field: FieldName) -> bool {
        match field {
            FieldName::CompanyName => self.company_name,
            FieldName::CompanyAddress => self.company_address,
            FieldName::CityName => self.city_name,
            FieldName::PhoneNumber => self.phone_number,
            FieldName::Npwp => self.npwp,
        }
    }

    /// Compute validity from the current input and errors.
    ///
    /// A blank optional field is not valid for display, even though it does
    /// not block submission.
    pub fn compute(input: &FormInput, errors: &FormErrors) -> Self {
        let valid = |field: FieldName| !is_blank(input.get(field)) && errors.get(field).is_none();
        Self {
            company_name: valid(FieldName::CompanyName),
            company_address: valid(FieldName::CompanyAddress),
            city_name: valid(FieldName::CityName),
            phone_number: valid(FieldName::PhoneNumber),
            npwp: valid(FieldName::Npwp),
        }
    }
}

/// Company lookup result
///
/// Identity is `id`; uniqueness is the provider's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub name: String,
}

impl Suggestion {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Externally observed form state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormUiState {
    pub input: FormInput,
    pub errors: FormErrors,
    pub field_validity: FieldValidity,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_visible: bool,
    pub submit_enabled: bool,
}

impl FormUiState {
    /// Overwrite the derived members from `input` and `errors`.
    ///
    /// Idempotent. `submit_enabled` requires every mandatory field non-blank
    /// and no error on any field.
    pub fn recompute_derived(&mut self) {
        self.field_validity = FieldValidity::compute(&self.input, &self.errors);
        self.submit_enabled = self.input.mandatory_filled() && !self.errors.has_errors();
    }

    /// Replace the suggestion list; visibility follows non-emptiness
    pub fn show_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions_visible = !suggestions.is_empty();
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestions_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_input() -> FormInput {
        FormInput {
            company_name: "PT Bank Nasional".to_string(),
            company_address: "Jl. Sudirman No. 1".to_string(),
            city_name: "Jakarta".to_string(),
            phone_number: "08123456789".to_string(),
            npwp: String::new(),
        }
    }

    #[test]
    fn test_initial_state_is_empty_and_disabled() {
        let state = FormUiState::default();
        for field in FieldName::ALL {
            assert_eq!(state.input.get(field), "");
            assert!(state.errors.get(field).is_none());
        }
        assert!(!state.errors.has_errors());
        assert!(state.suggestions.is_empty());
        assert!(!state.suggestions_visible);
        assert!(!state.submit_enabled);
    }

    #[test]
    fn test_field_name_keys_round_trip() {
        for field in FieldName::ALL {
            assert_eq!(field.key().parse::<FieldName>().unwrap(), field);
        }
        assert!("company".parse::<FieldName>().is_err());
        assert_eq!(
            serde_json::to_string(&FieldName::PhoneNumber).unwrap(),
            "\"phone_number\""
        );
    }

    #[test]
    fn test_only_npwp_is_optional() {
        let optional: Vec<_> = FieldName::ALL
            .into_iter()
            .filter(|f| !f.is_mandatory())
            .collect();
        assert_eq!(optional, vec![FieldName::Npwp]);
    }

    #[test]
    fn test_submit_requires_all_mandatory_fields() {
        let mut state = FormUiState {
            input: filled_input(),
            ..Default::default()
        };
        state.recompute_derived();
        assert!(state.submit_enabled);

        state.input.set(FieldName::CityName, "   ");
        state.recompute_derived();
        assert!(!state.submit_enabled, "whitespace-only counts as blank");
    }

    #[test]
    fn test_npwp_error_blocks_submit() {
        let mut state = FormUiState {
            input: filled_input(),
            ..Default::default()
        };
        state.input.set(FieldName::Npwp, "12345");
        state
            .errors
            .set(FieldName::Npwp, Some("NPWP must be exactly 16 digits".to_string()));
        state.recompute_derived();

        assert!(state.errors.has_errors());
        assert_eq!(state.errors.error_count(), 1);
        assert!(!state.submit_enabled);
        assert!(!state.field_validity.npwp);
        assert!(state.field_validity.company_name);
    }

    #[test]
    fn test_blank_npwp_is_error_free_but_not_valid() {
        let mut state = FormUiState {
            input: filled_input(),
            ..Default::default()
        };
        state.recompute_derived();
        assert!(state.submit_enabled);
        assert!(!state.field_validity.get(FieldName::Npwp));
        assert!(state.field_validity.get(FieldName::PhoneNumber));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut state = FormUiState {
            input: filled_input(),
            ..Default::default()
        };
        state
            .errors
            .set(FieldName::CompanyName, Some("Company name is required".to_string()));
        state.recompute_derived();
        let first = state.clone();
        state.recompute_derived();
        assert_eq!(state, first);
    }

    #[test]
    fn test_suggestion_visibility_tracks_list() {
        let mut state = FormUiState::default();
        state.show_suggestions(vec![Suggestion::new(1, "PT Bank Nasional")]);
        assert!(state.suggestions_visible);

        state.show_suggestions(Vec::new());
        assert!(!state.suggestions_visible);

        state.show_suggestions(vec![Suggestion::new(2, "PT Digital Solusi")]);
        state.clear_suggestions();
        assert!(state.suggestions.is_empty());
        assert!(!state.suggestions_visible);
    }
}
