//! Field validation rules
//!
//! Pure, synchronous checks mapping one field's value to an optional error
//! message. Checks run top to bottom and the first failure wins, so the
//! order inside each rule is part of its contract.

use ocf_common::model::is_blank;
use ocf_common::{FieldName, FormErrors, FormInput};

/// Required NPWP digit count
///
/// Used for controller truncation, validation, and the error message alike.
pub const NPWP_LENGTH: usize = 16;

const COMPANY_NAME_MIN: usize = 2;
const COMPANY_NAME_MAX: usize = 100;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 200;
const CITY_MIN: usize = 2;
const CITY_MAX: usize = 60;
const PHONE_MIN: usize = 8;
const PHONE_MAX: usize = 15;

/// Stateless validator for the occupation form
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator;

impl FormValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_field(&self, field: FieldName, value: &str) -> Option<String> {
        match field {
            FieldName::CompanyName => self.validate_company_name(value),
            FieldName::CompanyAddress => self.validate_company_address(value),
            FieldName::CityName => self.validate_city_name(value),
            FieldName::PhoneNumber => self.validate_phone_number(value),
            FieldName::Npwp => self.validate_npwp(value),
        }
    }

    pub fn validate_company_name(&self, value: &str) -> Option<String> {
        if is_blank(value) {
            return Some("Company name is required".to_string());
        }
        let len = trimmed_len(value);
        if len < COMPANY_NAME_MIN {
            return Some(format!(
                "Company name must be at least {} characters",
                COMPANY_NAME_MIN
            ));
        }
        if len > COMPANY_NAME_MAX {
            return Some(format!(
                "Company name must be at most {} characters",
                COMPANY_NAME_MAX
            ));
        }
        None
    }

    pub fn validate_company_address(&self, value: &str) -> Option<String> {
        if is_blank(value) {
            return Some("Company address is required".to_string());
        }
        let len = trimmed_len(value);
        if len < ADDRESS_MIN {
            return Some(format!("Address must be at least {} characters", ADDRESS_MIN));
        }
        if len > ADDRESS_MAX {
            return Some(format!("Address must be at most {} characters", ADDRESS_MAX));
        }
        None
    }

    pub fn validate_city_name(&self, value: &str) -> Option<String> {
        if is_blank(value) {
            return Some("City name is required".to_string());
        }
        let len = trimmed_len(value);
        if len < CITY_MIN {
            return Some(format!("City name must be at least {} characters", CITY_MIN));
        }
        if len > CITY_MAX {
            return Some(format!("City name must be at most {} characters", CITY_MAX));
        }
        if !value
            .trim()
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ')
        {
            return Some("City name must contain only letters".to_string());
        }
        None
    }

    pub fn validate_phone_number(&self, value: &str) -> Option<String> {
        if is_blank(value) {
            return Some("Phone number is required".to_string());
        }
        if !all_digits(value) {
            return Some("Phone number must contain digits only".to_string());
        }
        let len = value.chars().count();
        if len < PHONE_MIN {
            return Some(format!("Phone number must be at least {} digits", PHONE_MIN));
        }
        if len > PHONE_MAX {
            return Some(format!("Phone number must be at most {} digits", PHONE_MAX));
        }
        None
    }

    /// NPWP is optional: blank is accepted before any other check
    pub fn validate_npwp(&self, value: &str) -> Option<String> {
        if is_blank(value) {
            return None;
        }
        if !all_digits(value) {
            return Some("NPWP must contain digits only".to_string());
        }
        if value.chars().count() != NPWP_LENGTH {
            return Some(format!("NPWP must be exactly {} digits", NPWP_LENGTH));
        }
        None
    }

    /// Validate every field independently
    pub fn validate_all(&self, input: &FormInput) -> FormErrors {
        let mut errors = FormErrors::default();
        for field in FieldName::ALL {
            errors.set(field, self.validate_field(field, input.get(field)));
        }
        errors
    }
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn all_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

/// Strip every character that is not an ASCII digit
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits of `raw`, capped at [`NPWP_LENGTH`]
pub fn normalize_npwp(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(NPWP_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v() -> FormValidator {
        FormValidator::new()
    }

    #[test]
    fn test_company_name_rules() {
        assert_eq!(v().validate_company_name("PT Bank Nasional"), None);
        assert_eq!(
            v().validate_company_name("").as_deref(),
            Some("Company name is required")
        );
        assert_eq!(
            v().validate_company_name("   ").as_deref(),
            Some("Company name is required")
        );
        assert_eq!(
            v().validate_company_name("A").as_deref(),
            Some("Company name must be at least 2 characters")
        );
        // Trimmed before measuring
        assert!(v().validate_company_name(" A ").is_some());
        assert_eq!(v().validate_company_name("PT"), None);
        assert_eq!(
            v().validate_company_name(&"A".repeat(101)).as_deref(),
            Some("Company name must be at most 100 characters")
        );
        assert_eq!(v().validate_company_name(&"A".repeat(100)), None);
    }

    #[test]
    fn test_company_address_rules() {
        assert_eq!(v().validate_company_address("Jl. Sudirman No. 1"), None);
        assert_eq!(
            v().validate_company_address("").as_deref(),
            Some("Company address is required")
        );
        assert_eq!(
            v().validate_company_address("Jl.").as_deref(),
            Some("Address must be at least 5 characters")
        );
        assert_eq!(
            v().validate_company_address(&"x".repeat(201)).as_deref(),
            Some("Address must be at most 200 characters")
        );
    }

    #[test]
    fn test_city_name_rules() {
        assert_eq!(v().validate_city_name("Jakarta"), None);
        assert_eq!(v().validate_city_name("Kota Bogor"), None);
        assert_eq!(
            v().validate_city_name("").as_deref(),
            Some("City name is required")
        );
        assert_eq!(
            v().validate_city_name("J").as_deref(),
            Some("City name must be at least 2 characters")
        );
        assert_eq!(
            v().validate_city_name(&"a".repeat(61)).as_deref(),
            Some("City name must be at most 60 characters")
        );
        assert_eq!(
            v().validate_city_name("Jakarta1").as_deref(),
            Some("City name must contain only letters")
        );
        assert_eq!(
            v().validate_city_name("St. Louis").as_deref(),
            Some("City name must contain only letters")
        );
    }

    #[test]
    fn test_city_length_checked_before_letters() {
        // "1" is both too short and not a letter; length message wins
        assert_eq!(
            v().validate_city_name("1").as_deref(),
            Some("City name must be at least 2 characters")
        );
    }

    #[test]
    fn test_phone_number_rules() {
        assert_eq!(v().validate_phone_number("08123456789"), None);
        assert_eq!(v().validate_phone_number("12345678"), None);
        assert_eq!(
            v().validate_phone_number("").as_deref(),
            Some("Phone number is required")
        );
        assert_eq!(
            v().validate_phone_number("0812abc456").as_deref(),
            Some("Phone number must contain digits only")
        );
        assert_eq!(
            v().validate_phone_number("1234567").as_deref(),
            Some("Phone number must be at least 8 digits")
        );
        assert_eq!(
            v().validate_phone_number("1234567890123456").as_deref(),
            Some("Phone number must be at most 15 digits")
        );
    }

    #[test]
    fn test_npwp_rules() {
        assert_eq!(v().validate_npwp(""), None);
        assert_eq!(v().validate_npwp("1234567890123456"), None);
        assert_eq!(
            v().validate_npwp("123456789012345").as_deref(),
            Some("NPWP must be exactly 16 digits")
        );
        assert!(v().validate_npwp("12345678901234567").is_some());
        assert_eq!(
            v().validate_npwp("123456789012345A").as_deref(),
            Some("NPWP must contain digits only")
        );
    }

    #[test]
    fn test_validate_all_empty_input() {
        let errors = v().validate_all(&FormInput::default());
        assert!(errors.has_errors());
        assert_eq!(errors.company_name.as_deref(), Some("Company name is required"));
        assert_eq!(errors.company_address.as_deref(), Some("Company address is required"));
        assert_eq!(errors.city_name.as_deref(), Some("City name is required"));
        assert_eq!(errors.phone_number.as_deref(), Some("Phone number is required"));
        assert!(errors.npwp.is_none());
    }

    #[test]
    fn test_validate_all_only_npwp_wrong() {
        let input = FormInput {
            company_name: "PT Bank Nasional".to_string(),
            company_address: "Jl. Sudirman No. 1".to_string(),
            city_name: "Jakarta".to_string(),
            phone_number: "08123456789".to_string(),
            npwp: "12345".to_string(),
        };
        let errors = v().validate_all(&input);
        assert_eq!(errors.error_count(), 1);
        assert!(errors.npwp.is_some());
    }

    #[test]
    fn test_normalizers() {
        assert_eq!(digits_only("0812-345-678"), "0812345678");
        assert_eq!(digits_only("+62 (21) 555"), "6221555");
        assert_eq!(normalize_npwp("12.345.678.9-012.300"), "123456789012300");
        assert_eq!(normalize_npwp("1234-5678-9012-3456-789"), "1234567890123456");
    }
}
