//! Authentication and validation tests
//!
//! Tests for registration input validation and role permissions:
//! - Mill code, email, password, and phone validation
//! - Maintenance permissions per role

use proptest::prelude::*;

use shared::models::UserRole;
use shared::validation::{
    validate_email, validate_mill_code, validate_password, validate_phone,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid mill codes (3-10 uppercase alphanumeric)
fn mill_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{3,10}"
}

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net|pk)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate valid Pakistani phone numbers
fn phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Local format: 0XXXXXXXXXX
        "0[0-9]{10}",
        // International format: 92XXXXXXXXXX
        "92[0-9]{10}",
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mill_code_valid() {
        assert!(validate_mill_code("FMM").is_ok());
        assert!(validate_mill_code("MILL01").is_ok());
        assert!(validate_mill_code("ABCDEFGH12").is_ok());
    }

    #[test]
    fn test_mill_code_invalid() {
        assert!(validate_mill_code("AB").is_err()); // too short
        assert!(validate_mill_code("ABCDEFGHIJK").is_err()); // too long
        assert!(validate_mill_code("abc").is_err()); // lowercase
        assert!(validate_mill_code("AB-1").is_err()); // punctuation
        assert!(validate_mill_code("").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("owner@mill.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@mill.com").is_err());
        assert!(validate_email("owner@").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_phone_formats() {
        assert!(validate_phone("03001234567").is_ok());
        assert!(validate_phone("923001234567").is_ok());
        assert!(validate_phone("1234").is_err());
        assert!(validate_phone("abc").is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("owner").unwrap(), UserRole::Owner);
        assert_eq!(UserRole::from_str("manager").unwrap(), UserRole::Manager);
        assert_eq!(UserRole::from_str("operator").unwrap(), UserRole::Operator);
        assert!(UserRole::from_str("admin").is_err());
    }

    /// Only owners and managers may run recalculation and audits
    #[test]
    fn test_maintenance_permissions() {
        assert!(UserRole::Owner.can_run_maintenance());
        assert!(UserRole::Manager.can_run_maintenance());
        assert!(!UserRole::Operator.can_run_maintenance());
    }

    #[test]
    fn test_role_strings_round_trip() {
        for role in [UserRole::Owner, UserRole::Manager, UserRole::Operator] {
            assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every generated mill code passes validation
        #[test]
        fn prop_mill_codes_valid(code in mill_code_strategy()) {
            prop_assert!(validate_mill_code(&code).is_ok());
        }

        /// Every generated email passes validation
        #[test]
        fn prop_emails_valid(email in email_strategy()) {
            prop_assert!(validate_email(&email).is_ok());
        }

        /// Every generated password passes validation
        #[test]
        fn prop_passwords_valid(password in password_strategy()) {
            prop_assert!(validate_password(&password).is_ok());
        }

        /// Every generated phone number passes validation
        #[test]
        fn prop_phones_valid(phone in phone_strategy()) {
            prop_assert!(validate_phone(&phone).is_ok());
        }

        /// Short passwords are always rejected
        #[test]
        fn prop_short_passwords_rejected(password in "[a-zA-Z0-9]{0,7}") {
            prop_assert!(validate_password(&password).is_err());
        }
    }
}
