//! Validation utilities for the Flour Mill Management Platform

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if validator::validate_email(email) {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate mill code format (3-10 uppercase alphanumeric)
pub fn validate_mill_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Mill code must be at least 3 characters");
    }
    if code.len() > 10 {
        return Err("Mill code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Mill code must be uppercase alphanumeric only");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate phone number format
/// Accepts local (03001234567) and international (+923001234567) forms
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }
    if digits.len() == 12 && digits.starts_with("92") {
        return Ok(());
    }

    Err("Invalid phone number format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mill_code() {
        assert!(validate_mill_code("FMM").is_ok());
        assert!(validate_mill_code("MILL01").is_ok());
        assert!(validate_mill_code("fm").is_err());
        assert!(validate_mill_code("lowercase").is_err());
        assert!(validate_mill_code("TOOLONGCODE99").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("03001234567").is_ok());
        assert!(validate_phone("+92 300 1234567").is_ok());
        assert!(validate_phone("12345").is_err());
    }
}
