//! US postal-code validation for user input.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZipCodeError {
    #[error("Please enter a postal code")]
    Empty,

    #[error("Postal code must be exactly 5 digits")]
    InvalidFormat,
}

/// Validate a US postal code, returning the trimmed code on success.
pub fn validate_zip_code(input: &str) -> Result<String, ZipCodeError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ZipCodeError::Empty);
    }

    if trimmed.len() != 5 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ZipCodeError::InvalidFormat);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_zip_code() {
        assert_eq!(validate_zip_code("90210").unwrap(), "90210");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(validate_zip_code("  10001 ").unwrap(), "10001");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_zip_code(""), Err(ZipCodeError::Empty));
        assert_eq!(validate_zip_code("   "), Err(ZipCodeError::Empty));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(validate_zip_code("1234"), Err(ZipCodeError::InvalidFormat));
        assert_eq!(validate_zip_code("123456"), Err(ZipCodeError::InvalidFormat));
    }

    #[test]
    fn test_non_digits() {
        assert_eq!(validate_zip_code("9021a"), Err(ZipCodeError::InvalidFormat));
        assert_eq!(validate_zip_code("90 10"), Err(ZipCodeError::InvalidFormat));
        // Unicode digits outside ASCII are rejected
        assert_eq!(validate_zip_code("٩٠٢١٠"), Err(ZipCodeError::InvalidFormat));
    }
}
