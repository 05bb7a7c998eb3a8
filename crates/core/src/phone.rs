//! Contact number validation

use once_cell::sync::Lazy;
use regex::Regex;

/// Exactly ten ASCII digits, nothing else
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

/// Check whether the input is an acceptable contact number
///
/// The rule is exactly 10 ASCII digits: no separators, no country code,
/// no whitespace. Leading zeros are accepted.
pub fn is_valid_phone(input: &str) -> bool {
    PHONE_PATTERN.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("0000000000"));
        assert!(is_valid_phone("0123456789"));
    }

    #[test]
    fn test_wrong_length() {
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("987654321"));
        assert!(!is_valid_phone("12345678901"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_non_digit_characters() {
        assert!(!is_valid_phone("123-456-7890"));
        assert!(!is_valid_phone("abcdefghij"));
        assert!(!is_valid_phone("98765 4321"));
        assert!(!is_valid_phone("+919876543210"));
        assert!(!is_valid_phone(" 9876543210"));
        assert!(!is_valid_phone("9876543210\n"));
    }

    #[test]
    fn test_non_ascii_digits() {
        // Devanagari digits are not ASCII digits
        assert!(!is_valid_phone("९८७६५४३२१०"));
    }
}
