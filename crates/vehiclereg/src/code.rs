//! Registration code extraction.
//!
//! A registration code is the state/region token embedded in a vehicle ID:
//! two uppercase letters, optional whitespace, two digits. In `UP 80 AB 1234`
//! the code is `UP 80`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pattern for a registration code.
pub const CODE_PATTERN: &str = r"[A-Z]{2}\s*\d{2}";

static CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(CODE_PATTERN).expect("registration code pattern is valid"));

/// A registration code extracted from a vehicle ID.
///
/// Holds the matched text verbatim, whitespace included, because the location
/// table is keyed on the exact string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationCode(String);

impl RegistrationCode {
    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegistrationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the registration code from a free-text vehicle ID.
///
/// Returns the first match, or `None` if the identifier contains no code.
/// Later matches are ignored.
#[must_use]
pub fn extract_code(identifier: &str) -> Option<RegistrationCode> {
    CODE_REGEX
        .find(identifier)
        .map(|m| RegistrationCode(m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles() {
        assert!(Regex::new(CODE_PATTERN).is_ok());
    }

    #[test]
    fn test_extract_with_space() {
        let code = extract_code("UP 80 AB 1234").unwrap();
        assert_eq!(code.as_str(), "UP 80");
    }

    #[test]
    fn test_extract_without_space() {
        let code = extract_code("MH12AB1234").unwrap();
        assert_eq!(code.as_str(), "MH12");
    }

    #[test]
    fn test_extract_keeps_inner_whitespace_verbatim() {
        let code = extract_code("DL  01 C 4444").unwrap();
        assert_eq!(code.as_str(), "DL  01");
    }

    #[test]
    fn test_extract_no_match() {
        assert!(extract_code("randomtext").is_none());
        assert!(extract_code("").is_none());
    }

    #[test]
    fn test_extract_requires_uppercase() {
        assert!(extract_code("up 80 ab 1234").is_none());
    }

    #[test]
    fn test_extract_first_match_wins() {
        let code = extract_code("KA 05 then TN 22").unwrap();
        assert_eq!(code.as_str(), "KA 05");
    }

    #[test]
    fn test_extract_code_embedded_in_text() {
        let code = extract_code("plate: GJ 01 XY 7").unwrap();
        assert_eq!(code.to_string(), "GJ 01");
    }

    #[test]
    fn test_code_serializes_as_string() {
        let code = extract_code("UP 80").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"UP 80\"");
    }
}
