//! City name model for user-supplied lookups

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, non-empty city name as entered by the user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CityName(String);

impl CityName {
    /// Parse raw user input. Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The name as typed, minus surrounding whitespace
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title-cased form used for headings and link captions
    #[must_use]
    pub fn display_name(&self) -> String {
        title_case(&self.0)
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_trims_input() {
        let city = CityName::parse("  Paris \n").unwrap();
        assert_eq!(city.as_str(), "Paris");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_parse_rejects_blank(#[case] raw: &str) {
        assert!(CityName::parse(raw).is_none());
    }

    #[rstest]
    #[case("paris", "Paris")]
    #[case("new york", "New York")]
    #[case("SÃO PAULO", "São Paulo")]
    #[case("o'higgins", "O'Higgins")]
    #[case("san-sebastián", "San-Sebastián")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_display_name_keeps_raw_value() {
        let city = CityName::parse("kyoto").unwrap();
        assert_eq!(city.display_name(), "Kyoto");
        assert_eq!(city.to_string(), "kyoto");
    }
}
