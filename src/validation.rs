//! Form field validation
//!
//! Checks the raw city/state/country strings typed into the lookup form.
//! Rules run in order: required, minimum length, maximum length, pattern.
//! A failed "required" check short-circuits the rest.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AirWatchError;
use crate::models::LocationQuery;

pub const REQUIRED_MESSAGE: &str = "Este campo é obrigatório";
pub const PATTERN_MESSAGE: &str = "Formato inválido. Use apenas letras, espaços, hífens e apostrofes";

/// A field of the lookup form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    City,
    State,
    Country,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::City, Field::State, Field::Country];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::City => "city",
            Field::State => "state",
            Field::Country => "country",
        }
    }

    /// Rules applied to this field
    #[must_use]
    pub fn rules(self) -> FieldRules {
        FieldRules {
            required: !matches!(self, Field::Country),
            min_length: 2,
            max_length: 50,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(Field::City),
            "state" => Ok(Field::State),
            "country" => Ok(Field::Country),
            other => Err(format!("Unknown form field '{other}'")),
        }
    }
}

/// Length and presence constraints of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub required: bool,
    pub min_length: usize,
    pub max_length: usize,
}

/// Validate one field value, returning every failed rule's message.
///
/// An empty result means the value is acceptable.
#[must_use]
pub fn validate_field(field: Field, value: &str) -> Vec<String> {
    let rules = field.rules();
    let trimmed = value.trim();
    let mut errors = Vec::new();

    if trimmed.is_empty() {
        if rules.required {
            errors.push(REQUIRED_MESSAGE.to_string());
        }
        return errors;
    }

    let length = trimmed.chars().count();
    if length < rules.min_length {
        errors.push(format!("Deve ter pelo menos {} caracteres", rules.min_length));
    }
    if length > rules.max_length {
        errors.push(format!("Deve ter no máximo {} caracteres", rules.max_length));
    }
    if !trimmed.chars().all(is_allowed_char) {
        errors.push(PATTERN_MESSAGE.to_string());
    }

    errors
}

/// Validate a whole query and hand back the tidied version on success
pub fn validate_query(query: &LocationQuery) -> Result<LocationQuery, AirWatchError> {
    let errors: BTreeMap<Field, Vec<String>> = Field::ALL
        .into_iter()
        .map(|field| (field, validate_field(field, query.get(field))))
        .filter(|(_, messages)| !messages.is_empty())
        .collect();

    if errors.is_empty() {
        Ok(query.tidy())
    } else {
        Err(AirWatchError::Validation { errors })
    }
}

/// Letters (ASCII and Latin-1 accented), whitespace, `-`, `'` and `.`
fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (('\u{C0}'..='\u{FF}').contains(&c) && c != '\u{D7}' && c != '\u{F7}')
        || c.is_whitespace()
        || matches!(c, '-' | '\'' | '.')
}

/// Upper-case the first letter of every whitespace-separated word.
///
/// The rest of each word keeps its case, so `"são paulo"` becomes
/// `"São Paulo"` while `"SP"` stays `"SP"`. Unlike title-casing, the
/// remainder is never lower-cased: `"RIO DE JANEIRO"` stays as typed.
/// Inner spacing is kept.
/// `/api/validate` returns this value so the page tidies on blur with the
/// same rule the server applies on submit.
#[must_use]
pub fn capitalize_words(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.trim().chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = at_word_start && !c.is_alphanumeric();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Field::City, "")]
    #[case(Field::City, "   ")]
    #[case(Field::State, "\t\n")]
    #[case(Field::State, "")]
    fn test_required_fields_reject_blank(#[case] field: Field, #[case] value: &str) {
        assert_eq!(validate_field(field, value), vec![REQUIRED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_blank_country_is_valid() {
        assert!(validate_field(Field::Country, "").is_empty());
        assert!(validate_field(Field::Country, "   ").is_empty());
    }

    #[rstest]
    #[case("São Paulo")]
    #[case("Rio de Janeiro")]
    #[case("Coeur d'Alene")]
    #[case("St. Louis")]
    #[case("Winston-Salem")]
    #[case("Zürich")]
    #[case("Ñuñoa")]
    fn test_accepts_names(#[case] value: &str) {
        assert!(validate_field(Field::City, value).is_empty(), "{value}");
    }

    #[rstest]
    #[case("Paris2")]
    #[case("123")]
    #[case("New York!")]
    #[case("São@Paulo")]
    #[case("a×b")]
    #[case("Lyon; DROP")]
    fn test_rejects_digits_and_symbols(#[case] value: &str) {
        let errors = validate_field(Field::City, value);
        assert!(errors.contains(&PATTERN_MESSAGE.to_string()), "{value}: {errors:?}");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(
            validate_field(Field::State, "S"),
            vec!["Deve ter pelo menos 2 caracteres".to_string()]
        );
        assert!(validate_field(Field::State, "SP").is_empty());

        let long = "a".repeat(51);
        assert_eq!(
            validate_field(Field::City, &long),
            vec!["Deve ter no máximo 50 caracteres".to_string()]
        );
        assert!(validate_field(Field::City, &"a".repeat(50)).is_empty());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 25 two-byte characters
        let value = "é".repeat(25);
        assert!(validate_field(Field::City, &value).is_empty());
    }

    #[test]
    fn test_multiple_failures_are_all_reported() {
        let errors = validate_field(Field::City, "1");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_query_collects_per_field() {
        let query = LocationQuery::new("", "S", "Brasil");
        let Err(AirWatchError::Validation { errors }) = validate_query(&query) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&Field::City], vec![REQUIRED_MESSAGE.to_string()]);
        assert!(errors.contains_key(&Field::State));
        assert!(!errors.contains_key(&Field::Country));
    }

    #[test]
    fn test_validate_query_tidies_valid_input() {
        let query = LocationQuery::new("  são paulo ", "SP", "brasil");
        let tidy = validate_query(&query).unwrap();
        assert_eq!(tidy.city, "São Paulo");
        assert_eq!(tidy.state, "SP");
        assert_eq!(tidy.country, "Brasil");
    }

    #[rstest]
    #[case("são paulo", "São Paulo")]
    #[case("  new york  ", "New York")]
    #[case("SP", "SP")]
    #[case("winston-salem", "Winston-salem")]
    #[case("", "")]
    #[case("RIO DE JANEIRO", "RIO DE JANEIRO")]
    #[case("são  paulo", "São  Paulo")]
    fn test_capitalize_words(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(capitalize_words(input), expected);
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("city".parse::<Field>().unwrap(), Field::City);
        assert!("zip".parse::<Field>().is_err());
    }
}
