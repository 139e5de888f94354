use regex::Regex;
use thiserror::Error;

use crate::http::is_token_char;
use crate::model::record::HeaderRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("header name is empty")]
    MissingName,
    #[error("header name {0:?} contains invalid characters")]
    InvalidName(String),
    #[error("line {0} has no name/value separator")]
    MissingSeparator(usize),
    #[error("header {0} is required")]
    Required(String),
    #[error("header {name} does not match pattern {pattern}")]
    PatternMismatch { name: String, pattern: String },
    #[error("header {0} has a value outside of its allowed values")]
    NotInEnum(String),
}

pub struct Validator;

impl Validator {
    pub fn validate_name(name: &str) -> Result<(), ValidatorError> {
        if name.is_empty() {
            return Err(ValidatorError::MissingName);
        }
        if !name.chars().all(is_token_char) {
            return Err(ValidatorError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Structural check of a headers blob, used while the source view is
    /// visible. Continuation lines and blank lines are accepted.
    pub fn validate_text(text: &str) -> Result<(), ValidatorError> {
        for (i, line) in text.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() || line.starts_with([' ', '\t']) {
                continue;
            }
            let (name, _) = line
                .split_once(':')
                .ok_or(ValidatorError::MissingSeparator(i + 1))?;
            Self::validate_name(name.trim())?;
        }
        Ok(())
    }

    fn validate_pattern(record: &HeaderRecord, value: &str) -> Result<(), ValidatorError> {
        let Some(pattern) = record.schema.pattern.as_deref() else {
            return Ok(());
        };
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(err) => {
                log::warn!("ignoring invalid pattern for {}: {err}", record.name);
                return Ok(());
            }
        };
        if re.is_match(value) {
            Ok(())
        } else {
            Err(ValidatorError::PatternMismatch {
                name: record.name.clone(),
                pattern: pattern.to_string(),
            })
        }
    }

    /// Checks a structured record against the constraints declared by the
    /// description model. Disabled records are always valid.
    pub fn validate_record(record: &HeaderRecord) -> Result<(), ValidatorError> {
        if !record.schema.enabled {
            return Ok(());
        }

        let values = record.value.items();
        if values.iter().all(|v| v.is_empty()) {
            return if record.schema.required {
                Err(ValidatorError::Required(record.name.clone()))
            } else {
                Ok(())
            };
        }

        for value in values {
            Self::validate_pattern(record, value)?;
            if !record.schema.enum_values.is_empty()
                && !record.schema.enum_values.iter().any(|e| e == value)
            {
                return Err(ValidatorError::NotInEnum(record.name.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{HeaderSchema, HeaderValue};

    fn record(name: &str, value: &str, schema: HeaderSchema) -> HeaderRecord {
        HeaderRecord {
            name: name.to_string(),
            value: HeaderValue::Single(value.to_string()),
            schema,
        }
    }

    #[test]
    fn names_must_be_tokens() {
        assert!(Validator::validate_name("X-Request-Id").is_ok());
        assert_eq!(Validator::validate_name(""), Err(ValidatorError::MissingName));
        assert!(matches!(
            Validator::validate_name("Bad Name"),
            Err(ValidatorError::InvalidName(_))
        ));
    }

    #[test]
    fn text_reports_line_without_separator() {
        assert!(Validator::validate_text("Accept: */*\n  folded\n\n").is_ok());
        assert_eq!(
            Validator::validate_text("Accept: */*\nbroken"),
            Err(ValidatorError::MissingSeparator(2))
        );
    }

    #[test]
    fn required_record_needs_value() {
        let schema = HeaderSchema {
            required: true,
            ..HeaderSchema::default()
        };
        let r = record("X-Api-Key", "", schema.clone());
        assert_eq!(
            Validator::validate_record(&r),
            Err(ValidatorError::Required("X-Api-Key".into()))
        );

        let disabled = HeaderRecord {
            schema: HeaderSchema {
                enabled: false,
                ..schema
            },
            ..r
        };
        assert!(Validator::validate_record(&disabled).is_ok());
    }

    #[test]
    fn pattern_and_enum_are_checked() {
        let schema = HeaderSchema {
            pattern: Some("^[0-9]+$".into()),
            ..HeaderSchema::default()
        };
        assert!(Validator::validate_record(&record("X-Count", "12", schema.clone())).is_ok());
        assert!(matches!(
            Validator::validate_record(&record("X-Count", "ab", schema)),
            Err(ValidatorError::PatternMismatch { .. })
        ));

        let schema = HeaderSchema {
            enum_values: vec!["a".into(), "b".into()],
            ..HeaderSchema::default()
        };
        assert_eq!(
            Validator::validate_record(&record("X-Mode", "c", schema)),
            Err(ValidatorError::NotInEnum("X-Mode".into()))
        );
    }
}
