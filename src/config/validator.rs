use thiserror::Error;

use crate::config::{KeywordRuleConfig, LocaleSetting, Settings};
use crate::domain::{Rule, RuleError};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check the whole configuration, collecting every problem found
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_locale(&settings.locale) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_providers(&settings.providers) {
            errors.extend(e);
        }

        if settings.max_array_length == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "max_array_length".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if settings.fallback.method.trim().is_empty() {
            errors.push(ValidationError::MissingField("fallback.method".to_string()));
        }

        if let Err(e) = Self::validate_rules(&settings.keyword_matching) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_locale(locale: &LocaleSetting) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let LocaleSetting::Many(tags) = locale {
            if tags.is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: "locale".to_string(),
                    reason: "Locale list must not be empty".to_string(),
                });
            }
        }

        for (idx, tag) in locale.tags().iter().enumerate() {
            if tag.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("locale[{}]", idx)));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_providers(providers: &[String]) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = providers
            .iter()
            .enumerate()
            .filter(|(_, provider)| provider.trim().is_empty())
            .map(|(idx, _)| ValidationError::MissingField(format!("providers[{}]", idx)))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Every malformed record is reported, not only the first
    fn validate_rules(rules: &[KeywordRuleConfig]) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = rules
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| Rule::from_config(idx, record).err())
            .map(ValidationError::from)
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordPatternConfig;
    use crate::domain::GeneratorArgs;

    fn record(keywords: &[&str], method: &str) -> KeywordRuleConfig {
        KeywordRuleConfig {
            keywords: keywords
                .iter()
                .map(|k| KeywordPatternConfig::Keyword(k.to_string()))
                .collect(),
            method: method.to_string(),
            args: GeneratorArgs::new(),
        }
    }

    fn settings_with_rules(rules: Vec<KeywordRuleConfig>) -> Settings {
        Settings {
            keyword_matching: rules,
            ..Settings::default()
        }
    }

    #[test]
    fn test_valid_settings() {
        let settings = settings_with_rules(vec![record(&["email"], "email")]);
        assert!(ConfigValidator::validate(&settings).is_ok());
    }

    #[test]
    fn test_collects_every_bad_rule() {
        let settings = settings_with_rules(vec![
            record(&[], "email"),
            record(&["age"], "random_int"),
            record(&["name"], ""),
        ]);

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::Rule(RuleError::MissingKeywords { index: 0 }),
                ValidationError::Rule(RuleError::MissingMethod { index: 2 }),
            ]
        );
    }

    #[test]
    fn test_zero_max_array_length() {
        let settings = Settings {
            max_array_length: 0,
            ..Settings::default()
        };
        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidValue { field, .. } if field == "max_array_length"
        ));
    }

    #[test]
    fn test_empty_locale_list() {
        let settings = Settings {
            locale: LocaleSetting::Many(vec![]),
            ..Settings::default()
        };
        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_blank_fallback_and_provider() {
        let mut settings = Settings::default();
        settings.fallback.method = String::new();
        settings.providers = vec!["internet".to_string(), " ".to_string()];

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingField("fallback.method".to_string())));
        assert!(errors.contains(&ValidationError::MissingField("providers[1]".to_string())));
    }

    #[test]
    fn test_error_messages_name_the_record() {
        let settings = settings_with_rules(vec![record(&["x"], "x"), record(&[], "name")]);
        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "Invalid rule: keyword_matching[1]: `keywords` must be a non-empty list"
        );
    }
}
