//! Keyword matching rules and the ordered table that holds them.

use super::{FieldContext, GeneratorArgs, Resolution, RuleError};
use crate::config::{KeywordPatternConfig, KeywordRuleConfig};
use serde::Serialize;
use std::fmt;

/// Case folding applied to both patterns and field names.
///
/// Plain Unicode lowercasing with no locale tailoring: `"FÖRNAMN"` and
/// `"förnamn"` compare equal, the Turkish dotted/dotless `i` pairs do not.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// A single way a rule can match a field. Pattern text is stored case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPattern {
    /// Matches when the keyword occurs anywhere in the field name
    Keyword(String),
    /// Matches a field named `child` that sits below an object named `ancestor`
    PathQualified { ancestor: String, child: String },
}

impl MatchPattern {
    pub fn keyword(keyword: &str) -> Self {
        MatchPattern::Keyword(fold_case(keyword))
    }

    pub fn path_qualified(ancestor: &str, child: &str) -> Self {
        MatchPattern::PathQualified {
            ancestor: fold_case(ancestor),
            child: fold_case(child),
        }
    }

    /// Match against a field whose name and ancestors are already case-folded
    pub(crate) fn matches_folded(&self, name: &str, ancestors: &[String]) -> bool {
        match self {
            MatchPattern::Keyword(keyword) => name.contains(keyword.as_str()),
            MatchPattern::PathQualified { ancestor, child } => {
                name == child.as_str() && ancestors.iter().any(|a| a == ancestor)
            }
        }
    }

    pub fn matches(&self, field: &FieldContext) -> bool {
        let name = fold_case(field.name());
        let ancestors: Vec<String> = field.ancestors().iter().map(|a| fold_case(a)).collect();
        self.matches_folded(&name, &ancestors)
    }

    fn from_config(
        index: usize,
        position: usize,
        pattern: &KeywordPatternConfig,
    ) -> Result<Self, RuleError> {
        match pattern {
            KeywordPatternConfig::Keyword(keyword) => {
                if keyword.is_empty() {
                    return Err(RuleError::EmptyKeyword { index, position });
                }
                Ok(Self::keyword(keyword))
            }
            KeywordPatternConfig::Path(mapping) => {
                let invalid = RuleError::InvalidPathPattern {
                    index,
                    position,
                    entries: mapping.len(),
                };
                let mut entries = mapping.iter();
                match (entries.next(), entries.next()) {
                    (Some((ancestor, child)), None)
                        if !ancestor.is_empty() && !child.is_empty() =>
                    {
                        Ok(Self::path_qualified(ancestor, child))
                    }
                    _ => Err(invalid),
                }
            }
        }
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPattern::Keyword(keyword) => write!(f, "\"{}\"", keyword),
            MatchPattern::PathQualified { ancestor, child } => {
                write!(f, "{{{}: {}}}", ancestor, child)
            }
        }
    }
}

/// A set of OR-combined patterns mapped to a generator method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    patterns: Vec<MatchPattern>,
    method: String,
    args: GeneratorArgs,
}

impl Rule {
    /// Build a rule from its configuration record at position `index`
    pub fn from_config(index: usize, record: &KeywordRuleConfig) -> Result<Self, RuleError> {
        if record.keywords.is_empty() {
            return Err(RuleError::MissingKeywords { index });
        }
        if record.method.trim().is_empty() {
            return Err(RuleError::MissingMethod { index });
        }

        let patterns = record
            .keywords
            .iter()
            .enumerate()
            .map(|(position, pattern)| MatchPattern::from_config(index, position, pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            method: record.method.trim().to_string(),
            args: record.args.clone(),
        })
    }

    pub fn patterns(&self) -> &[MatchPattern] {
        &self.patterns
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &GeneratorArgs {
        &self.args
    }

    /// Index of the first pattern matching the case-folded field, if any
    pub(crate) fn first_matching_pattern(&self, name: &str, ancestors: &[String]) -> Option<usize> {
        self.patterns
            .iter()
            .position(|pattern| pattern.matches_folded(name, ancestors))
    }

    /// Owned copy of the generator call this rule stands for
    pub fn to_resolution(&self) -> Resolution {
        Resolution::new(self.method.clone(), self.args.clone())
    }
}

/// Rules in priority order: earlier rules shadow later ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table from configuration records, keeping their order.
    ///
    /// Fails on the first malformed record; no partial table is returned.
    /// Method names are not checked here.
    pub fn from_config(records: &[KeywordRuleConfig]) -> Result<Self, RuleError> {
        let rules = records
            .iter()
            .enumerate()
            .map(|(index, record)| Rule::from_config(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded rule table with {} rules", rules.len());
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
