//! First-match resolution of fields against a rule table.

use super::rules::{fold_case, Rule, RuleTable};
use super::{FieldContext, Resolution};
use tracing::trace;

/// Generator method used when no rule matches and no fallback was configured
pub const DEFAULT_FALLBACK_METHOD: &str = "word";

/// The rule that decided a resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleMatch<'a> {
    /// Position of the rule in the table
    pub rule_index: usize,
    /// Position of the matching pattern within the rule
    pub pattern_index: usize,
    pub rule: &'a Rule,
}

/// Maps fields to generator calls using an immutable rule table.
///
/// Holds no mutable state, so one resolver can be shared freely between
/// threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    table: RuleTable,
    fallback: Resolution,
}

impl Resolver {
    pub fn new(table: RuleTable) -> Self {
        Self::with_fallback(table, Resolution::method(DEFAULT_FALLBACK_METHOD))
    }

    pub fn with_fallback(table: RuleTable, fallback: Resolution) -> Self {
        Self { table, fallback }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn fallback(&self) -> &Resolution {
        &self.fallback
    }

    /// Find the first rule with a pattern matching `field`
    pub fn find_match(&self, field: &FieldContext) -> Option<RuleMatch<'_>> {
        let name = fold_case(field.name());
        let ancestors: Vec<String> = field.ancestors().iter().map(|a| fold_case(a)).collect();

        self.table
            .rules()
            .iter()
            .enumerate()
            .find_map(|(rule_index, rule)| {
                rule.first_matching_pattern(&name, &ancestors)
                    .map(|pattern_index| RuleMatch {
                        rule_index,
                        pattern_index,
                        rule,
                    })
            })
    }

    /// Resolve `field` to a generator call.
    ///
    /// Never fails: a field no rule matches gets the fallback.
    pub fn resolve(&self, field: &FieldContext) -> Resolution {
        match self.find_match(field) {
            Some(found) => {
                trace!(
                    field = %field,
                    rule = found.rule_index,
                    method = found.rule.method(),
                    "Field matched rule"
                );
                found.rule.to_resolution()
            }
            None => {
                trace!(field = %field, method = %self.fallback.method, "No rule matched, using fallback");
                self.fallback.clone()
            }
        }
    }
}
