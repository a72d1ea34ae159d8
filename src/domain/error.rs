//! Error types for rule loading, field addressing and value generation

use thiserror::Error;

/// Errors raised while building a rule table from configuration records.
///
/// Every variant carries the position of the offending record in the
/// `keyword_matching` list so the message points straight at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("keyword_matching[{index}]: `keywords` must be a non-empty list")]
    MissingKeywords { index: usize },

    #[error("keyword_matching[{index}]: `method` must be a non-empty string")]
    MissingMethod { index: usize },

    #[error("keyword_matching[{index}]: keyword #{position} is an empty string")]
    EmptyKeyword { index: usize, position: usize },

    #[error("keyword_matching[{index}]: keyword #{position} must map exactly one non-empty ancestor to one non-empty child, found {entries} entries")]
    InvalidPathPattern {
        index: usize,
        position: usize,
        entries: usize,
    },
}

/// Errors raised while describing a field to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Field name must not be empty")]
    EmptyName,

    #[error("Field path '{0}' does not name a field")]
    InvalidPath(String),
}

/// Errors surfaced by a generator provider at invocation time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The resolved method is not registered with the provider
    #[error("Unsupported generator method: {0}")]
    UnsupportedMethod(String),

    /// An argument was unknown, of the wrong type or out of range
    #[error("Invalid argument '{argument}' for method '{method}': {reason}")]
    InvalidArgument {
        method: String,
        argument: String,
        reason: String,
    },
}
