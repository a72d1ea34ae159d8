use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub mod error;
pub mod resolver;
pub mod rules;

#[cfg(test)]
mod resolver_test;

pub use error::{FieldError, GeneratorError, RuleError};
pub use resolver::{Resolver, RuleMatch};
pub use rules::{MatchPattern, Rule, RuleTable};

/// Keyword arguments handed to a generator method
pub type GeneratorArgs = Map<String, Value>;

/// A leaf field to resolve: its own key plus the names of the objects that
/// enclose it, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldContext {
    name: String,
    ancestors: Vec<String>,
}

impl FieldContext {
    pub fn new<I, S>(name: impl Into<String>, ancestors: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(FieldError::EmptyName);
        }

        Ok(Self {
            name,
            ancestors: ancestors.into_iter().map(Into::into).collect(),
        })
    }

    /// Parse a dot-notation path such as `order.items[0].name` or
    /// `items[*].tags[2]`.
    ///
    /// Array index and wildcard segments are dropped: an array element is
    /// addressed by the key of the array that holds it, so `tags[2]` resolves
    /// as the field `tags`.
    pub fn from_path(path: &str) -> Result<Self, FieldError> {
        let mut segments: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                    // Skip the index or wildcard up to the closing bracket
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(current);
        }

        let name = segments
            .pop()
            .ok_or_else(|| FieldError::InvalidPath(path.to_string()))?;

        Self::new(name, segments)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }
}

impl fmt::Display for FieldContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ancestor in &self.ancestors {
            write!(f, "{}.", ancestor)?;
        }
        write!(f, "{}", self.name)
    }
}

/// The generator call chosen for a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub method: String,
    #[serde(default)]
    pub args: GeneratorArgs,
}

impl Resolution {
    pub fn new(method: impl Into<String>, args: GeneratorArgs) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// A resolution with no arguments
    pub fn method(method: impl Into<String>) -> Self {
        Self::new(method, GeneratorArgs::new())
    }
}

/// A source of fake values addressed by method name.
///
/// Method names are bound late: a rule table may name methods a given
/// provider does not expose, which only fails when that method is invoked.
pub trait GeneratorProvider: Send + Sync {
    /// Generate a value with the named method
    fn generate(
        &self,
        method: &str,
        args: &GeneratorArgs,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GeneratorError>;

    fn supports(&self, method: &str) -> bool;

    /// Registered method names, sorted
    fn methods(&self) -> Vec<&'static str>;
}
