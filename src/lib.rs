//! # Schemock - keyword-driven fake data resolution
//!
//! Schemock decides which fake-data generator to use for a field of a
//! JSON-like schema, based only on the field's key and the keys of the
//! objects that enclose it. An ordered table of keyword rules is scanned and
//! the first rule with a matching pattern wins; unmatched fields get a
//! configurable fallback generator.
//!
//! ## Features
//!
//! - **Keyword rules**: case-insensitive substring patterns and
//!   path-qualified `{ancestor: child}` patterns, first match wins
//! - **Built-in table**: a default rule table covering names, contact data,
//!   addresses, companies and more
//! - **Localised generators**: values come from the `fake` crate in one of
//!   several locales
//! - **Deterministic runs**: one seeded random generator per run
//! - **Validation**: malformed rules are reported at load time with their
//!   position
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemock::adapters::field_generator::FieldGenerator;
//! use schemock::config::Settings;
//! use schemock::domain::FieldContext;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let mut generator = FieldGenerator::from_settings(&settings)?;
//!
//!     let field = FieldContext::from_path("project.name")?;
//!     println!("{}", generator.generate(&field)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: field contexts, match patterns, rule tables and the resolver
//! - **Adapters**: the `fake`-backed generator provider and field generation
//! - **Config**: settings loading, the built-in rule table and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
