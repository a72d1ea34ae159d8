pub mod fake_provider;
pub mod field_generator;
pub mod locale;
