use crate::adapters::fake_provider::unknown_providers;
use crate::adapters::locale::{select_locale, Locale};
use crate::config::Settings;
use crate::domain::{FieldContext, GeneratorError, GeneratorProvider, Resolution, Resolver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

/// Resolve the configured seed: `None` or `0` draws a fresh one.
pub fn effective_seed(configured: Option<u64>) -> u64 {
    match configured {
        Some(seed) if seed != 0 => seed,
        _ => rand::thread_rng().gen_range(1..=999_999),
    }
}

/// Resolves fields against the rule table and produces a value for each,
/// using one seeded random generator for the whole run.
pub struct FieldGenerator {
    resolver: Resolver,
    provider: Box<dyn GeneratorProvider>,
    rng: StdRng,
    seed: u64,
    locale: Locale,
}

impl FieldGenerator {
    pub fn new(resolver: Resolver, locale: Locale, seed: u64) -> Self {
        Self {
            resolver,
            provider: locale.provider(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            locale,
        }
    }

    /// Build a generator from loaded settings: seed, locale, provider and rules
    pub fn from_settings(settings: &Settings) -> Result<Self, anyhow::Error> {
        let seed = effective_seed(settings.seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let locale = select_locale(&settings.locale, &mut rng);
        tracing::info!("Using seed {} and locale {}", seed, locale);

        for provider in unknown_providers(&settings.providers) {
            tracing::warn!("Unknown provider group {}, skipping", provider);
        }

        Ok(Self {
            resolver: settings.resolver()?,
            provider: locale.provider(),
            rng,
            seed,
            locale,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn provider(&self) -> &dyn GeneratorProvider {
        self.provider.as_ref()
    }

    pub fn resolve(&self, field: &FieldContext) -> Resolution {
        self.resolver.resolve(field)
    }

    /// Generate a value for `field`.
    ///
    /// If the matched generator rejects its method or arguments the fallback
    /// generator is used instead; only a failing fallback is returned as an
    /// error.
    pub fn generate(&mut self, field: &FieldContext) -> Result<Value, GeneratorError> {
        let resolution = self.resolver.resolve(field);

        match self
            .provider
            .generate(&resolution.method, &resolution.args, &mut self.rng)
        {
            Ok(value) => Ok(value),
            Err(e) => {
                let fallback = self.resolver.fallback();
                tracing::warn!(
                    "Generator {} failed for field {}: {}; using fallback {}",
                    resolution.method,
                    field,
                    e,
                    fallback.method
                );
                self.provider
                    .generate(&fallback.method, &fallback.args, &mut self.rng)
            }
        }
    }
}
